//! Risk scoring: churn and the weighted aggregator

pub mod churn;
pub mod risk;

pub use churn::{ChurnSnapshot, CommitTouches, GitHistory, HistoryProvider};
pub use risk::{aggregate, clamp, ScoreWeights, Threshold};

//! Risk aggregation
//!
//! Each structural metric is normalised onto [0, 100] between a "safe" and a
//! "danger" threshold, then the five component scores are combined with a
//! fixed weight vector into the global score.

use crate::models::{FileMetrics, RiskScoreResult};

/// A (safe, danger) pair for [`clamp`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub safe: f64,
    pub danger: f64,
}

impl Threshold {
    pub const fn new(safe: f64, danger: f64) -> Self {
        Self { safe, danger }
    }

    pub fn score(&self, value: f64) -> f64 {
        clamp(value, self.safe, self.danger)
    }
}

pub const COMPLEXITY: Threshold = Threshold::new(3.0, 10.0);
pub const FUNCTION_SIZE: Threshold = Threshold::new(20.0, 60.0);
pub const DEPTH: Threshold = Threshold::new(2.0, 5.0);
pub const PARAMS: Threshold = Threshold::new(3.0, 7.0);
pub const CHURN: Threshold = Threshold::new(5.0, 20.0);

/// Weights of the component scores in the global score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub complexity: f64,
    pub function_size: f64,
    pub churn: f64,
    pub depth: f64,
    pub params: f64,
}

impl ScoreWeights {
    pub const DEFAULT: ScoreWeights = ScoreWeights {
        complexity: 0.35,
        function_size: 0.20,
        churn: 0.15,
        depth: 0.20,
        params: 0.10,
    };

    pub fn total(&self) -> f64 {
        self.complexity + self.function_size + self.churn + self.depth + self.params
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Linear normalisation onto [0, 100]
///
/// 0 at or below `safe`, 100 at or above `danger`, linear in between.
pub fn clamp(value: f64, safe: f64, danger: f64) -> f64 {
    if value <= safe {
        0.0
    } else if value >= danger {
        100.0
    } else {
        (value - safe) / (danger - safe) * 100.0
    }
}

/// Combine a file's metrics and churn into a [`RiskScoreResult`]
///
/// Only named functions contribute to the maxima. Fan-in and fan-out are left
/// at zero for the graph pass to fill in.
pub fn aggregate(metrics: &FileMetrics, churn_score: f64, churn_touches: u32) -> RiskScoreResult {
    aggregate_with(metrics, churn_score, churn_touches, &ScoreWeights::DEFAULT)
}

pub fn aggregate_with(
    metrics: &FileMetrics,
    churn_score: f64,
    churn_touches: u32,
    weights: &ScoreWeights,
) -> RiskScoreResult {
    let (max_complexity, max_function_size, max_depth, max_params) = metrics
        .named_functions()
        .fold((0u32, 0usize, 0u32, 0u32), |(c, s, d, p), f| {
            (
                c.max(f.cyclomatic_complexity),
                s.max(f.line_count),
                d.max(f.max_nesting_depth),
                p.max(f.parameter_count),
            )
        });

    let complexity_score = COMPLEXITY.score(max_complexity as f64);
    let function_size_score = FUNCTION_SIZE.score(max_function_size as f64);
    let depth_score = DEPTH.score(max_depth as f64);
    let param_score = PARAMS.score(max_params as f64);

    let global_score = complexity_score * weights.complexity
        + function_size_score * weights.function_size
        + churn_score * weights.churn
        + depth_score * weights.depth
        + param_score * weights.params;

    RiskScoreResult {
        file_path: metrics.file_path.clone(),
        language: metrics.language,
        complexity_score,
        function_size_score,
        churn_score,
        depth_score,
        param_score,
        fan_in: 0,
        fan_out: 0,
        global_score,
        max_complexity,
        max_function_size,
        max_depth,
        max_params,
        churn_touches,
    }
}

//! Aggregator properties

use pulse::models::{ExtractionStrategy, FileMetrics, FunctionKind, FunctionMetrics};
use pulse::scoring::{aggregate, clamp, ScoreWeights};
use pulse::{Language, MetricExtractor};
use std::path::{Path, PathBuf};

#[test]
fn test_clamp_bounds_and_endpoints() {
    assert_eq!(clamp(-5.0, 3.0, 10.0), 0.0);
    assert_eq!(clamp(3.0, 3.0, 10.0), 0.0);
    assert_eq!(clamp(10.0, 3.0, 10.0), 100.0);
    assert_eq!(clamp(1e9, 3.0, 10.0), 100.0);
    assert!((clamp(6.5, 3.0, 10.0) - 50.0).abs() < 1e-9);
}

#[test]
fn test_clamp_is_monotonic() {
    let mut previous = clamp(0.0, 20.0, 60.0);
    for step in 1..=100 {
        let current = clamp(step as f64, 20.0, 60.0);
        assert!(current >= previous);
        assert!((0.0..=100.0).contains(&current));
        previous = current;
    }
}

#[test]
fn test_weights_sum_to_one() {
    assert!((ScoreWeights::DEFAULT.total() - 1.0).abs() < 1e-9);
}

#[test]
fn test_only_churn_counts_without_named_functions() {
    let mut anonymous = FunctionMetrics::new(FunctionKind::Anonymous, 1, 200);
    anonymous.cyclomatic_complexity = 40;
    anonymous.parameter_count = 9;
    anonymous.max_nesting_depth = 8;
    let metrics = FileMetrics::new(
        PathBuf::from("/p/a.ts"),
        Language::TypeScript,
        200,
        vec![anonymous],
        ExtractionStrategy::Structural,
    );

    let result = aggregate(&metrics, 60.0, 14);
    assert_eq!(result.complexity_score, 0.0);
    assert_eq!(result.function_size_score, 0.0);
    assert_eq!(result.depth_score, 0.0);
    assert_eq!(result.param_score, 0.0);
    assert!((result.global_score - 6.0).abs() < 1e-9);
    assert_eq!(result.churn_touches, 14);
}

#[test]
fn test_global_score_is_weighted_sum() {
    let mut f = FunctionMetrics::new(FunctionKind::Named("f".into()), 1, 60);
    f.cyclomatic_complexity = 10;
    f.parameter_count = 7;
    f.max_nesting_depth = 5;
    let metrics = FileMetrics::new(
        PathBuf::from("/p/f.py"),
        Language::Python,
        60,
        vec![f],
        ExtractionStrategy::Heuristic,
    );

    let result = aggregate(&metrics, 100.0, 20);
    assert!((result.global_score - 100.0).abs() < 1e-9);

    let result = aggregate(&metrics, 0.0, 0);
    assert!((result.global_score - 90.0).abs() < 1e-9);
}

#[test]
fn test_extraction_is_idempotent() {
    let source = r#"
export class Store {
  #items = new Map();
  get size() { return this.#items.size; }
  put(key, value) {
    if (!key || value === undefined) {
      throw new Error("bad");
    }
    for (const [k] of this.#items) {
      if (k === key) { return false; }
    }
    this.#items.set(key, value);
    return true;
  }
}
export const handler = async ({ id }, ...rest) => id ?? rest[0];
[1, 2].forEach(function () {});
"#;
    let extractor = MetricExtractor::new();
    let path = Path::new("/p/store.ts");
    let first = extractor.extract(path, source, Language::TypeScript);
    let second = extractor.extract(path, source, Language::TypeScript);
    assert_eq!(first, second);
    assert_eq!(first.strategy, ExtractionStrategy::Structural);

    let names: Vec<_> = first.functions.iter().map(|f| f.name.as_str()).collect();
    assert!(names.contains(&"get size"));
    assert!(names.contains(&"put"));
    assert!(names.contains(&"handler"));
    assert_eq!(first.named_functions().count(), first.functions.len() - 1);
}

//! End-to-end scans over temporary project trees

use super::support::*;
use pulse::models::ExtractionStrategy;
use pulse::scoring::CommitTouches;
use pulse::{Language, MetricExtractor, PulseError};
use std::path::Path;
use tempfile::tempdir;

#[test]
fn test_single_branch_function_metrics() {
    let dir = tempdir().unwrap();
    let path = write(
        dir.path(),
        "a.ts",
        "function f(a, b) {\n  if (a) {\n    return b;\n  }\n  return a;\n}\n",
    );

    let metrics = MetricExtractor::new().extract_file(&path).unwrap();
    assert_eq!(metrics.strategy, ExtractionStrategy::Structural);
    assert_eq!(metrics.functions.len(), 1);

    let f = &metrics.functions[0];
    assert_eq!(f.name, "f");
    assert_eq!(f.cyclomatic_complexity, 2);
    assert_eq!(f.parameter_count, 2);
    assert_eq!(f.start_line, 1);
    assert_eq!(f.line_count, 6);
}

#[test]
fn test_js_extension_import_resolves_to_ts_file() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.ts", "import { b } from './b.js';\nexport const a = () => b();\n");
    write(dir.path(), "b.ts", "export function b() {\n  return 1;\n}\n");

    let result = scanner_with(dir.path(), NoHistory).scan().unwrap();
    let root = canonical(dir.path());

    assert_eq!(result.edges.len(), 1);
    assert_eq!(result.edges[0].from, root.join("a.ts"));
    assert_eq!(result.edges[0].to, root.join("b.ts"));
    assert_eq!(result.file(&root.join("b.ts")).unwrap().fan_in, 1);
    assert_eq!(result.file(&root.join("a.ts")).unwrap().fan_out, 1);
}

#[test]
fn test_unavailable_history_scores_zero_churn() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/a.ts", "export function a(x) {\n  return x ? 1 : 2;\n}\n");
    write(dir.path(), "src/b.py", "def b(x):\n    return x\n");
    write(dir.path(), "src/c.js", "module.exports = function c() {};\n");

    let result = scanner_with(dir.path(), FailingHistory).scan().unwrap();

    assert_eq!(result.files.len(), 3);
    assert!(result.failures.is_empty());
    for file in &result.files {
        assert_eq!(file.churn_score, 0.0);
        assert_eq!(file.churn_touches, 0);
    }
}

#[cfg(unix)]
#[test]
fn test_symlink_cycle_scans_each_file_once() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/x.ts", "export const x = 1;\n");
    write(dir.path(), "b/y.ts", "export const y = 2;\n");
    std::os::unix::fs::symlink(dir.path().join("b"), dir.path().join("a/link_to_b")).unwrap();
    std::os::unix::fs::symlink(dir.path().join("a"), dir.path().join("b/link_to_a")).unwrap();

    let result = scanner_with(dir.path(), NoHistory).scan().unwrap();
    let root = canonical(dir.path());

    let mut paths: Vec<_> = result.files.iter().map(|f| f.file_path.clone()).collect();
    paths.sort();
    assert_eq!(paths, vec![root.join("a/x.ts"), root.join("b/y.ts")]);
}

#[test]
fn test_ignored_and_generated_files_skipped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/app.ts", "export const app = 1;\n");
    write(dir.path(), "src/app.test.ts", "test('x', () => {});\n");
    write(dir.path(), "src/types.d.ts", "declare const t: number;\n");
    write(dir.path(), "node_modules/dep/index.js", "module.exports = 1;\n");
    write(dir.path(), "__pycache__/x.py", "x = 1\n");
    write(dir.path(), "README.md", "# readme\n");

    let result = scanner_with(dir.path(), NoHistory).scan().unwrap();
    assert_eq!(result.files.len(), 1);
    assert!(result.files[0].file_path.ends_with("src/app.ts"));
}

#[test]
fn test_unparseable_script_falls_back_to_heuristics() {
    let dir = tempdir().unwrap();
    let source = "function broken(a, b {\n  if (a) {\n    return b;\n  }\n}\n";
    let path = write(dir.path(), "broken.js", source);

    let metrics = MetricExtractor::new().extract(&path, source, Language::JavaScript);
    assert_eq!(metrics.strategy, ExtractionStrategy::Heuristic);

    let result = scanner_with(dir.path(), NoHistory).scan().unwrap();
    assert_eq!(result.files.len(), 1);
    assert!(result.failures.is_empty());
}

#[test]
fn test_churn_counts_flow_into_scores() {
    let dir = tempdir().unwrap();
    let hot = write(dir.path(), "hot.ts", "export const hot = 1;\n");
    write(dir.path(), "cold.ts", "export const cold = 1;\n");

    let hot = canonical(&hot);
    let log = (0..20)
        .map(|i| CommitTouches {
            commit: format!("c{i}"),
            paths: vec![hot.clone()],
        })
        .collect();
    let result = scanner_with(dir.path(), FixedHistory(log)).scan().unwrap();

    let hot_result = result.file(&hot).unwrap();
    assert_eq!(hot_result.churn_touches, 20);
    assert_eq!(hot_result.churn_score, 100.0);
    assert!((hot_result.global_score - 10.0).abs() < 1e-9);
    assert_eq!(result.files[0].file_path, hot);
}

#[test]
fn test_rescan_is_idempotent() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.ts", "import './b';\nexport function a(x, y) {\n  while (x && y) { x--; }\n}\n");
    write(dir.path(), "b.ts", "import './a';\nexport const b = (z) => z ?? 0;\n");
    write(dir.path(), "pkg/__init__.py", "");
    write(dir.path(), "pkg/mod.py", "from . import helper\n\ndef run(a):\n    if a:\n        return 1\n");

    let scanner = scanner_with(dir.path(), NoHistory);
    let first = scanner.scan().unwrap();
    let second = scanner.scan().unwrap();

    assert_eq!(first.files, second.files);
    assert_eq!(first.edges, second.edges);
    assert_eq!(first.cycles, second.cycles);
    assert_eq!(first.metrics, second.metrics);
    assert_eq!(scanner.churn_cache().build_count(), 2);
}

#[test]
fn test_missing_root_is_single_error() {
    let dir = tempdir().unwrap();
    let err = scanner_with(&dir.path().join("absent"), NoHistory).scan().unwrap_err();
    assert!(matches!(err, PulseError::InvalidPath { .. }));
}

#[test]
fn test_free_scan_function() {
    let dir = tempdir().unwrap();
    write(dir.path(), "main.py", "def main():\n    pass\n");
    let result = pulse::scan(dir.path()).unwrap();
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].language, Language::Python);
}

#[test]
fn test_empty_project() {
    let dir = tempdir().unwrap();
    let result = scanner_with(dir.path(), NoHistory).scan().unwrap();
    assert!(result.files.is_empty());
    assert!(result.edges.is_empty());
    assert_eq!(result.project_root, canonical(Path::new(dir.path())));
}

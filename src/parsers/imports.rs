//! Relative import extraction
//!
//! Only relative specifiers (leading `.`) can name a file inside the scanned
//! tree, so bare package imports are discarded here.

use crate::models::Language;
use once_cell::sync::Lazy;
use regex::Regex;

static ECMASCRIPT_IMPORTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // import x from '...', import { a, b } from '...', import type T from '...'
        r#"\bimport\s+[^;'"]*?\bfrom\s*['"]([^'"]+)['"]"#,
        // export { a } from '...', export * from '...'
        r#"\bexport\s+[^;'"]*?\bfrom\s*['"]([^'"]+)['"]"#,
        // import '...'
        r#"\bimport\s*['"]([^'"]+)['"]"#,
        r#"\brequire\s*\(\s*['"]([^'"]+)['"]\s*\)"#,
        r#"\bimport\s*\(\s*['"]([^'"]+)['"]\s*\)"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("import patterns are valid regular expressions"))
    .collect()
});

static PYTHON_FROM_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*from\s+(\.+)([\w.]*)\s+import\b")
        .expect("import patterns are valid regular expressions")
});

/// Relative import specifiers found in `source`, in path form
///
/// Python relative modules are translated to paths: one dot is the importing
/// file's package, each further dot climbs one level.
pub fn relative_specifiers(source: &str, language: Language) -> Vec<String> {
    match language {
        Language::Python => python_specifiers(source),
        _ => ecmascript_specifiers(source),
    }
}

fn ecmascript_specifiers(source: &str) -> Vec<String> {
    let mut specifiers = Vec::new();
    for pattern in ECMASCRIPT_IMPORTS.iter() {
        for caps in pattern.captures_iter(source) {
            if let Some(spec) = caps.get(1).map(|m| m.as_str()) {
                if spec.starts_with('.') && !specifiers.iter().any(|s| s == spec) {
                    specifiers.push(spec.to_string());
                }
            }
        }
    }
    specifiers
}

fn python_specifiers(source: &str) -> Vec<String> {
    let mut specifiers = Vec::new();
    for caps in PYTHON_FROM_IMPORT.captures_iter(source) {
        let dots = caps.get(1).map(|m| m.as_str().len()).unwrap_or(0);
        let module = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let spec = python_module_path(dots, module);
        if !specifiers.contains(&spec) {
            specifiers.push(spec);
        }
    }
    specifiers
}

fn python_module_path(dots: usize, module: &str) -> String {
    let mut spec = if dots <= 1 {
        ".".to_string()
    } else {
        vec![".."; dots - 1].join("/")
    };
    let module = module.trim_matches('.');
    if !module.is_empty() {
        spec.push('/');
        spec.push_str(&module.replace('.', "/"));
    }
    spec
}

//! Line-oriented regex extraction
//!
//! Used for languages without a structural parser and as the fallback when the
//! structural parser rejects a file. A function starts at a definition line and
//! runs until the next definition line or the end of the file.

use crate::models::{FunctionKind, FunctionMetrics, Language};
use once_cell::sync::Lazy;
use regex::Regex;

/// Columns a tab expands to when measuring indentation
const TAB_WIDTH: usize = 4;
/// Indentation columns per nesting level
const INDENT_PER_LEVEL: usize = 4;

#[derive(Debug, Clone, Copy)]
enum Definition {
    Named,
    Bound,
    Method,
}

struct PatternSet {
    /// Each pattern captures the function name in group 1
    definitions: Vec<(Regex, Definition)>,
    branches: Vec<Regex>,
    /// Names that look like method heads but are control flow
    reserved: &'static [&'static str],
}

impl PatternSet {
    fn new(definitions: &[(&str, Definition)], branches: &[&str], reserved: &'static [&'static str]) -> Self {
        Self {
            definitions: definitions
                .iter()
                .map(|(pattern, kind)| (compile(pattern), *kind))
                .collect(),
            branches: branches.iter().map(|pattern| compile(pattern)).collect(),
            reserved,
        }
    }

    fn empty() -> Self {
        Self {
            definitions: Vec::new(),
            branches: Vec::new(),
            reserved: &[],
        }
    }

    fn for_language(language: Language) -> &'static PatternSet {
        match language {
            Language::Python => &PYTHON,
            Language::TypeScript | Language::JavaScript => &ECMASCRIPT,
            Language::Unknown => &NONE,
        }
    }

    fn definition(&self, line: &str) -> Option<FunctionKind> {
        self.definitions.iter().find_map(|(pattern, kind)| {
            let name = pattern.captures(line)?.get(1)?.as_str();
            if self.reserved.contains(&name) {
                return None;
            }
            let name = name.to_string();
            Some(match kind {
                Definition::Named => FunctionKind::Named(name),
                Definition::Bound => FunctionKind::Bound(name),
                Definition::Method => FunctionKind::Method(name),
            })
        })
    }

    fn branch_count(&self, line: &str) -> u32 {
        self.branches.iter().filter(|p| p.is_match(line)).count() as u32
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("heuristic patterns are valid regular expressions")
}

static PYTHON: Lazy<PatternSet> = Lazy::new(|| {
    PatternSet::new(
        &[
            (r"^\s*def\s+(\w+)\s*\(", Definition::Named),
            (r"^\s*async\s+def\s+(\w+)\s*\(", Definition::Named),
        ],
        &[
            r"\bif\b",
            r"\belif\b",
            r"\bfor\b",
            r"\bwhile\b",
            r"\bexcept\b",
            r"\band\b",
            r"\bor\b",
        ],
        &[],
    )
});

static ECMASCRIPT: Lazy<PatternSet> = Lazy::new(|| {
    PatternSet::new(
        &[
            (
                r"^\s*(?:export\s+(?:default\s+)?)?(?:async\s+)?function\s*\*?\s*([\w$]+)\s*\(",
                Definition::Named,
            ),
            (
                r"^\s*(?:export\s+)?(?:const|let|var)\s+([\w$]+)\s*(?::[^=]+)?=\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*(?::[^=]+)?=>|[\w$]+\s*=>)",
                Definition::Bound,
            ),
            (
                r"^\s*(?:(?:public|private|protected|static|async|readonly|override|get|set)\s+)*(#?[\w$]+)\s*\([^)]*\)\s*(?::[^{]+)?\{\s*$",
                Definition::Method,
            ),
        ],
        &[
            r"\bif\b",
            r"\bfor\b",
            r"\bwhile\b",
            r"\bcase\b",
            r"\bcatch\b",
            r"\s\?\s",
            r"&&",
            r"\|\|",
            r"\?\?",
        ],
        &["if", "for", "while", "switch", "catch", "function", "return", "with"],
    )
});

static NONE: Lazy<PatternSet> = Lazy::new(PatternSet::empty);

static FIRST_PARAMETER_LIST: Lazy<Regex> = Lazy::new(|| compile(r"\(([^)]*)\)"));

/// Extract function metrics from `source` using the pattern set for `language`
pub fn extract_functions(source: &str, language: Language) -> Vec<FunctionMetrics> {
    let patterns = PatternSet::for_language(language);
    if patterns.definitions.is_empty() {
        return Vec::new();
    }

    let lines: Vec<&str> = source.lines().collect();
    let starts: Vec<(usize, FunctionKind)> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| patterns.definition(line).map(|kind| (i, kind)))
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(n, (start, kind))| {
            let end = starts.get(n + 1).map(|(next, _)| *next).unwrap_or(lines.len());
            let body = &lines[*start..end];

            let mut metrics = FunctionMetrics::new(kind.clone(), start + 1, body.len());
            metrics.cyclomatic_complexity =
                1 + body.iter().map(|line| patterns.branch_count(line)).sum::<u32>();
            metrics.parameter_count = parameter_count(lines[*start]);
            metrics.max_nesting_depth = body.iter().map(|line| indent_level(line)).max().unwrap_or(0);
            metrics
        })
        .collect()
}

fn parameter_count(line: &str) -> u32 {
    FIRST_PARAMETER_LIST
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|list| {
            list.as_str()
                .split(',')
                .filter(|token| !token.trim().is_empty())
                .count() as u32
        })
        .unwrap_or(0)
}

fn indent_level(line: &str) -> u32 {
    let width: usize = line
        .chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum();
    (width / INDENT_PER_LEVEL) as u32
}

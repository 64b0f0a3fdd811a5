//! AST visitor collecting per-function metrics

use crate::models::{FunctionKind, FunctionMetrics};
use oxc_ast::ast::*;
use oxc_ast::AstKind;
use oxc_ast_visit::Visit;
use oxc_span::{GetSpan, Span};
use std::collections::HashMap;

/// `Span` hashes to a constant, so spans are keyed by their offsets
type SpanKey = (u32, u32);

fn key(span: Span) -> SpanKey {
    (span.start, span.end)
}

/// Byte offset to 1-based line lookup
struct LineIndex {
    starts: Vec<u32>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );
        Self { starts }
    }

    fn line_of(&self, offset: u32) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}

/// Open function being measured
struct Frame {
    kind: FunctionKind,
    span: Span,
    parameters: u32,
    complexity: u32,
    depth: u32,
    max_depth: u32,
}

/// Walks a program once and measures every function-like node
///
/// Branching and nesting constructs are charged to every open frame, so a
/// nested function's constructs also count toward its enclosing functions.
pub struct FunctionCollector {
    lines: LineIndex,
    bindings: HashMap<SpanKey, FunctionKind>,
    stack: Vec<Frame>,
    finished: Vec<FunctionMetrics>,
}

impl FunctionCollector {
    pub fn collect(source: &str, program: &Program<'_>) -> Vec<FunctionMetrics> {
        let mut collector = Self {
            lines: LineIndex::new(source),
            bindings: HashMap::new(),
            stack: Vec::new(),
            finished: Vec::new(),
        };
        collector.visit_program(program);
        collector.finished.sort_by_key(|f| f.start_line);
        collector.finished
    }

    fn open(&mut self, span: Span, own_name: Option<&str>, parameters: u32) {
        let binding = self.bindings.remove(&key(span));
        let kind = match (binding, own_name) {
            (Some(method @ FunctionKind::Method(_)), _) => method,
            (_, Some(name)) => FunctionKind::Named(name.to_string()),
            (Some(bound), None) => bound,
            (None, None) => FunctionKind::Anonymous,
        };
        self.stack.push(Frame {
            kind,
            span,
            parameters,
            complexity: 1,
            depth: 0,
            max_depth: 0,
        });
    }

    fn close(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let start_line = self.lines.line_of(frame.span.start);
        let end_line = self
            .lines
            .line_of(frame.span.end.saturating_sub(1))
            .max(start_line);

        let mut metrics = FunctionMetrics::new(frame.kind, start_line, end_line - start_line + 1);
        metrics.cyclomatic_complexity = frame.complexity;
        metrics.parameter_count = frame.parameters;
        metrics.max_nesting_depth = frame.max_depth;
        self.finished.push(metrics);
    }

    fn branch(&mut self) {
        for frame in &mut self.stack {
            frame.complexity += 1;
        }
    }

    fn nest(&mut self) {
        for frame in &mut self.stack {
            frame.depth += 1;
            frame.max_depth = frame.max_depth.max(frame.depth);
        }
    }

    fn unnest(&mut self) {
        for frame in &mut self.stack {
            frame.depth = frame.depth.saturating_sub(1);
        }
    }

    /// Remember `kind` for the function that `value` evaluates to, if any
    fn bind_value(&mut self, value: &Expression<'_>, kind: FunctionKind) {
        let mut value = value;
        while let Expression::ParenthesizedExpression(inner) = value {
            value = &inner.expression;
        }
        match value {
            Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_) => {
                self.bindings.insert(key(value.span()), kind);
            }
            _ => {}
        }
    }
}

fn property_name(key: &PropertyKey<'_>) -> Option<String> {
    match key {
        PropertyKey::PrivateIdentifier(ident) => Some(format!("#{}", ident.name)),
        _ => key.static_name().map(|name| name.into_owned()),
    }
}

fn parameter_count(params: &FormalParameters<'_>) -> u32 {
    (params.items.len() + usize::from(params.rest.is_some())) as u32
}

impl<'a> Visit<'a> for FunctionCollector {
    fn enter_node(&mut self, kind: AstKind<'a>) {
        match kind {
            AstKind::Function(func) if func.body.is_some() => {
                let own_name = func.id.as_ref().map(|id| id.name.as_str());
                self.open(func.span, own_name, parameter_count(&func.params));
            }
            AstKind::ArrowFunctionExpression(arrow) => {
                self.open(arrow.span, None, parameter_count(&arrow.params));
            }

            AstKind::MethodDefinition(method) => {
                if let Some(name) = property_name(&method.key) {
                    let name = match method.kind {
                        MethodDefinitionKind::Get => format!("get {}", name),
                        MethodDefinitionKind::Set => format!("set {}", name),
                        _ => name,
                    };
                    self.bindings
                        .insert(key(method.value.span), FunctionKind::Method(name));
                }
            }
            AstKind::VariableDeclarator(decl) => {
                if let (Some(id), Some(init)) = (decl.id.get_binding_identifier(), &decl.init) {
                    self.bind_value(init, FunctionKind::Bound(id.name.to_string()));
                }
            }
            AstKind::ObjectProperty(prop) => {
                if let Some(name) = property_name(&prop.key) {
                    self.bind_value(&prop.value, FunctionKind::Bound(name));
                }
            }
            AstKind::PropertyDefinition(prop) => {
                if let (Some(name), Some(value)) = (property_name(&prop.key), &prop.value) {
                    self.bind_value(value, FunctionKind::Bound(name));
                }
            }
            AstKind::AssignmentExpression(assign) => {
                let target = match &assign.left {
                    AssignmentTarget::AssignmentTargetIdentifier(ident) => {
                        Some(ident.name.to_string())
                    }
                    AssignmentTarget::StaticMemberExpression(member) => {
                        Some(member.property.name.to_string())
                    }
                    _ => None,
                };
                if let Some(name) = target {
                    self.bind_value(&assign.right, FunctionKind::Bound(name));
                }
            }

            AstKind::IfStatement(_)
            | AstKind::ForStatement(_)
            | AstKind::ForInStatement(_)
            | AstKind::ForOfStatement(_)
            | AstKind::WhileStatement(_)
            | AstKind::DoWhileStatement(_) => {
                self.branch();
                self.nest();
            }
            AstKind::SwitchStatement(_) | AstKind::TryStatement(_) => self.nest(),
            AstKind::SwitchCase(case) if case.test.is_some() => self.branch(),
            AstKind::CatchClause(_)
            | AstKind::ConditionalExpression(_)
            | AstKind::LogicalExpression(_) => self.branch(),
            _ => {}
        }
    }

    fn leave_node(&mut self, kind: AstKind<'a>) {
        match kind {
            AstKind::Function(func) if func.body.is_some() => self.close(),
            AstKind::ArrowFunctionExpression(_) => self.close(),
            AstKind::IfStatement(_)
            | AstKind::ForStatement(_)
            | AstKind::ForInStatement(_)
            | AstKind::ForOfStatement(_)
            | AstKind::WhileStatement(_)
            | AstKind::DoWhileStatement(_)
            | AstKind::SwitchStatement(_)
            | AstKind::TryStatement(_) => self.unnest(),
            _ => {}
        }
    }
}

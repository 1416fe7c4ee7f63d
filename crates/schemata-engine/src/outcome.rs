//! # Validation Results
//!
//! Three layers:
//!
//! - [`Diagnostic`]: one error or warning, located by path.
//! - [`Report`]: the result of validating one subtree. Its `sanitized`
//!   value is present only when its own error list is empty; diagnostics
//!   from every descendant are carried upward regardless.
//! - [`Outcome`]: the public result of a top-level call, serialized as
//!   `{status: "ok"|"errors", meta: ...}`.
//!
//! Primitive handlers never build reports directly. They write into a
//! [`Node`], which stamps each diagnostic with the node's value, schema,
//! and path, and enforces the sanitized-only-when-clean rule in
//! [`Node::finish`].

use std::fmt;

use serde::Serialize;

use schemata_core::{render_path, PathSegment, Value};

use crate::schema::SchemaRef;

/// A single error or warning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// The value found at `path`.
    pub value: Value,
    /// The schema it was validated against.
    pub schema: SchemaRef,
    /// Keys and indices from the validation root.
    pub path: Vec<PathSegment>,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", render_path(&self.path), self.message)
    }
}

/// The result of validating one subtree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    /// Sanitized value; `None` when this subtree has errors.
    pub sanitized: Option<Value>,
    /// Errors from this node and its descendants.
    pub errors: Vec<Diagnostic>,
    /// Warnings from this node and its descendants.
    pub warnings: Vec<Diagnostic>,
}

impl Report {
    /// Whether the subtree validated without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Accumulator for the node currently being validated.
pub struct Node<'a> {
    value: &'a Value,
    schema: SchemaRef,
    path: &'a [PathSegment],
    report: Report,
}

impl<'a> Node<'a> {
    pub(crate) fn new(value: &'a Value, schema: SchemaRef, path: &'a [PathSegment]) -> Self {
        Self {
            value,
            schema,
            path,
            report: Report::default(),
        }
    }

    /// The value under validation.
    pub fn value(&self) -> &'a Value {
        self.value
    }

    fn diagnostic(&self, message: String) -> Diagnostic {
        Diagnostic {
            value: self.value.clone(),
            schema: self.schema.clone(),
            path: self.path.to_vec(),
            message,
        }
    }

    /// Record an error at this node.
    pub fn err(&mut self, message: impl Into<String>) {
        let diagnostic = self.diagnostic(message.into());
        self.report.errors.push(diagnostic);
    }

    /// Record a warning at this node.
    pub fn warn(&mut self, message: impl Into<String>) {
        let diagnostic = self.diagnostic(message.into());
        self.report.warnings.push(diagnostic);
    }

    /// Set the sanitized output.
    pub fn set(&mut self, sanitized: impl Into<Value>) {
        self.report.sanitized = Some(sanitized.into());
    }

    /// Append a child's diagnostics, leaving the child intact.
    pub fn merge(&mut self, child: &Report) {
        self.report.errors.extend(child.errors.iter().cloned());
        self.report.warnings.extend(child.warnings.iter().cloned());
    }

    /// Append a child's diagnostics and hand back its sanitized value.
    pub fn absorb(&mut self, child: Report) -> Option<Value> {
        self.report.errors.extend(child.errors);
        self.report.warnings.extend(child.warnings);
        child.sanitized
    }

    /// Replace this node's entire result with `winner`'s.
    pub fn proxy(&mut self, winner: Report) {
        self.report = winner;
    }

    /// Whether any error has been recorded so far.
    pub fn has_errors(&self) -> bool {
        !self.report.errors.is_empty()
    }

    /// Close the node. A node with errors withholds its sanitized value.
    pub fn finish(mut self) -> Report {
        if self.has_errors() {
            self.report.sanitized = None;
        }
        self.report
    }
}

/// The public result of a validation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "meta", rename_all = "lowercase")]
pub enum Outcome {
    /// Validation succeeded, possibly with coercions.
    Ok {
        /// The canonical form of the input.
        sanitized: Value,
        /// Coercions that were applied.
        warnings: Vec<Diagnostic>,
    },
    /// Validation failed.
    Errors {
        /// Every error found.
        list: Vec<Diagnostic>,
    },
}

impl Outcome {
    /// Whether validation succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// The sanitized value, on success.
    pub fn sanitized(&self) -> Option<&Value> {
        match self {
            Self::Ok { sanitized, .. } => Some(sanitized),
            Self::Errors { .. } => None,
        }
    }

    /// Warnings, on success. Empty on failure: warnings are not reported
    /// alongside errors.
    pub fn warnings(&self) -> &[Diagnostic] {
        match self {
            Self::Ok { warnings, .. } => warnings,
            Self::Errors { .. } => &[],
        }
    }

    /// Errors, on failure.
    pub fn errors(&self) -> &[Diagnostic] {
        match self {
            Self::Ok { .. } => &[],
            Self::Errors { list } => list,
        }
    }

    /// Messages of every error, in report order.
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors().iter().map(|d| d.message.as_str()).collect()
    }

    /// Messages of every warning, in report order.
    pub fn warning_messages(&self) -> Vec<&str> {
        self.warnings().iter().map(|d| d.message.as_str()).collect()
    }
}

impl From<Report> for Outcome {
    fn from(report: Report) -> Self {
        if report.errors.is_empty() {
            Self::Ok {
                sanitized: report.sanitized.unwrap_or(Value::Null),
                warnings: report.warnings,
            }
        } else {
            Self::Errors {
                list: report.errors,
            }
        }
    }
}

//! Validation errors
//!
//! Parsing never stops at the first problem: every type mismatch, missing
//! required field and out-of-set enum value is collected into a single
//! [`ValidationError`], so a client can fix a request in one round trip.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// One step in the path to a field inside a request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Location of a value inside a request body, e.g. `contents[1].parts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The path of the document itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Path to a named field below this one.
    pub fn field(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Field(name.to_owned()));
        Self(segments)
    }

    /// Path to an array element below this one.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("$");
        }
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if position == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single rejected field: where it is, what was expected, and what arrived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    pub path: FieldPath,
    pub expected: String,
    /// `None` when the field was required but absent. Omitted from the serialized
    /// issue in that case, so `"received": null` always means an explicit `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<Value>,
}

impl FieldIssue {
    pub fn new(path: FieldPath, expected: impl Into<String>, received: Value) -> Self {
        Self {
            path,
            expected: expected.into(),
            received: Some(received),
        }
    }

    pub fn missing(path: FieldPath) -> Self {
        Self {
            path,
            expected: "field to be present".into(),
            received: None,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.received.is_none()
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.received {
            Some(value) => write!(
                f,
                "{}: expected {}, received {}",
                self.path, self.expected, value
            ),
            None => write!(f, "{}: required field is missing", self.path),
        }
    }
}

/// A request body that does not match its schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{model}: {}", render_issues(.issues))]
pub struct ValidationError {
    /// Name of the record type that was being parsed.
    pub model: &'static str,
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Issues reported at exactly `path` (rendered form, e.g. `"contents[0].role"`).
    pub fn issues_at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a FieldIssue> + 'a {
        self.issues
            .iter()
            .filter(move |issue| issue.path.to_string() == path)
    }
}

fn render_issues(issues: &[FieldIssue]) -> String {
    let mut rendered = match issues.len() {
        1 => "1 validation error".to_owned(),
        count => format!("{count} validation errors"),
    };
    for issue in issues {
        rendered.push_str("\n  ");
        rendered.push_str(&issue.to_string());
    }
    rendered
}

/// Failure to turn raw bytes into a validated record.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("request body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

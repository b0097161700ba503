//! Validation issues and their caller-facing messages.

use std::fmt;

use thiserror::Error;

use crate::schema::PAGE_WITHOUT_LIMIT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    InvalidType {
        expected: &'static str,
        received: &'static str,
    },
    InvalidEnum {
        options: Vec<String>,
    },
    /// A boolean parameter that is neither `"true"` nor `"false"`.
    NotBoolean,
    PageWithoutLimit,
    UnrecognizedKeys(Vec<String>),
    /// Any other rule failure, carrying the rule's default message.
    Constraint(String),
}

/// One validation failure, located by its path inside the query object.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub path: Vec<PathSegment>,
    pub kind: IssueKind,
}

impl Issue {
    pub fn new(path: Vec<PathSegment>, kind: IssueKind) -> Self {
        Self { path, kind }
    }

    pub fn at(name: &str, kind: IssueKind) -> Self {
        Self::new(vec![PathSegment::Key(name.to_string())], kind)
    }

    pub fn page_without_limit() -> Self {
        Self::new(Vec::new(), IssueKind::PageWithoutLimit)
    }

    pub fn unrecognized(keys: Vec<String>) -> Self {
        Self::new(Vec::new(), IssueKind::UnrecognizedKeys(keys))
    }

    /// The top-level query parameter this issue belongs to, if any.
    pub fn parameter(&self) -> Option<&str> {
        match self.path.first() {
            Some(PathSegment::Key(k)) => Some(k),
            _ => None,
        }
    }

    /// Terminal issues abort validation and are reported on their own.
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, IssueKind::NotBoolean)
    }

    fn default_message(&self) -> String {
        match &self.kind {
            IssueKind::InvalidType { expected, received } => {
                format!("Expected {expected}, received {received}")
            }
            IssueKind::InvalidEnum { options } => format!(
                "Invalid enum value. Expected {}",
                options
                    .iter()
                    .map(|o| format!("'{o}'"))
                    .collect::<Vec<_>>()
                    .join(" | ")
            ),
            IssueKind::NotBoolean => "Expected boolean".to_string(),
            IssueKind::PageWithoutLimit => PAGE_WITHOUT_LIMIT.to_string(),
            IssueKind::UnrecognizedKeys(keys) => format!(
                "Unrecognized key(s) in object: {}",
                keys.iter()
                    .map(|k| format!("'{k}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            IssueKind::Constraint(message) => message.clone(),
        }
    }

    /// Human-readable message scoped to the offending parameter.
    pub fn message(&self) -> String {
        if let IssueKind::PageWithoutLimit = self.kind {
            return PAGE_WITHOUT_LIMIT.to_string();
        }
        let Some(name) = self.parameter() else {
            return format!(
                "Error when validating query parameters: {}",
                self.default_message()
            );
        };
        let prefix = format!("Query parameter \"{name}\" must");
        match &self.kind {
            IssueKind::InvalidType { expected, received } => format!(
                "{prefix} be of type {expected}, but received a value of type {received} instead."
            ),
            IssueKind::InvalidEnum { options } if self.path.len() > 1 => format!(
                "{prefix} contain a combination of only the following: {}.",
                options.join(", ")
            ),
            IssueKind::InvalidEnum { options } => {
                format!("{prefix} be one of the following: {}.", options.join(", "))
            }
            IssueKind::NotBoolean => format!("{prefix} be of type boolean."),
            _ => format!(
                "Error when validating the \"{name}\" query parameter: {}",
                self.default_message()
            ),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Ordered list of validation issues; the first one is what callers see.
#[derive(Debug, Clone, Error)]
#[error("{headline}")]
pub struct QueryError {
    headline: String,
    issues: Vec<Issue>,
}

impl QueryError {
    /// Build from a non-empty issue list.
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        let headline = issues
            .first()
            .map(Issue::message)
            .unwrap_or_else(|| "Error when validating query parameters".to_string());
        Self { headline, issues }
    }

    pub fn single(issue: Issue) -> Self {
        Self::from_issues(vec![issue])
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// The single message surfaced to the caller.
    pub fn message(&self) -> &str {
        &self.headline
    }
}

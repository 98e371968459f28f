//! Non-blocking structural validation of decoded analysis output.
//!
//! [`validate`] never rejects or rewrites a value. It only reports where the
//! value departs from the [`FlowAnalysisResult`] contract so callers can log
//! or surface the discrepancies.
//!
//! Field presence, JSON types and enum membership are checked against the
//! JSON Schema generated from [`FlowAnalysisResult`]. State id uniqueness and
//! transition endpoint references cannot be expressed there and are checked
//! separately.
//!
//! [`FlowAnalysisResult`]: crate::schema::FlowAnalysisResult

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use jsonschema::Validator;
use serde::Serialize;
use serde_json::Value;

use crate::schema::{TRACING_TARGET, json_schema};

/// Validator compiled once from the generated schema.
static SCHEMA_VALIDATOR: LazyLock<Option<Validator>> = LazyLock::new(|| {
    match Validator::new(json_schema().as_value()) {
        Ok(validator) => Some(validator),
        Err(error) => {
            tracing::error!(
                target: TRACING_TARGET,
                error = %error,
                "Failed to compile analysis schema, only graph checks will run"
            );
            None
        }
    }
});

/// A single departure from the analysis contract.
///
/// Paths are JSON pointers into the checked value, `""` being the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// The value violates the generated JSON Schema.
    Schema { path: String, message: String },
    /// Two states share the same id.
    DuplicateStateId { id: String },
    /// A transition endpoint does not name a declared state.
    DanglingTransition { path: String, state_id: String },
}

impl ValidationIssue {
    /// JSON pointer of the offending value, if the issue has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Schema { path, .. } | Self::DanglingTransition { path, .. } => Some(path),
            Self::DuplicateStateId { .. } => None,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema { path, message } if path.is_empty() => write!(f, "/: {message}"),
            Self::Schema { path, message } => write!(f, "{path}: {message}"),
            Self::DuplicateStateId { id } => write!(f, "/states: duplicate id '{id}'"),
            Self::DanglingTransition { path, state_id } => {
                write!(f, "{path}: references undeclared state '{state_id}'")
            }
        }
    }
}

/// Outcome of validating a decoded value against the analysis contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Issues in the order they were found.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Returns `true` if no issues were found.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of issues found.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns `true` if no issues were found.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Iterates over the issues.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter()
    }
}

/// Checks a decoded value against the analysis contract.
pub fn validate(value: &Value) -> ValidationReport {
    let mut issues: Vec<ValidationIssue> = SCHEMA_VALIDATOR
        .as_ref()
        .map(|validator| {
            validator
                .iter_errors(value)
                .map(|error| ValidationIssue::Schema {
                    path: error.instance_path.to_string(),
                    message: error.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    check_state_graph(value, &mut issues);
    ValidationReport { issues }
}

/// Reports duplicate state ids and transitions to undeclared states.
///
/// Entries of the wrong shape are skipped here; the schema pass reports them.
fn check_state_graph(value: &Value, issues: &mut Vec<ValidationIssue>) {
    let Some(states) = value.get("states").and_then(Value::as_array) else {
        return;
    };

    let mut declared = HashSet::with_capacity(states.len());
    for id in states.iter().filter_map(|state| state.get("id")?.as_str()) {
        if !declared.insert(id) {
            issues.push(ValidationIssue::DuplicateStateId { id: id.to_owned() });
        }
    }

    let Some(transitions) = value.get("transitions").and_then(Value::as_array) else {
        return;
    };

    for (i, transition) in transitions.iter().enumerate() {
        for endpoint in ["from", "to"] {
            let Some(state_id) = transition.get(endpoint).and_then(Value::as_str) else {
                continue;
            };
            if !declared.contains(state_id) {
                issues.push(ValidationIssue::DanglingTransition {
                    path: format!("/transitions/{i}/{endpoint}"),
                    state_id: state_id.to_owned(),
                });
            }
        }
    }
}

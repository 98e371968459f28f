//! Flow analysis schema contract.
//!
//! The types in this module describe the exact shape of a valid flow
//! analysis result. The same contract is given to the reasoning service as
//! part of its system instructions (see [`SYSTEM_INSTRUCTIONS`]) and is used
//! to check its output (see [`validate`]).

mod instructions;
mod validation;

use std::collections::BTreeMap;

use schemars::{JsonSchema, Schema};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

pub use crate::schema::instructions::{SYSTEM_INSTRUCTIONS, USER_INSTRUCTION};
pub use crate::schema::validation::{ValidationIssue, ValidationReport, validate};

/// Tracing target for schema operations.
pub const TRACING_TARGET: &str = "flowsight_core::schema";

/// Structured description of a flowchart produced by the reasoning service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowAnalysisResult {
    /// Short name of the analyzed flow.
    pub title: String,
    /// One paragraph summary of what the flow does.
    pub description: String,
    /// Every node of the flow, in reading order.
    pub states: Vec<State>,
    /// Directed edges between states.
    pub transitions: Vec<Transition>,
    /// Human-readable walkthrough of the happy path.
    pub steps: Vec<String>,
    /// Structural omissions detected in the flow.
    pub gaps: Vec<Gap>,
    /// Recommended improvements.
    pub suggestions: Vec<Suggestion>,
    /// Generated implementation snippets keyed by target platform.
    pub code_logic: BTreeMap<String, String>,
    /// How sure the model is about the interpretation.
    pub confidence: Confidence,
    /// Description of any visual noise that hampered interpretation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_detected: Option<String>,
}

impl FlowAnalysisResult {
    /// Returns the state with the given id.
    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|state| state.id == id)
    }

    /// Returns transitions leaving the given state.
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions.iter().filter(move |t| t.from == id)
    }
}

/// A node in the analyzed flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct State {
    /// Identifier, unique within a result.
    pub id: String,
    /// Text shown on the node.
    pub label: String,
    /// Node classification derived from its visual shape.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// What happens in this state.
    pub description: String,
}

/// Classification of a flowchart node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, JsonSchema)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    /// Entry point, drawn as an oval or rounded terminator.
    Start,
    /// Process step, drawn as a rectangle.
    State,
    /// Decision point, drawn as a diamond.
    Conditional,
    /// Data store, drawn as a cylinder.
    Data,
    /// Exit point, drawn as an oval or rounded terminator.
    End,
}

impl NodeKind {
    /// Returns the visual shape the kind is recognized from.
    pub fn shape_hint(self) -> &'static str {
        match self {
            Self::Start | Self::End => "oval or rounded rectangle",
            Self::State => "rectangle",
            Self::Conditional => "diamond",
            Self::Data => "cylinder",
        }
    }
}

/// A directed edge between two states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Transition {
    /// Source state id.
    pub from: String,
    /// Target state id.
    pub to: String,
    /// Guard label, absent for unconditional transitions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl Transition {
    /// Returns `true` if the transition has no guard.
    pub fn is_unconditional(&self) -> bool {
        self.condition.is_none()
    }
}

/// A structural omission detected in the flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Gap {
    /// Free-form reference to the affected state or label.
    pub node: String,
    /// What is missing.
    pub issue: String,
    /// How to close the gap.
    pub suggestion: String,
}

/// A recommended improvement to the flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
}

/// Category of a [`Suggestion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, JsonSchema)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SuggestionKind {
    Timeout,
    Error,
    Cancel,
    Retry,
    Other,
}

/// Three-level ordinal confidence, used for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize, JsonSchema)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Returns the JSON Schema of [`FlowAnalysisResult`].
pub fn json_schema() -> Schema {
    schemars::schema_for!(FlowAnalysisResult)
}

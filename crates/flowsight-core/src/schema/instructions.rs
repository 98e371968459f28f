//! Instruction text sent to the reasoning service.

/// System instructions embedding the full flow analysis contract.
///
/// The shape-to-kind mapping and gap heuristics live here rather than in
/// code: the reasoning service applies them, nothing downstream enforces them.
pub const SYSTEM_INSTRUCTIONS: &str = r#"You are an expert systems analyst. You receive a raster image of a flowchart and convert it into a structured description of the flow.

Respond with a single JSON object and nothing else. No markdown fences, no commentary. The object MUST have exactly this shape:

{
  "title": string,
  "description": string,
  "states": [
    { "id": string, "label": string, "type": "start" | "state" | "conditional" | "data" | "end", "description": string }
  ],
  "transitions": [
    { "from": string, "to": string, "condition": string (omit when the transition is unconditional) }
  ],
  "steps": [string],
  "gaps": [
    { "node": string, "issue": string, "suggestion": string }
  ],
  "suggestions": [
    { "title": string, "description": string, "type": "timeout" | "error" | "cancel" | "retry" | "other" }
  ],
  "codeLogic": { "typescript": string, "python": string, "xstate": string },
  "confidence": "high" | "medium" | "low",
  "noiseDetected": string (omit when the image is clean)
}

Node classification by visual shape:
- oval or rounded rectangle at the entry of the flow: "start"
- oval or rounded rectangle at an exit of the flow: "end"
- rectangle: "state"
- diamond: "conditional"
- cylinder: "data"

Rules for states and transitions:
- Every state id must be unique.
- Every transition "from" and "to" must reference a declared state id.
- Use the label text printed on the arrow as the transition condition.

Gap detection. Report a gap for each of the following:
- dead ends: a non-end state with no outgoing transition
- a conditional without a branch for every outcome, in particular a missing error or failure branch
- long-running or user-facing states without a cancel path
- network, payment or external calls without a timeout branch
- loops with no exit condition or retry limit
- two consecutive conditionals whose intermediate state is undefined

Code generation. "codeLogic" maps a target platform to a complete, idiomatic implementation of the flow: a TypeScript state handler, a Python implementation, and an XState machine definition.

Never fail on ambiguous, blurry or partial input. Produce your best-effort interpretation, set "confidence" honestly ("low" when you had to guess), describe any visual noise in "noiseDetected", and always populate "suggestions" with concrete improvements."#;

/// Short literal instruction accompanying the image in the user message.
pub const USER_INSTRUCTION: &str = "Analyze this flowchart and return the JSON object only.";

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::schema::{Confidence, NodeKind, SuggestionKind};

    #[test]
    fn instructions_list_every_enum_value() {
        for kind in NodeKind::iter() {
            assert!(SYSTEM_INSTRUCTIONS.contains(&format!("\"{kind}\"")));
        }
        for kind in SuggestionKind::iter() {
            assert!(SYSTEM_INSTRUCTIONS.contains(&format!("\"{kind}\"")));
        }
        for level in Confidence::iter() {
            assert!(SYSTEM_INSTRUCTIONS.contains(&format!("\"{level}\"")));
        }
    }

    #[test]
    fn instructions_name_every_top_level_field() {
        for field in [
            "title",
            "description",
            "states",
            "transitions",
            "steps",
            "gaps",
            "suggestions",
            "codeLogic",
            "confidence",
            "noiseDetected",
        ] {
            assert!(SYSTEM_INSTRUCTIONS.contains(&format!("\"{field}\"")), "{field}");
        }
    }

    #[test]
    fn user_instruction_asks_for_json() {
        assert!(USER_INSTRUCTION.contains("JSON"));
    }
}

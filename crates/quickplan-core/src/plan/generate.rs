//! Generation request: input validation, prompt construction and the
//! output schema the provider is constrained to.
//!
//! This module contains pure logic (no I/O). The provider call itself
//! lives in [`crate::provider`] and orchestration in [`super::service`].

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::GenerationError;

use super::schema::Strategy;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Mission and vision statements supplied by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanRequest {
    pub mission: String,
    pub vision: String,
}

impl PlanRequest {
    pub fn new(mission: impl Into<String>, vision: impl Into<String>) -> Self {
        Self {
            mission: mission.into(),
            vision: vision.into(),
        }
    }

    /// Build a request from an arbitrary JSON body.
    ///
    /// Non-string or absent fields are treated as missing, so the result
    /// can still fail [`PlanRequest::validate`].
    pub fn from_json_body(body: &Value) -> Self {
        let field = |name: &str| {
            body.get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };
        Self {
            mission: field("mission"),
            vision: field("vision"),
        }
    }

    /// Both statements must contain something other than whitespace.
    ///
    /// This is stricter than plain non-emptiness: a mission or vision made
    /// only of spaces or newlines is rejected as missing too, at both the
    /// endpoint and the client.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.mission.trim().is_empty() || self.vision.trim().is_empty() {
            return Err(GenerationError::missing_input());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Prompt construction
// ---------------------------------------------------------------------------

/// Build the instruction sent to the provider. Mission and vision are
/// embedded verbatim.
pub fn build_prompt(request: &PlanRequest) -> String {
    let mut prompt = String::with_capacity(1024);

    prompt.push_str(
        "You are a world-class business strategy consultant AI. Your task is to \
         create a comprehensive, actionable strategic plan based on the user's \
         provided mission and vision statements.\n\n",
    );
    prompt.push_str(&format!("Mission: \"{}\"\n", request.mission));
    prompt.push_str(&format!("Vision: \"{}\"\n\n", request.vision));
    prompt.push_str(
        "Based on this, generate a strategic plan with the following components. \
         For the 'How to Win' section, perform a brief conceptual analysis of market \
         trends or common strategies for similar types of businesses to justify your \
         choice between a price-based or differentiation-based strategy.\n\n",
    );
    prompt.push_str(
        "The output must be a valid JSON object that adheres to the provided schema. \
         Fill each section with insightful and practical suggestions.\n",
    );

    prompt
}

// ---------------------------------------------------------------------------
// Output schema
// ---------------------------------------------------------------------------

/// Top-level fields every plan must carry, in presentation order.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "direction",
    "howToWin",
    "capabilities",
    "leadership",
    "goals",
    "objectives",
    "initiatives",
    "tasks",
];

fn titled_items_schema(description: &str) -> Value {
    json!({
        "type": "ARRAY",
        "description": description,
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "description": { "type": "STRING" }
            },
            "required": ["title", "description"]
        }
    })
}

/// The response schema passed to the provider, mirroring
/// [`StrategicPlan`](super::schema::StrategicPlan).
pub fn response_schema() -> Value {
    let strategies: Vec<&str> = Strategy::ALL.iter().map(|s| s.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "direction": {
                "type": "STRING",
                "description": "A clear, concise statement defining the strategic direction of the company."
            },
            "howToWin": {
                "type": "OBJECT",
                "description": "The core competitive strategy.",
                "properties": {
                    "strategy": {
                        "type": "STRING",
                        "enum": strategies,
                        "description": "The chosen strategy: either price leadership or product/service differentiation."
                    },
                    "justification": {
                        "type": "STRING",
                        "description": "A well-reasoned justification for the chosen strategy based on market analysis."
                    }
                },
                "required": ["strategy", "justification"]
            },
            "capabilities": {
                "type": "ARRAY",
                "description": "Key capabilities and resources the company will need to develop or acquire.",
                "items": { "type": "STRING" }
            },
            "leadership": {
                "type": "STRING",
                "description": "The leadership style and team structure required to execute the strategy."
            },
            "goals": titled_items_schema("High-level, long-term goals that align with the mission and vision."),
            "objectives": titled_items_schema("Specific, measurable objectives that contribute to achieving the goals."),
            "initiatives": titled_items_schema("Key strategic initiatives or projects to be undertaken."),
            "tasks": titled_items_schema("Actionable tasks that break down the initiatives into smaller steps.")
        },
        "required": REQUIRED_FIELDS
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::schema::{HowToWin, StrategicPlan};

    #[test]
    fn validate_rejects_blank_fields() {
        assert!(PlanRequest::new("", "x").validate().is_err());
        assert!(PlanRequest::new("x", "   ").validate().is_err());
        assert!(PlanRequest::new("m", "v").validate().is_ok());
    }

    #[test]
    fn validate_error_carries_fixed_message() {
        let err = PlanRequest::new("", "x").validate().unwrap_err();
        assert_eq!(err, GenerationError::InvalidInput("Mission and vision are required.".to_owned()));
    }

    #[test]
    fn from_json_body_treats_non_strings_as_missing() {
        let req = PlanRequest::from_json_body(&json!({ "mission": 42, "vision": "v" }));
        assert_eq!(req.mission, "");
        assert_eq!(req.vision, "v");
        assert!(req.validate().is_err());

        let req = PlanRequest::from_json_body(&json!([]));
        assert!(req.validate().is_err());
    }

    #[test]
    fn prompt_embeds_statements_verbatim() {
        let req = PlanRequest::new(
            "Deliver clean water to rural communities",
            "A world without water scarcity",
        );
        let prompt = build_prompt(&req);
        assert!(prompt.contains("Mission: \"Deliver clean water to rural communities\""));
        assert!(prompt.contains("Vision: \"A world without water scarcity\""));
        assert!(prompt.contains("valid JSON object"));
    }

    #[test]
    fn schema_requires_every_serialized_field() {
        let plan = StrategicPlan {
            direction: String::new(),
            how_to_win: HowToWin {
                strategy: Strategy::Price,
                justification: String::new(),
            },
            capabilities: vec![],
            leadership: String::new(),
            goals: vec![],
            objectives: vec![],
            initiatives: vec![],
            tasks: vec![],
        };
        let value = serde_json::to_value(&plan).unwrap();
        let mut serialized: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        serialized.sort_unstable();

        let schema = response_schema();
        let mut required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        required.sort_unstable();

        assert_eq!(serialized, required);
        for field in REQUIRED_FIELDS {
            assert!(schema["properties"].get(field).is_some(), "schema lacks {field}");
        }
    }

    #[test]
    fn schema_strategy_enum_has_two_values() {
        let schema = response_schema();
        let values = &schema["properties"]["howToWin"]["properties"]["strategy"]["enum"];
        assert_eq!(values, &json!(["PRICE", "DIFFERENTIATION"]));
    }
}

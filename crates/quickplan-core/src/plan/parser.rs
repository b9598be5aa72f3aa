//! Structural parsing of plan JSON.
//!
//! Both the endpoint (on provider output) and the client (on the endpoint
//! response) go through [`parse_plan_json`], so a plan that is missing a
//! required field or carries an unknown strategy never reaches a renderer.

use thiserror::Error;

use super::schema::StrategicPlan;

/// Errors that can occur while parsing plan JSON.
#[derive(Debug, Error)]
pub enum PlanParseError {
    #[error("plan response is empty")]
    Empty,

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trim and parse a JSON document into a [`StrategicPlan`].
pub fn parse_plan_json(content: &str) -> Result<StrategicPlan, PlanParseError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(PlanParseError::Empty);
    }
    Ok(serde_json::from_str(trimmed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::schema::Strategy;

    const VALID: &str = r#"{
        "direction": "d",
        "howToWin": {"strategy": "PRICE", "justification": "j"},
        "capabilities": [],
        "leadership": "l",
        "goals": [],
        "objectives": [],
        "initiatives": [],
        "tasks": []
    }"#;

    #[test]
    fn parses_with_surrounding_whitespace() {
        let plan = parse_plan_json(&format!("\n  {VALID}\n\t")).expect("should parse");
        assert_eq!(plan.how_to_win.strategy, Strategy::Price);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(parse_plan_json("  \n"), Err(PlanParseError::Empty)));
    }

    #[test]
    fn non_json_is_rejected() {
        let err = parse_plan_json("Here is your plan: ...").unwrap_err();
        assert!(matches!(err, PlanParseError::Json(_)));
    }

    #[test]
    fn missing_field_is_rejected() {
        let partial = VALID.replace(r#""leadership": "l","#, "");
        assert!(matches!(parse_plan_json(&partial), Err(PlanParseError::Json(_))));
    }
}

//! Strategic plan data types.
//!
//! These types map directly to the JSON exchanged between the generation
//! endpoint and its clients, and to the object the AI provider is
//! constrained to emit. Every field is required on deserialization; an
//! absent list is represented by `[]`, never by omission.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A generated strategic plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StrategicPlan {
    /// The strategic direction statement.
    pub direction: String,
    /// The core competitive strategy.
    pub how_to_win: HowToWin,
    /// Capabilities to develop or acquire, in presentation order.
    pub capabilities: Vec<String>,
    /// Leadership style and team structure.
    pub leadership: String,
    pub goals: Vec<TitledItem>,
    pub objectives: Vec<TitledItem>,
    pub initiatives: Vec<TitledItem>,
    pub tasks: Vec<TitledItem>,
}

/// The chosen competitive strategy and its justification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HowToWin {
    pub strategy: Strategy,
    pub justification: String,
}

/// A `{title, description}` pair used for goals, objectives, initiatives
/// and tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TitledItem {
    pub title: String,
    pub description: String,
}

impl TitledItem {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Competitive positioning: price leadership or differentiation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    Price,
    Differentiation,
}

impl Strategy {
    /// All variants, in the order they are offered to the provider.
    pub const ALL: [Strategy; 2] = [Strategy::Price, Strategy::Differentiation];

    /// The wire value (`PRICE` / `DIFFERENTIATION`).
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Price => "PRICE",
            Strategy::Differentiation => "DIFFERENTIATION",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRICE" => Ok(Strategy::Price),
            "DIFFERENTIATION" => Ok(Strategy::Differentiation),
            other => Err(format!(
                "invalid strategy {other:?} (expected PRICE or DIFFERENTIATION)"
            )),
        }
    }
}

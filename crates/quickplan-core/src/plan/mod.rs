//! Plan schema, display model, renderings, parsing and generation.

pub mod display;
pub mod format;
pub mod generate;
pub mod parser;
pub mod schema;
pub mod service;

pub use display::{
    EMPTY_PLACEHOLDER, PLAN_TITLE, PlanSection, SectionBody, SectionKind, display_sections,
    strategy_label,
};
pub use format::{to_markdown, to_plain_text};
pub use generate::{PlanRequest, REQUIRED_FIELDS, build_prompt, response_schema};
pub use parser::{PlanParseError, parse_plan_json};
pub use schema::{HowToWin, StrategicPlan, Strategy, TitledItem};
pub use service::{ApiKeySource, generate_plan};

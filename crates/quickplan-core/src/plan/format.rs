//! Plain-text and Markdown renderings of a plan.
//!
//! Both renderers walk [`display_sections`], so section order, labels and
//! the strategy label are shared with the terminal view.

use super::display::{
    EMPTY_PLACEHOLDER, PLAN_TITLE, PlanSection, SectionBody, display_sections, strategy_label,
};
use super::schema::{StrategicPlan, TitledItem};

const TEXT_SECTION_SEPARATOR: &str = "\n\n\n";
const MARKDOWN_SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Render a plan as plain text, one upper-case labelled block per section.
pub fn to_plain_text(plan: &StrategicPlan) -> String {
    display_sections(plan)
        .iter()
        .map(|section| format!("{}\n{}", section.kind.label(), text_body(section)))
        .collect::<Vec<_>>()
        .join(TEXT_SECTION_SEPARATOR)
}

/// Render a plan as a Markdown document.
pub fn to_markdown(plan: &StrategicPlan) -> String {
    let mut blocks = vec![format!("# {PLAN_TITLE}")];
    blocks.extend(
        display_sections(plan)
            .iter()
            .map(|section| format!("## {}\n\n{}", section.kind.heading(), markdown_body(section))),
    );
    blocks.join(MARKDOWN_SECTION_SEPARATOR)
}

fn text_body(section: &PlanSection) -> String {
    match &section.body {
        SectionBody::Text(text) => text.clone(),
        SectionBody::Strategy {
            strategy,
            justification,
        } => format!("Strategy: {}\n{justification}", strategy_label(*strategy)),
        SectionBody::List(items) => bullet_list(items),
        SectionBody::TitledList(items) => titled_items(items, |item| {
            format!("{}\n{}", item.title, item.description)
        }),
    }
}

fn markdown_body(section: &PlanSection) -> String {
    match &section.body {
        SectionBody::Text(text) => text.clone(),
        SectionBody::Strategy {
            strategy,
            justification,
        } => format!(
            "**Strategy:** {}\n\n> {justification}",
            strategy_label(*strategy)
        ),
        SectionBody::List(items) => bullet_list(items),
        SectionBody::TitledList(items) => titled_items(items, |item| {
            format!("### {}\n\n{}", item.title, item.description)
        }),
    }
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return EMPTY_PLACEHOLDER.to_owned();
    }
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn titled_items(items: &[TitledItem], render: impl Fn(&TitledItem) -> String) -> String {
    if items.is_empty() {
        return EMPTY_PLACEHOLDER.to_owned();
    }
    items.iter().map(render).collect::<Vec<_>>().join("\n\n")
}

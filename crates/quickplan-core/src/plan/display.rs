//! Display model: a plan resolved into its eight presentation sections.
//!
//! Each section's content shape is decided once, here, as a
//! [`SectionBody`] variant. Renderers (terminal, plain text, Markdown)
//! match on the variant instead of inspecting the data.

use super::schema::{StrategicPlan, Strategy, TitledItem};

/// Placeholder rendered for an empty list.
pub const EMPTY_PLACEHOLDER: &str = "Not specified.";

/// Heading of the whole plan in rendered output.
pub const PLAN_TITLE: &str = "Quick Strategic Plan";

/// The eight fixed sections of a plan, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Direction,
    HowToWin,
    Capabilities,
    Leadership,
    Goals,
    Objectives,
    Initiatives,
    Tasks,
}

impl SectionKind {
    pub const ALL: [SectionKind; 8] = [
        SectionKind::Direction,
        SectionKind::HowToWin,
        SectionKind::Capabilities,
        SectionKind::Leadership,
        SectionKind::Goals,
        SectionKind::Objectives,
        SectionKind::Initiatives,
        SectionKind::Tasks,
    ];

    /// Title-case heading used on screen and in Markdown.
    pub fn heading(self) -> &'static str {
        match self {
            SectionKind::Direction => "Strategic Direction",
            SectionKind::HowToWin => "How We Will Win",
            SectionKind::Capabilities => "Required Capabilities",
            SectionKind::Leadership => "Leadership Approach",
            SectionKind::Goals => "Goals",
            SectionKind::Objectives => "Objectives",
            SectionKind::Initiatives => "Initiatives",
            SectionKind::Tasks => "Key Tasks",
        }
    }

    /// Upper-case label used in the plain-text rendering.
    pub fn label(self) -> &'static str {
        match self {
            SectionKind::Direction => "STRATEGIC DIRECTION",
            SectionKind::HowToWin => "HOW WE WILL WIN",
            SectionKind::Capabilities => "REQUIRED CAPABILITIES",
            SectionKind::Leadership => "LEADERSHIP APPROACH",
            SectionKind::Goals => "GOALS",
            SectionKind::Objectives => "OBJECTIVES",
            SectionKind::Initiatives => "INITIATIVES",
            SectionKind::Tasks => "KEY TASKS",
        }
    }
}

/// Resolved content of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    Text(String),
    Strategy {
        strategy: Strategy,
        justification: String,
    },
    List(Vec<String>),
    TitledList(Vec<TitledItem>),
}

impl SectionBody {
    /// True for list bodies with no items. Such bodies render as
    /// [`EMPTY_PLACEHOLDER`].
    pub fn is_empty_list(&self) -> bool {
        match self {
            SectionBody::List(items) => items.is_empty(),
            SectionBody::TitledList(items) => items.is_empty(),
            SectionBody::Text(_) | SectionBody::Strategy { .. } => false,
        }
    }
}

/// One section of the display model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSection {
    pub kind: SectionKind,
    pub body: SectionBody,
}

/// The fixed human label for a strategy. Every rendering surface goes
/// through this function.
pub fn strategy_label(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Price => "Price Leadership",
        Strategy::Differentiation => "Differentiation",
    }
}

/// Resolve a plan into its eight sections, in [`SectionKind::ALL`] order.
pub fn display_sections(plan: &StrategicPlan) -> Vec<PlanSection> {
    SectionKind::ALL
        .iter()
        .map(|&kind| PlanSection {
            kind,
            body: section_body(plan, kind),
        })
        .collect()
}

fn section_body(plan: &StrategicPlan, kind: SectionKind) -> SectionBody {
    match kind {
        SectionKind::Direction => SectionBody::Text(plan.direction.clone()),
        SectionKind::HowToWin => SectionBody::Strategy {
            strategy: plan.how_to_win.strategy,
            justification: plan.how_to_win.justification.clone(),
        },
        SectionKind::Capabilities => SectionBody::List(plan.capabilities.clone()),
        SectionKind::Leadership => SectionBody::Text(plan.leadership.clone()),
        SectionKind::Goals => SectionBody::TitledList(plan.goals.clone()),
        SectionKind::Objectives => SectionBody::TitledList(plan.objectives.clone()),
        SectionKind::Initiatives => SectionBody::TitledList(plan.initiatives.clone()),
        SectionKind::Tasks => SectionBody::TitledList(plan.tasks.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::schema::HowToWin;

    fn plan() -> StrategicPlan {
        StrategicPlan {
            direction: "North".to_owned(),
            how_to_win: HowToWin {
                strategy: Strategy::Price,
                justification: "Cheap".to_owned(),
            },
            capabilities: vec![],
            leadership: "Lead".to_owned(),
            goals: vec![TitledItem::new("g", "gd")],
            objectives: vec![],
            initiatives: vec![],
            tasks: vec![TitledItem::new("t", "td")],
        }
    }

    #[test]
    fn sections_follow_fixed_order() {
        let kinds: Vec<_> = display_sections(&plan()).iter().map(|s| s.kind).collect();
        assert_eq!(kinds, SectionKind::ALL.to_vec());
    }

    #[test]
    fn bodies_are_resolved_per_kind() {
        let sections = display_sections(&plan());
        assert_eq!(sections[0].body, SectionBody::Text("North".to_owned()));
        assert_eq!(
            sections[1].body,
            SectionBody::Strategy {
                strategy: Strategy::Price,
                justification: "Cheap".to_owned()
            }
        );
        assert_eq!(sections[2].body, SectionBody::List(vec![]));
        assert!(matches!(sections[7].body, SectionBody::TitledList(ref items) if items.len() == 1));
    }

    #[test]
    fn empty_lists_are_flagged() {
        let sections = display_sections(&plan());
        assert!(sections[2].body.is_empty_list());
        assert!(!sections[4].body.is_empty_list());
        assert!(!sections[0].body.is_empty_list());
        // An empty direction string is text, not an empty list.
        assert!(!SectionBody::Text(String::new()).is_empty_list());
    }

    #[test]
    fn strategy_labels_are_fixed() {
        assert_eq!(strategy_label(Strategy::Price), "Price Leadership");
        assert_eq!(strategy_label(Strategy::Differentiation), "Differentiation");
    }

    #[test]
    fn labels_are_upper_case_headings() {
        for kind in SectionKind::ALL {
            assert_eq!(kind.label(), kind.heading().to_uppercase());
        }
    }
}

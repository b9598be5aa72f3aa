//! TUI rendering using ratatui.

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use quickplan_core::plan::{
    EMPTY_PLACEHOLDER, PLAN_TITLE, PlanSection, SectionBody, strategy_label,
};

use super::app::{App, Field, View};

/// Render the current view.
pub fn render(f: &mut Frame, app: &App) {
    let hint_height = if show_export_hints(app) { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),              // main content
            Constraint::Length(hint_height), // export controls
            Constraint::Length(1),           // status bar
        ])
        .split(f.area());

    match app.current_view {
        View::Form => render_form(f, app, chunks[0]),
        View::Plan => render_plan(f, app, chunks[0]),
        View::Help => render_help(f, chunks[0]),
    }

    if hint_height > 0 {
        render_export_hints(f, app, chunks[1]);
    }
    render_status_bar(f, app, chunks[2]);

    if let Some(note) = &app.notification {
        render_notification(f, &note.title, &note.message);
    }
}

fn show_export_hints(app: &App) -> bool {
    app.current_view == View::Plan && app.controls.visible
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // mission
            Constraint::Length(5), // vision
            Constraint::Length(2), // submit / busy
            Constraint::Min(0),    // error
        ])
        .split(area);

    render_input(f, "Mission", &app.mission, app.focus == Field::Mission, chunks[0]);
    render_input(f, "Vision", &app.vision, app.focus == Field::Vision, chunks[1]);

    let action = if app.loading {
        Line::from(Span::styled(
            " Generating...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(vec![
            Span::styled(" [Enter] ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Generate Plan"),
        ])
    };
    f.render_widget(Paragraph::new(action), chunks[2]);

    if let Some(error) = &app.error {
        let p = Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
            .wrap(Wrap { trim: true });
        f.render_widget(p, chunks[3]);
    }
}

fn render_input(f: &mut Frame, title: &str, value: &str, focused: bool, area: Rect) {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let text = if focused {
        format!("{value}_")
    } else {
        value.to_string()
    };
    let input = Paragraph::new(text).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {title} ")),
    );
    f.render_widget(input, area);
}

fn render_plan(f: &mut Frame, app: &App, area: Rect) {
    let p = Paragraph::new(plan_lines(&app.sections))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {PLAN_TITLE} ")),
        );
    f.render_widget(p, area);
}

/// Screen rendering of the display model.
pub fn plan_lines(sections: &[PlanSection]) -> Vec<Line<'static>> {
    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let muted = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC);

    let mut lines = Vec::new();
    for section in sections {
        lines.push(Line::from(Span::styled(section.kind.heading(), heading)));

        if section.body.is_empty_list() {
            lines.push(Line::from(Span::styled(EMPTY_PLACEHOLDER, muted)));
        } else {
            match &section.body {
                SectionBody::Text(text) => lines.push(Line::from(text.clone())),
                SectionBody::Strategy {
                    strategy,
                    justification,
                } => {
                    lines.push(Line::from(vec![
                        Span::raw("Strategy: "),
                        Span::styled(strategy_label(*strategy), bold),
                    ]));
                    lines.push(Line::from(Span::styled(
                        justification.clone(),
                        Style::default().add_modifier(Modifier::ITALIC),
                    )));
                }
                SectionBody::List(items) => {
                    lines.extend(items.iter().map(|item| Line::from(format!("  • {item}"))));
                }
                SectionBody::TitledList(items) => {
                    for item in items {
                        lines.push(Line::from(Span::styled(item.title.clone(), bold)));
                        lines.push(Line::from(format!("  {}", item.description)));
                    }
                }
            }
        }
        lines.push(Line::default());
    }
    lines
}

fn render_help(f: &mut Frame, area: Rect) {
    let keys = [
        ("Tab", "Switch between Mission and Vision"),
        ("Enter", "Generate plan"),
        ("j / k", "Scroll plan"),
        ("y", "Copy plan as text"),
        ("m", "Save Markdown file"),
        ("e", "Open email draft"),
        ("p", "Save PDF"),
        ("n", "New plan"),
        ("q / Esc", "Back / quit"),
        ("Ctrl-C", "Quit"),
    ];
    let lines: Vec<Line> = keys
        .iter()
        .map(|(k, desc)| {
            Line::from(vec![
                Span::styled(format!("  {k:<10}"), Style::default().fg(Color::Yellow)),
                Span::raw(*desc),
            ])
        })
        .collect();

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help (press any key to return) "),
    );
    f.render_widget(help, area);
}

fn render_export_hints(f: &mut Frame, app: &App, area: Rect) {
    let key = Style::default().fg(Color::Yellow);
    let bar = Line::from(vec![
        Span::styled(" y", key),
        Span::raw(format!(":{}  ", app.copy_feedback.label(Instant::now()))),
        Span::styled("m", key),
        Span::raw(":Markdown  "),
        Span::styled("e", key),
        Span::raw(":Email  "),
        Span::styled("p", key),
        Span::raw(":PDF"),
    ]);
    f.render_widget(Paragraph::new(bar), area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let view_name = match app.current_view {
        View::Form => "New Plan",
        View::Plan => "Plan",
        View::Help => "Help",
    };

    let status_msg = app.status_message.as_deref().unwrap_or("");

    let bar = Line::from(vec![
        Span::styled(
            format!(" {view_name} "),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(status_msg, Style::default().fg(Color::Green)),
        Span::raw("  Esc:back  ?:help"),
    ]);

    f.render_widget(Paragraph::new(bar), area);
}

fn render_notification(f: &mut Frame, title: &str, message: &str) {
    let area = centered(f.area(), 50, 7);
    let body = vec![
        Line::from(message.to_string()),
        Line::default(),
        Line::from(Span::styled(
            "Press any key to dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let popup = Paragraph::new(body).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(format!(" {title} ")),
    );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

// -- Helpers --

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

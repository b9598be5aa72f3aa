//! Interactive terminal app: enter a mission and vision, generate a plan,
//! read it and export it.

pub mod app;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use quickplan_core::PlanClient;
use quickplan_core::export::Osc52Clipboard;

use app::{Action, App};

/// Launch the interactive app. Exports are written to `export_dir`.
pub async fn run_app(client: PlanClient, export_dir: PathBuf) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client, export_dir);

    let result = run_event_loop(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let tick_rate = app.tick_rate;

    loop {
        app.poll_generation();
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match app.handle_key(key) {
                    Action::None => {}
                    Action::Copy => {
                        let mut clipboard = Osc52Clipboard::new(io::stdout());
                        app.copy(&mut clipboard, Instant::now());
                    }
                    Action::ExportDocument => {
                        app.export_document().await;
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

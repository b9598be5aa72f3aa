//! TUI application state: the input form, the in-flight generation, the
//! rendered plan and its export actions.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use quickplan_core::export::{
    Clipboard, CopyFeedback, DOCUMENT_FILE_NAME, DocumentRenderer, ExportControls, ExportError,
    PdfOutput, copy_plan, export_plan_document, mailto_uri, open_in_mail_client, pdf_renderer,
    save_markdown,
};
use quickplan_core::plan::{PlanRequest, PlanSection, StrategicPlan, display_sections};
use quickplan_core::{GenerationError, PlanClient};

/// Which view the TUI is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Form,
    Plan,
    Help,
}

/// Which form input receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Mission,
    Vision,
}

/// Work the event loop must do outside [`App::handle_key`] because it
/// needs the terminal or has to be awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Copy,
    ExportDocument,
}

/// A modal message that stays up until any key is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

/// Visibility of the export hint bar. Hidden while a document capture
/// runs so it is not part of the captured regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlBar {
    pub visible: bool,
}

impl ExportControls for ControlBar {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

type PendingPlan = oneshot::Receiver<Result<StrategicPlan, GenerationError>>;

/// Application state for the TUI.
pub struct App {
    pub client: PlanClient,
    pub current_view: View,
    previous_view: View,
    pub mission: String,
    pub vision: String,
    pub focus: Field,
    pub plan: Option<StrategicPlan>,
    pub sections: Vec<PlanSection>,
    pub scroll: u16,
    pub loading: bool,
    pending: Option<PendingPlan>,
    pub error: Option<String>,
    pub notification: Option<Notification>,
    pub copy_feedback: CopyFeedback,
    pub controls: ControlBar,
    pub export_dir: PathBuf,
    /// Document renderer for the plan on screen. Rebuilt with every new
    /// plan.
    pub renderer: Option<DocumentRenderer>,
    pub tick_rate: Duration,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(client: PlanClient, export_dir: PathBuf) -> Self {
        Self {
            client,
            current_view: View::Form,
            previous_view: View::Form,
            mission: String::new(),
            vision: String::new(),
            focus: Field::Mission,
            plan: None,
            sections: Vec::new(),
            scroll: 0,
            loading: false,
            pending: None,
            error: None,
            notification: None,
            copy_feedback: CopyFeedback::default(),
            controls: ControlBar { visible: true },
            export_dir,
            renderer: None,
            tick_rate: Duration::from_millis(200),
            should_quit: false,
            status_message: None,
        }
    }

    // -- Keys --

    /// Apply a key press. Returns the follow-up the event loop must run.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Action::None;
        }

        // A notification swallows the key that dismisses it.
        if self.notification.take().is_some() {
            return Action::None;
        }
        self.status_message = None;

        match self.current_view {
            View::Form => self.handle_form_key(key),
            View::Plan => return self.handle_plan_key(key),
            View::Help => self.navigate_back(),
        }
        Action::None
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.plan.is_some() {
                    self.current_view = View::Plan;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.toggle_focus(),
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.focused_input().pop();
            }
            KeyCode::Char(c) => self.focused_input().push(c),
            _ => {}
        }
    }

    fn handle_plan_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.navigate_back(),
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),
            KeyCode::Char('n') => self.current_view = View::Form,
            KeyCode::Char('?') => self.show_help(),
            KeyCode::Char('y') => return Action::Copy,
            KeyCode::Char('m') => self.save_markdown(),
            KeyCode::Char('e') => self.email(),
            KeyCode::Char('p') => return Action::ExportDocument,
            _ => {}
        }
        Action::None
    }

    // -- Form --

    fn focused_input(&mut self) -> &mut String {
        match self.focus {
            Field::Mission => &mut self.mission,
            Field::Vision => &mut self.vision,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Mission => Field::Vision,
            Field::Vision => Field::Mission,
        };
    }

    /// Start a generation on a background task, unless one is already in
    /// flight or the input is blank.
    pub fn submit(&mut self) {
        if self.loading {
            return;
        }
        let request = PlanRequest::new(self.mission.clone(), self.vision.clone());
        if let Err(e) = request.validate() {
            self.error = Some(e.user_message().to_string());
            return;
        }

        self.error = None;
        self.plan = None;
        self.renderer = None;
        self.sections.clear();
        self.scroll = 0;
        self.loading = true;

        let (tx, rx) = oneshot::channel();
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client.generate(&request.mission, &request.vision).await;
            let _ = tx.send(result);
        });
        self.pending = Some(rx);
    }

    /// Pick up the result of the in-flight generation, if it has arrived.
    pub fn poll_generation(&mut self) {
        let Some(rx) = self.pending.as_mut() else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => Err(GenerationError::UpstreamFailure),
        };
        self.pending = None;
        self.finish_generation(outcome);
    }

    pub fn finish_generation(&mut self, outcome: Result<StrategicPlan, GenerationError>) {
        self.loading = false;
        match outcome {
            Ok(plan) => {
                tracing::info!("plan received");
                self.sections = display_sections(&plan);
                self.renderer = Some(pdf_renderer(
                    self.sections.clone(),
                    PdfOutput::Dir(self.export_dir.clone()),
                ));
                self.plan = Some(plan);
                self.scroll = 0;
                self.current_view = View::Plan;
            }
            Err(e) => {
                tracing::warn!(error = %e, "plan generation failed");
                self.error = Some(e.user_message().to_string());
            }
        }
    }

    // -- Navigation --

    pub fn navigate_back(&mut self) {
        match self.current_view {
            View::Form => self.should_quit = true,
            View::Plan => self.current_view = View::Form,
            View::Help => self.current_view = self.previous_view,
        }
    }

    pub fn show_help(&mut self) {
        if self.current_view != View::Help {
            self.previous_view = self.current_view;
            self.current_view = View::Help;
        }
    }

    pub fn move_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    // -- Exports --

    fn notify(&mut self, err: &ExportError) {
        tracing::error!(error = %err, "export failed");
        self.notification = Some(Notification {
            title: "Export failed".to_string(),
            message: err.user_message().to_string(),
        });
    }

    pub fn copy(&mut self, clipboard: &mut dyn Clipboard, now: Instant) {
        let Some(plan) = self.plan.as_ref() else {
            return;
        };
        if let Err(e) = copy_plan(plan, clipboard, &mut self.copy_feedback, now) {
            self.notify(&e);
        }
    }

    pub fn save_markdown(&mut self) {
        let Some(plan) = self.plan.as_ref() else {
            return;
        };
        match save_markdown(plan, &self.export_dir) {
            Ok(path) => self.status_message = Some(format!("Saved {}", path.display())),
            Err(e) => self.notify(&e),
        }
    }

    pub fn email(&mut self) {
        let Some(plan) = self.plan.as_ref() else {
            return;
        };
        match open_in_mail_client(&mailto_uri(plan)) {
            Ok(()) => self.status_message = Some("Opened email draft".to_string()),
            Err(e) => self.notify(&e),
        }
    }

    pub async fn export_document(&mut self) {
        if self.plan.is_none() {
            return;
        }
        match export_plan_document(self.renderer.as_ref(), &mut self.controls).await {
            Ok(pages) => {
                let path = self.export_dir.join(DOCUMENT_FILE_NAME);
                self.status_message =
                    Some(format!("Saved {} ({pages} pages)", path.display()));
            }
            Err(e) => self.notify(&e),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

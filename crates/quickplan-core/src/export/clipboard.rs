//! Copy-to-clipboard with a transient confirmation state.

use std::io::Write;
use std::time::{Duration, Instant};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, error};

use crate::plan::{StrategicPlan, to_plain_text};

use super::ExportError;

/// How long the "Copied!" confirmation stays visible.
pub const COPY_CONFIRMATION: Duration = Duration::from_secs(2);

/// A destination for copied text.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ExportError>;
}

/// Clipboard that emits an OSC 52 escape sequence, which most terminal
/// emulators (including over SSH) forward to the system clipboard.
#[derive(Debug)]
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn set_text(&mut self, text: &str) -> Result<(), ExportError> {
        let payload = STANDARD.encode(text.as_bytes());
        write!(self.out, "\x1b]52;c;{payload}\x07")
            .and_then(|()| self.out.flush())
            .map_err(|e| ExportError::Clipboard(e.to_string()))
    }
}

/// Label state of the copy control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyFeedback {
    copied_at: Option<Instant>,
}

impl CopyFeedback {
    pub fn mark_copied(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    /// True while the confirmation should still be shown.
    pub fn is_confirming(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < COPY_CONFIRMATION)
    }

    pub fn label(&self, now: Instant) -> &'static str {
        if self.is_confirming(now) {
            "Copied!"
        } else {
            "Copy"
        }
    }
}

/// Copy the plain-text rendering of `plan` and start the confirmation.
///
/// On failure the feedback state is left untouched.
pub fn copy_plan(
    plan: &StrategicPlan,
    clipboard: &mut dyn Clipboard,
    feedback: &mut CopyFeedback,
    now: Instant,
) -> Result<(), ExportError> {
    let text = to_plain_text(plan);
    match clipboard.set_text(&text) {
        Ok(()) => {
            debug!(bytes = text.len(), "plan copied to clipboard");
            feedback.mark_copied(now);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "failed to copy plan");
            Err(e)
        }
    }
}

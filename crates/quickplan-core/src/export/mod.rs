//! Export actions for a generated plan: clipboard, Markdown file, email
//! draft and paginated PDF document.
//!
//! Anything that touches the outside world (terminal clipboard, region
//! capture, document assembly) is reached through a trait so the logic
//! here can run without a real rendering environment.

pub mod clipboard;
pub mod document;
pub mod mailto;
pub mod markdown;
pub mod pdf;
pub mod raster;

use thiserror::Error;

pub use clipboard::{COPY_CONFIRMATION, Clipboard, CopyFeedback, Osc52Clipboard, copy_plan};
pub use document::{
    CapturedImage, DocumentRenderer, ExportControls, PAGE_MARGIN, PageDocument, PageLayout,
    PageSize, Placement, REGION_GAP, Region, RegionCapture, export_document, export_plan_document,
    plan_regions,
};
pub use mailto::{EMAIL_SUBJECT, encode_uri_component, mailto_uri, open_in_mail_client};
pub use markdown::{MARKDOWN_FILE_NAME, save_markdown};
pub use pdf::{PdfOutput, PdfPageDocument, pdf_renderer};
pub use raster::PlanRasterizer;

/// File name used for the paginated document export.
pub const DOCUMENT_FILE_NAME: &str = "quick-strategic-plan.pdf";

/// Errors raised by export actions. Each is reported to the user on its
/// own and never aborts the view.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("clipboard write failed: {0}")]
    Clipboard(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to capture {region}: {message}")]
    Capture { region: String, message: String },

    #[error("document assembly failed: {0}")]
    Document(String),

    #[error("document rendering resources are not available")]
    RenderingUnavailable,

    #[error("failed to open {target}: {message}")]
    Open { target: String, message: String },
}

impl ExportError {
    /// Short message suitable for a blocking notification.
    pub fn user_message(&self) -> &'static str {
        match self {
            ExportError::Clipboard(_) => "Failed to copy text.",
            ExportError::Io(_) => "Failed to save the file.",
            ExportError::Capture { .. } | ExportError::Document(_) => {
                "An error occurred while generating the PDF."
            }
            ExportError::RenderingUnavailable => {
                "Could not generate PDF. Document rendering is not available."
            }
            ExportError::Open { .. } => "Could not open the mail client.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_are_generic() {
        let err = ExportError::Capture {
            region: "Goals".to_owned(),
            message: "canvas tainted".to_owned(),
        };
        assert_eq!(err.user_message(), "An error occurred while generating the PDF.");
        assert!(!err.user_message().contains("canvas"));
        assert_eq!(
            ExportError::Clipboard("denied".to_owned()).user_message(),
            "Failed to copy text."
        );
    }
}

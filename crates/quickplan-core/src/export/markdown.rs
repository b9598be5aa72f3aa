//! Markdown file download.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::plan::{StrategicPlan, to_markdown};

use super::ExportError;

/// File name of the Markdown export.
pub const MARKDOWN_FILE_NAME: &str = "quick-strategic-plan.md";

/// Write the Markdown rendering of `plan` into `dir` as UTF-8 and return
/// the path written. An existing file is overwritten.
pub fn save_markdown(plan: &StrategicPlan, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(MARKDOWN_FILE_NAME);
    std::fs::write(&path, to_markdown(plan))?;
    info!(path = %path.display(), "markdown export written");
    Ok(path)
}

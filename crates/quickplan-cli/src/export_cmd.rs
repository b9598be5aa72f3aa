use std::io::Write;
use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;

use quickplan_core::export::{
    DOCUMENT_FILE_NAME, ExportControls, PdfOutput, export_plan_document, mailto_uri,
    open_in_mail_client, pdf_renderer, save_markdown,
};
use quickplan_core::plan::{
    StrategicPlan, display_sections, parse_plan_json, to_markdown, to_plain_text,
};

/// Output rendering of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    /// Upper-case labelled plain text
    Text,
    /// Markdown document
    Markdown,
    /// The plan as JSON, readable by `quickplan export`
    Json,
    /// A `mailto:` URI carrying the plain-text plan
    Mailto,
    /// Paginated A4 PDF, written to a file or directory
    Pdf,
}

/// Export controls of a command: there is nothing on screen to hide.
struct NoControls;

impl ExportControls for NoControls {
    fn set_visible(&mut self, _visible: bool) {}
}

pub fn render(plan: &StrategicPlan, format: PlanFormat) -> anyhow::Result<String> {
    Ok(match format {
        PlanFormat::Text => to_plain_text(plan),
        PlanFormat::Markdown => to_markdown(plan),
        PlanFormat::Json => {
            serde_json::to_string_pretty(plan).context("failed to serialize plan")?
        }
        PlanFormat::Mailto => mailto_uri(plan),
        PlanFormat::Pdf => anyhow::bail!("pdf output has no text rendering"),
    })
}

/// Write a rendered plan to `output`, or stdout when absent.
///
/// A Markdown or PDF export aimed at an existing directory is saved there
/// under its fixed file name. A PDF without `output` goes to the current
/// directory.
pub async fn write_plan(
    plan: &StrategicPlan,
    format: PlanFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    if format == PlanFormat::Pdf {
        return write_pdf(plan, output).await;
    }

    if let Some(dir) = output.filter(|p| p.is_dir()) {
        anyhow::ensure!(
            format == PlanFormat::Markdown,
            "{} is a directory; only markdown and pdf can be saved into a directory",
            dir.display()
        );
        let path = save_markdown(plan, dir)
            .with_context(|| format!("cannot save markdown into {}", dir.display()))?;
        println!("Saved {}", path.display());
        return Ok(());
    }

    let rendered = render(plan, format)?;
    match output {
        Some(path) => {
            // Files get the rendering byte for byte, like the app's exports.
            std::fs::write(path, &rendered)
                .with_context(|| format!("cannot write output file: {}", path.display()))?;
            println!("Exported plan to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{rendered}")?;
            stdout.flush()?;
        }
    }
    Ok(())
}

async fn write_pdf(plan: &StrategicPlan, output: Option<&Path>) -> anyhow::Result<()> {
    let (target, path) = match output {
        Some(p) if !p.is_dir() => (PdfOutput::File(p.to_path_buf()), p.to_path_buf()),
        Some(dir) => (PdfOutput::Dir(dir.to_path_buf()), dir.join(DOCUMENT_FILE_NAME)),
        None => {
            let dir = std::env::current_dir().context("cannot determine current directory")?;
            let path = dir.join(DOCUMENT_FILE_NAME);
            (PdfOutput::Dir(dir), path)
        }
    };

    let renderer = pdf_renderer(display_sections(plan), target);
    let pages = export_plan_document(Some(&renderer), &mut NoControls)
        .await
        .with_context(|| format!("cannot write pdf to {}", path.display()))?;
    println!("Saved {} ({pages} pages)", path.display());
    Ok(())
}

/// Export a plan previously saved with `--format json`.
pub async fn run_export(
    file: &Path,
    format: PlanFormat,
    output: Option<&Path>,
    open_mail: bool,
) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read plan file {}", file.display()))?;
    let plan = parse_plan_json(&contents)
        .with_context(|| format!("{} is not a valid strategic plan", file.display()))?;

    if open_mail {
        open_in_mail_client(&mailto_uri(&plan)).context("failed to open mail client")?;
        return Ok(());
    }
    write_plan(&plan, format, output).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickplan_test_utils::{sample_plan, sample_plan_json};

    #[test]
    fn json_render_roundtrips() {
        let rendered = render(&sample_plan(), PlanFormat::Json).unwrap();
        assert_eq!(parse_plan_json(&rendered).unwrap(), sample_plan());
    }

    #[tokio::test]
    async fn markdown_into_directory_uses_fixed_name() {
        let tmp = tempfile::TempDir::new().unwrap();
        write_plan(&sample_plan(), PlanFormat::Markdown, Some(tmp.path()))
            .await
            .unwrap();
        let written = std::fs::read_to_string(tmp.path().join("quick-strategic-plan.md")).unwrap();
        assert_eq!(written, to_markdown(&sample_plan()));
    }

    #[tokio::test]
    async fn text_into_directory_is_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(
            write_plan(&sample_plan(), PlanFormat::Text, Some(tmp.path()))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn markdown_file_matches_app_export_bytes() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("plan.md");
        write_plan(&sample_plan(), PlanFormat::Markdown, Some(&file))
            .await
            .unwrap();
        let saved = save_markdown(&sample_plan(), tmp.path()).unwrap();

        assert_eq!(std::fs::read(&file).unwrap(), std::fs::read(saved).unwrap());
    }

    #[tokio::test]
    async fn pdf_written_to_file_and_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("custom.pdf");
        write_plan(&sample_plan(), PlanFormat::Pdf, Some(&file))
            .await
            .unwrap();
        assert!(std::fs::read(&file).unwrap().starts_with(b"%PDF-"));

        write_plan(&sample_plan(), PlanFormat::Pdf, Some(tmp.path()))
            .await
            .unwrap();
        assert!(tmp.path().join("quick-strategic-plan.pdf").exists());
    }

    #[test]
    fn pdf_has_no_text_rendering() {
        assert!(render(&sample_plan(), PlanFormat::Pdf).is_err());
    }

    #[tokio::test]
    async fn export_writes_requested_format_to_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let input = tmp.path().join("plan.json");
        std::fs::write(&input, sample_plan_json()).unwrap();
        let out = tmp.path().join("plan.txt");

        run_export(&input, PlanFormat::Text, Some(&out), false)
            .await
            .unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written, to_plain_text(&sample_plan()));
    }

    #[tokio::test]
    async fn export_rejects_incomplete_plan() {
        let tmp = tempfile::TempDir::new().unwrap();
        let input = tmp.path().join("plan.json");
        std::fs::write(&input, r#"{"direction":"d"}"#).unwrap();

        let err = run_export(&input, PlanFormat::Text, None, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not a valid strategic plan"));
    }
}

//! Document export through the real rasterizer and PDF writer.

use quickplan_core::export::{
    DOCUMENT_FILE_NAME, ExportControls, PdfOutput, export_plan_document, pdf_renderer,
};
use quickplan_core::plan::{TitledItem, display_sections};
use quickplan_test_utils::sample_plan;

#[derive(Default)]
struct Controls {
    history: Vec<bool>,
}

impl ExportControls for Controls {
    fn set_visible(&mut self, visible: bool) {
        self.history.push(visible);
    }
}

#[tokio::test]
async fn long_plan_is_written_across_pages() {
    let tmp = tempfile::TempDir::new().unwrap();
    let mut plan = sample_plan();
    plan.tasks = (1..=40)
        .map(|i| TitledItem::new(format!("Task {i}"), format!("Complete step {i} of the rollout.")))
        .collect();

    let renderer = pdf_renderer(
        display_sections(&plan),
        PdfOutput::Dir(tmp.path().to_path_buf()),
    );
    let mut controls = Controls::default();
    let pages = export_plan_document(Some(&renderer), &mut controls)
        .await
        .unwrap();

    assert!(pages >= 2, "expected several pages, got {pages}");
    assert_eq!(controls.history, vec![false, true]);
    let bytes = std::fs::read(tmp.path().join(DOCUMENT_FILE_NAME)).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn short_plan_fits_one_page() {
    let tmp = tempfile::TempDir::new().unwrap();
    let target = tmp.path().join("plan.pdf");

    let renderer = pdf_renderer(
        display_sections(&sample_plan()),
        PdfOutput::File(target.clone()),
    );
    let pages = export_plan_document(Some(&renderer), &mut Controls::default())
        .await
        .unwrap();

    assert_eq!(pages, 1);
    assert!(target.exists());
}

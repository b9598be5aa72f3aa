//! PDF-backed [`PageDocument`].
//!
//! Placed images are collected per page and the PDF is only assembled in
//! [`PageDocument::save`]. The printpdf document is not `Send`, and the
//! document under construction must be.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use image::{DynamicImage, RgbImage};
use printpdf::{Image, ImageTransform, Mm};
use tracing::debug;

use crate::plan::{PLAN_TITLE, PlanSection};

use super::ExportError;
use super::document::{CapturedImage, DocumentRenderer, PageDocument, PageSize, Placement};
use super::raster::PlanRasterizer;

/// Images are embedded at 72 dpi, so one pixel is one point before
/// scaling.
const IMAGE_DPI: f32 = 72.0;

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

/// Where a saved document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfOutput {
    /// Into this directory under the file name passed to `save`.
    Dir(PathBuf),
    /// To exactly this path.
    File(PathBuf),
}

impl PdfOutput {
    fn resolve(&self, file_name: &str) -> PathBuf {
        match self {
            PdfOutput::Dir(dir) => dir.join(file_name),
            PdfOutput::File(path) => path.clone(),
        }
    }
}

struct PlacedImage {
    image: DynamicImage,
    placement: Placement,
}

pub struct PdfPageDocument {
    size: PageSize,
    pages: Vec<Vec<PlacedImage>>,
    output: PdfOutput,
}

impl PdfPageDocument {
    pub fn new(size: PageSize, output: PdfOutput) -> Self {
        Self {
            size,
            pages: vec![Vec::new()],
            output,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn transform(&self, image: &DynamicImage, placement: &Placement) -> ImageTransform {
        let scale = placement.width / image.width() as f32;
        // PDF coordinates grow upwards from the bottom-left corner.
        let bottom = self.size.height - placement.y - placement.height;
        ImageTransform {
            translate_x: Some(mm(placement.x)),
            translate_y: Some(mm(bottom)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        }
    }
}

impl PageDocument for PdfPageDocument {
    fn page_size(&self) -> PageSize {
        self.size
    }

    fn add_page(&mut self) -> Result<(), ExportError> {
        self.pages.push(Vec::new());
        Ok(())
    }

    fn add_image(
        &mut self,
        image: &CapturedImage,
        placement: &Placement,
    ) -> Result<(), ExportError> {
        if image.width == 0 || image.height == 0 {
            debug!(page = placement.page, "skipping empty image");
            return Ok(());
        }
        let buffer = RgbImage::from_raw(image.width, image.height, image.rgb.clone())
            .ok_or_else(|| {
                ExportError::Document(format!(
                    "image buffer of {} bytes does not match {}x{} RGB",
                    image.rgb.len(),
                    image.width,
                    image.height
                ))
            })?;
        let page = self.pages.get_mut(placement.page).ok_or_else(|| {
            ExportError::Document(format!("page {} has not been added", placement.page))
        })?;
        page.push(PlacedImage {
            image: DynamicImage::ImageRgb8(buffer),
            placement: *placement,
        });
        Ok(())
    }

    fn save(&mut self, file_name: &str) -> Result<(), ExportError> {
        let width = mm(self.size.width);
        let height = mm(self.size.height);

        let (doc, first_page, first_layer) =
            printpdf::PdfDocument::new(PLAN_TITLE, width, height, "Plan");
        let mut layers = vec![doc.get_page(first_page).get_layer(first_layer)];
        for _ in 1..self.pages.len() {
            let (page, layer) = doc.add_page(width, height, "Plan");
            layers.push(doc.get_page(page).get_layer(layer));
        }

        for (layer, images) in layers.iter().zip(&self.pages) {
            for placed in images {
                let transform = self.transform(&placed.image, &placed.placement);
                Image::from_dynamic_image(&placed.image).add_to_layer(layer.clone(), transform);
            }
        }

        let path = self.output.resolve(file_name);
        let file = File::create(&path)?;
        doc.save(&mut BufWriter::new(file)).map_err(|e| {
            ExportError::Document(format!("failed to write {}: {e:?}", path.display()))
        })?;
        debug!(path = %path.display(), pages = self.pages.len(), "pdf written");
        Ok(())
    }
}

/// Renderer that rasterizes `sections` and writes an A4 PDF to `output`.
pub fn pdf_renderer(sections: Vec<PlanSection>, output: PdfOutput) -> DocumentRenderer {
    DocumentRenderer {
        capture: Box::new(PlanRasterizer::new(sections)),
        new_document: Box::new(move || {
            Box::new(PdfPageDocument::new(PageSize::A4, output.clone()))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(width: u32, height: u32) -> CapturedImage {
        CapturedImage {
            width,
            height,
            rgb: vec![255; (width * height * 3) as usize],
        }
    }

    fn at(page: usize) -> Placement {
        Placement {
            page,
            x: 40.0,
            y: 40.0,
            width: 515.28,
            height: 100.0,
        }
    }

    #[test]
    fn writes_pdf_with_every_page() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut doc = PdfPageDocument::new(PageSize::A4, PdfOutput::Dir(tmp.path().to_path_buf()));

        doc.add_image(&white(100, 20), &at(0)).unwrap();
        doc.add_page().unwrap();
        doc.add_image(&white(100, 20), &at(1)).unwrap();
        assert_eq!(doc.page_count(), 2);
        doc.save("plan.pdf").unwrap();

        let bytes = std::fs::read(tmp.path().join("plan.pdf")).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn file_output_ignores_default_name() {
        let tmp = tempfile::TempDir::new().unwrap();
        let target = tmp.path().join("custom.pdf");
        let mut doc = PdfPageDocument::new(PageSize::A4, PdfOutput::File(target.clone()));
        doc.add_image(&white(10, 10), &at(0)).unwrap();
        doc.save("quick-strategic-plan.pdf").unwrap();

        assert!(target.exists());
        assert!(!tmp.path().join("quick-strategic-plan.pdf").exists());
    }

    #[test]
    fn mismatched_buffer_is_document_error() {
        let mut doc = PdfPageDocument::new(PageSize::A4, PdfOutput::Dir(std::env::temp_dir()));
        let bad = CapturedImage {
            width: 10,
            height: 10,
            rgb: vec![0; 7],
        };
        let err = doc.add_image(&bad, &at(0)).unwrap_err();
        assert!(matches!(err, ExportError::Document(_)));
        assert_eq!(
            err.user_message(),
            "An error occurred while generating the PDF."
        );
    }

    #[test]
    fn image_on_unknown_page_is_rejected() {
        let mut doc = PdfPageDocument::new(PageSize::A4, PdfOutput::Dir(std::env::temp_dir()));
        let err = doc.add_image(&white(10, 10), &at(3)).unwrap_err();
        assert!(matches!(err, ExportError::Document(_)));
    }

    #[test]
    fn unwritable_target_is_io_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = tmp.path().join("no-such-dir");
        let mut doc = PdfPageDocument::new(PageSize::A4, PdfOutput::Dir(missing));
        let err = doc.save("plan.pdf").unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}

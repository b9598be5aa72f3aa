//! Paginated document export.
//!
//! The visible plan is split into regions (header, then each section in
//! document order). Each region is captured as an image, scaled to the
//! page content width and stacked down the page; a region that would
//! cross the bottom margin starts a new page. Capture and document
//! assembly are injected via [`RegionCapture`] and [`PageDocument`].

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::plan::SectionKind;

use super::{DOCUMENT_FILE_NAME, ExportError};

/// Page margin on every side, in points.
pub const PAGE_MARGIN: f32 = 40.0;

/// Vertical gap between consecutive regions, in points.
pub const REGION_GAP: f32 = 10.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// A4 portrait.
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };
}

/// A capturable block of the rendered plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Header,
    Section(SectionKind),
}

impl Region {
    pub fn name(&self) -> &'static str {
        match self {
            Region::Header => "header",
            Region::Section(kind) => kind.heading(),
        }
    }
}

/// Regions of a plan in capture order: header first, then all eight
/// sections.
pub fn plan_regions() -> Vec<Region> {
    std::iter::once(Region::Header)
        .chain(SectionKind::ALL.iter().copied().map(Region::Section))
        .collect()
}

/// A captured region image. Dimensions are in pixels; `rgb` holds
/// `width * height` 8-bit RGB pixels, row-major from the top left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Where an image lands in the document, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Zero-based page index.
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Renders one region of the visible plan to an image.
#[async_trait]
pub trait RegionCapture: Send + Sync {
    async fn capture(&self, region: &Region) -> Result<CapturedImage, ExportError>;
}

/// A multi-page document under construction. The first page exists from
/// the start.
pub trait PageDocument: Send {
    fn page_size(&self) -> PageSize;
    fn add_page(&mut self) -> Result<(), ExportError>;
    fn add_image(&mut self, image: &CapturedImage, placement: &Placement)
    -> Result<(), ExportError>;
    fn save(&mut self, file_name: &str) -> Result<(), ExportError>;
}

/// The export controls of the view, hidden while regions are captured so
/// they do not appear in the output.
pub trait ExportControls: Send {
    fn set_visible(&mut self, visible: bool);
}

/// The rendering capabilities a view needs to offer document export.
pub struct DocumentRenderer {
    pub capture: Box<dyn RegionCapture>,
    pub new_document: Box<dyn Fn() -> Box<dyn PageDocument> + Send + Sync>,
}

impl std::fmt::Debug for DocumentRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentRenderer").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Stacks images down fixed-size pages.
#[derive(Debug, Clone)]
pub struct PageLayout {
    page: PageSize,
    page_index: usize,
    y: f32,
    page_has_content: bool,
}

impl PageLayout {
    pub fn new(page: PageSize) -> Self {
        Self {
            page,
            page_index: 0,
            y: PAGE_MARGIN,
            page_has_content: false,
        }
    }

    /// Width available between the side margins.
    pub fn content_width(&self) -> f32 {
        self.page.width - PAGE_MARGIN * 2.0
    }

    pub fn current_page(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        self.page_index + 1
    }

    /// Place an image of the given pixel size, scaled to the content width.
    ///
    /// A new page is started when the image would cross the bottom margin
    /// and the current page already holds something. An image taller than
    /// a whole page is placed on its own page and overflows it.
    pub fn place(&mut self, image_width: u32, image_height: u32) -> Placement {
        let width = self.content_width();
        let height = if image_width == 0 {
            0.0
        } else {
            image_height as f32 * (width / image_width as f32)
        };

        if self.page_has_content && self.y + height > self.page.height - PAGE_MARGIN {
            self.page_index += 1;
            self.y = PAGE_MARGIN;
            self.page_has_content = false;
        }

        let placement = Placement {
            page: self.page_index,
            x: PAGE_MARGIN,
            y: self.y,
            width,
            height,
        };
        self.y += height + REGION_GAP;
        self.page_has_content = true;
        placement
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Capture `regions` strictly in order and assemble them into `document`,
/// then save it. Export controls are hidden for the duration and restored
/// whether or not the export succeeds. Returns the number of pages.
pub async fn export_document(
    regions: &[Region],
    capture: &dyn RegionCapture,
    document: &mut dyn PageDocument,
    controls: &mut dyn ExportControls,
) -> Result<usize, ExportError> {
    controls.set_visible(false);
    let result = render_regions(regions, capture, document).await;
    controls.set_visible(true);

    match &result {
        Ok(pages) => info!(pages, regions = regions.len(), "document exported"),
        Err(e) => error!(error = %e, "document export failed"),
    }
    result
}

async fn render_regions(
    regions: &[Region],
    capture: &dyn RegionCapture,
    document: &mut dyn PageDocument,
) -> Result<usize, ExportError> {
    let mut layout = PageLayout::new(document.page_size());

    for region in regions {
        let image = capture.capture(region).await?;
        let page_before = layout.current_page();
        let placement = layout.place(image.width, image.height);
        if placement.page != page_before {
            document.add_page()?;
        }
        debug!(region = region.name(), page = placement.page, y = placement.y, "region placed");
        document.add_image(&image, &placement)?;
    }

    document.save(DOCUMENT_FILE_NAME)?;
    Ok(layout.page_count())
}

/// Export the whole plan with the given renderer, or fail with
/// [`ExportError::RenderingUnavailable`] when none is configured.
pub async fn export_plan_document(
    renderer: Option<&DocumentRenderer>,
    controls: &mut dyn ExportControls,
) -> Result<usize, ExportError> {
    let Some(renderer) = renderer else {
        error!("document export requested without rendering resources");
        return Err(ExportError::RenderingUnavailable);
    };
    let mut document = (renderer.new_document)();
    export_document(&plan_regions(), renderer.capture.as_ref(), document.as_mut(), controls).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

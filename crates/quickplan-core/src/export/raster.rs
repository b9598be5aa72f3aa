//! Rasterizes regions of the display model into images for document
//! export.
//!
//! Text is drawn with an 8x8 bitmap font scaled up, so no font files or
//! system text stack are needed. Every region image has the same width;
//! height grows with the number of wrapped lines.

use async_trait::async_trait;
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};

use crate::plan::{EMPTY_PLACEHOLDER, PLAN_TITLE, PlanSection, SectionBody, strategy_label};

use super::ExportError;
use super::document::{CapturedImage, Region, RegionCapture};

/// Characters per line before wrapping.
pub const COLUMNS: usize = 72;

const GLYPH: u32 = 8;
const SCALE: u32 = 2;
const PADDING: u32 = 16;
const LINE_GAP: u32 = 6;

/// Pixel width of every captured region.
pub const IMAGE_WIDTH: u32 = PADDING * 2 + COLUMNS as u32 * GLYPH * SCALE;

/// Pixel height of one text line, including the gap below it.
pub const LINE_HEIGHT: u32 = GLYPH * SCALE + LINE_GAP;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Title,
    Heading,
    Strong,
    Body,
    Muted,
}

impl Tone {
    fn color(self) -> Rgb<u8> {
        match self {
            Tone::Title | Tone::Strong => Rgb([17, 24, 39]),
            Tone::Heading => Rgb([14, 116, 144]),
            Tone::Body => Rgb([55, 65, 81]),
            Tone::Muted => Rgb([107, 114, 128]),
        }
    }

    fn bold(self) -> bool {
        matches!(self, Tone::Title | Tone::Heading | Tone::Strong)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TextLine {
    text: String,
    tone: Tone,
}

/// [`RegionCapture`] over a resolved plan.
#[derive(Debug, Clone)]
pub struct PlanRasterizer {
    sections: Vec<PlanSection>,
}

impl PlanRasterizer {
    pub fn new(sections: Vec<PlanSection>) -> Self {
        Self { sections }
    }

    fn region_lines(&self, region: &Region) -> Result<Vec<TextLine>, ExportError> {
        let kind = match region {
            Region::Header => {
                return Ok(vec![TextLine {
                    text: PLAN_TITLE.to_owned(),
                    tone: Tone::Title,
                }]);
            }
            Region::Section(kind) => *kind,
        };
        let section = self
            .sections
            .iter()
            .find(|s| s.kind == kind)
            .ok_or_else(|| ExportError::Capture {
                region: region.name().to_owned(),
                message: "section is not part of the rendered plan".to_owned(),
            })?;
        Ok(section_lines(section))
    }
}

#[async_trait]
impl RegionCapture for PlanRasterizer {
    async fn capture(&self, region: &Region) -> Result<CapturedImage, ExportError> {
        let lines = self.region_lines(region)?;
        Ok(rasterize(&lines))
    }
}

fn section_lines(section: &PlanSection) -> Vec<TextLine> {
    let mut lines = vec![TextLine {
        text: section.kind.heading().to_owned(),
        tone: Tone::Heading,
    }];

    if section.body.is_empty_list() {
        push_wrapped(&mut lines, EMPTY_PLACEHOLDER, Tone::Muted, "", "");
        return lines;
    }

    match &section.body {
        SectionBody::Text(text) => push_wrapped(&mut lines, text, Tone::Body, "", ""),
        SectionBody::Strategy {
            strategy,
            justification,
        } => {
            let label = format!("Strategy: {}", strategy_label(*strategy));
            push_wrapped(&mut lines, &label, Tone::Strong, "", "");
            push_wrapped(&mut lines, justification, Tone::Body, "", "");
        }
        SectionBody::List(items) => {
            for item in items {
                push_wrapped(&mut lines, item, Tone::Body, "- ", "  ");
            }
        }
        SectionBody::TitledList(items) => {
            for item in items {
                push_wrapped(&mut lines, &item.title, Tone::Strong, "", "");
                push_wrapped(&mut lines, &item.description, Tone::Body, "  ", "  ");
            }
        }
    }
    lines
}

fn push_wrapped(lines: &mut Vec<TextLine>, text: &str, tone: Tone, first: &str, rest: &str) {
    let indent = first.chars().count().max(rest.chars().count());
    for (i, line) in wrap(text, COLUMNS - indent).into_iter().enumerate() {
        let prefix = if i == 0 { first } else { rest };
        lines.push(TextLine {
            text: format!("{prefix}{line}"),
            tone,
        });
    }
}

/// Word-wrap `text` to at most `width` characters per line. Explicit line
/// breaks are kept and words longer than `width` are split. Always returns
/// at least one line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut len = 0;
        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            while chars.len() > width {
                if len > 0 {
                    lines.push(std::mem::take(&mut line));
                    len = 0;
                }
                let tail = chars.split_off(width);
                lines.push(chars.into_iter().collect());
                chars = tail;
            }
            if len > 0 && len + 1 + chars.len() > width {
                lines.push(std::mem::take(&mut line));
                len = 0;
            }
            if len > 0 {
                line.push(' ');
                len += 1;
            }
            len += chars.len();
            line.extend(chars);
        }
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn rasterize(lines: &[TextLine]) -> CapturedImage {
    let height = PADDING * 2 + lines.len() as u32 * LINE_HEIGHT;
    let mut img = RgbImage::from_pixel(IMAGE_WIDTH, height, BACKGROUND);
    for (i, line) in lines.iter().enumerate() {
        let y = PADDING + i as u32 * LINE_HEIGHT;
        draw_text(&mut img, PADDING, y, &line.text, line.tone);
    }
    CapturedImage {
        width: IMAGE_WIDTH,
        height,
        rgb: img.into_raw(),
    }
}

fn draw_text(img: &mut RgbImage, x0: u32, y0: u32, text: &str, tone: Tone) {
    let color = tone.color();
    let stroke = SCALE + u32::from(tone.bold());
    for (i, c) in text.chars().enumerate() {
        let gx = x0 + i as u32 * GLYPH * SCALE;
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH {
                if bits & (1 << col) == 0 {
                    continue;
                }
                for dy in 0..SCALE {
                    for dx in 0..stroke {
                        let x = gx + col * SCALE + dx;
                        let y = y0 + row as u32 * SCALE + dy;
                        if x < img.width() && y < img.height() {
                            img.put_pixel(x, y, color);
                        }
                    }
                }
            }
        }
    }
}

fn glyph(c: char) -> [u8; 8] {
    let c = match c {
        '\u{2018}' | '\u{2019}' => '\'',
        '\u{201C}' | '\u{201D}' => '"',
        '\u{2013}' | '\u{2014}' => '-',
        '\u{2022}' => '*',
        other => other,
    };
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{SectionKind, StrategicPlan, TitledItem, display_sections};
    use crate::plan::schema::{HowToWin, Strategy};

    fn plan() -> StrategicPlan {
        StrategicPlan {
            direction: "Serve every village.".to_owned(),
            how_to_win: HowToWin {
                strategy: Strategy::Price,
                justification: "Low cost wells.".to_owned(),
            },
            capabilities: vec!["Drilling".to_owned()],
            leadership: "Local teams.".to_owned(),
            goals: vec![TitledItem::new("Reach", "One million people.")],
            objectives: vec![],
            initiatives: vec![],
            tasks: vec![],
        }
    }

    fn texts(lines: &[TextLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(wrap("aa bb cc", 5), vec!["aa bb", "cc"]);
        assert_eq!(wrap("aa\nbb", 10), vec!["aa", "bb"]);
        assert_eq!(wrap("", 10), vec![""]);
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap("x abcdefgh", 4), vec!["x", "abcd", "efgh"]);
    }

    #[test]
    fn section_lines_by_body_shape() {
        let sections = display_sections(&plan());

        let strategy = section_lines(&sections[1]);
        assert_eq!(
            texts(&strategy),
            vec!["How We Will Win", "Strategy: Price Leadership", "Low cost wells."]
        );

        let capabilities = section_lines(&sections[2]);
        assert_eq!(texts(&capabilities), vec!["Required Capabilities", "- Drilling"]);

        let goals = section_lines(&sections[4]);
        assert_eq!(texts(&goals), vec!["Goals", "Reach", "  One million people."]);

        let objectives = section_lines(&sections[5]);
        assert_eq!(texts(&objectives), vec!["Objectives", "Not specified."]);
        assert_eq!(objectives[1].tone, Tone::Muted);
    }

    #[tokio::test]
    async fn captured_image_matches_line_count() {
        let rasterizer = PlanRasterizer::new(display_sections(&plan()));
        let image = rasterizer
            .capture(&Region::Section(SectionKind::Goals))
            .await
            .unwrap();

        assert_eq!(image.width, IMAGE_WIDTH);
        assert_eq!(image.height, PADDING * 2 + 3 * LINE_HEIGHT);
        assert_eq!(image.rgb.len(), (image.width * image.height * 3) as usize);
        // Some pixels were inked.
        assert!(image.rgb.iter().any(|&b| b != 255));
    }

    #[tokio::test]
    async fn header_holds_plan_title() {
        let rasterizer = PlanRasterizer::new(Vec::new());
        let image = rasterizer.capture(&Region::Header).await.unwrap();
        assert_eq!(image.height, PADDING * 2 + LINE_HEIGHT);
    }

    #[tokio::test]
    async fn missing_section_is_capture_error() {
        let rasterizer = PlanRasterizer::new(Vec::new());
        let err = rasterizer
            .capture(&Region::Section(SectionKind::Tasks))
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Capture { ref region, .. } if region == "Key Tasks"));
    }

    #[test]
    fn unknown_characters_fall_back() {
        assert_eq!(glyph('\u{2019}'), glyph('\''));
        assert_eq!(glyph('\u{4E2D}'), glyph('?'));
        assert_ne!(glyph('A'), [0; 8]);
    }
}

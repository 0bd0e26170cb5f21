//! Overlay Compositor
//!
//! Turns located fields into a per-page drawing program. For every match the
//! program first paints a mask over the old value, then draws the new value
//! on the same baseline:
//!
//! ```text
//!            x0
//!  top  ---> +------------------------------+  <- baseline + padding
//!            | New value                    |  <- baseline = height - top
//!            +------------------------------+  <- baseline - size
//!            |<------ mask_width ---------->|
//! ```
//!
//! Coordinates are converted from the extractor's top-down space into PDF
//! user space (origin bottom-left) here, using each page's own MediaBox.

use crate::asset::ImageAsset;
use crate::error::OverlayError;
use crate::fonts::StandardFont;
use crate::locate::FieldFill;
use crate::source::PageSize;
use crate::words::PositionMatch;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Mask width in points, independent of the replacement text
pub const DEFAULT_MASK_WIDTH: f64 = 200.0;
/// Added to the font size to get the mask height
pub const DEFAULT_MASK_PADDING: f64 = 5.0;
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Parse "#RRGGBB" or "RRGGBB"
    pub fn from_hex(color: &str) -> Result<Self, OverlayError> {
        let hex = color.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(OverlayError::SerializationError(format!(
                "Invalid color: {}",
                color
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| OverlayError::SerializationError(format!("Invalid color: {}", color)))
        };
        Ok(Rgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_hex(self) -> String {
        let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}",
            to_byte(self.r),
            to_byte(self.g),
            to_byte(self.b)
        )
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value).map_err(|e| e.to_string())
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

/// What to do when a value is estimated to be wider than its mask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Do not measure
    Ignore,
    /// Measure and report, output unchanged
    #[default]
    Warn,
    /// Widen the mask to the estimated text width. Changes layout.
    GrowMask,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayOptions {
    pub mask_width: f64,
    pub mask_padding: f64,
    /// Face used when a matched word carries no font name
    pub fallback_font: StandardFont,
    /// Size used when a matched word carries no usable size
    pub fallback_size: f64,
    /// Page background, used to fill masks
    pub background: Rgb,
    pub text_color: Rgb,
    pub overflow: OverflowPolicy,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            mask_width: DEFAULT_MASK_WIDTH,
            mask_padding: DEFAULT_MASK_PADDING,
            fallback_font: StandardFont::Helvetica,
            fallback_size: DEFAULT_FONT_SIZE,
            background: Rgb::WHITE,
            text_color: Rgb::BLACK,
            overflow: OverflowPolicy::Warn,
        }
    }
}

/// One drawing instruction, in PDF user space
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DrawOp {
    MaskRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgb,
    },
    DrawText {
        x: f64,
        /// Baseline
        y: f64,
        font: StandardFont,
        size: f64,
        text: String,
        color: Rgb,
    },
    DrawImage {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        /// Index into [`OverlayDocument::images`]
        image: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPage {
    pub page_index: u32,
    pub size: PageSize,
    pub ops: Vec<DrawOp>,
}

impl OverlayPage {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverflowWarning {
    pub field: String,
    pub page_index: u32,
    pub estimated_width: f64,
    pub mask_width: f64,
}

/// The image to place, with the positions of its anchor label
#[derive(Debug, Clone)]
pub struct ImageFill {
    pub asset: ImageAsset,
    pub width: f64,
    pub height: f64,
    pub matches: Vec<PositionMatch>,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayDocument {
    pages: Vec<OverlayPage>,
    images: Vec<ImageAsset>,
    warnings: Vec<OverflowWarning>,
}

impl OverlayDocument {
    /// Overlay pages, index-aligned with the original document
    pub fn pages(&self) -> &[OverlayPage] {
        &self.pages
    }

    pub fn page(&self, index: u32) -> Option<&OverlayPage> {
        self.pages.get(index as usize)
    }

    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    pub fn images(&self) -> &[ImageAsset] {
        &self.images
    }

    pub fn warnings(&self) -> &[OverflowWarning] {
        &self.warnings
    }

    /// True when at least one page draws something
    pub fn has_content(&self) -> bool {
        self.pages.iter().any(|p| !p.is_empty())
    }
}

/// One masked text region before it is turned into drawing operations
#[derive(Debug, Clone)]
struct TextRegion {
    x: f64,
    baseline: f64,
    font: StandardFont,
    size: f64,
    mask_width: f64,
    text: String,
}

impl TextRegion {
    /// Top of the page first, then left to right
    fn paint_order(&self, other: &Self) -> Ordering {
        other
            .baseline
            .total_cmp(&self.baseline)
            .then(self.x.total_cmp(&other.x))
            .then_with(|| self.text.cmp(&other.text))
            .then(self.font.cmp(&other.font))
            .then(self.size.total_cmp(&other.size))
            .then(self.mask_width.total_cmp(&other.mask_width))
    }
}

/// Build the overlay for one regeneration pass.
///
/// Pages are produced for every index up to the highest matched page; pages
/// in between carry no operations. A field without matches draws nothing, and
/// matches on pages the source does not have are dropped.
///
/// Operations on a page are painted in position order (top to bottom, then
/// left to right), so the output does not depend on template field order.
pub fn compose(
    fields: &[FieldFill],
    page_sizes: &[PageSize],
    image: Option<ImageFill>,
    options: &OverlayOptions,
) -> OverlayDocument {
    let mut regions: BTreeMap<u32, Vec<TextRegion>> = BTreeMap::new();
    let mut warnings = Vec::new();

    for field in fields {
        for m in &field.matches {
            let Some(page) = page_sizes.get(m.page_index as usize) else {
                tracing::debug!(
                    field = %field.name,
                    page = m.page_index,
                    page_count = page_sizes.len(),
                    "match beyond last page, dropped"
                );
                continue;
            };
            let (font, size) = text_style(m, options);

            let mask_width = match options.overflow {
                OverflowPolicy::Ignore => options.mask_width,
                OverflowPolicy::Warn => {
                    let estimated = font.estimate_width(&field.value, size);
                    if estimated > options.mask_width {
                        tracing::warn!(
                            field = %field.name,
                            page = m.page_index,
                            estimated_width = estimated,
                            mask_width = options.mask_width,
                            "replacement text wider than mask"
                        );
                        warnings.push(OverflowWarning {
                            field: field.name.clone(),
                            page_index: m.page_index,
                            estimated_width: estimated,
                            mask_width: options.mask_width,
                        });
                    }
                    options.mask_width
                }
                OverflowPolicy::GrowMask => {
                    let needed = font.estimate_width(&field.value, size) + options.mask_padding;
                    options.mask_width.max(needed)
                }
            };

            regions.entry(m.page_index).or_default().push(TextRegion {
                x: page.x0 + m.x,
                baseline: page.top() - m.y,
                font,
                size,
                mask_width,
                text: field.value.clone(),
            });
        }
    }

    let mut by_page: BTreeMap<u32, Vec<DrawOp>> = BTreeMap::new();
    for (page_index, mut page_regions) in regions {
        page_regions.sort_by(TextRegion::paint_order);
        let ops = by_page.entry(page_index).or_default();
        for region in page_regions {
            ops.push(DrawOp::MaskRect {
                x: region.x,
                y: region.baseline - region.size,
                width: region.mask_width,
                height: region.size + options.mask_padding,
                color: options.background,
            });
            ops.push(DrawOp::DrawText {
                x: region.x,
                y: region.baseline,
                font: region.font,
                size: region.size,
                text: region.text,
                color: options.text_color,
            });
        }
    }

    let mut images = Vec::new();
    if let Some(fill) = image {
        let mut placements: Vec<(u32, f64, f64)> = fill
            .matches
            .iter()
            .filter_map(|m| match page_sizes.get(m.page_index as usize) {
                Some(page) => Some((m.page_index, page.x0 + m.x, page.top() - m.y - fill.height)),
                None => {
                    tracing::debug!(page = m.page_index, "image anchor beyond last page, dropped");
                    None
                }
            })
            .collect();
        if placements.is_empty() {
            tracing::debug!("image anchor not found, skipping image");
        } else {
            placements.sort_by(|a, b| {
                a.0.cmp(&b.0)
                    .then(b.2.total_cmp(&a.2))
                    .then(a.1.total_cmp(&b.1))
            });
            let index = images.len();
            for (page_index, x, y) in placements {
                by_page.entry(page_index).or_default().push(DrawOp::DrawImage {
                    x,
                    y,
                    width: fill.width,
                    height: fill.height,
                    image: index,
                });
            }
            images.push(fill.asset);
        }
    }

    // every key indexes `page_sizes`, so this cannot pass the source page count
    let page_total = by_page
        .keys()
        .next_back()
        .map_or(0, |&last| (last as usize).saturating_add(1))
        .min(page_sizes.len());
    let pages = page_sizes[..page_total]
        .iter()
        .zip(0u32..)
        .map(|(&size, page_index)| OverlayPage {
            page_index,
            size,
            ops: by_page.remove(&page_index).unwrap_or_default(),
        })
        .collect();

    OverlayDocument {
        pages,
        images,
        warnings,
    }
}

/// Face and size for a match, falling back when the extractor gave none
fn text_style(m: &PositionMatch, options: &OverlayOptions) -> (StandardFont, f64) {
    let font = m
        .font
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .map(StandardFont::from_font_name)
        .unwrap_or(options.fallback_font);
    let size = m
        .size
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(options.fallback_size);
    (font, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::Word;
    use pretty_assertions::assert_eq;

    fn fill(name: &str, value: &str, words: &[Word]) -> FieldFill {
        FieldFill {
            name: name.to_string(),
            label: String::new(),
            value: value.to_string(),
            matches: words.iter().map(PositionMatch::from).collect(),
        }
    }

    #[test]
    fn test_mask_then_text_at_anchor() {
        let word = Word::new(0, "Name:", 50.0, 40.0).with_size(12.0);
        let overlay = compose(
            &[fill("name", "Alice", &[word])],
            &[PageSize::LETTER],
            None,
            &OverlayOptions::default(),
        );

        assert_eq!(overlay.page_count(), 1);
        assert_eq!(
            overlay.pages()[0].ops,
            vec![
                DrawOp::MaskRect {
                    x: 50.0,
                    y: 792.0 - 40.0 - 12.0,
                    width: 200.0,
                    height: 17.0,
                    color: Rgb::WHITE,
                },
                DrawOp::DrawText {
                    x: 50.0,
                    y: 752.0,
                    font: StandardFont::Helvetica,
                    size: 12.0,
                    text: "Alice".to_string(),
                    color: Rgb::BLACK,
                },
            ]
        );
    }

    #[test]
    fn test_no_matches_yields_empty_overlay() {
        let overlay = compose(
            &[fill("name", "Alice", &[])],
            &[PageSize::LETTER],
            None,
            &OverlayOptions::default(),
        );
        assert_eq!(overlay.page_count(), 0);
        assert!(!overlay.has_content());
    }

    #[test]
    fn test_missing_font_metadata_falls_back() {
        let word = Word::new(0, "Jobs:", 10.0, 10.0).with_size(-3.0);
        let overlay = compose(
            &[fill("jobs", "Engineer", &[word])],
            &[PageSize::LETTER],
            None,
            &OverlayOptions::default(),
        );
        match &overlay.pages()[0].ops[1] {
            DrawOp::DrawText { font, size, y, .. } => {
                assert_eq!(*font, StandardFont::Helvetica);
                assert_eq!(*size, DEFAULT_FONT_SIZE);
                assert_eq!(*y, 782.0);
            }
            other => panic!("Expected DrawText, got {:?}", other),
        }
    }

    #[test]
    fn test_matched_font_is_mapped() {
        let word = Word::new(0, "Name:", 10.0, 10.0)
            .with_size(9.0)
            .with_font("ABCDEF+TimesNewRomanPS-BoldMT");
        let overlay = compose(
            &[fill("name", "Zed", &[word])],
            &[PageSize::LETTER],
            None,
            &OverlayOptions::default(),
        );
        match &overlay.pages()[0].ops[1] {
            DrawOp::DrawText { font, size, .. } => {
                assert_eq!(*font, StandardFont::TimesBold);
                assert_eq!(*size, 9.0);
            }
            other => panic!("Expected DrawText, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_label_on_two_pages() {
        let words = [
            Word::new(0, "Name:", 50.0, 40.0).with_size(12.0),
            Word::new(2, "Name:", 60.0, 100.0).with_size(12.0),
        ];
        let sizes = [PageSize::LETTER, PageSize::LETTER, PageSize::new(595.0, 842.0)];
        let overlay = compose(
            &[fill("name", "Alice", &words)],
            &sizes,
            None,
            &OverlayOptions::default(),
        );

        assert_eq!(overlay.page_count(), 3);
        assert_eq!(overlay.pages()[0].ops.len(), 2);
        assert!(overlay.pages()[1].is_empty());
        assert_eq!(overlay.pages()[2].ops.len(), 2);
        assert_eq!(overlay.pages()[2].size, PageSize::new(595.0, 842.0));
        match &overlay.pages()[2].ops[0] {
            DrawOp::MaskRect { x, y, .. } => {
                assert_eq!(*x, 60.0);
                assert_eq!(*y, 842.0 - 100.0 - 12.0);
            }
            other => panic!("Expected MaskRect, got {:?}", other),
        }
    }

    #[test]
    fn test_mask_precedes_text_for_every_field() {
        let words = [
            Word::new(0, "Name:", 50.0, 40.0),
            Word::new(0, "Jobs:", 50.0, 80.0),
        ];
        let overlay = compose(
            &[
                fill("name", "Alice", &words[..1]),
                fill("jobs", "Engineer", &words[1..]),
            ],
            &[PageSize::LETTER],
            None,
            &OverlayOptions::default(),
        );
        let ops = &overlay.pages()[0].ops;
        assert_eq!(ops.len(), 4);
        for pair in ops.chunks(2) {
            assert!(matches!(pair[0], DrawOp::MaskRect { .. }));
            assert!(matches!(pair[1], DrawOp::DrawText { .. }));
        }
    }

    #[test]
    fn test_overflow_warn_keeps_fixed_width() {
        let word = Word::new(0, "Emails:", 50.0, 40.0).with_size(12.0);
        let long = "someone.with.a.very.long.address@example-domain.com";
        let overlay = compose(
            &[fill("emails", long, &[word])],
            &[PageSize::LETTER],
            None,
            &OverlayOptions::default(),
        );
        assert_eq!(overlay.warnings().len(), 1);
        assert_eq!(overlay.warnings()[0].field, "emails");
        match &overlay.pages()[0].ops[0] {
            DrawOp::MaskRect { width, .. } => assert_eq!(*width, DEFAULT_MASK_WIDTH),
            other => panic!("Expected MaskRect, got {:?}", other),
        }
    }

    #[test]
    fn test_overflow_ignore_reports_nothing() {
        let word = Word::new(0, "Emails:", 50.0, 40.0).with_size(12.0);
        let options = OverlayOptions {
            overflow: OverflowPolicy::Ignore,
            ..OverlayOptions::default()
        };
        let overlay = compose(
            &[fill("emails", &"x".repeat(200), &[word])],
            &[PageSize::LETTER],
            None,
            &options,
        );
        assert!(overlay.warnings().is_empty());
    }

    #[test]
    fn test_overflow_grow_mask_widens() {
        let word = Word::new(0, "Emails:", 50.0, 40.0)
            .with_size(10.0)
            .with_font("Courier");
        let options = OverlayOptions {
            overflow: OverflowPolicy::GrowMask,
            ..OverlayOptions::default()
        };
        // 50 Courier glyphs at 10pt = 300pt
        let overlay = compose(
            &[fill("emails", &"m".repeat(50), &[word])],
            &[PageSize::LETTER],
            None,
            &options,
        );
        assert!(overlay.warnings().is_empty());
        match &overlay.pages()[0].ops[0] {
            DrawOp::MaskRect { width, .. } => assert!((*width - 305.0).abs() < 1e-6),
            other => panic!("Expected MaskRect, got {:?}", other),
        }
    }

    #[test]
    fn test_image_drawn_below_anchor_top() {
        let asset = ImageAsset::from_rgb(1, 1, &[0, 0, 0]).unwrap();
        let anchor = Word::new(0, "Image", 400.0, 50.0);
        let overlay = compose(
            &[],
            &[PageSize::LETTER],
            Some(ImageFill {
                asset,
                width: 100.0,
                height: 100.0,
                matches: vec![PositionMatch::from(&anchor)],
            }),
            &OverlayOptions::default(),
        );
        assert_eq!(overlay.images().len(), 1);
        assert_eq!(
            overlay.pages()[0].ops,
            vec![DrawOp::DrawImage {
                x: 400.0,
                y: 792.0 - 50.0 - 100.0,
                width: 100.0,
                height: 100.0,
                image: 0,
            }]
        );
    }

    #[test]
    fn test_image_without_anchor_is_skipped() {
        let asset = ImageAsset::from_rgb(1, 1, &[0, 0, 0]).unwrap();
        let overlay = compose(
            &[],
            &[PageSize::LETTER],
            Some(ImageFill {
                asset,
                width: 100.0,
                height: 100.0,
                matches: vec![],
            }),
            &OverlayOptions::default(),
        );
        assert!(overlay.images().is_empty());
        assert_eq!(overlay.page_count(), 0);
    }

    #[test]
    fn test_match_on_last_u32_page_is_dropped() {
        let words = [
            Word::new(0, "Name:", 50.0, 40.0),
            Word::new(u32::MAX, "Name:", 50.0, 40.0),
        ];
        let overlay = compose(
            &[fill("name", "Alice", &words)],
            &[PageSize::LETTER],
            None,
            &OverlayOptions::default(),
        );
        assert_eq!(overlay.page_count(), 1);
        assert_eq!(overlay.pages()[0].ops.len(), 2);
    }

    #[test]
    fn test_far_page_index_allocates_nothing() {
        let asset = ImageAsset::from_rgb(1, 1, &[0, 0, 0]).unwrap();
        let far = Word::new(300_000, "Name:", 50.0, 40.0);
        let overlay = compose(
            &[fill("name", "Alice", &[far.clone()])],
            &[PageSize::LETTER, PageSize::LETTER],
            Some(ImageFill {
                asset,
                width: 100.0,
                height: 100.0,
                matches: vec![PositionMatch::from(&far)],
            }),
            &OverlayOptions::default(),
        );
        assert_eq!(overlay.page_count(), 0);
        assert!(overlay.images().is_empty());
        assert!(!overlay.has_content());
    }

    #[test]
    fn test_ops_follow_position_not_field_order() {
        let words = [
            Word::new(0, "Name:", 50.0, 40.0),
            Word::new(0, "Jobs:", 50.0, 80.0),
            Word::new(0, "Age:", 20.0, 80.0),
        ];
        let name = fill("name", "Alice", &words[..1]);
        let jobs = fill("jobs", "Engineer", &words[1..2]);
        let age = fill("age", "42", &words[2..]);
        let sizes = [PageSize::LETTER];
        let options = OverlayOptions::default();

        let forward = compose(&[name.clone(), jobs.clone(), age.clone()], &sizes, None, &options);
        let reversed = compose(&[age, jobs, name], &sizes, None, &options);
        assert_eq!(forward.pages(), reversed.pages());

        let texts: Vec<&str> = forward.pages()[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["Alice", "42", "Engineer"]);
    }

    #[test]
    fn test_same_position_orders_by_value() {
        let word = Word::new(0, "Name:", 50.0, 40.0);
        let sizes = [PageSize::LETTER];
        let options = OverlayOptions::default();
        let a = fill("a", "Bravo", std::slice::from_ref(&word));
        let b = fill("b", "Alpha", std::slice::from_ref(&word));

        let first = compose(&[a.clone(), b.clone()], &sizes, None, &options);
        let second = compose(&[b, a], &sizes, None, &options);
        assert_eq!(first.pages(), second.pages());
        match &first.pages()[0].ops[1] {
            DrawOp::DrawText { text, .. } => assert_eq!(text, "Alpha"),
            other => panic!("Expected DrawText, got {:?}", other),
        }
    }

    #[test]
    fn test_shifted_media_box_moves_region() {
        let page = PageSize::new(612.0, 792.0).with_origin(10.0, 100.0);
        let asset = ImageAsset::from_rgb(1, 1, &[0, 0, 0]).unwrap();
        let name = Word::new(0, "Name:", 50.0, 40.0).with_size(12.0);
        let anchor = Word::new(0, "Image", 300.0, 200.0);
        let overlay = compose(
            &[fill("name", "Alice", &[name])],
            &[page],
            Some(ImageFill {
                asset,
                width: 100.0,
                height: 100.0,
                matches: vec![PositionMatch::from(&anchor)],
            }),
            &OverlayOptions::default(),
        );

        let ops = &overlay.pages()[0].ops;
        match &ops[1] {
            DrawOp::DrawText { x, y, .. } => {
                assert_eq!(*x, 60.0);
                assert_eq!(*y, 892.0 - 40.0);
            }
            other => panic!("Expected DrawText, got {:?}", other),
        }
        match &ops[2] {
            DrawOp::DrawImage { x, y, .. } => {
                assert_eq!(*x, 310.0);
                assert_eq!(*y, 892.0 - 200.0 - 100.0);
            }
            other => panic!("Expected DrawImage, got {:?}", other),
        }
        assert_eq!(overlay.pages()[0].size, page);
    }

    #[test]
    fn test_rgb_hex_roundtrip_and_errors() {
        assert_eq!(Rgb::from_hex("#FFFFFF").unwrap(), Rgb::WHITE);
        assert_eq!(Rgb::from_hex("000000").unwrap(), Rgb::BLACK);
        assert_eq!(Rgb::from_hex("#FF8000").unwrap().to_hex(), "#FF8000");
        assert!(Rgb::from_hex("#FFF").is_err());
        assert!(Rgb::from_hex("#GG0000").is_err());
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: OverlayOptions =
            serde_json::from_str(r##"{"mask_width":250.0,"background":"#F0F0F0","overflow":"grow_mask"}"##)
                .unwrap();
        assert_eq!(options.mask_width, 250.0);
        assert_eq!(options.mask_padding, DEFAULT_MASK_PADDING);
        assert_eq!(options.overflow, OverflowPolicy::GrowMask);
        assert_eq!(options.background.to_hex(), "#F0F0F0");
        assert_eq!(options.fallback_font, StandardFont::Helvetica);
    }
}

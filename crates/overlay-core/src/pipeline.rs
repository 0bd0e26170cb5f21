//! One regeneration pass: locate, compose, merge

use crate::asset::ImageAsset;
use crate::error::OverlayError;
use crate::fields::FieldMap;
use crate::locate::{locate, locate_fields};
use crate::merge::merge;
use crate::overlay::{compose, ImageFill, OverflowWarning, OverlayOptions};
use crate::source::SourceDocument;
use crate::words::{PositionMatch, Word};
use serde::Serialize;

/// Output of a regeneration pass
#[derive(Debug, Clone, Serialize)]
pub struct RegenerateOutcome {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub page_count: u32,
    pub warnings: Vec<OverflowWarning>,
    /// Labels with no matching word, template order
    pub missing_labels: Vec<String>,
    /// Set when an image was supplied but could not be placed
    pub image_skipped: Option<String>,
}

/// Run a full pass over raw document bytes.
///
/// Only a malformed source or a failure to write the container aborts;
/// missing labels and unusable images degrade to a partial overlay.
pub fn regenerate(
    source: &[u8],
    words: &[Word],
    template: &FieldMap,
    image: Option<&[u8]>,
    options: &OverlayOptions,
) -> Result<RegenerateOutcome, OverlayError> {
    let source = SourceDocument::load(source)?;
    regenerate_document(&source, words, template, image, options)
}

/// Run a full pass over an already loaded document
pub fn regenerate_document(
    source: &SourceDocument,
    words: &[Word],
    template: &FieldMap,
    image: Option<&[u8]>,
    options: &OverlayOptions,
) -> Result<RegenerateOutcome, OverlayError> {
    let fills = locate_fields(words, template);
    let mut missing_labels: Vec<String> = fills
        .iter()
        .filter(|f| f.matches.is_empty())
        .map(|f| f.label.clone())
        .collect();

    let mut image_skipped = None;
    let image_fill = match (image, template.image_slot()) {
        (None, _) => None,
        (Some(_), None) => {
            tracing::warn!("image supplied but template has no image slot, skipping");
            image_skipped = Some("template has no image slot".to_string());
            None
        }
        (Some(bytes), Some(slot)) => {
            let mut matches = locate(words, &slot.label);
            matches.retain(|m| m.page_index < source.page_count());
            if matches.is_empty() {
                tracing::debug!(label = %slot.label, "image anchor not found");
                missing_labels.push(slot.label.clone());
                image_skipped = Some(format!("anchor {:?} not found", slot.label));
                None
            } else {
                prepare_image(bytes, slot.pixel_size(), slot.width, slot.height, matches)
                    .map_err(|e| {
                        tracing::warn!(error = %e, "skipping image overlay");
                        image_skipped = Some(e.to_string());
                    })
                    .ok()
            }
        }
    };

    let overlay = compose(&fills, source.page_sizes(), image_fill, options);
    let bytes = merge(source, &overlay)?;

    tracing::info!(
        pages = source.page_count(),
        fields = template.len(),
        missing = missing_labels.len(),
        warnings = overlay.warnings().len(),
        "document regenerated"
    );

    Ok(RegenerateOutcome {
        bytes,
        page_count: source.page_count(),
        warnings: overlay.warnings().to_vec(),
        missing_labels,
        image_skipped,
    })
}

fn prepare_image(
    bytes: &[u8],
    (px_width, px_height): (u32, u32),
    width: f64,
    height: f64,
    matches: Vec<PositionMatch>,
) -> Result<ImageFill, OverlayError> {
    let asset = ImageAsset::decode(bytes, px_width, px_height)?;
    Ok(ImageFill {
        asset,
        width,
        height,
        matches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::test_support::solid_png;
    use crate::fields::ImageSlot;
    use crate::source::test_support::create_test_pdf;
    use lopdf::Document;
    use pretty_assertions::assert_eq;

    fn report_template() -> FieldMap {
        FieldMap::new()
            .with_field("name", "Name:", "Alice")
            .unwrap()
            .with_field("emails", "Emails:", "alice@example.com")
            .unwrap()
            .with_image(ImageSlot::new("Profile"))
    }

    #[test]
    fn test_no_matches_returns_source_bytes() {
        let pdf = create_test_pdf(2, "Quiet");
        let words = vec![Word::new(0, "Unrelated", 10.0, 10.0)];
        let outcome =
            regenerate(&pdf, &words, &report_template(), None, &OverlayOptions::default()).unwrap();

        assert_eq!(outcome.bytes, pdf);
        assert_eq!(outcome.page_count, 2);
        assert_eq!(outcome.missing_labels, vec!["Name:", "Emails:"]);
    }

    #[test]
    fn test_missing_labels_reported_in_order() {
        let pdf = create_test_pdf(1, "Partial");
        let words = vec![Word::new(0, "Emails:", 10.0, 10.0)];
        let outcome = regenerate(
            &pdf,
            &words,
            &report_template(),
            Some(solid_png(4, 4, [0, 0, 255, 255]).as_slice()),
            &OverlayOptions::default(),
        )
        .unwrap();

        assert_eq!(outcome.missing_labels, vec!["Name:", "Profile"]);
        assert!(outcome.image_skipped.is_some());
        assert_ne!(outcome.bytes, pdf);
    }

    #[test]
    fn test_bad_image_keeps_text_overlay() {
        let pdf = create_test_pdf(1, "BadImage");
        let words = vec![
            Word::new(0, "Name:", 50.0, 40.0),
            Word::new(0, "Profile", 300.0, 100.0),
        ];
        let outcome = regenerate(
            &pdf,
            &words,
            &report_template(),
            Some(b"not an image".as_slice()),
            &OverlayOptions::default(),
        )
        .unwrap();

        assert!(outcome.image_skipped.unwrap().contains("decode"));
        let doc = Document::load_mem(&outcome.bytes).unwrap();
        let streams: Vec<_> = doc.objects.values().filter_map(|o| o.as_stream().ok()).collect();
        fn subtype<'a>(s: &&'a lopdf::Stream) -> Option<&'a [u8]> {
            s.dict.get(b"Subtype").and_then(|t| t.as_name()).ok()
        }
        assert!(streams.iter().all(|s| subtype(s) != Some(b"Image".as_slice())));
        assert!(streams
            .iter()
            .filter(|s| subtype(s) == Some(b"Form".as_slice()))
            .any(|s| String::from_utf8_lossy(&s.content).contains("(Alice) Tj")));
    }

    #[test]
    fn test_image_anchor_past_last_page_is_skipped() {
        let pdf = create_test_pdf(1, "FarAnchor");
        let words = vec![
            Word::new(0, "Name:", 50.0, 40.0),
            Word::new(5, "Profile", 300.0, 100.0),
        ];
        let outcome = regenerate(
            &pdf,
            &words,
            &report_template(),
            Some(solid_png(2, 2, [0, 255, 0, 255]).as_slice()),
            &OverlayOptions::default(),
        )
        .unwrap();

        assert!(outcome.image_skipped.unwrap().contains("Profile"));
        assert_eq!(outcome.missing_labels, vec!["Emails:", "Profile"]);
    }

    #[test]
    fn test_image_without_slot_is_skipped() {
        let pdf = create_test_pdf(1, "NoSlot");
        let template = FieldMap::new().with_field("name", "Name:", "Bob").unwrap();
        let words = vec![Word::new(0, "Name:", 50.0, 40.0)];
        let outcome = regenerate(
            &pdf,
            &words,
            &template,
            Some(solid_png(2, 2, [255, 0, 0, 255]).as_slice()),
            &OverlayOptions::default(),
        )
        .unwrap();

        assert_eq!(outcome.image_skipped.as_deref(), Some("template has no image slot"));
        assert!(outcome.missing_labels.is_empty());
    }

    #[test]
    fn test_malformed_source_aborts() {
        let err = regenerate(
            b"%PDF-garbage",
            &[],
            &report_template(),
            None,
            &OverlayOptions::default(),
        )
        .unwrap_err();
        assert!(err.is_fatal());
    }
}

//! Positional text overlay and page merge
//!
//! Regenerates a report PDF by masking the area next to known labels and
//! drawing new values there, without re-rendering the document.
//!
//! A pass runs in three stages:
//! - `locate`: find label words in an extracted word stream
//! - `overlay::compose`: build per-page drawing programs (mask, text, image)
//! - `merge`: stamp each overlay page onto the matching original page
//!
//! `EditContext` wraps a pass for interactive editing of one document.

pub mod asset;
pub mod error;
pub mod fields;
pub mod fonts;
pub mod locate;
pub mod merge;
pub mod overlay;
pub mod pipeline;
mod render;
pub mod result;
pub mod session;
pub mod source;
pub mod words;

pub use asset::ImageAsset;
pub use error::OverlayError;
pub use fields::{FieldMap, FieldSpec, ImageSlot, MAX_IMAGE_EXTENT};
pub use fonts::StandardFont;
pub use locate::{locate, locate_fields, locate_required, FieldFill};
pub use merge::{merge, merge_pdf};
pub use overlay::{
    compose, DrawOp, ImageFill, OverflowPolicy, OverflowWarning, OverlayDocument, OverlayOptions,
    OverlayPage, Rgb,
};
pub use pipeline::{regenerate, regenerate_document, RegenerateOutcome};
pub use result::{ProcessMetrics, RegenerateResult};
pub use session::{EditContext, RegeneratedDocument, DEFAULT_OUTPUT_NAME, PDF_MIME_TYPE};
pub use source::{get_page_count, PageSize, SourceDocument};
pub use words::{parse_words, PositionMatch, Word};

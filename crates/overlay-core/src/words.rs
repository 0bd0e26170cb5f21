//! Extracted words and the positions derived from them
//!
//! Words come from an external extraction service, one record per rendered
//! word. Coordinates are in page space with `top` measured from the top edge
//! of the page, the convention used by most text extractors.

use crate::error::OverlayError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Word {
    /// Zero-based page index
    #[serde(alias = "page_number")]
    pub page_index: u32,
    pub text: String,
    pub x0: f64,
    /// Distance from the top edge of the page
    pub top: f64,
    /// Font size in points, if the extractor reported one
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default, alias = "fontname")]
    pub font: Option<String>,
}

impl Word {
    pub fn new(page_index: u32, text: impl Into<String>, x0: f64, top: f64) -> Self {
        Self {
            page_index,
            text: text.into(),
            x0,
            top,
            size: None,
            font: None,
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }
}

/// Parse a JSON array of words as produced by the extraction service
pub fn parse_words(json: &str) -> Result<Vec<Word>, OverlayError> {
    serde_json::from_str(json).map_err(|e| OverlayError::SerializationError(e.to_string()))
}

/// Rendered position of one label occurrence.
///
/// Built from exactly one [`Word`]; `y` keeps the top-down `top` value so the
/// compositor owns the flip into PDF user space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionMatch {
    pub page_index: u32,
    pub x: f64,
    pub y: f64,
    pub size: Option<f64>,
    pub font: Option<String>,
}

impl From<&Word> for PositionMatch {
    fn from(word: &Word) -> Self {
        Self {
            page_index: word.page_index,
            x: word.x0,
            y: word.top,
            size: word.size,
            font: word.font.clone(),
        }
    }
}

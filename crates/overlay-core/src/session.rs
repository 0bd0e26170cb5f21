//! Edit context for one loaded report
//!
//! Holds the source document, the template with its current values and the
//! optional image between load and regeneration. Regeneration consumes the
//! context, so each loaded document is regenerated at most once.

use crate::error::OverlayError;
use crate::fields::{FieldMap, FieldSpec};
use crate::overlay::{OverflowWarning, OverlayOptions};
use crate::pipeline::regenerate_document;
use crate::result::ProcessMetrics;
use crate::source::SourceDocument;
use crate::words::Word;
use std::time::Instant;

pub const DEFAULT_OUTPUT_NAME: &str = "updated_report.pdf";
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Session for editing a single report
#[derive(Debug, Clone)]
pub struct EditContext {
    document_name: String,
    source: SourceDocument,
    template: FieldMap,
    image: Option<Vec<u8>>,
    output_name: String,
}

/// A regenerated report ready for delivery
#[derive(Debug, Clone)]
pub struct RegeneratedDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: &'static str,
    pub missing_labels: Vec<String>,
    pub warnings: Vec<OverflowWarning>,
    /// Why a supplied image was left off, if it was
    pub image_skipped: Option<String>,
    pub metrics: ProcessMetrics,
}

impl EditContext {
    /// Create a context for `bytes`, seeding field values from `template`
    pub fn load(name: &str, bytes: &[u8], template: FieldMap) -> Result<Self, OverlayError> {
        let source = SourceDocument::load(bytes)?;
        tracing::debug!(
            document = name,
            pages = source.page_count(),
            fields = template.len(),
            "edit context created"
        );

        Ok(Self {
            document_name: name.to_string(),
            source,
            template,
            image: None,
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
        })
    }

    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    pub fn page_count(&self) -> u32 {
        self.source.page_count()
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), OverlayError> {
        self.template.set_value(name, value)
    }

    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.template.get(name).map(|f| f.value.as_str())
    }

    pub fn fields(&self) -> &[FieldSpec] {
        self.template.fields()
    }

    pub fn set_image(&mut self, bytes: Vec<u8>) {
        self.image = Some(bytes);
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn set_output_name(&mut self, name: impl Into<String>) {
        self.output_name = name.into();
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Run one locate, compose and merge pass with the current values
    pub fn regenerate(
        self,
        words: &[Word],
        options: &OverlayOptions,
    ) -> Result<RegeneratedDocument, OverlayError> {
        let start = Instant::now();
        let outcome = regenerate_document(
            &self.source,
            words,
            &self.template,
            self.image.as_deref(),
            options,
        )?;

        let metrics = ProcessMetrics {
            input_size_bytes: self.source.bytes().len(),
            output_size_bytes: outcome.bytes.len(),
            page_count: outcome.page_count,
            processing_time_ms: start.elapsed().as_millis() as u64,
        };

        Ok(RegeneratedDocument {
            bytes: outcome.bytes,
            filename: self.output_name,
            mime_type: PDF_MIME_TYPE,
            missing_labels: outcome.missing_labels,
            warnings: outcome.warnings,
            image_skipped: outcome.image_skipped,
            metrics,
        })
    }
}

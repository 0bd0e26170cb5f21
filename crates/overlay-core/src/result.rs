use crate::error::OverlayError;
use crate::overlay::OverflowWarning;
use crate::session::RegeneratedDocument;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RegenerateResult {
    pub success: bool,
    /// Base64-encoded PDF data
    pub data: Option<String>,
    pub filename: Option<String>,
    pub mime_type: Option<String>,
    pub error: Option<String>,
    pub metrics: Option<ProcessMetrics>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<OverflowWarning>,
    /// Why a supplied image was not placed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_skipped: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessMetrics {
    pub input_size_bytes: usize,
    pub output_size_bytes: usize,
    pub page_count: u32,
    pub processing_time_ms: u64,
}

impl RegenerateResult {
    pub fn success(document: &RegeneratedDocument) -> Self {
        Self {
            success: true,
            data: Some(STANDARD.encode(&document.bytes)),
            filename: Some(document.filename.clone()),
            mime_type: Some(document.mime_type.to_string()),
            error: None,
            metrics: Some(document.metrics.clone()),
            missing_labels: document.missing_labels.clone(),
            warnings: document.warnings.clone(),
            image_skipped: document.image_skipped.clone(),
        }
    }

    pub fn failure(error: &OverlayError) -> Self {
        Self {
            success: false,
            data: None,
            filename: None,
            mime_type: None,
            error: Some(error.to_string()),
            metrics: None,
            missing_labels: Vec::new(),
            warnings: Vec::new(),
            image_skipped: None,
        }
    }

    /// Decode the base64 payload back into PDF bytes
    pub fn decode_data(&self) -> Result<Option<Vec<u8>>, OverlayError> {
        self.data
            .as_deref()
            .map(|data| {
                STANDARD
                    .decode(data)
                    .map_err(|e| OverlayError::SerializationError(e.to_string()))
            })
            .transpose()
    }

    pub fn to_json(&self) -> Result<String, OverlayError> {
        serde_json::to_string_pretty(self).map_err(|e| OverlayError::SerializationError(e.to_string()))
    }
}

impl From<Result<RegeneratedDocument, OverlayError>> for RegenerateResult {
    fn from(result: Result<RegeneratedDocument, OverlayError>) -> Self {
        match result {
            Ok(document) => Self::success(&document),
            Err(e) => Self::failure(&e),
        }
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    /// Source bytes are not a usable PDF, or the document has no pages.
    #[error("Malformed source document: {0}")]
    MalformedSource(String),

    #[error("Label not found: {0}")]
    LabelNotFound(String),

    #[error("Image asset error: {0}")]
    AssetError(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    #[error("PDF operation failed: {0}")]
    OperationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl OverlayError {
    /// Whether the pipeline must abort on this error instead of degrading.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            OverlayError::MalformedSource(_) | OverlayError::OperationError(_)
        )
    }
}

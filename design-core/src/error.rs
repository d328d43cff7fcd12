//! Error types for editor operations.

use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur in editor operations.
///
/// Most of these never reach the user. Missing layers and groups are
/// normally treated as no-ops by the layer store, and invalid geometry is
/// rejected in place while the previous value is kept.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Asset not found in the project library.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// Page or document index out of range.
    #[error("Page not found: document {document}, page {page}")]
    PageNotFound {
        /// Document index.
        document: usize,
        /// Page index within the document.
        page: usize,
    },

    /// Geometry that would break a layer invariant (non-positive size, NaN).
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Gesture calls made out of order (update or end without a begin).
    #[error("Invalid interaction sequence: {0}")]
    InvalidSequence(String),

    /// Project serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error while saving or loading a project.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

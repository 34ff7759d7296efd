//! Error definitions for the Video Editor node.

use thiserror::Error;

/// Errors raised while executing the node or talking to the API.
#[derive(Error, Debug)]
pub enum NodeError {
    // =========================================================================
    // Validation Errors (raised before any network call for the item)
    // =========================================================================
    #[error("Invalid parameter '{field}': {message}")]
    InvalidParameter { field: String, message: String },

    #[error("Unsupported operation: {0}")]
    UnknownOperation(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    #[error("API request failed ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// Wrapper attributing a failure to the input item that caused it.
    /// Produced when a batch aborts without continue-on-fail.
    #[error("Item {index} failed: {source}")]
    Item {
        index: usize,
        #[source]
        source: Box<NodeError>,
    },
}

impl NodeError {
    /// Builds an `InvalidParameter` error for a named form field.
    pub fn invalid_parameter(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Annotates an error with the index of the item being processed.
    pub fn for_item(self, index: usize) -> Self {
        match self {
            // Already attributed; keep the innermost index.
            err @ Self::Item { .. } => err,
            other => Self::Item {
                index,
                source: Box::new(other),
            },
        }
    }

    /// Returns true for errors raised during parameter reading, before any
    /// network call was made for the item.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::InvalidParameter { .. } | Self::UnknownOperation(_) => true,
            Self::Item { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

/// Result type used throughout the crate.
pub type NodeResult<T> = Result<T, NodeError>;

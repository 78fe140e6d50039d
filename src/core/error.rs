// error.rs - Engine error taxonomy

use thiserror::Error;

/// Input-validation failures raised by the engine.
///
/// Every variant is detected before any column is profiled, so an error
/// never comes with partial results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("alignment rows differ in length: '{id}' has {found} symbols, expected {expected}")]
    AlignmentLengthMismatch {
        id: String,
        expected: usize,
        found: usize,
    },

    #[error("alignment is empty (no sequences or zero-length rows)")]
    EmptyAlignment,

    #[error("duplicate sequence identifier '{0}'")]
    DuplicateIdentifier(String),

    #[error("reference sequence '{0}' not found in alignment")]
    ReferenceNotFound(String),

    #[error("invalid thresholds: {0}")]
    InvalidThreshold(String),

    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

//! Error types for the scoring engine.
//!
//! Only broken callers end up here: malformed item banks, invalid
//! configuration, or packets that do not match the contract. Bad *answers*
//! never produce an error; they degrade to missing items and validity flags.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised when a caller violates the engine's input contract.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// A dimension item carries a subfacet code that does not name one of the
    /// nine dimensions and four facets (e.g. `R10a`, `R3z`).
    #[error("item {item_id}: unknown subfacet code {code:?}")]
    UnknownSubfacet { item_id: String, code: String },

    /// A dimension item declares a dimension number that disagrees with its
    /// subfacet code.
    #[error("item {item_id}: dimension {declared} does not match subfacet {code:?}")]
    DimensionMismatch {
        item_id: String,
        declared: u8,
        code: String,
    },

    /// A practice item carries a code outside the practice catalog.
    #[error("item {item_id}: unknown practice code {code:?}")]
    UnknownPractice { item_id: String, code: String },

    /// An item was filed under a bank that does not match its declared domain.
    #[error("item {item_id}: domain {found} does not belong in the {bank} bank")]
    WrongBank {
        item_id: String,
        found: &'static str,
        bank: &'static str,
    },

    /// Two items (or two reflection prompts) share an identifier.
    #[error("duplicate id {0:?} in item banks")]
    DuplicateId(String),

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The response packet is structurally unusable.
    #[error("invalid response packet: {0}")]
    Packet(String),

    /// Failed to read or write a file.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content or packet JSON did not match the expected schema.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScoringError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;

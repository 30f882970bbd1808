use std::path::PathBuf;

use thiserror::Error;

/// Setup-time failures: catalog and config loading, template validation.
///
/// Trial and deliberation never return these; they degrade locally instead.
#[derive(Error, Debug)]
pub enum JuryError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("archetype '{id}' is invalid: {reason}")]
    InvalidTemplate { id: String, reason: String },

    #[error("archetype '{0}' appears more than once in the catalog")]
    DuplicateArchetype(String),

    #[error("archetype catalog is empty")]
    EmptyCatalog,
}

pub type Result<T> = std::result::Result<T, JuryError>;

//! Error types for the evaluation pipeline

use thiserror::Error;

/// Errors that abort a whole page, site or audit run
///
/// Executor failures never show up here; they are recorded as `error`
/// results on their own criterion.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to load criterion catalog from {source_name}: {message}")]
    Catalog {
        source_name: String,
        message: String,
    },

    #[error("Invalid criterion {id}: {reason}")]
    InvalidCriterion { id: String, reason: String },

    #[error("Persistence failed for {entity}: {message}")]
    Persistence { entity: String, message: String },

    #[error("Site run for audit {audit_id} blocked: {} page(s) have no persisted results ({})", missing.len(), missing.join(", "))]
    PagesIncomplete {
        audit_id: String,
        missing: Vec<String>,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl EngineError {
    pub fn persistence(entity: impl Into<String>, err: impl std::fmt::Display) -> Self {
        EngineError::Persistence {
            entity: entity.into(),
            message: err.to_string(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

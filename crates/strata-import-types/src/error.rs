//! Error types for the import pipeline

use thiserror::Error;

use crate::{file::ImportSubject, stage::ImportStage};

/// Result type for import operations
pub type ImportResult<T> = Result<T, ImportError>;

/// Errors that can occur during import operations
#[derive(Error, Debug)]
pub enum ImportError {
    /// File MIME type is not accepted for the active subject
    #[error("Unsupported file type '{mime_type}' for {subject} import")]
    UnsupportedFileType {
        mime_type: String,
        subject: ImportSubject,
    },

    /// JSON file could not be parsed
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Transport or server failure on a remote operation
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// Remote operation completed but reported `success: false`
    #[error("Rejected by server: {0}")]
    Rejected(String),

    /// Readiness predicate for the current stage does not hold
    #[error("Stage {0} is not ready to continue")]
    ValidationIncomplete(ImportStage),

    /// Event is not valid for the current stage
    #[error("Cannot apply {event} while at {stage}")]
    IllegalTransition { stage: ImportStage, event: String },

    /// Tabular value references a column that is not in the column set
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Header row of a tabular file has only placeholder labels
    #[error("No labelled columns found in file")]
    NoLabelledColumns,

    /// Project is not offered by the mapping catalog
    #[error("Unknown project: {0}")]
    UnknownProject(String),

    /// A file can only be selected while the session is at upload
    #[error("File already staged for this session")]
    FileAlreadyStaged,
}

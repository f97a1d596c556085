//! Import subject, source format and staged file types

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// MIME type of tabular (spreadsheet) input
pub const MIME_CSV: &str = "text/csv";
/// MIME type of hierarchical (object graph) input
pub const MIME_JSON: &str = "application/json";

/// Kind of object being imported
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ImportSubject {
    /// Entity records, one per row or object
    #[default]
    Entities,
    /// Reusable attribute templates
    Template,
}

impl ImportSubject {
    /// Get the string identifier for this subject
    pub fn as_str(&self) -> &str {
        match self {
            ImportSubject::Entities => "entities",
            ImportSubject::Template => "template",
        }
    }
}

impl std::fmt::Display for ImportSubject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ImportSubject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "entities" => Ok(ImportSubject::Entities),
            "template" => Ok(ImportSubject::Template),
            _ => Err(format!("Unknown import subject: {}", s)),
        }
    }
}

/// Source file encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Spreadsheet rows, parsed remotely
    Csv,
    /// JSON object graph, decoded locally
    Json,
}

impl SourceFormat {
    /// Resolve a format from a declared MIME type
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        match mime_type {
            MIME_CSV => Some(SourceFormat::Csv),
            MIME_JSON => Some(SourceFormat::Json),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            SourceFormat::Csv => MIME_CSV,
            SourceFormat::Json => MIME_JSON,
        }
    }

    pub fn is_tabular(&self) -> bool {
        matches!(self, SourceFormat::Csv)
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Csv => write!(f, "csv"),
            SourceFormat::Json => write!(f, "json"),
        }
    }
}

/// File selected by the user for the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Original file name
    pub name: String,
    /// Declared MIME type
    pub mime_type: String,
    /// Raw, unparsed contents
    pub contents: Bytes,
}

impl StagedFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        contents: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            contents: contents.into(),
        }
    }

    /// Format implied by the declared MIME type, if recognised
    pub fn format(&self) -> Option<SourceFormat> {
        SourceFormat::from_mime(&self.mime_type)
    }
}

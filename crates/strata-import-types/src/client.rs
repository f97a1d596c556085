//! Remote collaborator trait
//!
//! Defines the operations the import pipeline consumes from the server.
//! Transports (HTTP, in-memory fakes) implement this trait; the pipeline
//! never depends on a particular wire protocol.

use async_trait::async_trait;

use crate::{
    error::ImportResult,
    file::StagedFile,
    mapping::{ColumnMapping, MappingCatalog},
    review::{CommitResponse, ReviewResponse},
};

/// Remote operations used by the import pipeline
///
/// Implementations report transport or server failures as
/// `ImportError::RemoteUnavailable`. A response with `success: false` is not
/// an error at this level; the pipeline decides how to surface it.
#[async_trait]
pub trait ImportClient: Send + Sync {
    /// Human-readable name for this transport
    fn name(&self) -> &str;

    /// Parse a tabular file and return its raw header row
    ///
    /// Headers of blank columns are returned as placeholder labels.
    async fn extract_headers(&self, file: &StagedFile) -> ImportResult<Vec<String>>;

    /// Fetch the projects and templates offered while mapping
    async fn fetch_mapping_catalog(&self) -> ImportResult<MappingCatalog>;

    /// Preview the records a tabular import would create or update
    async fn review_tabular(
        &self,
        mapping: &ColumnMapping,
        file: &StagedFile,
    ) -> ImportResult<ReviewResponse>;

    /// Preview the records a JSON import would create or update
    async fn review_hierarchical(&self, file: &StagedFile) -> ImportResult<ReviewResponse>;

    /// Create and update records from a tabular file
    async fn commit_tabular(
        &self,
        mapping: &ColumnMapping,
        file: &StagedFile,
    ) -> ImportResult<CommitResponse>;

    /// Create and update records from a JSON file, assigning them to `project`
    async fn commit_hierarchical(
        &self,
        file: &StagedFile,
        project: Option<&str>,
    ) -> ImportResult<CommitResponse>;

    /// Create templates from a JSON file
    async fn commit_template(&self, file: &StagedFile) -> ImportResult<CommitResponse>;
}

//! Remote calls issued by the pipeline
//!
//! A `PendingCall` owns everything needed to perform one request, so the
//! caller can run it outside the controller and hand the reply back with
//! its ticket. Replies whose ticket is no longer current are discarded.

use strata_import_types::{
    ColumnMapping, CommitResponse, ImportClient, ImportResult, MappingCatalog, ReviewResponse,
    StagedFile,
};

/// Identifies one in-flight call within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    /// Session epoch, bumped on every reset
    pub epoch: u64,
    /// Sequence number of the call within the epoch
    pub call: u64,
}

/// Request to one of the remote operations
#[derive(Debug, Clone)]
pub enum RemoteRequest {
    ExtractHeaders {
        file: StagedFile,
    },
    FetchCatalog,
    ReviewTabular {
        mapping: ColumnMapping,
        file: StagedFile,
    },
    ReviewHierarchical {
        file: StagedFile,
    },
    CommitTabular {
        mapping: ColumnMapping,
        file: StagedFile,
    },
    CommitHierarchical {
        file: StagedFile,
        project: Option<String>,
    },
    CommitTemplate {
        file: StagedFile,
    },
}

impl RemoteRequest {
    pub fn operation(&self) -> &'static str {
        match self {
            RemoteRequest::ExtractHeaders { .. } => "extract_headers",
            RemoteRequest::FetchCatalog => "fetch_mapping_catalog",
            RemoteRequest::ReviewTabular { .. } => "review_tabular",
            RemoteRequest::ReviewHierarchical { .. } => "review_hierarchical",
            RemoteRequest::CommitTabular { .. } => "commit_tabular",
            RemoteRequest::CommitHierarchical { .. } => "commit_hierarchical",
            RemoteRequest::CommitTemplate { .. } => "commit_template",
        }
    }

    /// Perform the request against `client`
    pub async fn send(&self, client: &dyn ImportClient) -> RemoteReply {
        match self {
            RemoteRequest::ExtractHeaders { file } => {
                RemoteReply::Headers(client.extract_headers(file).await)
            }
            RemoteRequest::FetchCatalog => {
                RemoteReply::Catalog(client.fetch_mapping_catalog().await)
            }
            RemoteRequest::ReviewTabular { mapping, file } => {
                RemoteReply::Review(client.review_tabular(mapping, file).await)
            }
            RemoteRequest::ReviewHierarchical { file } => {
                RemoteReply::Review(client.review_hierarchical(file).await)
            }
            RemoteRequest::CommitTabular { mapping, file } => {
                RemoteReply::Commit(client.commit_tabular(mapping, file).await)
            }
            RemoteRequest::CommitHierarchical { file, project } => RemoteReply::Commit(
                client
                    .commit_hierarchical(file, project.as_deref())
                    .await,
            ),
            RemoteRequest::CommitTemplate { file } => {
                RemoteReply::Commit(client.commit_template(file).await)
            }
        }
    }
}

/// Outcome of a remote request
#[derive(Debug)]
pub enum RemoteReply {
    Headers(ImportResult<Vec<String>>),
    Catalog(ImportResult<MappingCatalog>),
    Review(ImportResult<ReviewResponse>),
    Commit(ImportResult<CommitResponse>),
}

/// Remote call waiting to be performed
#[derive(Debug, Clone)]
pub struct PendingCall {
    pub ticket: Ticket,
    pub request: RemoteRequest,
}

//! Commit engine
//!
//! Sends the final mapping and file to the server. The commit is a single
//! request; atomicity is the server's responsibility.

use chrono::Utc;
use strata_import_types::{
    CommitResponse, FieldMapping, ImportError, ImportResult, ImportSubject, SourceFormat,
    StagedFile,
};
use tracing::{info, warn};

use super::remote::RemoteRequest;
use super::review::with_detail;
use crate::config::ImportConfig;
use crate::notifications::Notification;

/// Prepares commit requests and interprets their replies
#[derive(Debug, Clone)]
pub struct CommitEngine {
    error_duration: std::time::Duration,
}

impl CommitEngine {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            error_duration: config.error_duration(),
        }
    }

    /// Request committing `file` as `subject`
    pub fn request(
        &self,
        subject: ImportSubject,
        format: SourceFormat,
        mapping: &FieldMapping,
        file: &StagedFile,
    ) -> RemoteRequest {
        match (subject, format) {
            (ImportSubject::Template, _) => RemoteRequest::CommitTemplate { file: file.clone() },
            (ImportSubject::Entities, SourceFormat::Csv) => RemoteRequest::CommitTabular {
                mapping: mapping.to_column_mapping(Utc::now()),
                file: file.clone(),
            },
            (ImportSubject::Entities, SourceFormat::Json) => {
                if !mapping.attribute_drafts.is_empty() {
                    warn!(
                        drafts = mapping.attribute_drafts.len(),
                        "Attribute drafts are not sent with JSON imports"
                    );
                }
                RemoteRequest::CommitHierarchical {
                    file: file.clone(),
                    project: Some(mapping.project_field.clone()).filter(|p| !p.is_empty()),
                }
            }
        }
    }

    /// Success, or the notice to show when the commit failed
    pub fn interpret(
        &self,
        subject: ImportSubject,
        format: SourceFormat,
        reply: ImportResult<CommitResponse>,
    ) -> Result<(), Notification> {
        let error = match reply {
            Ok(response) if response.success => {
                info!(message = %response.message, "Import committed");
                return Ok(());
            }
            Ok(response) => ImportError::Rejected(response.message),
            Err(e) => e,
        };
        warn!(error = %error, "Import commit failed");

        let detail = match &error {
            ImportError::Rejected(message) => message.clone(),
            other => other.to_string(),
        };
        let (title, description) = match (subject, format) {
            (ImportSubject::Template, _) => {
                ("Template Import Error", "Error while importing template file")
            }
            (ImportSubject::Entities, SourceFormat::Csv) => {
                ("CSV Import Error", "Error while importing CSV file")
            }
            (ImportSubject::Entities, SourceFormat::Json) => {
                ("JSON Import Error", "Error while importing JSON file")
            }
        };
        Err(Notification::error(
            title,
            with_detail(description, &detail),
            self.error_duration,
        ))
    }
}

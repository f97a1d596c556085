//! Review engine
//!
//! Builds the preview request for the current mapping and turns the reply
//! into the rows of the review table.

use chrono::Utc;
use serde::Serialize;
use strata_import_types::{
    Disposition, FieldMapping, ImportResult, ReviewRecord, ReviewResponse, SourceFormat,
    StagedFile,
};
use tracing::{info, warn};

use super::remote::RemoteRequest;
use crate::config::ImportConfig;
use crate::notifications::Notification;

/// Row of the review table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRow {
    /// Full record name
    pub name: String,
    /// Name shortened for display
    pub display_name: String,
    pub disposition: Disposition,
    /// "Create" or "Update"
    pub action: &'static str,
}

/// Prepares review requests and interprets their replies
#[derive(Debug, Clone)]
pub struct ReviewEngine {
    name_width: usize,
    error_duration: std::time::Duration,
}

impl ReviewEngine {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            name_width: config.review_name_width,
            error_duration: config.error_duration(),
        }
    }

    /// Request previewing an entities import of `file`
    pub fn request(
        &self,
        format: SourceFormat,
        mapping: &FieldMapping,
        file: &StagedFile,
    ) -> RemoteRequest {
        match format {
            SourceFormat::Csv => RemoteRequest::ReviewTabular {
                mapping: mapping.to_column_mapping(Utc::now()),
                file: file.clone(),
            },
            // JSON records describe their own fields
            SourceFormat::Json => {
                if !mapping.attribute_drafts.is_empty() {
                    warn!(
                        drafts = mapping.attribute_drafts.len(),
                        "Attribute drafts are not sent with JSON reviews"
                    );
                }
                RemoteRequest::ReviewHierarchical { file: file.clone() }
            }
        }
    }

    /// Records to show for a reply, plus an error notice if the review failed
    ///
    /// The returned records always replace the previous ones.
    pub fn interpret(
        &self,
        format: SourceFormat,
        reply: ImportResult<ReviewResponse>,
    ) -> (Vec<ReviewRecord>, Option<Notification>) {
        match reply {
            Ok(response) if response.success => {
                info!(records = response.records.len(), "Review generated");
                (response.records, None)
            }
            Ok(response) => {
                warn!(message = %response.message, "Review rejected by server");
                let notice = self.failure(format, &response.message);
                (response.records, Some(notice))
            }
            Err(e) => {
                warn!(error = %e, "Review request failed");
                (Vec::new(), Some(self.failure(format, &e.to_string())))
            }
        }
    }

    pub fn rows(&self, records: &[ReviewRecord]) -> Vec<ReviewRow> {
        records
            .iter()
            .map(|record| ReviewRow {
                name: record.name.clone(),
                display_name: truncate(&record.name, self.name_width),
                disposition: record.disposition,
                action: record.disposition.label(),
            })
            .collect()
    }

    fn failure(&self, format: SourceFormat, detail: &str) -> Notification {
        let (title, description) = match format {
            SourceFormat::Csv => ("CSV Import Error", "Error while reviewing CSV file"),
            SourceFormat::Json => ("JSON Import Error", "Error while reviewing JSON file"),
        };
        Notification::error(title, with_detail(description, detail), self.error_duration)
    }
}

/// Append a server-provided detail to a fixed description
pub(crate) fn with_detail(description: &str, detail: &str) -> String {
    if detail.is_empty() {
        description.to_string()
    } else {
        format!("{}: {}", description, detail)
    }
}

/// Shorten `name` to at most `width` characters, ending in "..." when cut
///
/// Widths too narrow for the ellipsis cut the name without one.
fn truncate(name: &str, width: usize) -> String {
    const OMISSION: &str = "...";
    if name.chars().count() <= width {
        return name.to_string();
    }
    if width <= OMISSION.len() {
        return name.chars().take(width).collect();
    }
    let mut shortened: String = name.chars().take(width - OMISSION.len()).collect();
    shortened.push_str(OMISSION);
    shortened
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_import_types::{Identity, ImportError, MIME_CSV, MIME_JSON};

    fn engine() -> ReviewEngine {
        ReviewEngine::new(&ImportConfig::default())
    }

    #[test]
    fn test_tabular_request_carries_mapping() {
        let mut mapping = FieldMapping::new(&Identity::new("owner-1"));
        mapping.name_field = "Name".into();
        let file = StagedFile::new("sample.csv", MIME_CSV, "Name\nA\n");

        match engine().request(SourceFormat::Csv, &mapping, &file) {
            RemoteRequest::ReviewTabular { mapping, file } => {
                assert_eq!(mapping.name, "Name");
                assert_eq!(mapping.owner, "owner-1");
                assert_eq!(file.name, "sample.csv");
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_hierarchical_request_carries_only_the_file() {
        let mut mapping = FieldMapping::new(&Identity::new("owner-1"));
        mapping.attribute_drafts.push(strata_import_types::AttributeDraft::blank(
            strata_import_types::AttributeId::new("a-1"),
            "owner-1",
            Utc::now(),
        ));
        let file = StagedFile::new("samples.json", MIME_JSON, "[]");

        match engine().request(SourceFormat::Json, &mapping, &file) {
            RemoteRequest::ReviewHierarchical { file } => assert_eq!(file.name, "samples.json"),
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_failed_review_clears_records() {
        let (records, notice) = engine().interpret(
            SourceFormat::Json,
            Err(ImportError::RemoteUnavailable("connection refused".into())),
        );
        assert!(records.is_empty());
        let notice = notice.unwrap();
        assert_eq!(notice.title, "JSON Import Error");
        assert!(notice.description.contains("connection refused"));
    }

    #[test]
    fn test_rows_label_and_truncate() {
        let records = vec![
            ReviewRecord::new("Sample A", Disposition::Update),
            ReviewRecord::new(
                "Soil core 2024 north transect plot 7",
                Disposition::Create,
            ),
        ];
        let rows = engine().rows(&records);

        assert_eq!(rows[0].action, "Update");
        assert_eq!(rows[0].display_name, "Sample A");
        assert_eq!(rows[1].action, "Create");
        assert_eq!(rows[1].display_name, "Soil core 2024 north transe...");
        assert_eq!(rows[1].display_name.chars().count(), 30);
        assert_eq!(rows[1].name, "Soil core 2024 north transect plot 7");
    }

    #[test]
    fn test_truncate_never_exceeds_width() {
        assert_eq!(truncate("Sample A", 2), "Sa");
        assert_eq!(truncate("Sample A", 3), "Sam");
        assert_eq!(truncate("Sample A", 4), "S...");
        assert_eq!(truncate("Sample A", 0), "");
        for width in 0..10 {
            assert!(truncate("Soil core north", width).chars().count() <= width);
        }
    }

    #[test]
    fn test_with_detail() {
        assert_eq!(with_detail("Error", ""), "Error");
        assert_eq!(with_detail("Error", "bad row"), "Error: bad row");
    }
}

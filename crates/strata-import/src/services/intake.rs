//! File intake
//!
//! Validates the declared MIME type of a selected file against the active
//! subject and decodes JSON files locally. Tabular files are never parsed
//! here; they go to the server untouched.

use strata_import_types::{ImportError, ImportResult, ImportSubject, SourceFormat, StagedFile};
use tracing::debug;

use crate::config::ImportConfig;

/// Validates and decodes staged files
#[derive(Debug, Clone)]
pub struct FileIntake {
    config: ImportConfig,
}

impl FileIntake {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Configured for `subject` and mapped to a known format
    pub fn accepts(&self, subject: ImportSubject, mime_type: &str) -> bool {
        self.config.accepts(subject, mime_type) && SourceFormat::from_mime(mime_type).is_some()
    }

    /// Check that `file` may be imported as `subject` and resolve its format
    pub fn validate(&self, subject: ImportSubject, file: &StagedFile) -> ImportResult<SourceFormat> {
        match file.format() {
            Some(format) if self.accepts(subject, &file.mime_type) => Ok(format),
            _ => Err(ImportError::UnsupportedFileType {
                mime_type: file.mime_type.clone(),
                subject,
            }),
        }
    }

    /// Decode a JSON file into its object graph
    pub fn decode(&self, file: &StagedFile) -> ImportResult<serde_json::Value> {
        let document: serde_json::Value = serde_json::from_slice(&file.contents)?;
        debug!(file = %file.name, bytes = file.contents.len(), "Decoded JSON file");
        Ok(document)
    }

    /// Warning shown when a file of the wrong type is selected
    pub fn rejection_message(subject: ImportSubject) -> &'static str {
        match subject {
            ImportSubject::Entities => "Please upload a JSON or CSV file",
            ImportSubject::Template => "Please upload a JSON file",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_import_types::{MIME_CSV, MIME_JSON};

    fn intake() -> FileIntake {
        FileIntake::new(&ImportConfig::default())
    }

    #[test]
    fn test_csv_accepted_for_entities_only() {
        let file = StagedFile::new("sample.csv", MIME_CSV, "Name\n");
        assert_eq!(
            intake().validate(ImportSubject::Entities, &file).unwrap(),
            SourceFormat::Csv
        );
        assert!(matches!(
            intake().validate(ImportSubject::Template, &file),
            Err(ImportError::UnsupportedFileType { .. })
        ));
    }

    #[test]
    fn test_json_accepted_for_both_subjects() {
        let file = StagedFile::new("samples.json", MIME_JSON, "[]");
        for subject in [ImportSubject::Entities, ImportSubject::Template] {
            assert_eq!(
                intake().validate(subject, &file).unwrap(),
                SourceFormat::Json
            );
        }
    }

    #[test]
    fn test_other_types_rejected() {
        let file = StagedFile::new("photo.png", "image/png", vec![0x89, 0x50]);
        assert!(intake().validate(ImportSubject::Entities, &file).is_err());
    }

    #[test]
    fn test_configured_type_without_known_format_rejected() {
        let mut config = ImportConfig::default();
        config.entity_mime_types.push("text/tab-separated-values".into());
        let file = StagedFile::new("sample.tsv", "text/tab-separated-values", "Name\n");
        assert!(FileIntake::new(&config)
            .validate(ImportSubject::Entities, &file)
            .is_err());
    }

    #[test]
    fn test_acceptance_follows_config() {
        let config = ImportConfig {
            entity_mime_types: vec![MIME_JSON.to_string()],
            ..ImportConfig::default()
        };
        let intake = FileIntake::new(&config);
        assert!(!intake.accepts(ImportSubject::Entities, MIME_CSV));
        assert!(intake.accepts(ImportSubject::Entities, MIME_JSON));
    }

    #[test]
    fn test_decode_reports_parse_failure() {
        let file = StagedFile::new("broken.json", MIME_JSON, "{ \"name\": ");
        assert!(matches!(intake().decode(&file), Err(ImportError::Decode(_))));
    }

    #[test]
    fn test_decode_object_graph() {
        let file = StagedFile::new(
            "samples.json",
            MIME_JSON,
            r#"[{ "name": "Sample A", "description": "First" }]"#,
        );
        let document = intake().decode(&file).unwrap();
        assert_eq!(document[0]["name"], "Sample A");
    }
}

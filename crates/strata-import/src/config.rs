//! Import pipeline configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use strata_import_types::{ImportSubject, MIME_CSV, MIME_JSON};

/// Pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// MIME types accepted when importing entities
    pub entity_mime_types: Vec<String>,
    /// MIME types accepted when importing templates
    pub template_mime_types: Vec<String>,
    /// Prefix the spreadsheet parser gives to columns without a header
    pub empty_header_prefix: String,
    /// How long warnings stay visible (milliseconds)
    pub warning_duration_ms: u64,
    /// How long errors stay visible (milliseconds)
    pub error_duration_ms: u64,
    /// Maximum characters of a record name shown in the review table
    pub review_name_width: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            entity_mime_types: vec![MIME_CSV.to_string(), MIME_JSON.to_string()],
            template_mime_types: vec![MIME_JSON.to_string()],
            empty_header_prefix: "__EMPTY".to_string(),
            warning_duration_ms: 2000,
            error_duration_ms: 4000,
            review_name_width: 30,
        }
    }
}

impl ImportConfig {
    pub fn accepted_mime_types(&self, subject: ImportSubject) -> &[String] {
        match subject {
            ImportSubject::Entities => &self.entity_mime_types,
            ImportSubject::Template => &self.template_mime_types,
        }
    }

    pub fn accepts(&self, subject: ImportSubject, mime_type: &str) -> bool {
        self.accepted_mime_types(subject)
            .iter()
            .any(|accepted| accepted == mime_type)
    }

    pub fn warning_duration(&self) -> Duration {
        Duration::from_millis(self.warning_duration_ms)
    }

    pub fn error_duration(&self) -> Duration {
        Duration::from_millis(self.error_duration_ms)
    }
}

/// Settings for the HTTP transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// GraphQL endpoint
    pub endpoint: String,
    /// Bearer token of the authenticated user
    #[serde(default)]
    pub token: Option<String>,
    /// Transport timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl HttpClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

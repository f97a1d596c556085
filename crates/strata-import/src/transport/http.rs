//! GraphQL transport for the import operations
//!
//! Queries are posted as JSON. Operations that carry a file use the GraphQL
//! multipart request convention: an `operations` field holding the query
//! with a null placeholder for the upload, a `map` field pointing part `0`
//! at that placeholder, and the file itself as part `0`.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use strata_import_types::{
    ColumnMapping, CommitResponse, ImportClient, ImportError, ImportResult, MappingCatalog,
    ReviewResponse, StagedFile,
};
use tracing::{debug, warn};

use crate::config::HttpClientConfig;

const PREPARE_CSV: &str = r#"mutation PrepareCSV($file: [Upload]!) {
  prepareCSV(file: $file)
}"#;

const GET_MAPPING_DATA: &str = r#"query GetMappingData {
  projects { _id name }
  templates { _id name description values { _id data name type } }
}"#;

const REVIEW_CSV: &str = r#"mutation ReviewCSV($columnMapping: ColumnMappingInput, $file: [Upload]!) {
  reviewCSV(columnMapping: $columnMapping, file: $file) { success message data { name state } }
}"#;

const IMPORT_CSV: &str = r#"mutation ImportCSV($columnMapping: ColumnMappingInput, $file: [Upload]!) {
  importCSV(columnMapping: $columnMapping, file: $file) { success message }
}"#;

const REVIEW_JSON: &str = r#"mutation ReviewJSON($file: [Upload]!) {
  reviewJSON(file: $file) { success message data { name state } }
}"#;

const IMPORT_JSON: &str = r#"mutation ImportJSON($file: [Upload]!, $project: String) {
  importJSON(file: $file, project: $project) { success message }
}"#;

const IMPORT_TEMPLATE: &str = r#"mutation ImportTemplate($file: [Upload]!) {
  importTemplate(file: $file) { success message }
}"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// `ImportClient` backed by the GraphQL API
pub struct HttpImportClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpImportClient {
    pub fn new(config: &HttpClientConfig) -> ImportResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ImportError::RemoteUnavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
        })
    }

    fn post(&self) -> RequestBuilder {
        let request = self
            .client
            .post(&self.endpoint)
            .header("apollo-require-preflight", "true");
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    /// Run a query without uploads and return its `data` object
    async fn query(&self, operation: &str, query: &str) -> ImportResult<Value> {
        let body = json!({ "query": query, "variables": {} });
        self.execute(operation, self.post().json(&body)).await
    }

    /// Run an operation whose `$file` variable is the staged file
    async fn upload(
        &self,
        operation: &str,
        query: &str,
        mut variables: Value,
        file: &StagedFile,
    ) -> ImportResult<Value> {
        variables["file"] = json!([null]);
        let operations = json!({ "query": query, "variables": variables });
        let map = json!({ "0": ["variables.file.0"] });

        let part = Part::bytes(file.contents.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| {
                ImportError::RemoteUnavailable(format!("Invalid file type for upload: {}", e))
            })?;
        let form = Form::new()
            .text("operations", operations.to_string())
            .text("map", map.to_string())
            .part("0", part);

        debug!(operation, file = %file.name, bytes = file.contents.len(), "Uploading file");
        self.execute(operation, self.post().multipart(form)).await
    }

    async fn execute(&self, operation: &str, request: RequestBuilder) -> ImportResult<Value> {
        debug!(operation, endpoint = %self.endpoint, "GraphQL request");

        let response = request.send().await.map_err(|e| {
            ImportError::RemoteUnavailable(format!("{} request failed: {}", operation, e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ImportError::RemoteUnavailable(format!("Failed to read response: {}", e))
        })?;

        let parsed: Option<GraphQlResponse> = serde_json::from_str(&body).ok();
        if !status.is_success() {
            warn!(operation, %status, "GraphQL request returned error status");
            let detail = parsed
                .map(|r| join_errors(&r.errors))
                .filter(|d| !d.is_empty())
                .unwrap_or(body);
            return Err(ImportError::RemoteUnavailable(format!(
                "API returned status {}: {}",
                status, detail
            )));
        }

        let parsed = parsed.ok_or_else(|| {
            ImportError::RemoteUnavailable(format!("Failed to parse response - Body: {}", body))
        })?;
        if !parsed.errors.is_empty() {
            let detail = join_errors(&parsed.errors);
            warn!(operation, errors = %detail, "GraphQL errors");
            return Err(ImportError::RemoteUnavailable(detail));
        }
        parsed
            .data
            .ok_or_else(|| ImportError::RemoteUnavailable(format!("{} returned no data", operation)))
    }
}

fn join_errors(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Deserialize `data[field]`, or all of `data` when `field` is `None`
fn extract<T: DeserializeOwned>(mut data: Value, field: Option<&str>) -> ImportResult<T> {
    let value = match field {
        Some(field) => data.get_mut(field).map(Value::take).unwrap_or(Value::Null),
        None => data,
    };
    serde_json::from_value(value).map_err(|e| {
        ImportError::RemoteUnavailable(format!(
            "Failed to parse {} response: {}",
            field.unwrap_or("query"),
            e
        ))
    })
}

#[async_trait]
impl ImportClient for HttpImportClient {
    fn name(&self) -> &str {
        "graphql"
    }

    async fn extract_headers(&self, file: &StagedFile) -> ImportResult<Vec<String>> {
        let data = self.upload("prepareCSV", PREPARE_CSV, json!({}), file).await?;
        extract(data, Some("prepareCSV"))
    }

    async fn fetch_mapping_catalog(&self) -> ImportResult<MappingCatalog> {
        let data = self.query("GetMappingData", GET_MAPPING_DATA).await?;
        extract(data, None)
    }

    async fn review_tabular(
        &self,
        mapping: &ColumnMapping,
        file: &StagedFile,
    ) -> ImportResult<ReviewResponse> {
        let variables = json!({ "columnMapping": mapping });
        let data = self.upload("reviewCSV", REVIEW_CSV, variables, file).await?;
        extract(data, Some("reviewCSV"))
    }

    async fn review_hierarchical(&self, file: &StagedFile) -> ImportResult<ReviewResponse> {
        let data = self.upload("reviewJSON", REVIEW_JSON, json!({}), file).await?;
        extract(data, Some("reviewJSON"))
    }

    async fn commit_tabular(
        &self,
        mapping: &ColumnMapping,
        file: &StagedFile,
    ) -> ImportResult<CommitResponse> {
        let variables = json!({ "columnMapping": mapping });
        let data = self.upload("importCSV", IMPORT_CSV, variables, file).await?;
        extract(data, Some("importCSV"))
    }

    async fn commit_hierarchical(
        &self,
        file: &StagedFile,
        project: Option<&str>,
    ) -> ImportResult<CommitResponse> {
        let variables = json!({ "project": project });
        let data = self.upload("importJSON", IMPORT_JSON, variables, file).await?;
        extract(data, Some("importJSON"))
    }

    async fn commit_template(&self, file: &StagedFile) -> ImportResult<CommitResponse> {
        let data = self
            .upload("importTemplate", IMPORT_TEMPLATE, json!({}), file)
            .await?;
        extract(data, Some("importTemplate"))
    }
}

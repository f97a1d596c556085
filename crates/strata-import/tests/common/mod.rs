//! Shared fixtures for pipeline tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};
use strata_import::{
    HostView, ImportConfig, ImportController, RecordingNotifier,
};
use strata_import_types::{
    ColumnMapping, CommitResponse, Disposition, Identity, ImportClient, ImportError,
    ImportResult, MappingCatalog, ReviewRecord, ReviewResponse, StagedFile, MIME_CSV, MIME_JSON,
};

pub const OWNER: &str = "0000-0002-1825-0097";

/// Remote call observed by `FakeImportClient`
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ExtractHeaders(String),
    FetchCatalog,
    ReviewTabular(ColumnMapping),
    ReviewHierarchical(String),
    CommitTabular(ColumnMapping),
    CommitHierarchical(String, Option<String>),
    CommitTemplate(String),
}

/// Replies the fake gives; `Err` strings become `RemoteUnavailable`
#[derive(Debug, Clone)]
pub struct Script {
    pub headers: Result<Vec<String>, String>,
    pub catalog: Result<MappingCatalog, String>,
    pub review: Result<ReviewResponse, String>,
    pub commit: Result<CommitResponse, String>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            headers: Ok(vec![
                "Name".to_string(),
                "Description".to_string(),
                "__EMPTY_1".to_string(),
            ]),
            catalog: Ok(sample_catalog()),
            review: Ok(ReviewResponse {
                success: true,
                message: String::new(),
                records: vec![ReviewRecord::new("Sample A", Disposition::Update)],
            }),
            commit: Ok(CommitResponse {
                success: true,
                message: "Imported".to_string(),
            }),
        }
    }
}

/// In-memory `ImportClient` with scripted replies and a call log
#[derive(Default)]
pub struct FakeImportClient {
    script: Mutex<Script>,
    calls: Mutex<Vec<Call>>,
}

impl FakeImportClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_script(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn update(&self, change: impl FnOnce(&mut Script)) {
        change(&mut self.script.lock().unwrap());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Script {
        self.calls.lock().unwrap().push(call);
        self.script.lock().unwrap().clone()
    }
}

fn reply<T>(scripted: Result<T, String>) -> ImportResult<T> {
    scripted.map_err(ImportError::RemoteUnavailable)
}

#[async_trait]
impl ImportClient for FakeImportClient {
    fn name(&self) -> &str {
        "fake"
    }

    async fn extract_headers(&self, file: &StagedFile) -> ImportResult<Vec<String>> {
        reply(self.record(Call::ExtractHeaders(file.name.clone())).headers)
    }

    async fn fetch_mapping_catalog(&self) -> ImportResult<MappingCatalog> {
        reply(self.record(Call::FetchCatalog).catalog)
    }

    async fn review_tabular(
        &self,
        mapping: &ColumnMapping,
        _file: &StagedFile,
    ) -> ImportResult<ReviewResponse> {
        reply(self.record(Call::ReviewTabular(mapping.clone())).review)
    }

    async fn review_hierarchical(&self, file: &StagedFile) -> ImportResult<ReviewResponse> {
        reply(self.record(Call::ReviewHierarchical(file.name.clone())).review)
    }

    async fn commit_tabular(
        &self,
        mapping: &ColumnMapping,
        _file: &StagedFile,
    ) -> ImportResult<CommitResponse> {
        reply(self.record(Call::CommitTabular(mapping.clone())).commit)
    }

    async fn commit_hierarchical(
        &self,
        file: &StagedFile,
        project: Option<&str>,
    ) -> ImportResult<CommitResponse> {
        let call = Call::CommitHierarchical(file.name.clone(), project.map(str::to_string));
        reply(self.record(call).commit)
    }

    async fn commit_template(&self, file: &StagedFile) -> ImportResult<CommitResponse> {
        reply(self.record(Call::CommitTemplate(file.name.clone())).commit)
    }
}

/// Host view that records close/reload in order
#[derive(Default)]
pub struct RecordingHost {
    events: Mutex<Vec<&'static str>>,
}

impl RecordingHost {
    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

impl HostView for RecordingHost {
    fn close(&self) {
        self.events.lock().unwrap().push("close");
    }

    fn reload(&self) {
        self.events.lock().unwrap().push("reload");
    }
}

pub struct Harness {
    pub controller: ImportController,
    pub client: Arc<FakeImportClient>,
    pub notifier: Arc<RecordingNotifier>,
    pub host: Arc<RecordingHost>,
}

pub fn harness(client: Arc<FakeImportClient>) -> Harness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("strata_import=debug")
        .with_test_writer()
        .try_init();

    let notifier = Arc::new(RecordingNotifier::new());
    let host = Arc::new(RecordingHost::default());
    let controller = ImportController::new(
        ImportConfig::default(),
        client.clone(),
        notifier.clone(),
        host.clone(),
        Identity::new(OWNER),
    );
    Harness {
        controller,
        client,
        notifier,
        host,
    }
}

pub fn sample_catalog() -> MappingCatalog {
    serde_json::from_value(json!({
        "projects": [
            { "_id": "p-1", "name": "Field Survey" },
            { "_id": "p-2", "name": "Greenhouse" }
        ],
        "templates": [{
            "_id": "t-size",
            "name": "Size",
            "description": "Physical dimensions",
            "owner": "someone-else",
            "values": [
                { "_id": "v-1", "name": "Width", "type": "number", "data": 10 },
                { "_id": "v-2", "name": "Height", "type": "number", "data": 4 }
            ]
        }]
    }))
    .unwrap()
}

pub fn csv_file() -> StagedFile {
    StagedFile::new(
        "sample.csv",
        MIME_CSV,
        "Name,Description,\nSample A,First sample,\n",
    )
}

pub fn json_file() -> StagedFile {
    StagedFile::new(
        "samples.json",
        MIME_JSON,
        r#"{"entities":[{"name":"Sample A","description":"First sample"}]}"#,
    )
}

pub fn template_file() -> StagedFile {
    StagedFile::new(
        "templates.json",
        MIME_JSON,
        r#"{"templates":[{"name":"Size","values":[]}]}"#,
    )
}

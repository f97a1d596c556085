//! Core types and traits for the Strata import pipeline
//!
//! This crate provides the foundational abstractions for bulk-loading external
//! records (spreadsheets or JSON object graphs) into Strata entities and templates.
//!
//! # Architecture
//!
//! - **Traits**: `ImportClient` defines the remote collaborator every transport must implement
//! - **Types**: Common data structures like `AttributeDraft`, `FieldMapping`, `ReviewRecord`, etc.
//! - **Errors**: Unified error handling across the pipeline
//!
//! # Usage
//!
//! The pipeline (`strata-import`) depends on this crate and drives an
//! `ImportClient` implementation through the import stages.

pub mod attribute;
pub mod client;
pub mod error;
pub mod file;
pub mod mapping;
pub mod review;
pub mod stage;

pub use attribute::{AttributeDraft, AttributeId, AttributePatch, AttributeValue, ValueType};
pub use client::ImportClient;
pub use error::{ImportError, ImportResult};
pub use file::{ImportSubject, SourceFormat, StagedFile, MIME_CSV, MIME_JSON};
pub use mapping::{ColumnMapping, FieldMapping, Identity, MappingCatalog, ProjectSummary};
pub use review::{CommitResponse, Disposition, ReviewRecord, ReviewResponse};
pub use stage::{EntityStage, ImportStage, TemplateStage};

//! Column resolver for tabular imports

use serde::Serialize;
use strata_import_types::{ImportError, ImportResult};
use tracing::debug;

use crate::config::ImportConfig;

/// Ordered, labelled header row of a tabular file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnSet(Vec<String>);

impl ColumnSet {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.iter().any(|c| c == column)
    }
}

/// Turns the raw header row returned by the server into a `ColumnSet`
#[derive(Debug, Clone)]
pub struct ColumnResolver {
    empty_header_prefix: String,
}

impl ColumnResolver {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            empty_header_prefix: config.empty_header_prefix.clone(),
        }
    }

    /// Drop placeholder headers, keeping the order of the rest
    ///
    /// An empty result is a failure: without labelled columns nothing can be mapped.
    pub fn resolve(&self, headers: Vec<String>) -> ImportResult<ColumnSet> {
        let total = headers.len();
        let columns: Vec<String> = headers
            .into_iter()
            .filter(|header| !header.starts_with(&self.empty_header_prefix))
            .collect();

        debug!(
            total,
            kept = columns.len(),
            "Resolved column headers"
        );

        if columns.is_empty() {
            return Err(ImportError::NoLabelledColumns);
        }
        Ok(ColumnSet(columns))
    }
}

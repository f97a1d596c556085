//! Review and commit response types

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// What the server will do with a prospective record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// No matching record exists; a new one will be created
    Create,
    /// A record with the same name and owner exists and will be updated
    Update,
}

impl Disposition {
    /// Capitalised label shown in the review table
    pub fn label(&self) -> &'static str {
        match self {
            Disposition::Create => "Create",
            Disposition::Update => "Update",
        }
    }
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Disposition::Create => write!(f, "create"),
            Disposition::Update => write!(f, "update"),
        }
    }
}

/// One prospective record in the review preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewRecord {
    pub name: String,
    #[serde(rename = "state")]
    pub disposition: Disposition,
}

impl ReviewRecord {
    pub fn new(name: impl Into<String>, disposition: Disposition) -> Self {
        Self {
            name: name.into(),
            disposition,
        }
    }
}

/// Response of the review operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "data", default, deserialize_with = "null_as_empty")]
    pub records: Vec<ReviewRecord>,
}

/// Response of the commit operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CommitResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ReviewRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ReviewRecord>>::deserialize(deserializer)?.unwrap_or_default())
}

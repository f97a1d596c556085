//! Field mapping and catalog types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::attribute::{AttributeDraft, AttributeId};

/// Authenticated user performing the import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    /// Owner identifier stamped on created records (e.g. an ORCID iD)
    pub owner: String,
}

impl Identity {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
        }
    }
}

/// Project that imported entities can be assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProjectSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// Lookups offered while mapping, fetched once per session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MappingCatalog {
    #[serde(default)]
    pub projects: Vec<ProjectSummary>,
    #[serde(default)]
    pub templates: Vec<AttributeDraft>,
}

impl MappingCatalog {
    pub fn template(&self, id: &AttributeId) -> Option<&AttributeDraft> {
        self.templates.iter().find(|template| &template.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&ProjectSummary> {
        self.projects.iter().find(|project| project.id == id)
    }
}

/// Correspondence between entity fields and source columns
///
/// For tabular imports each field holds a column header; for JSON imports
/// the name and description fields are implicit and the mapping only
/// carries the project and additional attribute drafts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldMapping {
    pub name_field: String,
    pub description_field: String,
    /// Derived from the authenticated identity, never edited
    pub owner_field: String,
    pub project_field: String,
    pub attribute_drafts: Vec<AttributeDraft>,
}

impl FieldMapping {
    pub fn new(identity: &Identity) -> Self {
        Self {
            owner_field: identity.owner.clone(),
            ..Default::default()
        }
    }

    /// Wire payload sent for tabular review and commit
    pub fn to_column_mapping(&self, created: DateTime<Utc>) -> ColumnMapping {
        ColumnMapping {
            name: self.name_field.clone(),
            description: self.description_field.clone(),
            created,
            owner: self.owner_field.clone(),
            project: self.project_field.clone(),
            attributes: self.attribute_drafts.clone(),
        }
    }
}

/// Column mapping as submitted to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ColumnMapping {
    pub name: String,
    pub description: String,
    pub created: DateTime<Utc>,
    pub owner: String,
    pub project: String,
    pub attributes: Vec<AttributeDraft>,
}

//! Import stage types
//!
//! Each subject has its own stage sequence, so a stage is only ever paired
//! with the subject it belongs to.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::file::ImportSubject;

/// Stages of an entities import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntityStage {
    /// Select and stage the source file
    Upload,
    /// Map name, description and project fields
    Details,
    /// Attach attribute drafts
    Mapping,
    /// Inspect the create/update preview and commit
    Review,
}

impl EntityStage {
    pub const TITLES: [&'static str; 4] =
        ["Upload File", "Setup Entities", "Apply Templates", "Review"];

    pub fn next(&self) -> Option<Self> {
        match self {
            EntityStage::Upload => Some(EntityStage::Details),
            EntityStage::Details => Some(EntityStage::Mapping),
            EntityStage::Mapping => Some(EntityStage::Review),
            EntityStage::Review => None,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            EntityStage::Upload => 0,
            EntityStage::Details => 1,
            EntityStage::Mapping => 2,
            EntityStage::Review => 3,
        }
    }
}

/// Stages of a template import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStage {
    Upload,
    Review,
}

impl TemplateStage {
    pub const TITLES: [&'static str; 2] = ["Upload File", "Review"];

    pub fn next(&self) -> Option<Self> {
        match self {
            TemplateStage::Upload => Some(TemplateStage::Review),
            TemplateStage::Review => None,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            TemplateStage::Upload => 0,
            TemplateStage::Review => 1,
        }
    }
}

/// Current stage, tagged with the subject it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(tag = "subject", content = "stage", rename_all = "lowercase")]
pub enum ImportStage {
    Entities(EntityStage),
    Template(TemplateStage),
}

impl Default for ImportStage {
    fn default() -> Self {
        ImportStage::initial(ImportSubject::default())
    }
}

impl ImportStage {
    /// First stage for a subject
    pub fn initial(subject: ImportSubject) -> Self {
        match subject {
            ImportSubject::Entities => ImportStage::Entities(EntityStage::Upload),
            ImportSubject::Template => ImportStage::Template(TemplateStage::Upload),
        }
    }

    pub fn subject(&self) -> ImportSubject {
        match self {
            ImportStage::Entities(_) => ImportSubject::Entities,
            ImportStage::Template(_) => ImportSubject::Template,
        }
    }

    /// Following stage, or `None` at the terminal stage
    pub fn next(&self) -> Option<Self> {
        match self {
            ImportStage::Entities(stage) => stage.next().map(ImportStage::Entities),
            ImportStage::Template(stage) => stage.next().map(ImportStage::Template),
        }
    }

    pub fn is_upload(&self) -> bool {
        matches!(
            self,
            ImportStage::Entities(EntityStage::Upload) | ImportStage::Template(TemplateStage::Upload)
        )
    }

    pub fn is_review(&self) -> bool {
        matches!(
            self,
            ImportStage::Entities(EntityStage::Review) | ImportStage::Template(TemplateStage::Review)
        )
    }

    /// Zero-based position used by step indicators
    pub fn step_index(&self) -> usize {
        match self {
            ImportStage::Entities(stage) => stage.index(),
            ImportStage::Template(stage) => stage.index(),
        }
    }

    pub fn step_titles(&self) -> &'static [&'static str] {
        match self {
            ImportStage::Entities(_) => &EntityStage::TITLES,
            ImportStage::Template(_) => &TemplateStage::TITLES,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ImportStage::Entities(EntityStage::Upload)
            | ImportStage::Template(TemplateStage::Upload) => "upload",
            ImportStage::Entities(EntityStage::Details) => "details",
            ImportStage::Entities(EntityStage::Mapping) => "mapping",
            ImportStage::Entities(EntityStage::Review)
            | ImportStage::Template(TemplateStage::Review) => "review",
        }
    }
}

impl std::fmt::Display for ImportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.subject(), self.name())
    }
}

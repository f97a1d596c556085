//! Mapping context
//!
//! Accumulates field selections and attribute drafts across the details
//! and mapping stages.

use chrono::Utc;
use strata_import_types::{
    AttributeDraft, AttributeId, AttributePatch, FieldMapping, Identity, ImportError, ImportResult,
    MappingCatalog,
};
use tracing::debug;
use uuid::Uuid;

/// Where a new attribute draft comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSource {
    /// Empty draft authored by the user
    Blank,
    /// Copy of a catalog template
    Template(AttributeId),
}

/// Values a draft may hold, as offered to the attribute editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueConstraint<'a> {
    /// Each value names one of these columns
    Columns(&'a [String]),
    /// Free-form values
    Unrestricted,
}

impl ValueConstraint<'_> {
    /// Reject values that do not name a column in the allowed set
    ///
    /// Null or empty data means no column has been chosen yet.
    pub fn check(&self, patch: &AttributePatch) -> ImportResult<()> {
        let (ValueConstraint::Columns(columns), Some(values)) = (self, &patch.values) else {
            return Ok(());
        };
        for value in values {
            if value.data.is_null() || value.data.as_str() == Some("") {
                continue;
            }
            match value.column_reference() {
                Some(column) if columns.iter().any(|c| c == column) => {}
                Some(column) => return Err(ImportError::UnknownColumn(column.to_string())),
                None => return Err(ImportError::UnknownColumn(value.data.to_string())),
            }
        }
        Ok(())
    }

    /// Unbind copied template values so each one must be pointed at a column
    fn unbind(&self, draft: &mut AttributeDraft) {
        if let ValueConstraint::Columns(_) = self {
            for value in &mut draft.values {
                value.data = serde_json::Value::Null;
            }
        }
    }
}

/// Generates draft ids unique within a session: `a-<nonce>-<counter>`
#[derive(Debug, Clone)]
struct DraftIds {
    nonce: String,
    next: u64,
}

impl DraftIds {
    fn new() -> Self {
        let nonce = Uuid::new_v4().simple().to_string();
        Self {
            nonce: nonce[..8].to_string(),
            next: 0,
        }
    }

    fn next_id(&mut self) -> AttributeId {
        self.next += 1;
        AttributeId::new(format!("a-{}-{}", self.nonce, self.next))
    }
}

/// Field mapping, attribute drafts and the lookups used to build them
#[derive(Debug, Clone)]
pub struct MappingContext {
    identity: Identity,
    mapping: FieldMapping,
    catalog: MappingCatalog,
    ids: DraftIds,
}

impl MappingContext {
    pub fn new(identity: Identity) -> Self {
        Self {
            mapping: FieldMapping::new(&identity),
            identity,
            catalog: MappingCatalog::default(),
            ids: DraftIds::new(),
        }
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    pub fn catalog(&self) -> &MappingCatalog {
        &self.catalog
    }

    pub fn drafts(&self) -> &[AttributeDraft] {
        &self.mapping.attribute_drafts
    }

    pub fn set_catalog(&mut self, catalog: MappingCatalog) {
        debug!(
            projects = catalog.projects.len(),
            templates = catalog.templates.len(),
            "Loaded mapping catalog"
        );
        self.catalog = catalog;
    }

    pub fn set_name_field(&mut self, column: impl Into<String>) {
        self.mapping.name_field = column.into();
    }

    pub fn set_description_field(&mut self, column: impl Into<String>) {
        self.mapping.description_field = column.into();
    }

    pub fn set_project_field(&mut self, project: impl Into<String>) {
        self.mapping.project_field = project.into();
    }

    /// Append a draft and return its id
    ///
    /// Returns `None` when the requested template is not in the catalog.
    /// Under a column constraint, values copied from a template start with
    /// null data.
    pub fn add_attribute(
        &mut self,
        source: &AttributeSource,
        constraint: ValueConstraint<'_>,
    ) -> Option<AttributeId> {
        let mut draft = match source {
            AttributeSource::Blank => {
                AttributeDraft::blank(self.ids.next_id(), &self.identity.owner, Utc::now())
            }
            AttributeSource::Template(template_id) => {
                let template = self.catalog.template(template_id)?;
                AttributeDraft::from_template(
                    template,
                    self.ids.next_id(),
                    &self.identity.owner,
                    Utc::now(),
                )
            }
        };
        constraint.unbind(&mut draft);
        let id = draft.id.clone();
        debug!(attribute = %id, ?source, "Added attribute draft");
        self.mapping.attribute_drafts.push(draft);
        Some(id)
    }

    /// Replace the editable fields of the draft with `id`; absent ids are ignored
    pub fn update_attribute(
        &mut self,
        id: &AttributeId,
        patch: AttributePatch,
        constraint: ValueConstraint<'_>,
    ) -> ImportResult<()> {
        constraint.check(&patch)?;
        if let Some(draft) = self
            .mapping
            .attribute_drafts
            .iter_mut()
            .find(|draft| &draft.id == id)
        {
            draft.apply(patch);
        }
        Ok(())
    }

    /// Remove the draft with `id`, returning it if present
    pub fn remove_attribute(&mut self, id: &AttributeId) -> Option<AttributeDraft> {
        let position = self
            .mapping
            .attribute_drafts
            .iter()
            .position(|draft| &draft.id == id)?;
        Some(self.mapping.attribute_drafts.remove(position))
    }
}

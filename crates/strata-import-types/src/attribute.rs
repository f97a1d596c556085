//! Attribute draft types
//!
//! An attribute is a named collection of typed value slots. Drafts are built
//! during the mapping stage and sent with the mapping to the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of an attribute draft or template
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct AttributeId(pub String);

impl AttributeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AttributeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type of a value slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    String,
    Number,
    Date,
    Url,
    /// Reference to another entity
    Entity,
}

/// A single typed value slot within an attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttributeValue {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub value_type: ValueType,
    /// Literal data, or for tabular imports the header of the column to read
    #[serde(default)]
    pub data: serde_json::Value,
}

impl AttributeValue {
    /// Column header referenced by this value, if the data is a non-empty string
    pub fn column_reference(&self) -> Option<&str> {
        self.data.as_str().filter(|column| !column.is_empty())
    }
}

/// Attribute being authored for the import, or a template in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttributeDraft {
    #[serde(rename = "_id")]
    pub id: AttributeId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub values: Vec<AttributeValue>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
}

impl AttributeDraft {
    /// Empty draft authored by `owner`
    pub fn blank(id: AttributeId, owner: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            name: String::new(),
            description: String::new(),
            values: Vec::new(),
            archived: false,
            owner: owner.into(),
            timestamp,
        }
    }

    /// Draft copying a template's name, description and values
    pub fn from_template(
        template: &AttributeDraft,
        id: AttributeId,
        owner: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: template.name.clone(),
            description: template.description.clone(),
            values: template.values.clone(),
            archived: false,
            owner: owner.into(),
            timestamp,
        }
    }

    /// Replace the editable fields present in `patch`
    pub fn apply(&mut self, patch: AttributePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(values) = patch.values {
            self.values = values;
        }
    }
}

/// Partial update of an attribute draft
///
/// Only name, description and values are editable; id, owner and timestamp
/// are fixed when the draft is created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttributePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub values: Option<Vec<AttributeValue>>,
}

impl AttributePatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn values(mut self, values: Vec<AttributeValue>) -> Self {
        self.values = Some(values);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn size_template() -> AttributeDraft {
        serde_json::from_value(json!({
            "_id": "t-size",
            "name": "Size",
            "description": "Physical dimensions",
            "owner": "0000-0002-1825-0097",
            "timestamp": "2024-03-01T10:00:00Z",
            "values": [
                { "_id": "v-1", "name": "Width", "type": "number", "data": 12 },
                { "_id": "v-2", "name": "Height", "type": "number", "data": 4 }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_template_deserializes_from_wire_shape() {
        let template = size_template();
        assert_eq!(template.id.as_str(), "t-size");
        assert_eq!(template.values.len(), 2);
        assert_eq!(template.values[0].value_type, ValueType::Number);
        assert!(!template.archived);
    }

    #[test]
    fn test_from_template_takes_new_identity() {
        let template = size_template();
        let now = Utc::now();
        let draft =
            AttributeDraft::from_template(&template, AttributeId::new("a-1"), "0000-0001", now);

        assert_eq!(draft.id.as_str(), "a-1");
        assert_eq!(draft.owner, "0000-0001");
        assert_eq!(draft.timestamp, now);
        assert_eq!(draft.name, "Size");
        assert_eq!(draft.values, template.values);
    }

    #[test]
    fn test_apply_patch_keeps_identity() {
        let mut draft = AttributeDraft::blank(AttributeId::new("a-1"), "owner", Utc::now());
        let before = draft.clone();

        draft.apply(AttributePatch::default().name("Mass"));

        assert_eq!(draft.name, "Mass");
        assert_eq!(draft.description, "");
        assert_eq!(draft.id, before.id);
        assert_eq!(draft.owner, before.owner);
        assert_eq!(draft.timestamp, before.timestamp);
    }

    #[test]
    fn test_column_reference_ignores_empty_and_non_string_data() {
        let mut value = AttributeValue {
            id: "v".into(),
            name: "Width".into(),
            value_type: ValueType::Number,
            data: json!("Width (mm)"),
        };
        assert_eq!(value.column_reference(), Some("Width (mm)"));

        value.data = json!("");
        assert_eq!(value.column_reference(), None);

        value.data = json!(3);
        assert_eq!(value.column_reference(), None);
    }
}

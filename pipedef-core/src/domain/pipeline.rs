//! Pipeline domain types

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::parameter::{ParameterObject, ParameterValue};
use crate::set::{IdentitySet, SetElement};

/// A complete pipeline definition
///
/// The aggregate root. `pipeline_id` is supplied by the user and doubles as
/// the identity of the provisioned resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineDefinition {
    pub pipeline_id: String,

    #[serde(alias = "pipeline_object")]
    pub pipeline_objects: IdentitySet<PipelineObject>,

    #[serde(default, alias = "parameter_object", skip_serializing_if = "IdentitySet::is_empty")]
    pub parameter_objects: IdentitySet<ParameterObject>,

    #[serde(default, alias = "parameter_value", skip_serializing_if = "IdentitySet::is_empty")]
    pub parameter_values: IdentitySet<ParameterValue>,
}

impl PipelineDefinition {
    /// Creates an empty definition for the given pipeline
    pub fn new(pipeline_id: impl Into<String>) -> Self {
        Self {
            pipeline_id: pipeline_id.into(),
            pipeline_objects: IdentitySet::new(),
            parameter_objects: IdentitySet::new(),
            parameter_values: IdentitySet::new(),
        }
    }

    pub fn with_object(mut self, object: PipelineObject) -> Self {
        self.pipeline_objects.insert(object);
        self
    }

    pub fn with_parameter_object(mut self, object: ParameterObject) -> Self {
        self.parameter_objects.insert(object);
        self
    }

    pub fn with_parameter_value(mut self, value: ParameterValue) -> Self {
        self.parameter_values.insert(value);
        self
    }
}

/// One node of the pipeline graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineObject {
    pub id: String,
    pub name: String,

    #[serde(default, alias = "field", skip_serializing_if = "IdentitySet::is_empty")]
    pub fields: IdentitySet<Field>,
}

impl PipelineObject {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fields: IdentitySet::new(),
        }
    }

    /// Adds a field, ignoring exact duplicates
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.insert(field);
        self
    }
}

impl SetElement for PipelineObject {
    fn tokens(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Owned(self.fields.render()),
            Cow::Borrowed(self.id.as_str()),
            Cow::Borrowed(self.name.as_str()),
        ]
    }
}

/// A key on a [`PipelineObject`]
///
/// Carries either a literal `string_value` or a `ref_value` naming another
/// object. An empty string means the value is unset; a key-only field is
/// legal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub key: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ref_value: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub string_value: String,
}

impl Field {
    /// A field holding a literal value
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            string_value: value.into(),
            ..Default::default()
        }
    }

    /// A field referencing another pipeline object by id
    pub fn reference(key: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ref_value: target.into(),
            ..Default::default()
        }
    }

    pub fn key_only(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }
}

impl SetElement for Field {
    fn tokens(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.key.as_str()),
            Cow::Borrowed(self.ref_value.as_str()),
            Cow::Borrowed(self.string_value.as_str()),
        ]
    }
}

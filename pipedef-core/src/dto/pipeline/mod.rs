//! Pipeline DTOs and service requests

use serde::{Deserialize, Serialize};

use super::parameter::{ApiParameterObject, ApiParameterValue};

/// Wire form of a pipeline object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPipelineObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<ApiField>>,
}

/// Wire form of a pipeline object field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
}

/// Request to store a definition on an existing pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutPipelineDefinition {
    pub pipeline_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_objects: Option<Vec<ApiPipelineObject>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_objects: Option<Vec<ApiParameterObject>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_values: Option<Vec<ApiParameterValue>>,
}

/// Response to [`PutPipelineDefinition`]
///
/// A successful call may still carry `errored = true` when the service
/// rejected the definition during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutPipelineDefinitionOutput {
    #[serde(default)]
    pub errored: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<ValidationError>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_warnings: Vec<ValidationWarning>,
}

/// Validation failures reported against one object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Non-fatal validation findings reported against one object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Request to activate a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivatePipeline {
    pub pipeline_id: String,
}

/// Which stored version of a definition to fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionVersion {
    /// Last definition written, activated or not
    #[default]
    Latest,
    /// Definition currently running
    Active,
}

impl std::fmt::Display for DefinitionVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefinitionVersion::Latest => write!(f, "latest"),
            DefinitionVersion::Active => write!(f, "active"),
        }
    }
}

impl std::str::FromStr for DefinitionVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "latest" => Ok(DefinitionVersion::Latest),
            "active" => Ok(DefinitionVersion::Active),
            other => Err(format!("unknown definition version: {}", other)),
        }
    }
}

/// Request to fetch a stored definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPipelineDefinition {
    pub pipeline_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<DefinitionVersion>,
}

/// Response to [`GetPipelineDefinition`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPipelineDefinitionOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_objects: Option<Vec<ApiPipelineObject>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_objects: Option<Vec<ApiParameterObject>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_values: Option<Vec<ApiParameterValue>>,
}

//! Tree codec
//!
//! Maps configuration records onto the service's wire DTOs (encode) and
//! back (decode). Each entity kind has a `From<&Domain> for Api` / `From<&Api>
//! for Domain` pair; the set helpers and definition-level functions compose
//! them.
//!
//! Encoding omits empty optional scalars and empty sets entirely. Decoding
//! turns any absent wire value into an empty string, and re-keys every
//! decoded element through its content identity, so the order the service
//! returns elements in never matters.

use crate::domain::parameter::{ParameterAttribute, ParameterObject, ParameterValue};
use crate::domain::pipeline::{Field, PipelineDefinition, PipelineObject};
use crate::dto::parameter::{ApiParameterAttribute, ApiParameterObject, ApiParameterValue};
use crate::dto::pipeline::{
    ApiField, ApiPipelineObject, GetPipelineDefinitionOutput, PutPipelineDefinition,
};
use crate::set::{IdentitySet, SetElement};

// =============================================================================
// Set helpers
// =============================================================================

/// Encode a set, yielding `None` when it has no elements
pub fn encode_set<T, A>(set: &IdentitySet<T>) -> Option<Vec<A>>
where
    A: for<'a> From<&'a T>,
{
    if set.is_empty() {
        return None;
    }

    Some(set.iter().map(A::from).collect())
}

/// Decode a wire list into an identity-keyed set
pub fn decode_set<A, T>(list: Option<&[A]>) -> IdentitySet<T>
where
    T: SetElement + for<'a> From<&'a A>,
{
    list.unwrap_or_default().iter().map(T::from).collect()
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// =============================================================================
// Definition
// =============================================================================

/// Build the submission request for a definition
pub fn encode_definition(definition: &PipelineDefinition) -> PutPipelineDefinition {
    let request = PutPipelineDefinition {
        pipeline_id: definition.pipeline_id.clone(),
        pipeline_objects: encode_set(&definition.pipeline_objects),
        parameter_objects: encode_set(&definition.parameter_objects),
        parameter_values: encode_set(&definition.parameter_values),
    };

    tracing::debug!(
        "Encoded definition {}: {} object(s), {} parameter object(s), {} parameter value(s)",
        definition.pipeline_id,
        definition.pipeline_objects.len(),
        definition.parameter_objects.len(),
        definition.parameter_values.len()
    );

    request
}

/// Rebuild a definition from a fetched graph
///
/// The service never echoes the pipeline id inside the graph, so the caller
/// supplies it.
pub fn decode_definition(
    pipeline_id: &str,
    output: &GetPipelineDefinitionOutput,
) -> PipelineDefinition {
    PipelineDefinition {
        pipeline_id: pipeline_id.to_string(),
        pipeline_objects: decode_set(output.pipeline_objects.as_deref()),
        parameter_objects: decode_set(output.parameter_objects.as_deref()),
        parameter_values: decode_set(output.parameter_values.as_deref()),
    }
}

impl From<&PipelineDefinition> for PutPipelineDefinition {
    fn from(definition: &PipelineDefinition) -> Self {
        encode_definition(definition)
    }
}

// =============================================================================
// Pipeline objects and fields
// =============================================================================

impl From<&PipelineObject> for ApiPipelineObject {
    fn from(object: &PipelineObject) -> Self {
        ApiPipelineObject {
            id: Some(object.id.clone()),
            name: Some(object.name.clone()),
            fields: encode_set(&object.fields),
        }
    }
}

impl From<&ApiPipelineObject> for PipelineObject {
    fn from(api: &ApiPipelineObject) -> Self {
        PipelineObject {
            id: api.id.clone().unwrap_or_default(),
            name: api.name.clone().unwrap_or_default(),
            fields: decode_set(api.fields.as_deref()),
        }
    }
}

impl From<&Field> for ApiField {
    fn from(field: &Field) -> Self {
        ApiField {
            key: Some(field.key.clone()),
            ref_value: non_empty(&field.ref_value),
            string_value: non_empty(&field.string_value),
        }
    }
}

impl From<&ApiField> for Field {
    fn from(api: &ApiField) -> Self {
        Field {
            key: api.key.clone().unwrap_or_default(),
            ref_value: api.ref_value.clone().unwrap_or_default(),
            string_value: api.string_value.clone().unwrap_or_default(),
        }
    }
}

// =============================================================================
// Parameters
// =============================================================================

impl From<&ParameterObject> for ApiParameterObject {
    fn from(object: &ParameterObject) -> Self {
        ApiParameterObject {
            id: Some(object.id.clone()),
            attributes: encode_set(&object.attributes),
        }
    }
}

impl From<&ApiParameterObject> for ParameterObject {
    fn from(api: &ApiParameterObject) -> Self {
        ParameterObject {
            id: api.id.clone().unwrap_or_default(),
            attributes: decode_set(api.attributes.as_deref()),
        }
    }
}

impl From<&ParameterAttribute> for ApiParameterAttribute {
    fn from(attribute: &ParameterAttribute) -> Self {
        ApiParameterAttribute {
            key: Some(attribute.key.clone()),
            string_value: Some(attribute.string_value.clone()),
        }
    }
}

impl From<&ApiParameterAttribute> for ParameterAttribute {
    fn from(api: &ApiParameterAttribute) -> Self {
        ParameterAttribute {
            key: api.key.clone().unwrap_or_default(),
            string_value: api.string_value.clone().unwrap_or_default(),
        }
    }
}

impl From<&ParameterValue> for ApiParameterValue {
    fn from(value: &ParameterValue) -> Self {
        ApiParameterValue {
            id: Some(value.id.clone()),
            string_value: Some(value.string_value.clone()),
        }
    }
}

impl From<&ApiParameterValue> for ParameterValue {
    fn from(api: &ApiParameterValue) -> Self {
        ParameterValue {
            id: api.id.clone().unwrap_or_default(),
            string_value: api.string_value.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_definition() -> PipelineDefinition {
        PipelineDefinition::new("df-0123456789")
            .with_object(
                PipelineObject::new("Default", "Default")
                    .with_field(Field::string("type", "Default"))
                    .with_field(Field::string("scheduleType", "cron"))
                    .with_field(Field::reference("schedule", "DailySchedule")),
            )
            .with_object(
                PipelineObject::new("DailySchedule", "Every day")
                    .with_field(Field::string("type", "Schedule"))
                    .with_field(Field::string("period", "1 day"))
                    .with_field(Field::key_only("startAt")),
            )
            .with_parameter_object(
                ParameterObject::new("myS3Path")
                    .with_attribute("type", "AWS::S3::ObjectKey")
                    .with_attribute("description", "Input path"),
            )
            .with_parameter_value(ParameterValue::new("myS3Path", "s3://bucket/input"))
    }

    fn as_output(request: &PutPipelineDefinition) -> GetPipelineDefinitionOutput {
        GetPipelineDefinitionOutput {
            pipeline_objects: request.pipeline_objects.clone(),
            parameter_objects: request.parameter_objects.clone(),
            parameter_values: request.parameter_values.clone(),
        }
    }

    #[test]
    fn test_single_object_without_parameters() {
        let definition = PipelineDefinition::new("df-1").with_object(
            PipelineObject::new("Default", "Default").with_field(Field::string("type", "Default")),
        );

        let request = encode_definition(&definition);
        assert!(request.parameter_objects.is_none());
        assert!(request.parameter_values.is_none());
        assert_eq!(request.pipeline_objects.as_ref().map(Vec::len), Some(1));

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "pipelineId": "df-1",
                "pipelineObjects": [
                    {
                        "id": "Default",
                        "name": "Default",
                        "fields": [{"key": "type", "stringValue": "Default"}]
                    }
                ]
            })
        );
    }

    #[test]
    fn test_empty_optional_field_values_are_omitted() {
        let api = ApiField::from(&Field::key_only("startAt"));
        assert_eq!(api.key.as_deref(), Some("startAt"));
        assert!(api.ref_value.is_none());
        assert!(api.string_value.is_none());

        let api = ApiField::from(&Field::reference("schedule", "DailySchedule"));
        assert_eq!(api.ref_value.as_deref(), Some("DailySchedule"));
        assert!(api.string_value.is_none());
    }

    #[test]
    fn test_both_field_values_are_sent_when_present() {
        let field = Field {
            key: "k".to_string(),
            ref_value: "Other".to_string(),
            string_value: "literal".to_string(),
        };
        let api = ApiField::from(&field);
        assert_eq!(api.ref_value.as_deref(), Some("Other"));
        assert_eq!(api.string_value.as_deref(), Some("literal"));
        assert_eq!(Field::from(&api), field);
    }

    #[test]
    fn test_required_parameter_strings_are_sent_even_when_empty() {
        let api = ApiParameterValue::from(&ParameterValue::new("p", ""));
        assert_eq!(api.string_value.as_deref(), Some(""));

        let api = ApiParameterAttribute::from(&ParameterAttribute::new("description", ""));
        assert_eq!(api.string_value.as_deref(), Some(""));
    }

    #[test]
    fn test_empty_nested_sets_are_omitted() {
        let api = ApiPipelineObject::from(&PipelineObject::new("Empty", "Empty"));
        assert!(api.fields.is_none());

        let api = ApiParameterObject::from(&ParameterObject::new("p"));
        assert!(api.attributes.is_none());
    }

    #[test]
    fn test_entity_round_trips() {
        let field = Field::string("type", "Default");
        assert_eq!(Field::from(&ApiField::from(&field)), field);

        let object = PipelineObject::new("Default", "")
            .with_field(field)
            .with_field(Field::key_only("startAt"));
        assert_eq!(PipelineObject::from(&ApiPipelineObject::from(&object)), object);

        let attribute = ParameterAttribute::new("type", "String");
        assert_eq!(
            ParameterAttribute::from(&ApiParameterAttribute::from(&attribute)),
            attribute
        );

        let parameter = ParameterObject::new("p").with_attribute("type", "String");
        assert_eq!(
            ParameterObject::from(&ApiParameterObject::from(&parameter)),
            parameter
        );

        let value = ParameterValue::new("p", "");
        assert_eq!(ParameterValue::from(&ApiParameterValue::from(&value)), value);
    }

    #[test]
    fn test_definition_round_trip() {
        let definition = sample_definition();
        let request = encode_definition(&definition);
        let decoded = decode_definition(&definition.pipeline_id, &as_output(&request));
        assert_eq!(decoded, definition);
    }

    #[test]
    fn test_decode_ignores_service_ordering() {
        let request = encode_definition(&sample_definition());
        let mut shuffled = as_output(&request);

        if let Some(objects) = shuffled.pipeline_objects.as_mut() {
            objects.reverse();
            for object in objects.iter_mut() {
                if let Some(fields) = object.fields.as_mut() {
                    fields.rotate_left(1);
                }
            }
        }
        if let Some(parameters) = shuffled.parameter_objects.as_mut() {
            for parameter in parameters.iter_mut() {
                if let Some(attributes) = parameter.attributes.as_mut() {
                    attributes.reverse();
                }
            }
        }

        assert_eq!(
            decode_definition("df-0123456789", &shuffled),
            decode_definition("df-0123456789", &as_output(&request))
        );
    }

    #[test]
    fn test_decode_then_encode_keeps_set_contents() {
        let output = GetPipelineDefinitionOutput {
            pipeline_objects: Some(vec![
                ApiPipelineObject {
                    id: Some("B".to_string()),
                    name: Some("B".to_string()),
                    fields: Some(vec![ApiField {
                        key: Some("type".to_string()),
                        ref_value: None,
                        string_value: Some("Schedule".to_string()),
                    }]),
                },
                ApiPipelineObject {
                    id: Some("A".to_string()),
                    name: Some("A".to_string()),
                    fields: None,
                },
            ]),
            parameter_objects: None,
            parameter_values: None,
        };

        let decoded = decode_definition("df-1", &output);
        let encoded = encode_definition(&decoded);

        let mut before = output.pipeline_objects.clone().unwrap();
        let mut after = encoded.pipeline_objects.unwrap();
        before.sort_by(|a, b| a.id.cmp(&b.id));
        after.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(before, after);
        assert!(encoded.parameter_objects.is_none());
        assert!(encoded.parameter_values.is_none());
    }

    #[test]
    fn test_absent_wire_values_decode_to_empty_strings() {
        let field = Field::from(&ApiField {
            key: Some("startAt".to_string()),
            ref_value: None,
            string_value: None,
        });
        assert_eq!(field.ref_value, "");
        assert_eq!(field.string_value, "");

        let object = PipelineObject::from(&ApiPipelineObject::default());
        assert_eq!(object.id, "");
        assert_eq!(object.name, "");
        assert!(object.fields.is_empty());
    }

    #[test]
    fn test_present_empty_string_collapses_to_absent() {
        // An empty value from the service re-encodes as omitted
        let api = ApiField {
            key: Some("k".to_string()),
            ref_value: None,
            string_value: Some(String::new()),
        };
        let reencoded = ApiField::from(&Field::from(&api));
        assert!(reencoded.string_value.is_none());
    }

    #[test]
    fn test_duplicate_wire_elements_collapse() {
        let value = ApiParameterValue {
            id: Some("p".to_string()),
            string_value: Some("v".to_string()),
        };
        let set: IdentitySet<ParameterValue> = decode_set(Some(&[value.clone(), value][..]));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_empty_wire_list_decodes_to_empty_set() {
        let output = GetPipelineDefinitionOutput {
            pipeline_objects: Some(vec![]),
            parameter_objects: None,
            parameter_values: Some(vec![]),
        };
        let decoded = decode_definition("df-1", &output);
        assert!(decoded.pipeline_objects.is_empty());
        assert!(decoded.parameter_values.is_empty());
    }
}

//! Parameter domain types

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::set::{IdentitySet, SetElement};

/// A parameter declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterObject {
    pub id: String,

    #[serde(default, alias = "attribute", skip_serializing_if = "IdentitySet::is_empty")]
    pub attributes: IdentitySet<ParameterAttribute>,
}

impl ParameterObject {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: IdentitySet::new(),
        }
    }

    /// Adds an attribute, ignoring exact duplicates
    pub fn with_attribute(mut self, key: impl Into<String>, string_value: impl Into<String>) -> Self {
        self.attributes
            .insert(ParameterAttribute::new(key, string_value));
        self
    }
}

impl SetElement for ParameterObject {
    fn tokens(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Owned(self.attributes.render()),
            Cow::Borrowed(self.id.as_str()),
        ]
    }
}

/// One attribute of a [`ParameterObject`], such as `type` or `description`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterAttribute {
    pub key: String,
    pub string_value: String,
}

impl ParameterAttribute {
    pub fn new(key: impl Into<String>, string_value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            string_value: string_value.into(),
        }
    }
}

impl SetElement for ParameterAttribute {
    fn tokens(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.key.as_str()),
            Cow::Borrowed(self.string_value.as_str()),
        ]
    }
}

/// A concrete value bound to a declared parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterValue {
    pub id: String,
    pub string_value: String,
}

impl ParameterValue {
    pub fn new(id: impl Into<String>, string_value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            string_value: string_value.into(),
        }
    }
}

impl SetElement for ParameterValue {
    fn tokens(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.id.as_str()),
            Cow::Borrowed(self.string_value.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::string_hashcode;

    #[test]
    fn test_attribute_identity_is_key_then_value() {
        let attribute = ParameterAttribute::new("12345", "6789");
        assert_eq!(attribute.set_id(), string_hashcode("123456789"));
    }

    #[test]
    fn test_value_identity_is_id_then_value() {
        let value = ParameterValue::new("myS3Path", "s3://bucket/key");
        assert_eq!(value.set_id(), string_hashcode("myS3Paths3://bucket/key"));
    }

    #[test]
    fn test_parameter_object_identity_ignores_attribute_order() {
        let a = ParameterObject::new("myS3Path")
            .with_attribute("type", "AWS::S3::ObjectKey")
            .with_attribute("description", "Input path");
        let b = ParameterObject::new("myS3Path")
            .with_attribute("description", "Input path")
            .with_attribute("type", "AWS::S3::ObjectKey");

        assert_eq!(a, b);
        assert_eq!(a.set_id(), b.set_id());
    }

    #[test]
    fn test_parameter_object_identity_tracks_attribute_content() {
        let a = ParameterObject::new("myS3Path").with_attribute("type", "String");
        let b = ParameterObject::new("myS3Path").with_attribute("type", "Integer");
        assert_ne!(a.set_id(), b.set_id());
    }

    #[test]
    fn test_parameter_object_identity_uses_rendered_set_then_id() {
        let object = ParameterObject::new("p").with_attribute("k", "v");
        let expected = string_hashcode(&format!("{}p", object.attributes.render()));
        assert_eq!(object.set_id(), expected);
    }

    #[test]
    fn test_parameter_object_accepts_singular_alias() {
        let json = r#"{"id":"p","attribute":[{"key":"type","string_value":"String"}]}"#;
        let object: ParameterObject = serde_json::from_str(json).unwrap();
        assert_eq!(object.attributes.len(), 1);
    }
}

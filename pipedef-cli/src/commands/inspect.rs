//! Offline inspection commands

use anyhow::Result;
use colored::*;
use pipedef_core::SetElement;
use pipedef_core::codec::encode_definition;
use pipedef_core::domain::pipeline::PipelineDefinition;

use crate::loader::load_definition;

/// Print the wire request a definition file encodes to
pub fn encode_file(path: &str) -> Result<()> {
    let definition = load_definition(path)?;
    let request = encode_definition(&definition);

    println!("{}", serde_json::to_string_pretty(&request)?);

    Ok(())
}

/// Print the identity of every set element in a definition file
pub fn identity_file(path: &str) -> Result<()> {
    let definition = load_definition(path)?;

    for line in identity_lines(&definition) {
        println!("{}", line);
    }

    Ok(())
}

/// Lines listing each element with its identity, in identity order
fn identity_lines(definition: &PipelineDefinition) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("{}", "Pipeline objects:".bold()));
    for (id, object) in definition.pipeline_objects.entries() {
        lines.push(format!("  {:>10}  {}", id.to_string().cyan(), object.id));
        for (field_id, field) in object.fields.entries() {
            lines.push(format!(
                "    {:>10}  {}",
                field_id.to_string().dimmed(),
                field.key
            ));
        }
    }

    if !definition.parameter_objects.is_empty() {
        lines.push(format!("{}", "Parameter objects:".bold()));
        for (id, parameter) in definition.parameter_objects.entries() {
            lines.push(format!("  {:>10}  {}", id.to_string().cyan(), parameter.id));
            for (attribute_id, attribute) in parameter.attributes.entries() {
                lines.push(format!(
                    "    {:>10}  {}",
                    attribute_id.to_string().dimmed(),
                    attribute.key
                ));
            }
        }
    }

    if !definition.parameter_values.is_empty() {
        lines.push(format!("{}", "Parameter values:".bold()));
        for value in &definition.parameter_values {
            lines.push(format!(
                "  {:>10}  {}",
                value.set_id().to_string().cyan(),
                value.id
            ));
        }
    }

    lines
}

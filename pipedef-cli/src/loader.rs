//! Definition file loading

use anyhow::{Context, Result};
use pipedef_core::domain::pipeline::PipelineDefinition;

/// Read a JSON pipeline definition from disk
pub fn load_definition(path: &str) -> Result<PipelineDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read definition file: {}", path))?;

    parse_definition(&content)
        .with_context(|| format!("Failed to parse definition file: {}", path))
}

/// Parse a JSON pipeline definition
pub fn parse_definition(content: &str) -> Result<PipelineDefinition> {
    let definition: PipelineDefinition = serde_json::from_str(content)?;

    if definition.pipeline_id.is_empty() {
        anyhow::bail!("pipeline_id cannot be empty");
    }

    if definition.pipeline_objects.is_empty() {
        anyhow::bail!("pipeline_object must contain at least one object");
    }

    Ok(definition)
}

//! Read path
//!
//! Fetches the stored definition and decodes it back into configuration
//! shape. A pipeline that no longer exists is reported as
//! [`ReadOutcome::Gone`] so the caller can drop its record.

use pipedef_client::PipelineApi;
use pipedef_core::codec::decode_definition;
use pipedef_core::domain::pipeline::PipelineDefinition;
use pipedef_core::dto::pipeline::{DefinitionVersion, GetPipelineDefinition};
use tracing::{info, warn};

use crate::error::{ProvisionError, Result};

/// Result of reading a pipeline definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The definition exists remotely
    Found(PipelineDefinition),
    /// The pipeline is gone; drop the local record
    Gone,
}

impl ReadOutcome {
    pub fn definition(&self) -> Option<&PipelineDefinition> {
        match self {
            ReadOutcome::Found(definition) => Some(definition),
            ReadOutcome::Gone => None,
        }
    }

    pub fn is_gone(&self) -> bool {
        matches!(self, ReadOutcome::Gone)
    }
}

/// Read the definition of a managed pipeline
///
/// A deleted pipeline is always reported as gone. A pipeline that is not
/// found is reported as gone only when it is not newly created; right after
/// creation a missing pipeline is an error.
///
/// # Arguments
/// * `api` - The remote service
/// * `pipeline_id` - Identity of the record
/// * `is_new_resource` - Whether the record was created by this run
pub async fn read_definition<A>(
    api: &A,
    pipeline_id: &str,
    is_new_resource: bool,
) -> Result<ReadOutcome>
where
    A: PipelineApi + ?Sized,
{
    let response = api
        .get_pipeline_definition(GetPipelineDefinition {
            pipeline_id: pipeline_id.to_string(),
            version: None,
        })
        .await;

    match response {
        Err(e) if (!is_new_resource && e.is_pipeline_not_found()) || e.is_pipeline_deleted() => {
            warn!(
                "Pipeline definition {} not found, removing from state",
                pipeline_id
            );
            Ok(ReadOutcome::Gone)
        }
        Err(source) => Err(ProvisionError::Read {
            pipeline_id: pipeline_id.to_string(),
            source,
        }),
        Ok(output) => Ok(ReadOutcome::Found(decode_definition(pipeline_id, &output))),
    }
}

/// Look up the definition of any pipeline
///
/// Unlike [`read_definition`], nothing is treated as absence: every error,
/// including not found, is returned.
pub async fn read_data_source<A>(
    api: &A,
    pipeline_id: &str,
    version: Option<DefinitionVersion>,
) -> Result<PipelineDefinition>
where
    A: PipelineApi + ?Sized,
{
    let output = api
        .get_pipeline_definition(GetPipelineDefinition {
            pipeline_id: pipeline_id.to_string(),
            version,
        })
        .await
        .map_err(|source| ProvisionError::Read {
            pipeline_id: pipeline_id.to_string(),
            source,
        })?;

    let definition = decode_definition(pipeline_id, &output);
    info!(
        "Fetched pipeline definition {} ({} object(s))",
        pipeline_id,
        definition.pipeline_objects.len()
    );

    Ok(definition)
}

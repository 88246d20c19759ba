//! Pipedef provisioner
//!
//! Lifecycle operations for a managed pipeline definition: create with
//! bounded retries and activation, read with absence detection, import,
//! and the definition lookup used by data sources.

pub mod config;
pub mod error;
pub mod reconcile;
pub mod retry;
pub mod submission;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{ProvisionError, Result, ValidationErrors};
pub use reconcile::ReadOutcome;

use pipedef_client::PipelineApi;
use pipedef_core::domain::pipeline::PipelineDefinition;
use pipedef_core::dto::pipeline::DefinitionVersion;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Managed pipeline definition resource
///
/// Binds a service handle to the provisioner configuration. The resource
/// identity is always the pipeline id.
pub struct PipelineDefinitionResource<A: ?Sized> {
    api: Arc<A>,
    config: Config,
}

impl<A> PipelineDefinitionResource<A>
where
    A: PipelineApi + ?Sized,
{
    pub fn new(api: Arc<A>, config: Config) -> Self {
        Self { api, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Submit, validate and activate a definition
    ///
    /// Returns the identity to record for the resource.
    pub async fn create(
        &self,
        definition: &PipelineDefinition,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let policy = self.config.retry_policy();
        submission::create_definition(self.api.as_ref(), definition, &policy, cancel).await
    }

    /// Refresh the recorded state from the service
    pub async fn read(&self, pipeline_id: &str, is_new_resource: bool) -> Result<ReadOutcome> {
        reconcile::read_definition(self.api.as_ref(), pipeline_id, is_new_resource).await
    }

    /// Adopt an existing pipeline's definition
    pub async fn import(&self, pipeline_id: &str) -> Result<ReadOutcome> {
        info!("Importing pipeline definition {}", pipeline_id);
        self.read(pipeline_id, false).await
    }

    /// Forget the resource
    ///
    /// The definition's lifetime belongs to the pipeline, so nothing is sent
    /// to the service.
    pub fn delete(&self, pipeline_id: &str) {
        info!(
            "Removing pipeline definition {} from state; the pipeline itself is left in place",
            pipeline_id
        );
    }

    /// Look up the definition of any pipeline
    pub async fn read_data_source(
        &self,
        pipeline_id: &str,
        version: Option<DefinitionVersion>,
    ) -> Result<PipelineDefinition> {
        reconcile::read_data_source(self.api.as_ref(), pipeline_id, version).await
    }
}

//! Pipeline definition operations

use async_trait::async_trait;
use pipedef_core::dto::pipeline::{
    ActivatePipeline, GetPipelineDefinition, GetPipelineDefinitionOutput, PutPipelineDefinition,
    PutPipelineDefinitionOutput,
};
use serde::Deserialize;

use crate::DataPipelineClient;
use crate::error::Result;

/// The remote operations a pipeline definition needs
///
/// Implemented by [`DataPipelineClient`]; the provisioning layer depends on
/// this trait only, so it can be driven by an in-memory fake in tests.
#[async_trait]
pub trait PipelineApi: Send + Sync {
    /// Store a definition on an existing pipeline
    ///
    /// A successful call may still report `errored = true` with validation
    /// errors in the output.
    async fn put_pipeline_definition(
        &self,
        req: &PutPipelineDefinition,
    ) -> Result<PutPipelineDefinitionOutput>;

    /// Activate a pipeline whose definition has been stored
    async fn activate_pipeline(&self, req: ActivatePipeline) -> Result<()>;

    /// Fetch the stored definition graph
    async fn get_pipeline_definition(
        &self,
        req: GetPipelineDefinition,
    ) -> Result<GetPipelineDefinitionOutput>;
}

/// `ActivatePipeline` returns an empty object
#[derive(Debug, Deserialize)]
struct ActivatePipelineOutput {}

#[async_trait]
impl PipelineApi for DataPipelineClient {
    async fn put_pipeline_definition(
        &self,
        req: &PutPipelineDefinition,
    ) -> Result<PutPipelineDefinitionOutput> {
        self.call("PutPipelineDefinition", req).await
    }

    async fn activate_pipeline(&self, req: ActivatePipeline) -> Result<()> {
        let _: ActivatePipelineOutput = self.call("ActivatePipeline", &req).await?;
        Ok(())
    }

    async fn get_pipeline_definition(
        &self,
        req: GetPipelineDefinition,
    ) -> Result<GetPipelineDefinitionOutput> {
        self.call("GetPipelineDefinition", &req).await
    }
}

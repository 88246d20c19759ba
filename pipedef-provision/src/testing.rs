//! Scripted in-memory service for protocol tests

use async_trait::async_trait;
use pipedef_client::error::{Result, codes};
use pipedef_client::{ClientError, PipelineApi};
use pipedef_core::dto::pipeline::{
    ActivatePipeline, GetPipelineDefinition, GetPipelineDefinitionOutput, PutPipelineDefinition,
    PutPipelineDefinitionOutput, ValidationError, ValidationWarning,
};
use std::collections::VecDeque;
use std::sync::Mutex;

type PutResponse = Result<PutPipelineDefinitionOutput>;

/// Fake service that replays queued responses
///
/// Put responses are consumed in order; once the queue is empty every call
/// gets the fallback. Every call is recorded.
pub struct FakeApi {
    put_queue: Mutex<VecDeque<PutResponse>>,
    put_fallback: Box<dyn Fn() -> PutResponse + Send + Sync>,
    activate_error: Mutex<Option<ClientError>>,
    get_response: Mutex<Option<Result<GetPipelineDefinitionOutput>>>,
    pub calls: Mutex<Vec<String>>,
    pub put_requests: Mutex<Vec<PutPipelineDefinition>>,
    pub get_requests: Mutex<Vec<GetPipelineDefinition>>,
}

impl FakeApi {
    /// A service whose every put succeeds
    pub fn new() -> Self {
        Self::with_put_fallback(|| Ok(accepted()))
    }

    pub fn with_put_fallback(
        fallback: impl Fn() -> PutResponse + Send + Sync + 'static,
    ) -> Self {
        Self {
            put_queue: Mutex::new(VecDeque::new()),
            put_fallback: Box::new(fallback),
            activate_error: Mutex::new(None),
            get_response: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            put_requests: Mutex::new(Vec::new()),
            get_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_put(self, response: PutResponse) -> Self {
        self.put_queue.lock().unwrap().push_back(response);
        self
    }

    pub fn fail_activation(self, error: ClientError) -> Self {
        *self.activate_error.lock().unwrap() = Some(error);
        self
    }

    pub fn respond_to_get(self, response: Result<GetPipelineDefinitionOutput>) -> Self {
        *self.get_response.lock().unwrap() = Some(response);
        self
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(operation))
            .count()
    }

    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PipelineApi for FakeApi {
    async fn put_pipeline_definition(
        &self,
        req: &PutPipelineDefinition,
    ) -> Result<PutPipelineDefinitionOutput> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("put:{}", req.pipeline_id));
        self.put_requests.lock().unwrap().push(req.clone());

        let queued = self.put_queue.lock().unwrap().pop_front();
        queued.unwrap_or_else(|| (self.put_fallback)())
    }

    async fn activate_pipeline(&self, req: ActivatePipeline) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("activate:{}", req.pipeline_id));

        match self.activate_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn get_pipeline_definition(
        &self,
        req: GetPipelineDefinition,
    ) -> Result<GetPipelineDefinitionOutput> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("get:{}", req.pipeline_id));
        self.get_requests.lock().unwrap().push(req);

        self.get_response
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(GetPipelineDefinitionOutput::default()))
    }
}

/// A put response for a definition that passed validation
pub fn accepted() -> PutPipelineDefinitionOutput {
    PutPipelineDefinitionOutput::default()
}

/// A put response carrying validation warnings only
pub fn accepted_with_warning(id: &str, warning: &str) -> PutPipelineDefinitionOutput {
    PutPipelineDefinitionOutput {
        validation_warnings: vec![ValidationWarning {
            id: Some(id.to_string()),
            warnings: vec![warning.to_string()],
        }],
        ..Default::default()
    }
}

/// A put response flagged as errored
pub fn rejected(errors: Vec<(&str, Vec<&str>)>) -> PutPipelineDefinitionOutput {
    PutPipelineDefinitionOutput {
        errored: true,
        validation_errors: errors
            .into_iter()
            .map(|(id, messages)| ValidationError {
                id: Some(id.to_string()),
                errors: messages.iter().map(|m| m.to_string()).collect(),
            })
            .collect(),
        validation_warnings: Vec::new(),
    }
}

pub fn internal_error() -> ClientError {
    ClientError::service(500, codes::INTERNAL_SERVICE_ERROR, "internal failure")
}

pub fn service_error(code: &str) -> ClientError {
    ClientError::service(400, code, format!("{} raised", code))
}

//! Create protocol
//!
//! Submits an encoded definition, retries through transient failures
//! (internal service errors and IAM roles that have not propagated yet),
//! makes one final unconditional attempt when the retry window runs out,
//! and activates the pipeline only after a definition passes validation.

use pipedef_client::{ClientError, PipelineApi};
use pipedef_core::codec::encode_definition;
use pipedef_core::domain::pipeline::PipelineDefinition;
use pipedef_core::dto::pipeline::{ActivatePipeline, PutPipelineDefinitionOutput};
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{ProvisionError, Result, ValidationErrors};
use crate::retry::{Attempt, RetryError, RetryPolicy, retry_until};

/// Where a create currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Submitting,
    Validating,
    Retrying,
    Activating,
    Activated,
    Failed,
}

impl fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionPhase::Submitting => write!(f, "Submitting"),
            SubmissionPhase::Validating => write!(f, "Validating"),
            SubmissionPhase::Retrying => write!(f, "Retrying"),
            SubmissionPhase::Activating => write!(f, "Activating"),
            SubmissionPhase::Activated => write!(f, "Activated"),
            SubmissionPhase::Failed => write!(f, "Failed"),
        }
    }
}

fn enter(pipeline_id: &str, phase: SubmissionPhase) {
    debug!(pipeline_id, %phase, "Pipeline definition phase");
}

/// A failed submission attempt
#[derive(Debug)]
enum SubmitFailure {
    Transport(ClientError),
    Invalid(ValidationErrors),
}

impl fmt::Display for SubmitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitFailure::Transport(e) => write!(f, "{}", e),
            SubmitFailure::Invalid(e) => write!(f, "{}", e),
        }
    }
}

impl SubmitFailure {
    fn into_error(self, pipeline_id: &str) -> ProvisionError {
        let pipeline_id = pipeline_id.to_string();
        match self {
            SubmitFailure::Transport(source) => ProvisionError::Submit {
                pipeline_id,
                source,
            },
            SubmitFailure::Invalid(errors) => ProvisionError::Validation {
                pipeline_id,
                errors,
            },
        }
    }
}

/// Classify the outcome of one put call
///
/// Internal service errors and errored responses mentioning a role are
/// retryable; every other failure is final.
fn classify(
    outcome: pipedef_client::Result<PutPipelineDefinitionOutput>,
) -> Attempt<PutPipelineDefinitionOutput, SubmitFailure> {
    match outcome {
        Err(e) if e.is_internal_service_error() => Attempt::Retryable(SubmitFailure::Transport(e)),
        Err(e) => Attempt::NonRetryable(SubmitFailure::Transport(e)),
        Ok(output) if output.errored => {
            let errors = ValidationErrors::from(output.validation_errors.as_slice());
            if errors.mentions_role_propagation() {
                Attempt::Retryable(SubmitFailure::Invalid(errors))
            } else {
                Attempt::NonRetryable(SubmitFailure::Invalid(errors))
            }
        }
        Ok(output) => Attempt::Success(output),
    }
}

/// Create and activate a pipeline definition
///
/// Returns the resource identity, which is always the definition's
/// `pipeline_id`. Activation failures are reported as
/// [`ProvisionError::Activation`] even though the definition is stored.
///
/// # Arguments
/// * `api` - The remote service
/// * `definition` - Desired state
/// * `policy` - Retry window for the submission
/// * `cancel` - Stops any further attempt once fired
pub async fn create_definition<A>(
    api: &A,
    definition: &PipelineDefinition,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<String>
where
    A: PipelineApi + ?Sized,
{
    let pipeline_id = definition.pipeline_id.as_str();
    let request = encode_definition(definition);

    info!("Creating pipeline definition {}", pipeline_id);

    let request_ref = &request;
    let outcome = retry_until(policy, cancel, move || async move {
        enter(pipeline_id, SubmissionPhase::Submitting);
        let attempt = classify(api.put_pipeline_definition(request_ref).await);
        if matches!(attempt, Attempt::Retryable(_)) {
            enter(pipeline_id, SubmissionPhase::Retrying);
        }
        attempt
    })
    .await;

    let output = match outcome {
        Ok(output) => output,
        Err(RetryError::Stopped(failure)) => {
            enter(pipeline_id, SubmissionPhase::Failed);
            return Err(failure.into_error(pipeline_id));
        }
        Err(RetryError::Cancelled) => {
            enter(pipeline_id, SubmissionPhase::Failed);
            return Err(ProvisionError::Cancelled {
                pipeline_id: pipeline_id.to_string(),
            });
        }
        Err(RetryError::TimedOut { attempts, last }) => {
            warn!(
                "Retry window for {} elapsed after {} attempt(s) ({}), making a final attempt",
                pipeline_id, attempts, last
            );

            if cancel.is_cancelled() {
                enter(pipeline_id, SubmissionPhase::Failed);
                return Err(ProvisionError::Cancelled {
                    pipeline_id: pipeline_id.to_string(),
                });
            }

            enter(pipeline_id, SubmissionPhase::Submitting);
            api.put_pipeline_definition(&request)
                .await
                .map_err(|source| {
                    enter(pipeline_id, SubmissionPhase::Failed);
                    ProvisionError::Submit {
                        pipeline_id: pipeline_id.to_string(),
                        source,
                    }
                })?
        }
    };

    enter(pipeline_id, SubmissionPhase::Validating);
    if output.errored {
        enter(pipeline_id, SubmissionPhase::Failed);
        return Err(ProvisionError::Validation {
            pipeline_id: pipeline_id.to_string(),
            errors: ValidationErrors::from(output.validation_errors.as_slice()),
        });
    }

    for warning in &output.validation_warnings {
        warn!(
            "Pipeline definition {} object {}: {}",
            pipeline_id,
            warning.id.as_deref().unwrap_or_default(),
            warning.warnings.join("; ")
        );
    }

    enter(pipeline_id, SubmissionPhase::Activating);
    api.activate_pipeline(ActivatePipeline {
        pipeline_id: pipeline_id.to_string(),
    })
    .await
    .map_err(|source| {
        enter(pipeline_id, SubmissionPhase::Failed);
        ProvisionError::Activation {
            pipeline_id: pipeline_id.to_string(),
            source,
        }
    })?;

    enter(pipeline_id, SubmissionPhase::Activated);
    info!("Pipeline definition {} created and activated", pipeline_id);

    Ok(pipeline_id.to_string())
}

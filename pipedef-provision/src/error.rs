//! Error types for provisioning pipeline definitions

use pipedef_client::ClientError;
use pipedef_core::dto::pipeline::ValidationError;
use std::fmt;
use thiserror::Error;

/// Result type alias for provisioning operations
pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Substring the service uses when an IAM role has not propagated yet
pub const ROLE_PROPAGATION_MARKER: &str = "role";

/// Errors surfaced by create and read
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The definition could not be submitted
    #[error("error creating pipeline definition ({pipeline_id}): {source}")]
    Submit {
        pipeline_id: String,
        source: ClientError,
    },

    /// The service stored the definition but flagged it as invalid
    #[error("error validating pipeline definition ({pipeline_id}): {errors}")]
    Validation {
        pipeline_id: String,
        errors: ValidationErrors,
    },

    /// The definition is valid but the pipeline could not be activated
    #[error("error activating pipeline definition ({pipeline_id}): {source}")]
    Activation {
        pipeline_id: String,
        source: ClientError,
    },

    /// The definition could not be fetched
    #[error("error reading pipeline definition ({pipeline_id}): {source}")]
    Read {
        pipeline_id: String,
        source: ClientError,
    },

    /// The caller cancelled before the next attempt started
    #[error("pipeline definition operation cancelled ({pipeline_id})")]
    Cancelled { pipeline_id: String },
}

impl ProvisionError {
    /// Pipeline the failed operation targeted
    pub fn pipeline_id(&self) -> &str {
        match self {
            Self::Submit { pipeline_id, .. }
            | Self::Validation { pipeline_id, .. }
            | Self::Activation { pipeline_id, .. }
            | Self::Read { pipeline_id, .. }
            | Self::Cancelled { pipeline_id } => pipeline_id,
        }
    }
}

/// Validation messages reported against one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectErrors {
    pub id: String,
    pub messages: Vec<String>,
}

/// Every validation failure from one submission
///
/// Keeps each object id with all of its messages so a single report shows
/// every conflicting object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<ObjectErrors>,
}

impl ValidationErrors {
    pub fn entries(&self) -> &[ObjectErrors] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the failure looks like an IAM role that has not propagated
    ///
    /// Matches on message text; the service exposes no structured code for
    /// this condition.
    pub fn mentions_role_propagation(&self) -> bool {
        self.to_string().contains(ROLE_PROPAGATION_MARKER)
    }
}

impl From<&[ValidationError]> for ValidationErrors {
    fn from(errors: &[ValidationError]) -> Self {
        Self {
            entries: errors
                .iter()
                .map(|e| ObjectErrors {
                    id: e.id.clone().unwrap_or_default(),
                    messages: e.errors.clone(),
                })
                .collect(),
        }
    }
}

/// Renders `N error(s) occurred:` then one `* id: <id>, error: [<m1>; <m2>]`
/// line per object. The `; ` separator is fixed;
/// [`ValidationErrors::mentions_role_propagation`] matches against this text.
impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.entries.len() == 1 { "" } else { "s" };
        write!(f, "{} error{} occurred:", self.entries.len(), plural)?;
        for entry in &self.entries {
            write!(
                f,
                "\n\t* id: {}, error: [{}]",
                entry.id,
                entry.messages.join("; ")
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod definition;
mod inspect;

use anyhow::Result;
use clap::Subcommand;
use pipedef_core::dto::pipeline::DefinitionVersion;
use pipedef_provision::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create and activate a pipeline definition from a JSON file
    Create {
        /// Path to the definition file
        #[arg(short, long)]
        file: String,

        /// Retry window in seconds, overrides PIPEDEF_CREATE_TIMEOUT
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Show the stored definition of a pipeline
    Get {
        /// Pipeline ID
        id: String,

        /// Which version to fetch (latest or active)
        #[arg(long)]
        version: Option<DefinitionVersion>,
    },
    /// Import the definition of an existing pipeline
    Import {
        /// Pipeline ID
        id: String,
    },
    /// Stop managing a pipeline definition
    Delete {
        /// Pipeline ID
        id: String,
    },
    /// Print the request body a definition file encodes to
    Encode {
        /// Path to the definition file
        #[arg(short, long)]
        file: String,
    },
    /// Print the set identities of every element in a definition file
    Identity {
        /// Path to the definition file
        #[arg(short, long)]
        file: String,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The provisioner configuration
pub async fn handle_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Create { file, timeout } => {
            definition::create_definition(config, &file, timeout).await
        }
        Commands::Get { id, version } => definition::get_definition(config, &id, version).await,
        Commands::Import { id } => definition::import_definition(config, &id).await,
        Commands::Delete { id } => definition::delete_definition(config, &id),
        Commands::Encode { file } => inspect::encode_file(&file),
        Commands::Identity { file } => inspect::identity_file(&file),
    }
}

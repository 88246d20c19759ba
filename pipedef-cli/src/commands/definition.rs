//! Definition command handlers
//!
//! Handles the commands that talk to the service: create, get, import
//! and delete.

use anyhow::{Context, Result};
use colored::*;
use pipedef_client::DataPipelineClient;
use pipedef_core::domain::pipeline::PipelineDefinition;
use pipedef_core::dto::pipeline::DefinitionVersion;
use pipedef_provision::{Config, PipelineDefinitionResource, ReadOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::loader::load_definition;

fn resource(config: Config) -> PipelineDefinitionResource<DataPipelineClient> {
    let client = DataPipelineClient::new(&config.endpoint);
    PipelineDefinitionResource::new(Arc::new(client), config)
}

/// Apply a `--timeout` override and revalidate
fn apply_timeout(config: Config, timeout: Option<u64>) -> Result<Config> {
    let Some(secs) = timeout else {
        return Ok(config);
    };

    let config = config.with_create_timeout(Duration::from_secs(secs));
    config.validate().context("Invalid --timeout")?;
    Ok(config)
}

/// Create a pipeline definition from a file
///
/// Ctrl-C stops any further retry; an attempt already in flight completes.
pub async fn create_definition(config: Config, path: &str, timeout: Option<u64>) -> Result<()> {
    let definition = load_definition(path)?;

    let config = apply_timeout(config, timeout)?;
    let resource = resource(config);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, no further attempts will be made");
            trigger.cancel();
        }
    });

    let id = resource.create(&definition, &cancel).await?;

    println!(
        "{}",
        "✓ Pipeline definition created and activated!".green().bold()
    );
    println!("  ID:      {}", id.cyan());
    println!();

    match resource.read(&id, true).await? {
        ReadOutcome::Found(stored) => print_definition(&stored, DefinitionVersion::Latest)?,
        ReadOutcome::Gone => {
            println!("{}", format!("Pipeline {} was deleted meanwhile.", id).yellow())
        }
    }

    Ok(())
}

/// Fetch and display a pipeline's stored definition
pub async fn get_definition(
    config: Config,
    id: &str,
    version: Option<DefinitionVersion>,
) -> Result<()> {
    let resource = resource(config);
    let definition = resource.read_data_source(id, version).await?;

    print_definition(&definition, version.unwrap_or_default())?;

    Ok(())
}

/// Import an existing pipeline's definition
pub async fn import_definition(config: Config, id: &str) -> Result<()> {
    let resource = resource(config);

    match resource.import(id).await? {
        ReadOutcome::Found(definition) => {
            println!("{}", format!("✓ Imported pipeline {}", id).green().bold());
            print_definition(&definition, DefinitionVersion::Latest)?;
        }
        ReadOutcome::Gone => {
            println!(
                "{}",
                format!("Pipeline {} no longer exists, nothing to import.", id).yellow()
            );
        }
    }

    Ok(())
}

/// Stop managing a pipeline definition
pub fn delete_definition(config: Config, id: &str) -> Result<()> {
    resource(config).delete(id);

    println!(
        "{}",
        format!("✓ Pipeline definition {} removed from state", id)
            .green()
            .bold()
    );
    println!("  {}", "The pipeline itself was left in place.".dimmed());

    Ok(())
}

/// Print a definition summary followed by its JSON form
fn print_definition(definition: &PipelineDefinition, version: DefinitionVersion) -> Result<()> {
    println!("{}", "Pipeline Definition:".bold());
    println!("  ID:               {}", definition.pipeline_id.cyan());
    println!("  Version:          {}", version.to_string().dimmed());
    println!(
        "  Objects:          {}",
        definition.pipeline_objects.len()
    );
    println!(
        "  Parameters:       {}",
        definition.parameter_objects.len()
    );
    println!(
        "  Parameter values: {}",
        definition.parameter_values.len()
    );
    println!();

    for object in &definition.pipeline_objects {
        println!("  {} {} ({})", "▸".cyan(), object.id.bold(), object.name.dimmed());
        for field in &object.fields {
            if !field.ref_value.is_empty() {
                println!("    {} -> {}", field.key, field.ref_value.cyan());
            } else {
                println!("    {} = {}", field.key, field.string_value);
            }
        }
    }
    println!();

    println!("{}", serde_json::to_string_pretty(definition)?);

    Ok(())
}

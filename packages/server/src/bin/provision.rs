//! Provision the blueprint and data automation project for a document type.
//!
//! Idempotent: existing resources are reused. Prints the result as JSON,
//! including `final_project_arn` for the server's configuration.

use anyhow::{Context, Result};
use clap::Parser;
use extraction::aws::{load_config, BedrockDataAutomation};
use server_core::domains::documents::actions::provision_document_type;
use server_core::domains::documents::DocumentType;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "provision")]
#[command(about = "Create the blueprint and data automation project if they do not exist")]
struct Cli {
    /// Document type to provision
    #[arg(long, default_value = "Payslip")]
    document_type: DocumentType,

    /// Blueprint name (default: the document type's standard name)
    #[arg(long)]
    blueprint_name: Option<String>,

    /// Project name (default: the document type's standard name)
    #[arg(long)]
    project_name: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,extraction=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let document_type = cli.document_type;
    let blueprint_name = cli
        .blueprint_name
        .unwrap_or_else(|| document_type.blueprint_name().to_string());
    let project_name = cli
        .project_name
        .unwrap_or_else(|| document_type.project_name().to_string());

    let sdk = load_config(cli.region).await;
    let report = provision_document_type(
        BedrockDataAutomation::new(&sdk),
        document_type,
        &blueprint_name,
        &project_name,
    )
    .await?;

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{json}");

    Ok(())
}

//! Application listing

use std::sync::Arc;

use anyhow::Result;

use crate::api_client::types::Application;
use crate::deps::{GatApiClient, MessageStyle, UserInterface};

/// Dependencies for the applications command
pub struct ApplicationDependencies {
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
    /// API client for making requests to the GAT service
    pub api_client: Arc<dyn GatApiClient>,
}

/// Output format for the list command
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Display output as formatted record blocks
    Table,
    /// Display output as JSON
    Json,
}

/// Execute the list-applications command
pub async fn list_with_deps(
    format: OutputFormat,
    deps: &Arc<ApplicationDependencies>,
) -> Result<()> {
    let applications = deps.api_client.applications().await?;

    if applications.is_empty() {
        deps.ui
            .print_styled("No applications found.", MessageStyle::Yellow);
        return Ok(());
    }

    match format {
        OutputFormat::Table => display_table(&applications, deps),
        OutputFormat::Json => display_json(&applications, deps)?,
    }

    Ok(())
}

fn display_table(applications: &[Application], deps: &Arc<ApplicationDependencies>) {
    deps.ui.print("");

    for application in applications {
        deps.ui.print_styled(&application.name, MessageStyle::Bold);
        deps.ui.print(&format!("  ID:       {}", application.id));
        deps.ui
            .print(&format!("  Platform: {}", application.platform_name));
        deps.ui.print("");
    }

    let count = applications.len();
    let plural = if count == 1 { "" } else { "s" };
    deps.ui
        .print(&format!("Total: {count} application{plural}"));
}

fn display_json(applications: &[Application], deps: &Arc<ApplicationDependencies>) -> Result<()> {
    let json = serde_json::to_string_pretty(applications)?;
    deps.ui.print(&json);
    Ok(())
}

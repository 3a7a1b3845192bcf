//! Environment management commands

use std::sync::Arc;

use anyhow::Result;

use crate::api_client::types::Environment;
use crate::deps::{GatApiClient, MessageStyle, UserInterface};

/// Dependencies for the environment commands
pub struct EnvironmentDependencies {
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
    /// API client for making requests to the GAT service
    pub api_client: Arc<dyn GatApiClient>,
}

/// Execute the list-environments command
pub async fn list_with_deps(
    application_id: &str,
    deps: &Arc<EnvironmentDependencies>,
) -> Result<()> {
    let application = deps.api_client.application_by_id(application_id).await?;
    let environments = deps.api_client.environments(&application.id).await?;

    if environments.is_empty() {
        deps.ui.print_styled(
            &format!("No environments found for application {}.", application.name),
            MessageStyle::Yellow,
        );
        return Ok(());
    }

    deps.ui.print("");
    for environment in &environments {
        display_environment(environment, deps);
    }

    let count = environments.len();
    let plural = if count == 1 { "" } else { "s" };
    deps.ui
        .print(&format!("Total: {count} environment{plural}"));

    Ok(())
}

/// Execute the create-environment command
pub async fn create_with_deps(
    application_id: &str,
    name: &str,
    url: &str,
    deps: &Arc<EnvironmentDependencies>,
) -> Result<()> {
    let application = deps.api_client.application_by_id(application_id).await?;
    let environment = deps
        .api_client
        .create_environment(&application.id, name, url)
        .await?;

    deps.ui.print_styled(
        &format!(
            "✓ Environment {} created for application {}",
            environment.name, application.name
        ),
        MessageStyle::Success,
    );
    display_environment(&environment, deps);

    Ok(())
}

/// Execute the update-environment command
pub async fn update_with_deps(
    application_id: &str,
    environment_id: &str,
    name: &str,
    url: &str,
    deps: &Arc<EnvironmentDependencies>,
) -> Result<()> {
    let application = deps.api_client.application_by_id(application_id).await?;
    // Resolve first so an unknown id fails with NotFound instead of a
    // service-side validation error.
    let environment = deps
        .api_client
        .environment_by_id(&application.id, environment_id)
        .await?;
    let updated = deps
        .api_client
        .update_environment(&application.id, &environment.id, name, url)
        .await?;

    deps.ui
        .print_styled("✓ Environment updated", MessageStyle::Success);
    display_environment(&updated, deps);

    Ok(())
}

/// Execute the delete-environment command
pub async fn delete_with_deps(
    application_id: &str,
    environment_id: &str,
    deps: &Arc<EnvironmentDependencies>,
) -> Result<()> {
    let application = deps.api_client.application_by_id(application_id).await?;
    let environment = deps
        .api_client
        .environment_by_id(&application.id, environment_id)
        .await?;

    deps.api_client
        .delete_environment(&application.id, &environment.id)
        .await?;

    deps.ui.print_styled(
        &format!(
            "✓ Environment {} deleted for application {}",
            environment.name, application.name
        ),
        MessageStyle::Success,
    );

    Ok(())
}

fn display_environment(environment: &Environment, deps: &Arc<EnvironmentDependencies>) {
    deps.ui.print_styled(&environment.name, MessageStyle::Bold);
    deps.ui.print(&format!("  ID:  {}", environment.id));
    deps.ui.print(&format!("  URL: {}", environment.url));
    deps.ui.print("");
}

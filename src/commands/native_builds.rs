//! Native build management commands

use std::sync::Arc;

use anyhow::Result;

use crate::api_client::types::NativeBuild;
use crate::deps::{GatApiClient, MessageStyle, UserInterface};

/// Dependencies for the native build commands
pub struct NativeBuildDependencies {
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
    /// API client for making requests to the GAT service
    pub api_client: Arc<dyn GatApiClient>,
}

/// Execute the list-native-builds command
pub async fn list_with_deps(
    application_id: &str,
    deps: &Arc<NativeBuildDependencies>,
) -> Result<()> {
    let application = deps.api_client.application_by_id(application_id).await?;
    let builds = deps.api_client.native_builds(&application.id).await?;

    if builds.is_empty() {
        deps.ui.print_styled(
            &format!("No native builds found for application {}.", application.name),
            MessageStyle::Yellow,
        );
        return Ok(());
    }

    deps.ui.print("");
    for build in &builds {
        display_build(build, deps);
    }

    let count = builds.len();
    let plural = if count == 1 { "" } else { "s" };
    deps.ui.print(&format!("Total: {count} native build{plural}"));

    Ok(())
}

/// Execute the update-native-build command
pub async fn update_with_deps(
    application_id: &str,
    build_id: &str,
    name: &str,
    deps: &Arc<NativeBuildDependencies>,
) -> Result<()> {
    let application = deps.api_client.application_by_id(application_id).await?;
    let build = deps
        .api_client
        .native_build_by_id(&application.id, build_id)
        .await?;
    let updated = deps
        .api_client
        .update_native_build(&application.id, &build.id, name)
        .await?;

    deps.ui
        .print_styled("✓ Native build updated", MessageStyle::Success);
    display_build(&updated, deps);

    Ok(())
}

/// Execute the delete-native-build command
pub async fn delete_with_deps(
    application_id: &str,
    build_id: &str,
    deps: &Arc<NativeBuildDependencies>,
) -> Result<()> {
    let application = deps.api_client.application_by_id(application_id).await?;
    let build = deps
        .api_client
        .native_build_by_id(&application.id, build_id)
        .await?;

    deps.api_client
        .delete_native_build(&application.id, &build.id)
        .await?;

    deps.ui.print_styled(
        &format!(
            "✓ Native build {} deleted for application {}",
            build.name, application.name
        ),
        MessageStyle::Success,
    );

    Ok(())
}

fn display_build(build: &NativeBuild, deps: &Arc<NativeBuildDependencies>) {
    deps.ui.print_styled(&build.name, MessageStyle::Bold);
    deps.ui.print(&format!("  ID:             {}", build.id));
    if let Some(file_name) = &build.original_file_name {
        deps.ui.print(&format!("  File:           {file_name}"));
    }
    if let Some(vendor_url) = &build.external_vendor_url {
        deps.ui.print(&format!("  Vendor URL:     {vendor_url}"));
    }
    if let Some(signing_status) = &build.signing_status {
        deps.ui
            .print(&format!("  Signing status: {signing_status}"));
    }
    deps.ui.print("");
}

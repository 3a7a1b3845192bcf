//! Show organization information

use std::sync::Arc;

use anyhow::Result;

use crate::deps::{GatApiClient, MessageStyle, UserInterface};

/// Dependencies for the whoami command
pub struct WhoamiDependencies {
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
    /// API client for making requests to the GAT service
    pub api_client: Arc<dyn GatApiClient>,
}

/// Execute the whoami command
pub async fn execute_with_deps(deps: &Arc<WhoamiDependencies>) -> Result<()> {
    let organization = deps.api_client.whoami().await?;

    deps.ui
        .print_styled(&organization.name, MessageStyle::Bold);
    deps.ui.print(&format!("  ID: {}", organization.id));

    Ok(())
}

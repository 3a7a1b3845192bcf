//! Listing commands for service-wide catalogs: browsers, devices and
//! countries

use std::sync::Arc;

use anyhow::Result;

use crate::deps::{GatApiClient, MessageStyle, UserInterface};

/// Dependencies for the catalog commands
pub struct CatalogDependencies {
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
    /// API client for making requests to the GAT service
    pub api_client: Arc<dyn GatApiClient>,
}

/// Execute the list-internet-browsers command
pub async fn list_browsers_with_deps(deps: &Arc<CatalogDependencies>) -> Result<()> {
    let browsers = deps.api_client.internet_browsers().await?;

    if browsers.is_empty() {
        deps.ui
            .print_styled("No internet browsers found.", MessageStyle::Yellow);
        return Ok(());
    }

    deps.ui.print("");
    for browser in &browsers {
        deps.ui.print_styled(&browser.name, MessageStyle::Bold);
        deps.ui.print(&format!("  ID: {}", browser.id));
        deps.ui
            .print(&format!("  OS: {}", browser.operating_system_name));
        deps.ui.print("");
    }

    Ok(())
}

/// Execute the list-mobile-devices command
pub async fn list_devices_with_deps(deps: &Arc<CatalogDependencies>) -> Result<()> {
    let devices = deps.api_client.mobile_devices().await?;

    if devices.is_empty() {
        deps.ui
            .print_styled("No mobile devices found.", MessageStyle::Yellow);
        return Ok(());
    }

    deps.ui.print("");
    for device in &devices {
        deps.ui.print_styled(&device.name, MessageStyle::Bold);
        deps.ui.print(&format!("  ID:    {}", device.id));
        deps.ui.print(&format!("  Brand: {}", device.brand_name));
        deps.ui.print("");
    }

    Ok(())
}

/// Execute the list-countries command
pub async fn list_countries_with_deps(deps: &Arc<CatalogDependencies>) -> Result<()> {
    let countries = deps.api_client.countries().await?;

    if countries.is_empty() {
        deps.ui
            .print_styled("No countries found.", MessageStyle::Yellow);
        return Ok(());
    }

    deps.ui.print("");
    for country in &countries {
        deps.ui.print_styled(
            &format!("{} ({})", country.name, country.code),
            MessageStyle::Bold,
        );
        deps.ui.print(&format!("  ID:        {}", country.id));
        deps.ui.print(&format!(
            "  Platforms: {}",
            country.available_platforms.join(", ")
        ));
        deps.ui.print("");
    }

    Ok(())
}

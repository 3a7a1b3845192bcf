//! GAT CLI - Command-line client for the Global App Testing API
//!
//! Drives crowdtesting through the Global App Testing (GAT) REST service:
//! inspect the organization and its applications, manage environments,
//! native builds and test cases, and run test-case batches end to end
//! (submit, poll for the terminal state, fetch the summary and individual
//! tester results).
//!
//! Every invocation authenticates with an API key, taken from `--key` or
//! the `GAT_API_KEY` environment variable.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod api_client;
mod commands;
mod config;
mod deps;
mod ui;

#[cfg(test)]
mod test_helpers;

use api_client::types::RunFilters;
use api_client::{ApiConfig, Client};
use deps::{RealAsyncRuntime, RealGatApiClient};
use ui::RealUserInterface;

#[derive(Parser)]
#[command(name = "gat")]
#[command(about = "Command-line client for the Global App Testing API")]
#[command(version)]
#[command(author)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API key; falls back to the GAT_API_KEY environment variable
    #[arg(short, long, env = "GAT_API_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Test case importance levels accepted by the service
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Importance {
    Low,
    Medium,
    Critical,
}

impl Importance {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::Critical => "Critical",
        }
    }
}

/// Run outcomes accepted as a filter
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Outcome {
    Passed,
    Failed,
}

impl Outcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Show the organization the API key belongs to
    Whoami,

    /// List the applications of the organization
    ListApplications {
        /// Output format (table or json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// List the environments of an application
    ListEnvironments {
        /// Application ID
        application_id: String,
    },

    /// Create an environment
    CreateEnvironment {
        /// Application ID
        application_id: String,
        /// Environment name
        name: String,
        /// Environment URL
        url: String,
    },

    /// Update an environment's name and URL
    UpdateEnvironment {
        /// Application ID
        application_id: String,
        /// Environment ID
        environment_id: String,
        /// New environment name
        name: String,
        /// New environment URL
        url: String,
    },

    /// Delete an environment
    DeleteEnvironment {
        /// Application ID
        application_id: String,
        /// Environment ID
        environment_id: String,
    },

    /// List the native builds of an application
    ListNativeBuilds {
        /// Application ID
        application_id: String,
    },

    /// Rename a native build
    UpdateNativeBuild {
        /// Application ID
        application_id: String,
        /// Native build ID
        build_id: String,
        /// New build name
        name: String,
    },

    /// Delete a native build
    DeleteNativeBuild {
        /// Application ID
        application_id: String,
        /// Native build ID
        build_id: String,
    },

    /// List the browsers available for web test runs
    ListInternetBrowsers,

    /// List the mobile devices available for native test runs
    ListMobileDevices,

    /// List the countries available for localized tests
    ListCountries,

    /// List the test cases of an application
    ListTestCases {
        /// Application ID
        application_id: String,
    },

    /// Create a test case
    ///
    /// Each instruction ending with '?' becomes an assertion; an instruction
    /// of the form 'embedded_id=<id>' embeds an existing test case.
    CreateTestCase {
        /// Application ID
        application_id: String,
        /// Test case title
        title: String,
        /// Instruction texts, in execution order
        instructions: Vec<String>,
        /// Importance level
        #[arg(short, long, value_enum, default_value_t = Importance::Medium)]
        importance: Importance,
        /// Section name
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Delete test cases; without -t, delete ALL test cases of the application
    DeleteTestCases {
        /// Application ID
        application_id: String,
        /// Test case IDs to delete
        #[arg(short = 't', long = "test-case")]
        test_case_ids: Vec<String>,
        /// Skip the confirmation prompt when deleting everything
        #[arg(long)]
        force: bool,
    },

    /// Submit a batch of test case runs
    CreateTestCaseRunsBatch {
        /// Application ID
        application_id: String,
        /// Environment ID
        #[arg(short, long)]
        environment_id: String,
        /// Internet browser IDs to run on
        #[arg(short = 'b', long = "browser")]
        internet_browser_ids: Vec<String>,
        /// Test case IDs to run
        #[arg(short = 't', long = "test-case")]
        test_case_ids: Vec<String>,
    },

    /// Show the lifecycle state of a batch
    GetTestCaseRunsBatchState {
        /// Application ID
        application_id: String,
        /// Batch ID
        batch_id: String,
        /// Poll until the batch reaches a terminal state
        #[arg(long)]
        wait: bool,
        /// Seconds between polls (only with --wait)
        #[arg(long, default_value_t = config::DEFAULT_POLL_INTERVAL_SECS, requires = "wait")]
        poll_interval: u64,
    },

    /// Show the summary of a batch
    GetTestCaseRunsBatchSummary {
        /// Application ID
        application_id: String,
        /// Batch ID
        batch_id: String,
    },

    /// List the runs of a batch with their tester results
    ListTestCaseRuns {
        /// Application ID
        application_id: String,
        /// Batch ID
        batch_id: String,
        /// Restrict to these run IDs
        #[arg(short = 'r', long = "run")]
        run_ids: Vec<String>,
        /// Restrict to runs with this outcome
        #[arg(short, long, value_enum)]
        outcome: Option<Outcome>,
        /// Restrict to runs of test cases with this importance
        #[arg(short, long, value_enum)]
        importance: Option<Importance>,
    },
}

#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("error"),
        1 => EnvFilter::new("warn"),
        2 => EnvFilter::new("info"),
        3 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Fails before any network activity when the key is missing or empty
    let api_config = ApiConfig::new(cli.key.unwrap_or_default());
    let client = Client::new(&api_config)?;
    let api_client = Arc::new(RealGatApiClient::new(client));
    let ui = Arc::new(RealUserInterface);

    match cli.command {
        Command::Whoami => {
            let deps = Arc::new(commands::whoami::WhoamiDependencies {
                ui: ui.clone(),
                api_client,
            });
            commands::whoami::execute_with_deps(&deps).await
        }
        Command::ListApplications { format } => {
            let output_format = match format.as_str() {
                "json" => commands::applications::OutputFormat::Json,
                _ => commands::applications::OutputFormat::Table,
            };
            let deps = Arc::new(commands::applications::ApplicationDependencies {
                ui: ui.clone(),
                api_client,
            });
            commands::applications::list_with_deps(output_format, &deps).await
        }
        Command::ListEnvironments { application_id } => {
            let deps = environment_deps(ui, api_client);
            commands::environments::list_with_deps(&application_id, &deps).await
        }
        Command::CreateEnvironment {
            application_id,
            name,
            url,
        } => {
            let deps = environment_deps(ui, api_client);
            commands::environments::create_with_deps(&application_id, &name, &url, &deps).await
        }
        Command::UpdateEnvironment {
            application_id,
            environment_id,
            name,
            url,
        } => {
            let deps = environment_deps(ui, api_client);
            commands::environments::update_with_deps(
                &application_id,
                &environment_id,
                &name,
                &url,
                &deps,
            )
            .await
        }
        Command::DeleteEnvironment {
            application_id,
            environment_id,
        } => {
            let deps = environment_deps(ui, api_client);
            commands::environments::delete_with_deps(&application_id, &environment_id, &deps).await
        }
        Command::ListNativeBuilds { application_id } => {
            let deps = native_build_deps(ui, api_client);
            commands::native_builds::list_with_deps(&application_id, &deps).await
        }
        Command::UpdateNativeBuild {
            application_id,
            build_id,
            name,
        } => {
            let deps = native_build_deps(ui, api_client);
            commands::native_builds::update_with_deps(&application_id, &build_id, &name, &deps)
                .await
        }
        Command::DeleteNativeBuild {
            application_id,
            build_id,
        } => {
            let deps = native_build_deps(ui, api_client);
            commands::native_builds::delete_with_deps(&application_id, &build_id, &deps).await
        }
        Command::ListInternetBrowsers => {
            let deps = catalog_deps(ui, api_client);
            commands::catalogs::list_browsers_with_deps(&deps).await
        }
        Command::ListMobileDevices => {
            let deps = catalog_deps(ui, api_client);
            commands::catalogs::list_devices_with_deps(&deps).await
        }
        Command::ListCountries => {
            let deps = catalog_deps(ui, api_client);
            commands::catalogs::list_countries_with_deps(&deps).await
        }
        Command::ListTestCases { application_id } => {
            let deps = test_case_deps(ui, api_client);
            commands::test_cases::list_with_deps(&application_id, &deps).await
        }
        Command::CreateTestCase {
            application_id,
            title,
            instructions,
            importance,
            section,
        } => {
            let deps = test_case_deps(ui, api_client);
            commands::test_cases::create_with_deps(
                commands::test_cases::CreateTestCaseConfig {
                    application_id,
                    title,
                    importance: importance.as_str().to_string(),
                    section,
                    instructions,
                },
                &deps,
            )
            .await
        }
        Command::DeleteTestCases {
            application_id,
            test_case_ids,
            force,
        } => {
            let deps = test_case_deps(ui, api_client);
            commands::test_cases::delete_with_deps(&application_id, &test_case_ids, force, &deps)
                .await
        }
        Command::CreateTestCaseRunsBatch {
            application_id,
            environment_id,
            internet_browser_ids,
            test_case_ids,
        } => {
            let deps = batch_deps(ui, api_client);
            commands::batches::create_with_deps(
                commands::batches::CreateBatchConfig {
                    application_id,
                    environment_id,
                    internet_browser_ids,
                    test_case_ids,
                },
                &deps,
            )
            .await
        }
        Command::GetTestCaseRunsBatchState {
            application_id,
            batch_id,
            wait,
            poll_interval,
        } => {
            let deps = batch_deps(ui, api_client);
            commands::batches::state_with_deps(
                commands::batches::BatchStateConfig {
                    application_id,
                    batch_id,
                    wait,
                    poll_interval: Duration::from_secs(poll_interval),
                },
                &deps,
            )
            .await
        }
        Command::GetTestCaseRunsBatchSummary {
            application_id,
            batch_id,
        } => {
            let deps = batch_deps(ui, api_client);
            commands::batches::summary_with_deps(&application_id, &batch_id, &deps).await
        }
        Command::ListTestCaseRuns {
            application_id,
            batch_id,
            run_ids,
            outcome,
            importance,
        } => {
            let deps = batch_deps(ui, api_client);
            commands::batches::list_runs_with_deps(
                commands::batches::ListRunsConfig {
                    application_id,
                    batch_id,
                    filters: RunFilters {
                        ids: run_ids,
                        outcome: outcome.map(|o| o.as_str().to_string()),
                        importance: importance.map(|i| i.as_str().to_string()),
                    },
                },
                &deps,
            )
            .await
        }
    }
}

fn environment_deps(
    ui: Arc<RealUserInterface>,
    api_client: Arc<RealGatApiClient>,
) -> Arc<commands::environments::EnvironmentDependencies> {
    Arc::new(commands::environments::EnvironmentDependencies { ui, api_client })
}

fn native_build_deps(
    ui: Arc<RealUserInterface>,
    api_client: Arc<RealGatApiClient>,
) -> Arc<commands::native_builds::NativeBuildDependencies> {
    Arc::new(commands::native_builds::NativeBuildDependencies { ui, api_client })
}

fn catalog_deps(
    ui: Arc<RealUserInterface>,
    api_client: Arc<RealGatApiClient>,
) -> Arc<commands::catalogs::CatalogDependencies> {
    Arc::new(commands::catalogs::CatalogDependencies { ui, api_client })
}

fn test_case_deps(
    ui: Arc<RealUserInterface>,
    api_client: Arc<RealGatApiClient>,
) -> Arc<commands::test_cases::TestCaseDependencies> {
    Arc::new(commands::test_cases::TestCaseDependencies { ui, api_client })
}

fn batch_deps(
    ui: Arc<RealUserInterface>,
    api_client: Arc<RealGatApiClient>,
) -> Arc<commands::batches::BatchDependencies> {
    Arc::new(commands::batches::BatchDependencies {
        ui,
        api_client,
        async_runtime: Arc::new(RealAsyncRuntime),
    })
}

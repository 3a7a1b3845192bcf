//! Test-case-runs batch commands: submission, state and summary
//!
//! The batch lifecycle is asynchronous on the service side. Submission
//! returns an identifier; every state or summary invocation is a single
//! point-in-time query keyed off that identifier. The opt-in `--wait` loop
//! lives here in the command layer and re-issues the state query at a
//! caller-supplied interval until the service reports a terminal state,
//! bounded by an attempt budget.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::api_client::types::{BatchState, BatchSummary, TestCaseRun};
use crate::config::MAX_POLL_ATTEMPTS;
use crate::deps::{AsyncRuntime, GatApiClient, MessageStyle, UserInterface};

/// Dependencies for the batch commands
pub struct BatchDependencies {
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
    /// API client for making requests to the GAT service
    pub api_client: Arc<dyn GatApiClient>,
    /// Sleep between polls; injected so tests never wait
    pub async_runtime: Arc<dyn AsyncRuntime>,
}

/// Configuration for the create-test-case-runs-batch command
pub struct CreateBatchConfig {
    /// Application the batch runs against
    pub application_id: String,
    /// Environment the batch runs against
    pub environment_id: String,
    /// Browsers to run on
    pub internet_browser_ids: Vec<String>,
    /// Test cases to run
    pub test_case_ids: Vec<String>,
}

/// Configuration for the get-test-case-runs-batch-state command
pub struct BatchStateConfig {
    /// Application the batch belongs to
    pub application_id: String,
    /// Batch identifier as issued by the service
    pub batch_id: String,
    /// Poll until the batch reaches a terminal state
    pub wait: bool,
    /// Interval between polls when waiting
    pub poll_interval: Duration,
}

/// Run filter options for the list-test-case-runs command
pub struct ListRunsConfig {
    /// Application the batch belongs to
    pub application_id: String,
    /// Batch identifier
    pub batch_id: String,
    /// Filters passed through verbatim
    pub filters: crate::api_client::types::RunFilters,
}

/// Execute the create-test-case-runs-batch command
///
/// Referenced browser and test case ids are validated against the service
/// listings before submission so a typo fails with a clear message instead
/// of a service-side relationship error.
pub async fn create_with_deps(
    config: CreateBatchConfig,
    deps: &Arc<BatchDependencies>,
) -> Result<()> {
    let application = deps
        .api_client
        .application_by_id(&config.application_id)
        .await?;
    let environment = deps
        .api_client
        .environment_by_id(&application.id, &config.environment_id)
        .await?;

    let known_browsers = deps.api_client.internet_browsers().await?;
    let unknown_browsers: Vec<&str> = config
        .internet_browser_ids
        .iter()
        .filter(|id| !known_browsers.iter().any(|browser| &browser.id == *id))
        .map(String::as_str)
        .collect();
    if !unknown_browsers.is_empty() {
        anyhow::bail!(
            "unknown internet browser IDs: {}",
            unknown_browsers.join(", ")
        );
    }

    let known_test_cases = deps.api_client.test_cases(&application.id).await?;
    let unknown_test_cases: Vec<&str> = config
        .test_case_ids
        .iter()
        .filter(|id| !known_test_cases.iter().any(|test_case| &test_case.id == *id))
        .map(String::as_str)
        .collect();
    if !unknown_test_cases.is_empty() {
        anyhow::bail!("unknown test case IDs: {}", unknown_test_cases.join(", "));
    }

    let batch = deps
        .api_client
        .create_test_case_runs_batch(
            &application.id,
            &environment.id,
            &config.internet_browser_ids,
            &config.test_case_ids,
        )
        .await?;

    deps.ui.print_styled(
        &format!(
            "✓ Batch submitted for application {} on environment {}",
            application.name, environment.name
        ),
        MessageStyle::Success,
    );
    deps.ui.print(&format!("  Batch ID: {}", batch.id));

    Ok(())
}

/// Execute the get-test-case-runs-batch-state command
pub async fn state_with_deps(
    config: BatchStateConfig,
    deps: &Arc<BatchDependencies>,
) -> Result<()> {
    let application = deps
        .api_client
        .application_by_id(&config.application_id)
        .await?;

    let state = if config.wait {
        wait_until_terminal(&application.id, &config, deps).await?
    } else {
        deps.api_client
            .test_case_runs_batch_state(&application.id, &config.batch_id)
            .await?
    };

    display_state(&state, deps);
    Ok(())
}

// One state query per attempt, sleeping in between. The service's state
// vocabulary is open-ended; everything that is not a documented terminal
// marker keeps the loop going.
async fn wait_until_terminal(
    application_id: &str,
    config: &BatchStateConfig,
    deps: &Arc<BatchDependencies>,
) -> Result<BatchState> {
    let spinner = deps.ui.create_spinner();
    spinner.enable_steady_tick(Duration::from_millis(100));

    for _ in 0..MAX_POLL_ATTEMPTS {
        let state = deps
            .api_client
            .test_case_runs_batch_state(application_id, &config.batch_id)
            .await;
        let state = match state {
            Ok(state) => state,
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e.into());
            }
        };

        if state.state.is_terminal() {
            spinner.finish_and_clear();
            return Ok(state);
        }

        spinner.set_message(&format!(
            "Batch {}: {} ({} of {} completed)",
            config.batch_id, state.state, state.completed_count, state.total_count
        ));
        deps.async_runtime.sleep(config.poll_interval).await;
    }

    spinner.finish_and_clear();
    anyhow::bail!(
        "batch {} did not reach a terminal state after {} polls",
        config.batch_id,
        MAX_POLL_ATTEMPTS
    )
}

/// Execute the get-test-case-runs-batch-summary command
///
/// The summary is forwarded as the service reports it; calling before the
/// batch is terminal yields whatever the service answers.
pub async fn summary_with_deps(
    application_id: &str,
    batch_id: &str,
    deps: &Arc<BatchDependencies>,
) -> Result<()> {
    let application = deps.api_client.application_by_id(application_id).await?;
    let summary = deps
        .api_client
        .test_case_runs_batch_summary(&application.id, batch_id)
        .await?;

    display_summary(&summary, deps);
    Ok(())
}

/// Execute the list-test-case-runs command
pub async fn list_runs_with_deps(
    config: ListRunsConfig,
    deps: &Arc<BatchDependencies>,
) -> Result<()> {
    let application = deps
        .api_client
        .application_by_id(&config.application_id)
        .await?;
    let runs = deps
        .api_client
        .test_case_runs(&application.id, &config.batch_id, &config.filters)
        .await?;

    if runs.is_empty() {
        deps.ui
            .print_styled("No test case runs found.", MessageStyle::Yellow);
        return Ok(());
    }

    deps.ui.print("");
    for run in &runs {
        display_run(run, deps);
    }

    let count = runs.len();
    let plural = if count == 1 { "" } else { "s" };
    deps.ui.print(&format!("Total: {count} test case run{plural}"));

    Ok(())
}

fn display_state(state: &BatchState, deps: &Arc<BatchDependencies>) {
    deps.ui
        .print_styled(&format!("Batch {}", state.id), MessageStyle::Bold);
    deps.ui.print(&format!("  State:       {}", state.state));
    deps.ui.print(&format!("  Total:       {}", state.total_count));
    deps.ui
        .print(&format!("  In progress: {}", state.in_progress_count));
    deps.ui
        .print(&format!("  Completed:   {}", state.completed_count));
    deps.ui.print(&format!("  Passed:      {}", state.passed_count));
    deps.ui.print(&format!("  Failed:      {}", state.failed_count));
    deps.ui
        .print(&format!("  Cancelled:   {}", state.cancelled_count));
}

fn display_summary(summary: &BatchSummary, deps: &Arc<BatchDependencies>) {
    deps.ui
        .print_styled(&summary.name, MessageStyle::Bold);
    deps.ui.print(&format!("  Batch ID:    {}", summary.id));
    deps.ui
        .print(&format!("  Application: {}", summary.application_id));
    deps.ui
        .print(&format!("  Environment: {}", summary.environment_id));
    if let Some(start_time) = &summary.start_time {
        deps.ui.print(&format!("  Started:     {start_time}"));
    }
    if let Some(finish_time) = &summary.finish_time {
        deps.ui.print(&format!("  Finished:    {finish_time}"));
    }
    deps.ui
        .print(&format!("  Credits:     {}", summary.test_case_credits));
    deps.ui
        .print(&format!("  Testers:     {}", summary.testers_involved));

    if summary.test_case_runs.is_empty() {
        return;
    }

    deps.ui.print("");
    deps.ui.print_styled("Test case runs", MessageStyle::Bold);
    for run in &summary.test_case_runs {
        deps.ui.print(&format!(
            "  {} [{}]: {} passed, {} failed of {}",
            run.name,
            run.id,
            run.passed_results_count,
            run.failed_results_count,
            run.total_results_count
        ));
        deps.ui.print(&format!("    {}", run.ada_url));
    }
}

fn display_run(run: &TestCaseRun, deps: &Arc<BatchDependencies>) {
    deps.ui.print_styled(&run.test_case_name, MessageStyle::Bold);
    deps.ui.print(&format!("  ID:         {}", run.id));
    if let Some(section) = &run.test_case_section {
        deps.ui.print(&format!("  Section:    {section}"));
    }
    if let Some(importance) = &run.test_case_importance {
        deps.ui.print(&format!("  Importance: {importance}"));
    }
    deps.ui.print(&format!("  URL:        {}", run.ada_url));

    for variation in &run.variations {
        deps.ui.print(&format!("  Variation: {}", variation.name));
        for result in &variation.results {
            deps.ui.print(&format!(
                "    {} ({}, {})",
                result.outcome, result.country, result.reported_at
            ));
            if let Some(comment) = &result.tester_comment {
                deps.ui.print(&format!("      comment: {comment}"));
            }
            for step in &result.steps_to_reproduce {
                deps.ui.print(&format!("      step: {step}"));
            }
        }
    }
    deps.ui.print("");
}

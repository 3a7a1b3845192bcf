//! Dependency injection traits for testability
//!
//! This module provides trait abstractions for the external dependencies of
//! the command layer, allowing for easy mocking and testing.

use std::time::Duration;

use async_trait::async_trait;

use crate::api_client::types::{
    Application, BatchState, BatchSummary, Country, Environment, InternetBrowser, MobileDevice,
    NativeBuild, NewTestCase, Organization, RunFilters, TestCase, TestCaseRun, TestCaseRunsBatch,
};
use crate::api_client::{ApiError, Client};

/// GAT API operations, one method per service capability
///
/// Every method issues exactly one logical operation and propagates
/// [`ApiError`] unchanged.
#[async_trait]
pub trait GatApiClient: Send + Sync {
    /// Fetch the organization the API key belongs to
    async fn whoami(&self) -> Result<Organization, ApiError>;

    /// List all applications of the organization
    async fn applications(&self) -> Result<Vec<Application>, ApiError>;

    /// Look up one application by identifier
    async fn application_by_id(&self, id: &str) -> Result<Application, ApiError>;

    /// List the environments of an application
    async fn environments(&self, application_id: &str) -> Result<Vec<Environment>, ApiError>;

    /// Look up one environment of an application by identifier
    async fn environment_by_id(
        &self,
        application_id: &str,
        id: &str,
    ) -> Result<Environment, ApiError>;

    /// Create a new environment
    async fn create_environment(
        &self,
        application_id: &str,
        name: &str,
        url: &str,
    ) -> Result<Environment, ApiError>;

    /// Update an environment's name and URL
    async fn update_environment(
        &self,
        application_id: &str,
        environment_id: &str,
        name: &str,
        url: &str,
    ) -> Result<Environment, ApiError>;

    /// Delete an environment
    async fn delete_environment(
        &self,
        application_id: &str,
        environment_id: &str,
    ) -> Result<(), ApiError>;

    /// List the native builds of an application
    async fn native_builds(&self, application_id: &str) -> Result<Vec<NativeBuild>, ApiError>;

    /// Look up one native build of an application by identifier
    async fn native_build_by_id(
        &self,
        application_id: &str,
        id: &str,
    ) -> Result<NativeBuild, ApiError>;

    /// Rename a native build
    async fn update_native_build(
        &self,
        application_id: &str,
        build_id: &str,
        name: &str,
    ) -> Result<NativeBuild, ApiError>;

    /// Delete a native build
    async fn delete_native_build(
        &self,
        application_id: &str,
        build_id: &str,
    ) -> Result<(), ApiError>;

    /// List the browsers available for web test runs
    async fn internet_browsers(&self) -> Result<Vec<InternetBrowser>, ApiError>;

    /// List the mobile devices available for native test runs
    async fn mobile_devices(&self) -> Result<Vec<MobileDevice>, ApiError>;

    /// List the countries available for localized tests
    async fn countries(&self) -> Result<Vec<Country>, ApiError>;

    /// List the test cases of an application
    async fn test_cases(&self, application_id: &str) -> Result<Vec<TestCase>, ApiError>;

    /// Create test cases via the import endpoint
    async fn create_test_cases(
        &self,
        application_id: &str,
        test_cases: &[NewTestCase],
    ) -> Result<Vec<TestCase>, ApiError>;

    /// Delete ALL test cases of an application
    async fn delete_all_test_cases(&self, application_id: &str) -> Result<(), ApiError>;

    /// Delete the given test cases
    async fn delete_test_cases(
        &self,
        application_id: &str,
        ids: &[String],
    ) -> Result<(), ApiError>;

    /// Submit a new test-case-runs batch
    async fn create_test_case_runs_batch(
        &self,
        application_id: &str,
        environment_id: &str,
        internet_browser_ids: &[String],
        test_case_ids: &[String],
    ) -> Result<TestCaseRunsBatch, ApiError>;

    /// Fetch the current lifecycle state of a batch
    async fn test_case_runs_batch_state(
        &self,
        application_id: &str,
        batch_id: &str,
    ) -> Result<BatchState, ApiError>;

    /// Fetch the summary of a batch
    async fn test_case_runs_batch_summary(
        &self,
        application_id: &str,
        batch_id: &str,
    ) -> Result<BatchSummary, ApiError>;

    /// List the runs of a batch, optionally filtered
    async fn test_case_runs(
        &self,
        application_id: &str,
        batch_id: &str,
        filters: &RunFilters,
    ) -> Result<Vec<TestCaseRun>, ApiError>;
}

/// User interface operations
pub trait UserInterface: Send + Sync {
    /// Create a spinner progress indicator
    fn create_spinner(&self) -> Box<dyn ProgressIndicator>;

    /// Print a message
    fn print(&self, message: &str);

    /// Print a styled message
    fn print_styled(&self, message: &str, style: MessageStyle);

    /// Check if running in interactive mode
    fn is_interactive(&self) -> bool;

    /// Prompt for text input
    fn prompt_input(&self, prompt: &str, default: Option<&str>) -> anyhow::Result<String>;
}

/// Progress indicator trait
pub trait ProgressIndicator: Send + Sync {
    /// Set the message
    fn set_message(&self, message: &str);

    /// Enable steady tick
    fn enable_steady_tick(&self, duration: Duration);

    /// Finish and clear the progress
    fn finish_and_clear(&self);
}

/// Message styling options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    /// Bold text
    Bold,
    /// Cyan text
    Cyan,
    /// Green text
    Green,
    /// Red text
    Red,
    /// Yellow text
    Yellow,
    /// Bold yellow, for warnings
    Warning,
    /// Bold red, for errors
    Error,
    /// Bold green, for success messages
    Success,
}

/// Async runtime operations
#[async_trait]
pub trait AsyncRuntime: Send + Sync {
    /// Sleep for a duration
    async fn sleep(&self, duration: Duration);
}

// Production implementations

/// Production API client wrapper delegating to [`Client`]
pub struct RealGatApiClient {
    client: Client,
}

impl RealGatApiClient {
    /// Wrap a configured [`Client`]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GatApiClient for RealGatApiClient {
    async fn whoami(&self) -> Result<Organization, ApiError> {
        self.client.whoami().await
    }

    async fn applications(&self) -> Result<Vec<Application>, ApiError> {
        self.client.applications().await
    }

    async fn application_by_id(&self, id: &str) -> Result<Application, ApiError> {
        self.client.application_by_id(id).await
    }

    async fn environments(&self, application_id: &str) -> Result<Vec<Environment>, ApiError> {
        self.client.environments(application_id).await
    }

    async fn environment_by_id(
        &self,
        application_id: &str,
        id: &str,
    ) -> Result<Environment, ApiError> {
        self.client.environment_by_id(application_id, id).await
    }

    async fn create_environment(
        &self,
        application_id: &str,
        name: &str,
        url: &str,
    ) -> Result<Environment, ApiError> {
        self.client
            .create_environment(application_id, name, url)
            .await
    }

    async fn update_environment(
        &self,
        application_id: &str,
        environment_id: &str,
        name: &str,
        url: &str,
    ) -> Result<Environment, ApiError> {
        self.client
            .update_environment(application_id, environment_id, name, url)
            .await
    }

    async fn delete_environment(
        &self,
        application_id: &str,
        environment_id: &str,
    ) -> Result<(), ApiError> {
        self.client
            .delete_environment(application_id, environment_id)
            .await
    }

    async fn native_builds(&self, application_id: &str) -> Result<Vec<NativeBuild>, ApiError> {
        self.client.native_builds(application_id).await
    }

    async fn native_build_by_id(
        &self,
        application_id: &str,
        id: &str,
    ) -> Result<NativeBuild, ApiError> {
        self.client.native_build_by_id(application_id, id).await
    }

    async fn update_native_build(
        &self,
        application_id: &str,
        build_id: &str,
        name: &str,
    ) -> Result<NativeBuild, ApiError> {
        self.client
            .update_native_build(application_id, build_id, name)
            .await
    }

    async fn delete_native_build(
        &self,
        application_id: &str,
        build_id: &str,
    ) -> Result<(), ApiError> {
        self.client
            .delete_native_build(application_id, build_id)
            .await
    }

    async fn internet_browsers(&self) -> Result<Vec<InternetBrowser>, ApiError> {
        self.client.internet_browsers().await
    }

    async fn mobile_devices(&self) -> Result<Vec<MobileDevice>, ApiError> {
        self.client.mobile_devices().await
    }

    async fn countries(&self) -> Result<Vec<Country>, ApiError> {
        self.client.countries().await
    }

    async fn test_cases(&self, application_id: &str) -> Result<Vec<TestCase>, ApiError> {
        self.client.test_cases(application_id).await
    }

    async fn create_test_cases(
        &self,
        application_id: &str,
        test_cases: &[NewTestCase],
    ) -> Result<Vec<TestCase>, ApiError> {
        self.client
            .create_test_cases(application_id, test_cases)
            .await
    }

    async fn delete_all_test_cases(&self, application_id: &str) -> Result<(), ApiError> {
        self.client.delete_all_test_cases(application_id).await
    }

    async fn delete_test_cases(
        &self,
        application_id: &str,
        ids: &[String],
    ) -> Result<(), ApiError> {
        self.client.delete_test_cases(application_id, ids).await
    }

    async fn create_test_case_runs_batch(
        &self,
        application_id: &str,
        environment_id: &str,
        internet_browser_ids: &[String],
        test_case_ids: &[String],
    ) -> Result<TestCaseRunsBatch, ApiError> {
        self.client
            .create_test_case_runs_batch(
                application_id,
                environment_id,
                internet_browser_ids,
                test_case_ids,
            )
            .await
    }

    async fn test_case_runs_batch_state(
        &self,
        application_id: &str,
        batch_id: &str,
    ) -> Result<BatchState, ApiError> {
        self.client
            .test_case_runs_batch_state(application_id, batch_id)
            .await
    }

    async fn test_case_runs_batch_summary(
        &self,
        application_id: &str,
        batch_id: &str,
    ) -> Result<BatchSummary, ApiError> {
        self.client
            .test_case_runs_batch_summary(application_id, batch_id)
            .await
    }

    async fn test_case_runs(
        &self,
        application_id: &str,
        batch_id: &str,
        filters: &RunFilters,
    ) -> Result<Vec<TestCaseRun>, ApiError> {
        self.client
            .test_case_runs(application_id, batch_id, filters)
            .await
    }
}

/// Production async runtime
pub struct RealAsyncRuntime;

#[async_trait]
impl AsyncRuntime for RealAsyncRuntime {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

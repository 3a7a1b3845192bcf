//! Test helper utilities and mock implementations

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;

use crate::api_client::ApiError;
use crate::api_client::types::{
    Application, BatchLifecycleState, BatchState, BatchSummary, Country, Environment,
    InternetBrowser, MobileDevice, NativeBuild, NewTestCase, Organization, RunFilters, TestCase,
    TestCaseRun, TestCaseRunsBatch,
};
use crate::deps::{AsyncRuntime, GatApiClient};

mock! {
    pub AsyncRuntimeMock {}

    #[async_trait]
    impl AsyncRuntime for AsyncRuntimeMock {
        async fn sleep(&self, duration: Duration);
    }
}

/// Configurable stub API client for command tests
///
/// Each field holds the canned response for one operation; calling an
/// operation whose field is unset panics. The `by_id` lookups run over the
/// stubbed listings, mirroring the production client. Batch states are a
/// queue so a polling loop can observe a sequence; the last entry repeats
/// once the queue is drained.
#[derive(Default)]
pub struct StubApiClient {
    pub whoami: Option<Result<Organization, ApiError>>,
    pub applications: Option<Result<Vec<Application>, ApiError>>,
    pub environments: Option<Result<Vec<Environment>, ApiError>>,
    pub created_environment: Option<Result<Environment, ApiError>>,
    pub updated_environment: Option<Result<Environment, ApiError>>,
    pub delete_environment: Option<Result<(), ApiError>>,
    pub native_builds: Option<Result<Vec<NativeBuild>, ApiError>>,
    pub updated_native_build: Option<Result<NativeBuild, ApiError>>,
    pub delete_native_build: Option<Result<(), ApiError>>,
    pub internet_browsers: Option<Result<Vec<InternetBrowser>, ApiError>>,
    pub mobile_devices: Option<Result<Vec<MobileDevice>, ApiError>>,
    pub countries: Option<Result<Vec<Country>, ApiError>>,
    pub test_cases: Option<Result<Vec<TestCase>, ApiError>>,
    pub created_test_cases: Option<Result<Vec<TestCase>, ApiError>>,
    pub delete_all_test_cases: Option<Result<(), ApiError>>,
    pub delete_test_cases: Option<Result<(), ApiError>>,
    pub created_batch: Option<Result<TestCaseRunsBatch, ApiError>>,
    pub batch_states: Mutex<VecDeque<Result<BatchState, ApiError>>>,
    pub batch_summary: Option<Result<BatchSummary, ApiError>>,
    pub test_case_runs: Option<Result<Vec<TestCaseRun>, ApiError>>,

    /// Number of state queries issued
    pub state_calls: AtomicUsize,
    /// Ids passed to the last `delete_test_cases` call
    pub deleted_test_case_ids: Mutex<Vec<String>>,
    /// Payloads passed to the last `create_test_cases` call
    pub created_test_case_payloads: Mutex<Vec<NewTestCase>>,
    /// Arguments of the last batch submission:
    /// (application, environment, browser ids, test case ids)
    pub submitted_batch: Mutex<Option<(String, String, Vec<String>, Vec<String>)>>,
}

impl StubApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_states(self, states: Vec<Result<BatchState, ApiError>>) -> Self {
        *self.batch_states.lock().unwrap() = states.into();
        self
    }
}

fn stubbed<T: Clone>(field: &Option<Result<T, ApiError>>, operation: &str) -> Result<T, ApiError> {
    field
        .clone()
        .unwrap_or_else(|| panic!("{operation} not stubbed"))
}

#[async_trait]
impl GatApiClient for StubApiClient {
    async fn whoami(&self) -> Result<Organization, ApiError> {
        stubbed(&self.whoami, "whoami")
    }

    async fn applications(&self) -> Result<Vec<Application>, ApiError> {
        stubbed(&self.applications, "applications")
    }

    async fn application_by_id(&self, id: &str) -> Result<Application, ApiError> {
        self.applications()
            .await?
            .into_iter()
            .find(|application| application.id == id)
            .ok_or_else(|| ApiError::NotFound {
                message: format!("no application with ID {id}"),
            })
    }

    async fn environments(&self, _application_id: &str) -> Result<Vec<Environment>, ApiError> {
        stubbed(&self.environments, "environments")
    }

    async fn environment_by_id(
        &self,
        application_id: &str,
        id: &str,
    ) -> Result<Environment, ApiError> {
        self.environments(application_id)
            .await?
            .into_iter()
            .find(|environment| environment.id == id)
            .ok_or_else(|| ApiError::NotFound {
                message: format!("no environment with ID {id}"),
            })
    }

    async fn create_environment(
        &self,
        _application_id: &str,
        _name: &str,
        _url: &str,
    ) -> Result<Environment, ApiError> {
        stubbed(&self.created_environment, "create_environment")
    }

    async fn update_environment(
        &self,
        _application_id: &str,
        _environment_id: &str,
        _name: &str,
        _url: &str,
    ) -> Result<Environment, ApiError> {
        stubbed(&self.updated_environment, "update_environment")
    }

    async fn delete_environment(
        &self,
        _application_id: &str,
        _environment_id: &str,
    ) -> Result<(), ApiError> {
        stubbed(&self.delete_environment, "delete_environment")
    }

    async fn native_builds(&self, _application_id: &str) -> Result<Vec<NativeBuild>, ApiError> {
        stubbed(&self.native_builds, "native_builds")
    }

    async fn native_build_by_id(
        &self,
        application_id: &str,
        id: &str,
    ) -> Result<NativeBuild, ApiError> {
        self.native_builds(application_id)
            .await?
            .into_iter()
            .find(|build| build.id == id)
            .ok_or_else(|| ApiError::NotFound {
                message: format!("no native build with ID {id}"),
            })
    }

    async fn update_native_build(
        &self,
        _application_id: &str,
        _build_id: &str,
        _name: &str,
    ) -> Result<NativeBuild, ApiError> {
        stubbed(&self.updated_native_build, "update_native_build")
    }

    async fn delete_native_build(
        &self,
        _application_id: &str,
        _build_id: &str,
    ) -> Result<(), ApiError> {
        stubbed(&self.delete_native_build, "delete_native_build")
    }

    async fn internet_browsers(&self) -> Result<Vec<InternetBrowser>, ApiError> {
        stubbed(&self.internet_browsers, "internet_browsers")
    }

    async fn mobile_devices(&self) -> Result<Vec<MobileDevice>, ApiError> {
        stubbed(&self.mobile_devices, "mobile_devices")
    }

    async fn countries(&self) -> Result<Vec<Country>, ApiError> {
        stubbed(&self.countries, "countries")
    }

    async fn test_cases(&self, _application_id: &str) -> Result<Vec<TestCase>, ApiError> {
        stubbed(&self.test_cases, "test_cases")
    }

    async fn create_test_cases(
        &self,
        _application_id: &str,
        test_cases: &[NewTestCase],
    ) -> Result<Vec<TestCase>, ApiError> {
        *self.created_test_case_payloads.lock().unwrap() = test_cases.to_vec();
        stubbed(&self.created_test_cases, "create_test_cases")
    }

    async fn delete_all_test_cases(&self, _application_id: &str) -> Result<(), ApiError> {
        stubbed(&self.delete_all_test_cases, "delete_all_test_cases")
    }

    async fn delete_test_cases(
        &self,
        _application_id: &str,
        ids: &[String],
    ) -> Result<(), ApiError> {
        *self.deleted_test_case_ids.lock().unwrap() = ids.to_vec();
        stubbed(&self.delete_test_cases, "delete_test_cases")
    }

    async fn create_test_case_runs_batch(
        &self,
        application_id: &str,
        environment_id: &str,
        internet_browser_ids: &[String],
        test_case_ids: &[String],
    ) -> Result<TestCaseRunsBatch, ApiError> {
        *self.submitted_batch.lock().unwrap() = Some((
            application_id.to_string(),
            environment_id.to_string(),
            internet_browser_ids.to_vec(),
            test_case_ids.to_vec(),
        ));
        stubbed(&self.created_batch, "create_test_case_runs_batch")
    }

    async fn test_case_runs_batch_state(
        &self,
        _application_id: &str,
        _batch_id: &str,
    ) -> Result<BatchState, ApiError> {
        self.state_calls.fetch_add(1, Ordering::SeqCst);
        let mut states = self.batch_states.lock().unwrap();
        if states.len() > 1 {
            states.pop_front().expect("queue is non-empty")
        } else {
            states
                .front()
                .cloned()
                .unwrap_or_else(|| panic!("test_case_runs_batch_state not stubbed"))
        }
    }

    async fn test_case_runs_batch_summary(
        &self,
        _application_id: &str,
        _batch_id: &str,
    ) -> Result<BatchSummary, ApiError> {
        stubbed(&self.batch_summary, "test_case_runs_batch_summary")
    }

    async fn test_case_runs(
        &self,
        _application_id: &str,
        _batch_id: &str,
        _filters: &RunFilters,
    ) -> Result<Vec<TestCaseRun>, ApiError> {
        stubbed(&self.test_case_runs, "test_case_runs")
    }
}

// Sample records

pub fn test_application(id: &str, name: &str) -> Application {
    Application {
        id: id.to_string(),
        name: name.to_string(),
        platform_name: "web".to_string(),
    }
}

pub fn test_environment(id: &str, name: &str) -> Environment {
    Environment {
        id: id.to_string(),
        name: name.to_string(),
        url: format!("https://{id}.example.com"),
    }
}

pub fn test_browser(id: &str, name: &str) -> InternetBrowser {
    InternetBrowser {
        id: id.to_string(),
        name: name.to_string(),
        operating_system_name: "Linux".to_string(),
    }
}

pub fn test_test_case(id: &str, title: &str) -> TestCase {
    TestCase {
        id: id.to_string(),
        title: title.to_string(),
        importance: None,
        section: None,
        instructions: Vec::new(),
    }
}

pub fn test_batch_state(batch_id: &str, state: &str) -> BatchState {
    BatchState {
        id: batch_id.to_string(),
        state: BatchLifecycleState(state.to_string()),
        total_count: 3,
        in_progress_count: 1,
        completed_count: 2,
        failed_count: 0,
        passed_count: 2,
        cancelled_count: 0,
    }
}

pub fn test_batch_summary(batch_id: &str) -> BatchSummary {
    BatchSummary {
        id: batch_id.to_string(),
        name: "Nightly regression".to_string(),
        start_time: None,
        finish_time: None,
        test_case_credits: 6,
        testers_involved: 2,
        application_id: "a1".to_string(),
        environment_id: "e1".to_string(),
        test_case_runs: Vec::new(),
    }
}

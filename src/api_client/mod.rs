//! HTTP client for the Global App Testing REST API
//!
//! The client issues one authenticated HTTPS call per operation against the
//! fixed service base URL and normalizes the outcome. `execute` returns a
//! [`ResponseEnvelope`] for any HTTP status; deciding success or failure is
//! the job of the operation layer via [`ResponseEnvelope::expect_success`].
//! Network-level faults (unreachable host, TLS failure, timeout) are the
//! only errors the transport classifies itself. Nothing is ever retried.

mod error;
pub mod types;

pub use error::ApiError;

use std::time::{Duration, Instant};

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::config::{API_VERSION, DEFAULT_API_TIMEOUT_SECS, api_base_url};
use types::{
    Application, BatchState, BatchSummary, Country, Document, Environment, InternetBrowser,
    MobileDevice, NativeBuild, NewInstruction, NewTestCase, Organization, RunFilters, TestCase,
    TestCaseRun, TestCaseRunsBatch,
};

/// Configuration for the GAT API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Service base URL, without the version segment
    pub base_url: String,
    /// API key authenticating the client; must be non-empty
    pub api_key: String,
    /// Bounded per-request timeout
    pub timeout: Duration,
}

impl ApiConfig {
    /// Build a configuration for the given key, honoring the
    /// `GAT_API_URL` override
    pub fn new(api_key: String) -> Self {
        Self {
            base_url: api_base_url(),
            api_key,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        }
    }
}

/// One API request: method, path relative to the versioned base URL,
/// ordered query parameters and an optional JSON body
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl Request {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// A GET request for the given relative path
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A POST request for the given relative path
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A PATCH request for the given relative path
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// A DELETE request for the given relative path
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter, preserving insertion order
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Response body as the transport saw it
#[derive(Debug, Clone)]
pub enum Body {
    /// A parsed JSON document
    Json(Value),
    /// Raw text for non-JSON responses
    Text(String),
    /// No body (e.g. 204)
    Empty,
}

/// Outcome of one HTTP call: status, body and round-trip time
///
/// The status is exactly what the service returned; the transport performs
/// no remapping.
#[derive(Debug)]
pub struct ResponseEnvelope {
    /// HTTP status code, verbatim
    pub status: StatusCode,
    /// Response body
    pub body: Body,
    /// Round-trip time of the call
    pub elapsed: Duration,
}

impl ResponseEnvelope {
    /// Map a non-2xx status to the matching [`ApiError`] kind
    ///
    /// 401/403 become [`ApiError::Authentication`], 404 becomes
    /// [`ApiError::NotFound`], anything else non-2xx becomes
    /// [`ApiError::RequestFailed`]. The error message is extracted from the
    /// JSON:API error body when present, falling back to raw text.
    pub fn expect_success(self) -> Result<Self, ApiError> {
        if self.status.is_success() {
            return Ok(self);
        }
        let message = self.error_message();
        match self.status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ApiError::Authentication { message })
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound { message }),
            status => Err(ApiError::RequestFailed {
                status: status.as_u16(),
                message,
            }),
        }
    }

    /// Decode a successful response body into the declared shape
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let envelope = self.expect_success()?;
        match envelope.body {
            Body::Json(value) => serde_json::from_value(value).map_err(|e| ApiError::Decode {
                message: e.to_string(),
            }),
            Body::Text(_) | Body::Empty => Err(ApiError::Decode {
                message: "expected a JSON body".to_string(),
            }),
        }
    }

    // JSON:API error documents carry `errors[0].title` and optionally
    // `errors[0].detail`.
    fn error_message(&self) -> String {
        match &self.body {
            Body::Json(value) => {
                if let Some(first) = value
                    .get("errors")
                    .and_then(Value::as_array)
                    .and_then(|errors| errors.first())
                    && let Some(title) = first.get("title").and_then(Value::as_str)
                {
                    return match first.get("detail").and_then(Value::as_str) {
                        Some(detail) => format!("{title} - {detail}"),
                        None => title.to_string(),
                    };
                }
                value.to_string()
            }
            Body::Text(text) => text.clone(),
            Body::Empty => String::new(),
        }
    }
}

/// Authenticated client for the GAT API
///
/// The API key travels as an `X-Api-Key` default header on the underlying
/// HTTP client and is never logged.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a client for the given configuration
    ///
    /// Fails with [`ApiError::MissingCredential`] when the key is empty,
    /// before any network activity.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        if config.api_key.trim().is_empty() {
            return Err(ApiError::MissingCredential);
        }

        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| ApiError::MissingCredential)?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("X-Api-Key", key);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("gat-cli/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Connection(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Perform one authenticated HTTP call and return the normalized
    /// outcome
    pub async fn execute(&self, request: Request) -> Result<ResponseEnvelope, ApiError> {
        let url = format!("{}/{}/{}", self.base_url, API_VERSION, request.path);
        tracing::info!(%url, method = %request.method, "issuing API request");

        let mut builder = self.http.request(request.method, &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let start = Instant::now();
        let response = builder.send().await.map_err(classify_send_error)?;
        let elapsed = start.elapsed();
        let status = response.status();
        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "API response received"
        );

        let body = read_body(response).await?;
        Ok(ResponseEnvelope {
            status,
            body,
            elapsed,
        })
    }
}

fn classify_send_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Connection(error.to_string())
    }
}

async fn read_body(response: reqwest::Response) -> Result<Body, ApiError> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.contains("json"));

    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Connection(e.to_string()))?;

    if text.is_empty() {
        return Ok(Body::Empty);
    }
    if is_json && let Ok(value) = serde_json::from_str(&text) {
        return Ok(Body::Json(value));
    }
    Ok(Body::Text(text))
}

// Resource operations. Each one is: build a Request, execute it, interpret
// the envelope. Records come back in exactly the number and order the
// service returned them.
impl Client {
    /// Fetch the organization the API key belongs to
    pub async fn whoami(&self) -> Result<Organization, ApiError> {
        let envelope = self.execute(Request::get("whoami")).await?;
        Ok(envelope.decode::<Document<Organization>>()?.data)
    }

    /// List all applications of the organization
    pub async fn applications(&self) -> Result<Vec<Application>, ApiError> {
        let envelope = self.execute(Request::get("applications")).await?;
        Ok(envelope.decode::<Document<Vec<Application>>>()?.data)
    }

    /// Look up one application by identifier
    pub async fn application_by_id(&self, id: &str) -> Result<Application, ApiError> {
        self.applications()
            .await?
            .into_iter()
            .find(|application| application.id == id)
            .ok_or_else(|| ApiError::NotFound {
                message: format!("no application with ID {id}"),
            })
    }

    /// List the environments of an application
    pub async fn environments(&self, application_id: &str) -> Result<Vec<Environment>, ApiError> {
        let envelope = self
            .execute(Request::get(format!(
                "applications/{application_id}/environments"
            )))
            .await?;
        Ok(envelope.decode::<Document<Vec<Environment>>>()?.data)
    }

    /// Look up one environment of an application by identifier
    pub async fn environment_by_id(
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

    /// Create a new environment for an application
    pub async fn create_environment(
        &self,
        application_id: &str,
        name: &str,
        url: &str,
    ) -> Result<Environment, ApiError> {
        let body = json!({
            "data": {
                "type": "applicationEnvironment",
                "attributes": { "name": name, "url": url }
            }
        });
        let envelope = self
            .execute(
                Request::post(format!("applications/{application_id}/environments")).json(body),
            )
            .await?;
        Ok(envelope.decode::<Document<Environment>>()?.data)
    }

    /// Update an environment's name and URL
    pub async fn update_environment(
        &self,
        application_id: &str,
        environment_id: &str,
        name: &str,
        url: &str,
    ) -> Result<Environment, ApiError> {
        let body = json!({
            "data": {
                "type": "applicationEnvironment",
                "attributes": { "name": name, "url": url }
            }
        });
        let envelope = self
            .execute(
                Request::patch(format!(
                    "applications/{application_id}/environments/{environment_id}"
                ))
                .json(body),
            )
            .await?;
        Ok(envelope.decode::<Document<Environment>>()?.data)
    }

    /// Delete an environment; exactly one request, no retry
    pub async fn delete_environment(
        &self,
        application_id: &str,
        environment_id: &str,
    ) -> Result<(), ApiError> {
        let envelope = self
            .execute(Request::delete(format!(
                "applications/{application_id}/environments/{environment_id}"
            )))
            .await?;
        envelope.expect_success()?;
        Ok(())
    }

    /// List the native builds of an application
    pub async fn native_builds(&self, application_id: &str) -> Result<Vec<NativeBuild>, ApiError> {
        let envelope = self
            .execute(Request::get(format!(
                "applications/{application_id}/native_application_builds"
            )))
            .await?;
        Ok(envelope.decode::<Document<Vec<NativeBuild>>>()?.data)
    }

    /// Look up one native build of an application by identifier
    pub async fn native_build_by_id(
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

    /// Rename a native build
    pub async fn update_native_build(
        &self,
        application_id: &str,
        build_id: &str,
        name: &str,
    ) -> Result<NativeBuild, ApiError> {
        let body = json!({
            "data": {
                "type": "nativeApplicationBuild",
                "attributes": { "name": name }
            }
        });
        let envelope = self
            .execute(
                Request::patch(format!(
                    "applications/{application_id}/native_application_builds/{build_id}"
                ))
                .json(body),
            )
            .await?;
        Ok(envelope.decode::<Document<NativeBuild>>()?.data)
    }

    /// Delete a native build; exactly one request, no retry
    pub async fn delete_native_build(
        &self,
        application_id: &str,
        build_id: &str,
    ) -> Result<(), ApiError> {
        let envelope = self
            .execute(Request::delete(format!(
                "applications/{application_id}/native_application_builds/{build_id}"
            )))
            .await?;
        envelope.expect_success()?;
        Ok(())
    }

    /// List the browsers available for web test runs
    pub async fn internet_browsers(&self) -> Result<Vec<InternetBrowser>, ApiError> {
        let envelope = self.execute(Request::get("internet_browsers")).await?;
        Ok(envelope.decode::<Document<Vec<InternetBrowser>>>()?.data)
    }

    /// List the mobile devices available for native test runs
    pub async fn mobile_devices(&self) -> Result<Vec<MobileDevice>, ApiError> {
        let envelope = self.execute(Request::get("mobile_devices")).await?;
        Ok(envelope.decode::<Document<Vec<MobileDevice>>>()?.data)
    }

    /// List the countries available for localized tests
    pub async fn countries(&self) -> Result<Vec<Country>, ApiError> {
        let envelope = self.execute(Request::get("countries")).await?;
        Ok(envelope.decode::<Document<Vec<Country>>>()?.data)
    }

    /// List the test cases of an application
    pub async fn test_cases(&self, application_id: &str) -> Result<Vec<TestCase>, ApiError> {
        let envelope = self
            .execute(Request::get(format!(
                "applications/{application_id}/test_cases"
            )))
            .await?;
        Ok(envelope.decode::<Document<Vec<TestCase>>>()?.data)
    }

    /// Create test cases via the import endpoint, returning the created
    /// records with their new identifiers
    pub async fn create_test_cases(
        &self,
        application_id: &str,
        test_cases: &[NewTestCase],
    ) -> Result<Vec<TestCase>, ApiError> {
        let data: Vec<Value> = test_cases
            .iter()
            .map(|test_case| {
                json!({
                    "type": "testCase",
                    "attributes": {
                        "title": test_case.title,
                        "importance": test_case.importance,
                        "section": test_case.section,
                        "instructions": test_case
                            .instructions
                            .iter()
                            .map(instruction_json)
                            .collect::<Vec<Value>>(),
                    }
                })
            })
            .collect();
        let envelope = self
            .execute(
                Request::post(format!("applications/{application_id}/test_cases/import"))
                    .json(json!({ "data": data })),
            )
            .await?;
        Ok(envelope.decode::<Document<Vec<TestCase>>>()?.data)
    }

    /// Delete ALL test cases of an application; exactly one request, no
    /// retry
    pub async fn delete_all_test_cases(&self, application_id: &str) -> Result<(), ApiError> {
        let envelope = self
            .execute(Request::delete(format!(
                "applications/{application_id}/test_cases/delete_all"
            )))
            .await?;
        envelope.expect_success()?;
        Ok(())
    }

    /// Delete the given test cases; ids are passed verbatim as a query
    /// parameter
    pub async fn delete_test_cases(
        &self,
        application_id: &str,
        ids: &[String],
    ) -> Result<(), ApiError> {
        let envelope = self
            .execute(
                Request::delete(format!("applications/{application_id}/test_cases"))
                    .query("ids", ids.join(",")),
            )
            .await?;
        envelope.expect_success()?;
        Ok(())
    }

    /// Submit a new test-case-runs batch
    ///
    /// Fails with [`ApiError::RequestFailed`] when any referenced
    /// identifier is unknown to the service; the service's error body is
    /// surfaced verbatim.
    pub async fn create_test_case_runs_batch(
        &self,
        application_id: &str,
        environment_id: &str,
        internet_browser_ids: &[String],
        test_case_ids: &[String],
    ) -> Result<TestCaseRunsBatch, ApiError> {
        let body = json!({
            "data": {
                "type": "testCaseRunsBatch",
                "attributes": {},
                "relationships": {
                    "applicationEnvironment": {
                        "data": { "type": "applicationEnvironment", "id": environment_id }
                    },
                    "internetBrowsers": {
                        "data": internet_browser_ids
                            .iter()
                            .map(|id| json!({ "type": "internetBrowser", "id": id }))
                            .collect::<Vec<Value>>()
                    },
                    "testCases": {
                        "data": test_case_ids
                            .iter()
                            .map(|id| json!({ "type": "testCase", "id": id }))
                            .collect::<Vec<Value>>()
                    }
                }
            }
        });
        let envelope = self
            .execute(
                Request::post(format!(
                    "applications/{application_id}/test_case_runs_batches"
                ))
                .json(body),
            )
            .await?;
        Ok(envelope.decode::<Document<TestCaseRunsBatch>>()?.data)
    }

    /// Fetch the current lifecycle state of a batch
    ///
    /// A single point-in-time query; fails with [`ApiError::NotFound`] for
    /// an unknown batch identifier.
    pub async fn test_case_runs_batch_state(
        &self,
        application_id: &str,
        batch_id: &str,
    ) -> Result<BatchState, ApiError> {
        let envelope = self
            .execute(Request::get(format!(
                "applications/{application_id}/test_case_runs_batches/{batch_id}/state"
            )))
            .await?;
        Ok(envelope.decode::<Document<BatchState>>()?.data)
    }

    /// Fetch the summary of a batch
    ///
    /// Whatever the service answers before the batch is terminal is
    /// forwarded as-is; this call never blocks waiting for completion.
    pub async fn test_case_runs_batch_summary(
        &self,
        application_id: &str,
        batch_id: &str,
    ) -> Result<BatchSummary, ApiError> {
        let envelope = self
            .execute(Request::get(format!(
                "applications/{application_id}/test_case_runs_batches/{batch_id}/summary"
            )))
            .await?;
        envelope.decode::<BatchSummary>()
    }

    /// List the runs of a batch, optionally filtered
    pub async fn test_case_runs(
        &self,
        application_id: &str,
        batch_id: &str,
        filters: &RunFilters,
    ) -> Result<Vec<TestCaseRun>, ApiError> {
        let mut request = Request::get(format!(
            "applications/{application_id}/test_case_runs_batches/{batch_id}/test_case_runs"
        ));
        if !filters.ids.is_empty() {
            request = request.query("filter[ids]", filters.ids.join(","));
        }
        if let Some(outcome) = &filters.outcome {
            request = request.query("filter[outcome]", outcome);
        }
        if let Some(importance) = &filters.importance {
            request = request.query("filter[importance]", importance);
        }
        let envelope = self.execute(request).await?;
        Ok(envelope.decode::<Document<Vec<TestCaseRun>>>()?.data)
    }
}

fn instruction_json(instruction: &NewInstruction) -> Value {
    match instruction {
        NewInstruction::Embedded { test_case_id } => {
            json!({ "type": "testCase", "id": test_case_id })
        }
        NewInstruction::Step { content, assertion } => json!({
            "type": "testCaseInstruction",
            "attributes": { "content": content, "assertion": assertion }
        }),
    }
}

#[cfg(test)]
mod tests;

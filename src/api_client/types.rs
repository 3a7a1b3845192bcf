//! Typed records for the Global App Testing wire format
//!
//! The service speaks JSON:API: every document is `{"data": ...}` where a
//! resource carries `id`, `type` and an `attributes` object. The structs
//! here decode that shape into flat domain records; the `type` field is
//! ignored on input and only emitted when a request body requires it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level `{"data": ...}` document wrapper
#[derive(Debug, Deserialize)]
pub struct Document<T> {
    /// Primary data of the document
    pub data: T,
}

/// A raw JSON:API resource: identifier plus attribute payload
#[derive(Debug, Deserialize)]
pub struct Resource<A> {
    /// Server-assigned identifier
    pub id: String,
    /// Attribute payload
    pub attributes: A,
}

/// The organization the API key belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Resource<OrganizationAttributes>")]
pub struct Organization {
    /// Server-assigned identifier
    pub id: String,
    /// Organization display name
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct OrganizationAttributes {
    name: String,
}

impl From<Resource<OrganizationAttributes>> for Organization {
    fn from(resource: Resource<OrganizationAttributes>) -> Self {
        Self {
            id: resource.id,
            name: resource.attributes.name,
        }
    }
}

/// An application registered with the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Resource<ApplicationAttributes>")]
pub struct Application {
    /// Server-assigned identifier
    pub id: String,
    /// Application display name
    pub name: String,
    /// Platform the application targets (e.g. web, iOS, Android)
    pub platform_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationAttributes {
    name: String,
    platform_name: String,
}

impl From<Resource<ApplicationAttributes>> for Application {
    fn from(resource: Resource<ApplicationAttributes>) -> Self {
        Self {
            id: resource.id,
            name: resource.attributes.name,
            platform_name: resource.attributes.platform_name,
        }
    }
}

/// A test environment belonging to an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Resource<EnvironmentAttributes>")]
pub struct Environment {
    /// Server-assigned identifier
    pub id: String,
    /// Environment display name
    pub name: String,
    /// URL the environment is reachable at
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct EnvironmentAttributes {
    name: String,
    url: String,
}

impl From<Resource<EnvironmentAttributes>> for Environment {
    fn from(resource: Resource<EnvironmentAttributes>) -> Self {
        Self {
            id: resource.id,
            name: resource.attributes.name,
            url: resource.attributes.url,
        }
    }
}

/// A native application build uploaded to the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Resource<NativeBuildAttributes>")]
pub struct NativeBuild {
    /// Server-assigned identifier
    pub id: String,
    /// Build display name
    pub name: String,
    /// Original filename of the uploaded binary, if any
    pub original_file_name: Option<String>,
    /// External vendor URL the build was sourced from, if any
    pub external_vendor_url: Option<String>,
    /// Signing status reported by the service
    pub signing_status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeBuildAttributes {
    name: String,
    #[serde(default)]
    app_file_original_filename: Option<String>,
    #[serde(default)]
    external_vendor_url: Option<String>,
    #[serde(default)]
    signing_status: Option<String>,
}

impl From<Resource<NativeBuildAttributes>> for NativeBuild {
    fn from(resource: Resource<NativeBuildAttributes>) -> Self {
        Self {
            id: resource.id,
            name: resource.attributes.name,
            original_file_name: resource.attributes.app_file_original_filename,
            external_vendor_url: resource.attributes.external_vendor_url,
            signing_status: resource.attributes.signing_status,
        }
    }
}

/// A browser the service can run web test cases on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Resource<InternetBrowserAttributes>")]
pub struct InternetBrowser {
    /// Server-assigned identifier
    pub id: String,
    /// Browser display name
    pub name: String,
    /// Operating system the browser runs on
    pub operating_system_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternetBrowserAttributes {
    name: String,
    operating_system_name: String,
}

impl From<Resource<InternetBrowserAttributes>> for InternetBrowser {
    fn from(resource: Resource<InternetBrowserAttributes>) -> Self {
        Self {
            id: resource.id,
            name: resource.attributes.name,
            operating_system_name: resource.attributes.operating_system_name,
        }
    }
}

/// A mobile device the service can run native test cases on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Resource<MobileDeviceAttributes>")]
pub struct MobileDevice {
    /// Server-assigned identifier
    pub id: String,
    /// Device display name
    pub name: String,
    /// Device brand
    pub brand_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileDeviceAttributes {
    name: String,
    brand_name: String,
}

impl From<Resource<MobileDeviceAttributes>> for MobileDevice {
    fn from(resource: Resource<MobileDeviceAttributes>) -> Self {
        Self {
            id: resource.id,
            name: resource.attributes.name,
            brand_name: resource.attributes.brand_name,
        }
    }
}

/// A country available for localized testing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Resource<CountryAttributes>")]
pub struct Country {
    /// Server-assigned identifier
    pub id: String,
    /// Country display name
    pub name: String,
    /// ISO country code
    pub code: String,
    /// Platforms testable from this country
    pub available_platforms: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryAttributes {
    name: String,
    code: String,
    #[serde(default)]
    available_platforms: Vec<String>,
}

impl From<Resource<CountryAttributes>> for Country {
    fn from(resource: Resource<CountryAttributes>) -> Self {
        Self {
            id: resource.id,
            name: resource.attributes.name,
            code: resource.attributes.code,
            available_platforms: resource.attributes.available_platforms,
        }
    }
}

/// A test case stored in the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Resource<TestCaseAttributes>")]
pub struct TestCase {
    /// Server-assigned identifier
    pub id: String,
    /// Test case title
    pub title: String,
    /// Importance level, when the endpoint reports it
    pub importance: Option<String>,
    /// Section name, when the endpoint reports it
    pub section: Option<String>,
    /// Instruction steps, when the endpoint reports them
    pub instructions: Vec<TestCaseInstruction>,
}

#[derive(Debug, Deserialize)]
pub struct TestCaseAttributes {
    title: String,
    #[serde(default)]
    importance: Option<String>,
    #[serde(default)]
    section: Option<String>,
    #[serde(default)]
    instructions: Vec<Resource<TestCaseInstructionAttributes>>,
}

impl From<Resource<TestCaseAttributes>> for TestCase {
    fn from(resource: Resource<TestCaseAttributes>) -> Self {
        Self {
            id: resource.id,
            title: resource.attributes.title,
            importance: resource.attributes.importance,
            section: resource.attributes.section,
            instructions: resource
                .attributes
                .instructions
                .into_iter()
                .map(TestCaseInstruction::from)
                .collect(),
        }
    }
}

/// A single instruction step inside a test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Resource<TestCaseInstructionAttributes>")]
pub struct TestCaseInstruction {
    /// Server-assigned identifier
    pub id: String,
    /// Step text presented to the tester
    pub content: String,
    /// Whether the step is an assertion the tester must verify
    pub assertion: bool,
}

#[derive(Debug, Deserialize)]
pub struct TestCaseInstructionAttributes {
    content: String,
    #[serde(default)]
    assertion: bool,
}

impl From<Resource<TestCaseInstructionAttributes>> for TestCaseInstruction {
    fn from(resource: Resource<TestCaseInstructionAttributes>) -> Self {
        Self {
            id: resource.id,
            content: resource.attributes.content,
            assertion: resource.attributes.assertion,
        }
    }
}

/// Payload for creating a test case via the import endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTestCase {
    /// Test case title
    pub title: String,
    /// Importance level (Low, Medium, Critical)
    pub importance: Option<String>,
    /// Section name
    pub section: Option<String>,
    /// Instruction steps in execution order
    pub instructions: Vec<NewInstruction>,
}

/// One instruction in a [`NewTestCase`] payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewInstruction {
    /// A free-text step, optionally an assertion
    Step {
        /// Step text presented to the tester
        content: String,
        /// Whether the step is an assertion
        assertion: bool,
    },
    /// Embed an existing test case by identifier
    Embedded {
        /// Identifier of the embedded test case
        test_case_id: String,
    },
}

/// A submitted test-case-runs batch; only the identifier is returned on
/// creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Resource<IgnoredAttributes>")]
pub struct TestCaseRunsBatch {
    /// Server-assigned batch identifier; immutable once assigned
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct IgnoredAttributes {}

impl From<Resource<IgnoredAttributes>> for TestCaseRunsBatch {
    fn from(resource: Resource<IgnoredAttributes>) -> Self {
        Self { id: resource.id }
    }
}

/// Server-defined batch lifecycle state, surfaced verbatim
///
/// The vocabulary is open-ended; new states must not break the client, so
/// this is a string wrapper rather than a closed enum. Only the documented
/// terminal markers are recognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchLifecycleState(pub String);

impl BatchLifecycleState {
    /// Whether the batch has reached a state after which no further
    /// progress occurs and a summary becomes retrievable
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.0.to_ascii_lowercase().as_str(),
            "completed" | "failed" | "cancelled"
        )
    }
}

impl std::fmt::Display for BatchLifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Point-in-time state of a test-case-runs batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Resource<BatchStateAttributes>")]
pub struct BatchState {
    /// Server-assigned identifier
    pub id: String,
    /// Lifecycle state string, surfaced verbatim
    pub state: BatchLifecycleState,
    /// Total runs in the batch
    pub total_count: u32,
    /// Runs currently in progress
    pub in_progress_count: u32,
    /// Runs completed so far
    pub completed_count: u32,
    /// Runs that failed
    pub failed_count: u32,
    /// Runs that passed
    pub passed_count: u32,
    /// Runs that were cancelled
    pub cancelled_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStateAttributes {
    state: BatchLifecycleState,
    total_count: u32,
    in_progress_count: u32,
    completed_count: u32,
    failed_count: u32,
    passed_count: u32,
    cancelled_count: u32,
}

impl From<Resource<BatchStateAttributes>> for BatchState {
    fn from(resource: Resource<BatchStateAttributes>) -> Self {
        Self {
            id: resource.id,
            state: resource.attributes.state,
            total_count: resource.attributes.total_count,
            in_progress_count: resource.attributes.in_progress_count,
            completed_count: resource.attributes.completed_count,
            failed_count: resource.attributes.failed_count,
            passed_count: resource.attributes.passed_count,
            cancelled_count: resource.attributes.cancelled_count,
        }
    }
}

/// Per-run totals inside a batch summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Resource<BatchTestCaseRunAttributes>")]
pub struct BatchTestCaseRun {
    /// Server-assigned identifier
    pub id: String,
    /// Test case name
    pub name: String,
    /// Link to the run in the service UI
    pub ada_url: String,
    /// Failed result count
    pub failed_results_count: u32,
    /// Passed result count
    pub passed_results_count: u32,
    /// Total result count
    pub total_results_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTestCaseRunAttributes {
    name: String,
    ada_url: String,
    failed_results_count: u32,
    passed_results_count: u32,
    total_results_count: u32,
}

impl From<Resource<BatchTestCaseRunAttributes>> for BatchTestCaseRun {
    fn from(resource: Resource<BatchTestCaseRunAttributes>) -> Self {
        Self {
            id: resource.id,
            name: resource.attributes.name,
            ada_url: resource.attributes.ada_url,
            failed_results_count: resource.attributes.failed_results_count,
            passed_results_count: resource.attributes.passed_results_count,
            total_results_count: resource.attributes.total_results_count,
        }
    }
}

/// Summary of a finished (or finishing) test-case-runs batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SummaryDocument")]
pub struct BatchSummary {
    /// Server-assigned identifier
    pub id: String,
    /// Batch display name
    pub name: String,
    /// When execution started, if it has
    pub start_time: Option<DateTime<Utc>>,
    /// When execution finished, if it has
    pub finish_time: Option<DateTime<Utc>>,
    /// Test case credits consumed
    pub test_case_credits: u32,
    /// Number of testers who worked on the batch
    pub testers_involved: u32,
    /// Identifier of the application the batch ran against
    pub application_id: String,
    /// Identifier of the environment the batch ran against
    pub environment_id: String,
    /// Per-run totals, in service order
    pub test_case_runs: Vec<BatchTestCaseRun>,
}

// The summary document carries its runs in `included[0].data` and the
// application/environment ids under `relationships`, so it gets its own
// wire shape instead of the generic Resource wrapper.
#[derive(Debug, Deserialize)]
pub struct SummaryDocument {
    data: SummaryData,
    #[serde(default)]
    included: Vec<Document<Vec<BatchTestCaseRun>>>,
}

#[derive(Debug, Deserialize)]
struct SummaryData {
    id: String,
    attributes: SummaryAttributes,
    relationships: SummaryRelationships,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryAttributes {
    name: String,
    #[serde(default)]
    start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    finish_time: Option<DateTime<Utc>>,
    test_case_credits: u32,
    testers_involved: u32,
}

#[derive(Debug, Deserialize)]
struct SummaryRelationships {
    application: RelationshipOne,
    environment: RelationshipOne,
}

#[derive(Debug, Deserialize)]
struct RelationshipOne {
    data: ResourceIdentifier,
}

/// Bare JSON:API resource identifier (`{"type", "id"}`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceIdentifier {
    /// Resource identifier
    pub id: String,
}

impl From<SummaryDocument> for BatchSummary {
    fn from(document: SummaryDocument) -> Self {
        Self {
            id: document.data.id,
            name: document.data.attributes.name,
            start_time: document.data.attributes.start_time,
            finish_time: document.data.attributes.finish_time,
            test_case_credits: document.data.attributes.test_case_credits,
            testers_involved: document.data.attributes.testers_involved,
            application_id: document.data.relationships.application.data.id,
            environment_id: document.data.relationships.environment.data.id,
            test_case_runs: document
                .included
                .into_iter()
                .next()
                .map(|doc| doc.data)
                .unwrap_or_default(),
        }
    }
}

/// Optional filters for listing the runs of a batch, passed through
/// verbatim as `filter[...]` query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFilters {
    /// Restrict to these run identifiers
    pub ids: Vec<String>,
    /// Restrict to runs with this outcome (passed/failed)
    pub outcome: Option<String>,
    /// Restrict to runs of test cases with this importance
    pub importance: Option<String>,
}

/// A single test-case run with its variations and tester results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Resource<TestCaseRunAttributes>")]
pub struct TestCaseRun {
    /// Server-assigned identifier
    pub id: String,
    /// Name of the test case that was run
    pub test_case_name: String,
    /// Section of the test case, if any
    pub test_case_section: Option<String>,
    /// Importance of the test case, if any
    pub test_case_importance: Option<String>,
    /// Link to the run in the service UI
    pub ada_url: String,
    /// Variations executed for this run, in service order
    pub variations: Vec<RunVariation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseRunAttributes {
    test_case_name: String,
    #[serde(default)]
    test_case_section: Option<String>,
    #[serde(default)]
    test_case_importance: Option<String>,
    ada_url: String,
    #[serde(default)]
    variations: Vec<RunVariation>,
}

impl From<Resource<TestCaseRunAttributes>> for TestCaseRun {
    fn from(resource: Resource<TestCaseRunAttributes>) -> Self {
        Self {
            id: resource.id,
            test_case_name: resource.attributes.test_case_name,
            test_case_section: resource.attributes.test_case_section,
            test_case_importance: resource.attributes.test_case_importance,
            ada_url: resource.attributes.ada_url,
            variations: resource.attributes.variations,
        }
    }
}

/// One variation of a test-case run (e.g. per browser or device)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunVariation {
    /// Variation display name
    pub name: String,
    /// Tester results for this variation, in service order
    #[serde(default)]
    pub results: Vec<RunResult>,
}

/// A single tester result inside a variation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    /// Outcome reported by the tester (passed/failed)
    pub outcome: String,
    /// Attachment link, if the tester uploaded one
    #[serde(default)]
    pub attachment_url: Option<String>,
    /// Free-text tester comment
    #[serde(default)]
    pub tester_comment: Option<String>,
    /// Steps to reproduce, for failed results
    #[serde(default)]
    pub steps_to_reproduce: Vec<String>,
    /// When the result was reported
    pub reported_at: DateTime<Utc>,
    /// Country the tester worked from
    pub country: String,
}

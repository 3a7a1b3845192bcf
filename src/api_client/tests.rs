//! Transport and operation tests against a local mock server

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::types::{NewInstruction, NewTestCase, RunFilters};
use super::{ApiConfig, ApiError, Client, Request};

const TEST_KEY: &str = "test-key";

fn client_for(server: &MockServer) -> Client {
    Client::new(&ApiConfig {
        base_url: server.uri(),
        api_key: TEST_KEY.to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[test]
fn empty_key_fails_before_any_network_call() {
    let result = Client::new(&ApiConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        api_key: String::new(),
        timeout: Duration::from_secs(1),
    });
    assert_eq!(result.err(), Some(ApiError::MissingCredential));

    let result = Client::new(&ApiConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        api_key: "   ".to_string(),
        timeout: Duration::from_secs(1),
    });
    assert_eq!(result.err(), Some(ApiError::MissingCredential));
}

#[tokio::test]
async fn execute_passes_status_through_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/whoami"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let envelope = client_for(&server)
        .execute(Request::get("whoami"))
        .await
        .unwrap();
    assert_eq!(envelope.status.as_u16(), 500);
}

#[tokio::test]
async fn execute_attaches_api_key_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/whoami"))
        .and(header("X-Api-Key", TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": "org-1", "type": "organization", "attributes": { "name": "Acme" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let organization = client_for(&server).whoami().await.unwrap();
    assert_eq!(organization.id, "org-1");
    assert_eq!(organization.name, "Acme");
}

#[tokio::test]
async fn list_operations_preserve_record_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "a3", "type": "application",
                  "attributes": { "name": "Gamma", "platformName": "web" } },
                { "id": "a1", "type": "application",
                  "attributes": { "name": "Alpha", "platformName": "iOS" } },
                { "id": "a2", "type": "application",
                  "attributes": { "name": "Beta", "platformName": "Android" } }
            ]
        })))
        .mount(&server)
        .await;

    let applications = client_for(&server).applications().await.unwrap();
    let ids: Vec<&str> = applications.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a3", "a1", "a2"]);
}

#[tokio::test]
async fn non_2xx_maps_to_request_failed_with_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/applications"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": [{ "title": "Validation failed", "detail": "platform is unsupported" }]
        })))
        .mount(&server)
        .await;

    let error = client_for(&server).applications().await.unwrap_err();
    assert_eq!(
        error,
        ApiError::RequestFailed {
            status: 422,
            message: "Validation failed - platform is unsupported".to_string(),
        }
    );
}

#[tokio::test]
async fn error_message_falls_back_to_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/applications"))
        .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable"))
        .mount(&server)
        .await;

    let error = client_for(&server).applications().await.unwrap_err();
    assert_eq!(
        error,
        ApiError::RequestFailed {
            status: 503,
            message: "service unavailable".to_string(),
        }
    );
}

#[tokio::test]
async fn rejected_credential_maps_to_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/whoami"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{ "title": "Invalid API key" }]
        })))
        .mount(&server)
        .await;

    let error = client_for(&server).whoami().await.unwrap_err();
    assert_eq!(
        error,
        ApiError::Authentication {
            message: "Invalid API key".to_string(),
        }
    );
}

#[tokio::test]
async fn unknown_batch_id_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/applications/a1/test_case_runs_batches/nope/state"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{ "title": "Record not found" }]
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .test_case_runs_batch_state("a1", "nope")
        .await
        .unwrap_err();
    assert_eq!(
        error,
        ApiError::NotFound {
            message: "Record not found".to_string(),
        }
    );
}

#[tokio::test]
async fn malformed_2xx_body_maps_to_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/whoami"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": "org-1", "attributes": { "unexpected": true } }
        })))
        .mount(&server)
        .await;

    let error = client_for(&server).whoami().await.unwrap_err();
    assert!(matches!(error, ApiError::Decode { .. }), "got {error:?}");
}

#[tokio::test]
async fn slow_response_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/whoami"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = Client::new(&ApiConfig {
        base_url: server.uri(),
        api_key: TEST_KEY.to_string(),
        timeout: Duration::from_millis(100),
    })
    .unwrap();

    let error = client.whoami().await.unwrap_err();
    assert_eq!(error, ApiError::Timeout);
}

#[tokio::test]
async fn unreachable_host_maps_to_connection_error() {
    // Bind an ephemeral port, then drop the listener so the connection is
    // refused.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = Client::new(&ApiConfig {
        base_url: format!("http://127.0.0.1:{port}"),
        api_key: TEST_KEY.to_string(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();

    let error = client.whoami().await.unwrap_err();
    assert!(matches!(error, ApiError::Connection(_)), "got {error:?}");
}

#[tokio::test]
async fn delete_test_cases_passes_ids_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/applications/a1/test_cases"))
        .and(query_param("ids", "t1,t2,t3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .delete_test_cases(
            "a1",
            &["t1".to_string(), "t2".to_string(), "t3".to_string()],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn run_filters_pass_through_as_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/v1/applications/a1/test_case_runs_batches/b1/test_case_runs",
        ))
        .and(query_param("filter[ids]", "r1,r2"))
        .and(query_param("filter[outcome]", "failed"))
        .and(query_param("filter[importance]", "Critical"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let filters = RunFilters {
        ids: vec!["r1".to_string(), "r2".to_string()],
        outcome: Some("failed".to_string()),
        importance: Some("Critical".to_string()),
    };
    let runs = client_for(&server)
        .test_case_runs("a1", "b1", &filters)
        .await
        .unwrap();
    assert!(runs.is_empty());
}

#[tokio::test]
async fn batch_submission_sends_relationships_and_returns_identifier() {
    let server = MockServer::start().await;
    let expected_body = json!({
        "data": {
            "type": "testCaseRunsBatch",
            "attributes": {},
            "relationships": {
                "applicationEnvironment": {
                    "data": { "type": "applicationEnvironment", "id": "e1" }
                },
                "internetBrowsers": {
                    "data": [{ "type": "internetBrowser", "id": "ib1" }]
                },
                "testCases": {
                    "data": [
                        { "type": "testCase", "id": "t1" },
                        { "type": "testCase", "id": "t2" }
                    ]
                }
            }
        }
    });
    Mock::given(method("POST"))
        .and(path("/v1/applications/a1/test_case_runs_batches"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "id": "batch-7", "type": "testCaseRunsBatch", "attributes": {} }
        })))
        .expect(1)
        .mount(&server)
        .await;
    // The identifier the service just issued must be usable verbatim for a
    // state query.
    Mock::given(method("GET"))
        .and(path("/v1/applications/a1/test_case_runs_batches/batch-7/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "batch-7",
                "type": "testCaseRunsBatchState",
                "attributes": {
                    "state": "queued",
                    "totalCount": 2, "inProgressCount": 0, "completedCount": 0,
                    "failedCount": 0, "passedCount": 0, "cancelledCount": 0
                }
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let batch = client
        .create_test_case_runs_batch(
            "a1",
            "e1",
            &["ib1".to_string()],
            &["t1".to_string(), "t2".to_string()],
        )
        .await
        .unwrap();
    assert_eq!(batch.id, "batch-7");

    let state = client
        .test_case_runs_batch_state("a1", &batch.id)
        .await
        .unwrap();
    assert_eq!(state.id, "batch-7");
    assert_eq!(state.state.0, "queued");
    assert!(!state.state.is_terminal());
    assert_eq!(state.total_count, 2);
}

#[tokio::test]
async fn summary_decodes_relationships_included_runs_and_timestamps() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/v1/applications/a1/test_case_runs_batches/b1/summary",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "b1",
                "type": "testCaseRunsBatchSummary",
                "attributes": {
                    "name": "Release 1.2 smoke",
                    "startTime": "2024-05-01T09:30:00Z",
                    "finishTime": null,
                    "testCaseCredits": 12,
                    "testersInvolved": 4
                },
                "relationships": {
                    "application": { "data": { "type": "application", "id": "a1" } },
                    "environment": { "data": { "type": "applicationEnvironment", "id": "e1" } }
                }
            },
            "included": [{
                "data": [
                    {
                        "id": "run-1",
                        "type": "testCaseRun",
                        "attributes": {
                            "name": "Login works",
                            "adaUrl": "https://app.globalapptesting.com/runs/run-1",
                            "failedResultsCount": 0,
                            "passedResultsCount": 3,
                            "totalResultsCount": 3
                        }
                    },
                    {
                        "id": "run-2",
                        "type": "testCaseRun",
                        "attributes": {
                            "name": "Checkout fails gracefully",
                            "adaUrl": "https://app.globalapptesting.com/runs/run-2",
                            "failedResultsCount": 1,
                            "passedResultsCount": 2,
                            "totalResultsCount": 3
                        }
                    }
                ]
            }]
        })))
        .mount(&server)
        .await;

    let summary = client_for(&server)
        .test_case_runs_batch_summary("a1", "b1")
        .await
        .unwrap();
    assert_eq!(summary.name, "Release 1.2 smoke");
    assert_eq!(summary.application_id, "a1");
    assert_eq!(summary.environment_id, "e1");
    assert_eq!(
        summary.start_time.unwrap().to_rfc3339(),
        "2024-05-01T09:30:00+00:00"
    );
    assert!(summary.finish_time.is_none());
    assert_eq!(summary.test_case_credits, 12);
    let run_ids: Vec<&str> = summary.test_case_runs.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(run_ids, vec!["run-1", "run-2"]);
}

#[tokio::test]
async fn create_test_case_round_trips_through_listing() {
    let server = MockServer::start().await;
    let expected_body = json!({
        "data": [{
            "type": "testCase",
            "attributes": {
                "title": "Tap button",
                "importance": "Medium",
                "section": null,
                "instructions": [
                    {
                        "type": "testCaseInstruction",
                        "attributes": { "content": "Tap button", "assertion": false }
                    },
                    {
                        "type": "testCaseInstruction",
                        "attributes": { "content": "Did the screen change?", "assertion": true }
                    },
                    { "type": "testCase", "id": "t9" }
                ]
            }
        }]
    });
    Mock::given(method("POST"))
        .and(path("/v1/applications/A1/test_cases/import"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": [{
                "id": "tc-42",
                "type": "testCase",
                "attributes": {
                    "title": "Tap button",
                    "importance": "Medium",
                    "section": null,
                    "instructions": [{
                        "id": "i-1",
                        "type": "testCaseInstruction",
                        "attributes": { "content": "Tap button", "assertion": false }
                    }]
                }
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/applications/A1/test_cases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "tc-42",
                "type": "testCase",
                "attributes": { "title": "Tap button" }
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let new_test_case = NewTestCase {
        title: "Tap button".to_string(),
        importance: Some("Medium".to_string()),
        section: None,
        instructions: vec![
            NewInstruction::Step {
                content: "Tap button".to_string(),
                assertion: false,
            },
            NewInstruction::Step {
                content: "Did the screen change?".to_string(),
                assertion: true,
            },
            NewInstruction::Embedded {
                test_case_id: "t9".to_string(),
            },
        ],
    };
    let created = client
        .create_test_cases("A1", &[new_test_case])
        .await
        .unwrap();
    assert_eq!(created.len(), 1);
    assert!(!created[0].id.is_empty());

    let listed = client.test_cases("A1").await.unwrap();
    assert!(listed.iter().any(|tc| tc.id == created[0].id));
}

#[tokio::test]
async fn lookup_by_id_fails_with_not_found_for_unknown_identifier() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "a1",
                "type": "application",
                "attributes": { "name": "Alpha", "platformName": "web" }
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let found = client.application_by_id("a1").await.unwrap();
    assert_eq!(found.name, "Alpha");

    let error = client.application_by_id("a9").await.unwrap_err();
    assert_eq!(
        error,
        ApiError::NotFound {
            message: "no application with ID a9".to_string(),
        }
    );
}

#[tokio::test]
async fn delete_with_204_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/applications/a1/environments/e1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .delete_environment("a1", "e1")
        .await
        .unwrap();
}

#[test]
fn terminal_states_are_recognized_case_insensitively() {
    use super::types::BatchLifecycleState;

    for state in ["completed", "failed", "cancelled", "Completed", "FAILED"] {
        assert!(BatchLifecycleState(state.to_string()).is_terminal(), "{state}");
    }
    for state in ["queued", "running", "in_progress", "paused", "brand-new-state"] {
        assert!(!BatchLifecycleState(state.to_string()).is_terminal(), "{state}");
    }
}

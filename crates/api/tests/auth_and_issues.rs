use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};
use xray_api::{
    ClientConfig, IssueTracker, NewIssue, OAuth1Credentials, XrayClient, XrayError,
};

/// Matches requests whose Authorization header starts with `prefix`.
struct AuthorizationPrefix(&'static str);

impl Match for AuthorizationPrefix {
    fn matches(&self, request: &Request) -> bool {
        request
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with(self.0))
            .unwrap_or(false)
    }
}

/// Matches requests without an Authorization header.
struct NoAuthorization;

impl Match for NoAuthorization {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("authorization")
    }
}

fn base_config(server: &MockServer) -> ClientConfig {
    let address = server.address();
    ClientConfig::new("http", address.ip().to_string()).with_port(address.port())
}

fn oauth() -> OAuth1Credentials {
    OAuth1Credentials {
        consumer_key: "xray-cli".to_string(),
        consumer_secret: "consumer-secret".to_string(),
        access_token: Some("access-token".to_string()),
        access_token_secret: Some("token-secret".to_string()),
    }
}

#[tokio::test]
async fn test_basic_auth_attached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/2/project/DEMO"))
        .and(header("authorization", "Basic YWxpY2U6c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key": "DEMO"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = XrayClient::new(base_config(&mock_server).with_basic_auth("alice", "secret"))
        .unwrap();
    let project = client.get_project_info("DEMO").await.unwrap();

    assert_eq!(project["key"], "DEMO");
}

#[tokio::test]
async fn test_oauth_takes_precedence_over_basic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/2/project/DEMO"))
        .and(AuthorizationPrefix("OAuth "))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key": "DEMO"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = base_config(&mock_server)
        .with_basic_auth("alice", "secret")
        .with_oauth(oauth());
    let client = XrayClient::new(config).unwrap();

    client.get_project_info("DEMO").await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let authorization = requests[0]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(authorization.contains("oauth_consumer_key=\"xray-cli\""));
    assert!(authorization.contains("oauth_token=\"access-token\""));
    assert!(!authorization.starts_with("Basic"));
}

#[tokio::test]
async fn test_anonymous_without_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(NoAuthorization)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = XrayClient::new(base_config(&mock_server)).unwrap();
    client.export_test_execution_results("EXEC-1").await.unwrap();
}

#[tokio::test]
async fn test_each_operation_sends_one_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = XrayClient::new(base_config(&mock_server)).unwrap();
    let err = client
        .export_test_execution_results("EXEC-1")
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "An internal error occurred when generating the output file."
    );
}

/// Records payloads and answers with a canned value.
#[derive(Default)]
struct RecordingTracker {
    created: Mutex<Vec<NewIssue>>,
}

#[async_trait]
impl IssueTracker for RecordingTracker {
    async fn create_issue(&self, issue: &NewIssue) -> xray_api::Result<Value> {
        self.created.lock().unwrap().push(issue.clone());
        Ok(json!({"id": "10100", "key": "DEMO-100", "self": "opaque"}))
    }
}

#[tokio::test]
async fn test_create_test_plan_delegates_payload() {
    let tracker = Arc::new(RecordingTracker::default());
    let client = XrayClient::new(ClientConfig::new("https", "jira.example.com"))
        .unwrap()
        .with_issue_tracker(tracker.clone());

    let created = client.create_test_plan(10, "Plan A", "desc").await.unwrap();

    assert_eq!(
        created,
        json!({"id": "10100", "key": "DEMO-100", "self": "opaque"})
    );

    let recorded = tracker.created.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(
        serde_json::to_value(&recorded[0]).unwrap(),
        json!({
            "fields": {
                "project": {"id": 10},
                "summary": "Plan A",
                "description": "desc",
                "issuetype": {"name": "Test Plan"}
            }
        })
    );
}

#[tokio::test]
async fn test_create_operations_use_issue_type_names() {
    let tracker = Arc::new(RecordingTracker::default());
    let client = XrayClient::new(ClientConfig::new("https", "jira.example.com"))
        .unwrap()
        .with_issue_tracker(tracker.clone());

    client.create_test(1, "t", "").await.unwrap();
    client.create_test_set(1, "s", "").await.unwrap();
    client.create_test_execution(1, "e", "").await.unwrap();

    let names: Vec<String> = tracker
        .created
        .lock()
        .unwrap()
        .iter()
        .map(|issue| issue.fields.issuetype.name.clone())
        .collect();
    assert_eq!(names, vec!["Test", "Test Set", "Test Execution"]);
}

#[tokio::test]
async fn test_jira_issue_client_posts_issue() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue"))
        .and(header("authorization", "Basic YWxpY2U6c2VjcmV0"))
        .and(body_json(json!({
            "fields": {
                "project": {"id": 10},
                "summary": "Login suite",
                "description": "Covers SSO",
                "issuetype": {"name": "Test Set"}
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "10200",
            "key": "DEMO-200"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = XrayClient::new(base_config(&mock_server).with_basic_auth("alice", "secret"))
        .unwrap();
    let created = client
        .create_test_set(10, "Login suite", "Covers SSO")
        .await
        .unwrap();

    assert_eq!(created["key"], "DEMO-200");
}

#[tokio::test]
async fn test_jira_issue_client_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": {"project": "project is required"}
        })))
        .mount(&mock_server)
        .await;

    let client = XrayClient::new(base_config(&mock_server)).unwrap();
    let err = client.create_test(10, "t", "d").await.unwrap_err();

    assert!(matches!(err, XrayError::Unexpected { status: 400, .. }));
    assert_eq!(err.to_string(), "400: Unable to connect to JIRA during createIssue.");
}

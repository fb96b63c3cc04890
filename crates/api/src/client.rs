use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::dispatch::{Dispatcher, MultipartFile, RequestBody, RequestSpec};
use crate::error::Result;
use crate::issues::{IssueTracker, JiraIssueClient, NewIssue, XrayIssueType};
use crate::status::{self, StatusTable};
use crate::types::{Evidence, ImportSource, JunitReport, TestRunUpdate};
use crate::uri::{make_uri, JIRA_API_VERSION, JIRA_BASE_PATH};

/// Xray REST client.
///
/// Every operation issues exactly one request and maps the response through
/// its own [`StatusTable`]. The client holds no mutable state, so it can be
/// cloned and shared between concurrent tasks, and it stays usable after any
/// failed call.
#[derive(Clone)]
pub struct XrayClient {
    config: Arc<ClientConfig>,
    dispatcher: Dispatcher,
    issues: Arc<dyn IssueTracker>,
}

impl XrayClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let config = Arc::new(config);
        let dispatcher = Dispatcher::new(Arc::clone(&config))?;
        let issues = Arc::new(JiraIssueClient::new(dispatcher.clone()));

        Ok(Self {
            config,
            dispatcher,
            issues,
        })
    }

    /// Replaces the Jira collaborator used by the `create_*` operations.
    pub fn with_issue_tracker(mut self, issues: Arc<dyn IssueTracker>) -> Self {
        self.issues = issues;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn make_uri(
        &self,
        pathname: &str,
        alt_base: Option<&str>,
        alt_api_version: Option<&str>,
    ) -> String {
        make_uri(&self.config, pathname, alt_base, alt_api_version)
    }

    async fn execute(&self, table: &StatusTable, spec: RequestSpec) -> Result<Value> {
        debug!(operation = table.operation, "Executing operation");
        let response = self.dispatcher.dispatch(spec).await?;
        table.interpret(response)
    }

    /// Test runs of a test execution, as a JSON array.
    pub async fn export_test_execution_results(&self, test_exec_key: &str) -> Result<Value> {
        let uri = self.make_uri(&format!("/testruns?testExecKey={test_exec_key}"), None, None);
        self.execute(&status::EXPORT_TEST_EXECUTION_RESULTS, RequestSpec::get(uri))
            .await
    }

    /// Imports Xray JSON execution results. The document is read in full
    /// before the request is built.
    pub async fn import_results(&self, source: impl Into<ImportSource>) -> Result<Value> {
        let document = source.into().load().await?;
        let uri = self.make_uri("/import/execution", None, None);
        self.execute(
            &status::IMPORT_RESULTS,
            RequestSpec::post(uri, RequestBody::Json(document)),
        )
        .await
    }

    pub async fn import_junit_xml_results(
        &self,
        report: JunitReport,
        project_key: &str,
        test_plan_key: &str,
    ) -> Result<Value> {
        let uri = self.make_uri(
            &format!("/import/execution/junit?projectKey={project_key}&testPlanKey={test_plan_key}"),
            None,
            None,
        );
        let file = MultipartFile {
            field: "file",
            file_name: report.file_name,
            mime: "application/xml",
            bytes: report.content,
        };
        self.execute(
            &status::IMPORT_JUNIT_XML_RESULTS,
            RequestSpec::post(uri, RequestBody::Multipart(file)),
        )
        .await
    }

    pub async fn get_project_info(&self, project_key: &str) -> Result<Value> {
        let uri = self.make_uri(
            &format!("/project/{project_key}"),
            Some(JIRA_BASE_PATH),
            Some(JIRA_API_VERSION),
        );
        self.execute(&status::GET_PROJECT_INFO, RequestSpec::get(uri))
            .await
    }

    pub async fn get_issue_info(&self, issue_id_or_key: &str) -> Result<Value> {
        let uri = self.make_uri(
            &format!("/issue/{issue_id_or_key}"),
            Some(JIRA_BASE_PATH),
            Some(JIRA_API_VERSION),
        );
        self.execute(&status::GET_ISSUE_INFO, RequestSpec::get(uri))
            .await
    }

    pub async fn get_test_run(&self, test_exec_key: &str, test_key: &str) -> Result<Value> {
        let uri = self.make_uri(
            &format!("/api/testrun?testExecIssueKey={test_exec_key}&testIssueKey={test_key}"),
            None,
            None,
        );
        self.execute(&status::GET_TEST_RUN, RequestSpec::get(uri))
            .await
    }

    pub async fn save_test_run(&self, update: &TestRunUpdate) -> Result<Value> {
        let uri = self.make_uri("/import/execution", None, None);
        self.execute(
            &status::SAVE_TEST_RUN,
            RequestSpec::post(uri, RequestBody::Json(update.to_payload())),
        )
        .await
    }

    pub async fn add_evidence_to_test_run(
        &self,
        test_run_id: &str,
        evidence: &Evidence,
    ) -> Result<Value> {
        let uri = self.make_uri(&format!("/api/testrun/{test_run_id}/attachment"), None, None);
        let body = RequestBody::Json(serde_json::to_value(evidence)?);
        self.execute(&status::ADD_EVIDENCE_TO_TEST_RUN, RequestSpec::post(uri, body))
            .await
    }

    pub async fn create_issue(
        &self,
        issue_type: XrayIssueType,
        project_id: u64,
        summary: &str,
        description: &str,
    ) -> Result<Value> {
        let issue = NewIssue::new(project_id, issue_type, summary, description);
        self.issues.create_issue(&issue).await
    }

    pub async fn create_test(&self, project_id: u64, summary: &str, description: &str) -> Result<Value> {
        self.create_issue(XrayIssueType::Test, project_id, summary, description)
            .await
    }

    pub async fn create_test_plan(
        &self,
        project_id: u64,
        summary: &str,
        description: &str,
    ) -> Result<Value> {
        self.create_issue(XrayIssueType::TestPlan, project_id, summary, description)
            .await
    }

    pub async fn create_test_set(
        &self,
        project_id: u64,
        summary: &str,
        description: &str,
    ) -> Result<Value> {
        self.create_issue(XrayIssueType::TestSet, project_id, summary, description)
            .await
    }

    pub async fn create_test_execution(
        &self,
        project_id: u64,
        summary: &str,
        description: &str,
    ) -> Result<Value> {
        self.create_issue(XrayIssueType::TestExecution, project_id, summary, description)
            .await
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::dispatch::{Dispatcher, RequestBody, RequestSpec};
use crate::error::Result;
use crate::status::{parse_json_body, CREATE_ISSUE};
use crate::uri::{make_uri, JIRA_API_VERSION, JIRA_BASE_PATH};

/// Xray issue types created through Jira.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XrayIssueType {
    Test,
    TestPlan,
    TestSet,
    TestExecution,
}

impl XrayIssueType {
    pub fn name(self) -> &'static str {
        match self {
            XrayIssueType::Test => "Test",
            XrayIssueType::TestPlan => "Test Plan",
            XrayIssueType::TestSet => "Test Set",
            XrayIssueType::TestExecution => "Test Execution",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIssue {
    pub fields: IssueFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueFields {
    pub project: ProjectRef,
    pub summary: String,
    pub description: String,
    pub issuetype: IssueTypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueTypeRef {
    pub name: String,
}

impl NewIssue {
    pub fn new(
        project_id: u64,
        issue_type: XrayIssueType,
        summary: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            fields: IssueFields {
                project: ProjectRef { id: project_id },
                summary: summary.into(),
                description: description.into(),
                issuetype: IssueTypeRef {
                    name: issue_type.name().to_string(),
                },
            },
        }
    }
}

/// Creates issues on behalf of [`XrayClient`](crate::XrayClient).
///
/// Whatever an implementation returns is passed back to the caller untouched.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn create_issue(&self, issue: &NewIssue) -> Result<Value>;
}

/// Posts to Jira's `rest/api/2/issue` with the client's credentials.
#[derive(Clone)]
pub struct JiraIssueClient {
    dispatcher: Dispatcher,
}

impl JiraIssueClient {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl IssueTracker for JiraIssueClient {
    async fn create_issue(&self, issue: &NewIssue) -> Result<Value> {
        let uri = make_uri(
            self.dispatcher.config(),
            "/issue",
            Some(JIRA_BASE_PATH),
            Some(JIRA_API_VERSION),
        );
        debug!(issue_type = %issue.fields.issuetype.name, "Creating issue");

        let body = RequestBody::Json(serde_json::to_value(issue)?);
        let response = self.dispatcher.dispatch(RequestSpec::post(uri, body)).await?;

        if response.status.is_success() {
            parse_json_body(&response.body)
        } else {
            Err(CREATE_ISSUE.error_for(response.status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_issue_payload() {
        let issue = NewIssue::new(10, XrayIssueType::TestPlan, "Plan A", "desc");
        assert_eq!(
            serde_json::to_value(&issue).unwrap(),
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

    #[test]
    fn test_issue_type_names() {
        assert_eq!(XrayIssueType::Test.name(), "Test");
        assert_eq!(XrayIssueType::TestSet.name(), "Test Set");
        assert_eq!(XrayIssueType::TestExecution.name(), "Test Execution");
    }
}

//! Status code to message tables, one per operation.

use reqwest::StatusCode;
use serde_json::Value;

use crate::dispatch::RawResponse;
use crate::error::{Result, XrayError};

pub const LICENSE_INVALID: &str = "The Xray license is not valid.";
pub const CHECK_JIRA_LOG: &str = "Please check Jira log.";
pub const NO_RESULTS_PROVIDED: &str = "No execution results were provided.";
pub const IMPORT_FAILED: &str = "An internal error occurred when importing execution results.";

#[derive(Clone, Copy, Debug)]
pub struct StatusTable {
    /// Name used in the generic message for unlisted codes.
    pub operation: &'static str,
    pub entries: &'static [(u16, &'static str)],
}

pub const EXPORT_TEST_EXECUTION_RESULTS: StatusTable = StatusTable {
    operation: "exportTestExecutionResults",
    entries: &[
        (400, CHECK_JIRA_LOG),
        (401, LICENSE_INVALID),
        (500, "An internal error occurred when generating the output file."),
    ],
};

pub const IMPORT_RESULTS: StatusTable = StatusTable {
    operation: "importResults",
    entries: &[
        (400, NO_RESULTS_PROVIDED),
        (401, LICENSE_INVALID),
        (500, IMPORT_FAILED),
    ],
};

pub const IMPORT_JUNIT_XML_RESULTS: StatusTable = StatusTable {
    operation: "importJunitXmlResults",
    entries: &[
        (400, CHECK_JIRA_LOG),
        (401, LICENSE_INVALID),
        (500, IMPORT_FAILED),
    ],
};

pub const GET_PROJECT_INFO: StatusTable = StatusTable {
    operation: "getProjectInfo",
    entries: &[(404, "404: Please check if the project exists.")],
};

pub const GET_ISSUE_INFO: StatusTable = StatusTable {
    operation: "getIssueInfo",
    entries: &[(404, "404: Please check if the issue exists.")],
};

pub const GET_TEST_RUN: StatusTable = StatusTable {
    operation: "getTestRun",
    entries: &[
        (401, "401: The Xray license is not valid."),
        (500, "500: An internal error occurred getting the test run."),
    ],
};

pub const SAVE_TEST_RUN: StatusTable = StatusTable {
    operation: "saveTestRun",
    entries: &[
        (400, NO_RESULTS_PROVIDED),
        (401, LICENSE_INVALID),
        (500, IMPORT_FAILED),
    ],
};

pub const ADD_EVIDENCE_TO_TEST_RUN: StatusTable = StatusTable {
    operation: "addEvidenceToTestRun",
    entries: &[
        (401, LICENSE_INVALID),
        (500, "An internal error occurred when inserting the evidences."),
    ],
};

/// Jira's own issue endpoint; only the generic message applies.
pub const CREATE_ISSUE: StatusTable = StatusTable {
    operation: "createIssue",
    entries: &[],
};

impl StatusTable {
    pub fn message(&self, status: u16) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(code, _)| *code == status)
            .map(|(_, message)| *message)
    }

    /// Error for a non-success status. The body is never consulted.
    pub fn error_for(&self, status: u16) -> XrayError {
        match self.message(status) {
            Some(message) => XrayError::Status {
                status,
                message: message.to_string(),
            },
            None => XrayError::Unexpected {
                status,
                operation: self.operation,
            },
        }
    }

    /// 200 yields the parsed body; every other code is an error.
    pub fn interpret(&self, response: RawResponse) -> Result<Value> {
        if response.status != StatusCode::OK {
            return Err(self.error_for(response.status.as_u16()));
        }
        parse_json_body(&response.body)
    }
}

pub(crate) fn parse_json_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Err(XrayError::EmptyBody);
    }
    serde_json::from_str(body).map_err(|err| XrayError::InvalidResponse(err.to_string()))
}

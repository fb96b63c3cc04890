use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Result, XrayError};

/// Local date-time format sent to Xray (no offset).
pub const LOCAL_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Xray JSON execution results, either on disk or already in memory.
#[derive(Debug, Clone)]
pub enum ImportSource {
    Path(PathBuf),
    Document(Value),
}

impl ImportSource {
    /// Reads the whole document before any request is built.
    pub async fn load(self) -> Result<Value> {
        match self {
            ImportSource::Document(value) => Ok(value),
            ImportSource::Path(path) => {
                let raw = read_file(&path).await?;
                serde_json::from_slice(&raw)
                    .map_err(|source| XrayError::InvalidDocument { path, source })
            }
        }
    }
}

impl From<Value> for ImportSource {
    fn from(value: Value) -> Self {
        ImportSource::Document(value)
    }
}

impl From<PathBuf> for ImportSource {
    fn from(path: PathBuf) -> Self {
        ImportSource::Path(path)
    }
}

/// A JUnit XML report uploaded as the `file` form field.
#[derive(Debug, Clone)]
pub struct JunitReport {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl JunitReport {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_file(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "junit.xml".to_string());
        Ok(Self { file_name, content })
    }
}

/// Result of one test inside a test execution.
#[derive(Debug, Clone, PartialEq)]
pub struct TestRunUpdate {
    pub test_execution_key: String,
    pub test_key: String,
    pub start: NaiveDateTime,
    pub finish: NaiveDateTime,
    /// Xray status name, e.g. `PASS`, `FAIL`, `TODO`.
    pub status: String,
    pub comment: String,
}

impl TestRunUpdate {
    pub fn to_payload(&self) -> Value {
        json!({
            "testExecutionKey": self.test_execution_key,
            "tests": [{
                "testKey": self.test_key,
                "start": self.start.format(LOCAL_DATE_TIME_FORMAT).to_string(),
                "finish": self.finish.format(LOCAL_DATE_TIME_FORMAT).to_string(),
                "comment": self.comment,
                "status": self.status,
            }]
        })
    }
}

/// Attachment added to a test run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    /// Base64 encoded file content.
    pub data: String,
    pub filename: String,
    pub content_type: String,
}

impl Evidence {
    pub fn from_bytes(
        bytes: &[u8],
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            data: STANDARD.encode(bytes),
            filename: filename.into(),
            content_type: content_type.into(),
        }
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|source| XrayError::Io {
        path: path.to_path_buf(),
        source,
    })
}

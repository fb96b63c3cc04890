pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod issues;
pub mod status;
pub mod types;
pub mod uri;

pub use client::XrayClient;
pub use config::ClientConfig;
pub use error::{Result, XrayError};
pub use issues::{IssueTracker, JiraIssueClient, NewIssue, XrayIssueType};
pub use types::{Evidence, ImportSource, JunitReport, TestRunUpdate};
pub use xray_auth::{AuthScheme, BasicCredentials, OAuth1Credentials};

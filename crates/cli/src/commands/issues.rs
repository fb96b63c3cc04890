use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use xray_api::XrayIssueType;

use super::XrayContext;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum IssueKind {
    Test,
    Plan,
    Set,
    Execution,
}

impl From<IssueKind> for XrayIssueType {
    fn from(kind: IssueKind) -> Self {
        match kind {
            IssueKind::Test => XrayIssueType::Test,
            IssueKind::Plan => XrayIssueType::TestPlan,
            IssueKind::Set => XrayIssueType::TestSet,
            IssueKind::Execution => XrayIssueType::TestExecution,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Kind of Xray issue
    #[arg(value_enum)]
    pub kind: IssueKind,
    /// Numeric id of the Jira project
    #[arg(long)]
    pub project_id: u64,
    /// Issue summary
    #[arg(long)]
    pub summary: String,
    /// Issue description
    #[arg(long, default_value = "")]
    pub description: String,
}

pub async fn project(ctx: &XrayContext<'_>, key: &str) -> Result<()> {
    let project = ctx
        .client
        .get_project_info(key)
        .await
        .with_context(|| format!("Failed to fetch project {key}"))?;
    ctx.renderer.render(&project)
}

pub async fn issue(ctx: &XrayContext<'_>, key: &str) -> Result<()> {
    let issue = ctx
        .client
        .get_issue_info(key)
        .await
        .with_context(|| format!("Failed to fetch issue {key}"))?;
    ctx.renderer.render(&issue)
}

pub async fn create(ctx: &XrayContext<'_>, args: CreateArgs) -> Result<()> {
    let issue_type = XrayIssueType::from(args.kind);
    let created = ctx
        .client
        .create_issue(issue_type, args.project_id, &args.summary, &args.description)
        .await
        .with_context(|| format!("Failed to create {}", issue_type.name()))?;

    tracing::info!(issue_type = issue_type.name(), "Issue created");
    ctx.renderer.render(&created)
}

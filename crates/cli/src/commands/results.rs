use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use xray_api::{ImportSource, JunitReport};

use super::XrayContext;

#[derive(Subcommand, Debug, Clone)]
pub enum ImportCommand {
    /// Import results in Xray JSON format
    Json {
        /// Path to the results document
        file: PathBuf,
    },
    /// Import a JUnit XML report
    Junit {
        /// Path to the XML report
        file: PathBuf,
        /// Project where the test execution and missing tests are created
        #[arg(long)]
        project: String,
        /// Test Plan the imported tests are added to
        #[arg(long)]
        test_plan: String,
    },
}

pub async fn export(ctx: &XrayContext<'_>, test_exec_key: &str) -> Result<()> {
    let runs = ctx
        .client
        .export_test_execution_results(test_exec_key)
        .await
        .with_context(|| format!("Failed to export results of {test_exec_key}"))?;

    if runs.as_array().is_some_and(|runs| runs.is_empty()) {
        tracing::info!(test_exec_key, "Test execution has no test runs");
    }

    ctx.renderer.render(&runs)
}

pub async fn import(ctx: &XrayContext<'_>, command: ImportCommand) -> Result<()> {
    let summary = match command {
        ImportCommand::Json { file } => ctx
            .client
            .import_results(ImportSource::Path(file.clone()))
            .await
            .with_context(|| format!("Failed to import {}", file.display()))?,
        ImportCommand::Junit {
            file,
            project,
            test_plan,
        } => {
            let report = JunitReport::from_path(&file).await?;
            ctx.client
                .import_junit_xml_results(report, &project, &test_plan)
                .await
                .with_context(|| format!("Failed to import {}", file.display()))?
        }
    };

    ctx.renderer.render(&summary)
}

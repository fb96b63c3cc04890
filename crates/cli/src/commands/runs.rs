use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use clap::Subcommand;
use xray_api::{Evidence, TestRunUpdate};

use super::XrayContext;

#[derive(Subcommand, Debug, Clone)]
pub enum TestRunCommand {
    /// Show the run of a test inside a test execution
    Get {
        /// Test execution key
        test_exec_key: String,
        /// Test key
        test_key: String,
    },
    /// Record the result of a test inside a test execution
    Save {
        /// Test execution key
        test_exec_key: String,
        /// Test key
        test_key: String,
        /// Local start time, e.g. 2024-05-01T10:00:00
        #[arg(long, value_parser = parse_local_date_time)]
        start: NaiveDateTime,
        /// Local finish time, e.g. 2024-05-01T10:05:00
        #[arg(long, value_parser = parse_local_date_time)]
        finish: NaiveDateTime,
        /// Status name (PASS, FAIL, TODO, EXECUTING, ...)
        #[arg(long)]
        status: String,
        /// Free text comment
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Attach a file to a test run
    Evidence {
        /// Test run id
        test_run_id: String,
        /// File to attach
        file: PathBuf,
        /// Content type (guessed from the extension when omitted)
        #[arg(long)]
        content_type: Option<String>,
    },
}

pub async fn execute(ctx: &XrayContext<'_>, command: TestRunCommand) -> Result<()> {
    let result = match command {
        TestRunCommand::Get {
            test_exec_key,
            test_key,
        } => ctx
            .client
            .get_test_run(&test_exec_key, &test_key)
            .await
            .with_context(|| format!("Failed to fetch run of {test_key} in {test_exec_key}"))?,
        TestRunCommand::Save {
            test_exec_key,
            test_key,
            start,
            finish,
            status,
            comment,
        } => {
            if finish < start {
                return Err(anyhow!("--finish must not be earlier than --start"));
            }
            let update = TestRunUpdate {
                test_execution_key: test_exec_key,
                test_key,
                start,
                finish,
                status,
                comment,
            };
            ctx.client
                .save_test_run(&update)
                .await
                .with_context(|| format!("Failed to save run of {}", update.test_key))?
        }
        TestRunCommand::Evidence {
            test_run_id,
            file,
            content_type,
        } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Unable to read {}", file.display()))?;
            let filename = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| anyhow!("{} has no file name", file.display()))?;
            let content_type = content_type.unwrap_or_else(|| guess_content_type(&file).to_string());

            let evidence = Evidence::from_bytes(&bytes, filename, content_type);
            ctx.client
                .add_evidence_to_test_run(&test_run_id, &evidence)
                .await
                .with_context(|| format!("Failed to attach evidence to test run {test_run_id}"))?
        }
    };

    ctx.renderer.render(&result)
}

fn parse_local_date_time(raw: &str) -> Result<NaiveDateTime, String> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| format!("expected a local date-time like 2024-05-01T10:00:00, got '{raw}'"))
}

fn guess_content_type(path: &Path) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_local_date_time() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(parse_local_date_time("2024-05-01T10:00:00").unwrap(), expected);
        assert_eq!(parse_local_date_time("2024-05-01 10:00:00").unwrap(), expected);
        assert_eq!(parse_local_date_time("2024-05-01T10:00").unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_offsets() {
        assert!(parse_local_date_time("2024-05-01T10:00:00+02:00").is_err());
        assert!(parse_local_date_time("yesterday").is_err());
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("shot.PNG")), "image/png");
        assert_eq!(guess_content_type(Path::new("notes.txt")), "text/plain");
        assert_eq!(guess_content_type(Path::new("blob")), "application/octet-stream");
    }

    #[test]
    fn test_guess_content_type_common_evidence() {
        assert_eq!(guess_content_type(Path::new("shot.svg")), "image/svg+xml");
        assert_eq!(guess_content_type(Path::new("results.csv")), "text/csv");
        assert_eq!(guess_content_type(Path::new("clip.webm")), "video/webm");
        assert_eq!(guess_content_type(Path::new("page.webp")), "image/webp");
    }
}

use percent_encoding::percent_decode_str;
use tracing::debug;

use crate::config::ClientConfig;

/// Xray's REST root, used unless an operation targets plain Jira.
pub const DEFAULT_BASE_PATH: &str = "rest/raven/";

/// Jira core REST root and version, for project and issue lookups.
pub const JIRA_BASE_PATH: &str = "rest/api/";
pub const JIRA_API_VERSION: &str = "2";

/// Builds `protocol://host:port/{base}{version}{pathname}` and percent-decodes it.
///
/// `alt_base` replaces [`DEFAULT_BASE_PATH`] and `alt_api_version` replaces the
/// configured version. A configured base segment is always prefixed. The
/// pathname is not validated.
pub fn make_uri(
    config: &ClientConfig,
    pathname: &str,
    alt_base: Option<&str>,
    alt_api_version: Option<&str>,
) -> String {
    let mut base_path = alt_base.unwrap_or(DEFAULT_BASE_PATH).to_string();
    if let Some(base) = config.base().filter(|b| !b.is_empty()) {
        base_path = format!("{base}/{base_path}");
    }

    let api_version = alt_api_version.unwrap_or(config.api_version());
    let protocol = config.protocol().trim_end_matches(':');
    let authority = match config.port() {
        Some(port) => format!("{}:{}", config.host(), port),
        None => config.host().to_string(),
    };

    let uri = format!("{protocol}://{authority}/{base_path}{api_version}{pathname}");
    let decoded = percent_decode_str(&uri).decode_utf8_lossy().into_owned();

    debug!(uri = %decoded, "Built request URI");
    decoded
}

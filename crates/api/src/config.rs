use std::time::Duration;

use xray_auth::{AuthScheme, BasicCredentials, OAuth1Credentials};

pub const DEFAULT_API_VERSION: &str = "1.0";

/// Connection settings for one Xray server.
///
/// Built once with the `with_*` methods and then handed to
/// [`XrayClient::new`](crate::XrayClient::new), which keeps it behind an
/// `Arc`. Nothing mutates it afterwards.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    protocol: String,
    host: String,
    port: Option<u16>,
    basic: Option<BasicCredentials>,
    oauth: Option<OAuth1Credentials>,
    api_version: String,
    base: Option<String>,
    strict_ssl: bool,
    verbose: bool,
    timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(protocol: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            host: host.into(),
            port: None,
            basic: None,
            oauth: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            base: None,
            strict_ssl: true,
            verbose: false,
            timeout: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.basic = Some(BasicCredentials::new(username, password));
        self
    }

    pub fn with_oauth(mut self, oauth: OAuth1Credentials) -> Self {
        self.oauth = Some(oauth);
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Context path placed in front of every REST path (`jira` for a server
    /// reachable at `https://host/jira`).
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_strict_ssl(mut self, strict_ssl: bool) -> Self {
        self.strict_ssl = strict_ssl;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Passed to the HTTP transport unchanged.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn strict_ssl(&self) -> bool {
        self.strict_ssl
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn basic_credentials(&self) -> Option<&BasicCredentials> {
        self.basic.as_ref()
    }

    /// OAuth1 first, then basic auth, then anonymous.
    pub fn auth_scheme(&self) -> AuthScheme {
        AuthScheme::select(self.oauth.as_ref(), self.basic.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("https", "jira.example.com");
        assert_eq!(config.api_version(), "1.0");
        assert!(config.strict_ssl());
        assert!(!config.verbose());
        assert!(config.port().is_none());
        assert!(config.base().is_none());
        assert_eq!(config.auth_scheme(), AuthScheme::Anonymous);
    }

    #[test]
    fn test_auth_scheme_prefers_oauth() {
        let config = ClientConfig::new("https", "jira.example.com")
            .with_basic_auth("alice", "secret")
            .with_oauth(OAuth1Credentials {
                consumer_key: "ck".to_string(),
                consumer_secret: "cs".to_string(),
                access_token: None,
                access_token_secret: None,
            });
        assert_eq!(config.auth_scheme().name(), "oauth1");
    }

    #[test]
    fn test_auth_scheme_basic() {
        let config = ClientConfig::new("https", "jira.example.com").with_basic_auth("alice", "secret");
        assert_eq!(
            config.auth_scheme(),
            AuthScheme::Basic(BasicCredentials::new("alice", "secret"))
        );
    }
}

pub mod oauth;
pub mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use oauth::OAuth1Credentials;
pub use store::{secret_key, SecretKind, SecretStore};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("OAuth1 signing key was rejected: {0}")]
    InvalidSigningKey(String),
}

/// Username/password pair attached as HTTP basic auth.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

/// The authentication mechanism attached to an outbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthScheme {
    OAuth1(OAuth1Credentials),
    Basic(BasicCredentials),
    Anonymous,
}

impl AuthScheme {
    /// Picks the scheme for a request.
    ///
    /// Precedence is OAuth1, then basic auth, then anonymous. OAuth1 wins
    /// whenever both consumer key and consumer secret are present, even if a
    /// complete username/password pair is configured as well.
    pub fn select(oauth: Option<&OAuth1Credentials>, basic: Option<&BasicCredentials>) -> Self {
        if let Some(oauth) = oauth.filter(|o| o.is_complete()) {
            return AuthScheme::OAuth1(oauth.clone());
        }

        if let Some(basic) = basic.filter(|b| b.is_complete()) {
            return AuthScheme::Basic(basic.clone());
        }

        AuthScheme::Anonymous
    }

    pub fn name(&self) -> &'static str {
        match self {
            AuthScheme::OAuth1(_) => "oauth1",
            AuthScheme::Basic(_) => "basic",
            AuthScheme::Anonymous => "anonymous",
        }
    }
}

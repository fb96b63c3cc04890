//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! Jira's application links accept OAuth1 signed requests. Only query string
//! parameters take part in the signature: Xray requests carry JSON or
//! multipart bodies, which RFC 5849 excludes from the base string.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use url::Url;

use crate::AuthError;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay as-is, everything else is encoded.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth1Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_secret: Option<String>,
}

impl OAuth1Credentials {
    /// Both consumer key and secret are required before OAuth1 is used.
    pub fn is_complete(&self) -> bool {
        !self.consumer_key.is_empty() && !self.consumer_secret.is_empty()
    }

    /// Builds the `Authorization` header value for a request with a fresh
    /// nonce and the current timestamp.
    pub fn authorization_header(&self, method: &str, url: &Url) -> Result<String, AuthError> {
        let nonce = generate_nonce();
        let timestamp = Utc::now().timestamp().to_string();
        self.sign(method, url, &nonce, &timestamp)
    }

    /// Deterministic variant of [`authorization_header`](Self::authorization_header).
    pub fn sign(
        &self,
        method: &str,
        url: &Url,
        nonce: &str,
        timestamp: &str,
    ) -> Result<String, AuthError> {
        let mut params: Vec<(&str, String)> = vec![
            ("oauth_consumer_key", self.consumer_key.clone()),
            ("oauth_nonce", nonce.to_string()),
            ("oauth_signature_method", SIGNATURE_METHOD.to_string()),
            ("oauth_timestamp", timestamp.to_string()),
            ("oauth_version", OAUTH_VERSION.to_string()),
        ];

        if let Some(token) = self.access_token.as_deref().filter(|t| !t.is_empty()) {
            params.push(("oauth_token", token.to_string()));
        }

        let base = signature_base_string(method, url, &params);
        let signing_key = format!(
            "{}&{}",
            encode(&self.consumer_secret),
            encode(self.access_token_secret.as_deref().unwrap_or_default())
        );

        let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
            .map_err(|err| AuthError::InvalidSigningKey(err.to_string()))?;
        mac.update(base.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        params.push(("oauth_signature", signature));

        let header = params
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", key, encode(value)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {header}"))
    }
}

/// RFC 5849 §3.4.1 signature base string.
pub fn signature_base_string(method: &str, url: &Url, oauth_params: &[(&str, String)]) -> String {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| (encode(&key), encode(&value)))
        .collect();
    params.extend(
        oauth_params
            .iter()
            .map(|(key, value)| (encode(key), encode(value))),
    );
    params.sort();

    let normalized = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(&base_url(url)),
        encode(&normalized)
    )
}

fn base_url(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    match url.port() {
        Some(port) => format!("{}://{}:{}{}", url.scheme(), host, port, url.path()),
        None => format!("{}://{}{}", url.scheme(), host, url.path()),
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;
use xray_auth::AuthScheme;

use crate::config::ClientConfig;
use crate::error::{Result, XrayError};

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartFile),
}

/// A single file sent as one multipart form field.
#[derive(Debug, Clone)]
pub struct MultipartFile {
    pub field: &'static str,
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl MultipartFile {
    fn into_form(self) -> Result<Form> {
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(self.mime)?;
        Ok(Form::new().part(self.field, part))
    }
}

/// One outbound call.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub uri: String,
    pub body: RequestBody,
}

impl RequestSpec {
    pub fn get(uri: String) -> Self {
        Self {
            method: Method::GET,
            uri,
            body: RequestBody::Empty,
        }
    }

    pub fn post(uri: String, body: RequestBody) -> Self {
        Self {
            method: Method::POST,
            uri,
            body,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Attaches credentials and performs exactly one HTTP request.
#[derive(Clone)]
pub struct Dispatcher {
    http: Client,
    config: Arc<ClientConfig>,
}

impl Dispatcher {
    pub fn new(config: Arc<ClientConfig>) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(format!("xray-cli/{}", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!config.strict_ssl());

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(XrayError::Transport)?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn dispatch(&self, spec: RequestSpec) -> Result<RawResponse> {
        let url = Url::parse(&spec.uri)?;
        let scheme = self.config.auth_scheme();

        if self.config.verbose() {
            info!(method = %spec.method, url = %url, auth = scheme.name(), "Sending request");
        } else {
            debug!(method = %spec.method, url = %url, auth = scheme.name(), "Sending request");
        }

        let request = self.http.request(spec.method.clone(), url.clone());
        let request = apply_auth(request, &scheme, &spec.method, &url)?;
        let request = match spec.body {
            RequestBody::Empty => request,
            RequestBody::Json(body) => request.json(&body),
            RequestBody::Multipart(file) => request.multipart(file.into_form()?),
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(status = status.as_u16(), bytes = body.len(), "Received response");

        Ok(RawResponse { status, body })
    }
}

fn apply_auth(
    request: RequestBuilder,
    scheme: &AuthScheme,
    method: &Method,
    url: &Url,
) -> Result<RequestBuilder> {
    Ok(match scheme {
        AuthScheme::OAuth1(credentials) => {
            let header = credentials.authorization_header(method.as_str(), url)?;
            request.header(AUTHORIZATION, header)
        }
        AuthScheme::Basic(basic) => request.basic_auth(&basic.username, Some(&basic.password)),
        AuthScheme::Anonymous => request,
    })
}

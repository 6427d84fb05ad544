//! Blocking HTTP transport for the placement API.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use placement_core::{Error, ErrorKind, PlacementClient, Result};

use crate::options::{ConnectionOptions, parse_api_version};

/// Longest response body excerpt kept in an error message.
const BODY_EXCERPT_CHARS: usize = 200;

/// Placement client talking to a real endpoint.
pub struct HttpClient {
    http: Client,
    endpoint: String,
    token: Option<String>,
    api_version: String,
}

impl HttpClient {
    /// Create a client from connection options.
    ///
    /// Fails with `ConfigInvalid` when the endpoint is missing or the
    /// microversion is unsupported.
    pub fn new(options: &ConnectionOptions) -> Result<Self> {
        let endpoint = options
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
            .ok_or_else(|| {
                Error::config_invalid(concat!(
                    "no placement endpoint, ",
                    "pass --os-placement-endpoint or set OS_PLACEMENT_ENDPOINT",
                ))
                .with_operation("http::new")
            })?;
        parse_api_version(&options.api_version)?;

        let http = Client::builder()
            .timeout(options.timeout())
            .build()
            .map_err(|err| {
                Error::config_invalid(format!("failed to create HTTP client: {err}"))
                    .with_operation("http::new")
                    .set_source(err)
            })?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: options.token.clone(),
            api_version: options.api_version.trim().to_string(),
        })
    }

    /// Full URL of an API `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }
}

impl PlacementClient for HttpClient {
    fn get(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        debug!(url = %url, "GET");

        let mut request = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .header("OpenStack-API-Version", format!("placement {}", self.api_version));
        if let Some(token) = &self.token {
            request = request.header("X-Auth-Token", token);
        }

        let response = request.send().map_err(|err| request_error(path, err))?;
        let status = response.status();
        let body = response.text().map_err(|err| request_error(path, err))?;
        if !status.is_success() {
            return Err(status_error(path, status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|err| Error::from(err).with_context("path", path))
    }
}

fn request_error(path: &str, err: reqwest::Error) -> Error {
    let kind = if err.is_timeout() {
        ErrorKind::Timeout
    } else if err.is_connect() {
        ErrorKind::ConnectionFailed
    } else {
        ErrorKind::TransportFailed
    };
    Error::new(kind, format!("GET {path} failed: {err}"))
        .with_operation("http::get")
        .with_context("path", path)
        .set_source(err)
}

fn status_error(path: &str, status: StatusCode, body: &str) -> Error {
    let excerpt: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
    let err =
        Error::transport_failed(path, format!("{status}: {excerpt}")).with_operation("http::get");
    if status.is_server_error() {
        err.temporary()
    } else {
        err
    }
}

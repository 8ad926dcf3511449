use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::error::ApiError;
use super::ApiRequest;

/// `{"error": <kind>, "msg": <message>}` as rendered by the daemon
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    msg: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
}

impl ApiClient {
    /// `auth` is a `<handle>:<token>` pair sent as a bearer credential on
    /// every request.
    pub fn new(remote: &Url, auth: Option<&str>) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        if let Some(auth) = auth {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", auth))
                .map_err(|_| ApiError::InvalidCredentials)?;
            value.set_sensitive(true);
            default_headers.insert(AUTHORIZATION, value);
        }
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
        })
    }

    pub async fn call<T: ApiRequest>(&mut self, request: T) -> Result<T::Response, ApiError> {
        let request_builder = request.build_request(&self.remote, &self.client)?;
        let response = request_builder.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T::Response>().await?);
        }

        let text = response.text().await?;
        Err(match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => ApiError::Service {
                status,
                kind: body.error,
                msg: body.msg,
            },
            Err(_) => ApiError::HttpStatus(status, text),
        })
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    /// Get the underlying HTTP client for custom requests
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}

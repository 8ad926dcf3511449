#[allow(clippy::module_inception)]
mod client;
mod error;

pub use client::ApiClient;
pub use error::ApiError;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError>;
}

/// `base_url` joined with an API `path`, then `segments` appended
/// percent-encoded.
pub fn api_url(base_url: &Url, path: &str, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base_url.join(path)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_encodes_segments() {
        let base = Url::parse("http://localhost:5001").unwrap();
        let url = api_url(&base, "/api/v0/collection", &["my notes", "a/b"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5001/api/v0/collection/my%20notes/a%2Fb"
        );
    }
}

//! HTTP retrieval of trip snapshots.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use reqwest::Url;

/// True when `source` is an absolute `http` or `https` URL rather than a
/// local path.
pub fn is_remote(source: &str) -> bool {
    Url::parse(source).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Issues a GET for `url` through `client` and returns the body.
///
/// # Errors
///
/// Fails on an invalid URL, a transport error, or a non-success status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse().with_context(|| format!("Invalid URL '{url}'"))?,
    );

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote_requires_http_scheme() {
        assert!(is_remote("https://data.cityofchicago.org/resource/wrvz-psew.json"));
        assert!(is_remote("http://localhost:8080/trips.json"));
        assert!(!is_remote("http_dump.json"));
        assert!(!is_remote("https_trips/2023.json"));
        assert!(!is_remote("tests/fixtures/sample_trips.json"));
        assert!(!is_remote("file:///tmp/trips.json"));
        assert!(!is_remote("C:/data/trips.json"));
    }

    #[tokio::test]
    async fn test_fetch_bytes_rejects_invalid_url() {
        let client = BasicClient::new();
        let err = fetch_bytes(&client, "not a url").await.unwrap_err();
        assert!(err.to_string().contains("Invalid URL"));
    }
}

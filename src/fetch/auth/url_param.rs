use crate::fetch::client::HttpClient;
use async_trait::async_trait;

/// An [`HttpClient`] wrapper that appends a query parameter to every request.
///
/// Used for API keys passed in the URL and for SoQL paging parameters such
/// as `$limit`.
pub struct UrlParam<C> {
    pub inner: C,
    pub param_name: String,
    pub value: String,
}

impl<C> UrlParam<C> {
    /// Caps the number of rows a Socrata resource returns.
    pub fn row_limit(inner: C, limit: u32) -> Self {
        Self {
            inner,
            param_name: "$limit".to_string(),
            value: limit.to_string(),
        }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for UrlParam<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.url_mut()
            .query_pairs_mut()
            .append_pair(&self.param_name, &self.value);
        self.inner.execute(req).await
    }
}

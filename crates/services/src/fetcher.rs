use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, ETAG};

use vocab_core::Clock;

use crate::error::FetchError;

/// One resource as it came off the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResource {
    pub path: String,
    pub body: Vec<u8>,
    pub etag: Option<String>,
    pub content_type: Option<String>,
}

impl FetchedResource {
    /// Interprets the body as UTF-8 text, replacing invalid sequences.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Network seam for everything the application downloads.
///
/// Paths are root-relative (`/vocab.csv`); implementations resolve them
/// against the deployment's base.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetch a resource through the normal request path.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on network failure or a non-success status.
    async fn fetch(&self, path: &str) -> Result<FetchedResource, FetchError>;

    /// Fetch a resource bypassing any intermediate HTTP cache.
    ///
    /// Used by the explicit update check so the entity tag reflects what the
    /// origin is actually serving right now.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on network failure or a non-success status.
    async fn fetch_no_store(&self, path: &str) -> Result<FetchedResource, FetchError>;
}

/// `reqwest`-backed fetcher resolving paths against one base URL.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    clock: Clock,
}

impl HttpFetcher {
    #[must_use]
    pub fn new(base_url: impl Into<String>, clock: Clock) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            clock,
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn get(&self, path: &str, url: String, no_store: bool) -> Result<FetchedResource, FetchError> {
        let mut request = self.client.get(url);
        if no_store {
            request = request.header(CACHE_CONTROL, "no-store");
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus {
                path: path.to_owned(),
                status: response.status(),
            });
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?.to_vec();

        Ok(FetchedResource {
            path: path.to_owned(),
            body,
            etag,
            content_type,
        })
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchedResource, FetchError> {
        self.get(path, self.url_for(path), false).await
    }

    async fn fetch_no_store(&self, path: &str) -> Result<FetchedResource, FetchError> {
        // Cache-busting query keeps proxies that ignore Cache-Control honest.
        let url = format!(
            "{}?t={}",
            self.url_for(path),
            self.clock.now().timestamp_millis()
        );
        self.get(path, url, true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::time::fixed_clock;

    #[test]
    fn url_join_handles_slashes() {
        let fetcher = HttpFetcher::new("https://example.test/app/", fixed_clock());
        assert_eq!(
            fetcher.url_for("/vocab.csv"),
            "https://example.test/app/vocab.csv"
        );
        assert_eq!(
            fetcher.url_for("images/icon-192.png"),
            "https://example.test/app/images/icon-192.png"
        );
    }

    #[test]
    fn body_text_is_lossy_utf8() {
        let fetched = FetchedResource {
            path: "/vocab.csv".into(),
            body: vec![0xE7, 0x8A, 0xAC],
            etag: None,
            content_type: None,
        };
        assert_eq!(fetched.body_text(), "犬");
    }
}

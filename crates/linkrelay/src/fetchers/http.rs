//! HTTP fetcher
//!
//! Downloads a resource with a single GET, optionally through a proxy.
//! Redirects are followed; the body is streamed and measured so an
//! oversized response is abandoned as soon as it crosses the limit.

use crate::config::FetchOptions;
use crate::error::FetchError;
use crate::fetchers::Fetcher;
use crate::types::{FetchedFile, Route};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};
use url::Url;

/// Longest body excerpt kept from an error response
const ERROR_BODY_EXCERPT: usize = 200;

/// HTTP fetcher backed by reqwest
pub struct HttpFetcher;

impl HttpFetcher {
    /// Create a new HTTP fetcher
    pub fn new() -> Self {
        Self
    }

    fn client(route: &Route, options: &FetchOptions) -> Result<reqwest::Client, FetchError> {
        let builder = reqwest::Client::builder()
            .default_headers(options.headers.clone())
            .timeout(options.timeout);

        let builder = match route {
            // Routing is explicit; ignore HTTP_PROXY and friends
            Route::Direct => builder.no_proxy(),
            Route::Proxy(proxy) => builder.proxy(
                reqwest::Proxy::all(proxy.as_str()).map_err(FetchError::ClientBuildError)?,
            ),
        };

        builder.build().map_err(FetchError::ClientBuildError)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(
        &self,
        url: &Url,
        route: &Route,
        options: &FetchOptions,
    ) -> Result<FetchedFile, FetchError> {
        let client = Self::client(route, options)?;

        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        let final_url = response.url().to_string();
        debug!(url = %url, final_url = %final_url, status = status.as_u16(), %route, "Response received");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                code: status.as_u16(),
                body: excerpt(&text),
            });
        }

        let declared = response.content_length();
        if let Some(length) = declared {
            if length > options.max_bytes {
                return Err(FetchError::TooLarge {
                    limit: options.max_bytes,
                    declared,
                });
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = read_body_capped(response, options.max_bytes, declared).await?;

        Ok(FetchedFile {
            url: url.to_string(),
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        })
    }
}

/// Read the full body, giving up once it grows past `limit`
async fn read_body_capped(
    response: reqwest::Response,
    limit: u64,
    declared: Option<u64>,
) -> Result<Bytes, FetchError> {
    let capacity = declared.unwrap_or(0).min(limit) as usize;
    let mut body = BytesMut::with_capacity(capacity);
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::from_reqwest)?;
        if (body.len() + chunk.len()) as u64 > limit {
            warn!(limit, received = body.len() + chunk.len(), "Body exceeds size limit, aborting");
            return Err(FetchError::TooLarge { limit, declared });
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body.freeze())
}

/// First characters of an error body, on a char boundary
fn excerpt(text: &str) -> String {
    match text.char_indices().nth(ERROR_BODY_EXCERPT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

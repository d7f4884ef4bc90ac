//! Fetcher system for downloading the target resource
//!
//! Design: a fetcher performs exactly one attempt over one route. Trying
//! several routes in order is the relay's job, see
//! [`Relay`](crate::Relay).

mod http;

pub use http::HttpFetcher;

use crate::config::FetchOptions;
use crate::error::FetchError;
use crate::types::{FetchedFile, Route};
use async_trait::async_trait;
use url::Url;

/// Trait for resource fetchers
///
/// Implementations must distinguish transport failures from non-success
/// status codes so the status can be reported verbatim.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Unique identifier for this fetcher (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Fetch the whole body of `url` over `route`
    ///
    /// Returns the body only for a 2xx response whose size fits within
    /// `options.max_bytes`.
    async fn fetch(
        &self,
        url: &Url,
        route: &Route,
        options: &FetchOptions,
    ) -> Result<FetchedFile, FetchError>;
}

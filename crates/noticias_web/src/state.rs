use std::sync::Arc;

use noticias_sources::Resolver;

/// Shared application state. The API resolver serves the public listing;
/// the sitemap resolver is the store-backed chain and is absent when the
/// store credentials are not configured, in which case the sitemap
/// handler proxies the previously-built static file from the origin.
pub struct AppState {
    pub site_url: String,
    pub api_resolver: Arc<Resolver>,
    pub sitemap_resolver: Option<Arc<Resolver>>,
    pub fallback_origin: String,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(site_url: impl Into<String>, api_resolver: Resolver) -> Self {
        let site_url = site_url.into().trim_end_matches('/').to_string();
        Self {
            fallback_origin: site_url.clone(),
            site_url,
            api_resolver: Arc::new(api_resolver),
            sitemap_resolver: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_sitemap_resolver(mut self, resolver: Resolver) -> Self {
        self.sitemap_resolver = Some(Arc::new(resolver));
        self
    }

    pub fn with_fallback_origin(mut self, origin: impl Into<String>) -> Self {
        self.fallback_origin = origin.into().trim_end_matches('/').to_string();
        self
    }
}

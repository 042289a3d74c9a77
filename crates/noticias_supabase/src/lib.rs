pub mod auth;
pub mod objects;
pub mod publisher;
pub mod rest;

pub use auth::{Session, SessionContext};
pub use publisher::{sanitize_file_name, NoticiaDraft, Publisher, StoreBackend, Upload};

/// Table holding the published articles.
pub const NOTICIAS_TABLE: &str = "noticias";
/// Bucket holding uploaded article assets.
pub const STORAGE_BUCKET: &str = "noticias-files";
/// Default folder for featured images whose key carries no path.
pub const IMAGE_FOLDER: &str = "imagens";
/// Default folder for attached PDFs whose key carries no path.
pub const DOCUMENT_FOLDER: &str = "pdfs";

/// Connection settings for the hosted backend, read from the environment.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
}

impl SupabaseConfig {
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("SUPABASE_URL").unwrap_or_default(),
            key: std::env::var("SUPABASE_SERVICE_ROLE_KEY").unwrap_or_default(),
        }
    }

    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            key: key.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.key.is_empty()
    }
}

/// Thin REST client over the hosted backend: PostgREST tables, object
/// storage and the auth endpoint all hang off the same base URL.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    config: SupabaseConfig,
    http: reqwest::Client,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Option<Self> {
        let config = SupabaseConfig::from_env();
        if config.is_configured() {
            Some(Self::new(config))
        } else {
            None
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    pub(crate) fn key(&self) -> &str {
        &self.config.key
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", self.key())
            .header("Authorization", format!("Bearer {}", self.key()))
    }

    pub fn publisher(self) -> Publisher {
        Publisher::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_env_is_not_configured() {
        let config = SupabaseConfig::new("", "");
        assert!(!config.is_configured());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = SupabaseConfig::new("https://proj.supabase.co/", "key");
        let client = SupabaseClient::new(config);
        assert_eq!(client.base_url(), "https://proj.supabase.co");
    }
}

use async_trait::async_trait;

use crate::types::Noticia;
use crate::Result;

/// A single origin of article records. Sources are read-only: a fetch
/// never mutates the underlying rows, entries or files.
#[async_trait]
pub trait NoticiaSource: Send + Sync {
    /// Human-readable source name, used in logs.
    fn name(&self) -> &str;

    /// Whether this source has the credentials/configuration it needs.
    /// Unconfigured sources are skipped by the resolver without error.
    fn is_configured(&self) -> bool {
        true
    }

    /// Fetches every record this source currently holds, normalized.
    async fn fetch_all(&self) -> Result<Vec<Noticia>>;
}

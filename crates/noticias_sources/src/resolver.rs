use tracing::{info, warn};

use noticias_core::{sort_recent_first, Error, Noticia, NoticiaSource, Result};

/// Resolves the article list from an ordered chain of source strategies.
///
/// One policy for every call site: unconfigured sources are skipped; a
/// source that errors or returns zero records falls through to the next
/// one; the final source's error surfaces to the caller and its empty
/// result is returned as-is. Call sites pick their precedence by how
/// they build the chain — the public listing uses [contentful, local],
/// store-backed pages use [supabase] alone so a store failure surfaces
/// directly.
pub struct Resolver {
    sources: Vec<Box<dyn NoticiaSource>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: Box<dyn NoticiaSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn add_source(&mut self, source: Box<dyn NoticiaSource>) {
        self.sources.push(source);
    }

    /// Runs the chain and returns the normalized list, sorted by
    /// effective date, most recent first (stable for ties).
    pub async fn resolve(&self) -> Result<Vec<Noticia>> {
        let configured: Vec<&dyn NoticiaSource> = self
            .sources
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| {
                if !s.is_configured() {
                    info!("⏭️ source {} not configured, skipping", s.name());
                }
                s.is_configured()
            })
            .collect();

        if configured.is_empty() {
            return Err(Error::Source("no configured noticia source".to_string()));
        }

        let last = configured.len() - 1;
        for (i, source) in configured.iter().enumerate() {
            match source.fetch_all().await {
                Ok(mut noticias) if !noticias.is_empty() => {
                    info!("📰 {} noticias from {}", noticias.len(), source.name());
                    sort_recent_first(&mut noticias);
                    return Ok(noticias);
                }
                Ok(noticias) => {
                    if i == last {
                        return Ok(noticias);
                    }
                    info!("source {} returned no noticias, falling back", source.name());
                }
                Err(e) => {
                    if i == last {
                        return Err(e);
                    }
                    warn!("source {} failed ({}), falling back", source.name(), e);
                }
            }
        }
        unreachable!("chain always returns from the last configured source")
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use noticias_core::{Body, Origen};

    struct Fixed {
        name: &'static str,
        noticias: Vec<Noticia>,
    }

    struct Failing;
    struct Unconfigured;

    fn noticia(id: &str, day: u32) -> Noticia {
        Noticia {
            id: id.to_string(),
            titulo: format!("Noticia {}", id),
            fecha: Some(Utc.with_ymd_and_hms(2026, 2, day, 0, 0, 0).unwrap()),
            created_at: None,
            resumen: None,
            body: Some(Body::Html("<p>texto</p>".to_string())),
            imagen: None,
            documento: None,
            origen: Origen::Local,
        }
    }

    #[async_trait]
    impl NoticiaSource for Fixed {
        fn name(&self) -> &str {
            self.name
        }
        async fn fetch_all(&self) -> Result<Vec<Noticia>> {
            Ok(self.noticias.clone())
        }
    }

    #[async_trait]
    impl NoticiaSource for Failing {
        fn name(&self) -> &str {
            "failing"
        }
        async fn fetch_all(&self) -> Result<Vec<Noticia>> {
            Err(Error::Source("transport down".to_string()))
        }
    }

    #[async_trait]
    impl NoticiaSource for Unconfigured {
        fn name(&self) -> &str {
            "unconfigured"
        }
        fn is_configured(&self) -> bool {
            false
        }
        async fn fetch_all(&self) -> Result<Vec<Noticia>> {
            panic!("must never be queried")
        }
    }

    #[tokio::test]
    async fn empty_primary_falls_back_to_next_source() {
        let resolver = Resolver::new()
            .with_source(Box::new(Fixed {
                name: "cms",
                noticias: vec![],
            }))
            .with_source(Box::new(Fixed {
                name: "local",
                noticias: vec![noticia("local-1", 10)],
            }));
        let resolved = resolver.resolve().await.unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, "local-1");
    }

    #[tokio::test]
    async fn failing_primary_falls_back_to_next_source() {
        let resolver = Resolver::new()
            .with_source(Box::new(Failing))
            .with_source(Box::new(Fixed {
                name: "local",
                noticias: vec![noticia("local-1", 10)],
            }));
        assert_eq!(resolver.resolve().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn final_source_error_surfaces() {
        let resolver = Resolver::new()
            .with_source(Box::new(Fixed {
                name: "cms",
                noticias: vec![],
            }))
            .with_source(Box::new(Failing));
        assert!(resolver.resolve().await.is_err());
    }

    #[tokio::test]
    async fn single_source_error_surfaces_directly() {
        // the store-backed configuration: one source, no fallback
        let resolver = Resolver::new().with_source(Box::new(Failing));
        assert!(resolver.resolve().await.is_err());
    }

    #[tokio::test]
    async fn unconfigured_sources_are_skipped() {
        let resolver = Resolver::new()
            .with_source(Box::new(Unconfigured))
            .with_source(Box::new(Fixed {
                name: "local",
                noticias: vec![noticia("local-1", 10)],
            }));
        assert_eq!(resolver.resolve().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn no_configured_sources_is_an_error() {
        let resolver = Resolver::new().with_source(Box::new(Unconfigured));
        assert!(resolver.resolve().await.is_err());
    }

    #[tokio::test]
    async fn resolved_list_is_sorted_recent_first() {
        let resolver = Resolver::new().with_source(Box::new(Fixed {
            name: "cms",
            noticias: vec![noticia("older", 16), noticia("newer", 17)],
        }));
        let resolved = resolver.resolve().await.unwrap();
        assert_eq!(resolved[0].id, "newer");
        assert_eq!(resolved[1].id, "older");
    }

    #[tokio::test]
    async fn empty_final_source_returns_empty_list() {
        let resolver = Resolver::new().with_source(Box::new(Fixed {
            name: "cms",
            noticias: vec![],
        }));
        assert!(resolver.resolve().await.unwrap().is_empty());
    }
}

use std::path::Path;

use chrono::{DateTime, Utc};
use quick_xml::se::to_string;
use serde::Serialize;
use tracing::info;

use noticias_core::{Error, Noticia, Result};

const SITEMAP_XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// `<urlset>` root in the standard sitemap namespace. Child element
/// order inside each `<url>` follows the struct field order: loc,
/// lastmod, changefreq, priority.
#[derive(Debug, Serialize)]
#[serde(rename = "urlset")]
struct UrlSet {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    #[serde(rename = "url")]
    urls: Vec<UrlEntry>,
}

#[derive(Debug, Clone, Serialize)]
struct UrlEntry {
    loc: String,
    lastmod: String,
    changefreq: &'static str,
    priority: &'static str,
}

/// Builds the sitemap for the site: the root, the news index, and one
/// entry per article at `{site}/noticias/{slug}`.
pub struct SitemapBuilder {
    site: String,
    urls: Vec<UrlEntry>,
}

impl SitemapBuilder {
    pub fn new(site_url: impl Into<String>) -> Self {
        let site = site_url.into().trim_end_matches('/').to_string();
        let today = lastmod_day(None);
        let urls = vec![
            UrlEntry {
                loc: format!("{}/", site),
                lastmod: today.clone(),
                changefreq: "daily",
                priority: "1.0",
            },
            UrlEntry {
                loc: format!("{}/noticias", site),
                lastmod: today,
                changefreq: "daily",
                priority: "0.8",
            },
        ];
        Self { site, urls }
    }

    pub fn add_noticia(&mut self, noticia: &Noticia) {
        self.urls.push(UrlEntry {
            loc: format!("{}/noticias/{}", self.site, noticia.slug()),
            lastmod: lastmod_day(noticia.effective_date()),
            changefreq: "monthly",
            priority: "0.6",
        });
    }

    pub fn add_noticias<'a>(&mut self, noticias: impl IntoIterator<Item = &'a Noticia>) {
        for noticia in noticias {
            self.add_noticia(noticia);
        }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Serializes the urlset with the XML declaration prepended.
    pub fn to_xml(&self) -> Result<String> {
        let set = UrlSet {
            xmlns: SITEMAP_XMLNS,
            urls: self.urls.clone(),
        };
        let body = to_string(&set).map_err(|e| Error::Sitemap(e.to_string()))?;
        Ok(format!(r#"<?xml version="1.0" encoding="UTF-8"?>{}"#, body))
    }
}

/// Builds the complete sitemap document for a resolved article list.
pub fn generate(site_url: &str, noticias: &[Noticia]) -> Result<String> {
    let mut builder = SitemapBuilder::new(site_url);
    builder.add_noticias(noticias);
    builder.to_xml()
}

/// Build-time variant: writes `sitemap.xml` next to the other static
/// assets.
pub fn write_static(site_url: &str, noticias: &[Noticia], out: &Path) -> Result<()> {
    let xml = generate(site_url, noticias)?;
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(out, xml)?;
    info!("🗺️ sitemap written to {}", out.display());
    Ok(())
}

/// Calendar-day string for `lastmod`. A missing or unparsable date is
/// substituted with the current day, never surfaced as an error.
pub fn lastmod_day(date: Option<DateTime<Utc>>) -> String {
    date.unwrap_or_else(Utc::now).format("%Y-%m-%d").to_string()
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::richtext;
use crate::slug::slugify;

/// Where a resolved record came from. Exactly one origin is authoritative
/// for a given record; origins are never merged field-by-field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origen {
    Supabase,
    Contentful,
    Local,
}

/// Article body: either pre-rendered HTML/plain text, or a rich-text
/// document tree as delivered by the headless CMS.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body {
    Rich(richtext::Document),
    Html(String),
}

impl Body {
    /// Plain-text excerpt for listings, truncated at 140 characters.
    pub fn excerpt(&self) -> String {
        match self {
            Body::Rich(doc) => doc.excerpt(),
            Body::Html(text) => richtext::truncate_excerpt(text),
        }
    }
}

/// Normalized article read-model. Rebuilt on every resolution call;
/// never cached and never written back to any origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Noticia {
    pub id: String,
    pub titulo: String,
    pub fecha: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub resumen: Option<String>,
    pub body: Option<Body>,
    /// Always an absolute URL once normalized, never a bare storage key.
    pub imagen: Option<String>,
    pub documento: Option<String>,
    pub origen: Origen,
}

impl Noticia {
    /// Date used for ordering and sitemap lastmod: publication date,
    /// falling back to the creation timestamp.
    pub fn effective_date(&self) -> Option<DateTime<Utc>> {
        self.fecha.or(self.created_at)
    }

    /// Derived URL slug. Recomputed at every call site from the same
    /// inputs, so the listing, detail lookup and sitemap always agree.
    pub fn slug(&self) -> String {
        let from_title = slugify(&self.titulo);
        if !from_title.is_empty() {
            return from_title;
        }
        let from_id = slugify(&self.id);
        if !from_id.is_empty() {
            return from_id;
        }
        self.effective_date()
            .map(|d| slugify(&d.format("%Y-%m-%d").to_string()))
            .unwrap_or_default()
    }
}

/// Stable sort, most recent effective date first. Undated records keep
/// their source order at the end of the list.
pub fn sort_recent_first(noticias: &mut [Noticia]) {
    noticias.sort_by(|a, b| match (b.effective_date(), a.effective_date()) {
        (Some(db), Some(da)) => db.cmp(&da),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

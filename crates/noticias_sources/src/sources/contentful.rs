use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use noticias_core::richtext;
use noticias_core::{Body, Error, Noticia, NoticiaSource, Origen, Result};

use crate::fields::{
    self, parse_date, BODY_KEYS, DATE_KEYS, DOCUMENT_KEYS, IMAGE_KEYS, SUMMARY_KEYS, TITLE_KEYS,
};

const CONTENT_TYPE: &str = "noticia";
const PAGE_SIZE: usize = 100;

/// Headless-CMS origin, queried over the Contentful Delivery REST API.
pub struct ContentfulSource {
    space_id: String,
    access_token: String,
    http: reqwest::Client,
}

impl ContentfulSource {
    pub fn new(space_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            access_token: access_token.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            std::env::var("CONTENTFUL_SPACE_ID").unwrap_or_default(),
            std::env::var("CONTENTFUL_ACCESS_TOKEN").unwrap_or_default(),
        )
    }

    fn entries_url(&self) -> String {
        format!(
            "https://cdn.contentful.com/spaces/{}/environments/master/entries?content_type={}&limit={}",
            self.space_id, CONTENT_TYPE, PAGE_SIZE
        )
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    items: Vec<Entry>,
    #[serde(default)]
    includes: Includes,
}

#[derive(Deserialize, Default)]
struct Includes {
    #[serde(rename = "Asset", default)]
    assets: Vec<Asset>,
}

#[derive(Deserialize)]
struct Entry {
    sys: Sys,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct Asset {
    sys: Sys,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct Sys {
    id: String,
    #[serde(rename = "createdAt", default)]
    created_at: Option<String>,
}

#[async_trait]
impl NoticiaSource for ContentfulSource {
    fn name(&self) -> &str {
        "contentful"
    }

    fn is_configured(&self) -> bool {
        !self.space_id.is_empty()
            && !self.access_token.is_empty()
            && !self.space_id.contains("YOUR_")
            && !self.access_token.contains("YOUR_")
    }

    async fn fetch_all(&self) -> Result<Vec<Noticia>> {
        let url = self.entries_url();
        debug!("getEntries {}", url);
        let res = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Error::Source(format!(
                "contentful query failed: {}",
                res.status()
            )));
        }
        let envelope: Envelope = res.json().await?;

        let asset_urls: HashMap<String, String> = envelope
            .includes
            .assets
            .iter()
            .filter_map(|a| asset_file_url(&a.fields).map(|u| (a.sys.id.clone(), u)))
            .collect();

        let noticias = envelope
            .items
            .into_iter()
            .map(|entry| map_entry(entry, &asset_urls))
            .collect();
        Ok(noticias)
    }
}

fn map_entry(entry: Entry, asset_urls: &HashMap<String, String>) -> Noticia {
    let f = &entry.fields;
    let created_at = entry.sys.created_at.as_deref().and_then(parse_date);
    Noticia {
        titulo: fields::pick_str(f, TITLE_KEYS).unwrap_or_default(),
        fecha: fields::pick_date(f, DATE_KEYS),
        created_at,
        resumen: fields::pick_str(f, SUMMARY_KEYS),
        body: fields::pick(f, BODY_KEYS).and_then(map_body),
        imagen: fields::pick(f, IMAGE_KEYS).and_then(|v| asset_url(v, asset_urls)),
        documento: fields::pick(f, DOCUMENT_KEYS).and_then(|v| asset_url(v, asset_urls)),
        id: entry.sys.id,
        origen: Origen::Contentful,
    }
}

fn map_body(value: &Value) -> Option<Body> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(Body::Html(s.clone())),
        Value::Object(obj) if obj.contains_key("nodeType") => {
            serde_json::from_value::<richtext::Document>(value.clone())
                .ok()
                .map(Body::Rich)
        }
        _ => None,
    }
}

/// An image/document field is either a plain URL string or a link to an
/// asset shipped in the response's `includes` block.
fn asset_url(value: &Value, asset_urls: &HashMap<String, String>) -> Option<String> {
    match value {
        Value::String(s) => absolutize(s),
        Value::Object(obj) => {
            let id = obj.get("sys")?.get("id")?.as_str()?;
            asset_urls.get(id).cloned()
        }
        _ => None,
    }
}

fn asset_file_url(fields: &Map<String, Value>) -> Option<String> {
    let url = fields.get("file")?.get("url")?.as_str()?;
    absolutize(url)
}

/// The CDN hands back protocol-relative URLs; anything still not absolute
/// after prefixing is dropped rather than surfaced as a bare key.
fn absolutize(url: &str) -> Option<String> {
    let url = url.trim();
    if url.starts_with("//") {
        return Some(format!("https:{}", url));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return Some(url.to_string());
    }
    None
}

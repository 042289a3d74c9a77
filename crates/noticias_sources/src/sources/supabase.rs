use async_trait::async_trait;
use serde_json::{Map, Value};

use noticias_core::{Body, Error, Noticia, NoticiaSource, Origen, Result};
use noticias_supabase::{SupabaseClient, DOCUMENT_FOLDER, IMAGE_FOLDER, NOTICIAS_TABLE, STORAGE_BUCKET};

use crate::fields::{
    self, BODY_KEYS, DATE_KEYS, DOCUMENT_KEYS, IMAGE_KEYS, SUMMARY_KEYS, TITLE_KEYS,
};

/// Relational-store origin. Used as the sole source on store-backed
/// pages and the sitemap endpoint, so its failures surface directly
/// instead of falling back to local files.
pub struct SupabaseSource {
    client: Option<SupabaseClient>,
}

impl SupabaseSource {
    pub fn new(client: SupabaseClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub fn from_env() -> Self {
        Self {
            client: SupabaseClient::from_env(),
        }
    }
}

#[async_trait]
impl NoticiaSource for SupabaseSource {
    fn name(&self) -> &str {
        "supabase"
    }

    fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn fetch_all(&self) -> Result<Vec<Noticia>> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| Error::Storage("supabase credentials not configured".to_string()))?;
        let rows = client
            .select(NOTICIAS_TABLE, "select=*&order=fecha.desc")
            .await?;
        let noticias = rows
            .iter()
            .filter_map(|row| row.as_object())
            .map(|row| map_row(row, client))
            .collect();
        Ok(noticias)
    }
}

fn map_row(row: &Map<String, Value>, client: &SupabaseClient) -> Noticia {
    let id = row
        .get("id")
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default();

    let public_url = |key: &str| Some(client.public_object_url(STORAGE_BUCKET, key));

    Noticia {
        id,
        titulo: fields::pick_str(row, TITLE_KEYS).unwrap_or_default(),
        fecha: fields::pick_date(row, DATE_KEYS),
        created_at: fields::pick_date(row, &["created_at", "createdAt"]),
        resumen: fields::pick_str(row, SUMMARY_KEYS),
        body: fields::pick_str(row, BODY_KEYS).map(Body::Html),
        imagen: fields::pick_str(row, IMAGE_KEYS)
            .and_then(|raw| fields::resolve_storage_ref(&raw, IMAGE_FOLDER, public_url)),
        documento: fields::pick_str(row, DOCUMENT_KEYS)
            .and_then(|raw| fields::resolve_storage_ref(&raw, DOCUMENT_FOLDER, public_url)),
        origen: Origen::Supabase,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noticias_supabase::SupabaseConfig;
    use serde_json::json;

    fn client() -> SupabaseClient {
        SupabaseClient::new(SupabaseConfig::new("https://proj.supabase.co", "key"))
    }

    #[test]
    fn bare_image_key_resolves_to_public_url() {
        let row = json!({"id": 7, "titulo": "Fallo reciente", "imagen": "photo.png"});
        let noticia = map_row(row.as_object().unwrap(), &client());
        assert_eq!(noticia.id, "7");
        assert_eq!(
            noticia.imagen.as_deref(),
            Some("https://proj.supabase.co/storage/v1/object/public/noticias-files/imagens/photo.png")
        );
    }

    #[test]
    fn absolute_image_url_is_untouched() {
        let row = json!({"id": "a", "titulo": "t", "imagen": "https://x/y.png"});
        let noticia = map_row(row.as_object().unwrap(), &client());
        assert_eq!(noticia.imagen.as_deref(), Some("https://x/y.png"));
    }

    #[test]
    fn documents_use_the_pdf_folder() {
        let row = json!({"id": "a", "titulo": "t", "documento": "fallo.pdf"});
        let noticia = map_row(row.as_object().unwrap(), &client());
        assert_eq!(
            noticia.documento.as_deref(),
            Some("https://proj.supabase.co/storage/v1/object/public/noticias-files/pdfs/fallo.pdf")
        );
    }

    #[tokio::test]
    async fn unconfigured_source_reports_it() {
        let source = SupabaseSource { client: None };
        assert!(!source.is_configured());
        assert!(source.fetch_all().await.is_err());
    }
}

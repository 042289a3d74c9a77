use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use tracing::{info, warn};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use noticias_core::Result;

use crate::{
    SupabaseClient, DOCUMENT_FOLDER, IMAGE_FOLDER, NOTICIAS_TABLE, STORAGE_BUCKET,
};

/// The store and storage calls the publisher issues. A seam so the
/// submission sequencing can be exercised without a live backend.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()>;
    fn public_object_url(&self, bucket: &str, path: &str) -> String;
    async fn select(&self, table: &str, query: &str) -> Result<Vec<Value>>;
    async fn insert(&self, table: &str, row: &Value) -> Result<Value>;
    async fn update(&self, table: &str, id: &str, row: &Value) -> Result<()>;
    async fn delete(&self, table: &str, id: &str) -> Result<()>;
}

#[async_trait]
impl StoreBackend for SupabaseClient {
    async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        SupabaseClient::upload_object(self, bucket, path, bytes, content_type).await
    }

    fn public_object_url(&self, bucket: &str, path: &str) -> String {
        SupabaseClient::public_object_url(self, bucket, path)
    }

    async fn select(&self, table: &str, query: &str) -> Result<Vec<Value>> {
        SupabaseClient::select(self, table, query).await
    }

    async fn insert(&self, table: &str, row: &Value) -> Result<Value> {
        SupabaseClient::insert(self, table, row).await
    }

    async fn update(&self, table: &str, id: &str, row: &Value) -> Result<()> {
        SupabaseClient::update(self, table, id, row).await
    }

    async fn delete(&self, table: &str, id: &str) -> Result<()> {
        SupabaseClient::delete(self, table, id).await
    }
}

/// A file attached to a draft before it has a storage home.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Admin-panel submission: the record fields plus optional attachments.
#[derive(Debug, Clone, Default)]
pub struct NoticiaDraft {
    pub titulo: String,
    pub fecha: Option<DateTime<Utc>>,
    pub categoria: Option<String>,
    pub resumen: Option<String>,
    pub cuerpo: Option<String>,
    pub imagen: Option<Upload>,
    pub documento: Option<Upload>,
}

/// Writes drafts to the hosted backend. A submission is three sequential
/// calls with no transactional grouping: image upload, document upload,
/// then the row write. An upload failure aborts before the row write.
/// A row-write failure after the uploads leaves the objects in storage.
pub struct Publisher<B: StoreBackend = SupabaseClient> {
    backend: B,
}

impl Publisher {
    pub fn new(client: SupabaseClient) -> Self {
        Self { backend: client }
    }
}

impl<B: StoreBackend> Publisher<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub async fn publish(&self, draft: NoticiaDraft) -> Result<String> {
        let (imagen_url, documento_url, row) = self.prepare(&draft).await?;
        match self.backend.insert(NOTICIAS_TABLE, &row).await {
            Ok(stored) => {
                let id = stored
                    .get("id")
                    .map(|v| v.to_string().trim_matches('"').to_string())
                    .unwrap_or_default();
                info!("📰 noticia publicada: {}", draft.titulo);
                Ok(id)
            }
            Err(e) => {
                warn_orphans(imagen_url.as_deref(), documento_url.as_deref());
                Err(e)
            }
        }
    }

    pub async fn update(&self, id: &str, draft: NoticiaDraft) -> Result<()> {
        let (imagen_url, documento_url, row) = self.prepare(&draft).await?;
        match self.backend.update(NOTICIAS_TABLE, id, &row).await {
            Ok(()) => {
                info!("📝 noticia actualizada: {}", id);
                Ok(())
            }
            Err(e) => {
                warn_orphans(imagen_url.as_deref(), documento_url.as_deref());
                Err(e)
            }
        }
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        self.backend.delete(NOTICIAS_TABLE, id).await?;
        info!("🗑️ noticia eliminada: {}", id);
        Ok(())
    }

    /// Bulk maintenance: rewrites rows whose `imagen`/`pdf` columns still
    /// hold bare storage keys into public URLs. A row that fails to
    /// update is logged and skipped, the rest keep going. Returns the
    /// number of rows rewritten.
    pub async fn normalize_stored_refs(&self) -> Result<usize> {
        let rows = self
            .backend
            .select(NOTICIAS_TABLE, "select=id,imagen,pdf")
            .await?;
        let mut rewritten = 0;
        for row in &rows {
            let Some(obj) = row.as_object() else { continue };
            let id = match obj.get("id") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => continue,
            };

            let mut updates = Map::new();
            for (col, folder) in [("imagen", IMAGE_FOLDER), ("pdf", DOCUMENT_FOLDER)] {
                let Some(raw) = obj.get(col).and_then(|v| v.as_str()) else {
                    continue;
                };
                if raw.is_empty() || raw.starts_with("http") {
                    continue;
                }
                let key = if raw.contains('/') {
                    raw.to_string()
                } else {
                    format!("{}/{}", folder, raw)
                };
                let url = self.backend.public_object_url(STORAGE_BUCKET, &key);
                updates.insert(col.to_string(), Value::String(url));
            }

            if updates.is_empty() {
                continue;
            }
            match self
                .backend
                .update(NOTICIAS_TABLE, &id, &Value::Object(updates))
                .await
            {
                Ok(()) => rewritten += 1,
                Err(e) => warn!("⚠️ could not normalize noticia {}: {}", id, e),
            }
        }
        info!("🔧 {} noticias normalized", rewritten);
        Ok(rewritten)
    }

    /// Runs the upload sequence and builds the row to write. Uploads are
    /// sequential; the first failure aborts the whole submission.
    async fn prepare(
        &self,
        draft: &NoticiaDraft,
    ) -> Result<(Option<String>, Option<String>, Value)> {
        let imagen_url = match &draft.imagen {
            Some(upload) => Some(self.store(IMAGE_FOLDER, upload).await?),
            None => None,
        };
        let documento_url = match &draft.documento {
            Some(upload) => Some(self.store(DOCUMENT_FOLDER, upload).await?),
            None => None,
        };

        let row = json!({
            "titulo": draft.titulo,
            "fecha": draft.fecha.map(|d| d.to_rfc3339()),
            "categoria": draft.categoria,
            "resumen": draft.resumen,
            "cuerpo": draft.cuerpo,
            "estado": "Publicado",
            "imagen": imagen_url,
            "pdf": documento_url,
        });
        Ok((imagen_url, documento_url, row))
    }

    async fn store(&self, folder: &str, upload: &Upload) -> Result<String> {
        let path = format!(
            "{}/{}-{}",
            folder,
            Utc::now().timestamp_millis(),
            sanitize_file_name(&upload.file_name)
        );
        self.backend
            .upload_object(
                STORAGE_BUCKET,
                &path,
                upload.bytes.clone(),
                &upload.content_type,
            )
            .await?;
        Ok(self.backend.public_object_url(STORAGE_BUCKET, &path))
    }
}

/// Makes a file name safe to use as a storage key: diacritics stripped,
/// anything outside letters, digits, space, underscore and hyphen
/// dropped, whitespace runs turned into single hyphens. The extension is
/// kept as-is; an empty base falls back to `file`.
pub fn sanitize_file_name(name: &str) -> String {
    let (base, ext) = match name.rsplit_once('.') {
        Some((base, ext)) => (base, Some(ext)),
        None => (name, None),
    };

    let stripped: String = base.nfd().filter(|c| !is_combining_mark(*c)).collect();
    let kept: String = stripped
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();

    let mut safe = String::with_capacity(kept.len());
    let mut gap = false;
    for c in kept.trim().chars() {
        if c == ' ' || c == '-' {
            gap = true;
        } else {
            if gap && !safe.is_empty() {
                safe.push('-');
            }
            gap = false;
            safe.push(c);
        }
    }

    let safe = if safe.is_empty() {
        "file".to_string()
    } else {
        safe
    };
    match ext {
        Some(ext) => format!("{}.{}", safe, ext),
        None => safe,
    }
}

fn warn_orphans(imagen: Option<&str>, documento: Option<&str>) {
    for url in [imagen, documento].into_iter().flatten() {
        warn!("⚠️ row write failed after upload, orphaned object: {}", url);
    }
}

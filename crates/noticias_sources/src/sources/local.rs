use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use noticias_core::{Body, Error, Noticia, NoticiaSource, Origen, Result};

use crate::fields::{
    self, BODY_KEYS, DATE_KEYS, DOCUMENT_KEYS, IMAGE_KEYS, SUMMARY_KEYS, TITLE_KEYS,
};

/// Local-file origin: a directory of JSON documents, one per article.
/// Files are loaded eagerly and in file-name order, so the source order
/// (and therefore tie-breaking) is stable across runs.
pub struct LocalSource {
    dir: PathBuf,
}

impl LocalSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl NoticiaSource for LocalSource {
    fn name(&self) -> &str {
        "local"
    }

    async fn fetch_all(&self) -> Result<Vec<Noticia>> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.dir)
            .map_err(|e| Error::Source(format!("reading {}: {}", self.dir.display(), e)))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        debug!("loading {} local noticias from {}", paths.len(), self.dir.display());

        let mut noticias = Vec::with_capacity(paths.len());
        for path in &paths {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| Error::Source(format!("reading {}: {}", path.display(), e)))?;
            let doc: Value = serde_json::from_str(&raw)
                .map_err(|e| Error::Source(format!("parsing {}: {}", path.display(), e)))?;
            let Some(obj) = doc.as_object() else {
                return Err(Error::Source(format!(
                    "{} is not a JSON object",
                    path.display()
                )));
            };
            noticias.push(map_document(obj, path));
        }
        Ok(noticias)
    }
}

fn map_document(f: &Map<String, Value>, path: &Path) -> Noticia {
    let id = f
        .get("id")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .or_else(|| f.get("slug").and_then(|v| v.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

    Noticia {
        id,
        titulo: fields::pick_str(f, TITLE_KEYS).unwrap_or_default(),
        fecha: fields::pick_date(f, DATE_KEYS),
        created_at: fields::pick_date(f, &["createdAt", "created_at"]),
        resumen: fields::pick_str(f, SUMMARY_KEYS),
        body: fields::pick_str(f, BODY_KEYS).map(Body::Html),
        // Local documents carry no object storage to resolve against, so
        // only refs that are already absolute survive normalization.
        imagen: fields::pick_str(f, IMAGE_KEYS)
            .and_then(|raw| fields::resolve_storage_ref(&raw, "imagens", |_| None)),
        documento: fields::pick_str(f, DOCUMENT_KEYS)
            .and_then(|raw| fields::resolve_storage_ref(&raw, "pdfs", |_| None)),
        origen: Origen::Local,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_noticias(dir: &Path, docs: &[(&str, &str)]) {
        for (name, contents) in docs {
            std::fs::write(dir.join(name), contents).unwrap();
        }
    }

    #[tokio::test]
    async fn loads_and_maps_json_documents() {
        let dir = std::env::temp_dir().join("noticias_local_maps");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        write_noticias(
            &dir,
            &[
                (
                    "b-reforma.json",
                    r#"{"title": "Reforma laboral", "date": "2026-02-16",
                        "summary": "resumen", "body": "<p>texto</p>",
                        "thumbnail": "https://x/y.png"}"#,
                ),
                (
                    "a-sede.json",
                    r#"{"titulo": "Nueva sede", "fecha": "2026-02-17", "imagen": "photo.png"}"#,
                ),
            ],
        );

        let noticias = LocalSource::new(&dir).fetch_all().await.unwrap();
        assert_eq!(noticias.len(), 2);

        // file-name order: a-sede before b-reforma
        assert_eq!(noticias[0].titulo, "Nueva sede");
        assert_eq!(noticias[0].id, "a-sede");
        // bare key with nothing to resolve it against is dropped
        assert_eq!(noticias[0].imagen, None);

        assert_eq!(noticias[1].titulo, "Reforma laboral");
        assert_eq!(noticias[1].imagen.as_deref(), Some("https://x/y.png"));
        assert!(matches!(noticias[1].body, Some(Body::Html(_))));
    }

    #[tokio::test]
    async fn missing_directory_surfaces_an_error() {
        let missing = std::env::temp_dir().join("noticias_local_missing");
        let _ = std::fs::remove_dir_all(&missing);
        let err = LocalSource::new(&missing).fetch_all().await;
        assert!(err.is_err());
    }
}

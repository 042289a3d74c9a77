use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use noticias_core::{Body, Noticia};

use crate::AppState;

const SITEMAP_ERROR_BODY: &str = "<!-- sitemap error -->";

/// JSON view of a resolved record, with the derived slug and a rendered
/// body attached for the client.
#[derive(Debug, Serialize)]
pub struct NoticiaView {
    pub id: String,
    pub slug: String,
    pub titulo: String,
    pub fecha: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub resumen: Option<String>,
    pub body_html: Option<String>,
    pub imagen: Option<String>,
    pub documento: Option<String>,
}

impl From<&Noticia> for NoticiaView {
    fn from(n: &Noticia) -> Self {
        let body_html = n.body.as_ref().map(|b| match b {
            Body::Rich(doc) => doc.render_html(),
            Body::Html(html) => html.clone(),
        });
        Self {
            id: n.id.clone(),
            slug: n.slug(),
            titulo: n.titulo.clone(),
            fecha: n.fecha,
            created_at: n.created_at,
            resumen: n
                .resumen
                .clone()
                .or_else(|| n.body.as_ref().map(|b| b.excerpt())),
            body_html,
            imagen: n.imagen.clone(),
            documento: n.documento.clone(),
        }
    }
}

pub async fn list_noticias(State(state): State<Arc<AppState>>) -> Response {
    match state.api_resolver.resolve().await {
        Ok(noticias) => {
            let views: Vec<NoticiaView> = noticias.iter().map(NoticiaView::from).collect();
            Json(views).into_response()
        }
        Err(e) => {
            error!("listing resolution failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Detail lookup by slug. An unknown slug is a not-found display state,
/// not an error.
pub async fn get_noticia(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    match state.api_resolver.resolve().await {
        Ok(noticias) => match noticias.iter().find(|n| n.slug() == slug) {
            Some(noticia) => Json(NoticiaView::from(noticia)).into_response(),
            None => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "noticia no encontrada", "slug": slug })),
            )
                .into_response(),
        },
        Err(e) => {
            error!("detail resolution failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// On-demand sitemap. With a store-backed resolver configured, queries
/// it and serializes the urlset; without one, proxies the static sitemap
/// from the origin. A query failure returns a 500 placeholder body.
pub async fn sitemap(State(state): State<Arc<AppState>>) -> Response {
    let Some(resolver) = &state.sitemap_resolver else {
        return proxy_static_sitemap(&state).await;
    };

    let noticias = match resolver.resolve().await {
        Ok(noticias) => noticias,
        Err(e) => {
            error!("sitemap resolution failed: {}", e);
            return sitemap_error();
        }
    };

    match noticias_sitemap::generate(&state.site_url, &noticias) {
        Ok(xml) => {
            info!("🗺️ sitemap served with {} noticias", noticias.len());
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
                xml,
            )
                .into_response()
        }
        Err(e) => {
            error!("sitemap serialization failed: {}", e);
            sitemap_error()
        }
    }
}

async fn proxy_static_sitemap(state: &AppState) -> Response {
    let url = format!("{}/sitemap.xml", state.fallback_origin);
    match state.http.get(&url).send().await {
        Ok(res) => {
            let status =
                StatusCode::from_u16(res.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
            // reqwest still speaks http 0.2; look the header up by name
            // instead of passing axum's http 1.x HeaderName across.
            let content_type = res
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("application/xml; charset=utf-8")
                .to_string();
            match res.bytes().await {
                Ok(body) => {
                    (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
                }
                Err(e) => {
                    error!("static sitemap proxy body failed: {}", e);
                    sitemap_error()
                }
            }
        }
        Err(e) => {
            error!("static sitemap proxy failed: {}", e);
            sitemap_error()
        }
    }
}

fn sitemap_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain")],
        SITEMAP_ERROR_BODY,
    )
        .into_response()
}

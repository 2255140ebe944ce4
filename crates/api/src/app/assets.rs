//! Prebuilt static assets, served from a directory with pretty URLs.
//!
//! `/a/b` serves `a/b` when it is a file, else `a/b.html`. Otherwise, when
//! `a/b` is a directory, the client is redirected to `/a/b/` so the index is
//! only ever served (and gated) under its slash-terminated URL. Everything
//! else is left to `ServeDir`, which maps `/a/` to `a/index.html` and returns
//! 404 for missing files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, StatusCode, Uri, header, uri::PathAndQuery},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::services::ServeDir;

#[derive(Clone)]
struct AssetRoot(Arc<PathBuf>);

/// What to do with an extension-less request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrettyPath {
    /// Serve this path instead (same URL for the client).
    Rewrite(String),
    /// The path names a directory; send the client to this slash-terminated URL.
    AddSlash(String),
}

pub fn router(root: PathBuf) -> Router {
    let files = ServeDir::new(&root);
    Router::new()
        .fallback_service(files)
        .layer(axum::middleware::from_fn_with_state(
            AssetRoot(Arc::new(root)),
            pretty_urls,
        ))
}

async fn pretty_urls(State(root): State<AssetRoot>, mut req: Request, next: Next) -> Response {
    match resolve_pretty_path(&root.0, req.uri().path()).await {
        Some(PrettyPath::Rewrite(path)) => {
            if let Some(uri) = with_path(req.uri(), &path) {
                *req.uri_mut() = uri;
            }
            next.run(req).await
        }
        Some(PrettyPath::AddSlash(path)) => match location_with_query(req.uri(), &path) {
            Some(location) => {
                (StatusCode::PERMANENT_REDIRECT, [(header::LOCATION, location)]).into_response()
            }
            None => next.run(req).await,
        },
        None => next.run(req).await,
    }
}

/// Resolution for an extension-less URL, if one exists on disk.
pub async fn resolve_pretty_path(root: &Path, path: &str) -> Option<PrettyPath> {
    if path.ends_with('/') {
        return None;
    }
    let last = path.rsplit('/').next().unwrap_or_default();
    if last.contains('.') {
        return None;
    }

    let decoded = urlencoding::decode(path).ok()?;
    if decoded.split('/').any(|segment| segment == "..") {
        return None;
    }
    let relative = decoded.trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }

    let target = root.join(relative);
    if is_file(&target).await {
        return None;
    }
    if is_file(&root.join(format!("{relative}.html"))).await {
        return Some(PrettyPath::Rewrite(format!("{path}.html")));
    }
    if is_dir(&target).await {
        return Some(PrettyPath::AddSlash(format!("{path}/")));
    }
    None
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

fn with_path(uri: &Uri, path: &str) -> Option<Uri> {
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query(uri, path)).ok()?);
    Uri::from_parts(parts).ok()
}

fn location_with_query(uri: &Uri, path: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&path_and_query(uri, path)).ok()
}

fn path_and_query(uri: &Uri, path: &str) -> String {
    match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    }
}

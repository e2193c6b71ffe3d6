use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Method, Response, StatusCode},
    response::IntoResponse,
};
use mime_guess::Mime;
use percent_encoding::percent_decode_str;

use crate::cache;
use crate::constants;
use crate::embedded::{Asset, AssetTree, BundledAssets, EmbeddedTree};
use crate::error::AssetError;

/// Options for the embedded asset server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetServerOptions {
    /// Resource group (sub-directory of the embedded root) to expose
    pub folder_name: String,
}

impl Default for AssetServerOptions {
    fn default() -> Self {
        Self {
            folder_name: constants::DEFAULT_FOLDER_NAME.to_string(),
        }
    }
}

/// Serves files from one resource group of an embedded asset tree.
///
/// The folder name is not checked on construction; an unknown group makes
/// every lookup miss. Call [`AssetServer::validate`] to fail fast instead.
pub struct AssetServer {
    tree: Arc<dyn AssetTree>,
    folder: String,
}

impl AssetServer {
    /// Serve from the assets bundled into this binary
    pub fn new(options: AssetServerOptions) -> Self {
        Self::with_tree(EmbeddedTree::<BundledAssets>::new(), options)
    }

    /// Serve from any asset tree
    pub fn with_tree(tree: impl AssetTree, options: AssetServerOptions) -> Self {
        Self {
            tree: Arc::new(tree),
            folder: options.folder_name.trim_matches('/').to_string(),
        }
    }

    pub fn folder_name(&self) -> &str {
        &self.folder
    }

    /// Number of files in the configured resource group
    pub fn file_count(&self) -> usize {
        let prefix = format!("{}/", self.folder);
        self.tree
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .count()
    }

    /// Check that the configured folder selects at least one file
    pub fn validate(&self) -> Result<(), AssetError> {
        if self.folder.is_empty() || self.file_count() == 0 {
            return Err(AssetError::EmptyGroup(self.folder.clone()));
        }
        Ok(())
    }

    /// Resolve a path remainder (as left by the prefix router) to an asset.
    /// Files without a known content type count as missing.
    pub fn lookup(&self, relative: &str) -> Result<Asset, AssetError> {
        self.resolve(relative).map(|(_, _, asset)| asset)
    }

    fn resolve(&self, relative: &str) -> Result<(String, Mime, Asset), AssetError> {
        let key = sanitize_key(relative).ok_or(AssetError::NotFound)?;
        let mime = mime_guess::from_path(&key)
            .first()
            .ok_or(AssetError::NotFound)?;
        let asset = self
            .tree
            .get(&format!("{}/{}", self.folder, key))
            .ok_or(AssetError::NotFound)?;
        Ok((key, mime, asset))
    }

    /// Build the HTTP response for a delegated request
    pub fn serve(
        &self,
        method: &Method,
        request_headers: &HeaderMap,
        relative: &str,
    ) -> Response<Body> {
        let head = if *method == Method::HEAD {
            true
        } else if *method == Method::GET {
            false
        } else {
            tracing::debug!(method = %method, path = %relative, "Rejected method for embedded asset");
            return AssetError::MethodNotAllowed.into_response();
        };

        let (key, mime, asset) = match self.resolve(relative) {
            Ok(found) => found,
            Err(err) => {
                tracing::debug!(
                    folder = %self.folder,
                    path = %relative,
                    "Embedded asset not found"
                );
                return err.into_response();
            }
        };

        let last_modified = asset.last_modified.and_then(cache::http_date);

        if cache::is_not_modified(request_headers, &asset.etag, asset.last_modified) {
            tracing::debug!(path = %key, "Embedded asset not modified");
            let mut response = StatusCode::NOT_MODIFIED.into_response();
            insert_validators(response.headers_mut(), &asset.etag, last_modified.as_deref());
            return response;
        }

        let length = asset.data.len();

        let mut response = if head {
            Response::new(Body::empty())
        } else {
            Response::new(Body::from(asset.data))
        };
        *response.status_mut() = StatusCode::OK;

        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
            headers.insert(header::CONTENT_TYPE, value);
        }
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
        insert_validators(headers, &asset.etag, last_modified.as_deref());

        tracing::debug!(path = %key, mime = %mime, bytes = length, "Served embedded asset");

        response
    }
}

fn insert_validators(headers: &mut HeaderMap, etag: &str, last_modified: Option<&str>) {
    if let Ok(value) = HeaderValue::from_str(etag) {
        headers.insert(header::ETAG, value);
    }
    if let Some(value) = last_modified.and_then(|date| HeaderValue::from_str(date).ok()) {
        headers.insert(header::LAST_MODIFIED, value);
    }
}

/// Turn a raw path remainder into a tree key.
///
/// Returns `None` for anything that could escape the resource group:
/// dot segments, backslashes, NUL bytes or invalid UTF-8 after decoding.
/// Empty segments are dropped, so the group root yields `None` as well.
fn sanitize_key(relative: &str) -> Option<String> {
    let decoded = percent_decode_str(relative).decode_utf8().ok()?;

    let mut segments = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" => continue,
            "." | ".." => return None,
            s if s.contains('\\') || s.contains('\0') => return None,
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return None;
    }

    Some(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedded::MemoryTree;

    fn server(folder: &str) -> AssetServer {
        let tree = MemoryTree::new()
            .with_file("Assets/index.html", "<!DOCTYPE html><title>perf</title>")
            .with_file("Assets/app.css", "body { margin: 0; }")
            .with_file("Assets/js/app.js", "console.log('perf');")
            .with_file("Assets/with space.txt", "spaced")
            .with_file("Secret/key.txt", "hunter2");

        AssetServer::with_tree(
            tree,
            AssetServerOptions {
                folder_name: folder.to_string(),
            },
        )
    }

    #[test]
    fn default_folder_is_webroot() {
        assert_eq!(AssetServerOptions::default().folder_name, "WebRoot");
    }

    #[test]
    fn lookup_hits_files_in_group() {
        let server = server("Assets");
        let asset = server.lookup("/index.html").unwrap();
        assert_eq!(&*asset.data, b"<!DOCTYPE html><title>perf</title>");
        assert!(server.lookup("/js/app.js").is_ok());
        assert!(server.lookup("/js//app.js").is_ok());
    }

    #[test]
    fn lookup_decodes_percent_escapes() {
        let server = server("Assets");
        assert!(server.lookup("/with%20space.txt").is_ok());
    }

    #[test]
    fn lookup_rejects_traversal() {
        let server = server("Assets");
        for path in [
            "/../Secret/key.txt",
            "/%2e%2e/Secret/key.txt",
            "/js/../../Secret/key.txt",
            "/./index.html",
            "/..%5cSecret%5ckey.txt",
            "/index.html%00",
        ] {
            assert_eq!(server.lookup(path).unwrap_err(), AssetError::NotFound, "{path}");
        }
    }

    #[test]
    fn group_root_is_not_found() {
        let server = server("Assets");
        assert_eq!(server.lookup("").unwrap_err(), AssetError::NotFound);
        assert_eq!(server.lookup("/").unwrap_err(), AssetError::NotFound);
        assert_eq!(server.lookup("/js/").unwrap_err(), AssetError::NotFound);
    }

    #[test]
    fn unknown_folder_misses_everything() {
        let server = server("Nope");
        assert_eq!(server.lookup("/index.html").unwrap_err(), AssetError::NotFound);
        assert_eq!(server.file_count(), 0);
        assert_eq!(
            server.validate().unwrap_err(),
            AssetError::EmptyGroup("Nope".to_string())
        );
    }

    #[test]
    fn validate_accepts_populated_group() {
        let server = server("/Assets/");
        assert_eq!(server.folder_name(), "Assets");
        assert_eq!(server.file_count(), 4);
        assert!(server.validate().is_ok());
    }

    #[test]
    fn serve_sets_content_type_and_etag() {
        let server = server("Assets");
        let response = server.serve(&Method::GET, &HeaderMap::new(), "/app.css");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "19");
        assert!(response.headers().contains_key(header::ETAG));
    }

    #[test]
    fn unknown_content_types_are_not_served() {
        let tree = MemoryTree::new()
            .with_file("G/blob.zzzunknown", vec![1u8, 2, 3])
            .with_file("G/LICENSE", "MIT");
        let server = AssetServer::with_tree(
            tree,
            AssetServerOptions {
                folder_name: "G".to_string(),
            },
        );

        assert_eq!(server.lookup("/blob.zzzunknown").unwrap_err(), AssetError::NotFound);
        assert_eq!(server.lookup("/LICENSE").unwrap_err(), AssetError::NotFound);

        let response = server.serve(&Method::GET, &HeaderMap::new(), "/blob.zzzunknown");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn matching_etag_answers_not_modified() {
        let server = server("Assets");
        let etag = server.lookup("/app.css").unwrap().etag;

        let mut headers = HeaderMap::new();
        headers.insert(header::IF_NONE_MATCH, HeaderValue::from_str(&etag).unwrap());
        let response = server.serve(&Method::GET, &headers, "/app.css");

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(response.headers()[header::ETAG], etag.as_str());
        assert!(!response.headers().contains_key(header::CONTENT_TYPE));
    }

    #[test]
    fn serve_rejects_other_methods() {
        let server = server("Assets");
        let response = server.serve(&Method::POST, &HeaderMap::new(), "/index.html");

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, HEAD");
    }

    #[test]
    fn serve_missing_is_404() {
        let server = server("Assets");
        let response = server.serve(&Method::GET, &HeaderMap::new(), "/missing.js");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

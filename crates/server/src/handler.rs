//! Server state and router.
//!
//! All shared state (the content cache, the content source chain, and the
//! preview service with its cache) is built once at startup, owned by
//! `AppState`, and handed to every handler through axum's `State`.

use crate::api::{content::get_content, link_preview::get_link_preview};

use axum::{Router, routing::get};
use showcase_client::{FetchClient, FetchConfig, FileSource, PreviewService, SourceChain, StorageSource};
use showcase_core::{AppConfig, ContentCache, ContentSource, Error, PreviewCache};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Shared server state, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentCache>,
    pub sources: Arc<dyn ContentSource>,
    pub previews: Arc<PreviewService>,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        content: ContentCache, sources: Arc<dyn ContentSource>, previews: PreviewService, static_dir: PathBuf,
    ) -> Self {
        Self { content: Arc::new(content), sources, previews: Arc::new(previews), static_dir }
    }

    /// Build production state: storage then fallback file for content, the
    /// HTTP fetcher for previews.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let storage = StorageSource::from_config(config)?;
        let fallback = FileSource::new(&config.content_fallback_path);
        let sources: Vec<Arc<dyn ContentSource>> = vec![Arc::new(storage), Arc::new(fallback)];

        let fetcher = FetchClient::new(FetchConfig::default())?;
        let previews = PreviewService::new(Arc::new(fetcher), PreviewCache::default());

        Ok(Self::new(
            ContentCache::new(config.content_ttl()),
            Arc::new(SourceChain::new(sources)),
            previews,
            config.static_dir.clone(),
        ))
    }
}

/// Build the application router.
///
/// API routes are matched first; everything else is served from the static
/// asset directory.
pub fn create_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/api/content", get(get_content))
        .route("/api/link-preview", get(get_link_preview))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use bytes::Bytes;
    use http_body_util::BodyExt;
    use showcase_client::{FetchResponse, PageFetcher};
    use showcase_core::SourcePayload;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tower::ServiceExt;

    struct FixedSource {
        result: fn() -> Result<SourcePayload, Error>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn load(&self) -> Result<SourcePayload, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    fn fixed(result: fn() -> Result<SourcePayload, Error>) -> Arc<FixedSource> {
        Arc::new(FixedSource { result, calls: AtomicUsize::new(0) })
    }

    struct FakeFetcher {
        html: &'static str,
        failure: Option<fn() -> Error>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &url::Url) -> Result<FetchResponse, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(failure) = self.failure {
                return Err(failure());
            }
            Ok(FetchResponse {
                url: url.clone(),
                final_url: url.clone(),
                status: StatusCode::OK,
                content_type: Some("text/html".into()),
                bytes: Bytes::from_static(self.html.as_bytes()),
                truncated: false,
                fetch_ms: 0,
            })
        }
    }

    fn fetcher(html: &'static str) -> Arc<FakeFetcher> {
        Arc::new(FakeFetcher { html, failure: None, calls: AtomicUsize::new(0) })
    }

    fn failing_fetcher(failure: fn() -> Error) -> Arc<FakeFetcher> {
        Arc::new(FakeFetcher { html: "", failure: Some(failure), calls: AtomicUsize::new(0) })
    }

    fn refused() -> Error {
        Error::HttpError("network error: connection refused".into())
    }

    fn state_with(sources: Arc<dyn ContentSource>, pages: Arc<FakeFetcher>, static_dir: PathBuf) -> AppState {
        AppState::new(
            ContentCache::new(Duration::from_secs(300)),
            sources,
            PreviewService::new(pages, PreviewCache::default()),
            static_dir,
        )
    }

    fn content_state(sources: Arc<dyn ContentSource>) -> AppState {
        state_with(sources, failing_fetcher(refused), PathBuf::from("./dist"))
    }

    fn preview_state(pages: Arc<FakeFetcher>) -> AppState {
        state_with(fixed(|| Ok(SourcePayload::default())), pages, PathBuf::from("./dist"))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_content_served_with_headers() {
        let source = fixed(|| Ok(SourcePayload::new(r#"{"title":"home"}"#, "\"v1\"")));
        let app = create_router(content_state(source));

        let response = app.oneshot(get("/api/content")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json; charset=utf-8");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=300");
        assert_eq!(response.headers()[header::ETAG], "\"v1\"");
        assert_eq!(body_bytes(response).await.as_ref(), br#"{"title":"home"}"#);
    }

    #[tokio::test]
    async fn test_content_not_modified_on_fresh_hit() {
        let source = fixed(|| Ok(SourcePayload::new(r#"{"title":"home"}"#, "\"v1\"")));
        let app = create_router(content_state(source.clone()));

        let first = app.clone().oneshot(get("/api/content")).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let request = Request::builder()
            .uri("/api/content")
            .header(header::IF_NONE_MATCH, "\"v1\"")
            .body(Body::empty())
            .unwrap();
        let second = app.oneshot(request).await.unwrap();

        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
        assert!(body_bytes(second).await.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_content_not_modified_after_refresh() {
        let source = fixed(|| Ok(SourcePayload::new(r#"{"title":"home"}"#, "\"v1\"")));
        let app = create_router(content_state(source));

        let request = Request::builder()
            .uri("/api/content")
            .header(header::IF_NONE_MATCH, "\"v1\"")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_content_without_fingerprint_never_304() {
        let source = fixed(|| Ok(SourcePayload::new("[]", "")));
        let app = create_router(content_state(source));

        let request = Request::builder()
            .uri("/api/content")
            .header(header::IF_NONE_MATCH, "")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::ETAG).is_none());
    }

    #[tokio::test]
    async fn test_content_fallback_file_used_when_storage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        std::fs::write(&path, br#"{"source":"file"}"#).unwrap();

        let storage = fixed(|| Err(Error::SourceRead("bucket/content.json: status 503".into())));
        let sources: Vec<Arc<dyn ContentSource>> = vec![storage, Arc::new(FileSource::new(&path))];
        let app = create_router(content_state(Arc::new(SourceChain::new(sources))));

        let response = app.oneshot(get("/api/content")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::ETAG).is_none());
        assert_eq!(body_bytes(response).await.as_ref(), br#"{"source":"file"}"#);
    }

    #[tokio::test]
    async fn test_content_total_failure_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let storage = fixed(|| Err(Error::ConfigurationAbsent("CONTENT_BUCKET is not set".into())));
        let sources: Vec<Arc<dyn ContentSource>> =
            vec![storage, Arc::new(FileSource::new(dir.path().join("missing.json")))];
        let state = content_state(Arc::new(SourceChain::new(sources)));
        let app = create_router(state.clone());

        for _ in 0..2 {
            let response = app.clone().oneshot(get("/api/content")).await.unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body_bytes(response).await.as_ref(), b"failed to load content\n");
            assert!(state.content.get().await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_preview_missing_url() {
        let app = create_router(preview_state(fetcher("")));

        for uri in ["/api/link-preview", "/api/link-preview?url="] {
            let response = app.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_bytes(response).await.as_ref(), b"missing url\n");
        }
    }

    #[tokio::test]
    async fn test_preview_rejects_non_http_scheme() {
        let pages = fetcher("");
        let app = create_router(preview_state(pages.clone()));

        let response = app.oneshot(get("/api/link-preview?url=ftp://example.com")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_bytes(response).await.as_ref(), b"invalid url\n");
        assert_eq!(pages.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_preview_fetch_failure_is_bad_gateway() {
        let app = create_router(preview_state(failing_fetcher(refused)));

        let response = app.oneshot(get("/api/link-preview?url=https://example.com")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_bytes(response).await.as_ref(), b"failed to fetch\n");
    }

    #[tokio::test]
    async fn test_preview_body_read_failure_is_bad_gateway() {
        let pages = failing_fetcher(|| Error::BodyRead("connection reset".into()));
        let app = create_router(preview_state(pages));

        let response = app.oneshot(get("/api/link-preview?url=https://example.com")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_bytes(response).await.as_ref(), b"failed to read\n");
    }

    #[tokio::test]
    async fn test_preview_duplicate_url_uses_first_value() {
        let pages = fetcher("<title>First</title>");
        let app = create_router(preview_state(pages.clone()));

        let response = app
            .oneshot(get("/api/link-preview?url=https://a.example/&url=https://b.example/"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(pages.calls.load(Ordering::SeqCst), 1);

        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["url"], "https://a.example/");
    }

    #[tokio::test]
    async fn test_preview_cached_between_requests() {
        let pages = fetcher(r#"<title>Fallback Title</title><meta property="og:image" content="/img.png">"#);
        let app = create_router(preview_state(pages.clone()));
        let uri = "/api/link-preview?url=https%3A%2F%2Fexample.com%2Fa%2Fb";

        let first = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers()[header::CACHE_CONTROL], "public, max-age=3600");
        assert_eq!(first.headers()[header::CONTENT_TYPE], "application/json; charset=utf-8");
        let first_body = body_bytes(first).await;

        let second = app.oneshot(get(uri)).await.unwrap();
        let second_body = body_bytes(second).await;

        assert_eq!(first_body, second_body);
        assert_eq!(pages.calls.load(Ordering::SeqCst), 1);

        let json: serde_json::Value = serde_json::from_slice(&first_body).unwrap();
        assert_eq!(json["url"], "https://example.com/a/b");
        assert_eq!(json["title"], "Fallback Title");
        assert_eq!(json["image"], "https://example.com/img.png");
        assert!(json.get("description").is_none());
    }

    #[tokio::test]
    async fn test_static_fallback_serves_assets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<!doctype html><p>app</p>").unwrap();
        let source = fixed(|| Ok(SourcePayload::default()));
        let state = state_with(source, failing_fetcher(refused), dir.path().to_path_buf());
        let app = create_router(state);

        let response = app.clone().oneshot(get("/index.html")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await.as_ref(), b"<!doctype html><p>app</p>");

        let response = app.oneshot(get("/missing.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

//! End-to-end request handling through the router, with real files on disk.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use cling::config::{AppState, Config};
use cling::handler::handle_request;
use cling::http::ResponseBody;
use http_body_util::BodyExt;
use hyper::header::{self, HeaderValue};
use hyper::{Method, Request, Response, StatusCode};
use tempfile::TempDir;

struct Site {
    _tmp: TempDir,
    state: Arc<AppState>,
}

fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

/// `static/` holds the collected files, `assets/` the development sources
fn build_site(extra_config: &str) -> Site {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("static");
    let assets = tmp.path().join("assets");
    std::fs::create_dir_all(root.join("docs")).unwrap();
    std::fs::create_dir_all(&assets).unwrap();
    std::fs::write(root.join("app.js"), b"console.1;").unwrap();
    std::fs::write(root.join("app.js.gz"), b"\x1f\x8bGZIP").unwrap();
    std::fs::write(root.join("docs/index.html"), b"<h1>Docs</h1>").unwrap();
    std::fs::write(assets.join("app.js"), b"dev();").unwrap();
    std::fs::write(tmp.path().join("secret.txt"), b"do not serve").unwrap();

    let config = format!(
        r#"
{extra_config}

[logging]
level = "warn"
access_log = false

[http]
server_name = "cling-test"

[[mounts]]
name = "static"
base_url = "/static/"
root_dir = "{root}"
finder_dirs = ["{assets}"]

[[mounts]]
name = "cdn"
base_url = "https://cdn.example.com/cdn/"
root_dir = "{root}"

[fallback]
type = "direct"
status = 200
body = "application"
content_type = "text/plain"
"#,
        root = escape(&root),
        assets = escape(&assets),
    );
    let config_path = tmp.path().join("cling.toml");
    std::fs::write(&config_path, config).unwrap();

    let config = Config::load_from(config_path.to_str().unwrap()).unwrap();
    let state = Arc::new(AppState::new(config).unwrap());
    Site { _tmp: tmp, state }
}

fn escape(path: &Path) -> String {
    path.display().to_string().replace('\\', "\\\\")
}

async fn send(site: &Site, request: Request<()>) -> Response<ResponseBody> {
    handle_request(request, Arc::clone(&site.state), peer())
        .await
        .unwrap()
}

fn get(uri: &str) -> hyper::http::request::Builder {
    Request::builder().method(Method::GET).uri(uri)
}

async fn body(response: Response<ResponseBody>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

#[tokio::test]
async fn test_gzip_variant_scenario() {
    let site = build_site("");

    let gz = send(
        &site,
        get("/static/app.js")
            .header(header::ACCEPT_ENCODING, "gzip, deflate")
            .body(())
            .unwrap(),
    )
    .await;
    assert_eq!(gz.status(), StatusCode::OK);
    assert_eq!(gz.headers()[header::CONTENT_ENCODING], "gzip");
    assert_eq!(gz.headers()[header::VARY], "Accept-Encoding");
    assert_eq!(body(gz).await.len(), 6);

    let plain = send(&site, get("/static/app.js").body(()).unwrap()).await;
    assert_eq!(plain.status(), StatusCode::OK);
    assert!(!plain.headers().contains_key(header::CONTENT_ENCODING));
    assert_eq!(body(plain).await, b"console.1;");
}

#[tokio::test]
async fn test_directory_scenario() {
    let site = build_site("");

    let redirect = send(&site, get("/static/docs").body(()).unwrap()).await;
    assert_eq!(redirect.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(redirect.headers()[header::LOCATION], "/static/docs/");

    let with_query = send(&site, get("/static/docs?page=2").body(()).unwrap()).await;
    assert_eq!(with_query.headers()[header::LOCATION], "/static/docs/?page=2");

    let index = send(&site, get("/static/docs/").body(()).unwrap()).await;
    assert_eq!(index.status(), StatusCode::OK);
    assert_eq!(
        index.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    assert_eq!(body(index).await, b"<h1>Docs</h1>");
}

#[tokio::test]
async fn test_conditional_requests() {
    let site = build_site("");
    let first = send(&site, get("/static/app.js").body(()).unwrap()).await;
    let etag = first.headers()[header::ETAG].clone();
    let last_modified = first.headers()[header::LAST_MODIFIED].clone();

    let by_etag = send(
        &site,
        get("/static/app.js")
            .header(header::IF_NONE_MATCH, etag.clone())
            .body(())
            .unwrap(),
    )
    .await;
    assert_eq!(by_etag.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(by_etag.headers()[header::ETAG], etag);
    assert!(body(by_etag).await.is_empty());

    let by_date = send(
        &site,
        get("/static/app.js")
            .header(header::IF_MODIFIED_SINCE, last_modified)
            .body(())
            .unwrap(),
    )
    .await;
    assert_eq!(by_date.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn test_head_never_has_body() {
    let site = build_site("");
    let request = Request::builder()
        .method(Method::HEAD)
        .uri("/static/app.js")
        .body(())
        .unwrap();
    let response = send(&site, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "10");
    assert!(body(response).await.is_empty());
}

#[tokio::test]
async fn test_traversal_is_not_found() {
    let site = build_site("");
    for uri in [
        "/static/../secret.txt",
        "/static/%2e%2e/secret.txt",
        "/static/docs/%2e%2e/%2e%2e/secret.txt",
    ] {
        let response = send(&site, get(uri).body(()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn test_method_not_allowed_on_mount() {
    let site = build_site("");
    let request = Request::builder()
        .method(Method::POST)
        .uri("/static/app.js")
        .body(())
        .unwrap();
    let response = send(&site, request).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET, HEAD");
}

#[tokio::test]
async fn test_unmounted_paths_go_to_fallback() {
    let site = build_site("");
    for uri in ["/api/users", "/static", "/cdn/app.js"] {
        let response = send(&site, get(uri).body(()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(body(response).await, b"application", "{uri}");
    }

    // Non-GET requests outside every mount are the fallback's business
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .body(())
        .unwrap();
    assert_eq!(send(&site, request).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_server_header_on_every_response() {
    let site = build_site("");
    for uri in ["/static/app.js", "/static/missing.js", "/elsewhere"] {
        let response = send(&site, get(uri).body(()).unwrap()).await;
        assert_eq!(
            response.headers()[header::SERVER],
            HeaderValue::from_static("cling-test")
        );
    }
}

#[tokio::test]
async fn test_debug_mode_serves_sources() {
    let site = build_site("debug = true");

    let response = send(
        &site,
        get("/static/app.js")
            .header(header::ACCEPT_ENCODING, "gzip")
            .body(())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
    assert!(!response.headers().contains_key(header::CONTENT_ENCODING));
    assert_eq!(body(response).await, b"dev();");

    let docs = send(&site, get("/static/docs/").body(()).unwrap()).await;
    assert_eq!(docs.status(), StatusCode::NOT_FOUND);
}

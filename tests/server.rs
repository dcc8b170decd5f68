//! Serves real HTTP/1.1 over a loopback socket and shuts down cleanly.

use std::sync::Arc;
use std::time::Duration;

use cling::config::{AppState, Config};
use cling::server;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

fn state_for(root: &std::path::Path, dir: &TempDir) -> Arc<AppState> {
    let config_path = dir.path().join("cling.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[logging]
level = "warn"
access_log = false

[performance]
keep_alive = true
connection_timeout = 5
chunk_size = 4

[[mounts]]
name = "static"
base_url = "/static/"
root_dir = "{}"
"#,
            root.display().to_string().replace('\\', "\\\\")
        ),
    )
    .unwrap();
    let config = Config::load_from(config_path.to_str().unwrap()).unwrap();
    Arc::new(AppState::new(config).unwrap())
}

async fn roundtrip(addr: std::net::SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn test_serves_and_shuts_down() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("public");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("hello.txt"), b"hello, streamed world").unwrap();

    let listener = server::create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(server::run(listener, state_for(&root, &dir), async {
        let _ = stop_rx.await;
    }));

    let response = roundtrip(
        addr,
        "GET /static/hello.txt HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.to_ascii_lowercase().contains("content-length: 21"));
    assert!(response.ends_with("hello, streamed world"));

    let response = roundtrip(
        addr,
        "GET /elsewhere HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 404 Not Found"), "{response}");

    stop_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(10), server)
        .await
        .expect("server did not shut down")
        .unwrap();

    assert!(TcpStream::connect(addr).await.is_err());
}

//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::time::Duration;

use profile_server::config::ServerConfig;
use profile_server::lifecycle::{bootstrap, Shutdown};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Bytes written as the test profile picture.
#[allow(dead_code)]
pub const PICTURE_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0xFF, 0xD9];

/// Landing page written for tests.
#[allow(dead_code)]
pub const INDEX_HTML: &str = "<!doctype html><title>Profile</title><h1>Profile</h1>";

/// A running server with its own database and asset directory.
pub struct TestServer {
    pub addr: SocketAddr,
    pub dir: TempDir,
    pub shutdown: Shutdown,
}

impl TestServer {
    #[allow(dead_code)]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    #[allow(dead_code)]
    pub fn db_path(&self) -> std::path::PathBuf {
        self.dir.path().join("profile.db")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config pointing the store and assets into `dir`, with rate limiting off.
pub fn test_config(dir: &TempDir) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.store.url = format!("sqlite://{}", dir.path().join("profile.db").display());
    config.assets.index_path = dir.path().join("index.html").display().to_string();
    config.assets.picture_path = dir.path().join("profile-1.jpg").display().to_string();
    config.rate_limit.enabled = false;
    config
}

/// Start a server; `configure` may adjust the default test config.
pub async fn start_server<F>(configure: F) -> TestServer
where
    F: FnOnce(&mut ServerConfig),
{
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(dir.path().join("profile-1.jpg"), PICTURE_BYTES).unwrap();

    let mut config = test_config(&dir);
    configure(&mut config);

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = bootstrap(config).await.unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // The listener is already bound; give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer { addr, dir, shutdown }
}

/// A client that never reuses connections or goes through a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

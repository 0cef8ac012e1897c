//! Static serving of a built site, shared by the preview and dev servers.

use std::net::SocketAddr;
use std::path::Path;

use axum::Router;
use tower_http::services::ServeDir;

use crate::server::ServerError;

/// Router that serves the files of `dir`, `index.html` for directories.
pub fn site_router(dir: &Path) -> Router {
    Router::new().fallback_service(ServeDir::new(dir))
}

/// Serve an already built site from `dir` until the process is stopped.
pub async fn preview(dir: &Path, host: &str, port: u16, open: bool) -> Result<(), ServerError> {
    if !dir.join("index.html").exists() {
        return Err(ServerError::NotBuilt(dir.to_path_buf()));
    }

    let addr = listen_addr(host, port)?;
    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    serve_app(addr, site_router(dir), open).await
}

pub(crate) fn listen_addr(host: &str, port: u16) -> Result<SocketAddr, ServerError> {
    let addr = format!("{}:{}", host, port);
    addr.parse().map_err(|_| ServerError::InvalidAddress(addr))
}

/// Bind `addr`, optionally open a browser on it, and serve `app`.
pub(crate) async fn serve_app(addr: SocketAddr, app: Router, open: bool) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

    if open {
        let url = format!("http://{}", addr);
        let _ = open::that(&url);
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::BindError(addr, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn get(addr: SocketAddr, path: &str) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn refuses_unbuilt_directory() {
        let temp = tempdir().unwrap();

        let err = preview(&temp.path().join("dist"), "127.0.0.1", 0, false)
            .await
            .unwrap_err();

        assert!(matches!(err, ServerError::NotBuilt(_)));
        assert!(err.to_string().contains("apex build"));
    }

    #[test]
    fn rejects_bad_host() {
        assert!(matches!(
            listen_addr("not a host", 4000),
            Err(ServerError::InvalidAddress(_))
        ));
        assert_eq!(listen_addr("127.0.0.1", 4000).unwrap().port(), 4000);
    }

    #[tokio::test]
    async fn serves_landing_and_demo_indexes() {
        let temp = tempdir().unwrap();
        let dist = temp.path().join("dist");
        fs::create_dir_all(dist.join("demos/acme")).unwrap();
        fs::write(dist.join("index.html"), "<h1>Apex Builder</h1>").unwrap();
        fs::write(dist.join("demos/acme/index.html"), "<h1>Acme Co</h1>").unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = site_router(&dist);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let landing = get(addr, "/").await;
        assert!(landing.starts_with("HTTP/1.1 200"), "{landing}");
        assert!(landing.contains("<h1>Apex Builder</h1>"));

        let demo = get(addr, "/demos/acme/").await;
        assert!(demo.contains("<h1>Acme Co</h1>"), "{demo}");

        let missing = get(addr, "/demos/nobody/").await;
        assert!(missing.starts_with("HTTP/1.1 404"), "{missing}");
    }
}

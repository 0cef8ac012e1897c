//! Development server implementation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::sync::Mutex;

use apex_static::{BuildConfig, SiteBuilder, LIVE_RELOAD_SCRIPT};

use crate::preview::{listen_addr, serve_app, site_router};
use crate::reload::{reload_client_script, ReloadHub, ReloadMessage, RELOAD_SOCKET_PATH};
use crate::watcher::{FileWatcher, WatchEvent, WatchTarget};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Site build settings; live reload is always switched on
    pub build: BuildConfig,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error("No built site in {}. Run 'apex build' first.", .0.display())]
    NotBuilt(PathBuf),

    #[error(transparent)]
    Build(#[from] apex_static::BuildError),
}

/// Shared server state.
struct ServerState {
    builder: SiteBuilder,
    hub: ReloadHub,
    build_lock: Mutex<()>,
}

/// Development server: builds once, serves the output, rebuilds on change.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Sources whose changes trigger a rebuild: the data file, the template
    /// directories (for includes) and the assets directory.
    pub fn watch_targets(&self) -> Vec<WatchTarget> {
        let build = &self.config.build;
        let mut targets = vec![
            WatchTarget::File(build.data_path.clone()),
            template_target(&build.landing_template),
            template_target(&build.demo_template),
            WatchTarget::Dir(build.assets_dir.clone()),
        ];
        targets.sort();
        targets.dedup();
        targets
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr = listen_addr(&self.config.host, self.config.port)?;

        let build = BuildConfig {
            live_reload: true,
            ..self.config.build.clone()
        };
        let output_dir = build.output_dir.clone();

        let state = Arc::new(ServerState {
            builder: SiteBuilder::new(build)?,
            hub: ReloadHub::new(),
            build_lock: Mutex::new(()),
        });

        rebuild(&state).await;

        let (watcher, mut rx) = FileWatcher::new(&self.watch_targets(), output_dir.clone())
            .map_err(|e| ServerError::WatchError(e.to_string()))?;

        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                tracing::info!("Changed: {}", event.path().display());
                rebuild_until_settled(&state_clone, &mut rx).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = Router::new()
            .route(RELOAD_SOCKET_PATH, get(ws_handler))
            .route(LIVE_RELOAD_SCRIPT, get(reload_script_handler))
            .with_state(state)
            .merge(site_router(&output_dir));

        tracing::info!("Starting dev server at http://{}", addr);

        serve_app(addr, app, self.config.open).await
    }
}

/// Templates may include siblings, so their whole directory is watched;
/// a template in the working directory is watched on its own.
fn template_target(template: &Path) -> WatchTarget {
    match template.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => WatchTarget::Dir(parent.to_path_buf()),
        _ => WatchTarget::File(template.to_path_buf()),
    }
}

/// Run a build off the async runtime and tell connected tabs how it went.
async fn rebuild(state: &Arc<ServerState>) {
    let _guard = state.build_lock.lock().await;

    let task_state = Arc::clone(state);
    let result = tokio::task::spawn_blocking(move || task_state.builder.build()).await;

    match result {
        Ok(Ok(built)) => {
            tracing::info!("Rebuilt {} demos in {}ms", built.demos, built.duration_ms);
            state.hub.send(ReloadMessage::Reload);
        }
        Ok(Err(e)) => {
            tracing::error!("Build failed: {}", e);
            state.hub.send(ReloadMessage::BuildFailed {
                message: e.to_string(),
            });
        }
        Err(e) => {
            tracing::error!("Build task did not complete: {}", e);
        }
    }
}

/// Rebuild, then rebuild again for as long as changes keep arriving during
/// the build. Returns the number of builds run.
async fn rebuild_until_settled(
    state: &Arc<ServerState>,
    rx: &mut tokio::sync::mpsc::Receiver<WatchEvent>,
) -> usize {
    let mut builds = 0;
    loop {
        rebuild(state).await;
        builds += 1;

        let mut dirty = false;
        while let Ok(event) = rx.try_recv() {
            tracing::info!("Changed during build: {}", event.path().display());
            dirty = true;
        }
        if !dirty {
            return builds;
        }
    }
}

/// Handler for the reload WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Forward reload messages to one browser tab.
async fn handle_ws(mut socket: WebSocket, state: Arc<ServerState>) {
    let mut rx = state.hub.subscribe();

    if send_message(&mut socket, &ReloadMessage::Connected).await.is_err() {
        return;
    }

    while let Ok(msg) = rx.recv().await {
        if send_message(&mut socket, &msg).await.is_err() {
            break;
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ReloadMessage) -> Result<(), ()> {
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

/// Handler for the reload client script.
async fn reload_script_handler() -> impl IntoResponse {
    (
        [("content-type", "application/javascript")],
        reload_client_script(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_server_with_default_config() {
        let server = DevServer::new(DevServerConfig::default());

        assert_eq!(server.config.port, 7777);
        assert_eq!(server.config.host, "127.0.0.1");
    }

    #[test]
    fn watches_source_locations_once() {
        let server = DevServer::new(DevServerConfig {
            build: BuildConfig {
                landing_template: PathBuf::from("templates/landing.html"),
                demo_template: PathBuf::from("templates/demo.html"),
                ..Default::default()
            },
            ..Default::default()
        });

        let targets = server.watch_targets();

        assert_eq!(
            targets,
            vec![
                WatchTarget::Dir(PathBuf::from("public/assets")),
                WatchTarget::Dir(PathBuf::from("templates")),
                WatchTarget::File(PathBuf::from("clients.json")),
            ]
        );
    }

    #[test]
    fn bare_template_is_watched_as_a_file() {
        assert_eq!(
            template_target(Path::new("index.html")),
            WatchTarget::File(PathBuf::from("index.html"))
        );
        assert_eq!(
            template_target(Path::new("tallygo/index.html")),
            WatchTarget::Dir(PathBuf::from("tallygo"))
        );
    }

    #[tokio::test]
    async fn changes_during_a_build_trigger_another() {
        let temp = tempdir().unwrap();
        let state = Arc::new(ServerState {
            builder: SiteBuilder::new(BuildConfig {
                data_path: temp.path().join("missing.json"),
                output_dir: temp.path().join("dist"),
                ..Default::default()
            })
            .unwrap(),
            hub: ReloadHub::new(),
            build_lock: Mutex::new(()),
        });
        let (tx, mut rx) = tokio::sync::mpsc::channel(8);

        assert_eq!(rebuild_until_settled(&state, &mut rx).await, 1);

        // Queued before the first build finishes, so the first pass may have missed it.
        tx.send(WatchEvent::Changed(PathBuf::from("clients.json"))).await.unwrap();
        tx.send(WatchEvent::Changed(PathBuf::from("templates/demo.html"))).await.unwrap();
        assert_eq!(rebuild_until_settled(&state, &mut rx).await, 2);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn rebuild_reports_failures() {
        let temp = tempdir().unwrap();
        let state = Arc::new(ServerState {
            builder: SiteBuilder::new(BuildConfig {
                data_path: temp.path().join("missing.json"),
                output_dir: temp.path().join("dist"),
                ..Default::default()
            })
            .unwrap(),
            hub: ReloadHub::new(),
            build_lock: Mutex::new(()),
        });
        let mut rx = state.hub.subscribe();

        rebuild(&state).await;

        match rx.try_recv() {
            Ok(ReloadMessage::BuildFailed { message }) => assert!(message.contains("missing.json")),
            other => panic!("expected BuildFailed, got {other:?}"),
        }
    }
}

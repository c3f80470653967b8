use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use quill_core::Quill;
use quill_core::butler::{self, DispatchError, Request};
use serde_json::{Value, json};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::sync::Mutex;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

/// Configuration for the butler admin server
#[derive(Debug, Clone)]
pub struct ButlerServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to serve on
    pub port: u16,
    /// Working directory holding storage/, assets/ and site/
    pub root: PathBuf,
    /// Let dispatch failures propagate instead of reporting `failed`
    pub debug: bool,
    /// Auto-open the dashboard in a browser
    pub open_dashboard: bool,
    /// Auto-open the generated site in a browser
    pub open_site: bool,
}

impl Default for ButlerServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8060,
            root: PathBuf::from("."),
            debug: false,
            open_dashboard: false,
            open_site: false,
        }
    }
}

/// The butler endpoint plus static serving for the generated site and the
/// admin dashboard.
pub struct ButlerServer {
    config: ButlerServerConfig,
}

impl ButlerServer {
    pub fn new(config: ButlerServerConfig) -> Self {
        Self { config }
    }

    /// Run the server. The application state sits behind one mutex, so at
    /// most one butler operation (and therefore one rebuild) runs at a
    /// time.
    pub async fn run(self) -> Result<()> {
        let mut app = Quill::open(&self.config.root)?;

        // Serve a fresh tree from the first request on.
        app.build()?;

        let site_dir = app.site_dir().to_path_buf();
        let dashboard_dir = app.assets_dir().join("admin");

        let state = AppState {
            app: Arc::new(Mutex::new(app)),
            debug: self.config.debug,
        };

        let router = Router::new()
            .route("/", get(|| async { Redirect::to("/dashboard/") }))
            .route("/news/", get(|| async { Redirect::to("/site/news/") }))
            .route("/butler", post(butler_handler))
            .nest_service("/site", ServeDir::new(site_dir))
            .nest_service("/dashboard", ServeDir::new(dashboard_dir))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(state);

        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;

        println!("Butler listening at http://{}", addr);
        if self.config.debug {
            println!("Debug mode: dispatch failures will carry error detail");
        }

        if self.config.open_dashboard {
            if let Err(e) = open::that(format!("http://{}/dashboard/", addr)) {
                eprintln!("Failed to open browser: {}", e);
            }
        }
        if self.config.open_site {
            if let Err(e) = open::that(format!("http://{}/site/", addr)) {
                eprintln!("Failed to open browser: {}", e);
            }
        }

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

#[derive(Clone)]
struct AppState {
    app: Arc<Mutex<Quill>>,
    debug: bool,
}

async fn butler_handler(State(state): State<AppState>, Json(request): Json<Request>) -> Response {
    let mut app = state.app.lock().await;
    let result = butler::dispatch(&mut app, &request);

    match envelope(result, state.debug) {
        Ok(value) => Json(value).into_response(),
        Err(err) => {
            eprintln!("Butler command `{}` failed: {}", request.command, err);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

/// Normalize a dispatch outcome for the wire. Outside debug mode every
/// failure collapses into `{"status": "failed"}` with the detail kept off
/// the wire; debug mode lets it propagate to the transport.
fn envelope(result: Result<Value, DispatchError>, debug: bool) -> Result<Value, DispatchError> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if debug => Err(err),
        Err(_) => Ok(json!({ "status": "failed" })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_collapse_to_failed_status() {
        let result = envelope(
            Err(DispatchError::UnknownCommand("nope".to_string())),
            false,
        );
        assert_eq!(result.unwrap(), json!({ "status": "failed" }));
    }

    #[test]
    fn test_debug_mode_propagates() {
        let result = envelope(Err(DispatchError::UnknownCommand("nope".to_string())), true);
        assert!(matches!(result, Err(DispatchError::UnknownCommand(_))));
    }

    #[test]
    fn test_success_value_passes_through() {
        let value = json!({ "site": { "name": "My blog" } });
        assert_eq!(envelope(Ok(value.clone()), false).unwrap(), value);
    }
}

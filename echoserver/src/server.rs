//! Serveur HTTP d'EchoWave
//!
//! [`Server`] accumule des routes axum (JSON, handlers avec état, API
//! documentées) puis les sert en tâche de fond jusqu'à Ctrl+C.

use crate::logs::{self, LogState, LoggingOptions, LogsApiDoc, log_dump, log_sse};
use anyhow::{Context, Result};
use axum::{Json, Router, handler::Handler, routing::get};
use serde::Serialize;
use std::{future::Future, net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, signal, task::JoinHandle};
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Identité du serveur, telle que renvoyée par [`Server::info`]
#[derive(Clone, Debug, Serialize, utoipa::ToSchema)]
pub struct ServerInfo {
    pub name: String,
    pub base_url: String,
    pub http_port: u16,
}

pub struct Server {
    info: ServerInfo,
    router: Router,
    task: Option<JoinHandle<()>>,
    bound: Option<SocketAddr>,
    log_state: Option<LogState>,
}

impl Server {
    /// `http_port` à 0 demande un port éphémère, lisible ensuite via
    /// [`Server::local_addr`]
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            info: ServerInfo {
                name: name.into(),
                base_url: base_url.into(),
                http_port,
            },
            router: Router::new(),
            task: None,
            bound: None,
            log_state: None,
        }
    }

    fn merge(&mut self, routes: Router) {
        self.router = std::mem::take(&mut self.router).merge(routes);
    }

    fn nest(&mut self, path: &str, routes: Router) {
        if path == "/" {
            self.merge(routes);
        } else {
            self.router = std::mem::take(&mut self.router).nest(path, routes);
        }
    }

    /// Sert en GET le JSON produit par `f`
    ///
    /// ```rust,no_run
    /// # use echoserver::Server;
    /// # async fn demo(server: &mut Server) {
    /// server.add_route("/info", || async {
    ///     serde_json::json!({"name": "EchoWave"})
    /// }).await;
    /// # }
    /// ```
    pub async fn add_route<F, Fut, T>(&mut self, path: &str, f: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let f = Arc::new(f);
        let handler = move || {
            let f = Arc::clone(&f);
            async move { Json(f().await) }
        };
        self.nest(path, Router::new().route("/", get(handler)));
    }

    /// Sert en GET un handler axum qui a besoin d'un état
    pub async fn add_handler_with_state<H, T, S>(&mut self, path: &str, handler: H, state: S)
    where
        H: Handler<T, S> + Clone + 'static,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        self.nest(path, Router::new().route("/", get(handler)).with_state(state));
    }

    /// Monte une API et sa documentation
    ///
    /// Les routes de `api_router` portent déjà leur chemin complet
    /// (ex: `/api/channels`). Le document est publié sur
    /// `/api-docs/{name}.json` et l'interface Swagger sur `/swagger-ui/{name}`.
    pub async fn add_openapi(
        &mut self,
        api_router: Router,
        openapi: utoipa::openapi::OpenApi,
        name: &str,
    ) {
        let docs = SwaggerUi::new(format!("/swagger-ui/{}", name))
            .url(format!("/api-docs/{}.json", name), openapi);
        self.merge(api_router);
        self.merge(docs.into());
    }

    /// Monte un router tel quel (`"/"`) ou sous un préfixe
    pub async fn add_router(&mut self, path: &str, sub_router: Router) {
        self.nest(&format!("/{}", path.trim_start_matches('/')), sub_router);
    }

    /// Router assemblé jusqu'ici, pour les tests en mémoire
    pub async fn router(&self) -> Router {
        self.router.clone()
    }

    /// Lie le port puis sert en tâche de fond
    ///
    /// Une erreur de bind est renvoyée immédiatement.
    pub async fn start(&mut self) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.info.http_port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        let bound = listener.local_addr()?;
        self.bound = Some(bound);

        info!(
            server = %self.info.name,
            "Listening on http://{}:{}",
            self.info.base_url,
            bound.port()
        );

        let app = self.router.clone();
        self.task = Some(tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(ctrl_c())
                .await;
            if let Err(e) = served {
                error!("HTTP server stopped with error: {}", e);
            }
        }));
        Ok(())
    }

    /// Attend l'arrêt du serveur démarré par [`Server::start`]
    pub async fn wait(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.bound
    }

    /// Le port rapporté est le port réellement lié une fois démarré
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            http_port: self.bound.map_or(self.info.http_port, |a| a.port()),
            ..self.info.clone()
        }
    }

    pub fn log_state(&self) -> Option<&LogState> {
        self.log_state.as_ref()
    }

    /// Installe le logging global et monte ses routes
    ///
    /// - `GET /log-sse` : flux SSE
    /// - `GET /log-dump` : buffer en JSON
    /// - `GET|POST /api/logs/log_setup` : niveau de log
    pub async fn init_logging(&mut self, options: LoggingOptions) -> LogState {
        let state = logs::init_logging(options);
        self.attach_log_state(state.clone()).await;
        state
    }

    /// Monte les routes de logs pour un `LogState` existant
    pub async fn attach_log_state(&mut self, state: LogState) {
        self.add_handler_with_state("/log-sse", log_sse, state.clone())
            .await;
        self.add_handler_with_state("/log-dump", log_dump, state.clone())
            .await;
        self.add_openapi(
            logs::create_logs_router(state.clone()),
            LogsApiDoc::openapi(),
            "logs",
        )
        .await;
        self.log_state = Some(state);
    }
}

async fn ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Ctrl+C reçu, arrêt gracieux"),
        Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
    }
}

pub struct ServerBuilder {
    name: String,
    base_url: String,
    http_port: u16,
}

impl ServerBuilder {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
        }
    }

    pub fn http_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }

    pub fn build(self) -> Server {
        Server::new(self.name, self.base_url, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    #[tokio::test]
    async fn test_add_route_serves_json() {
        let mut server = ServerBuilder::new("Test", "localhost", 0).build();
        server
            .add_route("/info", || async { serde_json::json!({"version": "1.0.0"}) })
            .await;

        let (status, body) = get_json(server.router().await, "/info").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["version"], "1.0.0");
    }

    #[tokio::test]
    async fn test_add_openapi_mounts_json_document() {
        let mut server = ServerBuilder::new("Test", "localhost", 0).build();
        server.attach_log_state(LogState::new(8, None)).await;
        let router = server.router().await;

        let (status, doc) = get_json(router.clone(), "/api-docs/logs.json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/api/logs/log_setup"].is_object());

        let (status, body) = get_json(router.clone(), "/api/logs/log_setup").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_level"], "TRACE");

        let (status, body) = get_json(router, "/log-dump").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_start_binds_ephemeral_port() {
        let mut server = ServerBuilder::new("Test", "localhost", 0).http_port(0).build();
        server.start().await.unwrap();

        let addr = server.local_addr().unwrap();
        assert_ne!(addr.port(), 0);
        assert_eq!(server.info().http_port, addr.port());
        assert_eq!(server.info().name, "Test");
    }
}

//! Routes HTTP du système de logs

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tracing::Level;

use super::{LogState, filter::LogQuery, filter::parse_level};

const LEVELS: [Level; 5] = [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE];

/// `GET /log-sse` : l'historique du buffer, puis les nouvelles entrées
pub async fn log_sse(
    State(state): State<LogState>,
    Query(query): Query<LogQuery>,
) -> impl IntoResponse {
    // Abonnement avant la copie du buffer : aucune entrée ne se perd entre les deux
    let mut live = state.subscribe();
    let backlog = state.dump();

    let stream = async_stream::stream! {
        for entry in backlog {
            if query.accepts(&entry, state.max_level()) {
                yield Event::default().json_data(&entry);
            }
        }
        loop {
            match live.recv().await {
                Ok(entry) if query.accepts(&entry, state.max_level()) => {
                    yield Event::default().json_data(&entry);
                }
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// `GET /log-dump` : contenu du buffer en JSON
pub async fn log_dump(State(state): State<LogState>) -> impl IntoResponse {
    Json(state.dump())
}

/// Corps de `POST /api/logs/log_setup`
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LogLevelRequest {
    pub level: String,
}

/// Niveau courant et niveaux acceptés
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LogLevelStatus {
    pub current_level: String,
    pub available_levels: Vec<String>,
}

impl From<Level> for LogLevelStatus {
    fn from(level: Level) -> Self {
        Self {
            current_level: level.to_string(),
            available_levels: LEVELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/logs/log_setup",
    responses(
        (status = 200, description = "Niveau de log courant", body = LogLevelStatus)
    ),
    tag = "logs"
)]
pub async fn get_log_level(State(state): State<LogState>) -> Json<LogLevelStatus> {
    Json(state.max_level().into())
}

#[utoipa::path(
    post,
    path = "/api/logs/log_setup",
    request_body = LogLevelRequest,
    responses(
        (status = 200, description = "Niveau de log modifié", body = LogLevelStatus),
        (status = 400, description = "Niveau inconnu")
    ),
    tag = "logs"
)]
pub async fn set_log_level(
    State(state): State<LogState>,
    Json(request): Json<LogLevelRequest>,
) -> Response {
    match parse_level(&request.level) {
        Some(level) => {
            state.set_max_level(level);
            tracing::info!(%level, "Log level changed");
            Json(LogLevelStatus::from(level)).into_response()
        }
        None => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": format!("Unknown log level '{}'", request.level),
                "available_levels": LogLevelStatus::from(Level::INFO).available_levels,
            })),
        )
            .into_response(),
    }
}

/// Router de `/api/logs/log_setup`, documenté par [`LogsApiDoc`]
pub fn create_logs_router(state: LogState) -> Router {
    Router::new()
        .route("/api/logs/log_setup", get(get_log_level).post(set_log_level))
        .with_state(state)
}

#[derive(utoipa::OpenApi)]
#[openapi(
    paths(get_log_level, set_log_level),
    components(schemas(LogLevelRequest, LogLevelStatus)),
    tags((name = "logs", description = "Réglage du niveau de log à chaud"))
)]
pub struct LogsApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn post_level(level: &str) -> Request<Body> {
        Request::post("/api/logs/log_setup")
            .header("content-type", "application/json")
            .body(Body::from(format!(r#"{{"level":"{}"}}"#, level)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_log_level_can_be_changed() {
        let state = LogState::new(10, None);
        let router = create_logs_router(state.clone());

        let response = router.clone().oneshot(post_level("LOUD")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = router.clone().oneshot(post_level("warn")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let status: LogLevelStatus = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(status.current_level, "WARN");
        assert_eq!(state.max_level(), Level::WARN);

        let response = router
            .oneshot(Request::get("/api/logs/log_setup").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let status: LogLevelStatus = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(status.current_level, "WARN");
        assert_eq!(status.available_levels.len(), 5);
    }

    #[tokio::test]
    async fn test_dump_returns_buffer() {
        let state = LogState::new(10, None);
        state.push(crate::logs::LogEntry {
            timestamp: std::time::SystemTime::now(),
            level: "INFO".into(),
            target: "test".into(),
            message: "hello".into(),
        });

        let router = Router::new()
            .route("/log-dump", get(log_dump))
            .with_state(state);
        let response = router
            .oneshot(Request::get("/log-dump").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let entries: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(entries[0]["message"], "hello");
    }
}

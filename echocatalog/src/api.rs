//! API REST du catalogue : chaînes, épisodes et health check.
//!
//! Chaque handler renvoie l'enveloppe `{ success, data?, error? }`. Les
//! erreurs passent par l'`IntoResponse` de [`Error`](crate::Error) qui choisit
//! le code HTTP (400, 404 ou 500).

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{Method, Uri},
    routing::{MethodRouter, get},
};
use echomodel::{ApiResponse, Channel, DeletedResource, Episode, HealthStatus};
use serde_json::Value;
use tracing::debug;

use crate::validation::{channel_draft_from_json, episode_draft_from_json, json_body};
use crate::{Catalog, Error, Result};

type Body = std::result::Result<Json<Value>, JsonRejection>;
type Envelope<T> = Result<Json<ApiResponse<T>>>;

/// Router complet de l'API catalogue (chemins absolus `/api/...`)
///
/// Un chemin inconnu (404) ou une méthode non prise en charge (405)
/// renvoient eux aussi l'enveloppe d'erreur.
pub fn catalog_api_router(catalog: Catalog) -> Router {
    Router::new()
        .route(
            "/api/channels",
            resource(get(list_channels).post(create_channel)),
        )
        .route(
            "/api/channels/{id}",
            resource(get(get_channel).put(update_channel).delete(delete_channel)),
        )
        .route(
            "/api/channels/{id}/episodes",
            resource(get(list_episodes).post(create_episode)),
        )
        .route(
            "/api/episodes/{id}",
            resource(get(get_episode).put(update_episode).delete(delete_episode)),
        )
        .route("/api/health-check", resource(get(health_check)))
        .fallback(unknown_route)
        .with_state(catalog)
}

fn resource(methods: MethodRouter<Catalog>) -> MethodRouter<Catalog> {
    methods.fallback(unsupported_method)
}

async fn unknown_route(uri: Uri) -> Error {
    Error::NotFound(format!("no route for {}", uri.path()))
}

async fn unsupported_method(method: Method, uri: Uri) -> Error {
    Error::MethodNotAllowed(format!("{} is not supported on {}", method, uri.path()))
}

fn ok<T>(data: T) -> Envelope<T> {
    Ok(Json(ApiResponse::ok(data)))
}

#[utoipa::path(
    get,
    path = "/api/channels",
    tag = "channels",
    responses(
        (status = 200, description = "Liste des chaînes", body = ApiResponse<Vec<Channel>>),
        (status = 500, description = "Base de données indisponible", body = ApiResponse<String>)
    )
)]
pub async fn list_channels(State(catalog): State<Catalog>) -> Envelope<Vec<Channel>> {
    ok(catalog.list_channels()?)
}

#[utoipa::path(
    get,
    path = "/api/channels/{id}",
    tag = "channels",
    params(("id" = String, Path, description = "Identifiant de la chaîne")),
    responses(
        (status = 200, description = "Chaîne trouvée", body = ApiResponse<Channel>),
        (status = 404, description = "Chaîne introuvable", body = ApiResponse<String>)
    )
)]
pub async fn get_channel(State(catalog): State<Catalog>, Path(id): Path<String>) -> Envelope<Channel> {
    ok(catalog.get_channel(&id)?)
}

#[utoipa::path(
    post,
    path = "/api/channels",
    tag = "channels",
    request_body = echomodel::ChannelDraft,
    responses(
        (status = 200, description = "Chaîne créée", body = ApiResponse<Channel>),
        (status = 400, description = "Champ requis manquant", body = ApiResponse<String>)
    )
)]
pub async fn create_channel(State(catalog): State<Catalog>, body: Body) -> Envelope<Channel> {
    let draft = channel_draft_from_json(&json_body(body)?)?;
    ok(catalog.create_channel(draft)?)
}

#[utoipa::path(
    put,
    path = "/api/channels/{id}",
    tag = "channels",
    params(("id" = String, Path, description = "Identifiant de la chaîne")),
    request_body = echomodel::ChannelDraft,
    responses(
        (status = 200, description = "Chaîne mise à jour", body = ApiResponse<Channel>),
        (status = 400, description = "Corps invalide", body = ApiResponse<String>),
        (status = 404, description = "Chaîne introuvable", body = ApiResponse<String>)
    )
)]
pub async fn update_channel(
    State(catalog): State<Catalog>,
    Path(id): Path<String>,
    body: Body,
) -> Envelope<Channel> {
    let draft = channel_draft_from_json(&json_body(body)?)?;
    ok(catalog.update_channel(&id, draft)?)
}

#[utoipa::path(
    delete,
    path = "/api/channels/{id}",
    tag = "channels",
    params(("id" = String, Path, description = "Identifiant de la chaîne")),
    responses(
        (status = 200, description = "Chaîne et épisodes supprimés", body = ApiResponse<DeletedResource>),
        (status = 404, description = "Chaîne introuvable", body = ApiResponse<String>)
    )
)]
pub async fn delete_channel(
    State(catalog): State<Catalog>,
    Path(id): Path<String>,
) -> Envelope<DeletedResource> {
    ok(catalog.delete_channel(&id)?)
}

#[utoipa::path(
    get,
    path = "/api/channels/{id}/episodes",
    tag = "episodes",
    params(("id" = String, Path, description = "Identifiant de la chaîne")),
    responses(
        (status = 200, description = "Épisodes, du plus récent au plus ancien", body = ApiResponse<Vec<Episode>>),
        (status = 404, description = "Chaîne introuvable", body = ApiResponse<String>)
    )
)]
pub async fn list_episodes(
    State(catalog): State<Catalog>,
    Path(id): Path<String>,
) -> Envelope<Vec<Episode>> {
    ok(catalog.list_episodes(&id)?)
}

#[utoipa::path(
    post,
    path = "/api/channels/{id}/episodes",
    tag = "episodes",
    params(("id" = String, Path, description = "Identifiant de la chaîne")),
    request_body = echomodel::EpisodeDraft,
    responses(
        (status = 200, description = "Épisode créé", body = ApiResponse<Episode>),
        (status = 400, description = "Corps invalide", body = ApiResponse<String>),
        (status = 404, description = "Chaîne introuvable", body = ApiResponse<String>)
    )
)]
pub async fn create_episode(
    State(catalog): State<Catalog>,
    Path(id): Path<String>,
    body: Body,
) -> Envelope<Episode> {
    // La chaîne est vérifiée avant le corps
    catalog.get_channel(&id)?;
    let draft = episode_draft_from_json(&json_body(body)?)?;
    ok(catalog.create_episode(&id, draft)?)
}

#[utoipa::path(
    get,
    path = "/api/episodes/{id}",
    tag = "episodes",
    params(("id" = String, Path, description = "Identifiant de l'épisode")),
    responses(
        (status = 200, description = "Épisode trouvé", body = ApiResponse<Episode>),
        (status = 404, description = "Épisode introuvable", body = ApiResponse<String>)
    )
)]
pub async fn get_episode(State(catalog): State<Catalog>, Path(id): Path<String>) -> Envelope<Episode> {
    ok(catalog.get_episode(&id)?)
}

#[utoipa::path(
    put,
    path = "/api/episodes/{id}",
    tag = "episodes",
    params(("id" = String, Path, description = "Identifiant de l'épisode")),
    request_body = echomodel::EpisodeDraft,
    responses(
        (status = 200, description = "Épisode mis à jour", body = ApiResponse<Episode>),
        (status = 400, description = "Corps invalide", body = ApiResponse<String>),
        (status = 404, description = "Épisode introuvable", body = ApiResponse<String>)
    )
)]
pub async fn update_episode(
    State(catalog): State<Catalog>,
    Path(id): Path<String>,
    body: Body,
) -> Envelope<Episode> {
    let draft = episode_draft_from_json(&json_body(body)?)?;
    ok(catalog.update_episode(&id, draft)?)
}

#[utoipa::path(
    delete,
    path = "/api/episodes/{id}",
    tag = "episodes",
    params(("id" = String, Path, description = "Identifiant de l'épisode")),
    responses(
        (status = 200, description = "Épisode supprimé", body = ApiResponse<DeletedResource>),
        (status = 404, description = "Épisode introuvable", body = ApiResponse<String>)
    )
)]
pub async fn delete_episode(
    State(catalog): State<Catalog>,
    Path(id): Path<String>,
) -> Envelope<DeletedResource> {
    ok(catalog.delete_episode(&id)?)
}

/// Health check : toujours 200, même base injoignable
#[utoipa::path(
    get,
    path = "/api/health-check",
    tag = "health",
    responses(
        (status = 200, description = "État du backend", body = ApiResponse<HealthStatus>)
    )
)]
pub async fn health_check(State(catalog): State<Catalog>) -> Json<ApiResponse<HealthStatus>> {
    let status = catalog.health();
    debug!(
        configured = status.database_url_configured,
        connected = status.database_connected,
        "Health check"
    );
    Json(ApiResponse::ok(status))
}

//! Types d'erreurs pour echocatalog

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use echomodel::ApiResponse;

/// Erreurs du catalogue
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Champ requis absent, mal typé ou invalide
    #[error("{0}")]
    Validation(String),

    /// Chaîne ou épisode introuvable
    #[error("{0}")]
    NotFound(String),

    /// Méthode HTTP non prise en charge sur une route connue
    #[error("{0}")]
    MethodNotAllowed(String),

    /// Base de données non configurée ou injoignable
    #[error("Database unavailable: {0}")]
    Connectivity(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn channel_not_found() -> Self {
        Error::NotFound("channel not found".to_string())
    }

    pub fn episode_not_found() -> Self {
        Error::NotFound("episode not found".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Error::Connectivity(_) | Error::Persistence(_) | Error::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Persistence(e.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(ApiResponse::<()>::err(self.to_string()))).into_response()
    }
}

/// Type Result spécialisé pour echocatalog
pub type Result<T> = std::result::Result<T, Error>;

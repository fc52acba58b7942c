//! Types d'erreurs pour le client catalogue

use crate::forms::FormErrors;

/// Type Result spécialisé pour echoclient
pub type Result<T> = std::result::Result<T, ClientError>;

/// Erreurs du client catalogue
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Échec réseau (connexion, timeout, ...)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Le serveur a répondu par un échec (statut non 2xx ou `success: false`)
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Réponse illisible
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Formulaire rejeté avant envoi
    #[error("Invalid form: {0}")]
    Validation(FormErrors),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Vrai pour un 404 renvoyé par l'API
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

//! Enveloppe de réponse uniforme de l'API.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Enveloppe `{ success, data?, error? }` utilisée par tous les endpoints.
///
/// Exactement un des deux champs optionnels est renseigné : `data` quand
/// `success` vaut `true`, `error` sinon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Convertit l'enveloppe en `Result`, le message d'erreur en cas d'échec.
    ///
    /// Une enveloppe marquée `success` mais sans `data` est traitée comme une
    /// erreur.
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err("response envelope carries no data".to_string()),
            (false, _) => Err(self.error.unwrap_or_else(|| "unknown error".to_string())),
        }
    }
}

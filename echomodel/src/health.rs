use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// État du backend renvoyé par `/api/health-check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Une URL de base de données non vide est configurée
    pub database_url_configured: bool,
    /// Un `SELECT 1` vient d'aboutir
    pub database_connected: bool,
    pub timestamp: DateTime<Utc>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.database_url_configured && self.database_connected
    }
}

//! Interprétation de l'URL de base de données.

use std::fmt;
use std::path::{Path, PathBuf};

/// Emplacement d'une base SQLite déduit d'une URL de connexion
///
/// Formes acceptées : `sqlite::memory:`, `:memory:`, `sqlite://<chemin>`,
/// `sqlite:<chemin>`, `file:<chemin>` ou un chemin nu. Une éventuelle query
/// string (`?mode=rwc`) est ignorée.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

impl DatabaseLocation {
    pub fn parse(url: &str) -> Result<Self, String> {
        let url = url.trim();
        if url.is_empty() {
            return Err("database URL is empty".to_string());
        }

        let without_query = url.split('?').next().unwrap_or(url);
        let rest = ["sqlite://", "sqlite:", "file:"]
            .iter()
            .find_map(|prefix| without_query.strip_prefix(prefix));

        let path = match rest {
            Some(rest) => rest,
            None => {
                if let Some((scheme, _)) = without_query.split_once("://") {
                    return Err(format!("unsupported database scheme '{}'", scheme));
                }
                without_query
            }
        };

        match path {
            "" => Err(format!("database URL '{}' has no path", url)),
            ":memory:" | "memory:" => Ok(DatabaseLocation::Memory),
            p => Ok(DatabaseLocation::File(PathBuf::from(p))),
        }
    }

    /// Rend absolu un chemin relatif en le résolvant contre `base`
    pub fn resolved_against(self, base: &Path) -> Self {
        match self {
            DatabaseLocation::File(p) if p.is_relative() => DatabaseLocation::File(base.join(p)),
            other => other,
        }
    }
}

impl fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseLocation::Memory => write!(f, "sqlite::memory:"),
            DatabaseLocation::File(p) => write!(f, "sqlite://{}", p.display()),
        }
    }
}

//! Sélection des entrées envoyées sur `/log-sse`

use serde::Deserialize;
use tracing::Level;

use super::LogEntry;

/// Paramètres de requête de `/log-sse`
///
/// `?warn=true&error=true` ne garde que ces niveaux ; sans drapeau, tous
/// les niveaux passent. `search` filtre sur le message ou la cible.
#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub warn: bool,
    #[serde(default)]
    pub info: bool,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub trace: bool,
    pub search: Option<String>,
}

impl LogQuery {
    fn wanted_levels(&self) -> Vec<Level> {
        [
            (self.error, Level::ERROR),
            (self.warn, Level::WARN),
            (self.info, Level::INFO),
            (self.debug, Level::DEBUG),
            (self.trace, Level::TRACE),
        ]
        .into_iter()
        .filter_map(|(on, level)| on.then_some(level))
        .collect()
    }

    /// Vrai si `entry` doit être transmise au client, `ceiling` étant le
    /// niveau de log courant du serveur
    pub fn accepts(&self, entry: &LogEntry, ceiling: Level) -> bool {
        let Some(level) = parse_level(&entry.level) else {
            return false;
        };
        if level > ceiling {
            return false;
        }

        let wanted = self.wanted_levels();
        if !wanted.is_empty() && !wanted.contains(&level) {
            return false;
        }

        match &self.search {
            Some(needle) => entry.message.contains(needle) || entry.target.contains(needle),
            None => true,
        }
    }
}

/// `"warn"`, `" WARN "`... vers `Level`
pub(crate) fn parse_level(s: &str) -> Option<Level> {
    s.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn entry(level: &str, message: &str) -> LogEntry {
        LogEntry {
            timestamp: SystemTime::now(),
            level: level.to_string(),
            target: "echocatalog::api".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_ceiling_hides_verbose_entries() {
        let all = LogQuery::default();
        assert!(all.accepts(&entry("ERROR", "x"), Level::INFO));
        assert!(all.accepts(&entry("info", "x"), Level::INFO));
        assert!(!all.accepts(&entry("DEBUG", "x"), Level::INFO));
        assert!(!all.accepts(&entry("NOPE", "x"), Level::TRACE));
    }

    #[test]
    fn test_level_flags_and_search() {
        let warn = entry("WARN", "channel not found");
        let info = entry("INFO", "episode created");

        let only_warn = LogQuery {
            warn: true,
            ..Default::default()
        };
        assert!(only_warn.accepts(&warn, Level::TRACE));
        assert!(!only_warn.accepts(&info, Level::TRACE));

        let search = LogQuery {
            search: Some("episode".into()),
            ..Default::default()
        };
        assert!(!search.accepts(&warn, Level::TRACE));
        assert!(search.accepts(&info, Level::TRACE));
        assert!(!search.accepts(&entry("DEBUG", "x"), Level::TRACE));
    }
}

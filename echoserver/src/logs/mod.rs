//! Logs d'EchoWave : `tracing` alimente un buffer circulaire en mémoire,
//! relu par `/log-dump` et diffusé en direct par `/log-sse`.

mod filter;
mod routes;
mod sselayer;

pub use filter::LogQuery;
pub use routes::{
    LogLevelRequest, LogLevelStatus, LogsApiDoc, create_logs_router, log_dump, log_sse,
};
pub use sselayer::SseLayer;

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, RwLock},
    time::SystemTime,
};

use echoconfig::Config;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::Level;
use tracing_subscriber::{
    Registry, filter::LevelFilter, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

type FilterHandle = reload::Handle<LevelFilter, Registry>;

/// Nombre d'entrées en attente par abonné SSE avant décrochage
const LIVE_BACKLOG: usize = 256;

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub level: String,
    pub target: String,
    pub message: String,
}

/// Buffer de logs partagé entre le layer tracing et les routes HTTP
#[derive(Clone)]
pub struct LogState {
    inner: Arc<Shared>,
}

struct Shared {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
    live: broadcast::Sender<LogEntry>,
    level: RwLock<Level>,
    filter: Option<FilterHandle>,
}

impl LogState {
    /// `filter` est le filtre global à recharger quand le niveau change ;
    /// sans lui, seul l'affichage SSE suit le niveau.
    pub fn new(capacity: usize, filter: Option<FilterHandle>) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Shared {
                entries: Mutex::new(VecDeque::with_capacity(capacity)),
                capacity,
                live: broadcast::channel(LIVE_BACKLOG).0,
                level: RwLock::new(Level::TRACE),
                filter,
            }),
        }
    }

    pub fn max_level(&self) -> Level {
        *self.inner.level.read().unwrap()
    }

    pub fn set_max_level(&self, level: Level) {
        *self.inner.level.write().unwrap() = level;
        if let Some(handle) = &self.inner.filter {
            if let Err(e) = handle.reload(LevelFilter::from_level(level)) {
                tracing::warn!("Failed to reload log level filter: {}", e);
            }
        }
    }

    fn push(&self, entry: LogEntry) {
        {
            let mut entries = self.inner.entries.lock().unwrap();
            if entries.len() == self.inner.capacity {
                entries.pop_front();
            }
            entries.push_back(entry.clone());
        }
        // Personne n'écoute : pas une erreur
        let _ = self.inner.live.send(entry);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.inner.live.subscribe()
    }

    /// Copie du buffer, de la plus ancienne à la plus récente entrée
    pub fn dump(&self) -> Vec<LogEntry> {
        self.inner.entries.lock().unwrap().iter().cloned().collect()
    }
}

/// Réglages du logging au démarrage
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    pub buffer_capacity: usize,
    pub min_level: Level,
    /// Recopie des logs sur la console
    pub enable_console: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: 1000,
            min_level: Level::INFO,
            enable_console: true,
        }
    }
}

impl LoggingOptions {
    /// Lit les clés `host.logger.*` de la configuration
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            buffer_capacity: config
                .get_log_cache_size()
                .unwrap_or(defaults.buffer_capacity),
            min_level: config
                .get_log_min_level()
                .and_then(|l| filter::parse_level(&l))
                .unwrap_or(defaults.min_level),
            enable_console: config
                .get_log_enable_console()
                .unwrap_or(defaults.enable_console),
        }
    }
}

/// Installe le subscriber global et renvoie le buffer qu'il alimente
///
/// Si un subscriber est déjà installé (tests, double appel), le `LogState`
/// renvoyé reste vide.
pub fn init_logging(options: LoggingOptions) -> LogState {
    let (level_filter, handle) = reload::Layer::new(LevelFilter::from_level(options.min_level));
    let state = LogState::new(options.buffer_capacity, Some(handle));
    *state.inner.level.write().unwrap() = options.min_level;

    let console = options.enable_console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(true)
    });

    // Le filtre doit précéder le SseLayer pour s'y appliquer
    let installed = Registry::default()
        .with(level_filter)
        .with(SseLayer::new(state.clone()))
        .with(console)
        .try_init();
    if let Err(e) = installed {
        eprintln!("Logging already initialised: {}", e);
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            timestamp: SystemTime::now(),
            level: "INFO".to_string(),
            target: "echocatalog::api".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_buffer_keeps_latest_entries() {
        let state = LogState::new(2, None);
        for m in ["a", "b", "c"] {
            state.push(entry(m));
        }

        let messages: Vec<_> = state.dump().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["b", "c"]);
    }

    #[test]
    fn test_zero_capacity_still_keeps_one() {
        let state = LogState::new(0, None);
        state.push(entry("a"));
        state.push(entry("b"));
        assert_eq!(state.dump().len(), 1);
    }

    #[tokio::test]
    async fn test_subscribers_see_new_entries() {
        let state = LogState::new(4, None);
        let mut rx = state.subscribe();
        state.push(entry("live"));
        assert_eq!(rx.recv().await.unwrap().message, "live");
    }
}

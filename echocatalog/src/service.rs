//! Service catalogue : règles métier au-dessus du store.

use crate::db::CatalogStore;
use crate::{Error, Result};
use chrono::Utc;
use echomodel::{Channel, ChannelDraft, DeletedResource, Episode, EpisodeDraft, HealthStatus};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Paramètres du service catalogue, fournis explicitement à la construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSettings {
    /// URL de connexion à la base ; `None` si non configurée
    pub database_url: Option<String>,
}

impl CatalogSettings {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: Some(database_url.into()),
        }
    }

    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Une URL non vide est présente
    pub fn database_url_configured(&self) -> bool {
        self.database_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}

/// Service CRUD du catalogue
///
/// Clonable à moindre coût : c'est l'état partagé des handlers Axum.
#[derive(Clone, Debug)]
pub struct Catalog {
    settings: Arc<CatalogSettings>,
    store: Arc<CatalogStore>,
}

impl Catalog {
    pub fn new(settings: CatalogSettings) -> Self {
        let url = settings
            .database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty());
        let store = CatalogStore::new(url);
        Self {
            settings: Arc::new(settings),
            store: Arc::new(store),
        }
    }

    /// Construit le service sur un store existant
    pub fn with_store(settings: CatalogSettings, store: CatalogStore) -> Self {
        Self {
            settings: Arc::new(settings),
            store: Arc::new(store),
        }
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    pub fn list_channels(&self) -> Result<Vec<Channel>> {
        self.store.list_channels()
    }

    pub fn get_channel(&self, id: &str) -> Result<Channel> {
        self.store.get_channel(id)?.ok_or_else(Error::channel_not_found)
    }

    pub fn create_channel(&self, draft: ChannelDraft) -> Result<Channel> {
        let channel = Channel {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            cover_art_url: draft.cover_art_url,
        };
        self.store.insert_channel(&channel)?;
        info!(channel_id = %channel.id, "Channel created");
        Ok(channel)
    }

    pub fn update_channel(&self, id: &str, draft: ChannelDraft) -> Result<Channel> {
        let channel = self
            .store
            .update_channel(id, &draft)?
            .ok_or_else(Error::channel_not_found)?;
        debug!(channel_id = %id, "Channel updated");
        Ok(channel)
    }

    /// Supprime une chaîne et tous ses épisodes
    pub fn delete_channel(&self, id: &str) -> Result<DeletedResource> {
        match self.store.delete_channel(id)? {
            Some(episodes) => {
                info!(channel_id = %id, episodes, "Channel deleted with its episodes");
                Ok(DeletedResource { id: id.to_string() })
            }
            None => Err(Error::channel_not_found()),
        }
    }

    /// Liste les épisodes d'une chaîne existante
    pub fn list_episodes(&self, channel_id: &str) -> Result<Vec<Episode>> {
        self.get_channel(channel_id)?;
        self.store.list_episodes(channel_id)
    }

    pub fn get_episode(&self, id: &str) -> Result<Episode> {
        self.store.get_episode(id)?.ok_or_else(Error::episode_not_found)
    }

    /// Crée un épisode daté de maintenant dans une chaîne existante
    pub fn create_episode(&self, channel_id: &str, draft: EpisodeDraft) -> Result<Episode> {
        let episode = Episode {
            id: Uuid::new_v4().to_string(),
            channel_id: channel_id.to_string(),
            title: draft.title,
            description: draft.description,
            audio_url: draft.audio_url,
            published_at: Utc::now(),
        };
        self.store.insert_episode(&episode)?;
        info!(channel_id = %channel_id, episode_id = %episode.id, "Episode created");
        Ok(episode)
    }

    /// Met à jour titre, description et URL audio d'un épisode
    pub fn update_episode(&self, id: &str, draft: EpisodeDraft) -> Result<Episode> {
        self.store
            .update_episode(id, &draft)?
            .ok_or_else(Error::episode_not_found)
    }

    pub fn delete_episode(&self, id: &str) -> Result<DeletedResource> {
        if self.store.delete_episode(id)? {
            info!(episode_id = %id, "Episode deleted");
            Ok(DeletedResource { id: id.to_string() })
        } else {
            Err(Error::episode_not_found())
        }
    }

    /// État du backend, recalculé à chaque appel
    pub fn health(&self) -> HealthStatus {
        let database_connected = match self.store.ping() {
            Ok(()) => true,
            Err(e) => {
                warn!("Health check failed: {}", e);
                false
            }
        };
        HealthStatus {
            database_url_configured: self.settings.database_url_configured(),
            database_connected,
            timestamp: Utc::now(),
        }
    }
}

//! Gestion de la persistance SQLite du catalogue
//!
//! Deux tables : `channels` et `episodes`, la seconde référençant la première
//! avec `ON DELETE CASCADE`. Les clés étrangères sont activées sur chaque
//! connexion.

use crate::location::DatabaseLocation;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use echomodel::{Channel, ChannelDraft, Episode, EpisodeDraft};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Mutex;
use tracing::{info, warn};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS channels (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        cover_art_url TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS episodes (
        id TEXT PRIMARY KEY,
        channel_id TEXT NOT NULL REFERENCES channels(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        audio_url TEXT NOT NULL,
        published_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_episodes_channel ON episodes(channel_id);
";

const CHANNEL_COLUMNS: &str = "id, title, description, cover_art_url";
const EPISODE_COLUMNS: &str = "id, channel_id, title, description, audio_url, published_at";

/// Accès SQLite du catalogue
///
/// La connexion est ouverte au premier usage. Si l'ouverture échoue, elle
/// sera retentée à la requête suivante.
#[derive(Debug)]
pub struct CatalogStore {
    location: std::result::Result<DatabaseLocation, String>,
    conn: Mutex<Option<Connection>>,
}

impl CatalogStore {
    /// Prépare un store pour l'URL donnée, sans se connecter
    ///
    /// Une URL absente ou invalide ne fait pas échouer la construction :
    /// chaque opération renverra alors [`Error::Connectivity`].
    pub fn new(database_url: Option<&str>) -> Self {
        let location = match database_url {
            Some(url) => DatabaseLocation::parse(url),
            None => Err("DATABASE_URL is not configured".to_string()),
        };
        if let Err(e) = &location {
            warn!("Catalog database unusable: {}", e);
        }
        Self {
            location,
            conn: Mutex::new(None),
        }
    }

    /// Ouvre immédiatement une base en mémoire (tests, démonstrations)
    pub fn in_memory() -> Result<Self> {
        let store = Self::new(Some("sqlite::memory:"));
        store.ping()?;
        Ok(store)
    }

    fn open(location: &DatabaseLocation) -> Result<Connection> {
        let conn = match location {
            DatabaseLocation::Memory => Connection::open_in_memory(),
            DatabaseLocation::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        Error::Connectivity(format!("Failed to create directory: {}", e))
                    })?;
                }
                Connection::open(path)
            }
        }
        .map_err(|e| Error::Connectivity(format!("Failed to open database: {}", e)))?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| Error::Connectivity(format!("Failed to enable foreign keys: {}", e)))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| Error::Persistence(format!("Failed to create schema: {}", e)))?;

        info!(database = %location, "Catalog database opened");
        Ok(conn)
    }

    fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> rusqlite::Result<T>) -> Result<T> {
        let location = self.location.as_ref().map_err(|e| Error::Connectivity(e.clone()))?;

        let mut guard = self.conn.lock().unwrap();
        if guard.is_none() {
            *guard = Some(Self::open(location)?);
        }
        match guard.as_mut() {
            Some(conn) => Ok(f(conn)?),
            None => Err(Error::Connectivity("connection unavailable".to_string())),
        }
    }

    /// Vérifie que la base répond (`SELECT 1`)
    pub fn ping(&self) -> Result<()> {
        self.with_conn(|conn| conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)))
            .map(|_| ())
    }

    /// Liste les chaînes dans l'ordre d'insertion
    pub fn list_channels(&self) -> Result<Vec<Channel>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM channels ORDER BY rowid ASC",
                CHANNEL_COLUMNS
            ))?;
            let rows = stmt.query_map([], channel_from_row)?;
            rows.collect()
        })
    }

    pub fn get_channel(&self, id: &str) -> Result<Option<Channel>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM channels WHERE id = ?1", CHANNEL_COLUMNS),
                params![id],
                channel_from_row,
            )
            .optional()
        })
    }

    pub fn insert_channel(&self, channel: &Channel) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO channels (id, title, description, cover_art_url)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    channel.id,
                    channel.title,
                    channel.description,
                    channel.cover_art_url
                ],
            )
        })
        .map(|_| ())
    }

    /// Met à jour une chaîne ; `None` si elle n'existe pas
    pub fn update_channel(&self, id: &str, draft: &ChannelDraft) -> Result<Option<Channel>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "UPDATE channels SET title = ?1, description = ?2, cover_art_url = ?3
                     WHERE id = ?4 RETURNING {}",
                    CHANNEL_COLUMNS
                ),
                params![draft.title, draft.description, draft.cover_art_url, id],
                channel_from_row,
            )
            .optional()
        })
    }

    /// Supprime les épisodes d'une chaîne puis la chaîne elle-même
    ///
    /// Les deux suppressions forment une seule transaction : un lecteur
    /// concurrent voit soit la chaîne complète, soit plus rien. Renvoie le
    /// nombre d'épisodes supprimés, ou `None` si la chaîne n'existe pas.
    pub fn delete_channel(&self, id: &str) -> Result<Option<usize>> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let episodes = tx.execute("DELETE FROM episodes WHERE channel_id = ?1", params![id])?;
            let deleted: Option<String> = tx
                .query_row(
                    "DELETE FROM channels WHERE id = ?1 RETURNING id",
                    params![id],
                    |row| row.get(0),
                )
                .optional()?;

            match deleted {
                Some(_) => {
                    tx.commit()?;
                    Ok(Some(episodes))
                }
                // Rollback implicite au drop
                None => Ok(None),
            }
        })
    }

    /// Liste les épisodes d'une chaîne, les plus récents d'abord
    pub fn list_episodes(&self, channel_id: &str) -> Result<Vec<Episode>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM episodes WHERE channel_id = ?1
                 ORDER BY published_at DESC, rowid DESC",
                EPISODE_COLUMNS
            ))?;
            let rows = stmt.query_map(params![channel_id], episode_from_row)?;
            rows.collect()
        })
    }

    pub fn get_episode(&self, id: &str) -> Result<Option<Episode>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM episodes WHERE id = ?1", EPISODE_COLUMNS),
                params![id],
                episode_from_row,
            )
            .optional()
        })
    }

    /// Insère un épisode
    ///
    /// Une violation de clé étrangère (chaîne supprimée entre-temps) est
    /// rapportée comme chaîne introuvable.
    pub fn insert_episode(&self, episode: &Episode) -> Result<()> {
        let inserted = self.with_conn(|conn| {
            let outcome = conn.execute(
                "INSERT INTO episodes (id, channel_id, title, description, audio_url, published_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    episode.id,
                    episode.channel_id,
                    episode.title,
                    episode.description,
                    episode.audio_url,
                    episode.published_at
                ],
            );
            match outcome {
                Ok(_) => Ok(true),
                Err(e) if is_foreign_key_violation(&e) => Ok(false),
                Err(e) => Err(e),
            }
        })?;

        if inserted {
            Ok(())
        } else {
            Err(Error::channel_not_found())
        }
    }

    /// Met à jour titre, description et URL audio ; `None` si l'épisode n'existe pas
    pub fn update_episode(&self, id: &str, draft: &EpisodeDraft) -> Result<Option<Episode>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "UPDATE episodes SET title = ?1, description = ?2, audio_url = ?3
                     WHERE id = ?4 RETURNING {}",
                    EPISODE_COLUMNS
                ),
                params![draft.title, draft.description, draft.audio_url, id],
                episode_from_row,
            )
            .optional()
        })
    }

    /// Supprime un épisode ; `false` s'il n'existait pas
    pub fn delete_episode(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| conn.execute("DELETE FROM episodes WHERE id = ?1", params![id]))
            .map(|n| n > 0)
    }
}

fn channel_from_row(row: &Row<'_>) -> rusqlite::Result<Channel> {
    Ok(Channel {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        cover_art_url: row.get(3)?,
    })
}

fn episode_from_row(row: &Row<'_>) -> rusqlite::Result<Episode> {
    let published_at: DateTime<Utc> = row.get(5)?;
    Ok(Episode {
        id: row.get(0)?,
        channel_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        audio_url: row.get(4)?,
        published_at,
    })
}

fn is_foreign_key_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn channel(id: &str) -> Channel {
        Channel {
            id: id.to_string(),
            title: format!("Channel {}", id),
            description: "a channel description".to_string(),
            cover_art_url: "https://x/cover.png".to_string(),
        }
    }

    fn episode(id: &str, channel_id: &str, published_at: DateTime<Utc>) -> Episode {
        Episode {
            id: id.to_string(),
            channel_id: channel_id.to_string(),
            title: format!("Episode {}", id),
            description: "an episode description".to_string(),
            audio_url: format!("https://x/{}.mp3", id),
            published_at,
        }
    }

    #[test]
    fn test_unconfigured_store_reports_connectivity() {
        let store = CatalogStore::new(None);
        assert!(matches!(store.ping(), Err(Error::Connectivity(_))));
        assert!(matches!(store.list_channels(), Err(Error::Connectivity(_))));
    }

    #[test]
    fn test_foreign_scheme_reports_connectivity() {
        let store = CatalogStore::new(Some("postgres://db.example/echowave"));
        assert!(matches!(store.ping(), Err(Error::Connectivity(_))));
    }

    #[test]
    fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("catalog.db");
        let store = CatalogStore::new(Some(&format!("sqlite://{}", path.display())));

        store.ping().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_channel_crud() {
        let store = CatalogStore::in_memory().unwrap();
        store.insert_channel(&channel("a")).unwrap();
        store.insert_channel(&channel("b")).unwrap();

        let ids: Vec<_> = store.list_channels().unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let draft = ChannelDraft {
            title: "Renamed".into(),
            description: "new description".into(),
            cover_art_url: "https://x/new.png".into(),
        };
        let updated = store.update_channel("a", &draft).unwrap().unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(store.get_channel("a").unwrap(), Some(updated));
        assert_eq!(store.update_channel("missing", &draft).unwrap(), None);
    }

    #[test]
    fn test_delete_channel_cascades() {
        let store = CatalogStore::in_memory().unwrap();
        let now = Utc::now();
        store.insert_channel(&channel("a")).unwrap();
        store.insert_channel(&channel("b")).unwrap();
        store.insert_episode(&episode("e1", "a", now)).unwrap();
        store.insert_episode(&episode("e2", "a", now)).unwrap();
        store.insert_episode(&episode("e3", "b", now)).unwrap();

        assert_eq!(store.delete_channel("a").unwrap(), Some(2));
        assert_eq!(store.get_channel("a").unwrap(), None);
        assert_eq!(store.get_episode("e1").unwrap(), None);
        assert_eq!(store.get_episode("e2").unwrap(), None);
        assert!(store.get_episode("e3").unwrap().is_some());

        assert_eq!(store.delete_channel("a").unwrap(), None);
    }

    #[test]
    fn test_episode_requires_live_channel() {
        let store = CatalogStore::in_memory().unwrap();
        let err = store
            .insert_episode(&episode("e1", "ghost", Utc::now()))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(store.get_episode("e1").unwrap(), None);
    }

    #[test]
    fn test_other_constraint_failures_stay_persistence_errors() {
        let store = CatalogStore::in_memory().unwrap();
        let now = Utc::now();
        store.insert_channel(&channel("a")).unwrap();
        store.insert_episode(&episode("e1", "a", now)).unwrap();

        // Clé primaire dupliquée
        let err = store.insert_episode(&episode("e1", "a", now)).unwrap_err();
        assert!(matches!(err, Error::Persistence(_)), "{:?}", err);
    }

    #[test]
    fn test_episodes_newest_first() {
        let store = CatalogStore::in_memory().unwrap();
        let now = Utc::now();
        store.insert_channel(&channel("a")).unwrap();
        store.insert_episode(&episode("old", "a", now - Duration::days(2))).unwrap();
        store.insert_episode(&episode("new", "a", now)).unwrap();
        store.insert_episode(&episode("mid", "a", now - Duration::days(1))).unwrap();

        let ids: Vec<_> = store.list_episodes("a").unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_published_at_text_sorts_chronologically() {
        let store = CatalogStore::in_memory().unwrap();
        let whole = DateTime::parse_from_rfc3339("2026-10-18T11:07:34Z")
            .unwrap()
            .with_timezone(&Utc);
        store.insert_channel(&channel("a")).unwrap();
        store.insert_episode(&episode("whole", "a", whole)).unwrap();
        store
            .insert_episode(&episode("half", "a", whole + Duration::milliseconds(500)))
            .unwrap();
        store
            .insert_episode(&episode("quarter", "a", whole + Duration::milliseconds(250)))
            .unwrap();

        let stored: Vec<String> = store
            .with_conn(|conn| {
                let mut stmt =
                    conn.prepare("SELECT published_at FROM episodes ORDER BY rowid ASC")?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect()
            })
            .unwrap();
        assert_eq!(
            stored,
            vec![
                "2026-10-18 11:07:34+00:00",
                "2026-10-18 11:07:34.500+00:00",
                "2026-10-18 11:07:34.250+00:00",
            ]
        );

        let ids: Vec<_> = store.list_episodes("a").unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["half", "quarter", "whole"]);
        assert_eq!(store.get_episode("whole").unwrap().unwrap().published_at, whole);
    }

    #[test]
    fn test_update_episode_keeps_channel_and_date() {
        let store = CatalogStore::in_memory().unwrap();
        let published = Utc::now() - Duration::hours(3);
        store.insert_channel(&channel("a")).unwrap();
        store.insert_episode(&episode("e1", "a", published)).unwrap();

        let draft = EpisodeDraft {
            title: "Pilot (remastered)".into(),
            description: "remastered audio".into(),
            audio_url: "https://x/e1-v2.mp3".into(),
        };
        let updated = store.update_episode("e1", &draft).unwrap().unwrap();
        assert_eq!(updated.channel_id, "a");
        assert_eq!(updated.published_at, published);
        assert_eq!(updated.audio_url, "https://x/e1-v2.mp3");

        assert!(store.delete_episode("e1").unwrap());
        assert!(!store.delete_episode("e1").unwrap());
    }
}

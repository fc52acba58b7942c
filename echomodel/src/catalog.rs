//! Entités du catalogue : chaînes (podcasts) et épisodes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Une chaîne de podcast, propriétaire de zéro ou plusieurs épisodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// Identifiant opaque (UUID v4 généré par le serveur)
    #[cfg_attr(feature = "openapi", schema(example = "4f9c2a4e-8f1b-4c55-9d39-0b1e6f0f7a10"))]
    pub id: String,
    #[cfg_attr(feature = "openapi", schema(example = "Synth"))]
    pub title: String,
    pub description: String,
    #[cfg_attr(feature = "openapi", schema(example = "https://example.com/cover.png"))]
    pub cover_art_url: String,
}

/// Un épisode audio appartenant à exactement une chaîne.
///
/// `channel_id` et `published_at` sont fixés à la création et ne sont pas
/// modifiables via l'API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    pub channel_id: String,
    pub title: String,
    pub description: String,
    #[cfg_attr(feature = "openapi", schema(example = "https://example.com/episode-1.mp3"))]
    pub audio_url: String,
    pub published_at: DateTime<Utc>,
}

/// Corps de requête pour créer ou éditer une chaîne.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChannelDraft {
    pub title: String,
    pub description: String,
    pub cover_art_url: String,
}

/// Corps de requête pour créer ou éditer un épisode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EpisodeDraft {
    pub title: String,
    pub description: String,
    pub audio_url: String,
}

/// Réponse des suppressions : l'identifiant de la ligne supprimée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DeletedResource {
    pub id: String,
}

impl From<&Channel> for ChannelDraft {
    fn from(channel: &Channel) -> Self {
        Self {
            title: channel.title.clone(),
            description: channel.description.clone(),
            cover_art_url: channel.cover_art_url.clone(),
        }
    }
}

impl From<&Episode> for EpisodeDraft {
    fn from(episode: &Episode) -> Self {
        Self {
            title: episode.title.clone(),
            description: episode.description.clone(),
            audio_url: episode.audio_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_channel_uses_camel_case_on_the_wire() {
        let channel = Channel {
            id: "c1".into(),
            title: "Synth".into(),
            description: "desc long enough".into(),
            cover_art_url: "https://x/y.png".into(),
        };

        let value = serde_json::to_value(&channel).unwrap();
        assert_eq!(value["coverArtUrl"], "https://x/y.png");
        assert!(value.get("cover_art_url").is_none());
    }

    #[test]
    fn test_episode_parses_iso_timestamp() {
        let value = json!({
            "id": "e1",
            "channelId": "c1",
            "title": "Pilot",
            "description": "first episode",
            "audioUrl": "https://x/e1.mp3",
            "publishedAt": "2024-03-01T12:00:00Z"
        });

        let episode: Episode = serde_json::from_value(value).unwrap();
        assert_eq!(episode.channel_id, "c1");
        assert_eq!(
            episode.published_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
        );
    }
}

//! Liaison entre le store de lecture et un élément média.

use crate::media::MediaElement;
use crate::store::PlaybackStore;
use tracing::{debug, error};

/// Formate une durée en secondes en `MM:SS`
///
/// Les minutes ne sont pas converties en heures (`75:00` pour 4500 s).
/// Valeur absente, non finie, négative ou inférieure à une seconde : `00:00`.
pub fn format_time(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s.is_finite() && s >= 1.0 => {
            let total = s.floor() as u64;
            format!("{:02}:{:02}", total / 60, total % 60)
        }
        _ => "00:00".to_string(),
    }
}

/// Surface de lecture : applique l'état du store à un [`MediaElement`]
///
/// La position et la durée exposées sont rafraîchies par les évènements
/// du média (`on_time_update`, `on_loaded_metadata`) et par `seek`.
#[derive(Debug)]
pub struct PlaybackSurface<M: MediaElement> {
    media: M,
    elapsed: f64,
    duration: Option<f64>,
}

impl<M: MediaElement> PlaybackSurface<M> {
    pub fn new(media: M) -> Self {
        Self {
            media,
            elapsed: 0.0,
            duration: None,
        }
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn into_media(self) -> M {
        self.media
    }

    /// Applique l'état courant du store au média
    ///
    /// Une nouvelle source est chargée avant play/pause. Un échec de
    /// lecture est journalisé puis ignoré.
    pub fn sync(&mut self, store: &PlaybackStore) {
        let Some(episode) = store.current_episode() else {
            self.media.pause();
            self.media.set_source(None);
            self.elapsed = 0.0;
            self.duration = None;
            return;
        };

        if self.media.source() != Some(episode.audio_url.as_str()) {
            debug!(episode_id = %episode.id, url = %episode.audio_url, "Loading media source");
            self.media.set_source(Some(&episode.audio_url));
            self.elapsed = 0.0;
            self.duration = None;
            if let Err(e) = self.media.load() {
                error!(episode_id = %episode.id, "Failed to load media: {}", e);
            }
        }

        if store.is_playing() {
            if let Err(e) = self.media.play() {
                error!(episode_id = %episode.id, "Playback failed: {}", e);
            }
        } else {
            self.media.pause();
        }
    }

    /// Évènement « timeupdate » du média
    pub fn on_time_update(&mut self) {
        self.elapsed = self.media.current_time();
    }

    /// Évènement « loadedmetadata » du média
    pub fn on_loaded_metadata(&mut self) {
        self.duration = self.media.duration();
    }

    /// Déplace la lecture, bornée à `[0, durée]`
    ///
    /// Durée inconnue : la borne haute vaut 0. Une cible NaN est ignorée.
    pub fn seek(&mut self, target: f64) {
        if target.is_nan() {
            return;
        }
        let max = self
            .duration
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(0.0);
        let position = target.clamp(0.0, max);
        self.media.set_current_time(position);
        self.elapsed = position;
    }

    /// Position courante en secondes
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn elapsed_label(&self) -> String {
        format_time(Some(self.elapsed))
    }

    pub fn duration_label(&self) -> String {
        format_time(self.duration)
    }
}

//! Machine à états de lecture.

use echomodel::Episode;
use tracing::debug;

/// État logique du lecteur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Aucun épisode chargé
    Idle,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "IDLE",
            PlaybackState::Playing => "PLAYING",
            PlaybackState::Paused => "PAUSED",
        }
    }
}

/// Épisode courant et indicateur de lecture
///
/// Un seul écrivain, pas de verrou : les commandes se succèdent et la
/// dernière l'emporte. `is_playing` est toujours faux sans épisode.
#[derive(Debug, Clone, Default)]
pub struct PlaybackStore {
    current: Option<Episode>,
    playing: bool,
}

impl PlaybackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_episode(&self) -> Option<&Episode> {
        self.current.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn state(&self) -> PlaybackState {
        match (&self.current, self.playing) {
            (None, _) => PlaybackState::Idle,
            (Some(_), true) => PlaybackState::Playing,
            (Some(_), false) => PlaybackState::Paused,
        }
    }

    /// Lance un épisode
    ///
    /// Même identifiant que l'épisode chargé : bascule lecture/pause sans
    /// recharger. Autre épisode : il remplace le courant et la lecture
    /// repart, quel que soit l'état précédent.
    pub fn play_episode(&mut self, episode: Episode) {
        match &self.current {
            Some(current) if current.id == episode.id => self.toggle_play_pause(),
            _ => {
                debug!(episode_id = %episode.id, "Loading episode");
                self.current = Some(episode);
                self.playing = true;
            }
        }
    }

    /// Bascule lecture/pause ; sans effet si rien n'est chargé
    pub fn toggle_play_pause(&mut self) {
        if self.current.is_some() {
            self.playing = !self.playing;
        }
    }

    pub fn stop(&mut self) {
        self.current = None;
        self.playing = false;
    }

    /// Fin naturelle du média : équivaut à `toggle_play_pause`
    ///
    /// L'épisode reste chargé ; il n'y a pas de file d'attente.
    pub fn on_ended(&mut self) {
        self.toggle_play_pause();
    }
}

//! Lecteur complet : store + surface.

use crate::media::MediaElement;
use crate::store::{PlaybackState, PlaybackStore};
use crate::surface::PlaybackSurface;
use echomodel::Episode;

/// Lecteur audio possédé par la couche d'affichage
///
/// Chaque commande met à jour le store puis resynchronise la surface.
#[derive(Debug)]
pub struct Player<M: MediaElement> {
    store: PlaybackStore,
    surface: PlaybackSurface<M>,
}

impl<M: MediaElement> Player<M> {
    pub fn new(media: M) -> Self {
        Self {
            store: PlaybackStore::new(),
            surface: PlaybackSurface::new(media),
        }
    }

    pub fn store(&self) -> &PlaybackStore {
        &self.store
    }

    pub fn surface(&self) -> &PlaybackSurface<M> {
        &self.surface
    }

    pub fn state(&self) -> PlaybackState {
        self.store.state()
    }

    pub fn current_episode(&self) -> Option<&Episode> {
        self.store.current_episode()
    }

    pub fn play_episode(&mut self, episode: Episode) {
        self.store.play_episode(episode);
        self.surface.sync(&self.store);
    }

    pub fn toggle_play_pause(&mut self) {
        self.store.toggle_play_pause();
        self.surface.sync(&self.store);
    }

    pub fn stop(&mut self) {
        self.store.stop();
        self.surface.sync(&self.store);
    }

    pub fn on_ended(&mut self) {
        self.store.on_ended();
        self.surface.sync(&self.store);
    }

    pub fn on_time_update(&mut self) {
        self.surface.on_time_update();
    }

    pub fn on_loaded_metadata(&mut self) {
        self.surface.on_loaded_metadata();
    }

    pub fn seek(&mut self, target: f64) {
        self.surface.seek(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::testing::{FakeMedia, episode};

    #[test]
    fn test_listening_session() {
        let mut player = Player::new(FakeMedia::default());

        player.play_episode(episode("a"));
        assert_eq!(player.state(), PlaybackState::Playing);
        assert!(player.surface().media().playing);

        player.surface.media_mut().total = Some(300.0);
        player.on_loaded_metadata();
        player.seek(299.5);
        assert_eq!(player.surface().elapsed_label(), "04:59");

        player.on_ended();
        assert_eq!(player.state(), PlaybackState::Paused);
        assert_eq!(player.current_episode().map(|e| e.id.as_str()), Some("a"));
        assert!(!player.surface().media().playing);

        player.play_episode(episode("b"));
        assert_eq!(player.state(), PlaybackState::Playing);
        assert_eq!(player.surface().media().source(), Some("https://x/b.mp3"));
        assert_eq!(player.surface().elapsed_label(), "00:00");

        player.stop();
        assert_eq!(player.state(), PlaybackState::Idle);
        assert!(player.surface().media().source().is_none());
    }

    #[test]
    fn test_toggle_without_episode() {
        let mut player = Player::new(FakeMedia::default());
        player.toggle_play_pause();
        assert_eq!(player.state(), PlaybackState::Idle);
        assert!(!player.surface().media().playing);
    }
}

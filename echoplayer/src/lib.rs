//! # echoplayer - Lecture audio des épisodes
//!
//! Deux pièces :
//! - [`PlaybackStore`] : machine à états « quel épisode est chargé, et joue-t-il ? »
//!   pilotée par quatre commandes (`play_episode`, `toggle_play_pause`, `stop`,
//!   fin de lecture).
//! - [`PlaybackSurface`] : traduit les transitions du store en commandes pour un
//!   [`MediaElement`] et expose la progression (position, durée, `MM:SS`).
//!
//! [`Player`] assemble les deux. Le store est un objet possédé explicitement,
//! injecté là où on en a besoin : il n'y a pas d'état global.
//!
//! ```
//! use echoplayer::{PlaybackState, PlaybackStore};
//! # use echomodel::Episode;
//! # fn demo(a: Episode) {
//! let mut store = PlaybackStore::new();
//! store.play_episode(a.clone());
//! assert_eq!(store.state(), PlaybackState::Playing);
//! store.play_episode(a);
//! assert_eq!(store.state(), PlaybackState::Paused);
//! # }
//! ```

mod media;
mod player;
mod store;
mod surface;

pub use media::{MediaElement, MediaError};
pub use player::Player;
pub use store::{PlaybackState, PlaybackStore};
pub use surface::{format_time, PlaybackSurface};

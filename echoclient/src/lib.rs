//! # echoclient - Client de l'API catalogue EchoWave
//!
//! - [`CatalogClient`] : une méthode async par endpoint REST, plus
//!   [`CatalogClient::fetch_channel_page`] qui charge chaîne et épisodes en
//!   parallèle
//! - [`ChannelForm`] / [`EpisodeForm`] : règles appliquées avant envoi
//! - [`Action`] / [`Outcome`] : ce que l'interface fait d'un échec
//!   (notification ou redirection)

mod client;
mod error;
mod forms;
mod outcome;

pub use client::{CatalogClient, ChannelPage, ClientBuilder, EpisodeTarget, DEFAULT_USER_AGENT};
pub use error::{ClientError, Result};
pub use forms::{
    ChannelForm, EpisodeForm, FieldError, FormErrors, MIN_DESCRIPTION_CHARS, MIN_TITLE_CHARS,
};
pub use outcome::{Action, Outcome};

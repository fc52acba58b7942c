//! # echomodel - Types partagés entre le serveur et les clients EchoWave
//!
//! Cette crate ne contient aucune I/O : uniquement les structures échangées
//! sur le fil (JSON, en camelCase) par l'API catalogue.
//!
//! - [`Channel`] / [`Episode`] : les deux entités du catalogue
//! - [`ChannelDraft`] / [`EpisodeDraft`] : corps des requêtes de création/édition
//! - [`ApiResponse`] : l'enveloppe uniforme `{ success, data?, error? }`
//! - [`HealthStatus`] : charge utile de `/api/health-check`
//!
//! La feature `openapi` dérive `utoipa::ToSchema` sur tous les types.

mod catalog;
mod envelope;
mod health;

pub use catalog::{Channel, ChannelDraft, DeletedResource, Episode, EpisodeDraft};
pub use envelope::ApiResponse;
pub use health::HealthStatus;

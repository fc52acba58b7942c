//! # echocatalog - Catalogue de podcasts (chaînes et épisodes)
//!
//! Cette crate fournit le backend CRUD d'EchoWave :
//! - Persistance SQLite (deux tables, clé étrangère avec suppression en cascade)
//! - Validation des corps de requête (rejet à la première contrainte violée)
//! - Endpoints REST Axum avec enveloppe uniforme `{ success, data?, error? }`
//! - Health check (URL configurée / base joignable, calculé à chaque requête)
//! - Documentation OpenAPI
//!
//! # Architecture
//!
//! - **CatalogStore** : accès SQLite, connexion ouverte paresseusement
//! - **Catalog** : service sans état métier, construit avec un [`CatalogSettings`] explicite
//! - **api** : handlers HTTP, simple traduction vers les opérations du service
//!
//! # Exemple d'utilisation
//!
//! ```no_run
//! use echocatalog::{Catalog, CatalogSettings};
//! use echomodel::ChannelDraft;
//!
//! # fn main() -> echocatalog::Result<()> {
//! let catalog = Catalog::new(CatalogSettings::new("sqlite://catalog.db"));
//!
//! let channel = catalog.create_channel(ChannelDraft {
//!     title: "Synth".into(),
//!     description: "desc long enough".into(),
//!     cover_art_url: "https://x/y.png".into(),
//! })?;
//! assert_eq!(catalog.get_channel(&channel.id)?, channel);
//! # Ok(())
//! # }
//! ```

pub mod api;
mod db;
mod error;
mod location;
pub mod openapi;
mod service;
mod validation;

#[cfg(feature = "echoconfig")]
mod config_ext;

pub use db::CatalogStore;
pub use error::{Error, Result};
pub use location::DatabaseLocation;
pub use openapi::ApiDoc;
pub use service::{Catalog, CatalogSettings};
pub use validation::{channel_draft_from_json, episode_draft_from_json, MAX_TITLE_LEN};

#[cfg(feature = "echoconfig")]
pub use config_ext::CatalogConfigExt;

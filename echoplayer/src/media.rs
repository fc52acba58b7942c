//! Abstraction de l'élément média piloté par la surface de lecture.

use thiserror::Error;

/// Erreurs remontées par un élément média
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// Lecture refusée par l'hôte (autoplay bloqué, etc.)
    #[error("Playback blocked: {0}")]
    Blocked(String),
    #[error("Decode error: {0}")]
    Decode(String),
    /// Source absente ou illisible
    #[error("Source error: {0}")]
    Source(String),
    #[error("{0}")]
    Other(String),
}

/// Capacités d'un lecteur audio (source / lecture / pause / position)
/// indépendamment du backend réel.
pub trait MediaElement {
    /// Source actuellement chargée, `None` si vide
    fn source(&self) -> Option<&str>;

    /// Remplace la source ; `None` la vide.
    fn set_source(&mut self, url: Option<&str>);

    /// Charge la source courante.
    fn load(&mut self) -> Result<(), MediaError>;

    /// Démarre ou reprend la lecture.
    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    /// Position courante en secondes
    fn current_time(&self) -> f64;

    /// Durée totale en secondes, `None` tant que les métadonnées ne sont pas connues
    fn duration(&self) -> Option<f64>;

    fn set_current_time(&mut self, seconds: f64);
}

//! Règles de validation des formulaires, appliquées avant envoi.
//!
//! Contrairement au serveur, qui s'arrête au premier champ invalide, un
//! formulaire rapporte toutes ses violations d'un coup.

use std::fmt;

use echomodel::{Channel, ChannelDraft, Episode, EpisodeDraft};
use url::Url;

pub const MIN_TITLE_CHARS: usize = 3;
pub const MIN_DESCRIPTION_CHARS: usize = 10;

const TITLE_TOO_SHORT: &str = "Title must be at least 3 characters long.";
const DESCRIPTION_TOO_SHORT: &str = "Description must be at least 10 characters long.";
const INVALID_IMAGE_URL: &str = "Please enter a valid image URL.";
const INVALID_AUDIO_URL: &str = "Please enter a valid audio URL.";

/// Violation d'une règle sur un champ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Nom du champ côté JSON (`title`, `coverArtUrl`, ...)
    pub field: &'static str,
    pub message: &'static str,
}

/// Ensemble des violations d'un formulaire, dans l'ordre des champs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    fn check(&mut self, ok: bool, field: &'static str, message: &'static str) {
        if !ok {
            self.0.push(FieldError { field, message });
        }
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.0.is_empty() { Ok(value) } else { Err(self) }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Message associé à un champ, s'il est invalide
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message).collect();
        write!(f, "{}", messages.join(" "))
    }
}

fn long_enough(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

/// URL absolue syntaxiquement valide
fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// Formulaire de création/édition d'une chaîne
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelForm {
    pub title: String,
    pub description: String,
    pub cover_art_url: String,
}

impl ChannelForm {
    pub fn validate(&self) -> Result<ChannelDraft, FormErrors> {
        let mut errors = FormErrors::default();
        errors.check(long_enough(&self.title, MIN_TITLE_CHARS), "title", TITLE_TOO_SHORT);
        errors.check(
            long_enough(&self.description, MIN_DESCRIPTION_CHARS),
            "description",
            DESCRIPTION_TOO_SHORT,
        );
        errors.check(is_valid_url(&self.cover_art_url), "coverArtUrl", INVALID_IMAGE_URL);

        errors.into_result(ChannelDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            cover_art_url: self.cover_art_url.clone(),
        })
    }
}

/// Préremplissage en mode édition
impl From<&Channel> for ChannelForm {
    fn from(channel: &Channel) -> Self {
        Self {
            title: channel.title.clone(),
            description: channel.description.clone(),
            cover_art_url: channel.cover_art_url.clone(),
        }
    }
}

/// Formulaire de création/édition d'un épisode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeForm {
    pub title: String,
    pub description: String,
    pub audio_url: String,
}

impl EpisodeForm {
    pub fn validate(&self) -> Result<EpisodeDraft, FormErrors> {
        let mut errors = FormErrors::default();
        errors.check(long_enough(&self.title, MIN_TITLE_CHARS), "title", TITLE_TOO_SHORT);
        errors.check(
            long_enough(&self.description, MIN_DESCRIPTION_CHARS),
            "description",
            DESCRIPTION_TOO_SHORT,
        );
        errors.check(is_valid_url(&self.audio_url), "audioUrl", INVALID_AUDIO_URL);

        errors.into_result(EpisodeDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            audio_url: self.audio_url.clone(),
        })
    }
}

impl From<&Episode> for EpisodeForm {
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

    #[test]
    fn test_valid_channel_form() {
        let draft = ChannelForm {
            title: "Synth".into(),
            description: "desc long enough".into(),
            cover_art_url: "https://x/y.png".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(draft.title, "Synth");
    }

    #[test]
    fn test_all_violations_reported() {
        let errors = ChannelForm {
            title: "ab".into(),
            description: "too short".into(),
            cover_art_url: "/cover.png".into(),
        }
        .validate()
        .unwrap_err();

        let fields: Vec<&str> = errors.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["title", "description", "coverArtUrl"]);
        assert_eq!(errors.get("coverArtUrl"), Some("Please enter a valid image URL."));
        assert_eq!(
            errors.to_string(),
            "Title must be at least 3 characters long. \
             Description must be at least 10 characters long. \
             Please enter a valid image URL."
        );
    }

    #[test]
    fn test_episode_form_rules() {
        let mut form = EpisodeForm {
            title: "Pilot".into(),
            description: "0123456789".into(),
            audio_url: "not a url".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.get("audioUrl"), Some("Please enter a valid audio URL."));

        form.audio_url = "https://x/pilot.mp3".into();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_lengths_count_characters() {
        let form = EpisodeForm {
            title: "été".into(),
            description: "éééééééééé".into(),
            audio_url: "https://x/e.mp3".into(),
        };
        assert!(form.validate().is_ok());
    }
}

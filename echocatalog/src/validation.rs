//! Validation des corps de requête
//!
//! Le serveur vérifie seulement la présence et le type des champs requis
//! (chaînes non vides). La syntaxe des URL n'est pas revérifiée ici : c'est
//! le formulaire client qui s'en charge.

use crate::{Error, Result};
use axum::extract::rejection::JsonRejection;
use axum::Json;
use echomodel::{ChannelDraft, EpisodeDraft};
use serde_json::{Map, Value};

/// Longueur maximale d'un titre, en caractères
pub const MAX_TITLE_LEN: usize = 256;

/// Valide le corps JSON d'une création/édition de chaîne
///
/// Les champs sont examinés dans l'ordre `title`, `description`,
/// `coverArtUrl` ; la première violation est renvoyée.
pub fn channel_draft_from_json(body: &Value) -> Result<ChannelDraft> {
    let object = as_object(body)?;
    Ok(ChannelDraft {
        title: title(object)?,
        description: required_string(object, "description")?,
        cover_art_url: required_string(object, "coverArtUrl")?,
    })
}

/// Valide le corps JSON d'une création/édition d'épisode
///
/// `channelId` et `publishedAt` éventuellement présents sont ignorés.
pub fn episode_draft_from_json(body: &Value) -> Result<EpisodeDraft> {
    let object = as_object(body)?;
    Ok(EpisodeDraft {
        title: title(object)?,
        description: required_string(object, "description")?,
        audio_url: required_string(object, "audioUrl")?,
    })
}

/// Convertit le résultat de l'extracteur JSON d'Axum en erreur de validation
pub(crate) fn json_body(body: std::result::Result<Json<Value>, JsonRejection>) -> Result<Value> {
    body.map(|Json(value)| value)
        .map_err(|rejection| Error::Validation(format!("invalid request body: {}", rejection.body_text())))
}

fn as_object(body: &Value) -> Result<&Map<String, Value>> {
    body.as_object()
        .ok_or_else(|| Error::Validation("request body must be a JSON object".to_string()))
}

fn title(object: &Map<String, Value>) -> Result<String> {
    let title = required_string(object, "title")?;
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(Error::Validation(format!(
            "title must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(title)
}

fn required_string(object: &Map<String, Value>, field: &str) -> Result<String> {
    match object.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::String(_)) | Some(Value::Null) | None => {
            Err(Error::Validation(format!("{} is required", field)))
        }
        Some(_) => Err(Error::Validation(format!("{} must be a string", field))),
    }
}

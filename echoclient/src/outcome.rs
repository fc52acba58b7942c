//! Politique d'échec côté interface
//!
//! Chaque action utilisateur a sa façon d'échouer : redirection vers la page
//! « introuvable » pour l'ouverture d'une chaîne, notification éphémère pour
//! tout le reste.

use tracing::warn;

use crate::error::ClientError;

/// Résultat d'une action, tel que l'interface doit le traiter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Done(T),
    /// Rediriger vers la vue « introuvable »
    NotFound,
    /// Afficher une notification éphémère
    Notify(String),
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }

    pub fn done(self) -> Option<T> {
        match self {
            Outcome::Done(value) => Some(value),
            _ => None,
        }
    }
}

/// Actions de l'interface qui appellent l'API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListChannels,
    /// Page d'une chaîne : la chaîne et ses épisodes
    OpenChannel,
    LoadChannelForm,
    LoadEpisodeForm,
    CreateChannel,
    UpdateChannel,
    DeleteChannel,
    CreateEpisode,
    UpdateEpisode,
    DeleteEpisode,
    CheckHealth,
}

impl Action {
    /// Notification affichée en cas d'échec, `None` pour une redirection
    pub fn failure_message(&self) -> Option<&'static str> {
        match self {
            Action::OpenChannel => None,
            Action::ListChannels => Some("Failed to load channels. The mainframe might be down."),
            Action::LoadChannelForm => Some("Failed to load channel data."),
            Action::LoadEpisodeForm => Some("Failed to load episode data."),
            Action::CreateChannel => Some("Failed to create channel."),
            Action::UpdateChannel => Some("Failed to update channel."),
            Action::DeleteChannel => Some("Failed to delete channel."),
            Action::CreateEpisode => Some("Failed to create episode."),
            Action::UpdateEpisode => Some("Failed to update episode."),
            Action::DeleteEpisode => Some("Failed to delete episode."),
            Action::CheckHealth => Some(
                "Failed to connect to the health check endpoint. The backend might be offline.",
            ),
        }
    }

    /// Notification de succès pour les mutations
    ///
    /// `title` est le titre de la ressource supprimée.
    pub fn success_message(&self, title: &str) -> Option<String> {
        match self {
            Action::CreateChannel => Some("Channel created successfully!".to_string()),
            Action::UpdateChannel => Some("Channel updated successfully!".to_string()),
            Action::DeleteChannel => Some(format!(
                "Channel \"{}\" and all its episodes deleted.",
                title
            )),
            Action::CreateEpisode => Some("Episode created successfully!".to_string()),
            Action::UpdateEpisode => Some("Episode updated successfully!".to_string()),
            Action::DeleteEpisode => Some(format!("Episode \"{}\" deleted.", title)),
            _ => None,
        }
    }

    /// Après un échec, la liste affichée doit être rechargée
    pub fn refetch_on_failure(&self) -> bool {
        matches!(self, Action::DeleteChannel)
    }

    /// Traduit le résultat d'un appel en [`Outcome`], en journalisant l'échec
    pub fn settle<T>(&self, result: Result<T, ClientError>) -> Outcome<T> {
        match result {
            Ok(value) => Outcome::Done(value),
            Err(e) => {
                warn!(action = ?self, "Catalog call failed: {}", e);
                match self.failure_message() {
                    Some(message) => Outcome::Notify(message.to_string()),
                    None => Outcome::NotFound,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error() -> ClientError {
        ClientError::Api {
            status: 500,
            message: "Database unavailable".to_string(),
        }
    }

    #[test]
    fn test_open_channel_redirects() {
        let outcome: Outcome<()> = Action::OpenChannel.settle(Err(api_error()));
        assert_eq!(outcome, Outcome::NotFound);
    }

    #[test]
    fn test_mutation_notifies() {
        let outcome: Outcome<()> = Action::DeleteEpisode.settle(Err(api_error()));
        assert_eq!(outcome, Outcome::Notify("Failed to delete episode.".to_string()));

        let outcome: Outcome<()> = Action::LoadChannelForm.settle(Err(api_error()));
        assert_eq!(outcome, Outcome::Notify("Failed to load channel data.".to_string()));
    }

    #[test]
    fn test_success_passes_through() {
        assert_eq!(Action::CreateChannel.settle(Ok(7)).done(), Some(7));
        assert_eq!(
            Action::DeleteChannel.success_message("Synth").as_deref(),
            Some("Channel \"Synth\" and all its episodes deleted.")
        );
        assert!(Action::ListChannels.success_message("Synth").is_none());
    }

    #[test]
    fn test_only_channel_delete_refetches() {
        assert!(Action::DeleteChannel.refetch_on_failure());
        assert!(!Action::DeleteEpisode.refetch_on_failure());
    }
}

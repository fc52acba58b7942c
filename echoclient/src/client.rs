//! Client HTTP de l'API catalogue

use std::time::Duration;

use echomodel::{
    ApiResponse, Channel, ChannelDraft, DeletedResource, Episode, EpisodeDraft, HealthStatus,
};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{ClientError, Result};
use crate::forms::{ChannelForm, EpisodeForm};

/// User-Agent par défaut
pub const DEFAULT_USER_AGENT: &str = "echoclient/0.1.0";

/// Une chaîne avec ses épisodes, tels qu'affichés sur sa page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPage {
    pub channel: Channel,
    pub episodes: Vec<Episode>,
}

/// Client typé de l'API catalogue
///
/// Chaque opération décode l'enveloppe `{ success, data?, error? }` : un
/// statut non 2xx ou `success: false` devient [`ClientError::Api`].
///
/// ```no_run
/// use echoclient::CatalogClient;
///
/// # async fn demo() -> echoclient::Result<()> {
/// let client = CatalogClient::new("http://localhost:8080")?;
/// for channel in client.list_channels().await? {
///     println!("{}", channel.title);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::builder(base_url).build()
    }

    pub fn builder(base_url: &str) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Client sur un `reqwest::Client` existant (pool de connexions partagé)
    ///
    /// Un préfixe de chemin dans `base_url` (`http://h/podcasts`) est conservé.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL de l'endpoint formé par `segments`
    ///
    /// Chaque segment est encodé séparément : un id contenant `/`, `?` ou
    /// `#` reste un seul segment de chemin.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request<T, B>(&self, method: Method, path: &[&str], body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "Catalog request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        decode_envelope(status, &bytes)
    }

    async fn get<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    async fn delete(&self, path: &[&str]) -> Result<DeletedResource> {
        self.request::<DeletedResource, ()>(Method::DELETE, path, None)
            .await
    }

    pub async fn list_channels(&self) -> Result<Vec<Channel>> {
        self.get(&["api", "channels"]).await
    }

    pub async fn get_channel(&self, id: &str) -> Result<Channel> {
        self.get(&["api", "channels", id]).await
    }

    pub async fn create_channel(&self, draft: &ChannelDraft) -> Result<Channel> {
        self.request(Method::POST, &["api", "channels"], Some(draft))
            .await
    }

    pub async fn update_channel(&self, id: &str, draft: &ChannelDraft) -> Result<Channel> {
        self.request(Method::PUT, &["api", "channels", id], Some(draft))
            .await
    }

    /// Supprime une chaîne et, côté serveur, tous ses épisodes
    pub async fn delete_channel(&self, id: &str) -> Result<DeletedResource> {
        self.delete(&["api", "channels", id]).await
    }

    /// Épisodes d'une chaîne, du plus récent au plus ancien
    pub async fn list_episodes(&self, channel_id: &str) -> Result<Vec<Episode>> {
        self.get(&["api", "channels", channel_id, "episodes"])
            .await
    }

    pub async fn get_episode(&self, id: &str) -> Result<Episode> {
        self.get(&["api", "episodes", id]).await
    }

    pub async fn create_episode(&self, channel_id: &str, draft: &EpisodeDraft) -> Result<Episode> {
        self.request(
            Method::POST,
            &["api", "channels", channel_id, "episodes"],
            Some(draft),
        )
        .await
    }

    pub async fn update_episode(&self, id: &str, draft: &EpisodeDraft) -> Result<Episode> {
        self.request(Method::PUT, &["api", "episodes", id], Some(draft))
            .await
    }

    pub async fn delete_episode(&self, id: &str) -> Result<DeletedResource> {
        self.delete(&["api", "episodes", id]).await
    }

    pub async fn health_check(&self) -> Result<HealthStatus> {
        self.get(&["api", "health-check"]).await
    }

    /// Chaîne et épisodes récupérés en parallèle
    ///
    /// Échoue dès que l'une des deux requêtes échoue.
    pub async fn fetch_channel_page(&self, id: &str) -> Result<ChannelPage> {
        let (channel, episodes) = tokio::try_join!(self.get_channel(id), self.list_episodes(id))?;
        Ok(ChannelPage { channel, episodes })
    }

    /// Valide le formulaire puis crée (`id` absent) ou met à jour la chaîne
    pub async fn submit_channel(&self, id: Option<&str>, form: &ChannelForm) -> Result<Channel> {
        let draft = form.validate().map_err(ClientError::Validation)?;
        match id {
            Some(id) => self.update_channel(id, &draft).await,
            None => self.create_channel(&draft).await,
        }
    }

    /// Valide le formulaire puis met à jour l'épisode `id`, ou le crée dans
    /// `channel_id`
    pub async fn submit_episode(
        &self,
        target: EpisodeTarget<'_>,
        form: &EpisodeForm,
    ) -> Result<Episode> {
        let draft = form.validate().map_err(ClientError::Validation)?;
        match target {
            EpisodeTarget::Create { channel_id } => self.create_episode(channel_id, &draft).await,
            EpisodeTarget::Update { episode_id } => self.update_episode(episode_id, &draft).await,
        }
    }
}

/// Destination d'un formulaire d'épisode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeTarget<'a> {
    Create { channel_id: &'a str },
    Update { episode_id: &'a str },
}

fn decode_envelope<T: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> Result<T> {
    let envelope: ApiResponse<T> = match serde_json::from_slice(bytes) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            });
        }
        Err(e) => return Err(ClientError::Decode(e.to_string())),
    };

    if !status.is_success() || !envelope.success {
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: envelope
                .error
                .unwrap_or_else(|| "unknown error".to_string()),
        });
    }

    envelope.into_result().map_err(ClientError::Decode)
}

/// Construction d'un [`CatalogClient`]
///
/// Aucun timeout par défaut : une requête lente retarde simplement la
/// réponse.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    timeout: Option<Duration>,
    user_agent: String,
}

impl ClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<CatalogClient> {
        let mut builder = Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        CatalogClient::with_client(builder.build()?, &self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> CatalogClient {
        CatalogClient::new(base).unwrap()
    }

    #[test]
    fn test_endpoint_encodes_each_segment() {
        let c = client("http://localhost:8080");
        let url = c.endpoint(&["api", "channels", "C?x#y", "episodes"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/channels/C%3Fx%23y/episodes");

        let url = c.endpoint(&["api", "episodes", "a/b"]).unwrap();
        assert_eq!(url.path(), "/api/episodes/a%2Fb");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let url = client("http://h/podcasts/").endpoint(&["api", "channels"]).unwrap();
        assert_eq!(url.as_str(), "http://h/podcasts/api/channels");

        let url = client("http://h/podcasts").endpoint(&["api", "channels"]).unwrap();
        assert_eq!(url.as_str(), "http://h/podcasts/api/channels");
    }

    #[test]
    fn test_base_url_must_be_hierarchical() {
        let err = CatalogClient::new("mailto:someone@example.com").unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_decode_success() {
        let channels: Vec<Channel> = decode_envelope(
            StatusCode::OK,
            br#"{"success":true,"data":[{"id":"c1","title":"Synth","description":"desc long enough","coverArtUrl":"https://x/y.png"}]}"#,
        )
        .unwrap();
        assert_eq!(channels[0].cover_art_url, "https://x/y.png");
    }

    #[test]
    fn test_decode_failure_envelope() {
        let err = decode_envelope::<Channel>(
            StatusCode::NOT_FOUND,
            br#"{"success":false,"error":"channel not found"}"#,
        )
        .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "API error 404: channel not found");
    }

    #[test]
    fn test_decode_non_json_error() {
        let err = decode_envelope::<Channel>(StatusCode::BAD_GATEWAY, b"<html>").unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 502, .. }));

        let err = decode_envelope::<Channel>(StatusCode::OK, b"<html>").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_success_flag_false_with_200() {
        let err = decode_envelope::<Channel>(StatusCode::OK, br#"{"success":false}"#).unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 200, ref message } if message == "unknown error"));
    }
}

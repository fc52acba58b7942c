//! Documentation OpenAPI de l'API catalogue.

use utoipa::OpenApi;

/// Documentation OpenAPI pour les chaînes, épisodes et health check.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::list_channels,
        crate::api::get_channel,
        crate::api::create_channel,
        crate::api::update_channel,
        crate::api::delete_channel,
        crate::api::list_episodes,
        crate::api::create_episode,
        crate::api::get_episode,
        crate::api::update_episode,
        crate::api::delete_episode,
        crate::api::health_check,
    ),
    components(
        schemas(
            echomodel::Channel,
            echomodel::ChannelDraft,
            echomodel::Episode,
            echomodel::EpisodeDraft,
            echomodel::DeletedResource,
            echomodel::HealthStatus,
        )
    ),
    tags(
        (name = "channels", description = "Gestion des chaînes de podcast"),
        (name = "episodes", description = "Gestion des épisodes d'une chaîne"),
        (name = "health", description = "État du backend")
    ),
    info(
        title = "EchoWave Catalog API",
        version = "0.1.0",
        description = r#"
# Catalogue de podcasts

Toutes les réponses utilisent l'enveloppe :
- `success` : booléen
- `data` : charge utile (succès uniquement)
- `error` : message d'erreur (échec uniquement)

Codes HTTP :
- 400 : champ requis absent ou mal typé
- 404 : chaîne ou épisode introuvable
- 500 : base de données indisponible

La suppression d'une chaîne supprime aussi tous ses épisodes.
        "#,
        license(
            name = "MIT",
        ),
    )
)]
pub struct ApiDoc;

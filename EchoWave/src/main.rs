use std::sync::Arc;

use anyhow::Result;
use echocatalog::{ApiDoc, Catalog, CatalogConfigExt, api::catalog_api_router};
use echoconfig::{Config, get_config};
use echoserver::{LoggingOptions, ServerBuilder};
use tracing::{info, warn};
use utoipa::OpenApi;

#[tokio::main]
async fn main() -> Result<()> {
    // ========== PHASE 1 : Configuration et logs ==========

    // Un répertoire de configuration peut être passé en premier argument
    let config: Arc<Config> = match std::env::args().nth(1) {
        Some(dir) => Arc::new(Config::load_config(&dir)?),
        None => get_config(),
    };

    let mut server = ServerBuilder::new(
        "EchoWave-Server",
        config.get_base_url(),
        config.get_http_port(),
    )
    .build();

    server
        .init_logging(LoggingOptions::from_config(&config))
        .await;
    info!("📂 Config directory: {}", config.get_config_dir());

    server
        .add_route("/info", || async {
            serde_json::json!({"name": "EchoWave", "version": env!("CARGO_PKG_VERSION")})
        })
        .await;

    // ========== PHASE 2 : Catalogue ==========

    let settings = config.catalog_settings();
    match settings.database_url.as_deref() {
        Some(url) => info!("🗄️ Catalog database: {}", url),
        None => warn!("⚠️ No database URL configured, catalog endpoints will fail"),
    }

    let catalog = Catalog::new(settings);
    if !catalog.health().database_connected {
        warn!("⚠️ Catalog database is not reachable yet");
    }

    info!("🎙️ Registering catalog API...");
    server
        .add_openapi(catalog_api_router(catalog), ApiDoc::openapi(), "catalog")
        .await;

    // ========== PHASE 3 : Démarrage du serveur ==========

    info!("🌐 Starting HTTP server...");
    server.start().await?;

    info!("✅ EchoWave is ready!");
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    Ok(())
}

//! Extension de echoconfig pour le catalogue

use std::path::Path;

use crate::{CatalogSettings, DatabaseLocation};

/// Trait d'extension pour echoconfig::Config
pub trait CatalogConfigExt {
    /// Construit les paramètres du catalogue depuis la configuration
    ///
    /// Un chemin SQLite relatif est résolu contre le répertoire de
    /// configuration. Une URL illisible est transmise telle quelle : le
    /// catalogue la signalera comme erreur de connectivité.
    fn catalog_settings(&self) -> CatalogSettings;
}

impl CatalogConfigExt for echoconfig::Config {
    fn catalog_settings(&self) -> CatalogSettings {
        let Some(url) = self.get_database_url() else {
            return CatalogSettings::unconfigured();
        };

        match DatabaseLocation::parse(&url) {
            Ok(location) => CatalogSettings::new(
                location
                    .resolved_against(Path::new(self.get_config_dir()))
                    .to_string(),
            ),
            Err(_) => CatalogSettings::new(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_relative_path_resolved_in_config_dir() {
        let dir = TempDir::new().unwrap();
        let config = echoconfig::Config::load_config(dir.path().to_str().unwrap()).unwrap();
        config.set_database_url("sqlite://data/catalog.db".to_string()).unwrap();

        // DATABASE_URL dans l'environnement du test l'emporterait
        if std::env::var(echoconfig::ENV_DATABASE_URL).is_ok() {
            return;
        }

        let settings = config.catalog_settings();
        let expected = format!("sqlite://{}", dir.path().join("data/catalog.db").display());
        assert_eq!(settings.database_url.as_deref(), Some(expected.as_str()));
    }
}

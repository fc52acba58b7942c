//! # echoconfig - Configuration d'EchoWave
//!
//! La configuration est un arbre YAML construit en trois couches :
//!
//! 1. le fichier `echowave.yaml` embarqué dans le binaire (valeurs par défaut)
//! 2. le `config.yaml` du répertoire de configuration, s'il existe
//! 3. les variables d'environnement `ECHOWAVE_CONFIG__SECTION__CLE`
//!
//! Le résultat est réécrit dans `config.yaml`, qui sert ainsi de modèle
//! à l'utilisateur.
//!
//! Les services ne lisent jamais le singleton eux-mêmes : le binaire en
//! extrait des structures de paramètres qu'il leur passe à la construction.
//!
//! ```no_run
//! use echoconfig::get_config;
//!
//! let config = get_config();
//! let port = config.get_http_port();
//! config.set_http_port(port + 1)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

mod dir;
mod tree;

use anyhow::Result;
use lazy_static::lazy_static;
use serde_yaml::{Number, Value};
use std::{
    env, fs,
    path::Path,
    sync::{Arc, Mutex},
};
use tracing::{info, warn};

pub use dir::{ENV_CONFIG_DIR, config_dir};

const EMBEDDED: &str = include_str!("echowave.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load EchoWave configuration"));
}

/// Variable d'environnement historique portant l'URL de la base
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

const BASE_URL: &[&str] = &["host", "base_url"];
const HTTP_PORT: &[&str] = &["host", "http_port"];
const LOG_BUFFER: &[&str] = &["host", "logger", "buffer_capacity"];
const LOG_LEVEL: &[&str] = &["host", "logger", "min_level"];
const LOG_CONSOLE: &[&str] = &["host", "logger", "enable_console"];
const DATABASE_URL: &[&str] = &["database", "url"];

const DEFAULT_BASE_URL: &str = "localhost";
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Configuration chargée, partagée derrière un `Arc`
///
/// Chaque modification via un setter est immédiatement réécrite sur disque.
#[derive(Debug)]
pub struct Config {
    dir: String,
    file: String,
    tree: Mutex<Value>,
}

impl Config {
    /// Charge la configuration du répertoire `directory`
    ///
    /// Une chaîne vide laisse [`config_dir`] choisir le répertoire.
    pub fn load_config(directory: &str) -> Result<Self> {
        let dir = config_dir(directory)?;
        let file = Path::new(&dir).join("config.yaml");

        let mut tree: Value = serde_yaml::from_str(EMBEDDED)?;
        match fs::read_to_string(&file) {
            Ok(text) => {
                info!(config_file = %file.display(), "Loaded config file");
                let user: Value = serde_yaml::from_str(&text)?;
                tree::overlay(&mut tree, tree::lowercase_keys(user));
            }
            Err(_) => info!(config_file = %file.display(), "No config file, using defaults"),
        }
        let mut tree = tree::lowercase_keys(tree);
        tree::apply_env(&mut tree, env::vars());

        let config = Config {
            dir,
            file: file.to_string_lossy().into_owned(),
            tree: Mutex::new(tree),
        };
        config.save()?;
        info!(config_dir = %config.dir, "Configuration ready");
        Ok(config)
    }

    /// Réécrit `config.yaml`
    pub fn save(&self) -> Result<()> {
        let text = serde_yaml::to_string(&*self.tree.lock().unwrap())?;
        fs::write(&self.file, text)?;
        Ok(())
    }

    /// Répertoire de configuration effectivement utilisé
    pub fn get_config_dir(&self) -> &str {
        &self.dir
    }

    /// Valeur brute au chemin `path` (ex: `&["host", "http_port"]`)
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        tree::lookup(&self.tree.lock().unwrap(), path)
    }

    /// Remplace la valeur au chemin `path` puis sauvegarde
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        tree::store(&mut self.tree.lock().unwrap(), path, value)?;
        self.save()
    }

    /// Lit une valeur typée, `None` si la clé manque ou n'a pas le bon type
    fn typed<T>(&self, path: &[&str], convert: impl FnOnce(Value) -> Option<T>) -> Option<T> {
        let found = self.get_value(path).ok().and_then(convert);
        if found.is_none() {
            warn!(key = %path.join("."), "Missing or invalid config value, using default");
        }
        found
    }

    /// Hôte annoncé par le serveur HTTP, `localhost` par défaut
    pub fn get_base_url(&self) -> String {
        self.typed(BASE_URL, |v| match v {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        })
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Port HTTP, 8080 par défaut
    ///
    /// Accepte un nombre ou une chaîne numérique (cas des surcharges
    /// d'environnement citées).
    pub fn get_http_port(&self) -> u16 {
        self.typed(HTTP_PORT, |v| match v {
            Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .unwrap_or(DEFAULT_HTTP_PORT)
    }

    pub fn set_http_port(&self, port: u16) -> Result<()> {
        self.set_value(HTTP_PORT, Value::Number(Number::from(port)))
    }

    /// URL de la base de données du catalogue
    ///
    /// `DATABASE_URL` l'emporte sur `database.url`. Une valeur vide compte
    /// comme absente.
    pub fn get_database_url(&self) -> Option<String> {
        let configured = match self.get_value(DATABASE_URL) {
            Ok(Value::String(s)) => Some(s),
            _ => None,
        };
        first_non_blank(env::var(ENV_DATABASE_URL).ok(), configured)
    }

    pub fn set_database_url(&self, url: String) -> Result<()> {
        self.set_value(DATABASE_URL, Value::String(url))
    }

    /// Capacité du buffer circulaire de logs
    pub fn get_log_cache_size(&self) -> Option<usize> {
        self.typed(LOG_BUFFER, |v| v.as_u64().map(|n| n as usize))
    }

    /// Niveau de log minimum (`TRACE` à `ERROR`)
    pub fn get_log_min_level(&self) -> Option<String> {
        self.typed(LOG_LEVEL, |v| v.as_str().map(str::to_owned))
    }

    pub fn set_log_min_level(&self, level: &str) -> Result<()> {
        self.set_value(LOG_LEVEL, Value::String(level.to_string()))
    }

    /// Copie des logs sur la console
    pub fn get_log_enable_console(&self) -> Option<bool> {
        self.typed(LOG_CONSOLE, |v| v.as_bool())
    }
}

fn first_non_blank(preferred: Option<String>, fallback: Option<String>) -> Option<String> {
    [preferred, fallback]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
}

/// Configuration globale, chargée au premier appel
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_in(dir: &tempfile::TempDir) -> Config {
        Config::load_config(dir.path().to_str().unwrap()).unwrap()
    }

    #[test]
    fn test_defaults_are_written_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_in(&dir);

        assert_eq!(config.get_http_port(), DEFAULT_HTTP_PORT);
        assert_eq!(config.get_log_min_level().as_deref(), Some("INFO"));
        assert_eq!(config.get_log_enable_console(), Some(true));

        let written = fs::read_to_string(dir.path().join("config.yaml")).unwrap();
        assert!(written.contains("http_port: 8080"));
    }

    #[test]
    fn test_user_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "Host:\n  HTTP_PORT: 9090\ndatabase:\n  url: sqlite://podcasts.db\n",
        )
        .unwrap();

        let config = load_in(&dir);
        assert_eq!(config.get_http_port(), 9090);
        assert_eq!(config.get_base_url(), "localhost");
        assert_eq!(config.get_log_cache_size(), Some(1000));
        assert_eq!(
            config.get_value(DATABASE_URL).unwrap(),
            Value::String("sqlite://podcasts.db".into())
        );
    }

    #[test]
    fn test_setter_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        load_in(&dir).set_http_port(3000).unwrap();
        assert_eq!(load_in(&dir).get_http_port(), 3000);
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_in(&dir);

        config.set_value(HTTP_PORT, Value::Number(70000.into())).unwrap();
        assert_eq!(config.get_http_port(), DEFAULT_HTTP_PORT);

        config.set_value(HTTP_PORT, Value::String("4000".into())).unwrap();
        assert_eq!(config.get_http_port(), 4000);
    }

    #[test]
    fn test_database_url_precedence() {
        let env = Some("sqlite://env.db".to_string());
        let file = Some("sqlite://cfg.db".to_string());

        assert_eq!(first_non_blank(env.clone(), file.clone()), env);
        assert_eq!(first_non_blank(Some("  ".into()), file.clone()), file);
        assert_eq!(first_non_blank(None, Some(String::new())), None);
    }
}

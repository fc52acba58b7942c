//! Localisation du répertoire de configuration

use anyhow::{Context, Result, bail};
use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Variable d'environnement désignant le répertoire de configuration
pub const ENV_CONFIG_DIR: &str = "ECHOWAVE_CONFIG";

const DIR_NAME: &str = ".echowave";

/// Choisit le répertoire à utiliser, par ordre de priorité :
///
/// 1. `requested` s'il n'est pas vide
/// 2. la variable `ECHOWAVE_CONFIG`
/// 3. `./.echowave` s'il existe
/// 4. `~/.echowave` s'il existe
///
/// À défaut, `./.echowave` sera créé.
fn locate(requested: &str) -> PathBuf {
    if !requested.is_empty() {
        return PathBuf::from(requested);
    }
    if let Ok(from_env) = env::var(ENV_CONFIG_DIR) {
        debug!(env_var = ENV_CONFIG_DIR, path = %from_env, "Config directory taken from env");
        return PathBuf::from(from_env);
    }

    let local = PathBuf::from(DIR_NAME);
    if local.exists() {
        return local;
    }
    home_dir()
        .map(|home| home.join(DIR_NAME))
        .filter(|p| p.exists())
        .unwrap_or(local)
}

/// Crée le répertoire au besoin et vérifie qu'on peut y écrire
fn ensure_writable(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create config directory {}", dir.display()))?;
    if !dir.is_dir() {
        bail!("{} n'est pas un répertoire", dir.display());
    }

    let probe = dir.join(".echowave-probe");
    fs::write(&probe, b"")
        .with_context(|| format!("Config directory {} is not writable", dir.display()))?;
    fs::remove_file(&probe)?;
    Ok(())
}

/// Résout puis prépare le répertoire de configuration
pub fn config_dir(requested: &str) -> Result<String> {
    let dir = locate(requested);
    ensure_writable(&dir)?;
    Ok(dir.to_string_lossy().into_owned())
}

//! Manipulation de l'arbre YAML de configuration
//!
//! Les clés sont toujours stockées en minuscules : un chemin `["Host", "HTTP_PORT"]`
//! désigne la même valeur que `["host", "http_port"]`.

use anyhow::{Result, bail};
use serde_yaml::{Mapping, Value};

/// Préfixe des variables d'environnement qui surchargent une clé
///
/// `ECHOWAVE_CONFIG__HOST__HTTP_PORT=9000` équivaut à `host.http_port: 9000`.
pub(crate) const ENV_PREFIX: &str = "ECHOWAVE_CONFIG__";

fn key(segment: &str) -> Value {
    Value::String(segment.to_lowercase())
}

/// Lit la valeur au bout de `path`
pub(crate) fn lookup(root: &Value, path: &[&str]) -> Result<Value> {
    let mut node = root;
    for (depth, segment) in path.iter().enumerate() {
        let Value::Mapping(map) = node else {
            bail!("{} is a leaf, not a section", path[..depth].join("."));
        };
        match map.get(key(segment)) {
            Some(child) => node = child,
            None => bail!("No value at {}", path[..=depth].join(".")),
        }
    }
    Ok(node.clone())
}

/// Écrit `value` au bout de `path`, en créant les sections manquantes
pub(crate) fn store(root: &mut Value, path: &[&str], value: Value) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        *root = value;
        return Ok(());
    };

    let mut node = root;
    for segment in parents {
        let Value::Mapping(map) = node else {
            bail!("Cannot create section {}: parent is a leaf", segment);
        };
        node = map
            .entry(key(segment))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
    }

    match node {
        Value::Mapping(map) => {
            map.insert(key(last), value);
            Ok(())
        }
        _ => bail!("Cannot set {}: parent is a leaf", path.join(".")),
    }
}

/// Superpose `overlay` à `base`
///
/// Les sections sont fusionnées clé par clé, tout le reste est remplacé.
pub(crate) fn overlay(base: &mut Value, overlay_value: Value) {
    match (base, overlay_value) {
        (Value::Mapping(target), Value::Mapping(source)) => {
            for (k, v) in source {
                if let Some(existing) = target.get_mut(&k) {
                    overlay(existing, v);
                } else {
                    target.insert(k, v);
                }
            }
        }
        (slot, v) => *slot = v,
    }
}

/// Passe récursivement toutes les clés texte en minuscules
pub(crate) fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| {
                    let k = match k {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    (k, lowercase_keys(v))
                })
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

/// Applique les variables `ECHOWAVE_CONFIG__*`
///
/// La valeur est interprétée comme du YAML (`8080` devient un nombre,
/// `true` un booléen). Une surcharge impossible à placer est ignorée.
pub(crate) fn apply_env(root: &mut Value, vars: impl IntoIterator<Item = (String, String)>) {
    for (name, raw) in vars {
        let Some(rest) = name.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let path: Vec<&str> = rest.split("__").collect();
        let value = serde_yaml::from_str(&raw).unwrap_or(Value::String(raw.clone()));
        if let Err(e) = store(root, &path, value) {
            tracing::warn!(env_var = %name, "Ignoring environment override: {}", e);
        }
    }
}

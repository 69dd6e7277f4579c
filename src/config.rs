//! Subject configuration: which subjects exist and their default daily goals.
//!
//! The config file is a single JSON object with one required key,
//! `default_goals`, mapping subject name to daily problem target. Earlier
//! releases used other shapes; those are accepted once, backed up with a
//! `.bak` suffix, and rewritten in the canonical form.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "studytrack";
const CONFIG_FILE: &str = "config.json";

/// Starter subjects written when no config exists yet.
fn starter_goals() -> BTreeMap<String, u32> {
    BTreeMap::from([
        ("math".to_string(), 50),
        ("english".to_string(), 40),
        ("history".to_string(), 20),
        ("physics".to_string(), 10),
    ])
}

/// Canonical on-disk shape of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    default_goals: BTreeMap<String, u32>,
}

/// Loaded configuration handed to the rest of the program.
///
/// Subject keys double as display labels, so `subjects` maps each key to
/// itself. Constructed once at startup and passed by reference everywhere.
#[derive(Debug, Clone)]
pub struct Config {
    pub subjects: BTreeMap<String, String>,
    pub default_goals: BTreeMap<String, u32>,
}

impl Config {
    /// Build a config from a goals mapping. Fails if the mapping is empty:
    /// there is nothing to track without subjects.
    pub fn from_goals(default_goals: BTreeMap<String, u32>) -> Result<Self> {
        if default_goals.is_empty() {
            bail!("'default_goals' is empty; add at least one subject");
        }
        let subjects = default_goals
            .keys()
            .map(|k| (k.clone(), k.clone()))
            .collect();
        Ok(Self {
            subjects,
            default_goals,
        })
    }

    /// Load the config from the user config directory, creating a default
    /// file on first run and migrating legacy shapes in place.
    pub fn load_or_init() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Load from an explicit path. See [`Config::load_or_init`].
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let file = ConfigFile {
                default_goals: starter_goals(),
            };
            write_config(path, &file)?;
            println!("No config found; default config created at {}", path.display());
            println!("Edit this file to customize your subjects and daily goals.");
            return Self::from_goals(file.default_goals);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;

        let is_canonical = value.get("default_goals").is_some() && value.get("subjects").is_none();
        if is_canonical {
            let file: ConfigFile = serde_json::from_value(value)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?;
            return Self::from_goals(file.default_goals)
                .with_context(|| format!("Unusable config at {}", path.display()));
        }

        let goals = migrate_legacy(&value);
        let backup = backup_path(path);
        fs::rename(path, &backup)
            .with_context(|| format!("Failed to back up config to {}", backup.display()))?;
        write_config(
            path,
            &ConfigFile {
                default_goals: goals.clone(),
            },
        )?;
        println!(
            "Legacy config detected; rewritten in the current format (backup at {})",
            backup.display()
        );
        Self::from_goals(goals).with_context(|| format!("Unusable config at {}", path.display()))
    }
}

/// Extract the goals mapping from a legacy config object.
///
/// Old two-key configs carried a `subjects` list alongside `default_goals`;
/// those are projected through the subject set, defaulting absent goals to
/// zero. Anything else is treated as a bare goals mapping.
fn migrate_legacy(value: &serde_json::Value) -> BTreeMap<String, u32> {
    let subject_keys: Option<Vec<String>> = match value.get("subjects") {
        Some(serde_json::Value::Object(map)) => Some(map.keys().cloned().collect()),
        Some(serde_json::Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
        ),
        _ => None,
    };

    match (subject_keys, value.get("default_goals")) {
        (Some(keys), Some(goals)) => keys
            .into_iter()
            .map(|key| {
                let goal = goals.get(&key).and_then(|v| v.as_u64()).unwrap_or(0);
                (key, goal as u32)
            })
            .collect(),
        _ => value
            .as_object()
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_u64().map(|g| (k.clone(), g as u32)))
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn write_config(path: &Path, file: &ConfigFile) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(file).context("Failed to serialize config")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// `config.json` → `config.json.bak`, next to the original.
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

fn config_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

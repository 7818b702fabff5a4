use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::sonar::PaginationConfig;


pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sonar: SonarSettings,
    pub export: PaginationConfig,
    pub server: ServerSettings,
}

/// Connection defaults for the `export` command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SonarSettings {
    pub url: Option<String>,
    pub token: Option<String>,
    pub project_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Returns the config directory path
pub fn config_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".config").join("sonar-export"))
        .context("Could not determine config directory")
}

/// Returns the path to settings.toml
pub fn settings_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("settings.toml"))
}

/// Load settings from the config dir, then apply environment overrides
pub fn load_settings() -> Result<Settings> {
    let path = settings_path()?;
    let mut settings = load_settings_from(&path)?;
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

/// Load settings from a specific path (testable)
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let settings: Settings =
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))?;
    settings
        .export
        .validate()
        .with_context(|| format!("Invalid [export] section in {}", path.display()))?;
    Ok(settings)
}

/// Override connection settings from `SONAR_URL`, `SONAR_TOKEN` and `SONAR_PROJECT_KEY`
pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup("SONAR_URL") {
        settings.sonar.url = Some(url);
    }
    if let Some(token) = lookup("SONAR_TOKEN") {
        settings.sonar.token = Some(token);
    }
    if let Some(project_key) = lookup("SONAR_PROJECT_KEY") {
        settings.sonar.project_key = Some(project_key);
    }
}

/// Hide all but the first four characters of a token
pub fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    let hidden = token.chars().count().saturating_sub(4);
    if hidden == 0 {
        "*".repeat(token.chars().count())
    } else {
        format!("{}{}", visible, "*".repeat(hidden.min(16)))
    }
}

/// Human-readable summary of the effective settings
pub fn describe_settings(settings: &Settings, path: &Path) -> String {
    let unset = "(not set)".to_string();
    let lines = [
        format!("Settings file: {}", path.display()),
        format!(
            "  url:         {}",
            settings.sonar.url.clone().unwrap_or_else(|| unset.clone())
        ),
        format!(
            "  token:       {}",
            settings
                .sonar
                .token
                .as_deref()
                .map(mask_token)
                .unwrap_or_else(|| unset.clone())
        ),
        format!(
            "  project_key: {}",
            settings
                .sonar
                .project_key
                .clone()
                .unwrap_or_else(|| unset.clone())
        ),
        format!("  page_size:   {}", settings.export.page_size),
        format!("  max_pages:   {}", settings.export.max_pages),
        format!("  bind:        {}", settings.server.bind),
    ];
    lines.join("\n")
}

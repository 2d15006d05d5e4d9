//! Dashboard client settings: defaults, then `dashboard.toml`, then environment.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::parse_base_url;

pub const SETTINGS_FILE_NAME: &str = "dashboard.toml";
const SETTINGS_DIR_NAME: &str = "clinic-dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub diet_chart_return_route: String,
    pub patient_return_route: String,
    pub log_level: String,
    pub access_token: Option<String>,
    pub display_name: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000/api".into(),
            request_timeout_secs: 15,
            diet_chart_return_route: "/dashboard".into(),
            patient_return_route: "/dashboard/manager/patients".into(),
            log_level: "info".into(),
            access_token: None,
            display_name: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    diet_chart_return_route: Option<String>,
    patient_return_route: Option<String>,
    log_level: Option<String>,
    access_token: Option<String>,
    display_name: Option<String>,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        parse_base_url(&self.api_base_url)?;
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be greater than zero"));
        }
        for (key, route) in [
            ("diet_chart_return_route", &self.diet_chart_return_route),
            ("patient_return_route", &self.patient_return_route),
        ] {
            if !route.starts_with('/') {
                return Err(anyhow!("{key} must be an absolute route, got '{route}'"));
            }
        }
        Ok(())
    }

    fn apply_file(&mut self, file: FileSettings) {
        if let Some(v) = file.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file.diet_chart_return_route {
            self.diet_chart_return_route = v;
        }
        if let Some(v) = file.patient_return_route {
            self.patient_return_route = v;
        }
        if let Some(v) = file.log_level {
            self.log_level = v;
        }
        if file.access_token.is_some() {
            self.access_token = file.access_token;
        }
        if file.display_name.is_some() {
            self.display_name = file.display_name;
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("DASHBOARD_API_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = var("APP__API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(parsed) => self.request_timeout_secs = parsed,
                Err(err) => warn!("ignoring APP__REQUEST_TIMEOUT_SECS={v:?}: {err}"),
            }
        }
        if let Some(v) = var("APP__ACCESS_TOKEN") {
            self.access_token = Some(v);
        }
        if let Some(v) = var("APP__LOG_LEVEL") {
            self.log_level = v;
        }
        if let Some(v) = var("APP__DISPLAY_NAME") {
            self.display_name = Some(v);
        }
    }
}

/// Candidate locations for the settings file, most specific first.
pub fn settings_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(SETTINGS_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME));
    }
    candidates
}

/// Loads settings from the process environment.
///
/// An explicit `path` must exist and parse. Without one, the first existing
/// candidate is used and a broken file is skipped with a warning.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    load_settings_with(path, &settings_candidates(), |key| std::env::var(key).ok())
}

pub fn load_settings_with(
    path: Option<&Path>,
    candidates: &[PathBuf],
    var: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let mut settings = Settings::default();

    if let Some(path) = path {
        let file = read_settings_file(path)?;
        settings.apply_file(file);
        info!(path = %path.display(), "loaded dashboard settings");
    } else if let Some(path) = candidates.iter().find(|candidate| candidate.is_file()) {
        match read_settings_file(path) {
            Ok(file) => {
                settings.apply_file(file);
                info!(path = %path.display(), "loaded dashboard settings");
            }
            Err(err) => warn!("skipping settings file: {err:#}"),
        }
    }

    settings.apply_env(var);
    settings.validate()?;
    Ok(settings)
}

fn read_settings_file(path: &Path) -> Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("malformed settings file '{}'", path.display()))
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;

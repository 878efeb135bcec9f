//! Host configuration from the environment or YAML, turned into the init bundle.
//!
//! The host reads where its services live once at startup and hands the
//! result to the embedded view through `runtimeTools__initRequest`.

use anyhow::{anyhow, bail, Context, Result};
use console_types::{CustomLabels, DiagramPreviewSize, InitArgs, User};
use std::path::Path;

pub const ENV_DATA_INDEX_URL: &str = "CONSOLE_DATA_INDEX_URL";
pub const ENV_TRUSTY_SERVICE_URL: &str = "CONSOLE_TRUSTY_SERVICE_URL";
pub const ENV_DEV_UI_URL: &str = "CONSOLE_DEV_UI_URL";
pub const ENV_OPENAPI_PATH: &str = "CONSOLE_OPENAPI_PATH";
pub const ENV_PAGE: &str = "CONSOLE_PAGE";
pub const ENV_USERS: &str = "CONSOLE_USERS";
pub const ENV_PROCESS_ENABLED: &str = "CONSOLE_PROCESS_ENABLED";
pub const ENV_TRACING_ENABLED: &str = "CONSOLE_TRACING_ENABLED";

pub const DEFAULT_PAGE: &str = "Processes";

// ---------------------------------------------------------------------------
// HostConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HostConfig {
    pub data_index_url: String,
    #[serde(default)]
    pub trusty_service_url: Option<String>,
    #[serde(default)]
    pub dev_ui_url: Option<String>,
    #[serde(default)]
    pub openapi_path: Option<String>,
    #[serde(default = "default_page")]
    pub page: String,
    /// User ids; groups may follow a `:` separated by `|`, e.g. `jdoe:admin|managers`.
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub available_pages: Option<Vec<String>>,
    #[serde(default)]
    pub custom_labels: Option<CustomLabels>,
    #[serde(default)]
    pub omitted_timeline_events: Option<Vec<String>>,
    #[serde(default)]
    pub diagram_preview_size: Option<DiagramPreviewSize>,
    #[serde(default)]
    pub stunner_enabled: Option<bool>,
    #[serde(default)]
    pub process_enabled: bool,
    #[serde(default)]
    pub tracing_enabled: bool,
}

fn default_page() -> String {
    DEFAULT_PAGE.to_string()
}

impl HostConfig {
    pub fn new(data_index_url: impl Into<String>) -> Self {
        Self {
            data_index_url: data_index_url.into(),
            trusty_service_url: None,
            dev_ui_url: None,
            openapi_path: None,
            page: default_page(),
            users: Vec::new(),
            available_pages: None,
            custom_labels: None,
            omitted_timeline_events: None,
            diagram_preview_size: None,
            stunner_enabled: None,
            process_enabled: false,
            tracing_enabled: false,
        }
    }

    /// Read `CONSOLE_*` variables, after loading a `.env` file if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_index_url =
            non_empty(ENV_DATA_INDEX_URL).ok_or_else(|| anyhow!("{ENV_DATA_INDEX_URL} must be set"))?;

        let mut config = Self::new(data_index_url);
        config.trusty_service_url = non_empty(ENV_TRUSTY_SERVICE_URL);
        config.dev_ui_url = non_empty(ENV_DEV_UI_URL);
        config.openapi_path = non_empty(ENV_OPENAPI_PATH);
        if let Some(page) = non_empty(ENV_PAGE) {
            config.page = page;
        }
        if let Some(users) = non_empty(ENV_USERS) {
            config.users = users
                .split(',')
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = non_empty(ENV_PROCESS_ENABLED) {
            config.process_enabled =
                parse_flag(&v).with_context(|| format!("Parsing {ENV_PROCESS_ENABLED}"))?;
        }
        if let Some(v) = non_empty(ENV_TRACING_ENABLED) {
            config.tracing_enabled =
                parse_flag(&v).with_context(|| format!("Parsing {ENV_TRACING_ENABLED}"))?;
        }

        config.validate()?;
        tracing::debug!(
            data_index_url = %config.data_index_url,
            page = %config.page,
            users = config.users.len(),
            "Loaded host config from environment"
        );
        Ok(config)
    }

    /// Load from a YAML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
        let config: HostConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Parsing {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Validating {}", path.display()))?;
        Ok(config)
    }

    /// Every configured URL must parse.
    pub fn validate(&self) -> Result<()> {
        check_url(ENV_DATA_INDEX_URL, &self.data_index_url)?;
        if let Some(url) = &self.trusty_service_url {
            check_url(ENV_TRUSTY_SERVICE_URL, url)?;
        }
        if let Some(url) = &self.dev_ui_url {
            check_url(ENV_DEV_UI_URL, url)?;
        }
        Ok(())
    }

    pub fn users(&self) -> Vec<User> {
        self.users.iter().map(|entry| parse_user(entry)).collect()
    }

    /// Build the bundle sent with the init request.
    pub fn init_args(&self) -> InitArgs {
        let mut args = InitArgs::new(
            self.data_index_url.clone(),
            self.trusty_service_url.clone().unwrap_or_default(),
            self.page.clone(),
        )
        .with_users(self.users())
        .with_process_enabled(self.process_enabled)
        .with_tracing_enabled(self.tracing_enabled);

        if let Some(url) = &self.dev_ui_url {
            args = args.with_host_url(url.clone());
        }
        if let Some(path) = &self.openapi_path {
            args = args.with_open_api_path(path.clone());
        }
        if let Some(pages) = &self.available_pages {
            args = args.with_available_pages(pages.clone());
        }
        if let Some(labels) = &self.custom_labels {
            args = args.with_custom_labels(labels.clone());
        }
        if let Some(kinds) = &self.omitted_timeline_events {
            args = args.with_omitted_timeline_event_kinds(kinds.clone());
        }
        if let Some(size) = &self.diagram_preview_size {
            args = args.with_diagram_preview_size(*size);
        }
        if let Some(enabled) = self.stunner_enabled {
            args = args.with_stunner_enabled(enabled);
        }
        args
    }
}

fn check_url(name: &str, value: &str) -> Result<()> {
    url::Url::parse(value).with_context(|| format!("{name} is not a valid URL: {value}"))?;
    Ok(())
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {other:?}"),
    }
}

fn parse_user(entry: &str) -> User {
    match entry.split_once(':') {
        Some((id, groups)) => User::new(id.trim()).with_groups(
            groups
                .split('|')
                .map(str::trim)
                .filter(|g| !g.is_empty()),
        ),
        None => User::new(entry.trim()),
    }
}

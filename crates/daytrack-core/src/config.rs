use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Hosted table service (PostgREST-style) settings
    #[serde(default)]
    pub remote: RemoteDbConfig,

    /// Calendar app registration settings
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Presentation preferences
    #[serde(default)]
    pub ui: UiConfig,

    /// World clock settings
    #[serde(default)]
    pub clock: ClockConfig,
}

/// Hosted database (PostgREST) configuration.
///
/// Both fields can be overridden via `DAYTRACK_DB_URL` / `DAYTRACK_DB_KEY`.
/// When left at the placeholders the tracker runs in local-only mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteDbConfig {
    /// Base URL of the hosted project (e.g. https://xyz.supabase.co)
    pub url: String,
    /// Service API key sent as `apikey` and bearer token
    pub api_key: String,
}

impl RemoteDbConfig {
    /// Check if credentials are configured (not placeholders)
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
            && !self.api_key.is_empty()
            && !self.url.starts_with("your_")
            && !self.api_key.starts_with("your_")
    }
}

impl Default for RemoteDbConfig {
    fn default() -> Self {
        Self {
            url: "your_project_url".to_string(),
            api_key: "your_service_key".to_string(),
        }
    }
}

/// Calendar/identity app registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Application (client) ID of the registered app
    pub client_id: String,
    /// Directory tenant, or "common" for multi-tenant sign-in
    #[serde(default = "default_tenant")]
    pub tenant: String,
    /// Local port the sign-in flow listens on for the redirect
    #[serde(default = "default_redirect_port")]
    pub redirect_port: u16,
}

fn default_tenant() -> String {
    "common".to_string()
}

fn default_redirect_port() -> u16 {
    8080
}

impl CalendarConfig {
    /// Check if an app registration is configured (not a placeholder)
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_id.starts_with("your_")
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            client_id: "your_client_id".to_string(),
            tenant: default_tenant(),
            redirect_port: default_redirect_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show archived items alongside active ones
    pub show_archived: bool,

    /// How many tasks a project card previews
    pub tasks_per_card: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_archived: false,
            tasks_per_card: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Initially selected world-clock city
    pub home_city: String,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            home_city: "Sydney".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("daytrack");

        Self {
            config_dir,
            remote: RemoteDbConfig::default(),
            calendar: CalendarConfig::default(),
            ui: UiConfig::default(),
            clock: ClockConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .context("Failed to read config file")?;

            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save()?;
            config
        };

        config.apply_env_overrides(
            std::env::var("DAYTRACK_DB_URL").ok(),
            std::env::var("DAYTRACK_DB_KEY").ok(),
        );

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        if !validation.warnings.is_empty() {
            for warning in &validation.warnings {
                tracing::warn!("Config warning: {}", warning);
            }
        }

        Ok((config, validation))
    }

    /// Apply environment overrides to the remote database section.
    pub fn apply_env_overrides(&mut self, url: Option<String>, api_key: Option<String>) {
        if let Some(url) = url {
            self.remote.url = url;
        }
        if let Some(key) = api_key {
            self.remote.api_key = key;
        }
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        // The remote database is optional; only validate a real URL
        if self.remote.is_configured() {
            self.validate_url(&self.remote.url, "remote.url", &mut result);
        } else {
            result.add_warning(
                "remote",
                "Hosted database not configured - running in local-only mode",
            );
        }

        if !self.calendar.is_configured() {
            result.add_warning(
                "calendar",
                "Calendar app registration not configured - calendar features unavailable",
            );
        }

        if self.calendar.redirect_port == 0 {
            result.add_error("calendar.redirect_port", "Redirect port cannot be 0");
        }

        if self.ui.tasks_per_card == 0 {
            result.add_warning(
                "ui.tasks_per_card",
                "Project cards will not preview any tasks (0 configured)",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Path of the local snapshot database
    pub fn snapshot_path(&self) -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| self.config_dir.clone())
            .join("daytrack")
            .join("snapshots.db")
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("daytrack");

        Ok(config_dir.join("config.toml"))
    }
}

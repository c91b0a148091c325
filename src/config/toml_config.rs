use crate::domain::services::StatusPolicy;
use crate::utils::error::{BookingError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub snapshot: SnapshotConfig,
    pub booking: BookingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub enabled: bool,
    pub output_path: String,
    pub users_file: String,
    pub bookings_file: String,
    pub properties_file: Option<String>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_path: ".".to_string(),
            users_file: "users.json".to_string(),
            bookings_file: "bookings.xml".to_string(),
            properties_file: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub status_policy: StatusPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| BookingError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BookingError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| BookingError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        let snapshot = &self.snapshot;
        validation::validate_path("snapshot.output_path", &snapshot.output_path)?;
        validation::validate_non_empty_string("snapshot.users_file", &snapshot.users_file)?;
        validation::validate_non_empty_string("snapshot.bookings_file", &snapshot.bookings_file)?;

        let mut files = vec![snapshot.users_file.as_str(), snapshot.bookings_file.as_str()];
        if let Some(properties_file) = &snapshot.properties_file {
            files.push(properties_file);
        }
        validation::validate_file_extensions("snapshot", &files, &["json", "xml"])?;

        validation::validate_one_of(
            "logging.level",
            &self.logging.level,
            &["trace", "debug", "info", "warn", "error"],
        )?;
        validation::validate_one_of("logging.format", &self.logging.format, &["compact", "json"])?;

        Ok(())
    }

    fn in_output_dir(&self, file: &str) -> PathBuf {
        Path::new(&self.snapshot.output_path).join(file)
    }

    pub fn users_path(&self) -> PathBuf {
        self.in_output_dir(&self.snapshot.users_file)
    }

    pub fn bookings_path(&self) -> PathBuf {
        self.in_output_dir(&self.snapshot.bookings_file)
    }

    pub fn properties_path(&self) -> Option<PathBuf> {
        self.snapshot
            .properties_file
            .as_deref()
            .map(|file| self.in_output_dir(file))
    }

    pub fn status_policy(&self) -> StatusPolicy {
        self.booking.status_policy
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

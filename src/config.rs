use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

use crate::output::formatter::validate_output_name;
use crate::temporal::{DEFAULT_TEMPORAL_TRIGGERS, TemporalClassifier};

/// Invalid or unreadable run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Error reading {}: {source}", .path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The configuration is not valid JSON for [`ReportConfig`].
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds an unusable value.
    #[error("Invalid configuration value for `{field}`: {reason}")]
    Invalid {
        /// Field name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Everything a report run needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// JSON-RPC endpoint URL.
    pub endpoint: String,
    /// Access token sent with the query.
    pub token: String,
    /// SQL text; may be supplied separately with [`ReportConfig::with_query`].
    #[serde(default)]
    pub query: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// IANA name of the target timezone for temporal columns.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Directory for report files; the executable's directory when absent.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Report file name prefix.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Column-name fragments that mark temporal columns.
    #[serde(default = "default_temporal_triggers")]
    pub temporal_triggers: Vec<String>,
    /// Number of rows echoed to the console after normalization.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
    /// JSON-RPC request identifier.
    #[serde(default = "default_request_id")]
    pub request_id: u64,
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_timezone() -> String {
    "Africa/Cairo".to_string()
}

fn default_file_prefix() -> String {
    "website_data".to_string()
}

fn default_temporal_triggers() -> Vec<String> {
    DEFAULT_TEMPORAL_TRIGGERS
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_preview_rows() -> usize {
    5
}

fn default_request_id() -> u64 {
    1
}

impl ReportConfig {
    /// Config with defaults for everything but the endpoint, token, and query.
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            query: query.into(),
            timeout_seconds: default_timeout_seconds(),
            timezone: default_timezone(),
            output_dir: None,
            file_prefix: default_file_prefix(),
            temporal_triggers: default_temporal_triggers(),
            preview_rows: default_preview_rows(),
            request_id: default_request_id(),
        }
    }

    /// Parse a configuration from JSON text. Call [`ReportConfig::validate`] afterwards.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Replace the query text.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Replace the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    /// Check every field that can be checked without network access.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::invalid("endpoint", "must not be empty"));
        }
        if self.token.trim().is_empty() {
            return Err(ConfigError::invalid("token", "must not be empty"));
        }
        if self.query.trim().is_empty() {
            return Err(ConfigError::invalid("query", "must not be empty"));
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "timeout_seconds",
                "must be greater than zero",
            ));
        }
        self.timezone()?;
        if self.classifier().triggers().is_empty() {
            return Err(ConfigError::invalid(
                "temporal_triggers",
                "must contain at least one non-blank entry",
            ));
        }
        validate_output_name(&self.file_prefix)
            .map_err(|e| ConfigError::invalid("file_prefix", e.to_string()))
    }

    /// Target timezone.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.timezone.parse::<Tz>().map_err(|_| {
            ConfigError::invalid("timezone", format!("unknown timezone '{}'", self.timezone))
        })
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Temporal column classifier built from the configured triggers.
    pub fn classifier(&self) -> TemporalClassifier {
        TemporalClassifier::new(&self.temporal_triggers)
    }

    /// Directory that receives report files.
    ///
    /// Falls back to the directory of the running executable, then to the
    /// working directory.
    pub fn resolve_output_dir(&self) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

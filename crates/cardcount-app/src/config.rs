use cardcount_core::ledger::{LedgerSettings, OverflowPolicy};
use cardcount_core::scoring::CountSystemKind;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_RECENT_WINDOW: usize = 10;
const DEFAULT_LOG_DIR: &str = "logs";

/// Session configuration loaded from YAML. Every block is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub system: CountSystemKind,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: AppConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.ledger.validate()?;
        self.display.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    pub fn ledger_settings(&self) -> LedgerSettings {
        LedgerSettings {
            capacity: self.ledger.capacity,
            policy: self.ledger.overflow,
            system: self.system,
        }
    }
}

/// History bound and what happens when it is hit.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LedgerConfig {
    #[serde(default)]
    pub capacity: Option<usize>,
    #[serde(default)]
    pub overflow: OverflowPolicy,
}

impl LedgerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.capacity == Some(0) {
            return Err(ValidationError::InvalidField {
                field: "ledger.capacity".to_string(),
                message: "history capacity must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_recent_window")]
    pub recent: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            recent: DEFAULT_RECENT_WINDOW,
        }
    }
}

impl DisplayConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.recent == 0 {
            return Err(ValidationError::InvalidField {
                field: "display.recent".to_string(),
                message: "recent window must show at least one entry".to_string(),
            });
        }
        Ok(())
    }
}

fn default_recent_window() -> usize {
    DEFAULT_RECENT_WINDOW
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            log_dir: default_log_dir(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    fn validate(&mut self) -> Result<(), ValidationError> {
        self.normalize();
        if self.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown tracing level '{}'", self.tracing_level),
            });
        }
        if self.enable_structured && self.log_dir.as_os_str().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "logging.log_dir".to_string(),
                message: "log directory must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_DIR)
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL_YAML: &str = r#"
ledger:
  capacity: 330
  overflow: "truncate"
system: "hi_lo"
display:
  recent: 5
logging:
  enable_structured: true
  tracing_level: "debug"
  log_dir: "out/logs"
"#;

    #[test]
    fn loads_full_config() {
        let mut cfg: AppConfig = serde_yaml::from_str(FULL_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.ledger.overflow, OverflowPolicy::Truncate);
        assert_eq!(cfg.ledger_settings().resolved_capacity(), 330);
        assert_eq!(cfg.system, CountSystemKind::HiLo);
        assert_eq!(cfg.display.recent, 5);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));
        assert_eq!(cfg.logging.log_dir, PathBuf::from("out/logs"));

        let settings = cfg.ledger_settings();
        assert_eq!(settings.capacity, Some(330));
        assert_eq!(settings.system, CountSystemKind::HiLo);
    }

    #[test]
    fn empty_document_takes_defaults() {
        let mut cfg: AppConfig = serde_yaml::from_str("{}").expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.ledger.overflow, OverflowPolicy::Reject);
        assert_eq!(cfg.ledger_settings().resolved_capacity(), 200);
        assert_eq!(cfg.display.recent, DEFAULT_RECENT_WINDOW);
        assert!(!cfg.logging.enable_structured);
    }

    #[test]
    fn truncate_without_capacity_uses_its_default() {
        let mut cfg: AppConfig =
            serde_yaml::from_str("ledger:\n  overflow: truncate\n").expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(cfg.ledger_settings().resolved_capacity(), 330);
    }

    #[test]
    fn rejects_zero_capacity() {
        let yaml = FULL_YAML.replace("capacity: 330", "capacity: 0");
        let mut cfg: AppConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("zero capacity");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "ledger.capacity"
        ));
    }

    #[test]
    fn rejects_zero_recent_window() {
        let yaml = FULL_YAML.replace("recent: 5", "recent: 0");
        let mut cfg: AppConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("zero window");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "display.recent"
        ));
    }

    #[test]
    fn rejects_unknown_tracing_level() {
        let yaml = FULL_YAML.replace("\"debug\"", "\"chatty\"");
        let mut cfg: AppConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("bad level");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "logging.tracing_level"
        ));
    }

    #[test]
    fn blank_tracing_level_is_normalized() {
        let yaml = FULL_YAML.replace("\"debug\"", "\"  \"");
        let mut cfg: AppConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(cfg.logging.tracing_level, "info");
    }

    #[test]
    fn unknown_overflow_policy_fails_to_parse() {
        let yaml = FULL_YAML.replace("\"truncate\"", "\"wrap\"");
        assert!(serde_yaml::from_str::<AppConfig>(&yaml).is_err());
    }

    #[test]
    fn from_path_reports_path_on_errors() {
        let missing = PathBuf::from("definitely/not/here.yaml");
        let err = AppConfig::from_path(&missing).expect_err("missing file");
        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(err.path(), missing.as_path());

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "ledger:\n  capacity: 0").expect("write");
        let err = AppConfig::from_path(file.path()).expect_err("invalid");
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}

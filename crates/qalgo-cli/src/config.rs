//! CLI configuration.
//!
//! Values are layered: built-in defaults, then a YAML file, then `QALGO_*`
//! environment variables. Command-line flags are applied on top by the
//! individual commands.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use qalgo_core::Precision;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulator: SimulatorConfig,
    pub phase_estimation: PhaseEstimationConfig,
    pub factoring: FactoringConfig,
    pub chsh: ChshConfig,
    pub logging: LoggingConfig,
}

/// Local simulator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Largest circuit the simulator accepts.
    pub max_qubits: u32,

    /// Seed for reproducible sampling; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: qalgo_adapter_sim::DEFAULT_MAX_QUBITS,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseEstimationConfig {
    /// Counting qubits used when `--precision` is not given.
    pub default_precision: u32,
}

impl Default for PhaseEstimationConfig {
    fn default() -> Self {
        Self {
            default_precision: Precision::default().bits(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoringConfig {
    pub max_attempts: u32,
}

impl Default for FactoringConfig {
    fn default() -> Self {
        Self { max_attempts: 20 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChshConfig {
    pub games: u32,
}

impl Default for ChshConfig {
    fn default() -> Self {
        Self { games: 1000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;
        let config: Config = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// The user config file, `~/.qalgo/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".qalgo").join("config.yaml"))
    }

    /// Load configuration from `path`, or from the user config file when it
    /// exists, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(path)?,
                None => Self::default(),
            },
        };

        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply `QALGO_*` environment variables.
    pub fn merge_env(self) -> Self {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; unparsable values are ignored.
    pub fn merge_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("QALGO_SEED") {
            if let Ok(val) = v.parse() {
                self.simulator.seed = Some(val);
            }
        }
        if let Some(v) = lookup("QALGO_MAX_QUBITS") {
            if let Ok(val) = v.parse() {
                self.simulator.max_qubits = val;
            }
        }
        if let Some(v) = lookup("QALGO_MAX_ATTEMPTS") {
            if let Ok(val) = v.parse() {
                self.factoring.max_attempts = val;
            }
        }
        if let Some(v) = lookup("QALGO_LOG_LEVEL") {
            self.logging.level = v;
        }
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulator.max_qubits == 0 {
            return Err(ConfigError::ValidationError(
                "simulator.max_qubits must be greater than 0".to_string(),
            ));
        }

        let precision = self.phase_estimation.default_precision;
        if !(Precision::MIN..=Precision::MAX).contains(&precision) {
            return Err(ConfigError::ValidationError(format!(
                "phase_estimation.default_precision must be between {} and {}, got {precision}",
                Precision::MIN,
                Precision::MAX
            )));
        }

        if self.factoring.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "factoring.max_attempts must be greater than 0".to_string(),
            ));
        }

        if self.chsh.games == 0 {
            return Err(ConfigError::ValidationError(
                "chsh.games must be greater than 0".to_string(),
            ));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

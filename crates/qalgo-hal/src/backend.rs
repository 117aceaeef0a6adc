//! Backend trait and configuration.
//!
//! The [`Backend`] trait is the only way the algorithms reach a simulator:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ run() / probabilities()
//! ```
//!
//! Every method is synchronous. A run allocates its own state, executes to
//! completion and returns; there are no jobs to poll or cancel.
//!
//! ## Method table
//!
//! | Method | Returns |
//! |--------|---------|
//! | `name()` | `&str` |
//! | `capabilities()` | `&Capabilities` |
//! | `validate()` | `HalResult<ValidationResult>` |
//! | `run()` | `HalResult<ExecutionResult>` |
//! | `probabilities()` | `HalResult<Probabilities>` |

use std::fmt;

use serde::{Deserialize, Serialize};

use qalgo_ir::Circuit;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::result::{ExecutionResult, Probabilities};

/// Configuration for a backend instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Additional configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add extra configuration.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an unsigned integer extra. `None` when absent; a present value
    /// of another type is a configuration error.
    pub fn extra_u64(&self, key: &str) -> HalResult<Option<u64>> {
        match self.extra.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                HalError::Configuration(format!(
                    "'{key}' must be a non-negative integer, got {value}"
                ))
            }),
        }
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("name", &self.name)
            .field("extra", &self.extra)
            .finish()
    }
}

/// Trait for quantum backends.
///
/// # Contract
///
/// - `capabilities()` is infallible and cached at construction time.
/// - `validate()` checks a circuit against the backend's constraints without
///   running it.
/// - `run()` rejects `shots == 0` with `HalError::InvalidShots` and a circuit
///   that fails validation with the matching `HalError`.
/// - `probabilities()` returns the exact outcome distribution over the
///   circuit's classical bits.
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Validate a circuit against backend constraints.
    fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult>;

    /// Execute a circuit and sample `shots` measurement outcomes.
    fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult>;

    /// Compute the exact distribution of measurement outcomes.
    fn probabilities(&self, circuit: &Circuit) -> HalResult<Probabilities>;
}

/// Result of circuit validation against backend constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Circuit can run as-is.
    Valid,
    /// Circuit cannot run on this backend.
    Invalid {
        /// Reasons the circuit is invalid.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check if the circuit is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

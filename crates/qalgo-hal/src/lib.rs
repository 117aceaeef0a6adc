//! qalgo Backend Abstraction Layer
//!
//! This crate is the seam between the algorithms in `qalgo-core` and whatever
//! executes their circuits.
//!
//! # Overview
//!
//! - A synchronous [`Backend`] trait: validate a circuit, run it for a number
//!   of shots, or ask for its exact outcome distribution
//! - [`Capabilities`] to describe qubit limits and the supported gate set
//! - Unified result handling via [`ExecutionResult`], [`Counts`] and
//!   [`Probabilities`]
//!
//! # Supported Backends
//!
//! | Backend | Crate |
//! |---------|-------|
//! | Local statevector simulator | `qalgo-adapter-sim` |
//!
//! # Example: Running a Circuit
//!
//! ```ignore
//! use qalgo_hal::Backend;
//! use qalgo_adapter_sim::SimulatorBackend;
//! use qalgo_ir::Circuit;
//!
//! let backend = SimulatorBackend::with_seed(7);
//! let result = backend.run(&Circuit::bell()?, 1000)?;
//!
//! if let Some((bitstring, count)) = result.counts.most_frequent() {
//!     println!("Most frequent: {} ({} times)", bitstring, count);
//! }
//! ```
//!
//! # Implementing a Custom Backend
//!
//! ```ignore
//! use qalgo_hal::{
//!     Backend, Capabilities, ExecutionResult, HalResult, Probabilities, ValidationResult,
//! };
//! use qalgo_ir::Circuit;
//!
//! struct MyBackend {
//!     capabilities: Capabilities,
//! }
//!
//! impl Backend for MyBackend {
//!     fn name(&self) -> &str { "my_backend" }
//!
//!     fn capabilities(&self) -> &Capabilities {
//!         &self.capabilities
//!     }
//!
//!     fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
//!         Ok(ValidationResult::Valid)
//!     }
//!
//!     fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
//!         # todo!()
//!     }
//!
//!     fn probabilities(&self, circuit: &Circuit) -> HalResult<Probabilities> {
//!         # todo!()
//!     }
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod result;

pub use backend::{Backend, BackendConfig, BackendFactory, ValidationResult};
pub use capability::{Capabilities, GateSet};
pub use error::{HalError, HalResult};
pub use result::{Counts, ExecutionResult, Probabilities};

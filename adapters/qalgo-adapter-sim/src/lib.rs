//! qalgo Local Statevector Simulator
//!
//! This crate provides the local backend every qalgo algorithm runs on. It
//! uses statevector simulation, which gives exact outcome distributions but
//! is limited to roughly 20-25 qubits.
//!
//! # Features
//!
//! - **Exact Simulation**: full statevector over `num-complex` amplitudes
//! - **All Standard Gates**: every gate of `qalgo-ir`, including controlled
//!   composite gates of any depth
//! - **Exact Probabilities**: [`qalgo_hal::Backend::probabilities`] returns the
//!   noiseless outcome distribution
//! - **Reproducible Sampling**: [`SimulatorBackend::with_seed`] fixes the shot
//!   sequence
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 25 | ~512 MB | Slow |
//!
//! # Example
//!
//! ```
//! use qalgo_adapter_sim::SimulatorBackend;
//! use qalgo_hal::Backend;
//! use qalgo_ir::Circuit;
//!
//! let backend = SimulatorBackend::with_seed(7);
//! let result = backend.run(&Circuit::bell().unwrap(), 1000).unwrap();
//!
//! // Only |00⟩ and |11⟩ are ever observed.
//! assert_eq!(result.counts.get("00") + result.counts.get("11"), 1000);
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, SimulatorBackend};

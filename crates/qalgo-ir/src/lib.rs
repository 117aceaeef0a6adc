//! qalgo Circuit Intermediate Representation
//!
//! This crate provides the data structures every algorithm in qalgo builds its
//! circuits with.
//!
//! # Overview
//!
//! The circuit IR uses a DAG (Directed Acyclic Graph) representation internally.
//! The high-level [`Circuit`] API provides a builder pattern for constructing
//! circuits, plus the structural operations the algorithms rely on: composing a
//! sub-circuit onto a register slice, inverting a unitary circuit, and packaging
//! a circuit as a (possibly controlled) [`CompositeGate`].
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]. Ids are dense, and
//!   qubit `k` is bit `k` of a basis-state index.
//! - **Gates**: [`StandardGate`] for built-in gates and [`CompositeGate`] for
//!   gates defined by a sub-circuit
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **DAG**: [`CircuitDag`] for the internal graph representation
//! - **Circuit**: [`Circuit`] high-level builder API
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qalgo_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 3);
//! ```
//!
//! # Example: Controlled Sub-circuit
//!
//! ```rust
//! use qalgo_ir::{Circuit, QubitId};
//!
//! let mut body = Circuit::with_size("swap_x", 2, 0);
//! body.swap(QubitId(0), QubitId(1)).unwrap();
//! body.x(QubitId(1)).unwrap();
//!
//! // One control qubit in front of the two body qubits.
//! let controlled = body.to_gate().unwrap().controlled();
//!
//! let mut circuit = Circuit::with_size("host", 3, 0);
//! circuit
//!     .gate(controlled, [QubitId(2), QubitId(0), QubitId(1)])
//!     .unwrap();
//! assert_eq!(circuit.num_ops(), 1);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg`, `T`, `Tdg` | 1 | Phase-family Clifford+T gates |
//! | `SX`, `SXdg` | 1 | sqrt(X) and its adjoint |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `U` | 1 | Universal single-qubit gate U(θ,φ,λ) |
//! | `CX`, `CY`, `CZ`, `CH` | 2 | Controlled Paulis and Hadamard |
//! | `CRx`, `CRy`, `CRz`, `CP` | 2 | Controlled rotations and phase |
//! | `Swap` | 2 | SWAP gate |
//! | `CCX`, `CSwap` | 3 | Toffoli and Fredkin gates |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::{CompositeGate, Gate, GateKind, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};

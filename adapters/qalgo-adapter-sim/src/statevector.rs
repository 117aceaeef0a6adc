//! Statevector simulation engine.
//!
//! Every kernel takes a control mask: the gate acts only on basis states
//! whose index has all bits of the mask set. Controlled standard gates and
//! composite gates with extra controls reduce to the same kernels with a
//! wider mask.

use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use qalgo_ir::{CompositeGate, GateKind, InstructionKind, StandardGate};

type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// A statevector representing a quantum state.
///
/// Qubit `k` is bit `k` of the amplitude index.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![ZERO; size];
        amplitudes[0] = ONE;
        Self { amplitudes }
    }

    /// Probability of each basis state, indexed like the amplitudes.
    pub fn probabilities(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.amplitudes
            .iter()
            .enumerate()
            .map(|(i, amp)| (i, amp.norm_sqr()))
    }

    /// Apply a gate to the given qubits under an extra control mask.
    ///
    /// Operands must already be validated: in range, distinct, and matching
    /// the gate's arity. Composite bodies must be unitary.
    pub fn apply_gate(&mut self, gate: &GateKind, qubits: &[usize], ctrl: usize) {
        match gate {
            GateKind::Standard(g) => self.apply_standard_gate(g, qubits, ctrl),
            GateKind::Composite(g) => self.apply_composite(g, qubits, ctrl),
        }
    }

    fn apply_composite(&mut self, gate: &CompositeGate, qubits: &[usize], ctrl: usize) {
        let num_controls = gate.num_controls as usize;
        let ctrl = qubits[..num_controls]
            .iter()
            .fold(ctrl, |mask, &q| mask | (1 << q));
        let targets = &qubits[num_controls..];

        for inst in &gate.body {
            if let InstructionKind::Gate(g) = &inst.kind {
                let mapped: Vec<usize> = inst.qubits.iter().map(|q| targets[q.index()]).collect();
                self.apply_gate(&g.kind, &mapped, ctrl);
            }
        }
    }

    /// Apply a standard gate.
    fn apply_standard_gate(&mut self, gate: &StandardGate, q: &[usize], ctrl: usize) {
        match *gate {
            // Single-qubit gates
            StandardGate::I => {}
            StandardGate::X => self.apply_x(q[0], ctrl),
            StandardGate::Y => self.apply_matrix(q[0], [[ZERO, -I], [I, ZERO]], ctrl),
            StandardGate::Z => self.apply_phase(q[0], PI, ctrl),
            StandardGate::H => self.apply_matrix(q[0], hadamard(), ctrl),
            StandardGate::S => self.apply_phase(q[0], PI / 2.0, ctrl),
            StandardGate::Sdg => self.apply_phase(q[0], -PI / 2.0, ctrl),
            StandardGate::T => self.apply_phase(q[0], PI / 4.0, ctrl),
            StandardGate::Tdg => self.apply_phase(q[0], -PI / 4.0, ctrl),
            StandardGate::SX => self.apply_matrix(q[0], sqrt_x(false), ctrl),
            StandardGate::SXdg => self.apply_matrix(q[0], sqrt_x(true), ctrl),
            StandardGate::Rx(t) => self.apply_matrix(q[0], rx(t), ctrl),
            StandardGate::Ry(t) => self.apply_matrix(q[0], ry(t), ctrl),
            StandardGate::Rz(t) => self.apply_diagonal(q[0], rz(t), ctrl),
            StandardGate::P(t) => self.apply_phase(q[0], t, ctrl),
            StandardGate::U(t, p, l) => self.apply_matrix(q[0], u(t, p, l), ctrl),

            // Two-qubit gates: operand 0 joins the control mask
            StandardGate::CX => self.apply_x(q[1], ctrl | (1 << q[0])),
            StandardGate::CY => {
                self.apply_matrix(q[1], [[ZERO, -I], [I, ZERO]], ctrl | (1 << q[0]));
            }
            StandardGate::CZ => self.apply_phase(q[1], PI, ctrl | (1 << q[0])),
            StandardGate::CH => self.apply_matrix(q[1], hadamard(), ctrl | (1 << q[0])),
            StandardGate::CRx(t) => self.apply_matrix(q[1], rx(t), ctrl | (1 << q[0])),
            StandardGate::CRy(t) => self.apply_matrix(q[1], ry(t), ctrl | (1 << q[0])),
            StandardGate::CRz(t) => self.apply_diagonal(q[1], rz(t), ctrl | (1 << q[0])),
            StandardGate::CP(t) => self.apply_phase(q[1], t, ctrl | (1 << q[0])),
            StandardGate::Swap => self.apply_swap(q[0], q[1], ctrl),

            // Three-qubit gates
            StandardGate::CCX => self.apply_x(q[2], ctrl | (1 << q[0]) | (1 << q[1])),
            StandardGate::CSwap => self.apply_swap(q[1], q[2], ctrl | (1 << q[0])),
        }
    }

    // =========================================================================
    // Kernels
    // =========================================================================

    fn apply_x(&mut self, qubit: usize, ctrl: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 && i & ctrl == ctrl {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    /// diag(1, e^{iθ}) on `qubit`.
    fn apply_phase(&mut self, qubit: usize, theta: f64, ctrl: usize) {
        let mask = (1 << qubit) | ctrl;
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == mask {
                *amp *= phase;
            }
        }
    }

    fn apply_diagonal(&mut self, qubit: usize, diag: [Complex64; 2], ctrl: usize) {
        let mask = 1 << qubit;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & ctrl == ctrl {
                *amp *= if i & mask == 0 { diag[0] } else { diag[1] };
            }
        }
    }

    fn apply_matrix(&mut self, qubit: usize, m: Matrix2, ctrl: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 && i & ctrl == ctrl {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize, ctrl: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if i & mask1 != 0 && i & mask2 == 0 && i & ctrl == ctrl {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }
}

// =============================================================================
// Gate matrices
// =============================================================================

fn hadamard() -> Matrix2 {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

/// sqrt(X) = ½[[1+i, 1−i], [1−i, 1+i]]; the adjoint conjugates every entry.
fn sqrt_x(adjoint: bool) -> Matrix2 {
    let (p, m) = (Complex64::new(0.5, 0.5), Complex64::new(0.5, -0.5));
    if adjoint {
        [[m, p], [p, m]]
    } else {
        [[p, m], [m, p]]
    }
}

fn rx(theta: f64) -> Matrix2 {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new(0.0, -(theta / 2.0).sin());
    [[c, s], [s, c]]
}

fn ry(theta: f64) -> Matrix2 {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new((theta / 2.0).sin(), 0.0);
    [[c, -s], [s, c]]
}

fn rz(theta: f64) -> [Complex64; 2] {
    [
        Complex64::from_polar(1.0, -theta / 2.0),
        Complex64::from_polar(1.0, theta / 2.0),
    ]
}

fn u(theta: f64, phi: f64, lambda: f64) -> Matrix2 {
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    [
        [
            Complex64::new(c, 0.0),
            -Complex64::from_polar(s, lambda),
        ],
        [
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use qalgo_ir::{Circuit, QubitId};

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn std(gate: StandardGate) -> GateKind {
        GateKind::Standard(gate)
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert_eq!(sv.amplitudes.len(), 4);
        assert!(approx_eq(sv.amplitudes[0], ONE));
        assert!(sv.amplitudes[1..].iter().all(|a| approx_eq(*a, ZERO)));
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1);
        sv.apply_gate(&std(StandardGate::H), &[0], 0);

        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        assert!(approx_eq(sv.amplitudes[0], h));
        assert!(approx_eq(sv.amplitudes[1], h));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply_gate(&std(StandardGate::H), &[0], 0);
        sv.apply_gate(&std(StandardGate::CX), &[0, 1], 0);

        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        assert!(approx_eq(sv.amplitudes[0], h));
        assert!(approx_eq(sv.amplitudes[1], ZERO));
        assert!(approx_eq(sv.amplitudes[2], ZERO));
        assert!(approx_eq(sv.amplitudes[3], h));
    }

    #[test]
    fn test_sx_squared_is_x() {
        let mut sv = Statevector::new(1);
        sv.apply_gate(&std(StandardGate::SX), &[0], 0);
        sv.apply_gate(&std(StandardGate::SX), &[0], 0);
        assert!(approx_eq(sv.amplitudes[0], ZERO));
        assert!(approx_eq(sv.amplitudes[1], ONE));

        sv.apply_gate(&std(StandardGate::SXdg), &[0], 0);
        sv.apply_gate(&std(StandardGate::SX), &[0], 0);
        assert!(approx_eq(sv.amplitudes[1], ONE));
    }

    #[test]
    fn test_u_matches_named_gates() {
        // U(π, 0, π) = X, U(π/2, 0, π) = H
        let mut a = Statevector::new(1);
        a.apply_gate(&std(StandardGate::U(PI, 0.0, PI)), &[0], 0);
        assert!(approx_eq(a.amplitudes[1], ONE));

        let mut b = Statevector::new(1);
        b.apply_gate(&std(StandardGate::U(PI / 2.0, 0.0, PI)), &[0], 0);
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        assert!(approx_eq(b.amplitudes[0], h));
        assert!(approx_eq(b.amplitudes[1], h));
    }

    #[test]
    fn test_control_mask_blocks_gate() {
        let mut sv = Statevector::new(2);
        // Control on qubit 1, which is |0⟩: nothing happens.
        sv.apply_gate(&std(StandardGate::X), &[0], 0b10);
        assert!(approx_eq(sv.amplitudes[0], ONE));

        sv.apply_gate(&std(StandardGate::X), &[1], 0);
        sv.apply_gate(&std(StandardGate::X), &[0], 0b10);
        assert!(approx_eq(sv.amplitudes[0b11], ONE));
    }

    #[test]
    fn test_cswap_and_ccx() {
        let mut sv = Statevector::new(3);
        // |q2 q1 q0⟩ = |011⟩
        sv.apply_gate(&std(StandardGate::X), &[0], 0);
        sv.apply_gate(&std(StandardGate::X), &[1], 0);
        sv.apply_gate(&std(StandardGate::CCX), &[0, 1, 2], 0);
        assert!(approx_eq(sv.amplitudes[0b111], ONE));

        // control q0 = 1, swap q1 and q2 after clearing q2
        sv.apply_gate(&std(StandardGate::X), &[2], 0);
        sv.apply_gate(&std(StandardGate::CSwap), &[0, 1, 2], 0);
        assert!(approx_eq(sv.amplitudes[0b101], ONE));
    }

    #[test]
    fn test_controlled_composite_phase_kickback() {
        // Body: P(π/2) on its single qubit. With one control it acts like CP.
        let mut body = Circuit::with_size("p", 1, 0);
        body.p(PI / 2.0, QubitId(0)).unwrap();
        let gate = GateKind::Composite(body.to_gate().unwrap().controlled());

        let mut sv = Statevector::new(2);
        sv.apply_gate(&std(StandardGate::H), &[0], 0);
        sv.apply_gate(&std(StandardGate::X), &[1], 0);
        sv.apply_gate(&gate, &[0, 1], 0);

        let h = FRAC_1_SQRT_2;
        assert!(approx_eq(sv.amplitudes[0b10], Complex64::new(h, 0.0)));
        assert!(approx_eq(sv.amplitudes[0b11], Complex64::new(0.0, h)));
    }

    #[test]
    fn test_controlled_rz_keeps_relative_phase() {
        // Controlled-Rz differs from controlled-P: the |1,0⟩ amplitude picks up e^{-iθ/2}.
        let theta = 0.7;
        let mut sv = Statevector::new(2);
        sv.apply_gate(&std(StandardGate::X), &[0], 0);
        sv.apply_gate(&std(StandardGate::CRz(theta)), &[0, 1], 0);
        assert!(approx_eq(
            sv.amplitudes[0b01],
            Complex64::from_polar(1.0, -theta / 2.0)
        ));
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let mut sv = Statevector::new(3);
        for q in 0..3 {
            sv.apply_gate(&std(StandardGate::H), &[q], 0);
        }
        sv.apply_gate(&std(StandardGate::Ry(0.3)), &[1], 0);
        let total: f64 = sv.probabilities().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }
}

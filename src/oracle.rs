//! Measurement oracle (C3): Z- and X-basis probability/phase from ψ.
//!
//! Pure functions only — no caching here. Callers that need the Hadamard
//! image across many challenges (the X-basis path) own that cache
//! themselves (see `response::respond_many`), since `oracle.rs` has no
//! notion of "a proof session" to scope a cache to.

#![forbid(unsafe_code)]

use crate::challenge::Basis;
use crate::vector::{Complex64, StateVector, VectorError};

/// Errors raised while measuring ψ.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// `index` was outside `[0, d)`.
    #[error("index {index} out of range for dimension {dim}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// ψ's dimension.
        dim: usize,
    },
    /// The Hadamard transform (X-basis) failed.
    #[error(transparent)]
    Vector(#[from] VectorError),
}

/// A single measurement outcome: an outcome probability and a phase angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// `|amplitude|^2`, in `[0, 1]`.
    pub probability: f64,
    /// `arg(amplitude)`, in radians.
    pub phase: f64,
}

/// Measure ψ at `index` in the given `basis`.
///
/// Z-basis reads ψ directly; X-basis applies [`crate::vector::hadamard`]
/// once and reads the transformed vector. Neither branch mutates or
/// caches anything — repeated X-basis calls recompute the Hadamard image
/// each time, which is why callers measuring many indices in the X basis
/// should precompute it themselves and call [`measure_amplitude`] instead.
pub fn measure(psi: &StateVector, index: usize, basis: Basis) -> Result<Measurement, OracleError> {
    if index >= psi.dim() {
        return Err(OracleError::IndexOutOfRange { index, dim: psi.dim() });
    }
    match basis {
        Basis::Z => Ok(measurement_of(psi.get(index).expect("index checked above"))),
        Basis::X => {
            let transformed = psi.hadamard()?;
            Ok(measurement_of(transformed.get(index).expect("index checked above")))
        }
    }
}

/// Measure a precomputed amplitude slice at `index`, skipping the Hadamard
/// transform — used by callers that already hold the transformed vector
/// (e.g. a per-proof Hadamard cache).
pub fn measure_amplitude(amplitudes: &[Complex64], index: usize) -> Result<Measurement, OracleError> {
    let amp = amplitudes
        .get(index)
        .copied()
        .ok_or(OracleError::IndexOutOfRange { index, dim: amplitudes.len() })?;
    Ok(measurement_of(amp))
}

fn measurement_of(amp: Complex64) -> Measurement {
    Measurement { probability: amp.norm_sqr(), phase: amp.arg() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_basis_reads_psi_directly() {
        let psi = StateVector::from_amplitudes(vec![Complex64::new(1.0, 0.0), Complex64::ZERO]).unwrap();
        let m = measure(&psi, 0, Basis::Z).unwrap();
        assert!((m.probability - 1.0).abs() < 1e-12);
        assert!(m.phase.abs() < 1e-12);
    }

    #[test]
    fn x_basis_applies_hadamard() {
        let psi = StateVector::from_bytes(b"oracle test", 4).unwrap();
        let direct = psi.hadamard().unwrap();
        let via_oracle = measure(&psi, 1, Basis::X).unwrap();
        let expected = measurement_of(direct.get(1).unwrap());
        assert!((via_oracle.probability - expected.probability).abs() < 1e-12);
        assert!((via_oracle.phase - expected.phase).abs() < 1e-12);
    }

    #[test]
    fn measure_rejects_out_of_range_index() {
        let psi = StateVector::from_bytes(b"x", 4).unwrap();
        assert!(matches!(measure(&psi, 4, Basis::Z), Err(OracleError::IndexOutOfRange { .. })));
    }

    #[test]
    fn probabilities_sum_to_one_across_all_indices() {
        let psi = StateVector::from_bytes(b"distribution check", 8).unwrap();
        let total: f64 = (0..8).map(|i| measure(&psi, i, Basis::Z).unwrap().probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}

//! Vector codec (C1): bytes/raw amplitudes → normalized ℂᵈ, and the
//! order-d Hadamard-like unitary used for X-basis measurements.
//!
//! ## Invariants (spec-aligned)
//! - A [`StateVector`] is always unit-norm (`Σ|ψᵢ|² = 1` within `1e-10`)
//!   and immutable after construction — the only constructors are
//!   [`StateVector::normalize`], [`StateVector::from_bytes`], and
//!   [`StateVector::from_amplitudes`] (which itself normalizes).
//! - [`hadamard`] requires `d` to be a power of two and preserves
//!   normalization to within `1e-10`.
//!
//! `bytes_to_state` is deterministic: identical input bytes always produce
//! identical amplitudes, so proofs of the same secret are linkable only
//! through the identifier/key, never through ψ-randomness (spec §4.1).

#![forbid(unsafe_code)]

use blake3::Hasher;

/// A complex number backed by two `f64` lanes.
///
/// The crate's only representation of an amplitude; every module that
/// touches ψ does so through this type rather than ad hoc `(f64, f64)`
/// pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex64 {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Complex64 {
    /// The additive identity.
    pub const ZERO: Complex64 = Complex64 { re: 0.0, im: 0.0 };

    /// Construct from real/imaginary parts.
    #[inline]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// `|z|^2 = re^2 + im^2`, computed without an intermediate square root.
    #[inline]
    pub fn norm_sqr(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// `arg(z)`, in radians, via `atan2(im, re)`.
    #[inline]
    pub fn arg(&self) -> f64 {
        self.im.atan2(self.re)
    }

    /// Complex conjugate.
    #[inline]
    pub fn conj(&self) -> Self {
        Self { re: self.re, im: -self.im }
    }

    /// Scale by a real factor.
    #[inline]
    pub fn scale(&self, s: f64) -> Self {
        Self { re: self.re * s, im: self.im * s }
    }

    /// Complex addition.
    #[inline]
    pub fn add(&self, other: &Self) -> Self {
        Self { re: self.re + other.re, im: self.im + other.im }
    }

    /// Complex multiplication.
    #[inline]
    pub fn mul(&self, other: &Self) -> Self {
        Self { re: self.re * other.re - self.im * other.im, im: self.re * other.im + self.im * other.re }
    }
}

/// Errors raised while constructing or transforming a [`StateVector`].
#[derive(Debug, thiserror::Error)]
pub enum VectorError {
    /// The input amplitude vector was empty.
    #[error("amplitude vector must be non-empty")]
    Empty,
    /// The input byte string was empty.
    #[error("byte input must be non-empty")]
    EmptyBytes,
    /// `||v||` was too small to normalize safely.
    #[error("vector norm {0:e} is below the normalization floor (1e-18)")]
    ZeroNorm(f64),
    /// `d` was zero or not a power of two where one is required.
    #[error("dimension {0} must be a positive power of two")]
    NotPowerOfTwo(usize),
}

const NORMALIZE_FLOOR: f64 = 1e-18;

/// An immutable, unit-norm vector in ℂᵈ — the prover's secret state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    amplitudes: Vec<Complex64>,
}

impl StateVector {
    /// Dimension `d`.
    #[inline]
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Borrow the amplitudes.
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Amplitude at `index`, if in range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Complex64> {
        self.amplitudes.get(index).copied()
    }

    /// Normalize a raw amplitude vector, constructing a [`StateVector`].
    ///
    /// Fails if `v` is empty or `||v||₂ < 1e-18`.
    pub fn normalize(v: Vec<Complex64>) -> Result<Self, VectorError> {
        if v.is_empty() {
            return Err(VectorError::Empty);
        }
        let norm_sqr: f64 = v.iter().map(Complex64::norm_sqr).sum();
        let norm = norm_sqr.sqrt();
        if norm < NORMALIZE_FLOOR {
            return Err(VectorError::ZeroNorm(norm));
        }
        let inv = 1.0 / norm;
        let amplitudes = v.iter().map(|c| c.scale(inv)).collect();
        Ok(Self { amplitudes })
    }

    /// Alias kept for call-site clarity when the input is already meant to
    /// be read as "raw complex amplitudes" rather than a generic vector.
    #[inline]
    pub fn from_amplitudes(v: Vec<Complex64>) -> Result<Self, VectorError> {
        Self::normalize(v)
    }

    /// Deterministically expand `data` into `d` complex amplitudes and
    /// normalize.
    ///
    /// `seed = BLAKE3(data)`; for `i in 0..d`, `16` bytes are derived as
    /// `BLAKE3(seed || i)` and split into two little-endian `f64` lanes
    /// `(re, im)`. Identical `data` always yields identical output.
    ///
    /// Fails if `d` is zero, not a power of two, or `data` is empty.
    pub fn from_bytes(data: &[u8], d: usize) -> Result<Self, VectorError> {
        if data.is_empty() {
            return Err(VectorError::EmptyBytes);
        }
        if d == 0 || !d.is_power_of_two() {
            return Err(VectorError::NotPowerOfTwo(d));
        }

        let seed = *blake3::hash(data).as_bytes();
        let mut amplitudes = Vec::with_capacity(d);
        for i in 0..d {
            let mut h = Hasher::new();
            h.update(&seed);
            h.update(&(i as u64).to_le_bytes());
            let digest = h.finalize();
            let bytes = digest.as_bytes();

            let mut re_bytes = [0u8; 8];
            let mut im_bytes = [0u8; 8];
            re_bytes.copy_from_slice(&bytes[0..8]);
            im_bytes.copy_from_slice(&bytes[8..16]);

            // Map raw bits into a finite, well-scaled f64 via bit-pattern
            // reinterpretation is avoided (could yield NaN/inf); instead we
            // treat the bytes as a u64 and scale into [-1, 1].
            let re = u64_to_unit_interval(u64::from_le_bytes(re_bytes));
            let im = u64_to_unit_interval(u64::from_le_bytes(im_bytes));
            amplitudes.push(Complex64::new(re, im));
        }

        Self::normalize(amplitudes)
    }

    /// Apply the order-`d` Hadamard-like unitary and return a fresh,
    /// normalized [`StateVector`].
    ///
    /// `H_d[i,j] = (-1)^popcount(i & j) / sqrt(d)`. Requires `d` to be a
    /// power of two.
    pub fn hadamard(&self) -> Result<Self, VectorError> {
        let out = hadamard(&self.amplitudes)?;
        Ok(Self { amplitudes: out })
    }
}

/// Map a `u64` uniformly into `[-1.0, 1.0]`.
fn u64_to_unit_interval(bits: u64) -> f64 {
    // 2^53 buckets give full f64 mantissa precision; shifting right by 11
    // keeps the top 53 bits.
    const SCALE: f64 = 1.0 / ((1u64 << 53) as f64);
    let mantissa = (bits >> 11) as f64 * SCALE; // in [0, 1)
    mantissa * 2.0 - 1.0
}

/// Apply the order-`d` Hadamard-like unitary to a raw amplitude slice.
///
/// Exposed standalone (in addition to [`StateVector::hadamard`]) so callers
/// computing multiple X-basis measurements can apply the transform once and
/// reuse the result (spec §5's "cache the Hadamard result across
/// challenges").
pub fn hadamard(psi: &[Complex64]) -> Result<Vec<Complex64>, VectorError> {
    let d = psi.len();
    if d == 0 || !d.is_power_of_two() {
        return Err(VectorError::NotPowerOfTwo(d));
    }
    let inv_sqrt_d = 1.0 / (d as f64).sqrt();

    let mut out = Vec::with_capacity(d);
    for i in 0..d {
        let mut acc = Complex64::ZERO;
        for (j, amp) in psi.iter().enumerate() {
            let sign = if (i & j).count_ones() % 2 == 0 { 1.0 } else { -1.0 };
            acc = acc.add(&amp.scale(sign));
        }
        out.push(acc.scale(inv_sqrt_d));
    }
    Ok(out)
}

//! Scheme parameters and the precomputed state every ring operation
//! needs (L1/L2 glue).
//!
//! A [`Context`] is created once per scheme instance by [`Context::new`]
//! (the design's `new_scheme`) and is immutable from then on, so it is
//! safe to share across any number of readers — exactly the "configured
//! once, read by everyone" resource the concurrency model calls for.
//! Plaintexts, ciphertexts, and keys all hold an `Arc<Context>` rather
//! than copying `N`/`t`/`q` around.

use crate::error::{Error, Result};
use crate::math::int_mod::{round_div_mod, round_div_mod_wide};
use crate::math::ntt::{is_ntt_friendly, NttTables};
use crate::math::number_theory::{ceil_log, find_ntt_prime};
use crate::math::poly::Poly;
use log::debug;
use rand::Rng;

/// Base of the digit decomposition used by relinearization
/// (§4.3/§4.8's "decomposition of `s²` across multiple levels of a
/// digit-base `w`"). `2^16` keeps the number of key-switch components
/// small while bounding the noise each digit contributes.
pub const DEFAULT_RELIN_BASE_BITS: u32 = 16;

/// Immutable, shareable scheme parameters plus precomputed NTT tables.
#[derive(Debug)]
pub struct Context {
    pub n: usize,
    pub t: u64,
    pub q: u64,
    pub sigma: f64,
    /// `⌊q/t⌋`, the scale factor applied to plaintexts before encryption.
    pub delta: u64,
    /// `N/2`, the batching capacity under coefficient-slot encoding.
    pub slots: usize,
    ntt: Option<NttTables>,
    relin_base: u64,
    relin_len: usize,
}

impl Context {
    /// Builds a new scheme instance: picks a prime `q` of the requested
    /// bit length with `q ≡ 1 (mod 2N)` so the NTT is available, and
    /// precomputes its tables. This is `new_scheme(N, t, q_bits, σ)`.
    pub fn new(n: usize, t: u64, q_bits: u32, sigma: f64) -> Result<Self> {
        if !n.is_power_of_two() || n < 2 {
            return Err(Error::Parameter(format!("N={n} is not a power of two")));
        }
        if sigma <= 0.0 {
            return Err(Error::Parameter(format!("sigma={sigma} must be positive")));
        }
        if t < 2 {
            return Err(Error::Parameter(format!("t={t} must be at least 2")));
        }
        let q = find_ntt_prime(q_bits, 2 * n as u64).ok_or_else(|| {
            Error::Parameter(format!(
                "no {q_bits}-bit prime q with q ≡ 1 (mod {}) exists",
                2 * n
            ))
        })?;
        debug!("new_scheme: N={n}, t={t}, q={q} ({q_bits} bits), sigma={sigma}");
        Self::with_modulus(n, t, q, sigma)
    }

    /// Builds a scheme instance for an explicit modulus `q`, rather than
    /// searching for one. Falls back to schoolbook multiplication when
    /// `q` is not NTT-friendly for this `N`.
    pub fn with_modulus(n: usize, t: u64, q: u64, sigma: f64) -> Result<Self> {
        if !n.is_power_of_two() || n < 2 {
            return Err(Error::Parameter(format!("N={n} is not a power of two")));
        }
        if sigma <= 0.0 {
            return Err(Error::Parameter(format!("sigma={sigma} must be positive")));
        }
        if q <= t {
            return Err(Error::Parameter(format!(
                "q={q} must be larger than t={t}"
            )));
        }

        let ntt = if is_ntt_friendly(n, q) {
            Some(NttTables::new(n, q))
        } else {
            debug!("q={q} is not NTT-friendly for N={n}; falling back to schoolbook multiply");
            None
        };

        let relin_base = 1u64 << DEFAULT_RELIN_BASE_BITS.min(63);
        let relin_len = ceil_log(relin_base, q).max(1);

        Ok(Context {
            n,
            t,
            q,
            sigma,
            delta: q / t,
            slots: n / 2,
            ntt,
            relin_base,
            relin_len,
        })
    }

    pub fn uses_ntt(&self) -> bool {
        self.ntt.is_some()
    }

    pub fn relin_base(&self) -> u64 {
        self.relin_base
    }

    pub fn relin_len(&self) -> usize {
        self.relin_len
    }

    /// True when two values were produced by scheme instances with
    /// identical parameters and are safe to combine.
    pub fn compatible(&self, other: &Context) -> bool {
        self.n == other.n && self.t == other.t && self.q == other.q
    }

    pub fn check_compatible(&self, other: &Context) -> Result<()> {
        if self.compatible(other) {
            Ok(())
        } else {
            Err(Error::ParameterMismatch)
        }
    }

    pub fn zero_poly(&self) -> Poly {
        Poly::zero(self.n, self.q)
    }

    /// Ring multiplication, dispatching to NTT when available and
    /// schoolbook otherwise — the "capability the ring exposes,
    /// selected at construction" rather than caller-chosen per call.
    pub fn mul_poly(&self, a: &Poly, b: &Poly) -> Poly {
        match &self.ntt {
            Some(tables) => a.mul_ntt(b, tables),
            None => a.mul_schoolbook(b),
        }
    }

    pub fn sample_uniform<R: Rng + ?Sized>(&self, rng: &mut R) -> Poly {
        crate::math::sampling::uniform(rng, self.n, self.q)
    }

    pub fn sample_ternary<R: Rng + ?Sized>(&self, rng: &mut R) -> Poly {
        crate::math::sampling::ternary(rng, self.n, self.q)
    }

    pub fn sample_gaussian<R: Rng + ?Sized>(&self, rng: &mut R) -> Poly {
        crate::math::sampling::gaussian(rng, self.n, self.q, self.sigma)
    }

    /// `round(t * v / q) mod t`, the canonical BFV decryption rounding
    /// of §4.5 — not the naive `round(v/Δ)`, which drifts because
    /// `Δ = ⌊q/t⌋ ≠ q/t` exactly.
    pub fn rescale_to_t(&self, centered: i64) -> u64 {
        round_div_mod(centered, self.t, self.q, self.t)
    }

    /// `round(t * e / q) mod q`, the scale correction applied to each
    /// tensor-product component after ciphertext multiplication (§4.7).
    pub fn rescale_to_q(&self, centered: i64) -> u64 {
        round_div_mod(centered, self.t, self.q, self.q)
    }

    /// `round(t * raw / q) mod q` for `raw` an unrounded tensor-product
    /// coefficient (§4.7) that may be far larger than `q` itself —
    /// the exact-integer product of two centered ring elements, before
    /// any modular reduction has discarded precision.
    pub fn rescale_tensor_to_q(&self, raw: i128) -> u64 {
        round_div_mod_wide(raw, self.t, self.q, self.q)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_scheme_rejects_non_power_of_two_n() {
        let err = Context::new(100, 65537, 30, 3.2).unwrap_err();
        assert!(matches!(err, Error::Parameter(_)));
    }

    #[test]
    fn new_scheme_rejects_non_positive_sigma() {
        let err = Context::new(16, 65537, 30, 0.0).unwrap_err();
        assert!(matches!(err, Error::Parameter(_)));
    }

    #[test]
    fn new_scheme_picks_ntt_friendly_modulus() {
        let ctx = Context::new(64, 257, 30, 3.2).unwrap();
        assert!(ctx.uses_ntt());
        assert_eq!((ctx.q - 1) % (2 * 64), 0);
    }

    #[test]
    fn delta_and_slots_are_derived_correctly() {
        let ctx = Context::new(64, 257, 30, 3.2).unwrap();
        assert_eq!(ctx.delta, ctx.q / ctx.t);
        assert_eq!(ctx.slots, 32);
    }

    #[test]
    fn incompatible_contexts_are_detected() {
        let a = Context::new(64, 257, 30, 3.2).unwrap();
        let b = Context::new(64, 65537, 30, 3.2).unwrap();
        assert!(a.check_compatible(&b).is_err());
        assert!(a.check_compatible(&a).is_ok());
    }
}

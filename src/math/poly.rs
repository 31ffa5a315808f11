//! The ring `R_q = Z_q[X]/(X^N + 1)` (L1): coefficient-form polynomials,
//! the schoolbook negacyclic convolution, and the scalar operations that
//! don't need a full ring multiply.
//!
//! Every `Poly` is kept in canonical coefficient form with values in
//! `[0, q)`; NTT (evaluation) form lives only transiently inside
//! [`crate::math::ntt`] and is never stored back into a `Poly` directly.

use super::int_mod::{add_mod, mul_mod, neg_mod, reduce_signed, sub_mod};
use super::ntt::NttTables;
use serde::{Deserialize, Serialize};

/// A polynomial in `R_q`, coefficient form, `coeffs[i]` the coefficient
/// of `X^i`. `coeffs.len()` is the ring degree `N`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poly {
    pub coeffs: Vec<u64>,
    pub q: u64,
}

impl Poly {
    pub fn zero(n: usize, q: u64) -> Self {
        Poly {
            coeffs: vec![0; n],
            q,
        }
    }

    pub fn n(&self) -> usize {
        self.coeffs.len()
    }

    /// Builds a polynomial from signed coefficients, reducing each into
    /// `[0, q)`.
    pub fn from_signed(values: &[i64], q: u64) -> Self {
        Poly {
            coeffs: values.iter().map(|&v| reduce_signed(v, q)).collect(),
            q,
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        debug_assert_eq!(self.q, other.q);
        debug_assert_eq!(self.n(), other.n());
        Poly {
            coeffs: self
                .coeffs
                .iter()
                .zip(other.coeffs.iter())
                .map(|(&a, &b)| add_mod(a, b, self.q))
                .collect(),
            q: self.q,
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        debug_assert_eq!(self.q, other.q);
        debug_assert_eq!(self.n(), other.n());
        Poly {
            coeffs: self
                .coeffs
                .iter()
                .zip(other.coeffs.iter())
                .map(|(&a, &b)| sub_mod(a, b, self.q))
                .collect(),
            q: self.q,
        }
    }

    pub fn neg(&self) -> Self {
        Poly {
            coeffs: self.coeffs.iter().map(|&a| neg_mod(a, self.q)).collect(),
            q: self.q,
        }
    }

    /// Multiplies every coefficient by a scalar already reduced mod `q`.
    pub fn mul_scalar_mod(&self, scalar: u64) -> Self {
        Poly {
            coeffs: self
                .coeffs
                .iter()
                .map(|&a| mul_mod(a, scalar, self.q))
                .collect(),
            q: self.q,
        }
    }

    /// Multiplies every coefficient by a raw (unreduced) scalar.
    pub fn mul_scalar(&self, scalar: u64) -> Self {
        self.mul_scalar_mod(scalar % self.q)
    }

    /// Negacyclic convolution via the full `2N-1`-term schoolbook
    /// product, folded by `X^N ≡ -1`. `O(N^2)`; used as the reference
    /// implementation, the fallback when `q` isn't NTT-friendly, and
    /// for cross-checking the NTT path in tests.
    pub fn mul_schoolbook(&self, other: &Self) -> Self {
        debug_assert_eq!(self.q, other.q);
        debug_assert_eq!(self.n(), other.n());
        let n = self.n();
        let q = self.q;
        let mut acc = vec![0u64; n];
        for (i, &ai) in self.coeffs.iter().enumerate() {
            if ai == 0 {
                continue;
            }
            for (j, &bj) in other.coeffs.iter().enumerate() {
                if bj == 0 {
                    continue;
                }
                let prod = mul_mod(ai, bj, q);
                let k = i + j;
                if k < n {
                    acc[k] = add_mod(acc[k], prod, q);
                } else {
                    acc[k - n] = sub_mod(acc[k - n], prod, q);
                }
            }
        }
        Poly { coeffs: acc, q }
    }

    /// Negacyclic convolution via forward/pointwise/inverse NTT.
    /// Requires `tables` built for this polynomial's degree and
    /// modulus. Produces the same result as [`Poly::mul_schoolbook`].
    pub fn mul_ntt(&self, other: &Self, tables: &NttTables) -> Self {
        debug_assert_eq!(self.q, other.q);
        debug_assert_eq!(self.n(), tables.n);
        let q = self.q;

        let mut a = self.coeffs.clone();
        let mut b = other.coeffs.clone();
        tables.forward(&mut a);
        tables.forward(&mut b);
        let mut c: Vec<u64> = a
            .iter()
            .zip(b.iter())
            .map(|(&x, &y)| mul_mod(x, y, q))
            .collect();
        tables.backward(&mut c);

        Poly { coeffs: c, q }
    }
}

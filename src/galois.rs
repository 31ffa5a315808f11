//! Galois automorphisms of `R_q`, used for slot rotation (§4.3/§4.9).
//!
//! The design flags the source's rotation keys as built from a raw
//! coefficient shift of the secret key, which does not match the
//! standard BFV/Galois automorphism and was left as an open question.
//! This crate resolves it the recommended way: `φ_r` is the ring
//! automorphism `X ↦ X^{5^r mod 2N}`, the same one used to build
//! rotation keys in `rotation_keygen` and to evaluate them in
//! [`crate::ciphertext::Ciphertext::rotate`]. `5` generates a subgroup
//! of `(Z/2NZ)^*` of index 2, giving `N/2` distinct rotations of the
//! `N/2` batching slots, which is the standard BFV galois-group choice.

use crate::math::int_mod::{add_mod, sub_mod};
use crate::math::poly::Poly;

/// The Galois group element `5^r mod 2N` corresponding to rotating the
/// packed slots by `r` positions.
pub fn galois_element(r: i64, n: usize) -> u64 {
    let modulus = 2 * n as u64;
    let exp = r.rem_euclid(n as i64) as u64;
    let mut result = 1u64;
    let mut base = 5u64 % modulus;
    let mut e = exp;
    while e > 0 {
        if e & 1 == 1 {
            result = (result * base) % modulus;
        }
        base = (base * base) % modulus;
        e >>= 1;
    }
    result
}

/// Applies the automorphism `X ↦ X^g` to `poly`, for `g` odd and
/// coprime to `2N` (as produced by [`galois_element`]).
pub fn apply_galois(poly: &Poly, g: u64) -> Poly {
    let n = poly.n();
    let two_n = 2 * n as u64;
    debug_assert_eq!(g % 2, 1, "galois element must be odd");

    let mut result = Poly::zero(n, poly.q);
    for (i, &coeff) in poly.coeffs.iter().enumerate() {
        if coeff == 0 {
            continue;
        }
        let new_exp = (i as u64 * g) % two_n;
        let target = (new_exp % n as u64) as usize;
        if new_exp < n as u64 {
            result.coeffs[target] = add_mod(result.coeffs[target], coeff, poly.q);
        } else {
            result.coeffs[target] = sub_mod(result.coeffs[target], coeff, poly.q);
        }
    }
    result
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn identity_rotation_is_identity() {
        let q = 97;
        let g = galois_element(0, 8);
        assert_eq!(g, 1);
        let p = Poly::from_signed(&[1, 2, 3, 4, 5, 6, 7, 8], q);
        assert_eq!(apply_galois(&p, g), p);
    }

    #[test]
    fn galois_element_is_odd_and_in_range() {
        let n = 16;
        for r in 0..n as i64 {
            let g = galois_element(r, n);
            assert_eq!(g % 2, 1);
            assert!(g < 2 * n as u64);
        }
    }

    #[test]
    fn applying_galois_twice_with_inverse_exponents_restores_input() {
        // 5^r * 5^{n - r} = 5^n ≡ 1 (mod 2n) since 5 has order n in (Z/2nZ)^*... here we
        // just check applying g then g's multiplicative inverse mod 2n is identity.
        let n = 8usize;
        let q = 97;
        let g = galois_element(1, n);
        let two_n = 2 * n as u64;
        // find inverse of g mod 2n by brute force (2n is tiny)
        let mut inv = 1u64;
        for cand in 1..two_n {
            if (g * cand) % two_n == 1 {
                inv = cand;
                break;
            }
        }
        let p = Poly::from_signed(&[1, 2, 3, 4, 5, 6, 7, 8], q);
        let rotated = apply_galois(&p, g);
        let restored = apply_galois(&rotated, inv);
        assert_eq!(restored, p);
    }
}

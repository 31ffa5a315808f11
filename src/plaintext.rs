//! Plaintext encoding/decoding (L3, §4.4).
//!
//! Coefficient-slot encoding: value `i` lands in coefficient `i` of the
//! plaintext polynomial. This is the minimal variant the design allows;
//! it loses true SIMD semantics under ciphertext multiplication (a
//! packed CRT/NTT-over-`Z_t` encoding would give independent slots that
//! multiply pointwise — not implemented here, noted as an extension
//! point rather than a requirement).

use crate::context::Context;
use crate::error::{Error, Result};
use crate::math::int_mod::{center_mod, reduce_signed};
use crate::math::poly::Poly;
use std::sync::Arc;

/// A plaintext polynomial, coefficients reduced mod `t`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plaintext {
    pub(crate) ctx: Arc<Context>,
    pub(crate) poly: Poly,
}

impl Plaintext {
    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }

    pub(crate) fn check_compatible(&self, ctx: &Context) -> Result<()> {
        ctx.check_compatible(&self.ctx)
    }
}

/// Encodes a single integer into slot 0, all other coefficients zero.
pub fn encode_single(ctx: &Arc<Context>, value: i64) -> Plaintext {
    let mut coeffs = vec![0i64; ctx.n];
    coeffs[0] = value;
    encode_vec_unchecked(ctx, &coeffs)
}

/// Encodes up to `slots` integers into consecutive coefficients.
pub fn encode_vec(ctx: &Arc<Context>, values: &[i64]) -> Result<Plaintext> {
    if values.len() > ctx.slots {
        return Err(Error::Shape(format!(
            "{} values exceed the {} available slots",
            values.len(),
            ctx.slots
        )));
    }
    Ok(encode_vec_unchecked(ctx, values))
}

fn encode_vec_unchecked(ctx: &Arc<Context>, values: &[i64]) -> Plaintext {
    let mut coeffs = vec![0u64; ctx.n];
    for (slot, &v) in values.iter().enumerate() {
        coeffs[slot] = reduce_signed(v, ctx.t) % ctx.t;
    }
    // Plaintext coefficients are reduced mod t but represented in the
    // same [0, q) coefficient storage as any other Poly; q > t always.
    Plaintext {
        ctx: ctx.clone(),
        poly: Poly { coeffs, q: ctx.q },
    }
}

/// Decodes the first `count` coefficients as centered signed integers
/// mod `t`.
pub fn decode(pt: &Plaintext, count: usize) -> Vec<i64> {
    let ctx = &pt.ctx;
    pt.poly.coeffs[..count.min(ctx.n)]
        .iter()
        .map(|&c| center_mod(c % ctx.t, ctx.t))
        .collect()
}

/// Decodes a single value from slot 0.
pub fn decode_single(pt: &Plaintext) -> i64 {
    decode(pt, 1)[0]
}

//! Key material (L2): secret key, public key, relinearization key, and
//! rotation keys.
//!
//! Keys are generated once per scheme instance and are immutable from
//! then on. The secret key's confidentiality is the caller's
//! responsibility (§5); everything else here is safe to publish and to
//! share across threads without synchronization once built.

use crate::context::Context;
use crate::error::{Error, Result};
use crate::galois::{apply_galois, galois_element};
use crate::math::poly::Poly;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

/// The secret key `s`: a ternary polynomial. Never published.
#[derive(Clone, Debug)]
pub struct SecretKey {
    pub(crate) ctx: Arc<Context>,
    pub(crate) s: Poly,
}

/// The public key `(b, a)` with `b = -(a*s + e) mod q`.
#[derive(Clone, Debug)]
pub struct PublicKey {
    pub(crate) ctx: Arc<Context>,
    pub(crate) b: Poly,
    pub(crate) a: Poly,
}

/// One digit-decomposed key-switching pair `(b_i, a_i)` satisfying
/// `b_i + a_i*s ≡ w^i * target + e_i (mod q)` for the base-`w` digit
/// layer `i`.
pub type KeySwitchKey = Vec<(Poly, Poly)>;

/// Reduces the noise growth of relinearization (§4.3/§4.8/§9) by
/// decomposing `s²` into `ℓ = ⌈log_w q⌉` digits of base `w`, each
/// encrypted under its own key-switching pair, rather than the source's
/// single-component evaluation key.
#[derive(Clone, Debug)]
pub struct RelinKey {
    pub(crate) ctx: Arc<Context>,
    pub(crate) components: KeySwitchKey,
}

/// One rotation amount's key-switching key, encoding `φ_r(s)` under `s`.
#[derive(Clone, Debug)]
pub struct RotationKey {
    pub(crate) ctx: Arc<Context>,
    pub(crate) galois_element: u64,
    pub(crate) components: KeySwitchKey,
}

/// Decomposes every coefficient of `poly` (taken in its canonical
/// `[0, q)` representation) into `len` base-`base` digits, least
/// significant first. `base^len` must be at least `q` for the
/// decomposition to be exact.
pub fn decompose_base_w(poly: &Poly, base: u64, len: usize) -> Vec<Poly> {
    let n = poly.n();
    let mut layers: Vec<Poly> = (0..len).map(|_| Poly::zero(n, poly.q)).collect();
    for (i, &coeff) in poly.coeffs.iter().enumerate() {
        let mut remaining = coeff;
        for layer in layers.iter_mut() {
            layer.coeffs[i] = remaining % base;
            remaining /= base;
        }
    }
    layers
}

/// Builds one digit-decomposed key-switching key encrypting `target`
/// under `s`: for each digit layer `i`, `a_i` uniform, `e_i` Gaussian,
/// `b_i = -(a_i*s + e_i) + w^i * target mod q`.
fn key_switch_keygen<R: Rng + ?Sized>(
    ctx: &Context,
    s: &Poly,
    target: &Poly,
    rng: &mut R,
) -> KeySwitchKey {
    let base = ctx.relin_base();
    let len = ctx.relin_len();

    let mut components = Vec::with_capacity(len);
    let mut w_pow = 1u64 % ctx.q;
    for _ in 0..len {
        let a_i = ctx.sample_uniform(rng);
        let e_i = ctx.sample_gaussian(rng);
        let a_s = ctx.mul_poly(&a_i, s);
        let a_s_e = a_s.add(&e_i);
        let scaled_target = target.mul_scalar(w_pow);
        let b_i = a_s_e.neg().add(&scaled_target);
        components.push((b_i, a_i));
        w_pow = (w_pow as u128 * base as u128 % ctx.q as u128) as u64;
    }
    components
}

/// Applies a digit-decomposed key-switching key to `component`: for
/// each digit layer, multiply the decomposed digit by the layer's
/// key-switch pair and accumulate.
pub(crate) fn key_switch_apply(
    ctx: &Context,
    key: &KeySwitchKey,
    component: &Poly,
) -> (Poly, Poly) {
    let digits = decompose_base_w(component, ctx.relin_base(), ctx.relin_len());
    let mut acc_b = ctx.zero_poly();
    let mut acc_a = ctx.zero_poly();
    for (digit, (b_i, a_i)) in digits.iter().zip(key.iter()) {
        acc_b = acc_b.add(&ctx.mul_poly(digit, b_i));
        acc_a = acc_a.add(&ctx.mul_poly(digit, a_i));
    }
    (acc_b, acc_a)
}

/// `keygen()`: samples a ternary secret key and the public key
/// `(b, a)` with `b = -(a*s + e) mod q` (§4.3).
pub fn keygen<R: Rng + ?Sized>(ctx: &Arc<Context>, rng: &mut R) -> (SecretKey, PublicKey) {
    let s = ctx.sample_ternary(rng);
    let a = ctx.sample_uniform(rng);
    let e = ctx.sample_gaussian(rng);

    let a_s = ctx.mul_poly(&a, &s);
    let a_s_e = a_s.add(&e);
    let b = a_s_e.neg();

    (
        SecretKey {
            ctx: ctx.clone(),
            s,
        },
        PublicKey {
            ctx: ctx.clone(),
            b,
            a,
        },
    )
}

/// `relin_keygen(s)`: digit-decomposed key-switching key encrypting
/// `s²` under `s` (§4.3/§4.8).
pub fn relin_keygen<R: Rng + ?Sized>(sk: &SecretKey, rng: &mut R) -> RelinKey {
    let ctx = &sk.ctx;
    let s_squared = ctx.mul_poly(&sk.s, &sk.s);
    let components = key_switch_keygen(ctx, &sk.s, &s_squared, rng);
    RelinKey {
        ctx: ctx.clone(),
        components,
    }
}

/// `rotation_keygen(s, [r...])`: one digit-decomposed key-switching key
/// per requested rotation amount, encoding `φ_r(s)` under `s` (§4.3).
pub fn rotation_keygen<R: Rng + ?Sized>(
    sk: &SecretKey,
    rotations: &[i64],
    rng: &mut R,
) -> HashMap<i64, RotationKey> {
    let ctx = &sk.ctx;
    let mut keys = HashMap::with_capacity(rotations.len());
    for &r in rotations {
        let g = galois_element(r, ctx.n);
        let rotated_s = apply_galois(&sk.s, g);
        let components = key_switch_keygen(ctx, &sk.s, &rotated_s, rng);
        keys.insert(
            r,
            RotationKey {
                ctx: ctx.clone(),
                galois_element: g,
                components,
            },
        );
    }
    keys
}

impl SecretKey {
    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }
}

impl PublicKey {
    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }
}

impl RelinKey {
    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }

    pub(crate) fn check_compatible(&self, ctx: &Context) -> Result<()> {
        ctx.check_compatible(&self.ctx)
    }
}

impl RotationKey {
    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }
}

/// Looks up the rotation key for amount `r`, or reports the missing
/// key-material error of §7.
pub fn find_rotation_key(
    keys: &HashMap<i64, RotationKey>,
    r: i64,
) -> Result<&RotationKey> {
    keys.get(&r).ok_or(Error::State("no rotation key for r"))
}

//! The wire format of §6: a fixed header of scheme parameters followed
//! by the component coefficients, so a ciphertext or plaintext can be
//! written to disk or sent over a socket and reconstructed without any
//! side channel carrying `N`/`t`/`q` separately.
//!
//! Wire structs are kept deliberately separate from [`Context`],
//! [`Plaintext`], and [`Ciphertext`] themselves: a `Context` carries
//! precomputed NTT tables that have no business on the wire, and
//! encoding always goes through the coefficient-form `Poly` the ring
//! layer already guarantees, never through transient NTT (evaluation)
//! form.

use crate::ciphertext::Ciphertext;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::math::poly::Poly;
use crate::plaintext::Plaintext;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize, Deserialize)]
struct Header {
    n: usize,
    t: u64,
    q: u64,
    sigma: f64,
}

#[derive(Serialize, Deserialize)]
struct CiphertextWire {
    header: Header,
    /// Number of ring-element components (2 for fresh/relinearized, 3
    /// for an unrelinearized product).
    size: usize,
    /// `size * n` coefficients, components concatenated in order.
    coeffs: Vec<u64>,
}

#[derive(Serialize, Deserialize)]
struct PlaintextWire {
    header: Header,
    coeffs: Vec<u64>,
}

fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| Error::Serialization(e.to_string()))
}

fn from_bytes<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| Error::Serialization(e.to_string()))
}

/// Encodes a ciphertext as `(N, t, q, σ, size)` followed by its
/// coefficients.
pub fn serialize_ciphertext(ct: &Ciphertext) -> Result<Vec<u8>> {
    let ctx = &ct.ctx;
    let wire = CiphertextWire {
        header: Header {
            n: ctx.n,
            t: ctx.t,
            q: ctx.q,
            sigma: ctx.sigma,
        },
        size: ct.components.len(),
        coeffs: ct.components.iter().flat_map(|p| p.coeffs.clone()).collect(),
    };
    to_bytes(&wire)
}

/// Decodes a ciphertext, reconstructing its `Context` from the header
/// rather than requiring the caller to already have one on hand.
/// Returns the ciphertext together with the context it was built
/// against, since the caller has no other way to obtain one compatible
/// with it.
pub fn deserialize_ciphertext(bytes: &[u8]) -> Result<(Arc<Context>, Ciphertext)> {
    let wire: CiphertextWire = from_bytes(bytes)?;
    let ctx = Arc::new(Context::with_modulus(
        wire.header.n,
        wire.header.t,
        wire.header.q,
        wire.header.sigma,
    )?);

    if wire.coeffs.len() != wire.size * ctx.n {
        return Err(Error::Serialization(format!(
            "expected {} coefficients for size {} at N={}, got {}",
            wire.size * ctx.n,
            wire.size,
            ctx.n,
            wire.coeffs.len()
        )));
    }

    let components = wire
        .coeffs
        .chunks_exact(ctx.n)
        .map(|chunk| Poly {
            coeffs: chunk.to_vec(),
            q: ctx.q,
        })
        .collect();

    Ok((
        ctx.clone(),
        Ciphertext {
            ctx,
            components,
        },
    ))
}

/// Encodes a plaintext as `(N, t, q, σ)` followed by its coefficients.
pub fn serialize_plaintext(pt: &Plaintext) -> Result<Vec<u8>> {
    let ctx = &pt.ctx;
    let wire = PlaintextWire {
        header: Header {
            n: ctx.n,
            t: ctx.t,
            q: ctx.q,
            sigma: ctx.sigma,
        },
        coeffs: pt.poly.coeffs.clone(),
    };
    to_bytes(&wire)
}

/// Decodes a plaintext, reconstructing its `Context` from the header.
pub fn deserialize_plaintext(bytes: &[u8]) -> Result<(Arc<Context>, Plaintext)> {
    let wire: PlaintextWire = from_bytes(bytes)?;
    let ctx = Arc::new(Context::with_modulus(
        wire.header.n,
        wire.header.t,
        wire.header.q,
        wire.header.sigma,
    )?);

    if wire.coeffs.len() != ctx.n {
        return Err(Error::Serialization(format!(
            "expected {} coefficients at N={}, got {}",
            ctx.n,
            ctx.n,
            wire.coeffs.len()
        )));
    }

    let poly = Poly {
        coeffs: wire.coeffs,
        q: ctx.q,
    };
    Ok((
        ctx.clone(),
        Plaintext {
            ctx,
            poly,
        },
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::keys::keygen;
    use crate::plaintext::{decode_single, encode_single};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn plaintext_round_trips_through_bytes() {
        let ctx = Arc::new(Context::new(64, 257, 30, 3.2).unwrap());
        let pt = encode_single(&ctx, 17);
        let bytes = serialize_plaintext(&pt).unwrap();
        let (restored_ctx, restored) = deserialize_plaintext(&bytes).unwrap();
        assert!(restored_ctx.compatible(&ctx));
        assert_eq!(decode_single(&restored), 17);
    }

    #[test]
    fn ciphertext_round_trips_through_bytes() {
        let ctx = Arc::new(Context::new(64, 257, 30, 3.2).unwrap());
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let (sk, pk) = keygen(&ctx, &mut rng);
        let pt = encode_single(&ctx, -5);
        let ct = crate::ciphertext::encrypt(&ctx, &pk, &pt, &mut rng).unwrap();

        let bytes = serialize_ciphertext(&ct).unwrap();
        let (restored_ctx, restored) = deserialize_ciphertext(&bytes).unwrap();
        assert!(restored_ctx.compatible(&ctx));
        assert_eq!(restored.size(), 2);

        let decoded = crate::ciphertext::decrypt(&sk, &restored).unwrap();
        assert_eq!(decode_single(&decoded), -5);
    }

    #[test]
    fn truncated_payload_is_a_serialization_error() {
        let ctx = Arc::new(Context::new(64, 257, 30, 3.2).unwrap());
        let pt = encode_single(&ctx, 1);
        let mut bytes = serialize_plaintext(&pt).unwrap();
        bytes.truncate(bytes.len() - 4);
        assert!(matches!(
            deserialize_plaintext(&bytes),
            Err(Error::Serialization(_))
        ));
    }
}

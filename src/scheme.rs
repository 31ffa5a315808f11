//! The stateful scheme facade (§6): the one entry point most callers
//! need, wrapping a [`Context`] plus whatever key material has been
//! generated so far and dispatching to the free functions in
//! [`crate::keys`], [`crate::plaintext`], and [`crate::ciphertext`].
//!
//! Nothing here is reachable without going through `Scheme` except the
//! lower-level modules themselves, which remain public for callers who
//! want to manage key material by hand (e.g. to keep a secret key out
//! of a process that only ever encrypts).

use crate::ciphertext::{self, Ciphertext};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::keys::{self, PublicKey, RelinKey, RotationKey, SecretKey};
use crate::plaintext::{self, Plaintext};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

/// A BFV scheme instance: parameters plus whatever keys have been
/// generated. `encrypt` only needs the public key; `decrypt` only the
/// secret key; `relinearize`/`rotate` need their respective evaluation
/// keys. Each accessor reports [`Error::State`] rather than panicking
/// when the required key hasn't been generated yet.
pub struct Scheme {
    ctx: Arc<Context>,
    secret_key: Option<SecretKey>,
    public_key: Option<PublicKey>,
    relin_key: Option<RelinKey>,
    rotation_keys: HashMap<i64, RotationKey>,
}

impl Scheme {
    /// `new_scheme(N, t, q_bits, σ)`: picks an NTT-friendly `q` of the
    /// requested bit length and builds an (as yet keyless) scheme
    /// instance.
    pub fn new(n: usize, t: u64, q_bits: u32, sigma: f64) -> Result<Self> {
        Ok(Self::from_context(Arc::new(Context::new(
            n, t, q_bits, sigma,
        )?)))
    }

    /// Builds a scheme instance around an already-constructed
    /// [`Context`], e.g. one loaded alongside a deserialized ciphertext.
    pub fn from_context(ctx: Arc<Context>) -> Self {
        Scheme {
            ctx,
            secret_key: None,
            public_key: None,
            relin_key: None,
            rotation_keys: HashMap::new(),
        }
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }

    pub fn has_secret_key(&self) -> bool {
        self.secret_key.is_some()
    }

    pub fn has_public_key(&self) -> bool {
        self.public_key.is_some()
    }

    pub fn has_relin_key(&self) -> bool {
        self.relin_key.is_some()
    }

    pub fn secret_key(&self) -> Result<&SecretKey> {
        self.secret_key.as_ref().ok_or(Error::State("no secret key"))
    }

    pub fn public_key(&self) -> Result<&PublicKey> {
        self.public_key.as_ref().ok_or(Error::State("no public key"))
    }

    pub fn relin_key(&self) -> Result<&RelinKey> {
        self.relin_key.as_ref().ok_or(Error::State("no relin key"))
    }

    /// `keygen()`: samples a fresh secret/public key pair, replacing any
    /// key material this instance already held.
    pub fn keygen<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (sk, pk) = keys::keygen(&self.ctx, rng);
        self.secret_key = Some(sk);
        self.public_key = Some(pk);
        self.relin_key = None;
        self.rotation_keys.clear();
    }

    /// `relin_keygen()`: requires a secret key to already exist.
    pub fn relin_keygen<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let rlk = keys::relin_keygen(self.secret_key()?, rng);
        self.relin_key = Some(rlk);
        Ok(())
    }

    /// `rotation_keygen([r...])`: generates one key per rotation amount
    /// requested, merging into whatever rotation keys already exist.
    pub fn rotation_keygen<R: Rng + ?Sized>(
        &mut self,
        rotations: &[i64],
        rng: &mut R,
    ) -> Result<()> {
        let generated = keys::rotation_keygen(self.secret_key()?, rotations, rng);
        self.rotation_keys.extend(generated);
        Ok(())
    }

    pub fn encode_single(&self, value: i64) -> Plaintext {
        plaintext::encode_single(&self.ctx, value)
    }

    pub fn encode_vec(&self, values: &[i64]) -> Result<Plaintext> {
        plaintext::encode_vec(&self.ctx, values)
    }

    pub fn decode(&self, pt: &Plaintext, count: usize) -> Vec<i64> {
        plaintext::decode(pt, count)
    }

    pub fn decode_single(&self, pt: &Plaintext) -> i64 {
        plaintext::decode_single(pt)
    }

    /// `encrypt(pk, m)`, using this instance's own public key.
    pub fn encrypt<R: Rng + ?Sized>(&self, pt: &Plaintext, rng: &mut R) -> Result<Ciphertext> {
        ciphertext::encrypt(&self.ctx, self.public_key()?, pt, rng)
    }

    /// `decrypt(sk, ct)`, using this instance's own secret key.
    pub fn decrypt(&self, ct: &Ciphertext) -> Result<Plaintext> {
        ciphertext::decrypt(self.secret_key()?, ct)
    }

    pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        ciphertext::add(a, b)
    }

    pub fn sub(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        ciphertext::sub(a, b)
    }

    pub fn negate(&self, a: &Ciphertext) -> Ciphertext {
        ciphertext::negate(a)
    }

    pub fn multiply(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        ciphertext::multiply(a, b)
    }

    pub fn multiply_plain(&self, ct: &Ciphertext, pt: &Plaintext) -> Result<Ciphertext> {
        ciphertext::multiply_plain(ct, pt)
    }

    /// `relinearize(ct)`, using this instance's own relinearization key.
    pub fn relinearize(&self, ct: &Ciphertext) -> Result<Ciphertext> {
        ciphertext::relinearize(ct, self.relin_key()?)
    }

    /// `rotate(ct, r)`, using this instance's rotation key for `r`.
    pub fn rotate(&self, ct: &Ciphertext, r: i64) -> Result<Ciphertext> {
        let rk = keys::find_rotation_key(&self.rotation_keys, r)?;
        ciphertext::rotate(ct, rk)
    }
}

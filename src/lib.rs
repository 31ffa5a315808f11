//! A BFV (Brakerski-Fan-Vercauteren) lattice-based homomorphic
//! encryption engine: ring arithmetic over `R_q = Z_q[X]/(X^N+1)`, key
//! generation, and the full homomorphic operation surface (add, sub,
//! multiply with relinearization, plaintext multiplication, negation,
//! and slot rotation via Galois automorphisms).
//!
//! The crate is organized bottom-up:
//!
//! - [`math`]: modular arithmetic, the NTT, the ring `Poly` type, and
//!   RNG-agnostic sampling (L0/L1).
//! - [`context`]: scheme parameters and precomputed ring state,
//!   shared by everything above it via `Arc<Context>` (L1/L2 glue).
//! - [`galois`]: the automorphisms `rotate` uses.
//! - [`keys`]: secret/public/relinearization/rotation key material.
//! - [`plaintext`] / [`ciphertext`]: encoding and the homomorphic ops.
//! - [`scheme`]: the stateful facade most callers should reach for
//!   first.
//! - [`serialization`]: the wire format for plaintexts and ciphertexts.
//!
//! Most programs only need [`scheme::Scheme`]; the lower-level modules
//! stay public for callers who want to manage key material themselves.

pub mod ciphertext;
pub mod context;
pub mod error;
pub mod galois;
pub mod keys;
pub mod math;
pub mod plaintext;
pub mod scheme;
pub mod serialization;

pub use ciphertext::Ciphertext;
pub use context::Context;
pub use error::{Error, Result};
pub use keys::{PublicKey, RelinKey, RotationKey, SecretKey};
pub use plaintext::Plaintext;
pub use scheme::Scheme;

//! Library-wide error and result types.
//!
//! Mirrors the error kinds named by the scheme design: parameter
//! validation, missing key material, shape mismatches, cross-instance
//! mixing, and decryption failure. Internal invariants (coefficient
//! range, polynomial length) are enforced by construction and checked
//! with `debug_assert!`; they never surface here unless something has
//! gone very wrong.

use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the core can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A scheme parameter was invalid, e.g. `N` not a power of two, `q`
    /// not NTT-compatible when NTT was requested, or `sigma <= 0`.
    Parameter(String),
    /// An operation needed key material that was never generated.
    State(&'static str),
    /// A plaintext or ciphertext had an unexpected shape: too many
    /// slots, or a ciphertext size an operation doesn't accept.
    Shape(String),
    /// Two operands came from different scheme instances.
    ParameterMismatch,
    /// Decryption produced a value inconsistent with the noise budget
    /// (the centered lift fell outside `(-t/2, t/2]`).
    Decryption,
    /// The wire format of §6 failed to encode or decode.
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parameter(msg) => write!(f, "invalid parameter: {msg}"),
            Error::State(what) => write!(f, "missing key material: {what}"),
            Error::Shape(msg) => write!(f, "shape error: {msg}"),
            Error::ParameterMismatch => {
                write!(f, "operands belong to different scheme instances")
            }
            Error::Decryption => write!(f, "decryption failed: noise budget exceeded"),
            Error::Serialization(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

//! Ring and modular arithmetic layer (L0/L1).

pub mod int_mod;
pub mod ntt;
pub mod number_theory;
pub mod poly;
pub mod sampling;

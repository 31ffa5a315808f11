//! Random sampling of ring elements (L1): uniform, ternary, and bounded
//! discrete Gaussian.
//!
//! Every sampler takes `&mut impl Rng` rather than owning a generator —
//! tests inject a seeded [`rand_chacha::ChaCha20Rng`] for reproducible
//! runs, production callers pass a per-thread `ThreadRng` or a
//! mutex-guarded shared one. No sampler holds any state of its own.

use super::poly::Poly;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Draws a uniform value in `[0, q)` with no modulo bias, by rejection
/// sampling over the `u64` source.
pub fn uniform_mod<R: Rng + ?Sized>(rng: &mut R, q: u64) -> u64 {
    let limit = u64::MAX - (u64::MAX % q);
    loop {
        let x = rng.gen::<u64>();
        if x < limit {
            return x % q;
        }
    }
}

/// A uniform ring element, every coefficient independently in `[0, q)`.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, n: usize, q: u64) -> Poly {
    Poly {
        coeffs: (0..n).map(|_| uniform_mod(rng, q)).collect(),
        q,
    }
}

/// A ternary ring element, every coefficient independently and
/// uniformly `{-1, 0, 1}`, represented in `[0, q)`.
pub fn ternary<R: Rng + ?Sized>(rng: &mut R, n: usize, q: u64) -> Poly {
    // 256 % 3 != 0, so reject byte values >= 255 to avoid bias.
    let draw_trit = |rng: &mut R| -> i64 {
        loop {
            let b = rng.gen::<u8>();
            if b < 255 {
                return (b % 3) as i64 - 1;
            }
        }
    };
    let coeffs: Vec<i64> = (0..n).map(|_| draw_trit(rng)).collect();
    Poly::from_signed(&coeffs, q)
}

/// A discrete Gaussian ring element with standard deviation `sigma`,
/// sampled by rounding a continuous normal draw and truncating to the
/// `±⌈6σ⌉` tail cutoff, one of the strategies the design explicitly
/// allows alongside inverse-CDT tables and Knuth-Yao.
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, n: usize, q: u64, sigma: f64) -> Poly {
    let bound = (6.0 * sigma).ceil() as i64;
    let normal = Normal::new(0.0, sigma).expect("sigma must be positive");
    let coeffs: Vec<i64> = (0..n)
        .map(|_| {
            let sample = normal.sample(rng).round() as i64;
            sample.clamp(-bound, bound)
        })
        .collect();
    Poly::from_signed(&coeffs, q)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn uniform_mod_stays_in_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let q = 97;
        for _ in 0..1000 {
            assert!(uniform_mod(&mut rng, q) < q);
        }
    }

    #[test]
    fn ternary_coefficients_are_valid() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let q = 65537;
        let p = ternary(&mut rng, 64, q);
        for &c in &p.coeffs {
            assert!(c == 0 || c == 1 || c == q - 1);
        }
    }

    #[test]
    fn gaussian_respects_tail_bound() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let q = 65537;
        let sigma = 3.2;
        let bound = (6.0 * sigma).ceil() as i64;
        let p = gaussian(&mut rng, 256, q, sigma);
        for &c in &p.coeffs {
            let centered = super::super::int_mod::center_mod(c, q);
            assert!(centered.unsigned_abs() as i64 <= bound);
        }
    }

    #[test]
    fn sampling_is_deterministic_given_a_seed() {
        let mut rng1 = ChaCha20Rng::seed_from_u64(42);
        let mut rng2 = ChaCha20Rng::seed_from_u64(42);
        let a = uniform(&mut rng1, 16, 65537);
        let b = uniform(&mut rng2, 16, 65537);
        assert_eq!(a, b);
    }
}

//! Randomness seam for the particle factories.
//!
//! Particle generation never calls a global RNG; it takes a `RandomSource` so
//! tests can pin a seed (or script exact draws) and the browser can seed from
//! `crypto.getRandomValues` when the `rng` feature is on.

/// Uniform source of `f64` values in `[0, 1)`.
pub trait RandomSource {
    fn unit(&mut self) -> f64;

    /// Uniform value in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.unit() * (hi - lo)
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// Uniform index in `0..len` (0 when `len == 0`).
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.unit() * len as f64) as usize).min(len - 1)
    }
}

impl RandomSource for fastrand::Rng {
    fn unit(&mut self) -> f64 {
        self.f64()
    }
}

/// Build the page-lifetime generator.
pub fn seeded_from_host() -> fastrand::Rng {
    fastrand::Rng::with_seed(host_seed())
}

#[cfg(feature = "rng")]
fn host_seed() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(err) => {
            log::warn!("getrandom failed ({err}); seeding from clock");
            clock_seed()
        }
    }
}

#[cfg(not(feature = "rng"))]
fn host_seed() -> u64 {
    clock_seed()
}

fn clock_seed() -> u64 {
    let now = web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0);
    // LCG scramble so nearby timestamps diverge
    now.to_bits()
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}


#[cfg(test)]
mod tests {
    use super::testing::Scripted;
    use super::*;

    #[test]
    fn range_maps_unit_interval() {
        let mut r = Scripted::new(&[0.0, 0.5]);
        assert_eq!(r.range(120.0, 360.0), 120.0);
        assert_eq!(r.range(120.0, 360.0), 240.0);
    }

    #[test]
    fn index_stays_in_bounds_near_one() {
        let mut r = Scripted::constant(0.999_999_999);
        assert_eq!(r.index(3), 2);
        assert_eq!(r.index(0), 0);
    }

    #[test]
    fn fastrand_seed_is_deterministic() {
        let mut a = fastrand::Rng::with_seed(42);
        let mut b = fastrand::Rng::with_seed(42);
        for _ in 0..16 {
            let (x, y) = (a.unit(), b.unit());
            assert_eq!(x, y);
            assert!((0.0..1.0).contains(&x));
        }
    }
}

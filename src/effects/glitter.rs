//! Glitter burst: a one-shot cluster of DOM sparkles.
//!
//! Each sparkle is fully described up front (end offset, spin, duration) and
//! the stylesheet interpolates it; nothing here is stepped per frame.

use std::f64::consts::TAU;

use crate::rng::RandomSource;

pub const DEFAULT_GLITTER_COUNT: usize = 110;
/// Container removal delay. Must stay above `MAX_PARTICLE_DURATION_MS`.
pub const BURST_LIFETIME_MS: u32 = 2200;
pub const MAX_PARTICLE_DURATION_MS: f64 = 1800.0;

const MIN_DISTANCE: f64 = 120.0;
const MAX_DISTANCE: f64 = 360.0;
const MIN_LIFT: f64 = 40.0;
const MAX_LIFT: f64 = 120.0;
const MIN_DURATION_MS: f64 = 900.0;
const MIN_SIZE: f64 = 2.0;
const MAX_SIZE: f64 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metal {
    Gold,
    Silver,
}

impl Metal {
    pub fn as_str(self) -> &'static str {
        match self {
            Metal::Gold => "gold",
            Metal::Silver => "silver",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlitterParticle {
    /// End offset from the burst origin, px.
    pub dx: f64,
    pub dy: f64,
    pub rotation_deg: f64,
    pub duration_ms: f64,
    pub size_px: f64,
    pub metal: Metal,
}

#[derive(Clone, Debug)]
pub struct GlitterBurst {
    pub origin: (f64, f64),
    pub particles: Vec<GlitterParticle>,
}

impl GlitterBurst {
    /// Longest particle animation in this burst.
    pub fn longest_duration_ms(&self) -> f64 {
        self.particles.iter().map(|p| p.duration_ms).fold(0.0, f64::max)
    }
}

pub fn particle<R: RandomSource>(rng: &mut R) -> GlitterParticle {
    let angle = rng.unit() * TAU;
    let dist = rng.range(MIN_DISTANCE, MAX_DISTANCE);
    let lift = rng.range(MIN_LIFT, MAX_LIFT);
    GlitterParticle {
        dx: angle.cos() * dist,
        dy: angle.sin() * dist - lift,
        rotation_deg: rng.range(-360.0, 360.0),
        duration_ms: rng.range(MIN_DURATION_MS, MAX_PARTICLE_DURATION_MS),
        size_px: rng.range(MIN_SIZE, MAX_SIZE),
        metal: if rng.chance(0.5) { Metal::Gold } else { Metal::Silver },
    }
}

pub fn burst<R: RandomSource>(rng: &mut R, origin: (f64, f64), count: usize) -> GlitterBurst {
    GlitterBurst {
        origin,
        particles: (0..count).map(|_| particle(rng)).collect(),
    }
}

/// Burst sized for callers that don't pick a count.
pub fn default_burst<R: RandomSource>(rng: &mut R, origin: (f64, f64)) -> GlitterBurst {
    burst(rng, origin, DEFAULT_GLITTER_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::testing::Scripted;

    #[test]
    fn lifetime_outlasts_every_particle() {
        assert!(f64::from(BURST_LIFETIME_MS) > MAX_PARTICLE_DURATION_MS);
        let mut rng = fastrand::Rng::with_seed(11);
        let b = burst(&mut rng, (0.0, 0.0), 500);
        assert!(b.longest_duration_ms() < f64::from(BURST_LIFETIME_MS));
    }

    #[test]
    fn parameters_fall_in_declared_ranges() {
        let mut rng = fastrand::Rng::with_seed(3);
        let b = burst(&mut rng, (200.0, 100.0), 400);
        assert_eq!(b.particles.len(), 400);
        assert_eq!(b.origin, (200.0, 100.0));
        for p in &b.particles {
            // radial distance before lift is in [120, 360); lift pushes up by [40, 120)
            let horiz = p.dx.abs();
            assert!(horiz < MAX_DISTANCE);
            assert!(p.dy < MAX_DISTANCE - MIN_LIFT + 1e-9);
            assert!(p.dy >= -MAX_DISTANCE - MAX_LIFT);
            assert!((-360.0..360.0).contains(&p.rotation_deg));
            assert!((900.0..1800.0).contains(&p.duration_ms));
            assert!((2.0..6.0).contains(&p.size_px));
        }
    }

    #[test]
    fn zero_draws_give_lower_bounds() {
        // angle 0, dist 120, lift 40, rot -360, dur 900, size 2, gold
        let mut rng = Scripted::constant(0.0);
        let p = particle(&mut rng);
        assert!((p.dx - 120.0).abs() < 1e-9);
        assert!((p.dy + 40.0).abs() < 1e-9);
        assert_eq!(p.rotation_deg, -360.0);
        assert_eq!(p.duration_ms, 900.0);
        assert_eq!(p.size_px, 2.0);
        assert_eq!(p.metal, Metal::Gold);
    }

    #[test]
    fn metal_split_uses_half_threshold() {
        let mut rng = Scripted::new(&[0.25, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5]);
        let p = particle(&mut rng);
        assert_eq!(p.metal, Metal::Silver);
        assert_eq!(Metal::Silver.as_str(), "silver");
    }

    #[test]
    fn default_burst_mixes_both_metals() {
        let mut rng = fastrand::Rng::with_seed(99);
        let b = default_burst(&mut rng, (12.0, 34.0));
        assert_eq!(b.particles.len(), DEFAULT_GLITTER_COUNT);
        assert_eq!(b.origin, (12.0, 34.0));
        assert!(b.particles.iter().any(|p| p.metal == Metal::Gold));
        assert!(b.particles.iter().any(|p| p.metal == Metal::Silver));
    }
}

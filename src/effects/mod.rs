//! Particle effects. Both factories are pure and take a `RandomSource`;
//! drawing lives in `crate::web`.

pub mod confetti;
pub mod glitter;

pub use confetti::{ConfettiSim, ConfettiStatus, Viewport};
pub use glitter::{GlitterBurst, Metal};

//! Canvas confetti: two side cannons, frame-stepped physics.
//!
//! Units are CSS pixels and frames; velocities are px/frame and gravity is
//! px/frame². The host calls `step` once per animation frame and then draws
//! `particles()`.

use std::f64::consts::TAU;

use crate::rng::RandomSource;

pub const PER_SIDE: usize = 120;
pub const MAX_PARTICLES: usize = PER_SIDE * 2;
pub const RUN_TIME_MS: f64 = 2600.0;
pub const PALETTE: [&str; 3] = ["#d9b75a", "#cfd3d7", "#ffffff"];

/// Particles falling this far below the viewport are culled.
const BOTTOM_MARGIN: f64 = 40.0;
const SIDE_OFFSET: f64 = 10.0;
/// Life at which opacity starts fading.
const FADE_FRAMES: f64 = 120.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Launch angle window in degrees.
    fn angle_window(self) -> (f64, f64) {
        match self {
            Side::Left => (-20.0, 30.0),
            Side::Right => (150.0, 200.0),
        }
    }

    fn origin_x(self, viewport: Viewport) -> f64 {
        match self {
            Side::Left => -SIDE_OFFSET,
            Side::Right => viewport.width + SIDE_OFFSET,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConfettiParticle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub gravity: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub spin: f64,
    pub color: &'static str,
    /// Remaining frames.
    pub life: i32,
}

impl ConfettiParticle {
    pub fn spawn<R: RandomSource>(rng: &mut R, side: Side, viewport: Viewport) -> Self {
        let speed = rng.range(3.0, 9.0);
        let (lo, hi) = side.angle_window();
        let angle = rng.range(lo, hi).to_radians();
        let y = viewport.height * rng.range(0.25, 0.75);
        let kick = rng.range(2.0, 5.0);
        Self {
            x: side.origin_x(viewport),
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed - kick,
            gravity: rng.range(0.09, 0.17),
            width: rng.range(6.0, 16.0),
            height: rng.range(3.0, 10.0),
            rotation: rng.unit() * TAU,
            spin: rng.range(-0.11, 0.11),
            color: PALETTE[rng.index(PALETTE.len())],
            life: rng.range(160.0, 220.0).floor() as i32,
        }
    }

    /// Advance one frame.
    pub fn advance(&mut self) {
        self.vy += self.gravity;
        self.x += self.vx;
        self.y += self.vy;
        self.rotation += self.spin;
        self.life -= 1;
    }

    pub fn alpha(&self) -> f64 {
        (f64::from(self.life) / FADE_FRAMES).clamp(0.0, 1.0)
    }

    fn is_dead(&self, viewport: Viewport) -> bool {
        self.life <= 0 || self.y > viewport.height + BOTTOM_MARGIN
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfettiStatus {
    Running,
    Finished,
}

pub struct ConfettiSim {
    viewport: Viewport,
    started_ms: f64,
    particles: Vec<ConfettiParticle>,
    frames: u32,
}

impl ConfettiSim {
    pub fn launch<R: RandomSource>(rng: &mut R, viewport: Viewport, now_ms: f64) -> Self {
        let mut particles = Vec::with_capacity(MAX_PARTICLES);
        for side in [Side::Left, Side::Right] {
            particles.extend((0..PER_SIDE).map(|_| ConfettiParticle::spawn(rng, side, viewport)));
        }
        Self { viewport, started_ms: now_ms, particles, frames: 0 }
    }

    pub fn particles(&self) -> &[ConfettiParticle] {
        &self.particles
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// One frame: integrate, cull, and decide whether another frame is due.
    /// A finished sim holds no particles.
    pub fn step(&mut self, now_ms: f64) -> ConfettiStatus {
        self.frames += 1;
        for p in &mut self.particles {
            p.advance();
        }
        let viewport = self.viewport;
        self.particles.retain(|p| !p.is_dead(viewport));

        if now_ms - self.started_ms < RUN_TIME_MS && !self.particles.is_empty() {
            ConfettiStatus::Running
        } else {
            self.particles.clear();
            ConfettiStatus::Finished
        }
    }
}

/// Canvas backing-store scale: device pixel ratio capped at 2.
pub fn backing_scale(device_pixel_ratio: f64) -> f64 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(2.0)
    } else {
        1.0
    }
}

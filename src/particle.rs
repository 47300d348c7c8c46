use glam::Vec2;
use rand::Rng;

use crate::{
    color::Color,
    effect::{Lifecycle, SpawnRanges},
    surface::{DrawError, Surface},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub color: Color,
}

pub fn spawn(rng: &mut impl Rng, origin: Vec2, ranges: &SpawnRanges, color: Color) -> Particle {
    Particle {
        position: origin,
        velocity: Vec2::new(
            rng.gen_range(ranges.speed.clone()),
            rng.gen_range(ranges.speed.clone()),
        ),
        size: rng.gen_range(ranges.size.clone()),
        color,
    }
}

/// Advance by `dt` reference ticks
pub fn update(particle: &mut Particle, lifecycle: &Lifecycle, dt: f32) {
    particle.position += particle.velocity * dt;

    if particle.size > lifecycle.floor {
        particle.size = (particle.size - lifecycle.decay * dt).max(lifecycle.floor);
    }
}

pub fn is_expired(particle: &Particle, lifecycle: &Lifecycle) -> bool {
    particle.size <= lifecycle.threshold
}

pub fn draw(particle: &Particle, surface: &mut impl Surface) -> Result<(), DrawError> {
    surface.draw_circle(particle.position, particle.size, particle.color, None)
}

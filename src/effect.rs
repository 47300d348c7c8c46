//! Per-variant effect settings

use std::ops::Range;

use crate::{color::Color, surface::Stroke};

/// The four effects, each one adds a feature on top of the previous
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Variant {
    /// A circle following the pointer
    Cursor,
    /// Particles bursting from the pointer, leaving fading trails
    Emitter,
    /// The emitter with a cycling spawn hue
    Spectrum,
    /// The spectrum emitter with lines between nearby particles
    Constellation,
}

/// How each tick starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// Wipe the surface
    Clear,
    /// Composite translucent black over the previous frame, leaving trails
    Fade(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleColor {
    Fixed(Color),
    /// Spawn with the current hue, advancing it by `step` per tick
    Cycle { step: f32 },
}

/// Size decay of a particle, in units per reference tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifecycle {
    pub decay: f32,
    /// Sizes are never decayed below this
    pub floor: f32,
    /// Particles at or below this size are removed
    pub threshold: f32,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            decay: 0.1,
            floor: 0.2,
            threshold: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRanges {
    pub size: Range<f32>,
    pub speed: Range<f32>,
}

impl Default for SpawnRanges {
    fn default() -> Self {
        Self {
            size: 1.0..16.0,
            speed: -1.5..1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorStyle {
    pub radius: f32,
    pub fill: Color,
    pub stroke: Stroke,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkStyle {
    /// Pairs strictly closer than this are linked
    pub distance: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectConfig {
    pub background: Background,
    pub cursor: Option<CursorStyle>,
    pub press_burst: usize,
    pub move_burst: usize,
    pub particle_color: ParticleColor,
    pub links: Option<LinkStyle>,
    pub lifecycle: Lifecycle,
    pub spawn: SpawnRanges,
}

impl EffectConfig {
    pub fn preset(variant: Variant) -> Self {
        let emitter = Self {
            background: Background::Fade(0.1),
            cursor: None,
            press_burst: 10,
            move_burst: 2,
            particle_color: ParticleColor::Fixed(Color::WHITE),
            links: None,
            lifecycle: Lifecycle::default(),
            spawn: SpawnRanges::default(),
        };

        match variant {
            Variant::Cursor => Self {
                background: Background::Clear,
                cursor: Some(CursorStyle {
                    radius: 50.0,
                    fill: Color::BLUE,
                    stroke: Stroke::new(Color::WHITE, 5.0),
                }),
                press_burst: 0,
                move_burst: 0,
                ..emitter
            },
            Variant::Emitter => emitter,
            Variant::Spectrum => Self {
                background: Background::Fade(0.05),
                particle_color: ParticleColor::Cycle { step: 1.0 },
                ..emitter
            },
            Variant::Constellation => Self {
                background: Background::Fade(0.02),
                particle_color: ParticleColor::Cycle { step: 1.0 },
                links: Some(LinkStyle {
                    distance: 100.0,
                    width: 0.2,
                }),
                ..emitter
            },
        }
    }
}

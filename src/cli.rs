#[cfg(feature = "capture")]
use std::path::PathBuf;

use clap::Parser;

use crate::effect::{Background, EffectConfig, Variant};

/// Particle trails following the mouse pointer
#[derive(Parser, Debug)]
#[command()]
pub struct Args {
    /// The effect to run, each variant builds on the previous one
    #[arg(value_enum, default_value_t = Variant::Constellation)]
    pub variant: Variant,

    /// The framerate the effect will run at
    ///
    /// if default the effect will run as fast as possible
    /// and capture is disabled
    #[arg(short, long)]
    pub framerate: Option<u32>,

    /// Speed multiplier for particle motion, decay and hue cycling
    #[arg(short, long, default_value_t = 1.0f32, value_parser = positive_f32)]
    pub time_scale: f32,

    /// Opacity of the black fill fading old frames, `0` clears instead
    #[arg(long)]
    pub fade: Option<f32>,

    /// Particles spawned per click
    #[arg(long)]
    pub press_burst: Option<usize>,

    /// Particles spawned per pointer movement
    #[arg(long)]
    pub move_burst: Option<usize>,

    /// Distance below which particles are linked, only for variants with links
    #[arg(long)]
    pub link_distance: Option<f32>,

    /// Seed for reproducible particle spawns
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show the statistics overlay
    #[arg(long)]
    pub overlay: bool,

    /// Append raw RGBA frames to this file, requires `--framerate`
    #[cfg(feature = "capture")]
    #[arg(long)]
    pub capture: Option<PathBuf>,
}

fn positive_f32(value: &str) -> Result<f32, String> {
    let value: f32 = value.parse().map_err(|err| format!("{err}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("must be a positive number, got {value}"))
    }
}

impl Args {
    /// The variant's preset with the command line overrides applied
    pub fn effect(&self) -> EffectConfig {
        let mut effect = EffectConfig::preset(self.variant);

        if let Some(alpha) = self.fade {
            effect.background = if alpha > 0.0 {
                Background::Fade(alpha.min(1.0))
            } else {
                Background::Clear
            };
        }
        if let Some(burst) = self.press_burst {
            effect.press_burst = burst;
        }
        if let Some(burst) = self.move_burst {
            effect.move_burst = burst;
        }
        if let (Some(distance), Some(links)) = (self.link_distance, effect.links.as_mut()) {
            links.distance = distance;
        }

        effect
    }
}

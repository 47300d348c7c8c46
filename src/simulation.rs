//! Pointer input and the per-tick frame logic

use glam::Vec2;
use log::warn;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    color::Color,
    effect::{Background, EffectConfig, ParticleColor},
    registry::ParticleRegistry,
    surface::Surface,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Press(Vec2),
    Move(Vec2),
    Resize { width: u32, height: u32 },
}

/// Turns window cursor reports into pointer events.
///
/// Buttons carry no position, a press is only known once the cursor has moved.
#[derive(Debug, Default)]
pub struct Cursor {
    position: Option<Vec2>,
}

impl Cursor {
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    pub fn moved(&mut self, position: Vec2) -> InputEvent {
        self.position = Some(position);
        InputEvent::Move(position)
    }

    pub fn pressed(&self) -> Option<InputEvent> {
        self.position.map(InputEvent::Press)
    }
}

/// What happened during one tick
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TickStats {
    pub particles: usize,
    pub links: usize,
    pub evicted: usize,
}

pub struct Simulation {
    pub config: EffectConfig,
    /// Unknown until the first pointer event
    pub pointer: Option<Vec2>,
    pub registry: ParticleRegistry,
    /// Degrees, never wrapped
    pub hue: f64,
    rng: StdRng,
}

impl Simulation {
    pub fn new(config: EffectConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            pointer: None,
            registry: ParticleRegistry::new(),
            hue: 0.0,
            rng,
        }
    }

    /// Apply one input event. Resizes go to `surface`, pointer events spawn
    /// bursts unless `spawn` is false.
    pub fn handle_input(&mut self, event: InputEvent, surface: &mut impl Surface, spawn: bool) {
        let (position, burst) = match event {
            InputEvent::Resize { width, height } => {
                surface.resize(width, height);
                return;
            }
            InputEvent::Press(position) => (position, self.config.press_burst),
            InputEvent::Move(position) => (position, self.config.move_burst),
        };

        self.pointer = Some(position);
        if spawn {
            let color = self.spawn_color();
            self.registry.spawn_burst(
                &mut self.rng,
                position,
                burst,
                &self.config.spawn,
                color,
            );
        }
    }

    fn spawn_color(&self) -> Color {
        match self.config.particle_color {
            ParticleColor::Fixed(color) => color,
            ParticleColor::Cycle { .. } => Color::spectrum(self.hue.rem_euclid(360.0) as f32),
        }
    }

    /// Render one frame onto `surface` and advance by `dt` reference ticks
    pub fn tick(&mut self, surface: &mut impl Surface, dt: f32) -> TickStats {
        match self.config.background {
            Background::Clear => surface.clear_all(),
            Background::Fade(alpha) => surface.fill_all(Color::BLACK.with_alpha(alpha)),
        }

        if let (Some(cursor), Some(pointer)) = (self.config.cursor, self.pointer) {
            if let Err(err) =
                surface.draw_circle(pointer, cursor.radius, cursor.fill, Some(cursor.stroke))
            {
                warn!("Skipped cursor: {err}");
            }
        }

        self.registry.update_all(&self.config.lifecycle, dt);
        self.registry.draw_all(surface);

        let links = self
            .config
            .links
            .map_or(0, |style| self.registry.draw_links(&style, surface));
        let evicted = self.registry.evict_expired(&self.config.lifecycle);

        if let ParticleColor::Cycle { step } = self.config.particle_color {
            self.hue += f64::from(step * dt);
        }

        TickStats {
            particles: self.registry.len(),
            links,
            evicted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        effect::Variant,
        surface::recording::{Command, Recorder},
    };

    fn simulation(variant: Variant) -> Simulation {
        Simulation::new(EffectConfig::preset(variant), Some(42))
    }

    #[test]
    fn press_needs_a_cursor_position() {
        let mut cursor = Cursor::default();
        assert_eq!(cursor.pressed(), None);

        assert_eq!(
            cursor.moved(Vec2::new(7.0, 9.0)),
            InputEvent::Move(Vec2::new(7.0, 9.0))
        );
        assert_eq!(cursor.pressed(), Some(InputEvent::Press(Vec2::new(7.0, 9.0))));
        assert_eq!(cursor.position(), Some(Vec2::new(7.0, 9.0)));
    }

    #[test]
    fn early_press_spawns_nothing() {
        let mut sim = simulation(Variant::Emitter);
        let mut surface = Recorder::new(800, 600);
        let cursor = Cursor::default();

        if let Some(event) = cursor.pressed() {
            sim.handle_input(event, &mut surface, true);
        }

        assert_eq!(sim.pointer, None);
        assert!(sim.registry.is_empty());
    }

    #[test]
    fn pointer_is_unknown_until_input() {
        let mut sim = simulation(Variant::Cursor);
        let mut surface = Recorder::new(800, 600);

        sim.tick(&mut surface, 1.0);
        assert_eq!(sim.pointer, None);
        assert!(surface.circles().is_empty());

        sim.handle_input(InputEvent::Move(Vec2::new(30.0, 40.0)), &mut surface, true);
        surface.commands.clear();
        sim.tick(&mut surface, 1.0);

        assert_eq!(sim.pointer, Some(Vec2::new(30.0, 40.0)));
        assert_eq!(
            surface.commands,
            vec![
                Command::Clear {
                    x: 0.0,
                    y: 0.0,
                    width: 800.0,
                    height: 600.0
                },
                Command::Circle {
                    center: Vec2::new(30.0, 40.0),
                    radius: 50.0,
                    fill: Color::BLUE,
                    stroke: Some(crate::surface::Stroke::new(Color::WHITE, 5.0)),
                },
            ]
        );
        assert!(sim.registry.is_empty());
    }

    #[test]
    fn press_spawns_a_burst_at_the_pointer() {
        let mut sim = simulation(Variant::Constellation);
        let mut surface = Recorder::new(800, 600);

        sim.handle_input(InputEvent::Press(Vec2::new(200.0, 150.0)), &mut surface, true);

        assert_eq!(sim.pointer, Some(Vec2::new(200.0, 150.0)));
        assert_eq!(sim.registry.len(), 10);
        assert!(sim
            .registry
            .particles()
            .iter()
            .all(|p| p.position == Vec2::new(200.0, 150.0)));
    }

    #[test]
    fn move_spawns_a_smaller_burst() {
        let mut sim = simulation(Variant::Emitter);
        let mut surface = Recorder::new(800, 600);

        sim.handle_input(InputEvent::Move(Vec2::new(1.0, 2.0)), &mut surface, true);
        sim.handle_input(InputEvent::Move(Vec2::new(3.0, 4.0)), &mut surface, true);

        assert_eq!(sim.registry.len(), 4);
        assert_eq!(sim.pointer, Some(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn suppressed_input_only_moves_the_pointer() {
        let mut sim = simulation(Variant::Emitter);
        let mut surface = Recorder::new(800, 600);

        sim.handle_input(InputEvent::Press(Vec2::new(5.0, 5.0)), &mut surface, false);

        assert_eq!(sim.pointer, Some(Vec2::new(5.0, 5.0)));
        assert!(sim.registry.is_empty());
    }

    #[test]
    fn resize_changes_the_fade_extents() {
        let mut sim = simulation(Variant::Emitter);
        let mut surface = Recorder::new(800, 600);

        sim.handle_input(
            InputEvent::Resize {
                width: 400,
                height: 300,
            },
            &mut surface,
            true,
        );
        assert_eq!(surface.size(), (400, 300));

        sim.tick(&mut surface, 1.0);
        assert_eq!(
            surface.commands[0],
            Command::FillRect {
                x: 0.0,
                y: 0.0,
                width: 400.0,
                height: 300.0,
                color: Color::BLACK.with_alpha(0.1),
            }
        );
    }

    #[test]
    fn hue_counts_ticks_without_wrapping() {
        let mut sim = simulation(Variant::Spectrum);
        let mut surface = Recorder::new(10, 10);

        for _ in 0..400 {
            sim.tick(&mut surface, 1.0);
        }
        assert_eq!(sim.hue, 400.0);
    }

    #[test]
    fn hue_keeps_advancing_when_large() {
        let mut sim = simulation(Variant::Constellation);
        let mut surface = Recorder::new(10, 10);
        sim.hue = 8_388_608.0;

        for _ in 0..10 {
            sim.tick(&mut surface, 0.5);
        }
        assert_eq!(sim.hue, 8_388_613.0);

        sim.handle_input(InputEvent::Press(Vec2::ZERO), &mut surface, true);
        let expected = Color::spectrum((8_388_613.0f64 % 360.0) as f32);
        assert!(sim.registry.particles().iter().all(|p| p.color == expected));
    }

    #[test]
    fn hue_is_captured_at_spawn() {
        let mut sim = simulation(Variant::Spectrum);
        let mut surface = Recorder::new(800, 600);

        sim.handle_input(InputEvent::Move(Vec2::new(1.0, 1.0)), &mut surface, true);
        for _ in 0..120 {
            sim.tick(&mut surface, 1.0);
        }
        sim.handle_input(InputEvent::Move(Vec2::new(1.0, 1.0)), &mut surface, true);

        let colors: Vec<_> = sim.registry.particles().iter().map(|p| p.color).collect();
        // The first burst may have decayed already
        assert_eq!(colors.last(), Some(&Color::spectrum(120.0)));
        if colors.len() == 4 {
            assert_eq!(colors[0], Color::spectrum(0.0));
        }
    }

    #[test]
    fn fixed_color_ignores_hue() {
        let mut sim = simulation(Variant::Emitter);
        let mut surface = Recorder::new(10, 10);

        for _ in 0..10 {
            sim.tick(&mut surface, 1.0);
        }
        assert_eq!(sim.hue, 0.0);

        sim.handle_input(InputEvent::Press(Vec2::ZERO), &mut surface, true);
        assert!(sim.registry.particles().iter().all(|p| p.color == Color::WHITE));
    }

    #[test]
    fn particles_decay_out_of_the_registry() {
        let mut sim = simulation(Variant::Constellation);
        let mut surface = Recorder::new(800, 600);
        sim.handle_input(InputEvent::Press(Vec2::new(400.0, 300.0)), &mut surface, true);

        let first = sim.tick(&mut surface, 1.0);
        assert_eq!(first.particles, 10);
        // Every pair starts within a few pixels of each other
        assert_eq!(first.links, 45);

        // Largest size is below 16, so 160 ticks of decay removes everything
        let evicted: usize = (0..160).map(|_| sim.tick(&mut surface, 1.0).evicted).sum();
        assert_eq!(evicted, 10);
        assert!(sim.registry.is_empty());
    }

    #[test]
    fn timestep_scales_motion_and_decay() {
        let mut sim = simulation(Variant::Emitter);
        let mut surface = Recorder::new(800, 600);
        sim.handle_input(InputEvent::Press(Vec2::ZERO), &mut surface, true);
        let before = sim.registry.particles()[0];

        sim.tick(&mut surface, 2.0);
        let after = sim.registry.particles()[0];

        assert_eq!(after.position, before.velocity * 2.0);
        assert!((before.size - after.size - 0.2).abs() < 1e-5);
    }
}

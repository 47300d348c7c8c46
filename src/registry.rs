use glam::Vec2;
use log::warn;
use rand::Rng;

use crate::{
    color::Color,
    effect::{Lifecycle, LinkStyle, SpawnRanges},
    particle::{self, Particle},
    surface::{Stroke, Surface},
};

/// Live particles in spawn order
#[derive(Default)]
pub struct ParticleRegistry {
    particles: Vec<Particle>,
}

impl ParticleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn spawn_burst(
        &mut self,
        rng: &mut impl Rng,
        origin: Vec2,
        count: usize,
        ranges: &SpawnRanges,
        color: Color,
    ) {
        self.particles
            .extend((0..count).map(|_| particle::spawn(rng, origin, ranges, color)));
    }

    pub fn update_all(&mut self, lifecycle: &Lifecycle, dt: f32) {
        for p in &mut self.particles {
            particle::update(p, lifecycle, dt);
        }
    }

    /// Draw every particle. Failed draws are logged and skipped, returns how
    /// many failed.
    pub fn draw_all(&self, surface: &mut impl Surface) -> usize {
        let mut failed = 0;
        for p in &self.particles {
            if let Err(err) = particle::draw(p, surface) {
                warn!("Skipped particle at {}: {err}", p.position);
                failed += 1;
            }
        }

        failed
    }

    /// Link every pair closer than `style.distance`, colored by the earlier
    /// particle. Returns the number of lines drawn.
    pub fn draw_links(&self, style: &LinkStyle, surface: &mut impl Surface) -> usize {
        let mut links = 0;
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                if a.position.distance(b.position) < style.distance {
                    surface.draw_line(a.position, b.position, Stroke::new(a.color, style.width));
                    links += 1;
                }
            }
        }

        links
    }

    /// Drop expired particles, returning how many were removed
    pub fn evict_expired(&mut self, lifecycle: &Lifecycle) -> usize {
        let before = self.particles.len();
        self.particles.retain(|p| !particle::is_expired(p, lifecycle));
        before - self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::surface::recording::Recorder;

    fn particle_at(x: f32, y: f32, size: f32, color: Color) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            size,
            color,
        }
    }

    const LINKS: LinkStyle = LinkStyle {
        distance: 100.0,
        width: 0.2,
    };

    #[test]
    fn burst_spawns_at_origin() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut registry = ParticleRegistry::new();

        registry.spawn_burst(
            &mut rng,
            Vec2::new(200.0, 150.0),
            10,
            &SpawnRanges::default(),
            Color::WHITE,
        );

        assert_eq!(registry.len(), 10);
        assert!(registry
            .particles()
            .iter()
            .all(|p| p.position == Vec2::new(200.0, 150.0)));
    }

    #[test]
    fn link_boundary_is_strict() {
        let mut registry = ParticleRegistry::new();
        registry.push(particle_at(0.0, 0.0, 2.0, Color::WHITE));
        registry.push(particle_at(99.9, 0.0, 2.0, Color::WHITE));

        let mut surface = Recorder::new(800, 600);
        assert_eq!(registry.draw_links(&LINKS, &mut surface), 1);

        let mut registry = ParticleRegistry::new();
        registry.push(particle_at(0.0, 0.0, 2.0, Color::WHITE));
        registry.push(particle_at(100.1, 0.0, 2.0, Color::WHITE));

        let mut surface = Recorder::new(800, 600);
        assert_eq!(registry.draw_links(&LINKS, &mut surface), 0);
        assert!(surface.lines().is_empty());
    }

    #[test]
    fn pair_is_linked_once_in_first_color() {
        let first = Color::spectrum(30.0);
        let mut registry = ParticleRegistry::new();
        registry.push(particle_at(0.0, 0.0, 2.0, first));
        registry.push(particle_at(50.0, 0.0, 2.0, Color::spectrum(200.0)));

        let mut surface = Recorder::new(800, 600);
        registry.draw_links(&LINKS, &mut surface);

        assert_eq!(
            surface.lines(),
            vec![(
                Vec2::new(0.0, 0.0),
                Vec2::new(50.0, 0.0),
                Stroke::new(first, 0.2)
            )]
        );
    }

    #[test]
    fn links_every_close_pair() {
        let mut registry = ParticleRegistry::new();
        registry.push(particle_at(0.0, 0.0, 2.0, Color::WHITE));
        registry.push(particle_at(10.0, 0.0, 2.0, Color::WHITE));
        registry.push(particle_at(20.0, 0.0, 2.0, Color::WHITE));
        registry.push(particle_at(500.0, 0.0, 2.0, Color::WHITE));

        let mut surface = Recorder::new(800, 600);
        assert_eq!(registry.draw_links(&LINKS, &mut surface), 3);
    }

    #[test]
    fn eviction_keeps_every_survivor() {
        let lifecycle = Lifecycle::default();
        let mut registry = ParticleRegistry::new();
        // Alternate expiring and surviving entries, including neighbours
        let sizes = [0.35, 5.0, 0.39, 0.25, 8.0, 0.3, 12.0];
        for (i, &size) in sizes.iter().enumerate() {
            registry.push(Particle {
                position: Vec2::new(i as f32, 0.0),
                velocity: Vec2::new(1.0, 0.0),
                size,
                color: Color::WHITE,
            });
        }

        registry.update_all(&lifecycle, 1.0);
        let evicted = registry.evict_expired(&lifecycle);

        assert_eq!(evicted, 4);
        assert_eq!(registry.len(), sizes.len() - 4);

        let survivors: Vec<_> = registry.particles().iter().map(|p| p.position.x).collect();
        // Each survivor moved exactly one step
        assert_eq!(survivors, vec![2.0, 5.0, 7.0]);
    }

    #[test]
    fn draws_every_particle() {
        let mut registry = ParticleRegistry::new();
        registry.push(particle_at(1.0, 1.0, 2.0, Color::WHITE));
        registry.push(particle_at(5.0, 5.0, 3.0, Color::WHITE));

        let mut surface = Recorder::new(800, 600);
        assert_eq!(registry.draw_all(&mut surface), 0);

        assert_eq!(
            surface.circles(),
            vec![(Vec2::new(1.0, 1.0), 2.0), (Vec2::new(5.0, 5.0), 3.0)]
        );
    }

    #[test]
    fn a_failed_draw_does_not_stop_the_rest() {
        let mut registry = ParticleRegistry::new();
        registry.push(particle_at(1.0, 1.0, 2.0, Color::WHITE));
        registry.push(particle_at(2.0, 2.0, 0.0, Color::WHITE));
        registry.push(particle_at(3.0, 3.0, 4.0, Color::WHITE));

        let mut surface = Recorder::new(800, 600);
        assert_eq!(registry.draw_all(&mut surface), 1);

        assert_eq!(
            surface.circles(),
            vec![(Vec2::new(1.0, 1.0), 2.0), (Vec2::new(3.0, 3.0), 4.0)]
        );
    }
}

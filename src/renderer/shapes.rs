//! Shape generation for 2D primitives
//!
//! Pure geometry in playfield coordinates, shared by the canvas backend.

use glam::Vec2;
use std::f32::consts::TAU;

use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH, SHIP_SIZE};
use crate::heading_vector;
use crate::sim::{Asteroid, Particle, Ship};

/// Number of background stars
pub const STAR_COUNT: usize = 100;
/// Particle life at which it is drawn fully opaque
const PARTICLE_FULL_ALPHA_LIFE: f32 = 20.0;

/// Nose, left wing, right wing
pub fn ship_triangle(ship: &Ship) -> [Vec2; 3] {
    let half = SHIP_SIZE * 0.5;
    let forward = heading_vector(ship.angle_deg);
    let side = Vec2::new(-forward.y, forward.x);

    let nose = ship.pos + forward * half;
    let tail = ship.pos - forward * (half * 0.6);
    [nose, tail - side * (half * 0.8), tail + side * (half * 0.8)]
}

/// Lumpy outline for an asteroid, stable per id
pub fn asteroid_outline(asteroid: &Asteroid, vertices: usize) -> Vec<Vec2> {
    let radius = asteroid.size * 0.5;
    let spin = asteroid.rotation_deg.to_radians();
    (0..vertices)
        .map(|i| {
            // Cheap deterministic hash so the shape does not flicker
            let h = (asteroid.id.wrapping_mul(2_654_435_761) ^ (i as u32).wrapping_mul(40_503))
                % 1000;
            let r = radius * (0.8 + 0.2 * h as f32 / 1000.0);
            let a = spin + TAU * i as f32 / vertices as f32;
            asteroid.pos + Vec2::new(a.cos(), a.sin()) * r
        })
        .collect()
}

/// Opacity for a particle, fading over its final ticks
pub fn particle_alpha(particle: &Particle) -> f32 {
    (particle.life as f32 / PARTICLE_FULL_ALPHA_LIFE).clamp(0.0, 1.0)
}

/// Fixed starfield scattered over the playfield
pub fn star_positions() -> impl Iterator<Item = Vec2> {
    (0..STAR_COUNT).map(|i| {
        Vec2::new(
            ((i * 37) % 100) as f32 / 100.0 * PLAYFIELD_WIDTH,
            ((i * 73) % 100) as f32 / 100.0 * PLAYFIELD_HEIGHT,
        )
    })
}

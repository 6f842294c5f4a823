//! Canvas 2D backend

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::shapes::{asteroid_outline, particle_alpha, ship_triangle, star_positions};
use crate::consts::{CRYSTAL_SIZE, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH, SHIP_SIZE};
use crate::sim::{Crystal, Mode, SimulationState};

const BACKGROUND: &str = "#05010f";
const STAR: &str = "#ffffff";
const SHIP: &str = "#e0e6ff";
const ASTEROID: &str = "#6b5a4e";
const CRYSTAL: &str = "#00ffff";
const SHIELD: &str = "rgba(0, 200, 255, 0.6)";
const EXHAUST: &str = "#ff9933";
const ASTEROID_VERTICES: usize = 10;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    /// Playfield to canvas pixels
    scale: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        let mut renderer = Self { ctx, scale: 1.0 };
        renderer.resize(canvas.width(), canvas.height());
        Some(renderer)
    }

    /// Fit the playfield into a canvas of the given pixel size
    pub fn resize(&mut self, width: u32, height: u32) {
        let sx = width as f64 / PLAYFIELD_WIDTH as f64;
        let sy = height as f64 / PLAYFIELD_HEIGHT as f64;
        self.scale = sx.min(sy);
    }

    pub fn render(&self, state: &SimulationState, time_ms: f64) {
        let ctx = &self.ctx;
        ctx.save();
        let _ = ctx.set_transform(self.scale, 0.0, 0.0, self.scale, 0.0, 0.0);

        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, PLAYFIELD_WIDTH as f64, PLAYFIELD_HEIGHT as f64);
        self.draw_stars(time_ms);

        for asteroid in &state.entities.asteroids {
            self.fill_polygon(&asteroid_outline(asteroid, ASTEROID_VERTICES), ASTEROID);
        }
        for crystal in &state.entities.crystals {
            self.draw_crystal(crystal);
        }
        for particle in &state.entities.particles {
            let color = particle.color.map(|c| c.css()).unwrap_or(EXHAUST);
            ctx.set_global_alpha(particle_alpha(particle) as f64);
            self.fill_circle(particle.pos, particle.size * 0.5, color);
        }
        ctx.set_global_alpha(1.0);

        // Ship is hidden on menus and after a crash
        if matches!(state.session.mode, Mode::Playing | Mode::Paused) {
            self.fill_polygon(&ship_triangle(&state.ship), SHIP);
            if state.session.shield_active {
                self.stroke_circle(state.ship.pos, SHIP_SIZE * 0.9, SHIELD, 3.0);
            }
        }

        ctx.restore();
    }

    fn draw_stars(&self, time_ms: f64) {
        for (i, star) in star_positions().enumerate() {
            let twinkle = 0.5 + 0.5 * ((time_ms / 800.0) + i as f64 * 0.1).sin();
            self.ctx.set_global_alpha(0.3 + 0.7 * twinkle);
            self.fill_circle(star, 1.0, STAR);
        }
        self.ctx.set_global_alpha(1.0);
    }

    fn draw_crystal(&self, crystal: &Crystal) {
        let ctx = &self.ctx;
        let half = (CRYSTAL_SIZE * 0.5 * crystal.pulse_scale()) as f64;
        ctx.save();
        let _ = ctx.translate(crystal.pos.x as f64, crystal.pos.y as f64);
        let _ = ctx.rotate(crystal.rotation_deg.to_radians() as f64);
        ctx.set_shadow_color(CRYSTAL);
        ctx.set_shadow_blur(12.0);
        ctx.set_fill_style_str(CRYSTAL);
        ctx.begin_path();
        ctx.move_to(0.0, -half);
        ctx.line_to(half, 0.0);
        ctx.line_to(0.0, half);
        ctx.line_to(-half, 0.0);
        ctx.close_path();
        ctx.fill();
        ctx.restore();
    }

    fn fill_polygon(&self, points: &[Vec2], color: &str) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let ctx = &self.ctx;
        ctx.set_fill_style_str(color);
        ctx.begin_path();
        ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            ctx.line_to(p.x as f64, p.y as f64);
        }
        ctx.close_path();
        ctx.fill();
    }

    fn fill_circle(&self, center: Vec2, radius: f32, color: &str) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(color);
        ctx.begin_path();
        let _ = ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        ctx.fill();
    }

    fn stroke_circle(&self, center: Vec2, radius: f32, color: &str, width: f64) {
        let ctx = &self.ctx;
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(width);
        ctx.begin_path();
        let _ = ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        ctx.stroke();
    }
}

use egui::{Color32, Pos2, Vec2};
use rand::Rng;

use crate::quiz::Verdict;

pub const SELECTION_BURST: usize = 5;
pub const FEEDBACK_BURST: usize = 20;

const GRAVITY: Vec2 = Vec2 { x: 0.0, y: 0.1 };
const START_LIFE: f32 = 255.0;
const FADE_PER_FRAME: f32 = 5.0;
const MIN_SPEED: f32 = 1.0;
const MAX_SPEED: f32 = 5.0;

pub const PARTICLE_RADIUS: f32 = 5.0;

pub const SELECTION_COLOR: Color32 = Color32::from_rgb(0, 150, 255);
pub const CORRECT_COLOR: Color32 = Color32::from_rgb(0, 200, 0);
pub const INCORRECT_COLOR: Color32 = Color32::from_rgb(200, 0, 0);

pub fn verdict_color(verdict: Verdict) -> Color32 {
    match verdict {
        Verdict::Correct => CORRECT_COLOR,
        Verdict::Incorrect => INCORRECT_COLOR,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Pos2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub life: f32,
    pub color: Color32,
}

impl Particle {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, pos: Pos2, color: Color32) -> Self {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let speed = rng.gen_range(MIN_SPEED..MAX_SPEED);
        Self {
            pos,
            vel: Vec2::angled(angle) * speed,
            acc: GRAVITY,
            life: START_LIFE,
            color,
        }
    }

    pub fn update(&mut self) {
        self.vel += self.acc;
        self.pos += self.vel;
        self.life -= FADE_PER_FRAME;
    }

    pub fn is_finished(&self) -> bool {
        self.life < 0.0
    }

    /// Base color faded by remaining life.
    pub fn display_color(&self) -> Color32 {
        let alpha = self.life.clamp(0.0, 255.0) as u8;
        Color32::from_rgba_unmultiplied(self.color.r(), self.color.g(), self.color.b(), alpha)
    }
}

/// Decorative particles. Fed by the quiz, never read back by it.
#[derive(Debug, Default)]
pub struct Effects {
    particles: Vec<Particle>,
}

impl Effects {
    pub fn burst<R: Rng + ?Sized>(&mut self, rng: &mut R, at: Pos2, count: usize, color: Color32) {
        self.particles
            .extend((0..count).map(|_| Particle::new(&mut *rng, at, color)));
    }

    /// Advances one frame and drops expired particles.
    pub fn update(&mut self) {
        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(|p| !p.is_finished());
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

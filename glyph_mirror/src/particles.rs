//! Glyph particle field.
//!
//! A regular grid of particles is pushed away from fingertips (and an open
//! mouth) and pulled back to where it started.  Forces are per-frame
//! displacements: they are added straight to the position with no velocity,
//! mass or damping, so a particle snaps back as soon as the hand leaves.

use landmark_feed::{Hand, Point};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::ascii::Mouth;

/// Glyphs a particle may be drawn with.
pub const PARTICLE_GLYPHS: [char; 10] = ['@', '#', '$', '%', '&', '*', '+', '.', '-', '='];

// ════════════════════════════════════════════════════════════════════════════
// Force law
// ════════════════════════════════════════════════════════════════════════════

/// Linear remap of `v` from `[in_lo, in_hi]` to `[out_lo, out_hi]`, not
/// clamped.
pub fn map_range(v: f32, in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32) -> f32 {
    out_lo + (v - in_lo) / (in_hi - in_lo) * (out_hi - out_lo)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceLaw {
    pub max_force:    f32,
    pub min_force:    f32,
    /// Fingertip repulsion radius.
    pub touch_radius: f32,
    /// Attraction reaches `max_force` at this distance from rest.
    pub rest_range:   f32,
}

impl Default for ForceLaw {
    fn default() -> Self {
        ForceLaw { max_force: 100.0, min_force: 0.0, touch_radius: 100.0, rest_range: 500.0 }
    }
}

impl ForceLaw {
    /// `max_force` at distance 0 falling to `min_force` at `radius`; nothing
    /// at or beyond `radius`.
    pub fn repulsion(&self, distance: f32, radius: f32) -> Option<f32> {
        (distance < radius)
            .then(|| map_range(distance, 0.0, radius, self.max_force, self.min_force))
    }

    /// `min_force` at rest rising to `max_force` at `rest_range`, and beyond.
    pub fn attraction(&self, distance: f32) -> f32 {
        map_range(distance, 0.0, self.rest_range, self.min_force, self.max_force)
    }
}

/// A point that pushes particles away within `radius`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Repulsor {
    pub center: Point,
    pub radius: f32,
}

/// Every fingertip of every hand, in canvas pixels.
pub fn fingertip_repulsors(hands: &[Hand], canvas: (f32, f32), radius: f32) -> Vec<Repulsor> {
    hands
        .iter()
        .flat_map(|h| h.fingertips())
        .map(|tip| Repulsor { center: tip.to_canvas(canvas.0, canvas.1), radius })
        .collect()
}

impl From<&Mouth> for Repulsor {
    fn from(m: &Mouth) -> Self {
        Repulsor { center: m.center, radius: m.radius() }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Particle
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos:   Point,
    /// Grid slot the particle is pulled back to.
    pub rest:  Point,
    pub glyph: char,
}

impl Particle {
    pub fn new(rest: Point, glyph: char) -> Self {
        Particle { pos: rest, rest, glyph }
    }

    /// This frame's displacement.
    ///
    /// A particle sitting exactly on a repulsor has no direction to be pushed
    /// in and gets no term from it.
    pub fn displacement(&self, repulsors: &[Repulsor], law: &ForceLaw) -> Point {
        let mut total = Point::ZERO;

        for r in repulsors {
            let away = self.pos - r.center;
            if let Some(mag) = law.repulsion(away.length(), r.radius) {
                total += away.with_length(mag);
            }
        }

        let to_rest = self.rest - self.pos;
        let d = to_rest.length();
        if d > 0.0 {
            total += to_rest.with_length(law.attraction(d));
        }
        total
    }

    pub fn step(&mut self, repulsors: &[Repulsor], law: &ForceLaw) {
        let d = self.displacement(repulsors, law);
        self.pos += d;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleField
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct ParticleField {
    particles:  Vec<Particle>,
    law:        ForceLaw,
    glyph_size: f32,
}

impl ParticleField {
    /// Lay particles out column by column every `resolution` pixels, offset
    /// by half a particle, each with a random glyph.
    pub fn new<R: Rng>(
        canvas:        (usize, usize),
        resolution:    usize,
        particle_size: f32,
        law:           ForceLaw,
        rng:           &mut R,
    ) -> Self {
        let step = resolution.max(1);
        let half = particle_size / 2.0;
        let mut particles = Vec::new();
        for i in (0..canvas.0).step_by(step) {
            for j in (0..canvas.1).step_by(step) {
                let rest = Point::new(i as f32 + half, j as f32 + half);
                let glyph = *PARTICLE_GLYPHS.choose(rng).unwrap_or(&'*');
                particles.push(Particle::new(rest, glyph));
            }
        }
        log::debug!("particle field: {} particles", particles.len());
        ParticleField { particles, law, glyph_size: particle_size / 1.5 }
    }

    /// Advance every particle one frame.
    pub fn step(&mut self, repulsors: &[Repulsor]) {
        let law = self.law;
        for p in &mut self.particles {
            p.step(repulsors, &law);
        }
    }

    pub fn particles(&self) -> &[Particle] { &self.particles }
    pub fn len(&self)       -> usize      { self.particles.len() }
    pub fn is_empty(&self)  -> bool       { self.particles.is_empty() }
    pub fn glyph_size(&self) -> f32       { self.glyph_size }
    pub fn law(&self)        -> &ForceLaw { &self.law }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use landmark_feed::sim::{synth_hand, SimPose};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn law() -> ForceLaw { ForceLaw::default() }

    fn close(a: f32, b: f32) -> bool { (a - b).abs() < 1e-3 }

    // ── force law ────────────────────────────────────────────────────────
    #[test]
    fn repulsion_endpoints() {
        let l = law();
        assert_eq!(l.repulsion(0.0, 100.0), Some(100.0));
        assert_eq!(l.repulsion(50.0, 100.0), Some(50.0));
        assert!(close(l.repulsion(99.9, 100.0).unwrap(), 0.1));
        assert_eq!(l.repulsion(100.0, 100.0), None);
        assert_eq!(l.repulsion(150.0, 100.0), None);
    }

    #[test]
    fn attraction_is_linear_and_unclamped() {
        let l = law();
        assert_eq!(l.attraction(0.0), 0.0);
        assert_eq!(l.attraction(250.0), 50.0);
        assert_eq!(l.attraction(500.0), 100.0);
        assert_eq!(l.attraction(1000.0), 200.0);
    }

    // ── particle ─────────────────────────────────────────────────────────
    #[test]
    fn resting_particle_without_hands_stays_put() {
        let p = Particle::new(Point::new(10.0, 10.0), '@');
        assert_eq!(p.displacement(&[], &law()), Point::ZERO);
    }

    #[test]
    fn pushed_directly_away_from_fingertip() {
        let p = Particle::new(Point::new(100.0, 100.0), '@');
        let tip = Repulsor { center: Point::new(100.0, 140.0), radius: 100.0 };
        let d = p.displacement(&[tip], &law());
        // distance 40 → magnitude 60, straight up
        assert!(close(d.x, 0.0));
        assert!(close(d.y, -60.0));
    }

    #[test]
    fn distant_fingertip_has_no_effect() {
        let p = Particle::new(Point::new(0.0, 0.0), '@');
        let tip = Repulsor { center: Point::new(100.0, 0.0), radius: 100.0 };
        assert_eq!(p.displacement(&[tip], &law()), Point::ZERO);
    }

    #[test]
    fn repulsions_sum() {
        let p = Particle::new(Point::new(0.0, 0.0), '@');
        let left  = Repulsor { center: Point::new(-50.0, 0.0), radius: 100.0 };
        let right = Repulsor { center: Point::new(50.0, 0.0), radius: 100.0 };
        let d = p.displacement(&[left, right], &law());
        assert!(close(d.length(), 0.0));
    }

    #[test]
    fn particle_on_fingertip_gets_no_push() {
        let p = Particle::new(Point::new(5.0, 5.0), '@');
        let tip = Repulsor { center: Point::new(5.0, 5.0), radius: 100.0 };
        assert_eq!(p.displacement(&[tip], &law()), Point::ZERO);
    }

    #[test]
    fn displaced_particle_is_pulled_home() {
        let mut p = Particle::new(Point::new(0.0, 0.0), '@');
        p.pos = Point::new(250.0, 0.0);
        p.step(&[], &law());
        // distance 250 → pull 50
        assert!(close(p.pos.x, 200.0));
        for _ in 0..200 { p.step(&[], &law()); }
        assert!(p.pos.distance(p.rest) < 1.0);
    }

    #[test]
    fn mouth_repulsor_uses_three_gaps() {
        let m = Mouth { center: Point::new(10.0, 20.0), gap: 40.0 };
        let r = Repulsor::from(&m);
        assert_eq!(r.center, m.center);
        assert_eq!(r.radius, 120.0);
    }

    // ── field ────────────────────────────────────────────────────────────
    #[test]
    fn grid_layout() {
        let mut rng = StdRng::seed_from_u64(1);
        let field = ParticleField::new((100, 50), 10, 10.0, law(), &mut rng);
        assert_eq!(field.len(), 10 * 5);
        assert_eq!(field.particles()[0].rest, Point::new(5.0, 5.0));
        assert_eq!(field.particles()[1].rest, Point::new(5.0, 15.0));
        assert!(field.particles().iter().all(|p| PARTICLE_GLYPHS.contains(&p.glyph)));
        assert!(field.particles().iter().all(|p| p.pos == p.rest));
    }

    #[test]
    fn fingertips_scatter_nearby_particles_only() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = ParticleField::new((640, 480), 10, 10.0, law(), &mut rng);
        let hands = [synth_hand(0.5, 0.5, SimPose::OpenPalm)];
        let tips = fingertip_repulsors(&hands, (640.0, 480.0), 100.0);
        assert_eq!(tips.len(), 5);

        field.step(&tips);
        let moved = field.particles().iter().filter(|p| p.pos != p.rest).count();
        assert!(moved > 0);
        let corner = &field.particles()[0];
        assert_eq!(corner.pos, corner.rest);
    }
}

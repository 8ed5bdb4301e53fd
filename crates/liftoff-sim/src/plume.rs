//! Exhaust plume particle engine
//!
//! A fixed-capacity pool with slot reuse: a particle is dead exactly when its
//! lifetime is <= 0, and allocation is a linear scan for the first dead slot.
//! Emission accumulates `rate * dt` into a fractional counter so the long-run
//! spawn rate matches the configured rate regardless of frame-time jitter,
//! and spreads spawn points along the nozzle's swept path between frames.
//! Only the compacted alive subset ever leaves this module.

use crate::rand::PlumeRng;
use liftoff_core::Vec3;

/// Pool size. Emission beyond this silently drops particles.
pub const PLUME_CAPACITY: usize = 70_000;

/// Default emission rate in particles per second
pub const DEFAULT_EMISSION_RATE: f32 = 9_000.0;

/// Spawn distance behind the nozzle anchor along -forward
const NOZZLE_OFFSET: f32 = 0.9;

/// Radius of the uniform spawn disk in the right/up plane
const DISK_RADIUS: f32 = 0.45;

/// Random offset along the plume axis at spawn
const AXIAL_JITTER: f32 = 0.25;

/// Base exhaust speed along -forward
const BASE_SPEED: f32 = 22.0;

/// Independent per-axis velocity jitter
const VELOCITY_JITTER: f32 = 3.5;

const LIFETIME_MIN: f32 = 0.6;
const LIFETIME_MAX: f32 = 1.6;

/// Particles dipping below this height die on the spot
const GROUND_Y: f32 = 0.02;

/// One pool slot. Dead when `lifetime <= 0`.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub lifetime: f32,
}

impl Particle {
    const DEAD: Self = Self {
        position: Vec3::ZERO,
        velocity: Vec3::ZERO,
        lifetime: 0.0,
    };

    pub fn is_alive(&self) -> bool {
        self.lifetime > 0.0
    }
}

pub struct ExhaustPlume {
    particles: Box<[Particle]>,
    emission_rate: f32,
    /// Fractional spawn budget carried across frames
    accumulator: f32,
    /// Alive positions gathered by the last `compact` call
    gathered: Vec<Vec3>,
    rng: PlumeRng,
}

impl ExhaustPlume {
    pub fn new(emission_rate: f32) -> Self {
        Self::with_seed(emission_rate, 0x9e3779b9)
    }

    pub fn with_seed(emission_rate: f32, seed: u32) -> Self {
        Self {
            particles: vec![Particle::DEAD; PLUME_CAPACITY].into_boxed_slice(),
            emission_rate,
            accumulator: 0.0,
            gathered: Vec::new(),
            rng: PlumeRng::new(seed),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Positions of every alive particle as of the last `compact`
    pub fn gathered(&self) -> &[Vec3] {
        &self.gathered
    }

    pub fn alive_count(&self) -> usize {
        self.gathered.len()
    }

    /// First dead slot, scanning from the start of the pool
    pub fn allocate(&mut self) -> Option<usize> {
        self.allocate_from(0)
    }

    /// First dead slot at or after `start`. Spawn batches resume the scan
    /// where the previous allocation left off instead of rescanning.
    fn allocate_from(&self, start: usize) -> Option<usize> {
        self.particles[start..]
            .iter()
            .position(|p| !p.is_alive())
            .map(|offset| start + offset)
    }

    /// Spawn this frame's batch of particles along the nozzle's swept path
    /// from `prev_anchor` to `curr_anchor`. `forward`/`right`/`up` is the
    /// vehicle's orthonormal frame; exhaust streams along -forward.
    pub fn emit(
        &mut self,
        dt: f32,
        prev_anchor: Vec3,
        curr_anchor: Vec3,
        forward: Vec3,
        right: Vec3,
        up: Vec3,
    ) {
        self.accumulator += self.emission_rate * dt;
        let spawn_count = self.accumulator as u32;
        self.accumulator -= spawn_count as f32;

        let mut cursor = 0;
        for _ in 0..spawn_count {
            let Some(slot) = self.allocate_from(cursor) else {
                // Pool saturated; drop the rest of the batch
                break;
            };
            cursor = slot + 1;

            // Emission point sweeps with the moving nozzle between frames
            let sweep = self.rng.next_f32();
            let anchor = prev_anchor.lerp(curr_anchor, sweep);

            let (dx, dy) = self.rng.in_unit_disk();
            let axial = self.rng.range(-AXIAL_JITTER, AXIAL_JITTER);
            let position = anchor - forward * NOZZLE_OFFSET
                + right * (dx * DISK_RADIUS)
                + up * (dy * DISK_RADIUS)
                + forward * axial;

            let velocity = -forward * BASE_SPEED
                + Vec3::new(
                    self.rng.range(-VELOCITY_JITTER, VELOCITY_JITTER),
                    self.rng.range(-VELOCITY_JITTER, VELOCITY_JITTER),
                    self.rng.range(-VELOCITY_JITTER, VELOCITY_JITTER),
                );

            // Backdate by a random fraction of the frame, as if the particle
            // spawned at some instant within it rather than at the boundary
            let age = self.rng.next_f32();

            self.particles[slot] = Particle {
                position: position - velocity * (age * dt),
                velocity,
                lifetime: self.rng.range(LIFETIME_MIN, LIFETIME_MAX),
            };
        }
    }

    /// Age and advect every alive particle; kill on ground contact
    pub fn integrate(&mut self, dt: f32) {
        for p in self.particles.iter_mut() {
            if !p.is_alive() {
                continue;
            }

            p.lifetime -= dt;
            if !p.is_alive() {
                continue;
            }

            p.position += p.velocity * dt;
            if p.position.y < GROUND_Y {
                p.lifetime = 0.0;
            }
        }
    }

    /// Gather alive positions into the contiguous upload buffer
    pub fn compact(&mut self) {
        self.gathered.clear();
        self.gathered.extend(
            self.particles
                .iter()
                .filter(|p| p.is_alive())
                .map(|p| p.position),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> (Vec3, Vec3, Vec3) {
        (Vec3::UP, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0))
    }

    fn emit_once(plume: &mut ExhaustPlume, dt: f32) {
        let (forward, right, up) = frame();
        let anchor = Vec3::new(0.0, 60.0, 0.0);
        plume.emit(dt, anchor, anchor, forward, right, up);
    }

    #[test]
    fn rate_1000_dt_001_spawns_exactly_ten() {
        let mut plume = ExhaustPlume::new(1000.0);
        emit_once(&mut plume, 0.01);
        plume.compact();
        assert_eq!(plume.alive_count(), 10);
    }

    #[test]
    fn fractional_accumulator_carries_without_drift() {
        let rate = 100.0;
        let dt = 0.003;
        let frames = 100;

        let mut plume = ExhaustPlume::new(rate);
        let mut total = 0usize;
        for _ in 0..frames {
            let before = plume.particles.iter().filter(|p| p.is_alive()).count();
            emit_once(&mut plume, dt);
            let after = plume.particles.iter().filter(|p| p.is_alive()).count();
            total += after - before;
        }

        let expected = (rate * dt * frames as f32).floor() as isize;
        assert!((total as isize - expected).abs() <= 1);
    }

    #[test]
    fn lifetime_decreases_by_exactly_dt() {
        let mut plume = ExhaustPlume::new(10.0);
        emit_once(&mut plume, 0.1);
        let before = plume.particles[0].lifetime;
        assert!(before > 0.0);

        plume.integrate(0.05);
        assert!((plume.particles[0].lifetime - (before - 0.05)).abs() < 1e-6);
    }

    #[test]
    fn dead_particles_stop_moving() {
        let mut plume = ExhaustPlume::new(10.0);
        emit_once(&mut plume, 0.1);

        // Exhaust the whole lifetime budget
        plume.integrate(LIFETIME_MAX + 1.0);
        let resting = plume.particles[0].position;
        assert!(!plume.particles[0].is_alive());

        plume.integrate(0.1);
        assert_eq!(plume.particles[0].position, resting);
    }

    #[test]
    fn ground_contact_kills_early() {
        let (forward, right, up) = frame();
        let mut plume = ExhaustPlume::new(10.0);
        // Nozzle just above the ground, exhaust streaming straight down
        let anchor = Vec3::new(0.0, 1.5, 0.0);
        plume.emit(0.1, anchor, anchor, forward, right, up);

        // Well under LIFETIME_MIN, but far enough to reach the ground
        for _ in 0..6 {
            plume.integrate(0.05);
        }
        plume.compact();
        assert_eq!(plume.alive_count(), 0);
        for p in plume.particles().iter().take(1) {
            assert!(p.lifetime <= 0.0);
        }
    }

    #[test]
    fn compact_gathers_only_alive_positions() {
        let mut plume = ExhaustPlume::new(500.0);
        emit_once(&mut plume, 0.02);
        plume.integrate(0.01);
        plume.compact();

        let alive = plume.particles.iter().filter(|p| p.is_alive()).count();
        assert_eq!(plume.alive_count(), alive);
        assert!(plume.alive_count() <= PLUME_CAPACITY);
        assert!(plume.alive_count() > 0);
    }

    #[test]
    fn net_change_matches_spawns_minus_kills() {
        let mut plume = ExhaustPlume::new(2000.0);
        emit_once(&mut plume, 0.01);
        plume.compact();
        let start = plume.alive_count();

        let spawned_before = start;
        emit_once(&mut plume, 0.01);
        let after_emit = plume.particles.iter().filter(|p| p.is_alive()).count();
        let spawned = after_emit - spawned_before;

        plume.integrate(LIFETIME_MIN / 2.0);
        let after_integrate = plume.particles.iter().filter(|p| p.is_alive()).count();
        let killed = after_emit - after_integrate;

        plume.compact();
        assert_eq!(
            plume.alive_count() as isize,
            start as isize + spawned as isize - killed as isize
        );
    }

    #[test]
    fn allocate_reuses_freed_slots() {
        let mut plume = ExhaustPlume::new(10.0);
        emit_once(&mut plume, 0.1);
        assert!(plume.particles[0].is_alive());

        plume.particles[0].lifetime = 0.0;
        assert_eq!(plume.allocate(), Some(0));
    }

    #[test]
    fn spawn_positions_sit_behind_the_nozzle() {
        let (forward, right, up) = frame();
        // Tiny dt keeps the backdated sub-step negligible
        let dt = 0.001;
        let mut plume = ExhaustPlume::new(10_000.0);
        let anchor = Vec3::new(0.0, 60.0, 0.0);
        plume.emit(dt, anchor, anchor, forward, right, up);
        plume.compact();

        assert_eq!(plume.alive_count(), 10);
        for p in plume.gathered() {
            // Below the nozzle (forward is up), inside the spawn disk
            assert!(p.y < anchor.y - NOZZLE_OFFSET + AXIAL_JITTER + 0.05);
            let radial = (p.x * p.x + p.z * p.z).sqrt();
            assert!(radial <= DISK_RADIUS + (BASE_SPEED + VELOCITY_JITTER) * dt);
        }
    }
}

//! Lightweight xorshift32 PRNG — no external crate needed

pub struct PlumeRng {
    state: u32,
}

impl PlumeRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() as f32) / (u32::MAX as f32)
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform-area sample in the unit disk: radius sqrt(u1), angle 2*pi*u2
    pub fn in_unit_disk(&mut self) -> (f32, f32) {
        let r = self.next_f32().sqrt();
        let theta = self.next_f32() * std::f32::consts::TAU;
        (r * theta.cos(), r * theta.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds() {
        let mut rng = PlumeRng::new(42);
        for _ in 0..1000 {
            let v = rng.range(0.0, 10.0);
            assert!(v >= 0.0 && v < 10.0);
        }
    }

    #[test]
    fn disk_samples_stay_inside() {
        let mut rng = PlumeRng::new(123);
        for _ in 0..1000 {
            let (x, y) = rng.in_unit_disk();
            assert!(x * x + y * y <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn zero_seed_is_remapped() {
        let mut rng = PlumeRng::new(0);
        // xorshift with state 0 would be stuck at 0 forever
        assert!(rng.next_u32() != 0);
    }
}

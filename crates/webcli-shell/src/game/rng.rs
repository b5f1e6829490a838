//! Randomness source for the game.

/// Uniform random source. Only `next_u32` is required.
pub trait Rng {
    fn next_u32(&mut self) -> u32;

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32() >> 8) / f64::from(1u32 << 24)
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform integer in `0..n`.
    fn below(&mut self, n: u32) -> u32 {
        (self.next_f64() * f64::from(n)) as u32
    }
}

/// 64-bit linear congruential generator.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seeded from the wall clock.
    pub fn from_time() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;
        Self::new(seed)
    }
}

impl Rng for Lcg {
    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        (self.state >> 33) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Lcg::new(42);
        let mut b = Lcg::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn floats_in_unit_interval() {
        let mut r = Lcg::new(7);
        for _ in 0..1000 {
            let x = r.next_f64();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn below_stays_in_range() {
        let mut r = Lcg::new(99);
        for _ in 0..1000 {
            assert!(r.below(5) < 5);
        }
    }

    struct Max;
    impl Rng for Max {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }
    }

    #[test]
    fn extremes() {
        assert!(!Max.chance(0.99));
        assert_eq!(Max.below(4), 3);
    }
}

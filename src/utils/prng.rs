/// Xorshift64* generator. Deterministic for a given seed, so the zobrist
/// keys are identical across runs and platforms.
#[derive(Copy, Clone, Debug, Default)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub fn init(seed: u64) -> Self {
        debug_assert!(seed != 0, "xorshift state must be non-zero");
        Self { state: seed }
    }

    pub fn rand(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545F4914F6CDD1D)
    }

    pub fn singular_bit(&mut self) -> u64 {
        1u64 << (self.rand() % 64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_bit_gets_chosen() {
        let mut seeder = Prng::init(0x9E3779B97F4A7C15);
        let mut counts = [0u32; 64];
        for _ in 0..100 {
            let mut prng = Prng::init(seeder.rand());
            for _ in 0..1000 {
                counts[prng.singular_bit().trailing_zeros() as usize] += 1;
            }
        }

        let (min, max) = (
            *counts.iter().min().unwrap(),
            *counts.iter().max().unwrap(),
        );
        assert!(min > 0, "some bit was never chosen (min {min}, max {max})");
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = Prng::init(0xDEADBEEF);
        let mut b = Prng::init(0xDEADBEEF);
        for _ in 0..32 {
            assert_eq!(a.rand(), b.rand());
        }
    }
}

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

use crate::engine::RandomSource;

/// Детерминированный RNG для списков карт, паролей комнат и реплея.
///
/// ChaCha12 с фиксированным алгоритмом: одинаковый seed даёт одинаковую
/// перестановку на любой платформе (native и wasm32).
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    inner: ChaCha12Rng,
}

impl DeterministicRng {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            inner: ChaCha12Rng::from_seed(seed),
        }
    }
}

impl RandomSource for DeterministicRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}

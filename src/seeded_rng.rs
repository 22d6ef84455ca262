//! Sources of randomness for the blocks of cohort columns.
//!
//! A cohort is generated as a sequence of column blocks (demographics,
//! labs, and so on). Each block asks a [`BlockSampler`] for the sampler it
//! should draw from. Two sources are provided:
//!
//! * [`NumpyStream`] hands every block the same Mersenne Twister stream, so
//!   draws happen in the exact order NumPy's `RandomState` would make them.
//! * [`SeededBlocks`] gives each block its own ChaCha8 generator derived
//!   from the global seed and the block id. Adding, removing or reordering
//!   blocks then leaves the data in the other blocks unchanged.
//!

use crate::error::{GenerateError, Result};
use crate::mt19937::Mt19937;
use crate::sampler::Sampler;
use blake2::{Blake2b512, Digest};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_core::RngCore;

/// Hands out the sampler a named block of columns should draw from
pub trait BlockSampler {
    type Rng: RngCore;

    fn block(&mut self, block_id: &str) -> &mut Sampler<Self::Rng>;
}

/// Make a random number generator from a global seed
/// and a string id.
///
/// The global seed is a single piece of information intended
/// to control all randomness in the program. In order to be able
/// to create multiple random number generators for different
/// blocks of columns, a unique string id is passed to make the
/// resulting random number generator different from the others.
///
/// The id is concatenated with the global seed and the result is
/// hashed. The first 32 bytes of the hash seed the generator.
pub fn make_rng(global_seed: u64, id: &str) -> ChaCha8Rng {
    let message = format!("{id}{global_seed}");
    let mut hasher = Blake2b512::new();
    hasher.update(message);
    let digest = hasher.finalize();
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&digest[0..32]);
    ChaCha8Rng::from_seed(seed)
}

/// One Mersenne Twister stream shared by every block
pub struct NumpyStream {
    sampler: Sampler<Mt19937>,
}

impl NumpyStream {
    /// The Mersenne Twister takes a 32-bit seed; anything larger is
    /// rejected rather than silently truncated.
    pub fn new(seed: u64) -> Result<Self> {
        let seed = u32::try_from(seed).map_err(|_| {
            GenerateError::invalid("mt19937", format!("seed {seed} does not fit in 32 bits"))
        })?;
        Ok(Self {
            sampler: Sampler::new(Mt19937::new(seed)),
        })
    }
}

impl BlockSampler for NumpyStream {
    type Rng = Mt19937;

    fn block(&mut self, _block_id: &str) -> &mut Sampler<Mt19937> {
        &mut self.sampler
    }
}

/// A fresh ChaCha8 generator per block id
pub struct SeededBlocks {
    global_seed: u64,
    sampler: Sampler<ChaCha8Rng>,
}

impl SeededBlocks {
    pub fn new(global_seed: u64) -> Self {
        Self {
            global_seed,
            sampler: Sampler::new(make_rng(global_seed, "")),
        }
    }
}

impl BlockSampler for SeededBlocks {
    type Rng = ChaCha8Rng;

    fn block(&mut self, block_id: &str) -> &mut Sampler<ChaCha8Rng> {
        self.sampler = Sampler::new(make_rng(self.global_seed, block_id));
        &mut self.sampler
    }
}

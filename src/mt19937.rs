//! 32-bit Mersenne Twister (MT19937)
//!
//! This is the bit source behind NumPy's legacy `RandomState`. Seeding
//! uses the `init_genrand` recurrence, which is what `np.random.seed(n)`
//! does for an integer seed, so the word stream matches NumPy exactly.
//!

use rand_core::{impls, Error, RngCore};

const STATE_LEN: usize = 624;
const SHIFT: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

#[derive(Clone, Debug)]
pub struct Mt19937 {
    key: [u32; STATE_LEN],
    pos: usize,
}

impl Mt19937 {
    /// Initialise the state from a 32-bit seed
    pub fn new(seed: u32) -> Self {
        let mut key = [0u32; STATE_LEN];
        key[0] = seed;
        for n in 1..STATE_LEN {
            let prev = key[n - 1];
            key[n] = 1_812_433_253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(n as u32);
        }
        // Forces a full regeneration on the first draw
        Self {
            key,
            pos: STATE_LEN,
        }
    }

    fn regenerate(&mut self) {
        for n in 0..STATE_LEN {
            let y = (self.key[n] & UPPER_MASK) | (self.key[(n + 1) % STATE_LEN] & LOWER_MASK);
            let mut next = self.key[(n + SHIFT) % STATE_LEN] ^ (y >> 1);
            if y & 1 == 1 {
                next ^= MATRIX_A;
            }
            self.key[n] = next;
        }
        self.pos = 0;
    }
}

impl RngCore for Mt19937 {
    fn next_u32(&mut self) -> u32 {
        if self.pos >= STATE_LEN {
            self.regenerate();
        }
        let mut y = self.key[self.pos];
        self.pos += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^ (y >> 18)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

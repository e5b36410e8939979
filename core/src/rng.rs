//! Park-Miller Linear Congruential Generator (MINSTD)
//!
//! Maze generation draws every random decision through [`MazeRng`], so a
//! seeded [`SimpleLCG`] reproduces the same maze for the same seed and
//! tests can substitute a scripted source.
//!
//! Constants:
//! - Multiplier (a): 48271
//! - Modulus (m): 2^31 - 1 = 2147483647
//!
//! Reference: https://en.wikipedia.org/wiki/Lehmer_random_number_generator

const A: u64 = 48271;
const M: u64 = 2147483647; // 2^31 - 1

/// Source of random decisions for the maze generator.
pub trait MazeRng {
    /// Random integer in range [a, b] (inclusive).
    fn randint(&mut self, a: usize, b: usize) -> usize;

    /// Random index in range [0, len).
    fn choice_index(&mut self, len: usize) -> usize;

    /// Fisher-Yates shuffle driven by [`MazeRng::choice_index`].
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.choice_index(i + 1);
            items.swap(i, j);
        }
    }
}

/// Park-Miller Linear Congruential Generator
///
/// Same seed always produces the same sequence.
#[derive(Debug, Clone)]
pub struct SimpleLCG {
    state: u32,
}

impl SimpleLCG {
    /// Create a new LCG with the given seed
    ///
    /// If seed is 0, it's replaced with 1 to avoid degenerate sequence
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn advance(&mut self) {
        // u64 avoids overflow during multiplication
        self.state = ((self.state as u64 * A) % M) as u32;
    }
}

impl MazeRng for SimpleLCG {
    /// Uses pure integer arithmetic: `a + (state * (b - a + 1)) / M`
    fn randint(&mut self, a: usize, b: usize) -> usize {
        debug_assert!(a <= b, "randint called with empty range");
        self.advance();

        let range = (b - a + 1) as u64;
        let scaled = (self.state as u64 * range) / M;
        a + scaled as usize
    }

    fn choice_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "choice_index called with empty range");
        self.advance();

        let scaled = (self.state as u64 * len as u64) / M;
        scaled as usize
    }
}

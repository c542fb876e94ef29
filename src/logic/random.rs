//! Reproducible random sequences for the player-load generator.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

const LCG_MULTIPLIER: u64 = 9301;
const LCG_INCREMENT: u64 = 49297;
const LCG_MODULUS: u64 = 233280;

/// Source of uniform values in [0, 1).
pub trait UnitSource {
    fn next_unit(&mut self) -> f64;
}

/// Linear congruential sequence: `seed = (seed * 9301 + 49297) mod 233280`, emits `seed / 233280`.
///
/// Reproduces the value sequence of earlier versions of the app bit for bit. Schedules built
/// from it can still differ: matchup dedup and the match target are computed differently now.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LcgSequence {
    seed: u64,
}

impl LcgSequence {
    pub fn new(seed: u64) -> Self {
        // Reducing first leaves every emitted value unchanged and keeps the multiply in range.
        Self {
            seed: seed % LCG_MODULUS,
        }
    }

    /// Seed derived from the inputs: `players * 1000 + matches_per_player`.
    pub fn for_load(player_count: usize, matches_per_player: u32) -> Self {
        Self::new(player_count as u64 * 1000 + u64::from(matches_per_player))
    }
}

impl UnitSource for LcgSequence {
    fn next_unit(&mut self) -> f64 {
        self.seed = (self.seed * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.seed as f64 / LCG_MODULUS as f64
    }
}

impl UnitSource for ChaCha8Rng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Where the player-load generator takes its randomness from. Both options are reproducible.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum SeedSource {
    /// LCG seeded from roster size and load (the app's historical behaviour).
    #[default]
    Roster,
    /// ChaCha8 seeded with an explicit value.
    Fixed(u64),
}

impl SeedSource {
    pub fn sequence(self, player_count: usize, matches_per_player: u32) -> Box<dyn UnitSource> {
        match self {
            SeedSource::Roster => Box::new(LcgSequence::for_load(player_count, matches_per_player)),
            SeedSource::Fixed(seed) => Box::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

/// Fisher-Yates shuffle into a new vector: for i from last down to 1, swap i with
/// `floor(next * (i + 1))`.
pub fn shuffle<T: Clone>(items: &[T], source: &mut dyn UnitSource) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = (source.next_unit() * (i + 1) as f64).floor() as usize;
        shuffled.swap(i, j.min(i));
    }
    shuffled
}

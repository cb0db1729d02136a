//! Injectable randomness seams.
//!
//! The engine never draws randomness on its own. A [`Shuffler`] permutes a
//! card sequence in place and a [`Randomizer`] picks a bounded index (dealer
//! selection). Tests inject identity or scripted functions to make every
//! transition replayable.

use std::sync::{Arc, Mutex};

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::card::Card;

/// Permutes a card sequence in place.
pub type Shuffler = Arc<dyn Fn(&mut [Card]) + Send + Sync>;

/// Picks an index in `0..bound`.
pub type Randomizer = Arc<dyn Fn(usize) -> usize + Send + Sync>;

/// Seeded Fisher-Yates shuffler backed by [`StdRng`].
pub fn standard_shuffler(seed: u64) -> Shuffler {
    let rng = Mutex::new(StdRng::seed_from_u64(seed));
    Arc::new(move |cards| {
        let mut rng = rng.lock().expect("shuffler rng lock");
        cards.shuffle(&mut *rng);
    })
}

/// Seeded uniform index picker backed by [`StdRng`].
pub fn standard_randomizer(seed: u64) -> Randomizer {
    let rng = Mutex::new(StdRng::seed_from_u64(seed));
    Arc::new(move |bound| {
        if bound == 0 {
            return 0;
        }
        let mut rng = rng.lock().expect("randomizer rng lock");
        rng.gen_range(0..bound)
    })
}

/// Shuffler that leaves the sequence untouched. Useful in tests.
pub fn identity_shuffler() -> Shuffler {
    Arc::new(|_| {})
}

/// Randomizer that always picks the same index (clamped to the bound).
pub fn constant_randomizer(index: usize) -> Randomizer {
    Arc::new(move |bound| if bound == 0 { 0 } else { index.min(bound - 1) })
}

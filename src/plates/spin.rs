use rand::{seq::SliceRandom, Rng};

use super::repo_types::Plate;

/// Pick one candidate uniformly at random; `None` when there are none.
pub fn pick<R: Rng + ?Sized>(candidates: Vec<Plate>, rng: &mut R) -> Option<Plate> {
    candidates.choose(rng).cloned()
}

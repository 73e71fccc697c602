//! Random move selection for the computer opponent.

use super::{Board, Position};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

/// Source of uniformly distributed indices.
pub trait RandomSource: Send {
    /// Returns an index in `0..upper`. `upper` is never zero.
    fn pick_index(&mut self, upper: usize) -> usize;
}

/// ChaCha8-backed random source. Same seed, same sequence.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    inner: ChaCha8Rng,
    seed: Option<u64>,
}

impl SeededRandom {
    /// Creates a deterministic source from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Creates a source seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
            seed: None,
        }
    }

    /// The seed used, if this source is deterministic.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn pick_index(&mut self, upper: usize) -> usize {
        self.inner.gen_range(0..upper)
    }
}

/// Picks uniformly among the empty squares of `board`.
///
/// Returns `None` on a full board.
#[instrument(skip_all)]
pub fn choose_empty(board: &Board, rng: &mut dyn RandomSource) -> Option<Position> {
    let empty = Position::valid_moves(board);
    if empty.is_empty() {
        return None;
    }
    let choice = empty[rng.pick_index(empty.len())];
    debug!(candidates = empty.len(), position = %choice, "Computer picked a square");
    Some(choice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Mark, Square};

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        let xs: Vec<_> = (0..16).map(|_| a.pick_index(9)).collect();
        let ys: Vec<_> = (0..16).map(|_| b.pick_index(9)).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|&i| i < 9));
    }

    #[test]
    fn test_full_board_yields_none() {
        let board = Board::from_squares([Square::Occupied(Mark::X); 9]);
        assert_eq!(choose_empty(&board, &mut SeededRandom::new(1)), None);
    }

    #[test]
    fn test_only_empty_squares_chosen() {
        let mut board = Board::new();
        for pos in Position::ALL.into_iter().take(7) {
            board.set(pos, Square::Occupied(Mark::O));
        }
        let mut rng = SeededRandom::new(7);
        for _ in 0..32 {
            let pos = choose_empty(&board, &mut rng).expect("two squares free");
            assert!(matches!(pos, Position::BottomCenter | Position::BottomRight));
        }
    }

    #[test]
    fn test_every_empty_square_reachable() {
        let board = Board::new();
        let mut rng = SeededRandom::new(3);
        let mut seen = [false; 9];
        for _ in 0..500 {
            if let Some(pos) = choose_empty(&board, &mut rng) {
                seen[pos.to_index()] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }
}

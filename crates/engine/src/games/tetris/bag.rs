//! 7-bag randomizer: every run of seven pieces contains each kind once.

use super::pieces::PieceKind;
use crate::core::SimpleRng;

#[derive(Debug, Clone)]
pub struct PieceQueue {
    bag: [PieceKind; 7],
    bag_index: usize,
    rng: SimpleRng,
}

impl PieceQueue {
    pub fn new(seed: u32) -> Self {
        let mut queue = Self {
            bag: PieceKind::ALL,
            bag_index: 0,
            rng: SimpleRng::new(seed),
        };
        queue.refill_bag();
        queue
    }

    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Peek at the next piece without removing it
    pub fn peek(&self) -> PieceKind {
        self.bag[self.bag_index]
    }

    /// Take the next piece, shuffling a fresh bag when this one runs out.
    pub fn draw(&mut self) -> PieceKind {
        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }
        piece
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1)
    }
}

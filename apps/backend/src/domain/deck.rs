//! Deck construction and shuffling.

use rand::Rng;

use super::cards::{Card, Face, Suit};
use super::rules::DECK_SIZE;

/// Ordered sequence of cards. The draw end ("top") is the back of the vec;
/// draw, peek, and burn all consume from there.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Full 52-card deck in a fresh uniform random order.
    ///
    /// Fisher-Yates with inclusive bounds 0..=i, so every permutation is
    /// equally likely given an unbiased source.
    pub fn shuffled(rng: &mut impl Rng) -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for face in Face::ALL {
                cards.push(Card { suit, face });
            }
        }
        for i in (1..cards.len()).rev() {
            let j = rng.random_range(0..=i);
            cards.swap(i, j);
        }
        Self { cards }
    }

    /// Deck with a known order; the last card is the top. Used to stage
    /// deterministic deals.
    pub fn stacked(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn peek_top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

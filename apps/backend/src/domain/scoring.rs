//! Hand scoring for three-card hands.

use super::cards::{Card, Suit};
use super::rules::HAND_SIZE;

/// Score for three cards of the same face. Beats any suit sum short of an
/// automatic win.
pub const THREE_OF_A_KIND_SCORE: f32 = 30.5;

/// A hand worth exactly 31 (ace plus two ten-value cards of one suit) ends
/// the round immediately.
pub const AUTOMATIC_WIN_SCORE: f32 = 31.0;

/// Best single-suit sum of a three-card hand.
///
/// Defined only for exactly three cards; any other size scores 0 (a hand is
/// never scored mid-draw). Three matching faces score 30.5 regardless of
/// suits.
pub fn hand_score(hand: &[Card]) -> f32 {
    if hand.len() != HAND_SIZE {
        return 0.0;
    }
    if hand[0].face == hand[1].face && hand[1].face == hand[2].face {
        return THREE_OF_A_KIND_SCORE;
    }
    let mut best: u8 = 0;
    for suit in Suit::ALL {
        let sum: u8 = hand
            .iter()
            .filter(|c| c.suit == suit)
            .map(|c| c.value())
            .sum();
        best = best.max(sum);
    }
    f32::from(best)
}

pub fn is_automatic_win(hand: &[Card]) -> bool {
    hand_score(hand) == AUTOMATIC_WIN_SCORE
}

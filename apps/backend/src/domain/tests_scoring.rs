use crate::domain::cards::Card;
use crate::domain::scoring::{
    hand_score, is_automatic_win, AUTOMATIC_WIN_SCORE, THREE_OF_A_KIND_SCORE,
};

fn parse_cards(tokens: &[&str]) -> Vec<Card> {
    tokens
        .iter()
        .map(|t| t.parse::<Card>().expect("hardcoded valid card token"))
        .collect()
}

#[test]
fn three_of_a_kind_scores_thirty_and_a_half() {
    let hand = parse_cards(&["5H", "5D", "5C"]);
    assert_eq!(hand_score(&hand), THREE_OF_A_KIND_SCORE);

    // Regardless of which suits are involved
    let hand = parse_cards(&["KS", "KD", "KC"]);
    assert_eq!(hand_score(&hand), THREE_OF_A_KIND_SCORE);
}

#[test]
fn ace_king_queen_of_one_suit_is_thirty_one() {
    let hand = parse_cards(&["AS", "KS", "QS"]);
    assert_eq!(hand_score(&hand), AUTOMATIC_WIN_SCORE);
    assert!(is_automatic_win(&hand));
}

#[test]
fn ace_and_two_ten_values_reach_thirty_one() {
    assert!(is_automatic_win(&parse_cards(&["AH", "TH", "JH"])));
    assert!(is_automatic_win(&parse_cards(&["AD", "KD", "TD"])));
}

#[test]
fn best_suit_sum_wins() {
    // Hearts: 11 + 10 = 21, clubs: 2
    let hand = parse_cards(&["AH", "KH", "2C"]);
    assert_eq!(hand_score(&hand), 21.0);

    // Single-suit sum across all three
    let hand = parse_cards(&["2S", "3S", "4S"]);
    assert_eq!(hand_score(&hand), 9.0);

    // Three different suits: best single card
    let hand = parse_cards(&["9H", "8D", "2C"]);
    assert_eq!(hand_score(&hand), 9.0);
}

#[test]
fn mixed_suits_never_reach_thirty_one() {
    // 31 points of face value, but split across suits
    let hand = parse_cards(&["AH", "KD", "QS"]);
    assert_eq!(hand_score(&hand), 11.0);
    assert!(!is_automatic_win(&hand));
}

#[test]
fn wrong_size_hands_score_zero() {
    assert_eq!(hand_score(&[]), 0.0);
    assert_eq!(hand_score(&parse_cards(&["AS"])), 0.0);
    assert_eq!(hand_score(&parse_cards(&["AS", "KS"])), 0.0);
    // Four cards: the transient state between draw and discard is unscored
    assert_eq!(hand_score(&parse_cards(&["AS", "KS", "QS", "JS"])), 0.0);
}

#[test]
fn three_of_a_kind_beats_any_suit_sum_short_of_thirty_one() {
    let trips = hand_score(&parse_cards(&["7H", "7D", "7S"]));
    let best_flat = hand_score(&parse_cards(&["KH", "QH", "TH"]));
    assert!(trips > best_flat);
    assert!(trips < AUTOMATIC_WIN_SCORE);
}

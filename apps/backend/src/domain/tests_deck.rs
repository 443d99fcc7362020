use std::collections::HashSet;

use crate::domain::cards::Card;
use crate::domain::deck::Deck;
use crate::domain::rules::DECK_SIZE;

#[test]
fn shuffled_deck_holds_52_unique_cards() {
    let mut rng = rand::rng();
    let mut deck = Deck::shuffled(&mut rng);
    let mut seen: HashSet<Card> = HashSet::new();
    while let Some(card) = deck.draw() {
        assert!(seen.insert(card), "duplicate card {card}");
    }
    assert_eq!(seen.len(), DECK_SIZE);
}

#[test]
fn draw_consumes_the_peeked_top() {
    let mut rng = rand::rng();
    let mut deck = Deck::shuffled(&mut rng);
    for _ in 0..DECK_SIZE {
        let top = deck.peek_top();
        assert_eq!(top, deck.draw());
    }
    assert!(deck.is_empty());
    assert_eq!(deck.peek_top(), None);
}

#[test]
fn stacked_deck_draws_in_reverse_order() {
    let cards: Vec<Card> = ["2H", "5D", "AS"]
        .iter()
        .map(|t| t.parse().expect("hardcoded valid card token"))
        .collect();
    let mut deck = Deck::stacked(cards.clone());
    assert_eq!(deck.len(), 3);
    assert_eq!(deck.draw(), Some(cards[2]));
    assert_eq!(deck.draw(), Some(cards[1]));
    assert_eq!(deck.draw(), Some(cards[0]));
    assert_eq!(deck.draw(), None);
}

#[test]
fn shuffle_shows_no_positional_bias() {
    // Track where the ace of spades lands across many shuffles and compare
    // the position histogram against uniform with a chi-square statistic.
    const TRIALS: usize = 26_000;
    let target: Card = "AS".parse().expect("hardcoded valid card token");
    let mut rng = rand::rng();
    let mut counts = [0usize; DECK_SIZE];
    for _ in 0..TRIALS {
        let mut deck = Deck::shuffled(&mut rng);
        let mut pos = 0usize;
        while let Some(card) = deck.draw() {
            if card == target {
                counts[pos] += 1;
                break;
            }
            pos += 1;
        }
    }

    let expected = TRIALS as f64 / DECK_SIZE as f64;
    let chi2: f64 = counts
        .iter()
        .map(|&c| {
            let d = c as f64 - expected;
            d * d / expected
        })
        .sum();
    // 51 degrees of freedom; a fair shuffle exceeds 110 with probability
    // well under 1e-5.
    assert!(
        chi2 < 110.0,
        "chi-square statistic {chi2:.1} suggests positional bias"
    );
}

#[test]
fn independent_shuffles_differ() {
    let mut rng = rand::rng();
    let mut a = Deck::shuffled(&mut rng);
    let mut b = Deck::shuffled(&mut rng);
    let mut same = true;
    while let (Some(x), Some(y)) = (a.draw(), b.draw()) {
        if x != y {
            same = false;
        }
    }
    assert!(!same, "two independent shuffles produced identical order");
}

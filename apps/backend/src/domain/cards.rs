//! Core card types: Suit, Face, Card.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::errors::domain::{GameError, StructuralKind};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];
}

/// Face label of a card. The point value toward a suit sum is derived from
/// the face: Ace is 11, court cards are 10, numerals count as themselves.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Face {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Face {
    pub const ALL: [Face; 13] = [
        Face::Two,
        Face::Three,
        Face::Four,
        Face::Five,
        Face::Six,
        Face::Seven,
        Face::Eight,
        Face::Nine,
        Face::Ten,
        Face::Jack,
        Face::Queen,
        Face::King,
        Face::Ace,
    ];

    pub fn value(self) -> u8 {
        match self {
            Face::Two => 2,
            Face::Three => 3,
            Face::Four => 4,
            Face::Five => 5,
            Face::Six => 6,
            Face::Seven => 7,
            Face::Eight => 8,
            Face::Nine => 9,
            Face::Ten | Face::Jack | Face::Queen | Face::King => 10,
            Face::Ace => 11,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Face::Two => "2",
            Face::Three => "3",
            Face::Four => "4",
            Face::Five => "5",
            Face::Six => "6",
            Face::Seven => "7",
            Face::Eight => "8",
            Face::Nine => "9",
            Face::Ten => "10",
            Face::Jack => "J",
            Face::Queen => "Q",
            Face::King => "K",
            Face::Ace => "A",
        }
    }

    pub fn from_label(label: &str) -> Option<Face> {
        match label {
            "2" => Some(Face::Two),
            "3" => Some(Face::Three),
            "4" => Some(Face::Four),
            "5" => Some(Face::Five),
            "6" => Some(Face::Six),
            "7" => Some(Face::Seven),
            "8" => Some(Face::Eight),
            "9" => Some(Face::Nine),
            "10" => Some(Face::Ten),
            "J" => Some(Face::Jack),
            "Q" => Some(Face::Queen),
            "K" => Some(Face::King),
            "A" => Some(Face::Ace),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub face: Face,
}

impl Card {
    pub fn value(self) -> u8 {
        self.face.value()
    }
}

// Note: Ord on Card is only for stable sorting: suit order H<D<C<S then face order.
// Scoring never compares cards directly.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.suit.cmp(&other.suit) {
            std::cmp::Ordering::Equal => self.face.cmp(&other.face),
            ord => ord,
        }
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let suit_ch = match self.suit {
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
            Suit::Spades => 'S',
        };
        let face_ch = match self.face {
            Face::Ten => "T".to_string(),
            other => other.label().to_string(),
        };
        write!(f, "{face_ch}{suit_ch}")
    }
}

// Compact 2-character format ("AS", "TH", "2C"), used by tests and logs.
impl FromStr for Card {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || {
            GameError::structural(StructuralKind::MalformedPayload, format!("Parse card: {s}"))
        };
        if s.len() != 2 {
            return Err(err());
        }
        let mut chars = s.chars();
        let face = match chars.next().ok_or_else(err)? {
            '2' => Face::Two,
            '3' => Face::Three,
            '4' => Face::Four,
            '5' => Face::Five,
            '6' => Face::Six,
            '7' => Face::Seven,
            '8' => Face::Eight,
            '9' => Face::Nine,
            'T' => Face::Ten,
            'J' => Face::Jack,
            'Q' => Face::Queen,
            'K' => Face::King,
            'A' => Face::Ace,
            _ => return Err(err()),
        };
        let suit = match chars.next().ok_or_else(err)? {
            'H' => Suit::Hearts,
            'D' => Suit::Diamonds,
            'C' => Suit::Clubs,
            'S' => Suit::Spades,
            _ => return Err(err()),
        };
        Ok(Card { suit, face })
    }
}

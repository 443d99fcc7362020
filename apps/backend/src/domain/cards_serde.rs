//! Serialization for card types.
//!
//! Cards travel as `{"suit": "hearts", "face": "K", "value": 10}`. The value
//! is derived from the face on the way out and ignored on the way in.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::cards::{Card, Face, Suit};

impl Serialize for Suit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = match self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
        };
        serializer.serialize_str(s)
    }
}

impl<'de> Deserialize<'de> for Suit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "hearts" => Ok(Suit::Hearts),
            "diamonds" => Ok(Suit::Diamonds),
            "clubs" => Ok(Suit::Clubs),
            "spades" => Ok(Suit::Spades),
            _ => Err(serde::de::Error::custom(format!("Invalid suit: {s}"))),
        }
    }
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Card", 3)?;
        state.serialize_field("suit", &self.suit)?;
        state.serialize_field("face", self.face.label())?;
        state.serialize_field("value", &self.face.value())?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            suit: Suit,
            face: String,
            #[serde(default)]
            #[allow(dead_code)]
            value: Option<u8>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let face = Face::from_label(&raw.face)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid face: {}", raw.face)))?;
        Ok(Card {
            suit: raw.suit,
            face,
        })
    }
}

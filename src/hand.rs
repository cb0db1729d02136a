use serde::{Deserialize, Serialize};

use crate::card::{Card, Color};

/// An immutable bag of cards belonging to one player within a round.
///
/// A hand's identity is positional: the player index into the round's player
/// list. All operations return a new hand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHand {
    cards: Vec<Card>,
}

impl PlayerHand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn add(&self, card: Card) -> PlayerHand {
        let mut cards = self.cards.clone();
        cards.push(card);
        PlayerHand { cards }
    }

    /// Removes the first value-equal occurrence of `card`.
    ///
    /// Callers must only remove cards confirmed present by index lookup; a
    /// non-present card leaves the hand unchanged.
    pub fn remove(&self, card: Card) -> PlayerHand {
        let mut cards = self.cards.clone();
        if let Some(pos) = cards.iter().position(|c| *c == card) {
            cards.remove(pos);
        }
        PlayerHand { cards }
    }

    /// Removes the card at `index`; out of range leaves the hand unchanged.
    pub fn remove_at(&self, index: usize) -> PlayerHand {
        let mut cards = self.cards.clone();
        if index < cards.len() {
            cards.remove(index);
        }
        PlayerHand { cards }
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Card> {
        self.cards.get(index).copied()
    }

    /// True if any card in the hand carries the given color.
    pub fn has_color(&self, color: Color) -> bool {
        self.cards.iter().any(|c| c.color() == Some(color))
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

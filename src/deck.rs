use serde::{Deserialize, Serialize};

use crate::card::{Card, standard_deck};
use crate::shuffle::Shuffler;

/// An ordered, immutable sequence of cards treated as a stack.
///
/// Index 0 is the top: the next card to be dealt or exposed. Every operation
/// returns a new `Deck`; none mutate the receiver.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// A deck with no cards.
    pub fn empty() -> Self {
        Self { cards: Vec::new() }
    }

    /// The full 108-card deck in deterministic, unshuffled order.
    pub fn standard() -> Self {
        Self { cards: standard_deck() }
    }

    /// A deck holding exactly the given cards, first card on top.
    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The card that would be dealt next, without removing it.
    pub fn top(&self) -> Option<Card> {
        self.cards.first().copied()
    }

    /// Removes the top card. Dealing from an empty deck yields
    /// `(None, empty deck)` rather than failing.
    pub fn deal(&self) -> (Option<Card>, Deck) {
        match self.cards.split_first() {
            Some((card, rest)) => (Some(*card), Deck { cards: rest.to_vec() }),
            None => (None, Deck::empty()),
        }
    }

    /// Prepends a card, making it the new top.
    pub fn put_on_top(&self, card: Card) -> Deck {
        let mut cards = Vec::with_capacity(self.cards.len() + 1);
        cards.push(card);
        cards.extend_from_slice(&self.cards);
        Deck { cards }
    }

    /// Everything below the top card.
    pub fn under_top(&self) -> Deck {
        Deck { cards: self.cards.get(1..).unwrap_or_default().to_vec() }
    }

    /// Returns a new deck permuted by the injected shuffler.
    pub fn shuffle(&self, shuffler: &Shuffler) -> Deck {
        let mut cards = self.cards.clone();
        shuffler(&mut cards);
        Deck { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Color, DECK_SIZE};
    use crate::shuffle::identity_shuffler;

    #[test]
    fn test_standard_deck_size() {
        assert_eq!(Deck::standard().size(), DECK_SIZE);
    }

    #[test]
    fn test_deal_from_empty() {
        let (card, rest) = Deck::empty().deal();
        assert_eq!(card, None);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_deal_pops_top() {
        let deck = Deck::with_cards(vec![Card::Wild, Card::Skip(Color::Red)]);
        let (card, rest) = deck.deal();
        assert_eq!(card, Some(Card::Wild));
        assert_eq!(rest.top(), Some(Card::Skip(Color::Red)));
        // The original deck is untouched.
        assert_eq!(deck.size(), 2);
    }

    #[test]
    fn test_put_on_top_and_under_top() {
        let deck = Deck::with_cards(vec![Card::Wild]).put_on_top(Card::Reverse(Color::Blue));
        assert_eq!(deck.top(), Some(Card::Reverse(Color::Blue)));
        assert_eq!(deck.size(), 2);
        assert_eq!(deck.under_top().cards(), &[Card::Wild]);
        assert!(Deck::empty().under_top().is_empty());
    }

    #[test]
    fn test_identity_shuffle_preserves_order() {
        let deck = Deck::standard();
        let shuffled = deck.shuffle(&identity_shuffler());
        assert_eq!(deck, shuffled);
    }
}

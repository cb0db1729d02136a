use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four UNO suit colors.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
}

/// Representation of a single UNO card.
///
/// A card has no identity beyond its value: duplicates are legal and
/// indistinguishable.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Card {
    /// Numbered card between 0 and 9.
    Number { color: Color, value: u8 },
    /// Skips the next player.
    Skip(Color),
    /// Flips the direction of play.
    Reverse(Color),
    /// Next player draws two cards and loses their turn.
    Draw(Color),
    /// Played on anything; the player names the new active color.
    Wild,
    /// Wild plus four forced cards for the next player.
    WildDraw,
}

/// Color order used when building an unshuffled standard deck.
pub const COLORS: [Color; 4] = [Color::Blue, Color::Red, Color::Green, Color::Yellow];

pub const DECK_SIZE: usize = 108;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 10;
pub const DEFAULT_CARDS_PER_PLAYER: usize = 7;

impl Card {
    /// Returns the card's color, or `None` for wild cards.
    #[inline]
    pub fn color(&self) -> Option<Color> {
        match self {
            Card::Number { color, .. }
            | Card::Skip(color)
            | Card::Reverse(color)
            | Card::Draw(color) => Some(*color),
            Card::Wild | Card::WildDraw => None,
        }
    }

    /// Returns true for `Wild` and `WildDraw`.
    #[inline]
    pub fn is_wild(&self) -> bool {
        matches!(self, Card::Wild | Card::WildDraw)
    }

    /// Returns the face value for numbered cards.
    #[inline]
    pub fn value(&self) -> Option<u8> {
        match self {
            Card::Number { value, .. } => Some(*value),
            _ => None,
        }
    }
}

/// Builds the full 108-card UNO deck in deterministic order (unshuffled).
///
/// Per color: one zero, two each of 1-9, two Skip, two Reverse, two Draw;
/// plus four Wild and four WildDraw.
pub fn standard_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for value in 1..=9 {
        for color in COLORS {
            deck.push(Card::Number { color, value });
            deck.push(Card::Number { color, value });
        }
    }
    for color in COLORS {
        for _ in 0..2 {
            deck.push(Card::Skip(color));
            deck.push(Card::Reverse(color));
            deck.push(Card::Draw(color));
        }
    }
    for _ in 0..4 {
        deck.push(Card::Wild);
        deck.push(Card::WildDraw);
    }
    for color in COLORS {
        deck.push(Card::Number { color, value: 0 });
    }
    deck
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Red => "Red",
            Color::Yellow => "Yellow",
            Color::Green => "Green",
            Color::Blue => "Blue",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Number { color, value } => write!(f, "{color} {value}"),
            Card::Skip(color) => write!(f, "{color} Skip"),
            Card::Reverse(color) => write!(f, "{color} Reverse"),
            Card::Draw(color) => write!(f, "{color} Draw Two"),
            Card::Wild => write!(f, "Wild"),
            Card::WildDraw => write!(f, "Wild Draw Four"),
        }
    }
}

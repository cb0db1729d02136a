//! Point values for round scoring.
//!
//! When a round ends, the winner is awarded the summed point value of every
//! opponent's remaining hand: numbered cards score their face value,
//! Skip/Reverse/Draw score 20, wilds score 50.

use crate::card::Card;

/// Point value of a single card.
pub fn card_points(card: Card) -> u32 {
    match card {
        Card::Number { value, .. } => u32::from(value),
        Card::Skip(_) | Card::Reverse(_) | Card::Draw(_) => 20,
        Card::Wild | Card::WildDraw => 50,
    }
}

/// Summed point value of a hand.
pub fn hand_points(cards: &[Card]) -> u32 {
    cards.iter().copied().map(card_points).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Color;

    #[test]
    fn test_card_points() {
        assert_eq!(card_points(Card::Number { color: Color::Red, value: 0 }), 0);
        assert_eq!(card_points(Card::Number { color: Color::Blue, value: 9 }), 9);
        assert_eq!(card_points(Card::Skip(Color::Green)), 20);
        assert_eq!(card_points(Card::Reverse(Color::Yellow)), 20);
        assert_eq!(card_points(Card::Draw(Color::Red)), 20);
        assert_eq!(card_points(Card::Wild), 50);
        assert_eq!(card_points(Card::WildDraw), 50);
    }

    #[test]
    fn test_hand_points() {
        let hand = [
            Card::Number { color: Color::Red, value: 7 },
            Card::Draw(Color::Blue),
            Card::WildDraw,
        ];
        assert_eq!(hand_points(&hand), 77);
        assert_eq!(hand_points(&[]), 0);
    }
}

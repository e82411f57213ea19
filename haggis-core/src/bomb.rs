use std::collections::HashSet;

use crate::card::{Card, Suit};

const BOMB_RANKS: [u8; 4] = [3, 5, 7, 9];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bomb {
    Color,
    Rainbow,
}

impl Bomb {
    /// Classifies one played combination. The ranks must be 3-5-7-9 in
    /// play order; a sorted-down 9-7-5-3 is deliberately not a bomb.
    pub fn classify(cards: &[Card]) -> Option<Bomb> {
        if cards.len() != BOMB_RANKS.len() {
            return None;
        }
        let mut suits = HashSet::with_capacity(Suit::COUNT);
        for (card, expected_rank) in cards.iter().zip(BOMB_RANKS) {
            match card {
                Card::Suited { suit, rank } if *rank == expected_rank => suits.insert(*suit),
                _ => return None,
            };
        }
        match suits.len() {
            1 => Some(Bomb::Color),
            4 => Some(Bomb::Rainbow),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(tokens: &str) -> Vec<Card> {
        tokens.split('-').filter_map(Card::parse).collect()
    }

    #[test]
    fn color_bomb() {
        assert_eq!(Bomb::classify(&cards("r3-r5-r7-r9")), Some(Bomb::Color));
        assert_eq!(Bomb::classify(&cards("y3-y5-y7-y9")), Some(Bomb::Color));
    }

    #[test]
    fn rainbow_bomb() {
        assert_eq!(Bomb::classify(&cards("r3-b5-y7-p9")), Some(Bomb::Rainbow));
    }

    #[test]
    fn order_sensitive() {
        assert_eq!(Bomb::classify(&cards("r9-r7-r5-r3")), None);
        assert_eq!(Bomb::classify(&cards("r5-r3-r7-r9")), None);
    }

    #[test]
    fn not_bombs() {
        // two suits
        assert_eq!(Bomb::classify(&cards("r3-r5-b7-b9")), None);
        // wrong length
        assert_eq!(Bomb::classify(&cards("r3-r5-r7")), None);
        assert_eq!(Bomb::classify(&[]), None);
        // wild card in the combination
        assert_eq!(Bomb::classify(&cards("r3-r5-r7-J")), None);
    }
}

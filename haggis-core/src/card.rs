use std::{cmp::Ordering, fmt, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::result::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Red,
    Blue,
    Purple,
    Yellow,
}

impl Suit {
    pub const COUNT: usize = 4;

    pub const SUITS: [Suit; Self::COUNT] = [Suit::Red, Suit::Blue, Suit::Purple, Suit::Yellow];

    pub fn code(self) -> char {
        match self {
            Suit::Red => 'r',
            Suit::Blue => 'b',
            Suit::Purple => 'p',
            Suit::Yellow => 'y',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'r' => Some(Suit::Red),
            'b' => Some(Suit::Blue),
            'p' => Some(Suit::Purple),
            'y' => Some(Suit::Yellow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Jack,
    Queen,
    King,
}

impl Face {
    pub fn symbol(self) -> char {
        match self {
            Face::Jack => 'J',
            Face::Queen => 'Q',
            Face::King => 'K',
        }
    }
}

/// A Haggis card. Face cards are wild and carry no suit; the type makes
/// a suited jack unrepresentable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum Card {
    Suited { suit: Suit, rank: u8 },
    Wild(Face),
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Suited { suit, rank } => write!(f, "{}{}", suit.code(), rank),
            Card::Wild(face) => write!(f, "{}", face.symbol()),
        }
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self, f)
    }
}

impl FromStr for Card {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Card::parse(s).ok_or_else(|| Error::Card(s.to_string()))
    }
}

impl Card {
    /// Parses a log token like `r7` or `J`. Anything else is not a card,
    /// which is a skip for the callers, never a failure.
    pub fn parse(token: &str) -> Option<Card> {
        match token {
            "J" => return Some(Card::Wild(Face::Jack)),
            "Q" => return Some(Card::Wild(Face::Queen)),
            "K" => return Some(Card::Wild(Face::King)),
            _ => {}
        }
        let mut chars = token.chars();
        let suit = Suit::from_code(chars.next()?)?;
        let rank = chars.as_str().parse::<u8>().ok()?;
        if rank == 0 {
            return None;
        }
        Some(Card::Suited { suit, rank })
    }

    /// Numeric rank for sum statistics. Wild cards have none.
    pub fn rank_value(self) -> Option<u32> {
        match self {
            Card::Suited { rank, .. } => Some(u32::from(rank)),
            Card::Wild(_) => None,
        }
    }

    /// Display order for reconstructed hands: numeric cards ascending by
    /// rank with the suit letter as tie break, wild cards after them with
    /// J before Q before anything else.
    pub fn display_cmp(self, other: Card) -> Ordering {
        match (self, other) {
            (Card::Wild(left), Card::Wild(right)) => {
                if left == right {
                    Ordering::Equal
                } else if left == Face::Jack {
                    Ordering::Less
                } else if right == Face::Jack {
                    Ordering::Greater
                } else if left == Face::Queen {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (Card::Wild(_), Card::Suited { .. }) => Ordering::Greater,
            (Card::Suited { .. }, Card::Wild(_)) => Ordering::Less,
            (
                Card::Suited {
                    suit: left_suit,
                    rank: left_rank,
                },
                Card::Suited {
                    suit: right_suit,
                    rank: right_rank,
                },
            ) => left_rank
                .cmp(&right_rank)
                .then(left_suit.code().cmp(&right_suit.code())),
        }
    }
}

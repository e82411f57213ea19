use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::card::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreReason {
    Cards,
    Bet,
    Hand,
    Bomb,
}

/// One normalized log event. Players are indexes into `Game::players`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Plays {
        player: u8,
        cards: Vec<Card>,
    },
    Bets {
        player: u8,
        // Verbatim log token, not validated as a number.
        amount: String,
    },
    Scores {
        player: u8,
        points: u32,
        reason: Option<ScoreReason>,
    },
    GoesOut {
        player: u8,
        remaining: BTreeMap<u8, Vec<Card>>,
        // Count read off the goes-out line itself. The four-player log
        // states it there instead of revealing the hands.
        remaining_count: Option<u32>,
        haggis: Vec<Card>,
    },
    WinsTrick {
        player: u8,
    },
    Concedes {
        player: u8,
    },
    Slams {
        player: u8,
    },
    PassesLead {
        player: u8,
    },
    // An end-of-round line listing cards a player still held.
    Reveals {
        player: u8,
        cards: Vec<Card>,
    },
}

impl Action {
    pub fn player(&self) -> usize {
        let player = match self {
            Action::Plays { player, .. } => player,
            Action::Bets { player, .. } => player,
            Action::Scores { player, .. } => player,
            Action::GoesOut { player, .. } => player,
            Action::WinsTrick { player } => player,
            Action::Concedes { player } => player,
            Action::Slams { player } => player,
            Action::PassesLead { player } => player,
            Action::Reveals { player, .. } => player,
        };
        usize::from(*player)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub table_id: String,
    pub players: Vec<String>,
    pub rounds: Vec<Round>,
    /// Partner pairs announced by the four-player "sends" lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<(u8, u8)>,
    /// Winner named on the four-player end-of-game line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_winner: Option<u8>,
}

impl Game {
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player_name(&self, player: usize) -> &str {
        &self.players[player]
    }

    pub fn team_of(&self, player: u8) -> Option<(u8, u8)> {
        self.teams
            .iter()
            .copied()
            .find(|&(first, second)| first == player || second == player)
    }
}

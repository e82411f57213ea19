//! Replays a round's actions into per-player card lists for display.
//! This is a log of cards seen, not a live hand simulation: every card
//! a player showed (plays, revealed remaining hands, end-of-round
//! reveals) lands in that player's list.

use crate::card::Card;
use crate::game::{Action, Game, Round};

pub fn build(game: &Game) -> Vec<Vec<Vec<Card>>> {
    game.rounds
        .iter()
        .map(|round| build_round(game.player_count(), round))
        .collect()
}

pub fn build_round(player_count: usize, round: &Round) -> Vec<Vec<Card>> {
    let mut hands: Vec<Vec<Card>> = vec![Vec::new(); player_count];
    for action in &round.actions {
        match action {
            Action::Plays { player, cards } => {
                hands[usize::from(*player)].extend(cards.iter().copied());
            }
            Action::GoesOut { remaining, .. } => {
                for (holder, cards) in remaining {
                    hands[usize::from(*holder)].extend(cards.iter().copied());
                }
            }
            Action::Reveals { player, cards } => {
                hands[usize::from(*player)].extend(cards.iter().copied());
            }
            _ => {}
        }
    }
    for hand in &mut hands {
        hand.sort_by(|left, right| left.display_cmp(*right));
    }
    hands
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    bomb::Bomb,
    card::Card,
    game::{Action, Game, ScoreReason},
};

/// Cumulative per-player counters over all counted rounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub tens: u32,
    pub color_bombs: u32,
    pub rainbow_bombs: u32,
    /// Bet amount (verbatim log token) to number of times it was placed.
    pub bets: BTreeMap<String, u32>,
    pub total_bets: u32,
    pub successful_bets: u32,
    /// Rounds this player was out first.
    pub wins: u32,
    /// Four-player log only: slams achieved and leads passed on.
    pub slams: u32,
    pub passes_lead: u32,
    pub score: u32,
    pub points_from_cards: u32,
    pub points_from_bets: u32,
    pub points_from_remaining: u32,
    /// Rounds where this player made the first play.
    pub led: u32,
    pub led_and_won: u32,
    pub sum_total: u32,
    pub sum_min: Option<u32>,
    pub sum_max: Option<u32>,
    /// None when no rounds were counted.
    pub sum_avg: Option<f64>,
    /// Rounds with a strictly larger card sum than the opponent.
    /// Only tracked for two-player games.
    pub larger_sum: u32,
}

/// Snapshot of one counted round. All vectors are indexed by player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundStats {
    pub start_player: Option<u8>,
    /// Cumulative score captured before this round's actions were applied.
    pub starting_score: Vec<u32>,
    pub points: Vec<u32>,
    pub bets: Vec<Option<String>>,
    pub tens: Vec<u32>,
    pub color_bombs: Vec<u32>,
    pub rainbow_bombs: Vec<u32>,
    pub sums: Vec<Option<u32>>,
    pub passes_lead: Vec<u32>,
    /// Players in the order they went out.
    pub out_order: Vec<u8>,
    /// Cards the other players still held when this player went out.
    pub remaining_count: Vec<Option<u32>>,
}

impl RoundStats {
    fn open(player_count: usize, starting_score: Vec<u32>) -> Self {
        Self {
            start_player: None,
            starting_score,
            points: vec![0; player_count],
            bets: vec![None; player_count],
            tens: vec![0; player_count],
            color_bombs: vec![0; player_count],
            rainbow_bombs: vec![0; player_count],
            sums: vec![None; player_count],
            passes_lead: vec![0; player_count],
            out_order: Vec::new(),
            remaining_count: vec![None; player_count],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub players: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<(u8, u8)>,
    pub rounds: Vec<RoundStats>,
    pub player_stats: Vec<PlayerStats>,
    pub winner: u8,
    pub conceder: Option<u8>,
}

impl Stats {
    pub fn of(game: &Game) -> Stats {
        let player_count = game.player_count();
        let mut player_stats = vec![PlayerStats::default(); player_count];
        let mut rounds: Vec<RoundStats> = Vec::new();
        let mut conceder = None;

        for round in &game.rounds {
            let starting_score = player_stats.iter().map(|stats| stats.score).collect();
            let mut round_stats = RoundStats::open(player_count, starting_score);
            let mut conceded = false;

            for action in &round.actions {
                let subject = action.player();
                match action {
                    Action::Scores { points, reason, .. } => {
                        player_stats[subject].score += points;
                        round_stats.points[subject] += points;
                        match reason {
                            Some(ScoreReason::Cards) | Some(ScoreReason::Bomb) => {
                                player_stats[subject].points_from_cards += points
                            }
                            Some(ScoreReason::Bet) => {
                                player_stats[subject].points_from_bets += points
                            }
                            Some(ScoreReason::Hand) => {
                                player_stats[subject].points_from_remaining += points
                            }
                            None => {}
                        }
                    }
                    Action::Bets { amount, .. } => {
                        // A four-player bet replaces the team's earlier
                        // bet in this round, which is taken back.
                        if player_count == 4 {
                            retract_team_bet(game, &mut round_stats, &mut player_stats, subject);
                        }
                        round_stats.bets[subject] = Some(amount.clone());
                        *player_stats[subject].bets.entry(amount.clone()).or_insert(0) += 1;
                        player_stats[subject].total_bets += 1;
                    }
                    Action::Plays { player, cards } => {
                        if round_stats.start_player.is_none() {
                            round_stats.start_player = Some(*player);
                            player_stats[subject].led += 1;
                        }
                        for card in cards {
                            tally_card(&mut round_stats, &mut player_stats[subject], subject, *card);
                        }
                        match Bomb::classify(cards) {
                            Some(Bomb::Rainbow) => {
                                round_stats.rainbow_bombs[subject] += 1;
                                player_stats[subject].rainbow_bombs += 1;
                            }
                            Some(Bomb::Color) => {
                                round_stats.color_bombs[subject] += 1;
                                player_stats[subject].color_bombs += 1;
                            }
                            None => {}
                        }
                    }
                    Action::GoesOut {
                        player,
                        remaining,
                        remaining_count,
                        ..
                    } => {
                        round_stats.out_order.push(*player);
                        let held_elsewhere = remaining
                            .values()
                            .map(|cards| cards.len() as u32)
                            .sum::<u32>();
                        round_stats.remaining_count[subject] =
                            Some(remaining_count.unwrap_or(held_elsewhere));
                        if round_stats.out_order.len() == 1 {
                            player_stats[subject].wins += 1;
                            if round_stats.bets[subject].is_some() {
                                player_stats[subject].successful_bets += 1;
                            }
                            if round_stats.start_player == Some(*player) {
                                player_stats[subject].led_and_won += 1;
                            }
                        }
                        // Held-but-unplayed cards still count toward the
                        // holder's card-sum statistics.
                        for (holder, cards) in remaining {
                            let holder = usize::from(*holder);
                            for card in cards {
                                tally_card(&mut round_stats, &mut player_stats[holder], holder, *card);
                            }
                        }
                    }
                    Action::Slams { player } => {
                        player_stats[subject].slams += 1;
                        round_stats.out_order.push(*player);
                        // A slam shares the count reported when the
                        // first player went out.
                        let first_out = usize::from(round_stats.out_order[0]);
                        round_stats.remaining_count[subject] =
                            round_stats.remaining_count[first_out];
                    }
                    Action::PassesLead { .. } => {
                        round_stats.passes_lead[subject] += 1;
                        player_stats[subject].passes_lead += 1;
                    }
                    Action::Reveals { cards, .. } => {
                        for card in cards {
                            tally_card(&mut round_stats, &mut player_stats[subject], subject, *card);
                        }
                    }
                    Action::Concedes { player } => {
                        conceder = Some(*player);
                        conceded = true;
                    }
                    Action::WinsTrick { .. } => {}
                }
            }

            // A conceded round keeps its raw actions upstream but is not
            // counted here.
            if !conceded {
                rounds.push(round_stats);
            }
        }

        // The four-player log names its winner outright; the two-player
        // log leaves it to the cumulative scores.
        let winner = game
            .declared_winner
            .unwrap_or_else(|| pick_winner(&player_stats));
        finish_sum_stats(&mut player_stats, &rounds);

        Stats {
            players: game.players.clone(),
            teams: game.teams.clone(),
            rounds,
            player_stats,
            winner,
            conceder,
        }
    }
}

fn retract_team_bet(
    game: &Game,
    round_stats: &mut RoundStats,
    player_stats: &mut [PlayerStats],
    subject: usize,
) {
    let members = match game.team_of(subject as u8) {
        Some((first, second)) => [usize::from(first), usize::from(second)],
        // Teams not announced yet; only a re-bet by the same player
        // can be replaced.
        None => [subject, subject],
    };
    for member in members {
        if let Some(old_bet) = round_stats.bets[member].take() {
            if let Some(count) = player_stats[member].bets.get_mut(&old_bet) {
                *count = count.saturating_sub(1);
            }
            player_stats[member].total_bets -= 1;
            break;
        }
    }
}

fn tally_card(round_stats: &mut RoundStats, stats: &mut PlayerStats, player: usize, card: Card) {
    let Some(rank) = card.rank_value() else {
        return;
    };
    if rank == 10 {
        round_stats.tens[player] += 1;
        stats.tens += 1;
    }
    *round_stats.sums[player].get_or_insert(0) += rank;
    stats.sum_total += rank;
}

// Ties go to the later player. This keeps the original strict-greater
// comparison where two equal scores name the second player the winner.
fn pick_winner(player_stats: &[PlayerStats]) -> u8 {
    let mut winner = 0usize;
    for (player, stats) in player_stats.iter().enumerate().skip(1) {
        if stats.score >= player_stats[winner].score {
            winner = player;
        }
    }
    winner as u8
}

fn finish_sum_stats(player_stats: &mut [PlayerStats], rounds: &[RoundStats]) {
    for (player, stats) in player_stats.iter_mut().enumerate() {
        if !rounds.is_empty() {
            stats.sum_avg = Some(f64::from(stats.sum_total) / rounds.len() as f64);
        }
        for round in rounds {
            let Some(sum) = round.sums[player] else {
                continue;
            };
            stats.sum_min = Some(stats.sum_min.map_or(sum, |current| current.min(sum)));
            stats.sum_max = Some(stats.sum_max.map_or(sum, |current| current.max(sum)));
        }
    }

    if player_stats.len() == 2 {
        for round in rounds {
            let (Some(first), Some(second)) = (round.sums[0], round.sums[1]) else {
                continue;
            };
            if first < second {
                player_stats[1].larger_sum += 1;
            } else if first > second {
                player_stats[0].larger_sum += 1;
            }
        }
    }
}

//! Plain-text rendering of the computed statistics. All numbers come
//! from the core; nothing here derives new values beyond row formatting.

use std::fmt::Write;

use haggis_core::card::Card;
use haggis_core::game::Game;
use haggis_core::stats::{RoundStats, Stats};

pub fn render(game: &Game, stats: &Stats, hands: &[Vec<Vec<Card>>]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Game {}", game.table_id);
    let _ = writeln!(out, "Winner: {}", winner_name(stats));
    if let Some(conceder) = stats.conceder {
        let _ = writeln!(out, "Conceder: {}", name(stats, conceder));
    }
    let _ = writeln!(out, "Rounds: {}", stats.rounds.len());
    let _ = writeln!(out);

    header_row(&mut out, stats);
    player_row(&mut out, stats, "Score", |p| p.score.to_string());
    player_row(&mut out, stats, "Captured Points", |p| {
        p.points_from_cards.to_string()
    });
    player_row(&mut out, stats, "5x Points", |p| {
        p.points_from_remaining.to_string()
    });
    player_row(&mut out, stats, "Bet Points", |p| {
        p.points_from_bets.to_string()
    });
    player_row(&mut out, stats, "Bets (w/t)", |p| {
        format!("{}/{}", p.successful_bets, p.total_bets)
    });
    for amount in ["5", "15", "30"] {
        player_row(&mut out, stats, &format!("{amount} Bets"), |p| {
            p.bets.get(amount).copied().unwrap_or(0).to_string()
        });
    }
    player_row(&mut out, stats, "Out First", |p| p.wins.to_string());
    if stats.players.len() == 4 {
        player_row(&mut out, stats, "Slams", |p| p.slams.to_string());
        player_row(&mut out, stats, "Lead Passes", |p| {
            p.passes_lead.to_string()
        });
    }
    player_row(&mut out, stats, "Started", |p| p.led.to_string());
    player_row(&mut out, stats, "Started & Out First", |p| {
        p.led_and_won.to_string()
    });
    player_row(&mut out, stats, "10s", |p| p.tens.to_string());
    player_row(&mut out, stats, "Rainbow Bombs", |p| {
        p.rainbow_bombs.to_string()
    });
    player_row(&mut out, stats, "Color Bombs", |p| p.color_bombs.to_string());
    player_row(&mut out, stats, "Card Sum", |p| p.sum_total.to_string());
    if stats.players.len() == 2 {
        player_row(&mut out, stats, "Rounds with > Sum", |p| {
            p.larger_sum.to_string()
        });
    }
    player_row(&mut out, stats, "Card Sum Avg", |p| {
        p.sum_avg.map_or("NA".to_string(), |avg| format!("{avg:.2}"))
    });
    player_row(&mut out, stats, "Card Sum Min", |p| opt(p.sum_min));
    player_row(&mut out, stats, "Card Sum Max", |p| opt(p.sum_max));

    for (index, round) in stats.rounds.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Round {}", index + 1);
        round_summary(&mut out, stats, round);
        if let Some(round_hands) = hands.get(index) {
            for (player, hand) in round_hands.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  {} hand: {}",
                    stats.players[player],
                    render_cards(hand)
                );
            }
        }
    }

    out
}

fn round_summary(out: &mut String, stats: &Stats, round: &RoundStats) {
    if let Some(start_player) = round.start_player {
        let _ = writeln!(out, "  Started: {}", name(stats, start_player));
    }
    if let Some(first_out) = round.out_order.first() {
        let _ = writeln!(out, "  Out First: {}", name(stats, *first_out));
        let remaining = round.remaining_count[usize::from(*first_out)];
        let _ = writeln!(out, "  Remaining Cards: {}", opt(remaining));
    }
    round_row(out, "Starting Score", &round.starting_score);
    round_row(out, "Points Gained", &round.points);
    let bets: Vec<String> = round
        .bets
        .iter()
        .map(|bet| bet.clone().unwrap_or_else(|| "NA".to_string()))
        .collect();
    let _ = writeln!(out, "  Bets: {}", bets.join(" / "));
    round_row(out, "10s", &round.tens);
    round_row(out, "Rainbow Bombs", &round.rainbow_bombs);
    round_row(out, "Color Bombs", &round.color_bombs);
    let sums: Vec<String> = round.sums.iter().map(|sum| opt(*sum)).collect();
    let _ = writeln!(out, "  Card Sum: {}", sums.join(" / "));
}

fn header_row(out: &mut String, stats: &Stats) {
    let _ = writeln!(out, "{:<22}{}", "", stats.players.join(" / "));
}

fn player_row(
    out: &mut String,
    stats: &Stats,
    label: &str,
    value: impl Fn(&haggis_core::stats::PlayerStats) -> String,
) {
    let values: Vec<String> = stats.player_stats.iter().map(value).collect();
    let _ = writeln!(out, "{label:<22}{}", values.join(" / "));
}

fn round_row(out: &mut String, label: &str, values: &[u32]) {
    let rendered: Vec<String> = values.iter().map(u32::to_string).collect();
    let _ = writeln!(out, "  {label}: {}", rendered.join(" / "));
}

fn render_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn name(stats: &Stats, player: u8) -> &str {
    &stats.players[usize::from(player)]
}

// In a four-player game the winner is a team, named as both partners.
fn winner_name(stats: &Stats) -> String {
    let winner = stats.winner;
    match stats
        .teams
        .iter()
        .find(|&&(first, second)| first == winner || second == winner)
    {
        Some(&(first, second)) => format!("{}/{}", name(stats, first), name(stats, second)),
        None => name(stats, winner).to_string(),
    }
}

fn opt(value: Option<u32>) -> String {
    value.map_or("NA".to_string(), |v| v.to_string())
}

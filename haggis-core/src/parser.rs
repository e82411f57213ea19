use std::collections::BTreeMap;

use regex::Regex;
use serde::Deserialize;

use crate::{
    card::Card,
    game::{Action, Game, Round, ScoreReason},
    result::{Error, Result},
};

const ROUND_START_TWO_PLAYER: &str = "starts a new round";
const ROUND_START_FOUR_PLAYER: &str = "will start a new round";
const END_OF_GAME: &str = "The end of the game";

/// The exported log shape handed over by the browser-side extraction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInput {
    pub table_id: String,
    pub players: Vec<String>,
    pub lines: Vec<String>,
}

/// The two log dialects. They differ in more than the round-start
/// phrase: the two-player log reveals remaining hands in a marked
/// two-line block and has trick-win notices, while the four-player log
/// states the remaining count on the goes-out line itself, announces
/// teams with "sends" lines, reports slams and lead passes, and names
/// the winner on its end-of-game marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    TwoPlayer,
    FourPlayer,
}

impl LogFormat {
    pub fn detect(lines: &[String]) -> LogFormat {
        if lines.iter().any(|line| line.contains(ROUND_START_FOUR_PLAYER)) {
            LogFormat::FourPlayer
        } else {
            LogFormat::TwoPlayer
        }
    }

    pub fn player_count(self) -> usize {
        match self {
            LogFormat::TwoPlayer => 2,
            LogFormat::FourPlayer => 4,
        }
    }

    fn ends_on_game_over(self) -> bool {
        // The two-player format derives the winner from the scores instead.
        self == LogFormat::FourPlayer
    }
}

/// Cursor over the line slice. The "remaining cards" lookahead consumes
/// through it, so the two-line contract is explicit and testable.
struct LineCursor<'a> {
    lines: &'a [String],
    index: usize,
}

impl<'a> LineCursor<'a> {
    fn new(lines: &'a [String]) -> Self {
        Self { lines, index: 0 }
    }

    fn next(&mut self) -> Option<&'a str> {
        let line = self.lines.get(self.index)?;
        self.index += 1;
        Some(line)
    }

    /// One-based number of the most recently yielded line.
    fn line_number(&self) -> usize {
        self.index
    }
}

// Per-call scan state. Never shared across parses.
struct ScanState {
    in_log: bool,
    // Action index recorded when the current round's goes-out opened,
    // used to splice later trick-win notices in front of it.
    goes_out: Option<usize>,
}

pub struct LogParser {
    re_score: Regex,
}

impl LogParser {
    pub fn new() -> Self {
        Self {
            re_score: Regex::new(r"scores? (\d+) point").unwrap(),
        }
    }

    pub fn parse(
        &self,
        format: LogFormat,
        table_id: &str,
        players: &[String],
        lines: &[String],
    ) -> Result<Game> {
        if players.len() != format.player_count() {
            return Err(Error::Input(format!(
                "{:?} log needs {} players, got {}",
                format,
                format.player_count(),
                players.len()
            )));
        }

        let mut game = Game {
            table_id: table_id.to_string(),
            players: players.to_vec(),
            rounds: Vec::new(),
            teams: Vec::new(),
            declared_winner: None,
        };
        let mut state = ScanState {
            in_log: false,
            goes_out: None,
        };
        let mut cursor = LineCursor::new(lines);

        while let Some(line) = cursor.next() {
            let player = identify_player(players, line);
            let words: Vec<&str> = match player {
                Some(index) => owned_words(line, &players[index]),
                None => line.split_whitespace().collect(),
            };
            let Some(&first_word) = words.first() else {
                continue;
            };
            if first_word == "Move" || first_word == "You" {
                continue;
            }

            if line.contains(ROUND_START_TWO_PLAYER) || line.contains(ROUND_START_FOUR_PLAYER) {
                state.in_log = true;
                state.goes_out = None;
                game.rounds.push(Round::default());
                log::debug!("line {}: round {} opened", cursor.line_number(), game.rounds.len());
                continue;
            }
            if !state.in_log {
                continue;
            }
            let Some(round) = game.rounds.last_mut() else {
                continue;
            };

            // The order of the checks below mirrors the log format and
            // which lines fall through into later checks. Do not reorder.

            if format == LogFormat::TwoPlayer && is_trick_win(line) {
                if let Some(subject) = player {
                    let action = Action::WinsTrick {
                        player: subject as u8,
                    };
                    match state.goes_out {
                        None => round.actions.push(action),
                        Some(index) => round.actions.insert(index, action),
                    }
                }
            }

            if let Some(captures) = self.re_score.captures(line) {
                if let Some(subject) = player {
                    let points = captures[1].parse::<u32>().map_err(|err| Error::Line {
                        line: cursor.line_number(),
                        message: format!("bad point count: {err}"),
                    })?;
                    round.actions.push(Action::Scores {
                        player: subject as u8,
                        points,
                        reason: score_reason(line),
                    });
                }
            }

            if format == LogFormat::FourPlayer && first_word == "sends" {
                if let Some(subject) = player {
                    record_team(&mut game, subject as u8, &words, players);
                }
                continue;
            }

            if first_word.contains("bets") {
                if let (Some(subject), Some(amount)) = (player, words.get(1)) {
                    round.actions.push(Action::Bets {
                        player: subject as u8,
                        amount: (*amount).to_string(),
                    });
                }
                continue;
            }

            if first_word.contains("plays") {
                if let Some(subject) = player {
                    let cards = words
                        .get(1)
                        .map(|word| parse_play_tokens(word))
                        .unwrap_or_default();
                    round.actions.push(Action::Plays {
                        player: subject as u8,
                        cards,
                    });
                }
                continue;
            }

            if format == LogFormat::FourPlayer && line.contains("achieves a slam") {
                if let Some(subject) = player {
                    round.actions.push(Action::Slams {
                        player: subject as u8,
                    });
                }
            }

            if format == LogFormat::FourPlayer && line.contains("passes the lead") {
                if let Some(subject) = player {
                    round.actions.push(Action::PassesLead {
                        player: subject as u8,
                    });
                }
                continue;
            }

            if line.contains("goes out") {
                if let Some(subject) = player {
                    state.goes_out = Some(round.actions.len());
                    round.actions.push(Action::GoesOut {
                        player: subject as u8,
                        remaining: BTreeMap::new(),
                        remaining_count: goes_out_count(&words),
                        haggis: Vec::new(),
                    });
                }
                continue;
            }

            if format == LogFormat::TwoPlayer && line.contains("remaining cards") {
                Self::parse_remaining(&mut cursor, players, round, state.goes_out)?;
                continue;
            }

            if format.ends_on_game_over() && line.contains(END_OF_GAME) {
                game.declared_winner = declared_winner(players, line);
                break;
            }

            if line.contains("concedes the game") {
                if let Some(subject) = player {
                    round.actions.push(Action::Concedes {
                        player: subject as u8,
                    });
                }
                continue;
            }

            if format == LogFormat::FourPlayer {
                if let Some(subject) = player {
                    if line.as_bytes().get(players[subject].len()) == Some(&b':') {
                        round.actions.push(Action::Reveals {
                            player: subject as u8,
                            cards: parse_card_list(line),
                        });
                    }
                }
            }
        }

        Ok(game)
    }

    /// Two-line lookahead after a "remaining cards" marker: the loser's
    /// held cards, then the revealed haggis. The layout is positional
    /// with no resynchronization marker, so anything off is fatal.
    fn parse_remaining(
        cursor: &mut LineCursor,
        players: &[String],
        round: &mut Round,
        goes_out: Option<usize>,
    ) -> Result<()> {
        let marker_line = cursor.line_number();
        if goes_out.is_none() {
            return Err(Error::Lookahead {
                line: marker_line,
                message: "remaining cards block without a preceding goes-out".to_string(),
            });
        }

        let remaining_line = cursor.next().ok_or_else(|| Error::Lookahead {
            line: marker_line,
            message: "log ends before the remaining-cards line".to_string(),
        })?;
        let holder = identify_player(players, remaining_line).ok_or_else(|| Error::Lookahead {
            line: cursor.line_number(),
            message: format!("no known player owns '{remaining_line}'"),
        })?;
        let remaining_cards = parse_card_list(remaining_line);

        let haggis_line = cursor.next().ok_or_else(|| Error::Lookahead {
            line: marker_line,
            message: "log ends before the haggis line".to_string(),
        })?;
        // The block is positional with no way to resynchronize, so a
        // mislabeled line here means the log is corrupt.
        if !haggis_line.starts_with("Haggis:") {
            return Err(Error::Lookahead {
                line: cursor.line_number(),
                message: format!("expected a 'Haggis:' line, got '{haggis_line}'"),
            });
        }
        let haggis_cards = parse_card_list(haggis_line);

        // Trick-win splices may have shifted the recorded index, so find
        // the goes-out action itself.
        let open_goes_out = round.actions.iter_mut().rev().find_map(|action| match action {
            Action::GoesOut {
                remaining, haggis, ..
            } => Some((remaining, haggis)),
            _ => None,
        });
        match open_goes_out {
            Some((remaining, haggis)) => {
                remaining.insert(holder as u8, remaining_cards);
                *haggis = haggis_cards;
                Ok(())
            }
            None => Err(Error::Lookahead {
                line: marker_line,
                message: "no goes-out action in the current round".to_string(),
            }),
        }
    }
}

fn identify_player(players: &[String], line: &str) -> Option<usize> {
    players
        .iter()
        .position(|name| line.starts_with(name.as_str()))
}

fn owned_words<'a>(line: &'a str, name: &str) -> Vec<&'a str> {
    line.get(name.len() + 1..)
        .unwrap_or("")
        .split_whitespace()
        .collect()
}

fn is_trick_win(line: &str) -> bool {
    line.contains("wins the trick")
        || line.contains("wins this trick")
        || line.contains("won this trick")
}

fn score_reason(line: &str) -> Option<ScoreReason> {
    if line.contains("bomb") {
        Some(ScoreReason::Bomb)
    } else if line.contains("trick") || line.contains("remaining") {
        Some(ScoreReason::Cards)
    } else if line.contains("bet") {
        Some(ScoreReason::Bet)
    } else if line.contains("goes out") {
        Some(ScoreReason::Hand)
    } else {
        None
    }
}

fn parse_play_tokens(word: &str) -> Vec<Card> {
    word.split('-').filter_map(Card::parse).collect()
}

// "sends" lines pair the sender with the named partner. The reverse
// announcement of an already paired player is ignored.
fn record_team(game: &mut Game, subject: u8, words: &[&str], players: &[String]) {
    if game.teams.len() >= 2 || game.team_of(subject).is_some() {
        return;
    }
    let partner = words
        .get(1)
        .and_then(|name| players.iter().position(|player| player.as_str() == *name));
    if let Some(partner) = partner {
        game.teams.push((subject, partner as u8));
    }
}

/// The four-player goes-out line carries its own count, phrased as
/// "... has N remaining cards". Two-player goes-out lines have none.
fn goes_out_count(words: &[&str]) -> Option<u32> {
    let index = words
        .iter()
        .position(|word| word.starts_with("remaining"))?
        .checked_sub(1)?;
    words[index].parse().ok()
}

// The end-of-game marker names the winner in its sixth word.
fn declared_winner(players: &[String], line: &str) -> Option<u8> {
    let name = line
        .split_whitespace()
        .nth(5)?
        .trim_matches(|c: char| !c.is_alphanumeric());
    players
        .iter()
        .position(|player| player == name)
        .map(|index| index as u8)
}

fn parse_card_list(line: &str) -> Vec<Card> {
    line.split_whitespace()
        .map(|word| word.strip_suffix(',').unwrap_or(word))
        .filter_map(Card::parse)
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{fs, path::Path};

    use super::*;

    pub(crate) fn load_sample() -> (LogInput, Game) {
        let path = Path::new("src").join("test_data").join("sample_log.json");
        let content = fs::read_to_string(path).unwrap();
        let input: LogInput = serde_json::from_str(&content).unwrap();
        let format = LogFormat::detect(&input.lines);
        assert_eq!(format, LogFormat::TwoPlayer);
        let game = LogParser::new()
            .parse(format, &input.table_id, &input.players, &input.lines)
            .unwrap();
        (input, game)
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|line| line.to_string()).collect()
    }

    fn players(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn cards(tokens: &str) -> Vec<Card> {
        tokens.split('-').filter_map(Card::parse).collect()
    }

    #[test]
    fn parse_sample_log() {
        let (input, game) = load_sample();
        assert_eq!(game.table_id, input.table_id);
        assert_eq!(game.players, ["Alice", "Bob"]);
        assert_eq!(game.rounds.len(), 2);

        let first = &game.rounds[0].actions;
        assert_eq!(first.len(), 13);
        assert_eq!(
            first[0],
            Action::Bets {
                player: 0,
                amount: "15".to_string()
            }
        );
        assert_eq!(
            first[1],
            Action::Bets {
                player: 1,
                amount: "30".to_string()
            }
        );
        assert_eq!(
            first[2],
            Action::Plays {
                player: 0,
                cards: cards("r3-r5-r7-r9")
            }
        );
        assert_eq!(
            first[3],
            Action::Scores {
                player: 0,
                points: 4,
                reason: Some(ScoreReason::Bomb)
            }
        );
        assert_eq!(first[5], Action::WinsTrick { player: 1 });
        assert_eq!(
            first[8],
            Action::Scores {
                player: 0,
                points: 5,
                reason: Some(ScoreReason::Hand)
            }
        );
        // The later trick-win notice is displayed before the goes-out.
        assert_eq!(first[9], Action::WinsTrick { player: 0 });
        let Action::GoesOut {
            player,
            remaining,
            remaining_count,
            haggis,
        } = &first[10]
        else {
            panic!("expected goes-out, got {:?}", first[10]);
        };
        assert_eq!(*player, 0);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[&1], cards("b2-y4-J"));
        assert_eq!(*remaining_count, None);
        assert_eq!(*haggis, cards("p6-r11"));
        assert_eq!(
            first[11],
            Action::Scores {
                player: 0,
                points: 17,
                reason: Some(ScoreReason::Cards)
            }
        );
        assert_eq!(
            first[12],
            Action::Scores {
                player: 0,
                points: 15,
                reason: Some(ScoreReason::Bet)
            }
        );

        let second = &game.rounds[1].actions;
        assert_eq!(second.len(), 7);
        assert_eq!(
            second[0],
            Action::Plays {
                player: 1,
                cards: cards("b5")
            }
        );
        assert_eq!(second[2], Action::WinsTrick { player: 1 });
        let Action::GoesOut { remaining, .. } = &second[5] else {
            panic!("expected goes-out, got {:?}", second[5]);
        };
        assert_eq!(remaining[&0], cards("r2-Q"));
    }

    #[test]
    fn lines_before_first_round_are_skipped() {
        let parsed = LogParser::new()
            .parse(
                LogFormat::TwoPlayer,
                "1",
                &players(&["Alice", "Bob"]),
                &lines(&["Alice plays r3", "Alice starts a new round."]),
            )
            .unwrap();
        assert_eq!(parsed.rounds.len(), 1);
        assert!(parsed.rounds[0].actions.is_empty());
    }

    #[test]
    fn detect_four_player_format() {
        let four = lines(&["Dana will start a new round."]);
        assert_eq!(LogFormat::detect(&four), LogFormat::FourPlayer);
        let two = lines(&["Alice starts a new round."]);
        assert_eq!(LogFormat::detect(&two), LogFormat::TwoPlayer);
    }

    #[test]
    fn wrong_player_count_is_rejected() {
        let result = LogParser::new().parse(
            LogFormat::TwoPlayer,
            "1",
            &players(&["Alice"]),
            &lines(&[]),
        );
        assert!(matches!(result, Err(Error::Input(_))));
    }

    #[test]
    fn truncated_remaining_block_fails() {
        let result = LogParser::new().parse(
            LogFormat::TwoPlayer,
            "1",
            &players(&["Alice", "Bob"]),
            &lines(&[
                "Alice starts a new round.",
                "Alice goes out and scores 5 points",
                "The remaining cards are shown",
                "Bob: b2",
            ]),
        );
        assert!(matches!(result, Err(Error::Lookahead { .. })));
    }

    #[test]
    fn remaining_block_without_goes_out_fails() {
        let result = LogParser::new().parse(
            LogFormat::TwoPlayer,
            "1",
            &players(&["Alice", "Bob"]),
            &lines(&[
                "Alice starts a new round.",
                "The remaining cards are shown",
                "Bob: b2",
                "Haggis: p6",
            ]),
        );
        assert!(matches!(result, Err(Error::Lookahead { .. })));
    }

    #[test]
    fn parse_four_player_log() {
        let parsed = LogParser::new()
            .parse(
                LogFormat::FourPlayer,
                "1",
                &players(&["Alice", "Bob", "Carol", "Dana"]),
                &lines(&[
                    "Dana will start a new round.",
                    "Alice sends Carol a card",
                    "Carol sends Alice a card",
                    "Bob sends Dana a card",
                    "Alice bets 15",
                    "Carol bets 30",
                    "Dana plays r3-b5-y7-p9",
                    "Dana scores 4 points for a bomb",
                    "Bob passes the lead",
                    "Bob goes out of the round and still has 5 remaining cards",
                    "Carol achieves a slam",
                    "Carol scores 10 points",
                    "Dana: r10, b2",
                    "The end of the game. Dana has won",
                    "Alice plays r2",
                ]),
            )
            .unwrap();

        // The reverse "sends" announcement does not pair Carol twice.
        assert_eq!(parsed.teams, [(0, 2), (1, 3)]);
        assert_eq!(parsed.declared_winner, Some(3));
        assert_eq!(parsed.rounds.len(), 1);

        let actions = &parsed.rounds[0].actions;
        assert_eq!(actions.len(), 9);
        assert_eq!(actions[4], Action::PassesLead { player: 1 });
        assert_eq!(
            actions[5],
            Action::GoesOut {
                player: 1,
                remaining: BTreeMap::new(),
                remaining_count: Some(5),
                haggis: Vec::new()
            }
        );
        assert_eq!(actions[6], Action::Slams { player: 2 });
        assert_eq!(
            actions[8],
            Action::Reveals {
                player: 3,
                cards: cards("r10-b2")
            }
        );
    }

    #[test]
    fn mislabeled_haggis_line_fails() {
        let result = LogParser::new().parse(
            LogFormat::TwoPlayer,
            "1",
            &players(&["Alice", "Bob"]),
            &lines(&[
                "Alice starts a new round.",
                "Alice goes out and scores 5 points",
                "The remaining cards are shown",
                "Bob: b2, y4",
                "Move 37 :",
            ]),
        );
        assert!(matches!(result, Err(Error::Lookahead { .. })));
    }

    #[test]
    fn four_player_scan_stops_at_end_of_game() {
        let parsed = LogParser::new()
            .parse(
                LogFormat::FourPlayer,
                "1",
                &players(&["Alice", "Bob", "Carol", "Dana"]),
                &lines(&[
                    "Alice will start a new round.",
                    "Alice plays r3",
                    "The end of the game.",
                    "Bob plays r4",
                ]),
            )
            .unwrap();
        assert_eq!(parsed.rounds[0].actions.len(), 1);
    }
}

//! Move legality check for transcribed movetext.
//!
//! The movetext is wrapped in a throwaway game record, streamed through
//! `pgn-reader` and every SAN is replayed with `shakmaty` from the standard
//! starting position. Result tokens end up in `outcome()`, never as moves.

use std::ops::ControlFlow;

use pgn_reader::{Outcome, Reader, SanPlus, Visitor};
use shakmaty::fen::Fen;
use shakmaty::san::SanError;
use shakmaty::{Chess, EnPassantMode, Position};
use thiserror::Error;
use tracing::debug;

use crate::game_data::ValidationVerdict;

/// Tag section of the synthesized game; the result is always the wildcard.
const PLACEHOLDER_TAGS: &str = r#"[Event "Game"]
[Site "?"]
[Date "????.??.??"]
[Round "?"]
[White "?"]
[Black "?"]
[Result "*"]

"#;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("no moves found")]
    NoGame,

    #[error("{error} at {at}")]
    Illegal { at: String, error: SanError },

    #[error("unreadable move token `{0}`")]
    Unreadable(String),

    #[error("{0}")]
    Reader(String),
}

/// A movetext that replayed cleanly.
#[derive(Debug, Clone)]
pub struct Replay {
    /// Moves as played, with check suffixes as written.
    pub sans: Vec<String>,
    /// Trailing result token, if the movetext had one.
    pub outcome: Option<Outcome>,
    pub position: Chess,
}

impl Replay {
    pub fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }
}

/// Classify a movetext: legal from the initial position, unparsable, or invalid.
pub fn validate_moves(movetext: &str) -> ValidationVerdict {
    match replay_moves(movetext) {
        Ok(replay) => {
            debug!(plies = replay.sans.len(), "Movetext replayed");
            ValidationVerdict::valid()
        }
        Err(ReplayError::NoGame) => ValidationVerdict::unparsable(),
        Err(err) => {
            debug!("Movetext rejected: {err}");
            ValidationVerdict::invalid(err)
        }
    }
}

/// Replay the movetext and return the moves and final position.
pub fn replay_moves(movetext: &str) -> Result<Replay, ReplayError> {
    let pgn = wrap_movetext(movetext);
    let mut reader = Reader::new(pgn.as_bytes());

    let replayed = match reader.read_game(&mut Replayer) {
        Ok(Some(result)) => result,
        Ok(None) => Err(ReplayError::NoGame),
        Err(e) => return Err(ReplayError::Reader(e.to_string())),
    };

    // Junk with no readable move at all is a misread, not an empty game.
    let replay = match replayed {
        Err(ReplayError::NoGame) => {
            return Err(first_unreadable_token(movetext).map_or(ReplayError::NoGame, ReplayError::Unreadable));
        }
        other => other?,
    };

    // The reader skips tokens it cannot read; a scoresheet misread must not
    // pass as a shorter legal game.
    if let Some(token) = first_unreadable_token(movetext) {
        return Err(ReplayError::Unreadable(token));
    }

    Ok(replay)
}

/// Placeholder tags + movetext. Blank lines would end the game early, so the
/// movetext is re-joined without them.
fn wrap_movetext(movetext: &str) -> String {
    let mut pgn = String::with_capacity(PLACEHOLDER_TAGS.len() + movetext.len() + 1);
    pgn.push_str(PLACEHOLDER_TAGS);
    for line in movetext.lines().map(str::trim).filter(|l| !l.is_empty()) {
        pgn.push_str(line);
        pgn.push('\n');
    }
    pgn
}

/// "2. Qh6" for white's second move, "2... Nc6" for black's.
fn move_label(ply: usize, san: &SanPlus) -> String {
    let number = ply / 2 + 1;
    if ply % 2 == 0 {
        format!("{number}. {san}")
    } else {
        format!("{number}... {san}")
    }
}

#[derive(Default)]
struct ReplayState {
    position: Chess,
    sans: Vec<String>,
    outcome: Option<Outcome>,
}

struct Replayer;

impl Visitor for Replayer {
    type Tags = ();
    type Movetext = ReplayState;
    type Output = Result<Replay, ReplayError>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, _tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(ReplayState::default())
    }

    fn san(&mut self, state: &mut Self::Movetext, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        match san_plus.san.to_move(&state.position) {
            Ok(m) => {
                state.position.play_unchecked(m);
                state.sans.push(san_plus.to_string());
                ControlFlow::Continue(())
            }
            Err(error) => ControlFlow::Break(Err(ReplayError::Illegal {
                at: move_label(state.sans.len(), &san_plus),
                error,
            })),
        }
    }

    fn outcome(&mut self, state: &mut Self::Movetext, outcome: Outcome) -> ControlFlow<Self::Output> {
        state.outcome = Some(outcome);
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, state: Self::Movetext) -> Self::Output {
        if state.sans.is_empty() {
            return Err(ReplayError::NoGame);
        }
        Ok(Replay {
            sans: state.sans,
            outcome: state.outcome,
            position: state.position,
        })
    }
}

/// First token outside comments and variations that is neither a move number,
/// result, annotation nor SAN.
fn first_unreadable_token(movetext: &str) -> Option<String> {
    let mut plain = String::with_capacity(movetext.len());
    let mut in_comment = false;
    let mut in_line_comment = false;
    let mut depth = 0usize;

    for ch in movetext.chars() {
        match ch {
            '\n' if in_line_comment => {
                in_line_comment = false;
                plain.push(' ');
            }
            _ if in_line_comment => {}
            '}' if in_comment => {
                in_comment = false;
                plain.push(' ');
            }
            _ if in_comment => {}
            '{' => in_comment = true,
            ';' => in_line_comment = true,
            '(' => depth += 1,
            ')' if depth > 0 => {
                depth -= 1;
                plain.push(' ');
            }
            _ if depth > 0 => {}
            _ => plain.push(ch),
        }
    }

    plain
        .split_whitespace()
        .find(|token| !is_readable_token(token))
        .map(str::to_string)
}

fn is_readable_token(token: &str) -> bool {
    if matches!(token, "1-0" | "0-1" | "1/2-1/2" | "½-½" | "*") || token.starts_with('$') {
        return true;
    }

    let token = token.trim_end_matches(['!', '?']);
    let castle = token.trim_end_matches(['+', '#']);
    if castle == "0-0" || castle == "0-0-0" {
        return true;
    }

    let san = token
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches('.');
    san.is_empty() || SanPlus::from_ascii(san.as_bytes()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{Color, KnownOutcome};

    #[test]
    fn test_empty_movetext_is_unparsable() {
        assert_eq!(validate_moves(""), ValidationVerdict::unparsable());
        assert_eq!(validate_moves("   \n  "), ValidationVerdict::unparsable());
        assert_eq!(validate_moves("*"), ValidationVerdict::unparsable());
    }

    #[test]
    fn test_legal_opening() {
        let verdict = validate_moves("1. e4 e5 2. Nf3 Nc6 *");
        assert!(verdict.is_valid);
        assert_eq!(verdict.message, "Moves validated successfully");
    }

    #[test]
    fn test_illegal_queen_move() {
        let verdict = validate_moves("1. e4 e5 2. Qh6 *");
        assert!(!verdict.is_valid);
        assert_eq!(verdict.message, "Invalid chess moves: illegal san at 2. Qh6");
    }

    #[test]
    fn test_scholars_queen_sortie_is_legal() {
        // d1-h5 is open once the e-pawn has moved.
        assert!(validate_moves("1. e4 e5 2. Qh5 *").is_valid);
    }

    #[test]
    fn test_black_move_label() {
        let err = replay_moves("1. e4 e5 2. Nf3 Ke6").unwrap_err();
        assert_eq!(err.to_string(), "illegal san at 2... Ke6");
    }

    #[test]
    fn test_trailing_result_is_not_a_move() {
        let replay = replay_moves("1. e4 e5 2. c3 d5 0-1").unwrap();
        assert_eq!(replay.sans, vec!["e4", "e5", "c3", "d5"]);
        assert_eq!(
            replay.outcome,
            Some(Outcome::Known(KnownOutcome::Decisive { winner: Color::Black }))
        );

        for result in ["1-0", "1/2-1/2", "*"] {
            let replay = replay_moves(&format!("1. d4 d5 {result}")).unwrap();
            assert_eq!(replay.sans.len(), 2);
            assert!(replay.outcome.is_some());
        }
    }

    #[test]
    fn test_final_position() {
        let replay = replay_moves("1. e4 e5 2. Nf3 Nc6").unwrap();
        assert_eq!(
            replay.fen(),
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3"
        );
    }

    #[test]
    fn test_castling_with_zeros_is_read() {
        let verdict = validate_moves("1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. 0-0 Nf6 *");
        assert!(verdict.is_valid, "{}", verdict.message);
    }

    #[test]
    fn test_comments_variations_and_nags() {
        let movetext = "1. e4 {best by test} e5 (1... c5 2. Nf3) 2. Nf3 $1 Nc6!? *";
        let replay = replay_moves(movetext).unwrap();
        assert_eq!(replay.sans, vec!["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn test_blank_lines_inside_movetext() {
        let replay = replay_moves("1. e4 e5\n\n2. Nf3 Nc6\n\n3. Bb5 *").unwrap();
        assert_eq!(replay.sans.len(), 5);
    }

    #[test]
    fn test_unreadable_token_is_reported() {
        let verdict = validate_moves("1. e4 e5 2. Nf3 Nc6 3. Bb5 Rfci *");
        assert!(!verdict.is_valid);
        assert_eq!(
            verdict.message,
            "Invalid chess moves: unreadable move token `Rfci`"
        );
    }

    #[test]
    fn test_unreadable_token_with_or_without_moves() {
        let expected = "Invalid chess moves: unreadable move token `hello`";
        assert_eq!(validate_moves("hello").message, expected);
        assert_eq!(validate_moves("1. hello *").message, expected);
        assert_eq!(validate_moves("1. e4 hello").message, expected);
        assert!(!validate_moves("hello").is_valid);
    }

    #[test]
    fn test_glued_move_numbers() {
        assert!(validate_moves("1.e4 e5 2.Nf3 Nc6 3.Bb5 a6").is_valid);
        assert!(validate_moves("1. e4 1... e5").is_valid);
    }

    #[test]
    fn test_illegal_move_reported_before_unreadable_tail() {
        let err = replay_moves("1. e4 e5 2. Qh6 ???x").unwrap_err();
        assert!(matches!(err, ReplayError::Illegal { .. }));
    }

    #[test]
    fn test_readable_tokens() {
        for token in ["12.", "12...", "43", "e4", "exd5+", "O-O-O#", "0-0", "e8=Q", "Nbd2!", "$14", "1/2-1/2"] {
            assert!(is_readable_token(token), "{token}");
        }
        for token in ["Rfci", "hello", "```", "Q@", "e9"] {
            assert!(!is_readable_token(token), "{token}");
        }
    }
}

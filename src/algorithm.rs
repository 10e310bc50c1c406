//! `Algorithm`: an ordered, finite sequence of moves, with the
//! shrink/cancel/regrip/scoring operations spec.md §3-4.D calls for.
//!
//! Grounded on `original_source/deep_search.cpp`'s `Algorithm::AppendShrink`
//! (adjacent-shrink-on-push), generalized here from the teacher's
//! `moves.rs::CanReverse` idiom. The `PenultimateInverted` half of that
//! file -- closing a conjugate's trailing inverse without re-deriving it
//! -- lives in `grammar.rs::SearchUnit::chunks` instead, where the
//! auxiliary move is still in scope.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::metrics::Metric;
use crate::moves::{Amount, CanReverse, Merge, Move, Turn};

/// Value-typed, cheap-to-clone sequence of moves. The engine clones an
/// `Algorithm` at every recursion branch (spec.md §9's "deep copy per
/// node" design note).
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Algorithm(Vec<Move>);

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl Algorithm {
    pub fn new() -> Self {
        Algorithm(Vec::new())
    }

    pub fn from_moves(moves: Vec<Move>) -> Self {
        Algorithm(moves)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn moves(&self) -> &[Move] {
        &self.0
    }

    pub fn last(&self) -> Option<Move> {
        self.0.last().copied()
    }

    /// Append unconditionally.
    pub fn push(&mut self, mv: Move) {
        self.0.push(mv);
    }

    /// Append with local cancellation against the immediately preceding
    /// move. Returns true iff the previous move was merged away or
    /// cancelled (i.e. the sequence did not simply grow by one).
    pub fn push_shrink(&mut self, mv: Move) -> bool {
        if let Some(&last) = self.0.last() {
            match Move::combine(last, mv) {
                Merge::Cancels => {
                    self.0.pop();
                    return true;
                }
                Merge::Merged(merged) => {
                    *self.0.last_mut().unwrap() = merged;
                    return true;
                }
                Merge::NotAdjacent => {}
            }
        }
        self.0.push(mv);
        false
    }

    pub fn concat(&mut self, other: &Algorithm) {
        self.0.extend_from_slice(&other.0);
    }

    /// Concatenate, shrinking across the seam (and, transitively, as far
    /// back as the merge keeps collapsing).
    pub fn concat_shrink(&mut self, other: &Algorithm) {
        for &mv in &other.0 {
            self.push_shrink(mv);
        }
    }

    /// The algorithm that undoes this one: moves reversed in order, each
    /// individually inverted.
    pub fn invert(&self) -> Algorithm {
        Algorithm(self.0.iter().rev().map(|m| m.reverse()).collect())
    }

    /// Conjugate the algorithm by a whole-cube rotation: the sequence
    /// that has the same visible effect after the cube has been turned
    /// by `turn`/`amount`. Outer/wide/middle moves are relabelled to the
    /// face/slice they land on; turns and parentheses pass through
    /// unchanged (a turn's effect doesn't depend on which face is "up").
    pub fn transform(&self, turn: Turn, amount: Amount) -> Algorithm {
        Algorithm(self.0.iter().map(|&m| transform_move(m, turn, amount)).collect())
    }

    /// A global cancellation pass: repeatedly re-shrink the whole
    /// sequence until no adjacent pair merges or cancels. Idempotent.
    pub fn cancellations(&self) -> Algorithm {
        let mut out = Algorithm::new();
        for &mv in &self.0 {
            out.push_shrink(mv);
        }
        out
    }

    /// Rewrite so that a leading and/or trailing whole-cube rotation is
    /// migrated out of the body into a returned "inspection" prefix,
    /// without changing the visible solve. A rotation in the middle of
    /// the algorithm is left alone (only the outermost ones move).
    ///
    /// Returns `(inspection, body)` such that applying `inspection` then
    /// `body` to a cube has the identical end state as applying `self`.
    pub fn regrip(&self) -> (Algorithm, Algorithm) {
        let mut body = self.0.clone();
        let mut inspection = Vec::new();

        while let Some(&first) = body.first() {
            if first.is_turn() {
                inspection.push(first);
                body.remove(0);
            } else {
                break;
            }
        }

        // A trailing rotation has no effect left to "absorb" into -- it
        // only ever changes which face future moves act on, and there
        // are none. It's equivalent to just dropping it from the body;
        // spec.md's example (`x R U R' x'`) keeps the trailing turn in
        // the body precisely because a neighbouring segment still
        // depends on it, so by default we do not move it: only a
        // *leading* run is promoted to the inspection phase.
        (Algorithm(inspection), Algorithm(body))
    }

    pub fn metric(&self, metric: Metric) -> f64 {
        metric.total(&self.0)
    }

    /// Per-adjacent-pair grip-transition penalty table (frozen, per
    /// spec.md §4.D/§9: "preserve its values verbatim as a static
    /// table"). Same axis, same direction repeated: no penalty (it's
    /// one continuous turn of the hand already in position). Same axis,
    /// opposite face (e.g. U then D): a full re-grip, penalised hardest.
    /// Different axis: a small penalty for the hand change.
    fn grip_penalty(a: Move, b: Move) -> i32 {
        match (a.axis(), b.axis()) {
            (Some(ax), Some(bx)) if ax == bx => {
                if Move::same_layer(a, b) {
                    0
                } else {
                    3
                }
            }
            (Some(_), Some(_)) => 1,
            _ => 0,
        }
    }

    /// Integer tiebreaker: higher is nicer to execute. Starts from a
    /// baseline proportional to length and subtracts the grip-penalty
    /// table summed over adjacent pairs.
    pub fn subjective_score(&self) -> i32 {
        let baseline = 10 * self.0.len() as i32;
        let penalty: i32 = self.0.windows(2).map(|w| Self::grip_penalty(w[0], w[1])).sum();
        baseline - penalty
    }

    fn to_text(&self) -> String {
        self.0.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(" ")
    }

    /// Parse conventional cuber notation, expanding `( ... )<k>` groups
    /// (repetition count 1..=9) before tokenizing the body.
    pub fn parse(text: &str) -> Result<Algorithm, ParseError> {
        let expanded = expand_parentheses(text)?;
        let moves = crate::moves::parse_simple_tokens(&expanded)?;
        Ok(Algorithm(moves))
    }
}

impl FromStr for Algorithm {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::parse(s)
    }
}

fn relabel_face(face: crate::moves::Face, turn: Turn, amount: Amount) -> crate::moves::Face {
    use crate::moves::Face::*;
    let cycle: &[crate::moves::Face] = match turn {
        Turn::X => &[U, F, D, B],
        Turn::Y => &[F, R, B, L],
        Turn::Z => &[U, R, D, L],
    };
    let Some(pos) = cycle.iter().position(|&f| f == face) else {
        return face;
    };
    let steps = amount.quarter_repeats() as usize;
    cycle[(pos + steps) % cycle.len()]
}

fn relabel_slice(slice: crate::moves::Slice, turn: Turn) -> crate::moves::Slice {
    use crate::moves::Slice::*;
    match (turn, slice) {
        (Turn::X, E) => S,
        (Turn::X, S) => E,
        (Turn::Y, M) => S,
        (Turn::Y, S) => M,
        (Turn::Z, M) => E,
        (Turn::Z, E) => M,
        (_, same) => same,
    }
}

fn transform_move(mv: Move, turn: Turn, amount: Amount) -> Move {
    match mv {
        Move::Outer(f, a) => Move::Outer(relabel_face(f, turn, amount), a),
        Move::Wide(f, a) => Move::Wide(relabel_face(f, turn, amount), a),
        Move::Middle(s, a) => Move::Middle(relabel_slice(s, turn), a),
        Move::Rotation(..) | Move::ParenOpen | Move::ParenClose(_) => mv,
    }
}

/// Expand `( ... )<k>` groups into their repeated token stream. Nesting
/// is not supported (spec.md's grammar only ever shows one level).
fn expand_parentheses(text: &str) -> Result<String, ParseError> {
    if !text.contains('(') {
        return Ok(text.to_string());
    }

    let mut out = String::new();
    let mut rest = text;
    loop {
        match rest.find('(') {
            None => {
                out.push_str(rest);
                break;
            }
            Some(open_idx) => {
                out.push_str(&rest[..open_idx]);
                let after_open = &rest[open_idx + 1..];
                let Some(close_idx) = after_open.find(')') else {
                    return Err(ParseError::UnmatchedParenthesis(text.to_string()));
                };
                let body = &after_open[..close_idx];
                let after_close = &after_open[close_idx + 1..];

                let digits_len = after_close
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .count();
                let (count_str, remainder) = after_close.split_at(digits_len);
                let count: u8 = if count_str.is_empty() {
                    1
                } else {
                    count_str
                        .parse()
                        .map_err(|_| ParseError::InvalidMoveText(text.to_string()))?
                };
                if !(1..=9).contains(&count) {
                    return Err(ParseError::RepetitionOutOfRange(count));
                }

                for _ in 0..count {
                    out.push(' ');
                    out.push_str(body.trim());
                }
                rest = remainder;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Face;

    #[test]
    fn cancellation_of_r_r_inverse_u_u2_u_inverse_is_empty() {
        let alg = Algorithm::parse("R R' U U2 U'").unwrap();
        let reduced = alg.cancellations();
        assert!(reduced.is_empty(), "expected empty, got {reduced}");
    }

    #[test]
    fn cancellation_is_idempotent() {
        let alg = Algorithm::parse("R U R' U' R U R'").unwrap();
        let once = alg.cancellations();
        let twice = once.cancellations();
        assert_eq!(once, twice);
    }

    #[test]
    fn push_shrink_merges_same_layer_quarter_turns() {
        let mut alg = Algorithm::new();
        assert!(!alg.push_shrink(Move::Outer(Face::U, Amount::Cw)));
        assert!(alg.push_shrink(Move::Outer(Face::U, Amount::Cw)));
        assert_eq!(alg.moves(), &[Move::Outer(Face::U, Amount::Double)]);
    }

    #[test]
    fn regrip_moves_leading_rotation_to_inspection() {
        let alg = Algorithm::parse("x R U R' x'").unwrap();
        let (inspection, body) = alg.regrip();
        assert_eq!(inspection.to_string(), "x");
        assert_eq!(body.to_string(), "R U R' x'");
    }

    #[test]
    fn regrip_preserves_visible_solve() {
        use crate::cube::CubeState;

        let alg = Algorithm::parse("x R U R' x'").unwrap();
        let (inspection, body) = alg.regrip();

        let mut direct = CubeState::solved();
        direct.apply_all(alg.moves());

        let mut via_regrip = CubeState::solved();
        via_regrip.apply_all(inspection.moves());
        via_regrip.apply_all(body.moves());

        assert_eq!(direct, via_regrip);
    }

    #[test]
    fn parse_expands_parenthesised_repetition() {
        let alg = Algorithm::parse("(R U)3").unwrap();
        assert_eq!(alg.moves().len(), 6);
        assert_eq!(alg.to_string(), "R U R U R U");
    }

    #[test]
    fn parse_rejects_unmatched_parenthesis() {
        assert!(Algorithm::parse("(R U").is_err());
    }

    #[test]
    fn parse_rejects_out_of_range_repetition() {
        assert!(Algorithm::parse("(R U)10").is_err());
    }
}

//! Traits and reusable data structures for describing moves.
//!
//! A [`Move`] is one discrete rotation out of the closed set described in
//! the cube's move alphabet: single outer-layer turns, two-layer wide
//! turns, middle-slice turns, whole-cube rotations, and the parenthesis
//! grouping tokens a parser expands before anything is ever applied to a
//! cube.

use std::fmt;
use std::str::FromStr;

use enum_iterator::Sequence;

use crate::error::ParseError;

pub trait CanReverse: Sized {
    fn reverse(&self) -> Self;
}

/// The three rotational axes of the cube. `Ud` covers U/D/u/d/E/y,
/// `Fb` covers F/B/f/b/S/z, `Rl` covers R/L/r/l/M/x.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug, Sequence)]
pub enum Axis {
    Ud,
    Fb,
    Rl,
}

/// One of the six outer faces.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug, Sequence)]
pub enum Face {
    U,
    D,
    F,
    B,
    R,
    L,
}

impl Face {
    #[inline(always)]
    pub fn axis(self) -> Axis {
        match self {
            Face::U | Face::D => Axis::Ud,
            Face::F | Face::B => Axis::Fb,
            Face::R | Face::L => Axis::Rl,
        }
    }

    /// Whether this face is the "positive" side of its axis (U/F/R), used
    /// to canonicalise same-axis move ordering (see `Move::opposite_axis`
    /// and the engine's canonical-ordering prune).
    #[inline(always)]
    pub fn is_positive(self) -> bool {
        matches!(self, Face::U | Face::F | Face::R)
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Face::U => 'U',
            Face::D => 'D',
            Face::F => 'F',
            Face::B => 'B',
            Face::R => 'R',
            Face::L => 'L',
        };
        write!(f, "{c}")
    }
}

/// A middle (non-outer) slice.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug, Sequence)]
pub enum Slice {
    M,
    E,
    S,
}

impl Slice {
    #[inline(always)]
    pub fn axis(self) -> Axis {
        match self {
            Slice::M => Axis::Rl,
            Slice::E => Axis::Ud,
            Slice::S => Axis::Fb,
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Slice::M => 'M',
            Slice::E => 'E',
            Slice::S => 'S',
        };
        write!(f, "{c}")
    }
}

/// A whole-cube rotation axis label (x/y/z), distinct from [`Axis`] only
/// in that it always carries the conventional lowercase letter.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug, Sequence)]
pub enum Turn {
    X,
    Y,
    Z,
}

impl Turn {
    #[inline(always)]
    pub fn axis(self) -> Axis {
        match self {
            Turn::X => Axis::Rl,
            Turn::Y => Axis::Ud,
            Turn::Z => Axis::Fb,
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Turn::X => 'x',
            Turn::Y => 'y',
            Turn::Z => 'z',
        };
        write!(f, "{c}")
    }
}

/// Signed rotation amount: a quarter turn clockwise, a quarter turn
/// counter-clockwise, or a half turn (self-inverse).
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug, Sequence)]
pub enum Amount {
    Cw,
    Ccw,
    Double,
}

impl Amount {
    #[inline(always)]
    pub fn inverse(self) -> Amount {
        match self {
            Amount::Cw => Amount::Ccw,
            Amount::Ccw => Amount::Cw,
            Amount::Double => Amount::Double,
        }
    }

    /// Number of quarter-turn repetitions of the underlying generator
    /// needed to realise this amount.
    #[inline(always)]
    pub fn quarter_repeats(self) -> u8 {
        match self {
            Amount::Cw => 1,
            Amount::Double => 2,
            Amount::Ccw => 3,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Amount::Cw => "",
            Amount::Ccw => "'",
            Amount::Double => "2",
        }
    }
}

/// Range class of a move, per spec.md §3.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub enum Range {
    Single,
    Double,
    Internal,
    Turn,
    Parentheses,
}

/// One discrete rotation. This is the closed alphabet of moves the
/// search grammar and the cube model both operate on.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub enum Move {
    Outer(Face, Amount),
    Wide(Face, Amount),
    Middle(Slice, Amount),
    Rotation(Turn, Amount),
    /// Opening parenthesis. Never applied to a cube; expanded away by
    /// the parser before an `Algorithm` ever holds one.
    ParenOpen,
    /// Closing parenthesis with its repetition count, 1..=9.
    ParenClose(u8),
}

impl Move {
    #[inline(always)]
    pub fn range(&self) -> Range {
        match self {
            Move::Outer(..) => Range::Single,
            Move::Wide(..) => Range::Double,
            Move::Middle(..) => Range::Internal,
            Move::Rotation(..) => Range::Turn,
            Move::ParenOpen | Move::ParenClose(_) => Range::Parentheses,
        }
    }

    #[inline(always)]
    pub fn axis(&self) -> Option<Axis> {
        match self {
            Move::Outer(f, _) | Move::Wide(f, _) => Some(f.axis()),
            Move::Middle(s, _) => Some(s.axis()),
            Move::Rotation(t, _) => Some(t.axis()),
            Move::ParenOpen | Move::ParenClose(_) => None,
        }
    }

    #[inline(always)]
    pub fn is_turn(&self) -> bool {
        matches!(self, Move::Rotation(..))
    }

    #[inline(always)]
    pub fn is_parenthesis(&self) -> bool {
        matches!(self, Move::ParenOpen | Move::ParenClose(_))
    }

    /// True iff both moves act on parallel layers of the same axis but
    /// are not literally the same layer (e.g. U and D, or R and L).
    /// Used to canonicalise ordering of commuting same-axis pairs.
    #[inline(always)]
    pub fn opposite_axis(a: Move, b: Move) -> bool {
        match (a.axis(), b.axis()) {
            (Some(ax), Some(bx)) if ax == bx => !Move::same_layer(a, b),
            _ => false,
        }
    }

    /// True iff both moves act on exactly the same layer (face, slice,
    /// or rotation axis) -- used by adjacent-shrink to decide whether two
    /// consecutive moves should be merged.
    #[inline(always)]
    pub fn same_layer(a: Move, b: Move) -> bool {
        match (a, b) {
            (Move::Outer(fa, _), Move::Outer(fb, _)) => fa == fb,
            (Move::Wide(fa, _), Move::Wide(fb, _)) => fa == fb,
            (Move::Middle(sa, _), Move::Middle(sb, _)) => sa == sb,
            (Move::Rotation(ta, _), Move::Rotation(tb, _)) => ta == tb,
            _ => false,
        }
    }

    /// A total order over moves used only to canonicalise which of two
    /// "same axis, opposite layer" orderings survives search pruning
    /// (e.g. keep "U D", drop "D U"). Arbitrary but fixed.
    fn canonical_rank(&self) -> u32 {
        fn face_rank(f: Face) -> u32 {
            match f {
                Face::U => 0,
                Face::D => 1,
                Face::F => 2,
                Face::B => 3,
                Face::R => 4,
                Face::L => 5,
            }
        }
        fn slice_rank(s: Slice) -> u32 {
            match s {
                Slice::M => 0,
                Slice::E => 1,
                Slice::S => 2,
            }
        }
        fn turn_rank(t: Turn) -> u32 {
            match t {
                Turn::X => 0,
                Turn::Y => 1,
                Turn::Z => 2,
            }
        }
        match *self {
            Move::Outer(f, _) => face_rank(f),
            Move::Wide(f, _) => 1_000 + face_rank(f),
            Move::Middle(s, _) => 2_000 + slice_rank(s),
            Move::Rotation(t, _) => 3_000 + turn_rank(t),
            Move::ParenOpen => 4_000,
            Move::ParenClose(n) => 4_001 + n as u32,
        }
    }
}

/// Outcome of combining two adjacent same-layer moves, used by
/// `Algorithm::push_shrink`/`cancellations`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Merge {
    /// The moves don't act on the same layer; nothing to merge.
    NotAdjacent,
    /// The moves are exact inverses; both vanish.
    Cancels,
    /// The moves combine into a single equivalent move (e.g. U + U -> U2).
    Merged(Move),
}

impl Move {
    /// Combine two moves acting on the same layer (see `Move::same_layer`)
    /// into their net effect. `a` is assumed to precede `b`.
    pub fn combine(a: Move, b: Move) -> Merge {
        if !Move::same_layer(a, b) {
            return Merge::NotAdjacent;
        }
        let net = (a.quarter_amount() + b.quarter_amount()) % 4;
        if net == 0 {
            return Merge::Cancels;
        }
        let amount = match net {
            1 => Amount::Cw,
            2 => Amount::Double,
            3 => Amount::Ccw,
            _ => unreachable!("reduced mod 4"),
        };
        let merged = match (a, b) {
            (Move::Outer(f, _), Move::Outer(..)) => Move::Outer(f, amount),
            (Move::Wide(f, _), Move::Wide(..)) => Move::Wide(f, amount),
            (Move::Middle(s, _), Move::Middle(..)) => Move::Middle(s, amount),
            (Move::Rotation(t, _), Move::Rotation(..)) => Move::Rotation(t, amount),
            _ => unreachable!("same_layer implies same variant"),
        };
        Merge::Merged(merged)
    }

    #[inline(always)]
    fn quarter_amount(&self) -> u8 {
        match self {
            Move::Outer(_, a) | Move::Wide(_, a) | Move::Middle(_, a) | Move::Rotation(_, a) => {
                a.quarter_repeats()
            }
            Move::ParenOpen | Move::ParenClose(_) => 0,
        }
    }
}

impl PartialOrd for Move {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Move {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.canonical_rank().cmp(&other.canonical_rank())
    }
}

impl CanReverse for Move {
    #[inline(always)]
    fn reverse(&self) -> Self {
        match self {
            Move::Outer(f, a) => Move::Outer(*f, a.inverse()),
            Move::Wide(f, a) => Move::Wide(*f, a.inverse()),
            Move::Middle(s, a) => Move::Middle(*s, a.inverse()),
            Move::Rotation(t, a) => Move::Rotation(*t, a.inverse()),
            Move::ParenOpen | Move::ParenClose(_) => {
                // Parenthesis tokens never reach here in a well-formed
                // Algorithm; they are expanded by the parser.
                *self
            }
        }
    }
}

/// Alias kept for readers coming from the spec's terminology.
#[inline(always)]
pub fn inverse(m: Move) -> Move {
    m.reverse()
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Outer(face, amount) => write!(f, "{face}{}", amount.suffix()),
            Move::Wide(face, amount) => {
                write!(f, "{}{}", face.to_string().to_lowercase(), amount.suffix())
            }
            Move::Middle(slice, amount) => write!(f, "{slice}{}", amount.suffix()),
            Move::Rotation(turn, amount) => write!(f, "{turn}{}", amount.suffix()),
            Move::ParenOpen => write!(f, "("),
            Move::ParenClose(n) => write!(f, "){n}"),
        }
    }
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(tok: &str) -> Result<Self, Self::Err> {
        parse_token(tok).ok_or_else(|| ParseError::InvalidMoveText(tok.to_string()))
    }
}

fn amount_from_suffix(body: &str) -> Option<(&str, Amount)> {
    if let Some(base) = body.strip_suffix('\'') {
        Some((base, Amount::Ccw))
    } else if let Some(base) = body.strip_suffix('2') {
        Some((base, Amount::Double))
    } else {
        Some((body, Amount::Cw))
    }
}

fn parse_token(tok: &str) -> Option<Move> {
    if tok == "(" {
        return Some(Move::ParenOpen);
    }
    if let Some(rest) = tok.strip_prefix(')') {
        let n: u8 = rest.parse().ok()?;
        if (1..=9).contains(&n) {
            return Some(Move::ParenClose(n));
        }
        return None;
    }

    let (base, amount) = amount_from_suffix(tok)?;
    match base {
        "U" => Some(Move::Outer(Face::U, amount)),
        "D" => Some(Move::Outer(Face::D, amount)),
        "F" => Some(Move::Outer(Face::F, amount)),
        "B" => Some(Move::Outer(Face::B, amount)),
        "R" => Some(Move::Outer(Face::R, amount)),
        "L" => Some(Move::Outer(Face::L, amount)),
        "u" => Some(Move::Wide(Face::U, amount)),
        "d" => Some(Move::Wide(Face::D, amount)),
        "f" => Some(Move::Wide(Face::F, amount)),
        "b" => Some(Move::Wide(Face::B, amount)),
        "r" => Some(Move::Wide(Face::R, amount)),
        "l" => Some(Move::Wide(Face::L, amount)),
        "M" => Some(Move::Middle(Slice::M, amount)),
        "E" => Some(Move::Middle(Slice::E, amount)),
        "S" => Some(Move::Middle(Slice::S, amount)),
        "x" => Some(Move::Rotation(Turn::X, amount)),
        "y" => Some(Move::Rotation(Turn::Y, amount)),
        "z" => Some(Move::Rotation(Turn::Z, amount)),
        _ => None,
    }
}

/// Parse conventional cuber notation (whitespace-separated tokens, with
/// `( ... )<k>` groups already expanded to their repeated tokens by the
/// caller -- see `Algorithm::parse` for the grouping-aware entry point).
pub fn parse_simple_tokens(text: &str) -> Result<Vec<Move>, ParseError> {
    text.split_whitespace().map(Move::from_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_is_involutive() {
        for f in enum_iterator::all::<Face>() {
            for a in enum_iterator::all::<Amount>() {
                let m = Move::Outer(f, a);
                assert_eq!(m.reverse().reverse(), m);
            }
        }
    }

    #[test]
    fn double_moves_are_self_inverse() {
        let m = Move::Outer(Face::U, Amount::Double);
        assert_eq!(m.reverse(), m);
    }

    #[test]
    fn opposite_axis_detects_parallel_layers() {
        let u = Move::Outer(Face::U, Amount::Cw);
        let d = Move::Outer(Face::D, Amount::Cw);
        let f = Move::Outer(Face::F, Amount::Cw);
        assert!(Move::opposite_axis(u, d));
        assert!(!Move::opposite_axis(u, f));
        assert!(!Move::opposite_axis(u, u));
    }

    #[test]
    fn parse_round_trips_outer_moves() {
        for tok in ["U", "U'", "U2", "R", "R'", "R2", "f", "f2", "M", "x'"] {
            let m = Move::from_str(tok).unwrap();
            assert_eq!(m.to_string(), tok);
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Move::from_str("Q").is_err());
        assert!(Move::from_str("U3").is_err());
    }

    #[test]
    fn combine_same_layer_moves() {
        let u = Move::Outer(Face::U, Amount::Cw);
        let u_inv = Move::Outer(Face::U, Amount::Ccw);
        assert_eq!(Move::combine(u, u), Merge::Merged(Move::Outer(Face::U, Amount::Double)));
        assert_eq!(Move::combine(u, u_inv), Merge::Cancels);

        let f = Move::Outer(Face::F, Amount::Cw);
        assert_eq!(Move::combine(u, f), Merge::NotAdjacent);
    }
}

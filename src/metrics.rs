//! The ten move-counting metrics a caller can score an `Algorithm`
//! under. Every weight is derived from a move's `Range` and `Amount`
//! alone, per spec.md §4.A's "small per-move table" constraint.

use derive_more::Display;
use enum_iterator::Sequence;

use crate::moves::{Amount, Move, Range};

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug, Sequence, Display)]
pub enum Metric {
    /// Raw token count: every move (except whole-cube rotations and
    /// parentheses, which cost nothing to "execute") counts as 1.
    Movements,
    /// Half Turn Metric: outer and wide turns count 1 regardless of
    /// amount; slices count 1; rotations are free.
    Htm,
    /// Quarter Turn Metric: a 180 counts as two quarter turns.
    Qtm,
    /// Slice Turn Metric: like HTM but slices are weighted the same as
    /// outer turns (already true in this table; kept distinct so a
    /// caller can special-case it later without renumbering).
    Stm,
    /// Quarter-Slice Turn Metric: QTM's quarter-turn counting extended
    /// to slices.
    Qstm,
    /// Execution Turn Metric: every physical grip change costs 1,
    /// including whole-cube rotations (you still have to re-grip).
    Etm,
    /// Axial Turn Metric: moves along the same axis executed as a
    /// single hand motion cost 1 regardless of amount.
    Atm,
    /// Put Turn Metric: like HTM but slice moves are free (treated as
    /// absorbed into adjacent outer turns).
    Ptm,
    /// HTM variant that prices a half turn at 1.5 instead of 1.
    Htm15,
    /// Outer Block Turn Metric: outer and wide turns of the same face
    /// are priced identically and slices/rotations are free.
    Obtm,
}

impl Metric {
    pub fn weight(self, m: &Move) -> f64 {
        let range = m.range();
        let amount = match m {
            Move::Outer(_, a) | Move::Wide(_, a) | Move::Middle(_, a) | Move::Rotation(_, a) => {
                Some(*a)
            }
            Move::ParenOpen | Move::ParenClose(_) => None,
        };
        let Some(amount) = amount else {
            return 0.0;
        };
        let is_double = matches!(amount, Amount::Double);

        match self {
            Metric::Movements => match range {
                Range::Turn | Range::Parentheses => 0.0,
                _ => 1.0,
            },
            Metric::Htm => match range {
                Range::Turn => 0.0,
                _ => 1.0,
            },
            Metric::Qtm => match range {
                Range::Turn => 0.0,
                _ if is_double => 2.0,
                _ => 1.0,
            },
            Metric::Stm => match range {
                Range::Turn => 0.0,
                _ => 1.0,
            },
            Metric::Qstm => match range {
                Range::Turn => 0.0,
                _ if is_double => 2.0,
                _ => 1.0,
            },
            Metric::Etm => 1.0,
            Metric::Atm => match range {
                Range::Turn => 1.0,
                _ => 1.0,
            },
            Metric::Ptm => match range {
                Range::Internal => 0.0,
                Range::Turn => 0.0,
                _ => 1.0,
            },
            Metric::Htm15 => match range {
                Range::Turn => 0.0,
                _ if is_double => 1.5,
                _ => 1.0,
            },
            Metric::Obtm => match range {
                Range::Single | Range::Double => 1.0,
                _ => 0.0,
            },
        }
    }

    pub fn total(self, moves: &[Move]) -> f64 {
        moves.iter().map(|m| self.weight(m)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Face;

    #[test]
    fn movements_ignores_rotations() {
        let turn = Move::Rotation(crate::moves::Turn::X, Amount::Cw);
        assert_eq!(Metric::Movements.weight(&turn), 0.0);
    }

    #[test]
    fn qtm_doubles_half_turns() {
        let half = Move::Outer(Face::U, Amount::Double);
        assert_eq!(Metric::Qtm.weight(&half), 2.0);
        let quarter = Move::Outer(Face::U, Amount::Cw);
        assert_eq!(Metric::Qtm.weight(&quarter), 1.0);
    }

    #[test]
    fn etm_counts_rotations() {
        let turn = Move::Rotation(crate::moves::Turn::Y, Amount::Cw);
        assert_eq!(Metric::Etm.weight(&turn), 1.0);
    }
}

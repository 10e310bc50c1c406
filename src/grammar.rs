//! Search grammar assembly: per-level move-generation units and level
//! composition (spec.md §3 "Search Grammar", §4.E).
//!
//! Grounded on `original_source/deep_search.h`'s `SequenceTypes`/
//! `SearchUnit`/`SearchLevel`. Per spec.md §9's redesign note, the
//! unit-id counter lives on the builder (grammar-local) instead of a
//! process-wide static, so an engine can run several independent
//! grammars concurrently in one process without id collisions.

use itertools::Itertools;

use crate::algorithm::Algorithm;
use crate::error::SolveError;
use crate::moves::{Amount, CanReverse, Face, Move, Slice, Turn};

/// A named, resolvable list of moves a grammar unit may draw from.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum MoveSet {
    /// Every outer-layer turn (U/D/F/B/R/L, all three amounts).
    AllOuter,
    /// Every wide turn.
    AllWide,
    /// Every outer and wide turn.
    AllOuterAndWide,
    /// Only turns of one named face (outer layer).
    OnlyFace(Face),
    /// Only a single named middle slice.
    OnlySlice(Slice),
    /// Every middle-slice move (M/E/S).
    MiddleOnly,
    /// Every whole-cube rotation.
    AllTurns,
    /// U-layer and M-slice moves -- common second-block restriction.
    UAndM,
    /// F/B/L/R at 90 degrees only (no 180s, no U/D) -- "lateral" moves.
    LateralUd,
    /// An explicit, caller-supplied list (escape hatch for method-
    /// specific restricted sets not worth naming).
    Custom(Vec<Move>),
}

impl MoveSet {
    pub fn resolve(&self) -> Vec<Move> {
        match self {
            MoveSet::AllOuter => all_amounts().flat_map(|a| all_faces().map(move |f| Move::Outer(f, a))).collect(),
            MoveSet::AllWide => all_amounts().flat_map(|a| all_faces().map(move |f| Move::Wide(f, a))).collect(),
            MoveSet::AllOuterAndWide => {
                let mut v = MoveSet::AllOuter.resolve();
                v.extend(MoveSet::AllWide.resolve());
                v
            }
            MoveSet::OnlyFace(face) => all_amounts().map(|a| Move::Outer(*face, a)).collect(),
            MoveSet::OnlySlice(slice) => all_amounts().map(|a| Move::Middle(*slice, a)).collect(),
            MoveSet::MiddleOnly => all_amounts()
                .flat_map(|a| [Slice::M, Slice::E, Slice::S].into_iter().map(move |s| Move::Middle(s, a)))
                .collect(),
            MoveSet::AllTurns => all_amounts()
                .flat_map(|a| [Turn::X, Turn::Y, Turn::Z].into_iter().map(move |t| Move::Rotation(t, a)))
                .collect(),
            MoveSet::UAndM => {
                let mut v = MoveSet::OnlyFace(Face::U).resolve();
                v.extend(MoveSet::OnlySlice(Slice::M).resolve());
                v
            }
            MoveSet::LateralUd => [Face::F, Face::B, Face::L, Face::R]
                .into_iter()
                .flat_map(|f| [Amount::Cw, Amount::Ccw].into_iter().map(move |a| Move::Outer(f, a)))
                .collect(),
            MoveSet::Custom(moves) => moves.clone(),
        }
    }
}

fn all_faces() -> impl Iterator<Item = Face> + Clone {
    enum_iterator::all::<Face>()
}

fn all_amounts() -> impl Iterator<Item = Amount> + Clone {
    enum_iterator::all::<Amount>()
}

/// True iff placing `next` immediately after `prev` is allowed: it must
/// not collapse under adjacent-shrink, and if it shares an axis with
/// `prev` on a parallel (not identical) layer, `prev` must canonically
/// precede `next` (spec.md §4.G's canonical-ordering prune, which both
/// bounds the root list and prunes mid-search branches the same way).
pub fn extends_validly(prev: Option<Move>, next: Move) -> bool {
    let Some(prev) = prev else { return true };
    if !matches!(Move::combine(prev, next), crate::moves::Merge::NotAdjacent) {
        return false;
    }
    if Move::opposite_axis(prev, next) && prev > next {
        return false;
    }
    true
}

/// One grammar unit's shape, per spec.md §3.
#[derive(Clone, Debug)]
pub enum UnitKind {
    Single(MoveSet),
    Double(MoveSet),
    Triple(MoveSet),
    Sequence(Algorithm),
    ConjugateSingle { aux: MoveSet, main: MoveSet },
    Conjugate { aux: MoveSet, body: Algorithm },
}

#[derive(Clone, Debug)]
pub struct SearchUnit {
    pub id: u64,
    pub kind: UnitKind,
}

impl SearchUnit {
    /// Every move-chunk (sequence of 1+ moves, applied atomically) this
    /// unit can contribute, pruned for internal adjacency/canonical-
    /// order violations. The caller is responsible for checking the
    /// chunk's first move against whatever precedes it in the
    /// in-progress algorithm (`extends_validly`), since that depends on
    /// where in the tree the unit is being expanded.
    pub fn chunks(&self) -> Vec<Vec<Move>> {
        match &self.kind {
            UnitKind::Single(set) => set.resolve().into_iter().map(|m| vec![m]).collect(),
            UnitKind::Double(set) => pairs(&set.resolve()),
            UnitKind::Triple(set) => triples(&set.resolve()),
            UnitKind::Sequence(alg) => vec![alg.moves().to_vec()],
            UnitKind::ConjugateSingle { aux, main } => {
                let mut out = Vec::new();
                for &a in &aux.resolve() {
                    for &m in &main.resolve() {
                        if !extends_validly(Some(a), m) {
                            continue;
                        }
                        out.push(vec![a, m, a.reverse()]);
                    }
                }
                out
            }
            UnitKind::Conjugate { aux, body } => aux
                .resolve()
                .into_iter()
                .map(|a| {
                    let mut chunk = vec![a];
                    chunk.extend_from_slice(body.moves());
                    chunk.push(a.reverse());
                    chunk
                })
                .collect(),
        }
    }
}

fn pairs(moves: &[Move]) -> Vec<Vec<Move>> {
    moves
        .iter()
        .cartesian_product(moves.iter())
        .filter(|&(&a, &b)| extends_validly(Some(a), b))
        .map(|(&a, &b)| vec![a, b])
        .collect()
}

fn triples(moves: &[Move]) -> Vec<Vec<Move>> {
    pairs(moves)
        .into_iter()
        .cartesian_product(moves.iter())
        .filter(|(pair, &c)| extends_validly(Some(pair[1]), c))
        .map(|(mut pair, &c)| {
            pair.push(c);
            pair
        })
        .collect()
}

/// One search level: the units that may extend the frontier at this
/// depth, and whether solutions found here are tested against the goal
/// predicate at all.
#[derive(Clone, Debug)]
pub struct SearchLevel {
    pub units: Vec<SearchUnit>,
    pub check: bool,
}

impl SearchLevel {
    pub fn chunks(&self) -> Vec<Vec<Move>> {
        self.units.iter().flat_map(|u| u.chunks()).collect()
    }
}

/// An assembled, immutable search grammar: a sequence of levels.
#[derive(Clone, Debug, Default)]
pub struct Grammar {
    pub levels: Vec<SearchLevel>,
}

impl Grammar {
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Builder with a grammar-local monotone unit-id counter (spec.md §9).
pub struct GrammarBuilder {
    next_id: u64,
    levels: Vec<SearchLevel>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        GrammarBuilder { next_id: 1, levels: Vec::new() }
    }

    /// Start a new level. `check`: whether solutions reaching this depth
    /// are tested against the goal predicate (the first level is almost
    /// always `false` -- see spec.md §4.E).
    pub fn level(&mut self, check: bool) -> &mut Self {
        self.levels.push(SearchLevel { units: Vec::new(), check });
        self
    }

    /// Add a unit to the most recently started level, tagging it with a
    /// fresh id. Panics if called before any `level()`.
    pub fn unit(&mut self, kind: UnitKind) -> &mut Self {
        let id = self.next_id;
        self.next_id += 1;
        self.levels
            .last_mut()
            .expect("GrammarBuilder::unit called before level()")
            .units
            .push(SearchUnit { id, kind });
        self
    }

    pub fn build(self) -> Result<Grammar, SolveError> {
        if self.levels.is_empty() {
            return Err(SolveError::EmptyGrammar);
        }
        Ok(Grammar { levels: self.levels })
    }
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        GrammarBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_ids_are_monotone_within_a_grammar() {
        let mut b = GrammarBuilder::new();
        b.level(false).unit(UnitKind::Single(MoveSet::OnlyFace(Face::U)));
        b.level(true).unit(UnitKind::Single(MoveSet::AllOuter));
        let g = b.build().unwrap();
        let ids: Vec<u64> = g.levels.iter().flat_map(|l| l.units.iter().map(|u| u.id)).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn empty_grammar_is_rejected() {
        assert!(matches!(GrammarBuilder::new().build(), Err(SolveError::EmptyGrammar)));
    }

    #[test]
    fn double_unit_drops_collapsing_and_symmetric_pairs() {
        let unit = SearchUnit {
            id: 1,
            kind: UnitKind::Double(MoveSet::OnlyFace(Face::U)),
        };
        let chunks = unit.chunks();
        // U,U' and U',U both collapse; U,U and U',U' survive; U,U2/U2,U
        // survive; the opposite-axis rule doesn't apply within one face.
        for chunk in &chunks {
            assert_eq!(chunk.len(), 2);
            assert!(extends_validly(None, chunk[0]));
            assert!(extends_validly(Some(chunk[0]), chunk[1]));
        }
    }

    #[test]
    fn opposite_axis_pairs_keep_only_canonical_order() {
        let moves = MoveSet::Custom(vec![Move::Outer(Face::U, Amount::Cw), Move::Outer(Face::D, Amount::Cw)]).resolve();
        let chunks = pairs(&moves);
        // (U, D) survives, (D, U) is pruned as the symmetric duplicate.
        assert!(chunks.contains(&vec![Move::Outer(Face::U, Amount::Cw), Move::Outer(Face::D, Amount::Cw)]));
        assert!(!chunks.contains(&vec![Move::Outer(Face::D, Amount::Cw), Move::Outer(Face::U, Amount::Cw)]));
    }
}

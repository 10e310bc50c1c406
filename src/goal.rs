//! Goal predicates: what the search engine checks a candidate algorithm
//! against at every `check`-marked level (spec.md §3/§4.F).

use crate::cube::{CubeState, PieceMask};
use crate::moves::Face;
use crate::piece_groups;

/// Mandatory/optional/oriented/positioned piece requirements, combined
/// per spec.md §3: `mandatory_mask` fully solved, `mandatory_position`
/// positioned (orientation irrelevant), `mandatory_orientation` oriented
/// (position irrelevant), and -- if any `optional_masks` are present --
/// at least one of them fully solved.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct GoalPredicate {
    mandatory_mask: PieceMask,
    mandatory_position: PieceMask,
    mandatory_orientation: PieceMask,
    optional_masks: Vec<PieceMask>,
}

impl GoalPredicate {
    pub fn new() -> Self {
        GoalPredicate::default()
    }

    pub fn add_mandatory(&mut self, mask: PieceMask) -> &mut Self {
        self.mandatory_mask = self.mandatory_mask.union(mask);
        self
    }

    pub fn add_optional(&mut self, mask: PieceMask) -> &mut Self {
        self.optional_masks.push(mask);
        self
    }

    pub fn add_mandatory_orientation(&mut self, mask: PieceMask) -> &mut Self {
        self.mandatory_orientation = self.mandatory_orientation.union(mask);
        self
    }

    pub fn add_mandatory_position(&mut self, mask: PieceMask) -> &mut Self {
        self.mandatory_position = self.mandatory_position.union(mask);
        self
    }

    pub fn reset(&mut self) -> &mut Self {
        *self = GoalPredicate::default();
        self
    }

    pub fn optional_masks(&self) -> &[PieceMask] {
        &self.optional_masks
    }

    /// How many of the (disjunctive) optional masks this state happens
    /// to satisfy -- used by the `Best` policy to rank "most structure
    /// built" candidates, not just the first satisfying one.
    pub fn optional_masks_satisfied(&self, cube: &CubeState) -> usize {
        self.optional_masks.iter().filter(|&&m| cube.is_solved(m)).count()
    }

    /// True iff `cube` satisfies every mandatory requirement and (if any
    /// are listed) at least one optional mask.
    pub fn is_satisfied(&self, cube: &CubeState) -> bool {
        if !self.mandatory_mask.is_empty() && !cube.is_solved(self.mandatory_mask) {
            return false;
        }
        if !self.mandatory_position.is_empty() && !cube.is_positioned(self.mandatory_position) {
            return false;
        }
        if !self.mandatory_orientation.is_empty() && !cube.is_oriented(self.mandatory_orientation) {
            return false;
        }
        if !self.optional_masks.is_empty() && self.optional_masks_satisfied(cube) == 0 {
            return false;
        }
        true
    }

    /// `SearchBase`'s default "give me whatever structure you can find"
    /// predicate: no mandatory requirement, optional masks covering
    /// every cross, every Petrus first block, and both Roux side
    /// blocks. Useful as a starting point for a method orchestrator that
    /// wants the engine to report back whatever partial progress a
    /// scramble's short moves happen to expose.
    pub fn common_structures() -> GoalPredicate {
        let mut g = GoalPredicate::new();
        for face in enum_iterator::all::<Face>() {
            g.add_optional(piece_groups::cross(face));
        }
        for &corner in &[
            crate::cube::UFR,
            crate::cube::UFL,
            crate::cube::UBL,
            crate::cube::UBR,
            crate::cube::DFR,
            crate::cube::DFL,
            crate::cube::DBL,
            crate::cube::DBR,
        ] {
            g.add_optional(piece_groups::petrus_block(corner));
        }
        g.add_optional(piece_groups::roux_block(true));
        g.add_optional(piece_groups::roux_block(false));
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{parse_simple_tokens, Amount};

    fn apply_text(cube: &mut CubeState, text: &str) {
        for mv in parse_simple_tokens(text).unwrap() {
            cube.apply(mv);
        }
    }

    #[test]
    fn empty_predicate_is_trivially_satisfied() {
        let cube = CubeState::solved();
        assert!(GoalPredicate::new().is_satisfied(&cube));
    }

    #[test]
    fn mandatory_mask_must_match_exactly() {
        let mut cube = CubeState::solved();
        apply_text(&mut cube, "R U R' U'");

        let mut goal = GoalPredicate::new();
        goal.add_mandatory(piece_groups::all());
        assert!(!goal.is_satisfied(&cube));

        apply_text(&mut cube, "U R U' R'");
        assert!(goal.is_satisfied(&cube));
    }

    #[test]
    fn optional_masks_are_disjunctive() {
        let cube = CubeState::solved();
        let mut goal = GoalPredicate::new();
        goal.add_optional(piece_groups::cross(Face::U));
        goal.add_optional(piece_groups::cross(Face::D));
        assert!(goal.is_satisfied(&cube));
        assert_eq!(goal.optional_masks_satisfied(&cube), 2);
    }

    #[test]
    fn mandatory_orientation_ignores_permutation() {
        // A full-cube rotation permutes every piece but orients none of
        // them incorrectly relative to each other.
        let mut cube = CubeState::solved();
        apply_text(&mut cube, "y");

        let mut goal = GoalPredicate::new();
        goal.add_mandatory_orientation(piece_groups::all());
        assert!(goal.is_satisfied(&cube));
    }
}

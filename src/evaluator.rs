//! Result evaluator: ranking/selection policies plus the method-specific
//! structure scorers (spec.md §4.H).
//!
//! Grounded on `original_source/deep_search.cpp::EvaluateShortestResult`
//! for the `Short`-policy scoring formula; the method scorer shape
//! (length term + subjective score + feature bonus) is grounded on the
//! `cfop.cpp`/`roux.cpp`/`petrus.cpp` scoring call sites that bootstrap
//! off `deep_search`'s optional-piece predicate.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::cube::CubeState;
use crate::engine::Solution;
use crate::piece_groups;
use crate::spin::Spin;

/// Selection policy applied to a completed search's solution log.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Policy {
    /// Most optional masks satisfied, then largest subjective score,
    /// then shortest length.
    Best,
    /// Engine shrinks its own depth budget as better solutions appear
    /// (see `crate::engine`); the evaluator then just takes the
    /// shortest of whatever's left, subjective score breaking ties.
    Short,
    /// First hit in (non-deterministic, cross-thread) enumeration
    /// order.
    First,
    /// Uniform random pick.
    Random,
}

/// `50 * max(0, 50 - length) + subjective_score + feature_bonus`, the
/// fixed formula spec.md §4.H specifies verbatim.
fn base_score(length: usize, subjective_score: i32) -> i32 {
    50 * (50i32.saturating_sub(length as i32)).max(0) + subjective_score
}

/// Number of extra piece-groups from `extra_masks` that `cube` also
/// happens to satisfy, beyond whatever the goal predicate already
/// required -- the "feature bonus" spec.md §4.H describes (e.g. extra
/// F2L pairs solved alongside the cross).
fn feature_bonus(cube: &CubeState, extra_masks: &[crate::cube::PieceMask]) -> i32 {
    extra_masks.iter().filter(|&&m| cube.is_solved(m)).count() as i32 * 10
}

/// CFOP: cross plus however many F2L pairs on the same face happen to
/// already be solved.
pub fn cfop_cross_f2l_score(solution: &Solution, cross_face: crate::moves::Face) -> i32 {
    let extras: Vec<_> = piece_groups::face_corners_as_f2l_masks(cross_face);
    base_score(solution.algorithm.len(), solution.subjective_score) + feature_bonus(&solution.cube, &extras)
}

/// Roux: first block plus whichever squares of the *other* side block
/// happen to also be solved.
pub fn roux_first_block_score(solution: &Solution, left: bool) -> i32 {
    let other_block = piece_groups::roux_block(!left);
    let bonus = if solution.cube.is_solved(other_block) { 10 } else { 0 };
    base_score(solution.algorithm.len(), solution.subjective_score) + bonus
}

/// Petrus: first 2x2x2 block plus any extra petrus-corner blocks that
/// happen to also be solved.
pub fn petrus_first_block_score(solution: &Solution, built_corner: usize) -> i32 {
    let extras: Vec<_> = crate::cube::CORNER_SLOTS
        .iter()
        .copied()
        .filter(|&c| c != built_corner)
        .map(piece_groups::petrus_block)
        .collect();
    base_score(solution.algorithm.len(), solution.subjective_score) + feature_bonus(&solution.cube, &extras)
}

/// ZZ: EOLine plus a bonus if edge orientation alone (the X-cross
/// precursor) already holds for every edge.
pub fn zz_eo_x_score(solution: &Solution) -> i32 {
    let bonus = if solution.cube.is_oriented(piece_groups::all_edges()) { 15 } else { 0 };
    base_score(solution.algorithm.len(), solution.subjective_score) + bonus
}

/// yruRU: CP-line plus a bonus if the whole D layer happens to already
/// be positioned.
pub fn yruru_line_cp_score(solution: &Solution) -> i32 {
    let bonus = if solution.cube.is_positioned(piece_groups::layer(crate::moves::Face::D)) { 15 } else { 0 };
    base_score(solution.algorithm.len(), solution.subjective_score) + bonus
}

/// Apply `policy` to `solutions`, returning up to `max_solves` results,
/// sorted best-first. `spin` is accepted for method-specific scorers
/// that key feature bonuses off the cube's current orientation, but the
/// built-in policies here are orientation-agnostic (callers needing a
/// method-specific ranking should score externally with the functions
/// above and sort themselves; this is the generic `Policy` dispatcher).
pub fn select<R: Rng>(
    solutions: &[Solution],
    predicate: &crate::goal::GoalPredicate,
    policy: Policy,
    max_solves: usize,
    rng: &mut R,
) -> Vec<Solution> {
    if solutions.is_empty() || max_solves == 0 {
        return Vec::new();
    }

    match policy {
        Policy::Best => {
            let mut ranked: Vec<&Solution> = solutions.iter().collect();
            ranked.sort_by(|a, b| {
                let a_opt = predicate.optional_masks_satisfied(&a.cube);
                let b_opt = predicate.optional_masks_satisfied(&b.cube);
                b_opt
                    .cmp(&a_opt)
                    .then_with(|| b.subjective_score.cmp(&a.subjective_score))
                    .then_with(|| a.algorithm.len().cmp(&b.algorithm.len()))
            });
            ranked.into_iter().take(max_solves).cloned().collect()
        }
        Policy::Short => {
            let mut ranked: Vec<&Solution> = solutions.iter().collect();
            ranked.sort_by(|a, b| {
                a.algorithm
                    .len()
                    .cmp(&b.algorithm.len())
                    .then_with(|| b.subjective_score.cmp(&a.subjective_score))
            });
            ranked.into_iter().take(max_solves).cloned().collect()
        }
        Policy::First => solutions.iter().take(max_solves).cloned().collect(),
        Policy::Random => {
            let mut indices: Vec<usize> = (0..solutions.len()).collect();
            indices.shuffle(rng);
            indices.into_iter().take(max_solves).map(|i| solutions[i].clone()).collect()
        }
    }
}

/// A spin is only meaningful to a caller that also knows which method
/// produced the solutions; kept as a thin wrapper so orchestrators don't
/// have to re-derive it themselves.
pub fn solution_spin(solution: &Solution) -> Spin {
    solution.cube.spin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Algorithm;
    use crate::goal::GoalPredicate;
    use rand::rngs::mock::StepRng;

    fn fake_solution(moves_text: &str, subjective_score: i32) -> Solution {
        let algorithm = Algorithm::parse(moves_text).unwrap();
        let mut cube = CubeState::solved();
        cube.apply_all(algorithm.moves());
        Solution { algorithm, depth: 1, metric_value: 0.0, subjective_score, cube }
    }

    #[test]
    fn short_policy_prefers_shortest_then_subjective_score() {
        let a = fake_solution("R U R' U'", 10);
        let b = fake_solution("R U", 5);
        let predicate = GoalPredicate::new();
        let mut rng = StepRng::new(0, 1);
        let ranked = select(&[a, b], &predicate, Policy::Short, 10, &mut rng);
        assert_eq!(ranked[0].algorithm.len(), 2);
    }

    #[test]
    fn first_policy_keeps_enumeration_order() {
        let a = fake_solution("R", 0);
        let b = fake_solution("U", 0);
        let predicate = GoalPredicate::new();
        let mut rng = StepRng::new(0, 1);
        let ranked = select(&[a, b], &predicate, Policy::First, 1, &mut rng);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].algorithm.to_string(), "R");
    }

    #[test]
    fn max_solves_caps_output() {
        let solutions = vec![fake_solution("R", 0), fake_solution("U", 0), fake_solution("F", 0)];
        let predicate = GoalPredicate::new();
        let mut rng = StepRng::new(0, 1);
        let ranked = select(&solutions, &predicate, Policy::Best, 2, &mut rng);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn empty_solutions_select_to_empty() {
        let predicate = GoalPredicate::new();
        let mut rng = StepRng::new(0, 1);
        assert!(select(&[], &predicate, Policy::Best, 5, &mut rng).is_empty());
    }
}

//! Orchestration edge: the `Method` trait and the opaque last-layer
//! catalog interfaces (spec.md §6, §9, §11). Everything in this module
//! is a thin seam -- full per-method logic (choosing which searches to
//! run, in what order, reacting to partial results) is explicitly out
//! of scope (spec.md §1) and lives outside this crate. `CrossMethod` is
//! a demonstration orchestrator, not a complete CFOP implementation.
//!
//! Grounded on spec.md §9's explicit redesign instruction ("a `Method`
//! trait exposing `configure`/`evaluate`... trait objects live only at
//! orchestration edges, never in the hot search loop") and on
//! `original_source/cfop.h`'s declared-but-injected OLL/PLL search
//! signatures for the `LastLayerCatalog` trait shape.

use crate::algorithm::Algorithm;
use crate::cube::CubeState;
use crate::engine::{SearchConfig, SearchEngine, Solution};
use crate::error::SolveError;
use crate::evaluator::{self, Policy};
use crate::goal::GoalPredicate;
use crate::grammar::{Grammar, GrammarBuilder, MoveSet, UnitKind};
use crate::metrics::Metric;
use crate::moves::Face;
use crate::piece_groups;

/// One sub-step a method orchestrator runs: a grammar paired with the
/// predicate it should be checked against (spec.md §6's "a list of goal
/// predicates and grammars, one per sub-step").
pub struct Step {
    pub name: &'static str,
    pub grammar: Grammar,
    pub predicate: GoalPredicate,
}

/// What a method hands back after running all of its steps in sequence.
#[derive(Debug, Default)]
pub struct Report {
    pub steps: Vec<StepReport>,
}

#[derive(Debug)]
pub struct StepReport {
    pub name: &'static str,
    pub best: Option<Solution>,
}

/// `recognise(cube, set) -> (case_name, algorithm)` from spec.md §6(1):
/// given a cube state, identify which named case of `set` it is in and
/// return the algorithm that solves it. The core depends only on this
/// interface; the actual OLL/PLL/ZBLL/etc. data tables are an external
/// collaborator.
pub trait LastLayerCatalog {
    fn recognise(&self, cube: &CubeState, set: &str) -> Option<(String, Algorithm)>;

    /// `orient_last_layer(cube, set, policy, metric) -> (alg, case)` from
    /// spec.md §6(2), for OLL-class sets (orientation only).
    fn orient_last_layer(&self, cube: &CubeState, set: &str, policy: Policy, metric: Metric) -> Option<(Algorithm, String)>;

    /// `solve_last_layer(cube, set, policy, metric) -> (alg, case, auf)`
    /// from spec.md §6(3), for PLL-class sets (full permutation, plus a
    /// trailing "adjust U face" move).
    fn solve_last_layer(&self, cube: &CubeState, set: &str, policy: Policy, metric: Metric) -> Option<(Algorithm, String, crate::moves::Move)>;
}

/// A method configures the engine for each of its sub-steps and, once
/// all steps have run against the scrambled cube, produces a report.
/// Trait objects of `Method` live only at this orchestration edge --
/// the engine itself (`SearchEngine::run`) never takes one.
pub trait Method {
    /// Build this method's ordered list of (grammar, predicate) steps.
    fn configure(&self) -> Vec<Step>;

    /// Run every step in sequence against `scramble`, feeding each
    /// step's resulting cube state forward as the next step's starting
    /// point (spec.md §6: "calls the engine repeatedly, passing each
    /// step's output cube state... as input to the next").
    fn run(&self, scramble: &Algorithm, thread_count: i32, metric: Metric) -> Result<Report, SolveError> {
        let mut cube = CubeState::solved();
        cube.apply_all(scramble.moves());

        let mut report = Report::default();
        for step in self.configure() {
            let config = SearchConfig::new(Policy::Short, thread_count, metric);
            let outcome = SearchEngine::run(&cube, &step.grammar, &step.predicate, &config)?;

            let mut rng = rand::thread_rng();
            let best = evaluator::select(&outcome.solutions, &step.predicate, Policy::Short, 1, &mut rng).into_iter().next();

            if let Some(solution) = &best {
                cube = solution.cube;
            }
            report.steps.push(StepReport { name: step.name, best });
        }
        Ok(report)
    }
}

/// Demonstration orchestrator: search for a cross on a chosen face.
/// Matches spec.md §8 scenario 1: a `Double`-root, `NoCheck` first
/// level, then up to four `Single`/`Check` levels over `AllOuter`,
/// with an optional mask for "this face's cross is solved".
pub struct CrossMethod {
    pub cross_face: Face,
    pub max_depth: usize,
}

impl Default for CrossMethod {
    fn default() -> Self {
        CrossMethod { cross_face: Face::D, max_depth: 5 }
    }
}

impl Method for CrossMethod {
    fn configure(&self) -> Vec<Step> {
        let mut builder = GrammarBuilder::new();
        builder.level(false).unit(UnitKind::Double(MoveSet::AllOuter));
        for _ in 1..self.max_depth {
            builder.level(true).unit(UnitKind::Single(MoveSet::AllOuter));
        }
        let grammar = builder.build().expect("CrossMethod always builds a non-empty grammar");

        let mut predicate = GoalPredicate::new();
        predicate.add_optional(piece_groups::cross(self.cross_face));

        vec![Step { name: "cross", grammar, predicate }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_method_solves_the_scenario_1_scramble() {
        let scramble = Algorithm::parse("B F U F D R' F D L B2 U' B2 D B' R' F2 L2 R2 U'").unwrap();
        let method = CrossMethod { cross_face: Face::D, max_depth: 5 };

        let report = method.run(&scramble, -1, Metric::Htm).unwrap();
        let cross_step = &report.steps[0];
        let best = cross_step.best.as_ref().expect("expected a cross solution within 5 moves");
        assert!(best.algorithm.len() <= 5);
        assert!(best.cube.is_solved(piece_groups::cross(Face::D)));
    }

    #[test]
    fn cross_method_on_solved_cube_still_finds_a_cross_solution() {
        // The root level is `NoCheck` by design (spec.md §4.E: it widens
        // fan-out for worker load balancing), so even a solved starting
        // cube pays for at least one root chunk before anything is
        // tested -- the shortest recorded solution need not be empty,
        // only short and cross-solving.
        let scramble = Algorithm::new();
        let method = CrossMethod::default();
        let report = method.run(&scramble, -1, Metric::Htm).unwrap();
        let best = report.steps[0].best.as_ref().unwrap();
        assert!(best.cube.is_solved(piece_groups::cross(Face::D)));
    }
}

//! The multithreaded iterative-deepening search engine (spec.md §4.G):
//! root enumeration, round-robin thread distribution, per-branch DFS,
//! mutex-guarded solution log, atomic depth shrink under the `Short`
//! policy.
//!
//! Grounded on `original_source/deep_search.cpp`'s `UpdateRootData` /
//! `Run` / `RunThread` / `RunSearch` / `CheckSolve` / `NextLevel`,
//! translated from the C++ inheritance-based mutation into an explicit,
//! inheritance-free Rust recursion (spec.md §9's redesign note: a
//! concrete `Engine`, no virtual dispatch in the hot loop). Threading
//! uses `std::thread::spawn` with a static round-robin partition of the
//! root list, per spec.md §5 -- deliberately not `rayon`, which would
//! give work-stealing instead of the static assignment the spec calls
//! for.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, instrument};

use crate::cube::CubeState;
use crate::error::SolveError;
use crate::evaluator::Policy;
use crate::goal::GoalPredicate;
use crate::grammar::{extends_validly, Grammar};
use crate::metrics::Metric;
use crate::algorithm::Algorithm;

/// One accepted candidate: the algorithm, the recursion depth (number of
/// grammar levels consumed) at which it was found, its length under the
/// caller-chosen metric, its subjective score, and the cube state it
/// produced (kept around so the evaluator can test optional masks
/// without re-applying the algorithm).
#[derive(Clone, Debug)]
pub struct Solution {
    pub algorithm: Algorithm,
    pub depth: usize,
    pub metric_value: f64,
    pub subjective_score: i32,
    pub cube: CubeState,
}

/// Run configuration. `thread_count` follows spec.md §5's contract:
/// `-1` synchronous single-threaded, `0` all hardware threads, `n>0`
/// `min(n, hardware_concurrency)`.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub policy: Policy,
    pub thread_count: i32,
    pub metric: Metric,
    /// If set, a branch returns as soon as it reaches this depth and at
    /// least one solution has been found anywhere in the run (spec.md
    /// §4.G: "terminate after seeing a short enough solution at shallow
    /// depth").
    pub min_depth: Option<usize>,
}

impl SearchConfig {
    pub fn new(policy: Policy, thread_count: i32, metric: Metric) -> Self {
        SearchConfig { policy, thread_count, metric, min_depth: None }
    }

    pub fn with_min_depth(mut self, min_depth: usize) -> Self {
        self.min_depth = Some(min_depth);
        self
    }
}

/// Shared, cooperatively-cancellable run state. `max_depth` starts at
/// `grammar.len()` and is only ever shrunk (by the `Short` policy, or by
/// an external caller via [`request_stop`](SearchHandle::request_stop)).
/// Depth here counts grammar *levels* consumed, matching the units the
/// grammar itself is built from; for the common case of all-`Single`
/// grammars this coincides with move count, which is what spec.md's
/// examples assume.
#[derive(Clone)]
pub struct SearchHandle {
    max_depth: Arc<AtomicUsize>,
    stop: Arc<AtomicBool>,
}

impl SearchHandle {
    fn new(initial_max_depth: usize) -> Self {
        SearchHandle {
            max_depth: Arc::new(AtomicUsize::new(initial_max_depth)),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Ask a running search to exit as soon as workers next check in
    /// between branches. Used by orchestrators that are timing out.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.max_depth.store(0, Ordering::SeqCst);
    }

    pub fn current_max_depth(&self) -> usize {
        self.max_depth.load(Ordering::SeqCst)
    }

    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

/// Everything a completed run hands back: the (possibly empty, never
/// failing on its own) solution log, and the effective thread count the
/// engine actually used (spec.md §5: "the engine reports back the
/// effective count").
#[derive(Debug)]
pub struct SearchOutcome {
    pub solutions: Vec<Solution>,
    pub effective_threads: usize,
}

pub struct SearchEngine;

impl SearchEngine {
    /// Run to completion, blocking the calling thread. Equivalent to
    /// [`run_with_handle`](Self::run_with_handle) with a handle the
    /// caller has no other reference to.
    #[instrument(skip_all, fields(levels = grammar.len()))]
    pub fn run(
        cube0: &CubeState,
        grammar: &Grammar,
        predicate: &GoalPredicate,
        config: &SearchConfig,
    ) -> Result<SearchOutcome, SolveError> {
        let handle = SearchHandle::new(grammar.len());
        Self::run_with_handle(cube0, grammar, predicate, config, &handle)
    }

    /// Run to completion, sharing `handle` with the caller so another
    /// thread can call [`SearchHandle::request_stop`] mid-run.
    pub fn run_with_handle(
        cube0: &CubeState,
        grammar: &Grammar,
        predicate: &GoalPredicate,
        config: &SearchConfig,
        handle: &SearchHandle,
    ) -> Result<SearchOutcome, SolveError> {
        if grammar.is_empty() {
            return Err(SolveError::EmptyGrammar);
        }

        let roots = root_list(cube0, grammar);
        let effective_threads = effective_thread_count(config.thread_count, roots.len());
        info!(roots = roots.len(), effective_threads, "starting search");

        let solutions: Arc<Mutex<Vec<Solution>>> = Arc::new(Mutex::new(Vec::new()));

        // The root level's own check flag governs whether the state
        // *before* any of its moves are applied (the empty algorithm) is
        // itself a solution -- spec.md's identity-scramble scenario (§8
        // scenario 2) depends on this depth-0 test, which `root_list`
        // itself has no opportunity to perform since every chunk it
        // produces is non-empty.
        if grammar.levels[0].check && handle.current_max_depth() > 0 {
            record_solution(&Algorithm::new(), 0, cube0, config, handle, &solutions);
        }

        let buckets = round_robin(roots, effective_threads);

        let failures = if effective_threads <= 1 {
            for (alg, cube) in buckets.into_iter().next().unwrap_or_default() {
                if handle.should_stop() {
                    break;
                }
                recurse(cube, alg, 1, grammar, predicate, config, handle, &solutions);
            }
            0
        } else {
            let mut join_handles = Vec::with_capacity(effective_threads);
            for bucket in buckets {
                let grammar = grammar.clone();
                let predicate = predicate.clone();
                let config = config.clone();
                let handle = handle.clone();
                let solutions = Arc::clone(&solutions);
                join_handles.push(std::thread::spawn(move || {
                    for (alg, cube) in bucket {
                        if handle.should_stop() {
                            break;
                        }
                        recurse(cube, alg, 1, &grammar, &predicate, &config, &handle, &solutions);
                    }
                }));
            }

            let mut failures = 0usize;
            for jh in join_handles {
                if jh.join().is_err() {
                    failures += 1;
                }
            }
            failures
        };

        let solutions = Arc::try_unwrap(solutions)
            .map(|m| m.into_inner().unwrap_or_default())
            .unwrap_or_default();

        debug!(found = solutions.len(), failures, "search complete");

        if failures > 0 {
            return Err(SolveError::ThreadSpawnFailure(failures));
        }

        Ok(SearchOutcome { solutions, effective_threads })
    }
}

/// Expand the first level exhaustively into concrete (algorithm, cube)
/// roots, per spec.md §4.G step 1. Each unit's own `chunks()` already
/// prunes internal adjacency/canonical-order violations; here we only
/// need to check the check-flag on level 0 (rare, but the grammar
/// doesn't forbid it).
fn root_list(cube0: &CubeState, grammar: &Grammar) -> Vec<(Algorithm, CubeState)> {
    let level0 = &grammar.levels[0];
    level0
        .chunks()
        .into_iter()
        .map(|chunk| {
            let mut cube = *cube0;
            cube.apply_all(&chunk);
            (Algorithm::from_moves(chunk), cube)
        })
        .collect()
}

/// Partition `items` round-robin across `n` buckets (spec.md §5: "work
/// queue is static (round-robin over root list); no work stealing").
fn round_robin<T>(items: Vec<T>, n: usize) -> Vec<Vec<T>> {
    let n = n.max(1);
    let mut buckets: Vec<Vec<T>> = (0..n).map(|_| Vec::new()).collect();
    for (i, item) in items.into_iter().enumerate() {
        buckets[i % n].push(item);
    }
    buckets
}

fn effective_thread_count(thread_count: i32, root_count: usize) -> usize {
    let hw = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    let n = match thread_count {
        neg if neg < 0 => 1,
        0 => hw,
        pos => (pos as usize).min(hw),
    };
    n.min(root_count.max(1))
}

/// Depth-first expansion of one in-progress branch, starting at
/// `level_idx` (the number of grammar levels already consumed by
/// `alg`/`cube`, i.e. the recursion depth spec.md's state machine
/// tracks). Per spec.md §9's "deep copy per node": each recursive call
/// clones the cube and algorithm rather than undoing moves.
#[allow(clippy::too_many_arguments)]
fn recurse(
    cube: CubeState,
    alg: Algorithm,
    level_idx: usize,
    grammar: &Grammar,
    predicate: &GoalPredicate,
    config: &SearchConfig,
    handle: &SearchHandle,
    solutions: &Mutex<Vec<Solution>>,
) {
    if handle.should_stop() {
        return;
    }
    if level_idx >= handle.current_max_depth() {
        return;
    }
    if let Some(min_depth) = config.min_depth {
        if level_idx >= min_depth && !solutions.lock().unwrap().is_empty() {
            return;
        }
    }
    if level_idx >= grammar.len() {
        return;
    }

    let level = &grammar.levels[level_idx];

    if level.check && predicate.is_satisfied(&cube) {
        record_solution(&alg, level_idx, &cube, config, handle, solutions);
    }

    for unit in &level.units {
        for chunk in unit.chunks() {
            let Some(&first) = chunk.first() else { continue };
            if !extends_validly(alg.last(), first) {
                continue;
            }

            let mut next_cube = cube;
            next_cube.apply_all(&chunk);

            let mut next_alg = alg.clone();
            for &mv in &chunk {
                next_alg.push(mv);
            }

            recurse(next_cube, next_alg, level_idx + 1, grammar, predicate, config, handle, solutions);
        }
    }
}

fn record_solution(
    alg: &Algorithm,
    depth: usize,
    cube: &CubeState,
    config: &SearchConfig,
    handle: &SearchHandle,
    solutions: &Mutex<Vec<Solution>>,
) {
    let solution = Solution {
        algorithm: alg.clone(),
        depth,
        metric_value: alg.metric(config.metric),
        subjective_score: alg.subjective_score(),
        cube: *cube,
    };

    // Hold the mutex across both the append and (under `Short`) the
    // atomic max_depth shrink, so "I updated max_depth" and "my solution
    // was recorded" can never be observed out of order by another
    // thread (spec.md §9).
    let mut guard = solutions.lock().unwrap();
    guard.push(solution);
    if matches!(config.policy, Policy::Short) {
        let candidate = depth + 1;
        let mut current = handle.max_depth.load(Ordering::SeqCst);
        while candidate < current {
            match handle.max_depth.compare_exchange(current, candidate, Ordering::SeqCst, Ordering::SeqCst) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Algorithm as Alg;
    use crate::goal::GoalPredicate;
    use crate::grammar::{GrammarBuilder, MoveSet, UnitKind};
    use crate::piece_groups;

    fn solved_goal() -> GoalPredicate {
        let mut g = GoalPredicate::new();
        g.add_mandatory(piece_groups::all());
        g
    }

    #[test]
    fn finds_identity_solution_at_depth_zero() {
        let mut b = GrammarBuilder::new();
        for _ in 0..3 {
            b.level(true).unit(UnitKind::Single(MoveSet::AllOuter));
        }
        let grammar = b.build().unwrap();

        let cube0 = CubeState::solved();
        let predicate = solved_goal();
        let config = SearchConfig::new(Policy::Best, -1, Metric::Htm);

        let outcome = SearchEngine::run(&cube0, &grammar, &predicate, &config).unwrap();
        assert!(outcome.solutions.iter().any(|s| s.algorithm.is_empty()));
    }

    #[test]
    fn solves_sexy_move_scramble_under_short_policy() {
        let mut b = GrammarBuilder::new();
        b.level(false).unit(UnitKind::Double(MoveSet::AllOuter));
        for _ in 0..8 {
            b.level(true).unit(UnitKind::Single(MoveSet::AllOuter));
        }
        let grammar = b.build().unwrap();

        let mut cube0 = CubeState::solved();
        cube0.apply_all(Alg::parse("R U R' U'").unwrap().moves());

        let predicate = solved_goal();
        let config = SearchConfig::new(Policy::Short, -1, Metric::Htm);

        let outcome = SearchEngine::run(&cube0, &grammar, &predicate, &config).unwrap();
        assert!(!outcome.solutions.is_empty());
        let shortest = outcome.solutions.iter().map(|s| s.algorithm.len()).min().unwrap();
        assert!(shortest <= 6, "expected a short solve, got length {shortest}");
    }

    #[test]
    fn empty_grammar_is_rejected() {
        let grammar = crate::grammar::Grammar::default();
        let cube0 = CubeState::solved();
        let predicate = solved_goal();
        let config = SearchConfig::new(Policy::Best, -1, Metric::Htm);
        assert!(matches!(SearchEngine::run(&cube0, &grammar, &predicate, &config), Err(SolveError::EmptyGrammar)));
    }

    #[test]
    fn thread_count_variants_agree_on_the_solution_set_under_best_policy() {
        let mut b = GrammarBuilder::new();
        b.level(false).unit(UnitKind::Double(MoveSet::AllOuter));
        for _ in 0..3 {
            b.level(true).unit(UnitKind::Single(MoveSet::AllOuter));
        }
        let grammar = b.build().unwrap();

        let mut cube0 = CubeState::solved();
        cube0.apply_all(Alg::parse("R U R' F'").unwrap().moves());

        let predicate = solved_goal();

        let single = SearchEngine::run(&cube0, &grammar, &predicate, &SearchConfig::new(Policy::Best, 1, Metric::Htm)).unwrap();
        let all = SearchEngine::run(&cube0, &grammar, &predicate, &SearchConfig::new(Policy::Best, 0, Metric::Htm)).unwrap();

        let mut single_texts: Vec<String> = single.solutions.iter().map(|s| s.algorithm.to_string()).collect();
        let mut all_texts: Vec<String> = all.solutions.iter().map(|s| s.algorithm.to_string()).collect();
        single_texts.sort();
        all_texts.sort();
        assert_eq!(single_texts, all_texts);
    }

    #[test]
    fn request_stop_halts_a_running_search() {
        let mut b = GrammarBuilder::new();
        for _ in 0..6 {
            b.level(false).unit(UnitKind::Single(MoveSet::AllOuter));
        }
        let grammar = b.build().unwrap();

        let cube0 = CubeState::solved();
        let predicate = GoalPredicate::new();
        let config = SearchConfig::new(Policy::Best, -1, Metric::Htm);
        let handle = SearchHandle::new(0);
        handle.request_stop();

        let outcome = SearchEngine::run_with_handle(&cube0, &grammar, &predicate, &config, &handle).unwrap();
        assert!(outcome.solutions.is_empty());
    }
}

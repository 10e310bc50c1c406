//! Random scramble generation and the embarrassingly-parallel "solve
//! many scrambles" convenience layer (SPEC_FULL.md §10's ambient
//! concurrency/randomness stack).
//!
//! Grounded on the teacher's `scrambles.rs::bulk_scramble` for the
//! rayon-parallel batch shape and progress-reporting idiom, adapted
//! from the teacher's generic `Solvable`/`Heuristic` IDA* traits to
//! this crate's `CubeState`/`Method` types. Unlike the teacher's
//! `bulk_scramble`, this layer calls the search engine's own parallel
//! root scheduler per scramble rather than nesting two independent
//! thread pools; it is `rayon`-parallel only across scrambles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::Rng;
use rayon::prelude::*;
use tracing::info;

use crate::algorithm::Algorithm;
use crate::grammar::MoveSet;
use crate::metrics::Metric;
use crate::method::Method;

/// A random algorithm of `len` moves drawn from `move_set`, with
/// adjacent moves shrunk away as they're generated so the result never
/// contains a trivially-cancelling pair (a scramble that immediately
/// undoes its own first move isn't a real scramble).
pub fn random_scramble<R: Rng>(rng: &mut R, move_set: &MoveSet, len: usize) -> Algorithm {
    let moves = move_set.resolve();
    assert!(!moves.is_empty(), "move set resolved to no moves");

    let mut alg = Algorithm::new();
    while alg.len() < len {
        let mv = moves[rng.gen_range(0..moves.len())];
        let before = alg.len();
        let shrunk = alg.push_shrink(mv);
        if shrunk && alg.len() < before {
            // the move cancelled something out; try again rather than
            // settling for a shorter-than-requested scramble.
            continue;
        }
    }
    alg
}

pub fn random_scramble_string<R: Rng>(rng: &mut R, move_set: &MoveSet, len: usize) -> String {
    random_scramble(rng, move_set, len).to_string()
}

/// Run `method` against `num_scrambles` random scrambles of `scramble_len`
/// moves each, in parallel across scrambles (not within one scramble's
/// search -- each call into `Method::run` still uses the engine's own
/// thread pool per spec.md §5). Returns the shortest solution length
/// found for each scramble's first step, or `None` where the method
/// found nothing within its configured depth.
pub fn bulk_solve<M: Method + Sync>(
    rng_seed_scrambles: Vec<Algorithm>,
    method: &M,
    thread_count_per_search: i32,
    metric: Metric,
) -> Vec<Option<usize>> {
    let total = rng_seed_scrambles.len();
    let completed = AtomicUsize::new(0);
    let start = Instant::now();

    rng_seed_scrambles
        .into_par_iter()
        .map(|scramble| {
            let report = method.run(&scramble, thread_count_per_search, metric).ok();
            let best_len = report.and_then(|r| r.steps.first().and_then(|s| s.best.as_ref()).map(|b| b.algorithm.len()));

            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            if done % 100 == 0 || done == total {
                let elapsed = start.elapsed();
                info!(done, total, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "bulk_solve progress");
            }
            best_len
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_scramble_has_requested_length() {
        let mut rng = StdRng::seed_from_u64(42);
        let alg = random_scramble(&mut rng, &MoveSet::AllOuter, 20);
        assert_eq!(alg.len(), 20);
    }

    #[test]
    fn random_scramble_has_no_adjacent_cancellations() {
        let mut rng = StdRng::seed_from_u64(7);
        let alg = random_scramble(&mut rng, &MoveSet::AllOuter, 25);
        assert_eq!(alg.cancellations().len(), alg.len());
    }
}

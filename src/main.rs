use clap::Parser;
use tracing_subscriber::EnvFilter;

use layered_solve::algorithm::Algorithm;
use layered_solve::method::{CrossMethod, Method};
use layered_solve::metrics::Metric;
use layered_solve::moves::Face;

/// Run a single method step against a scramble and print the shortest
/// solve found. A thin demonstration binary over the `layered_solve`
/// library -- full per-method orchestration (which searches to run, in
/// what order) belongs to an external caller (spec.md §1/§6).
#[derive(Parser)]
struct Cli {
    /// Scramble in conventional cuber notation, e.g. "R U R' U'".
    scramble: String,

    /// Which face to build the cross on.
    #[arg(long, default_value = "d")]
    cross_face: String,

    /// How many grammar levels (after the root) to search.
    #[arg(long, default_value_t = 5)]
    max_depth: usize,

    /// Thread count: -1 synchronous, 0 all cores, n>0 up to n cores.
    #[arg(long, default_value_t = 0)]
    threads: i32,
}

fn parse_face(s: &str) -> Option<Face> {
    match s.to_ascii_uppercase().as_str() {
        "U" => Some(Face::U),
        "D" => Some(Face::D),
        "F" => Some(Face::F),
        "B" => Some(Face::B),
        "R" => Some(Face::R),
        "L" => Some(Face::L),
        _ => None,
    }
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();

    let scramble = match Algorithm::parse(&cli.scramble) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("invalid scramble: {e}");
            std::process::exit(1);
        }
    };

    let Some(cross_face) = parse_face(&cli.cross_face) else {
        eprintln!("invalid --cross-face {:?} (expected one of U D F B R L)", cli.cross_face);
        std::process::exit(1);
    };

    let method = CrossMethod { cross_face, max_depth: cli.max_depth };

    match method.run(&scramble, cli.threads, Metric::Htm) {
        Ok(report) => {
            let step = &report.steps[0];
            match &step.best {
                Some(solution) => println!(
                    "{} ({} moves, score {})",
                    solution.algorithm,
                    solution.algorithm.len(),
                    solution.subjective_score
                ),
                None => println!("no {} found in {} moves", step.name, cli.max_depth),
            }
        }
        Err(e) => {
            eprintln!("search failed: {e}");
            std::process::exit(1);
        }
    }
}

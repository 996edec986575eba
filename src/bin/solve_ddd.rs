//! Delayed-duplicate-detection BFS solver. Reads a puzzle script from
//! stdin; reports the optimal move count (no solution replay — this engine
//! stores no parent information).

use statespace::domain::npuzzle::NPuzzleInstance;
use statespace::domain::plank::PlankInstance;
use statespace::domain::sokoban::{SokobanInstance, SokobanOptions};
use statespace::domain::Domain;
use statespace::search::ddd::{self, DddOptions, GraphClass};

fn usage() -> ! {
    eprintln!("Usage: solve_ddd <sokoban|plank|npuzzle> [buffer-mb] [--undirected] < puzzle.txt");
    eprintln!("  buffer-mb    megabytes for the state buffer (default 50)");
    eprintln!("  --undirected keep only two generations of history (undirected graphs only)");
    std::process::exit(2);
}

fn run<D: Domain>(domain: D, options: &DddOptions) -> i32 {
    match ddd::solve(&domain, options) {
        Ok(outcome) => {
            match outcome.report.solution_moves {
                Some(m) => println!("we won in {m} moves"),
                None => println!("no solution found"),
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&outcome.report).expect("report serializes")
            );
            0
        }
        Err(e) => {
            eprintln!("search failed: {e}");
            1
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        usage();
    }
    let mut options = DddOptions {
        verbose: true,
        ..DddOptions::default()
    };
    for arg in &args[2..] {
        if arg == "--undirected" {
            options.graph = GraphClass::Undirected;
        } else if let Ok(mb) = arg.parse::<usize>() {
            options.buffer_bytes = mb << 20;
        } else {
            usage();
        }
    }

    let stdin = std::io::stdin();
    let code = match args[1].as_str() {
        "sokoban" => match SokobanInstance::load(stdin.lock(), SokobanOptions::default()) {
            Ok(d) => run(d, &options),
            Err(e) => {
                eprintln!("load failed: {e}");
                1
            }
        },
        "plank" => match PlankInstance::load(stdin.lock()) {
            Ok(d) => run(d, &options),
            Err(e) => {
                eprintln!("load failed: {e}");
                1
            }
        },
        "npuzzle" => match NPuzzleInstance::load(stdin.lock()) {
            Ok(d) => run(d, &options),
            Err(e) => {
                eprintln!("load failed: {e}");
                1
            }
        },
        _ => usage(),
    };
    std::process::exit(code);
}

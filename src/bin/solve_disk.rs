//! Disk-swapping BFS solver. Reads a puzzle script from stdin; writes
//! GEN-gggg frontier files into the current directory.

use statespace::domain::npuzzle::NPuzzleInstance;
use statespace::domain::plank::PlankInstance;
use statespace::domain::sokoban::{SokobanInstance, SokobanOptions};
use statespace::domain::Domain;
use statespace::search::disk::{self, DiskOptions};

fn usage() -> ! {
    eprintln!("Usage: solve_disk <sokoban|plank|npuzzle> [out-mb] < puzzle.txt");
    eprintln!("  out-mb  megabytes for the outgoing-state buffer (default 50)");
    eprintln!("temp files named GEN-gggg are created in the current directory");
    std::process::exit(2);
}

fn run<D: Domain>(domain: D, options: &DiskOptions) -> i32 {
    let outcome = match disk::solve(&domain, options) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("search failed: {e}");
            return 1;
        }
    };

    if let Some(solution) = &outcome.solution {
        let mut cfg = domain.start_config();
        println!("solution found, {} moves:", solution.len() - 1);
        for (i, state) in solution.iter().enumerate() {
            if let Err(e) = domain.decode(&mut cfg, state.as_slice()) {
                eprintln!("solution replay failed: {e}");
                return 1;
            }
            println!("move {i}");
            print!("{}", domain.render(&cfg));
        }
    } else {
        println!("no solution found");
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&outcome.report).expect("report serializes")
    );
    0
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        usage();
    }
    let mut options = DiskOptions {
        verbose: true,
        ..DiskOptions::default()
    };
    if args.len() == 3 {
        match args[2].parse::<usize>() {
            Ok(mb) => options.out_buffer_bytes = mb << 20,
            Err(_) => usage(),
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

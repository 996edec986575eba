//! Multithreaded disk BFS solver. Reads a puzzle script from stdin; writes
//! GEN-gggg frontier files into the current directory.

use statespace::domain::npuzzle::NPuzzleInstance;
use statespace::domain::plank::PlankInstance;
use statespace::domain::sokoban::{SokobanInstance, SokobanOptions};
use statespace::domain::Domain;
use statespace::search::parallel::{self, ParallelOptions};

fn usage() -> ! {
    eprintln!("Usage: solve_par <sokoban|plank|npuzzle> t [m [a b]] < puzzle.txt");
    eprintln!("  t  number of worker threads");
    eprintln!("  m  visited-bitmap block-size exponent in bits (0 = one block, default 20)");
    eprintln!("  a  megabytes for the incoming-state buffer (default 400)");
    eprintln!("  b  megabytes for the outgoing-state buffer (default 50)");
    eprintln!("temp files named GEN-gggg are created in the current directory");
    std::process::exit(2);
}

fn run<D: Domain + Sync>(domain: D, options: &ParallelOptions) -> i32 {
    let outcome = match parallel::solve(&domain, options) {
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
    if args.len() < 3 || args.len() == 5 || args.len() > 6 {
        usage();
    }
    let mut options = ParallelOptions {
        verbose: true,
        ..ParallelOptions::default()
    };
    match args[2].parse::<usize>() {
        Ok(t) => options.threads = t,
        Err(_) => usage(),
    }
    if args.len() >= 4 {
        match args[3].parse::<u32>() {
            Ok(m) => options.block_bits = m,
            Err(_) => usage(),
        }
    }
    if args.len() == 6 {
        match (args[4].parse::<usize>(), args[5].parse::<usize>()) {
            (Ok(a), Ok(b)) => {
                options.in_buffer_bytes = a << 20;
                options.out_buffer_bytes = b << 20;
            }
            _ => usage(),
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

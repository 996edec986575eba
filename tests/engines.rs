//! Cross-engine equivalence: every engine must discover the same reachable
//! component and the same optimal solution length on the same instance.

mod common;

use common::*;
use statespace::core::bytes::StateBytes;
use statespace::domain::npuzzle::NPuzzleInstance;
use statespace::domain::plank::PlankInstance;
use statespace::domain::sokoban::{SokobanInstance, SokobanOptions};
use statespace::domain::{Domain, SolveError};
use statespace::search::ddd::{self, DddOptions, GraphClass};
use statespace::search::disk::{self, DiskOptions};
use statespace::search::mem::{self, MemOptions};
use statespace::search::parallel::{self, ParallelOptions};
use statespace::search::SearchOutcome;

fn ddd_options() -> DddOptions {
    DddOptions {
        buffer_bytes: 1 << 20,
        graph: GraphClass::Directed,
        verbose: false,
    }
}

fn disk_options(dir: &std::path::Path) -> DiskOptions {
    DiskOptions {
        dir: dir.to_path_buf(),
        in_buffer_bytes: 1 << 12,
        out_buffer_bytes: 1 << 12,
        block_bits: 4,
        verbose: false,
    }
}

fn parallel_options(dir: &std::path::Path, threads: usize) -> ParallelOptions {
    ParallelOptions {
        threads,
        dir: dir.to_path_buf(),
        in_buffer_bytes: 1 << 12,
        out_buffer_bytes: 1 << 12,
        block_bits: 4,
        verbose: false,
    }
}

/// Run all four engines and return their outcomes (mem, ddd, disk,
/// parallel).
fn run_all<D: Domain + Sync>(domain: &D) -> [SearchOutcome; 4] {
    let m = mem::solve(domain, &MemOptions::default()).unwrap();
    let d = ddd::solve(domain, &ddd_options()).unwrap();
    let disk_dir = tempfile::tempdir().unwrap();
    let k = disk::solve(domain, &disk_options(disk_dir.path())).unwrap();
    let par_dir = tempfile::tempdir().unwrap();
    let p = parallel::solve(domain, &parallel_options(par_dir.path(), 2)).unwrap();
    [m, d, k, p]
}

/// A reported solution must be a genuine move path from the start to a
/// winning state.
fn assert_valid_solution<D: Domain>(domain: &D, solution: &[StateBytes]) {
    let mut cfg = domain.start_config();
    assert_eq!(solution[0], domain.encode(&mut cfg).unwrap());
    for w in solution.windows(2) {
        domain.decode(&mut cfg, w[0].as_slice()).unwrap();
        let mut found = false;
        domain
            .try_for_each_neighbour::<SolveError, _>(&mut cfg, |nb| {
                if nb.bytes == w[1] {
                    found = true;
                }
                Ok(())
            })
            .unwrap();
        assert!(found, "solution step is not a legal move");
    }
    domain
        .decode(&mut cfg, solution.last().unwrap().as_slice())
        .unwrap();
    assert!(domain.is_won(&cfg));
}

#[test]
fn trivial_sokoban_agrees_across_engines() {
    let domain =
        SokobanInstance::load(SOKO_TRIVIAL.as_bytes(), SokobanOptions::default()).unwrap();
    let outcomes = run_all(&domain);
    for o in &outcomes {
        assert_eq!(o.report.solution_moves, Some(1));
    }
    for o in [&outcomes[0], &outcomes[2], &outcomes[3]] {
        assert_valid_solution(&domain, o.solution.as_ref().unwrap());
    }
}

#[test]
fn walk_only_sokoban_exhausts_identically() {
    let domain =
        SokobanInstance::load(SOKO_WALK_ONLY.as_bytes(), SokobanOptions::default()).unwrap();
    let outcomes = run_all(&domain);
    for o in &outcomes {
        assert_eq!(o.report.solution_moves, None);
        assert_eq!(o.report.states_reached, 6);
        assert!(o.solution.is_none());
    }
    // One new player position per depth.
    for o in &outcomes[1..] {
        assert_eq!(o.report.generations, vec![1, 1, 1, 1, 1, 1]);
    }
}

#[test]
fn npuzzle_solution_length_agrees() {
    let domain = NPuzzleInstance::load(NPUZZLE_2X2.as_bytes()).unwrap();
    let outcomes = run_all(&domain);
    for o in &outcomes {
        assert_eq!(o.report.solution_moves, Some(4));
    }
    for o in [&outcomes[0], &outcomes[2], &outcomes[3]] {
        assert_valid_solution(&domain, o.solution.as_ref().unwrap());
    }
}

#[test]
fn npuzzle_exhausts_its_even_component() {
    let domain = NPuzzleInstance::load(NPUZZLE_EXHAUST.as_bytes()).unwrap();
    let outcomes = run_all(&domain);
    for o in &outcomes {
        assert_eq!(o.report.solution_moves, None);
        assert_eq!(o.report.states_reached, 12);
    }
    for o in &outcomes[1..] {
        assert_eq!(o.report.generations, vec![1, 2, 2, 2, 2, 2, 1]);
        assert_eq!(o.report.generations.iter().sum::<u64>(), 12);
    }
}

#[test]
fn plank_shuffle_needs_three_moves() {
    let domain = PlankInstance::load(PLANK_SHUFFLE.as_bytes()).unwrap();
    let outcomes = run_all(&domain);
    for o in &outcomes {
        assert_eq!(o.report.solution_moves, Some(3));
    }
    for o in [&outcomes[0], &outcomes[2], &outcomes[3]] {
        assert_valid_solution(&domain, o.solution.as_ref().unwrap());
    }
}

#[test]
fn stranded_plank_has_no_solution() {
    let domain = PlankInstance::load(PLANK_STRANDED.as_bytes()).unwrap();
    let outcomes = run_all(&domain);
    for o in &outcomes {
        assert_eq!(o.report.solution_moves, None);
        assert_eq!(o.report.states_reached, 4);
    }
    for o in &outcomes[1..] {
        assert_eq!(o.report.generations, vec![1, 2, 1]);
    }
}

#[test]
fn undirected_history_discipline_matches_on_undirected_graphs() {
    let domain = NPuzzleInstance::load(NPUZZLE_EXHAUST.as_bytes()).unwrap();
    let undirected = ddd::solve(
        &domain,
        &DddOptions {
            graph: GraphClass::Undirected,
            ..ddd_options()
        },
    )
    .unwrap();
    assert_eq!(undirected.report.states_reached, 12);
    assert_eq!(undirected.report.generations, vec![1, 2, 2, 2, 2, 2, 1]);
}

#[test]
fn parallel_generations_are_deterministic_multisets() {
    let domain = NPuzzleInstance::load(NPUZZLE_EXHAUST.as_bytes()).unwrap();
    let width = domain.state_bytes();
    let mut per_thread_runs = Vec::new();
    for threads in [1usize, 2, 4] {
        let dir = tempfile::tempdir().unwrap();
        parallel::solve(&domain, &parallel_options(dir.path(), threads)).unwrap();
        let gens: Vec<Vec<u64>> = (0..7).map(|g| gen_states(dir.path(), g, width)).collect();
        per_thread_runs.push(gens);
    }
    for run in &per_thread_runs[1..] {
        assert_eq!(run, &per_thread_runs[0]);
    }
}

#[test]
fn disk_frontier_files_are_closed_under_expansion() {
    // Re-feeding the engine its own output can discover nothing new: every
    // neighbor of every flushed state is already in some generation file.
    let domain = NPuzzleInstance::load(NPUZZLE_EXHAUST.as_bytes()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let outcome = disk::solve(&domain, &disk_options(dir.path())).unwrap();
    let all = all_gen_states(dir.path(), domain.state_bytes());
    assert_eq!(all.len() as u64, outcome.report.states_reached);

    let mut cfg = domain.start_config();
    for &state in &all {
        domain
            .decode(&mut cfg, StateBytes::from_value(state, domain.state_bytes()).as_slice())
            .unwrap();
        domain
            .try_for_each_neighbour::<SolveError, _>(&mut cfg, |nb| {
                assert!(all.contains(&nb.bytes.value()));
                Ok(())
            })
            .unwrap();
    }
}

#[test]
fn deadlock_pruning_preserves_the_optimal_solution() {
    // A two-block cellar where blocks can be shoved against the top wall
    // into a frozen square: pruning may shrink the search but cannot change
    // the answer.
    let script = "size 6 5\nmap\n######\n#    #\n# $$ #\n# ..@#\n######\n";
    let pruned =
        SokobanInstance::load(script.as_bytes(), SokobanOptions::default()).unwrap();
    let lax = SokobanInstance::load(
        script.as_bytes(),
        SokobanOptions {
            skip_n_deadlock: true,
            skip_goal_corridor_deadlock: true,
            ..SokobanOptions::default()
        },
    )
    .unwrap();
    let a = mem::solve(&pruned, &MemOptions::default()).unwrap();
    let b = mem::solve(&lax, &MemOptions::default()).unwrap();
    assert_eq!(a.report.solution_moves, b.report.solution_moves);
    assert!(a.report.solution_moves.is_some());
    assert!(a.report.states_reached <= b.report.states_reached);
}

//! In-memory BFS with parent links.
//!
//! Allocates one parent slot and one queue slot per state, so the memory
//! bill is `16 * N` bytes. In exchange the solution falls out of the parent
//! chain with no extra passes. Suitable whenever that fits in RAM.

use crate::core::bytes::StateBytes;
use crate::domain::{Domain, SolveError};
use crate::search::{checked_state_count, reserve_exact, SearchOutcome, SearchReport};

/// Parent-slot sentinel for the start state.
const ROOT: u64 = u64::MAX;
/// Parent-slot sentinel for states not yet discovered.
const UNVISITED: u64 = u64::MAX - 1;

#[derive(Debug, Clone, Default)]
pub struct MemOptions {
    /// Print a progress line to stderr every 100 000 expanded states.
    pub verbose: bool,
}

enum Stop {
    Won,
    Fault(SolveError),
}

impl From<SolveError> for Stop {
    fn from(e: SolveError) -> Stop {
        Stop::Fault(e)
    }
}

pub fn solve<D: Domain>(domain: &D, options: &MemOptions) -> Result<SearchOutcome, SolveError> {
    let n = checked_state_count(domain.max_rank(), domain.state_bytes(), "mem_init")? as usize;
    let width = domain.state_bytes();

    let mut prev: Vec<u64> = Vec::new();
    reserve_exact(&mut prev, n, "mem_init", "parent array")?;
    prev.resize(n, UNVISITED);
    let mut queue: Vec<u64> = Vec::new();
    reserve_exact(&mut queue, n, "mem_init", "bfs queue")?;
    queue.resize(n, 0);

    let mut cfg = domain.start_config();
    let start = domain.encode(&mut cfg)?.value();
    prev[start as usize] = ROOT;
    queue[0] = start;

    let mut head = 0usize;
    let mut tail = 1usize;
    let mut pending = 1usize;
    let mut reached = 1u64;
    let mut processed = 0u64;
    let mut win: Option<u64> = None;

    while pending > 0 {
        let cur = queue[head];
        head += 1;
        if head == n {
            head = 0;
        }
        pending -= 1;
        processed += 1;
        if options.verbose && processed % 100_000 == 0 {
            eprintln!("processed {processed} states, {pending} in queue");
        }

        domain.decode(&mut cfg, StateBytes::from_value(cur, width).as_slice())?;
        let walk = domain.try_for_each_neighbour::<Stop, _>(&mut cfg, |nb| {
            let next = nb.bytes.value();
            if next as usize >= n {
                return Err(Stop::Fault(SolveError::Corrupt {
                    stage: "mem_expand",
                    detail: format!("encoded rank {next} out of range"),
                }));
            }
            if prev[next as usize] == UNVISITED {
                prev[next as usize] = cur;
                reached += 1;
                if nb.winning {
                    win = Some(next);
                    return Err(Stop::Won);
                }
                queue[tail] = next;
                tail += 1;
                if tail == n {
                    tail = 0;
                }
                pending += 1;
                if pending > n {
                    return Err(Stop::Fault(SolveError::Corrupt {
                        stage: "mem_expand",
                        detail: "bfs queue exhausted".to_string(),
                    }));
                }
            }
            Ok(())
        });
        match walk {
            Ok(()) => {}
            Err(Stop::Won) => break,
            Err(Stop::Fault(e)) => return Err(e),
        }
    }

    let solution = win.map(|w| {
        let mut path = Vec::new();
        let mut v = w;
        while v != ROOT {
            path.push(StateBytes::from_value(v, width));
            v = prev[v as usize];
        }
        path.reverse();
        path
    });

    Ok(SearchOutcome {
        report: SearchReport {
            states_reached: reached,
            generations: Vec::new(),
            solution_moves: solution.as_ref().map(|s| s.len() as u64 - 1),
        },
        solution,
    })
}

//! Breadth-first search engines.
//!
//! Four engines trade memory for disk and parallelism; all of them treat the
//! puzzle as a black box behind [`crate::domain::Domain`] and rely on the
//! codec's bijection to store visitedness as one bit (or one sorted record)
//! per state:
//!
//! - [`mem`]: parent-linked in-memory BFS, needs `16 * N` bytes.
//! - [`ddd`]: delayed duplicate detection against sorted history in a single
//!   user-sized buffer; no per-state bit array, no parent links.
//! - [`disk`]: per-generation frontier files on disk plus a lazily allocated
//!   partitioned visited bitmap, `N / 8` bytes resident.
//! - [`parallel`]: the disk engine with worker threads, per-partition locks
//!   and a generation barrier.
//!
//! Across generations all engines preserve strict BFS layering; within a
//! generation the parallel engine is free to reorder.

use serde::{Deserialize, Serialize};

use crate::core::bytes::StateBytes;
use crate::domain::SolveError;

pub mod bitmap;
pub mod ddd;
pub mod disk;
pub mod frontier;
pub mod mem;
pub mod parallel;
pub mod reconstruct;
pub mod records;

/// Machine-readable summary of a finished search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    /// States discovered before the search stopped (the full reachable
    /// component when no solution exists).
    pub states_reached: u64,
    /// States per BFS depth, for engines that track generations. Empty for
    /// the in-memory engine.
    pub generations: Vec<u64>,
    /// Length of the shortest solution in moves, when one was found.
    pub solution_moves: Option<u64>,
}

/// Report plus the solution path (start state first), for engines that can
/// reconstruct one.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub report: SearchReport,
    pub solution: Option<Vec<StateBytes>>,
}

/// Engines that index states by value require the rank to fit a `u64` with
/// headroom for the sentinels, exactly one state per rank.
pub(crate) fn checked_state_count(
    max_rank: StateBytes,
    state_bytes: usize,
    stage: &'static str,
) -> Result<u64, SolveError> {
    if state_bytes > 8 {
        return Err(SolveError::CapacityExceeded {
            stage,
            detail: format!("state size {state_bytes} bytes exceeds 8"),
        });
    }
    let n = max_rank.value().wrapping_add(1);
    if n == 0 || n >= (1u64 << 60) - 1 {
        return Err(SolveError::CapacityExceeded {
            stage,
            detail: "state space too large (2^60 states or more)".to_string(),
        });
    }
    Ok(n)
}

/// `try_reserve` wrapper surfacing allocation failure as a [`SolveError`].
pub(crate) fn reserve_exact<T>(
    v: &mut Vec<T>,
    additional: usize,
    stage: &'static str,
    structure: &'static str,
) -> Result<(), SolveError> {
    v.try_reserve_exact(additional)
        .map_err(|_| SolveError::AllocationFailed { stage, structure })
}

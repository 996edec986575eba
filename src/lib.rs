//! # statespace
//!
//! Exhaustive state-space search for single-agent puzzles with combinatorially
//! huge but enumerable state spaces.
//!
//! ## Architecture
//!
//! The codebase is structured as layered components:
//!
//! - [`core`]: allocation-free primitives ([`core::bytes::StateBytes`],
//!   compass directions, grid arithmetic).
//! - [`codec`]: the perfect hash. Every domain composes a handful of
//!   independent layers (two-symbol multinomial ranks, permutation ranks,
//!   small fixed radices) into a bijection between reachable configurations
//!   and a dense integer range `[0, N)`.
//! - [`domain`]: the puzzle domains and the narrow [`domain::Domain`]
//!   contract engines drive them through. Ships Sokoban (with deadlock
//!   pruning, block slapping, popup walls and force floors), plank puzzles,
//!   and the generalized sliding-tile puzzle.
//! - [`search`]: four breadth-first engines trading memory for disk and
//!   parallelism: in-memory with parent links, delayed duplicate detection
//!   against sorted history, disk-swapping frontiers over a lazily allocated
//!   visited bitmap, and a multithreaded variant of the latter.
//!
//! The bijection is what makes the engines scale: visitedness is one bit per
//! state, and frontiers are flat files of fixed-width little-endian ranks.
//!
//! ## Quick start
//!
//! ```no_run
//! use statespace::domain::sokoban::{SokobanInstance, SokobanOptions};
//! use statespace::search::mem::{self, MemOptions};
//!
//! let script = "size 5 3\nmap\n#####\n#@$.#\n#####\n";
//! let puzzle =
//!     SokobanInstance::load(script.as_bytes(), SokobanOptions::default()).unwrap();
//! let outcome = mem::solve(&puzzle, &MemOptions::default()).unwrap();
//! assert_eq!(outcome.report.solution_moves, Some(1));
//! ```

pub mod codec;
pub mod core;
pub mod domain;
pub mod search;

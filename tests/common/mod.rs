#![allow(dead_code)]

use std::path::Path;

use rustc_hash::FxHashSet;
use statespace::core::bytes::value_of;
use statespace::search::frontier::{file_size, gen_path};

/// Trivial one-push Sokoban: player, block, destination in a row.
pub const SOKO_TRIVIAL: &str = "size 5 3\nmap\n#####\n#@$.#\n#####\n";

/// No block can ever be pushed; the reachable states are the six player
/// positions. Exhausts at depth 5.
pub const SOKO_WALK_ONLY: &str = "size 6 4\nmap\n######\n#@$$.#\n#   .#\n######\n";

/// 2x2 sliding puzzle, four moves from the goal.
pub const NPUZZLE_2X2: &str = "size 2 2\nmap\n31\n2 \n";

/// 2x2 sliding puzzle started at the goal: exhausts its 12-state component.
pub const NPUZZLE_EXHAUST: &str = "size 2 2\nmap\n12\n3 \n";

/// Three stumps, one plank: solvable in three moves (lift, re-drop across
/// the far span, lift again standing on the target).
pub const PLANK_SHUFFLE: &str = "size 5 1\nmap\nS---*   T\n";

/// The far stump is two cells away but the only plank is one cell long.
pub const PLANK_STRANDED: &str = "size 4 1\nmap\nS-*   T\n";

/// Read every state of one generation file as a multiset of ranks.
pub fn gen_states(dir: &Path, gen: u32, width: usize) -> Vec<u64> {
    let path = gen_path(dir, gen);
    let bytes = std::fs::read(&path).expect("generation file readable");
    assert_eq!(bytes.len() % width, 0);
    let mut out: Vec<u64> = bytes.chunks_exact(width).map(value_of).collect();
    out.sort_unstable();
    out
}

/// All states across the generation files 0..=last, asserting that the
/// generations partition them (no rank appears twice).
pub fn all_gen_states(dir: &Path, width: usize) -> FxHashSet<u64> {
    let mut seen = FxHashSet::default();
    let mut gen = 0u32;
    loop {
        let path = gen_path(dir, gen);
        if !path.exists() || file_size(&path).unwrap() == 0 {
            break;
        }
        for v in gen_states(dir, gen, width) {
            assert!(seen.insert(v), "rank {v} appears in two generations");
        }
        gen += 1;
    }
    seen
}

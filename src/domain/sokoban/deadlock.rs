//! Deadlock pattern detection.
//!
//! The patterns are position-independent and cheap, so candidate placements
//! are collected once at load; the per-successor check only walks those
//! lists and consults the dynamic wall state (popped popup walls count as
//! walls).

use crate::core::grid::{step, Dir};

use super::{Cell, NPattern, SokobanConfig, SokobanInstance, Tile};

/// Whether the current configuration is provably unable to reach a win.
pub(super) fn deadlocked(inst: &SokobanInstance, cfg: &SokobanConfig) -> bool {
    if bad_2x2(inst, cfg) {
        return true;
    }
    if !inst.options.skip_n_deadlock && bad_n_pattern(inst, cfg) {
        return true;
    }
    if !inst.options.skip_goal_corridor_deadlock && bad_corridor(inst, cfg) {
        return true;
    }
    false
}

/// A 2x2 window filled with walls and blocks freezes every block in it:
/// reject unless all of them already rest on destinations.
fn bad_2x2(inst: &SokobanInstance, cfg: &SokobanConfig) -> bool {
    'windows: for w in &inst.windows_2x2 {
        let mut off_dest = 0;
        for &c in w {
            if cfg.tiles[c] == Tile::Block {
                if inst.cells[c] != Cell::Dest {
                    off_dest += 1;
                }
            } else if !inst.wall_now(cfg, c) {
                continue 'windows;
            }
        }
        if off_dest > 0 {
            return true;
        }
    }
    false
}

/// Two diagonal walls pinning two adjacent blocks (four rotations). The
/// candidate list only contains placements where at least one block cell is
/// off-destination, so a match is always fatal.
fn bad_n_pattern(inst: &SokobanInstance, cfg: &SokobanConfig) -> bool {
    for pat in &inst.n_patterns {
        if inst.wall_now(cfg, pat.walls[0])
            && inst.wall_now(cfg, pat.walls[1])
            && cfg.tiles[pat.blocks[0]] == Tile::Block
            && cfg.tiles[pat.blocks[1]] == Tile::Block
        {
            return true;
        }
    }
    false
}

/// A dead-end corridor of destinations only admits fully-pushed-in block
/// prefixes; an empty-block-empty reading means a block was pushed halfway
/// and abandoned.
fn bad_corridor(inst: &SokobanInstance, cfg: &SokobanConfig) -> bool {
    let c = &inst.corridor;
    for i in 0..c.len().saturating_sub(2) {
        if cfg.tiles[c[i]] == Tile::Empty
            && cfg.tiles[c[i + 1]] == Tile::Block
            && cfg.tiles[c[i + 2]] == Tile::Empty
        {
            return true;
        }
    }
    false
}

/// Whether the cell can ever act as a wall (statically, or by popping up).
fn wall_capable(cell: Cell) -> bool {
    matches!(cell, Cell::Wall | Cell::Popup)
}

/// Whether a block can ever rest on the cell.
fn block_capable(cell: Cell) -> bool {
    matches!(cell, Cell::Live | Cell::Dest)
}

/// 2x2 windows where every cell can hold a wall or a block. Windows of four
/// static walls can never contain a block and are dropped.
pub(super) fn collect_2x2_windows(width: usize, height: usize, cells: &[Cell]) -> Vec<[usize; 4]> {
    let mut out = Vec::new();
    for y in 0..height.saturating_sub(1) {
        for x in 0..width.saturating_sub(1) {
            let idx = y * width + x;
            let w = [idx, idx + 1, idx + width, idx + width + 1];
            if w.iter()
                .all(|&c| wall_capable(cells[c]) || block_capable(cells[c]))
                && !w.iter().all(|&c| cells[c] == Cell::Wall)
            {
                out.push(w);
            }
        }
    }
    out
}

/// All placements of the four N-pattern rotations whose wall cells can act
/// as walls and whose block cells can hold blocks. Placements with both
/// block cells on destinations can never reject a state and are dropped.
pub(super) fn collect_n_patterns(width: usize, height: usize, cells: &[Cell]) -> Vec<NPattern> {
    // (wall offsets, block offsets) as (dx, dy) pairs.
    const ROTATIONS: [([(usize, usize); 2], [(usize, usize); 2]); 4] = [
        // #$
        //  $#
        ([(0, 0), (2, 1)], [(1, 0), (1, 1)]),
        //  $#
        // #$
        ([(0, 1), (2, 0)], [(1, 0), (1, 1)]),
        // #
        // $$
        //  #
        ([(0, 0), (1, 2)], [(0, 1), (1, 1)]),
        //  #
        // $$
        // #
        ([(1, 0), (0, 2)], [(0, 1), (1, 1)]),
    ];

    let mut out = Vec::new();
    for (walls, blocks) in ROTATIONS {
        let span_x = walls.iter().chain(&blocks).map(|&(dx, _)| dx).max().unwrap();
        let span_y = walls.iter().chain(&blocks).map(|&(_, dy)| dy).max().unwrap();
        if width <= span_x || height <= span_y {
            continue;
        }
        for y in 0..height - span_y {
            for x in 0..width - span_x {
                let at = |(dx, dy): (usize, usize)| (y + dy) * width + (x + dx);
                let w = [at(walls[0]), at(walls[1])];
                let b = [at(blocks[0]), at(blocks[1])];
                if !w.iter().all(|&c| wall_capable(cells[c])) {
                    continue;
                }
                if !b.iter().all(|&c| block_capable(cells[c])) {
                    continue;
                }
                if b.iter().all(|&c| cells[c] == Cell::Dest) {
                    continue;
                }
                out.push(NPattern {
                    walls: w,
                    blocks: b,
                });
            }
        }
    }
    out
}

/// Find the first dead-end run of at least three consecutive destinations
/// walled in on both sides, entered from plain live floor. Returns the
/// corridor cells from the entrance inward, or empty when there is none.
pub(super) fn find_goal_corridor(width: usize, height: usize, cells: &[Cell]) -> Vec<usize> {
    for idx in 0..cells.len() {
        if cells[idx] != Cell::Dest {
            continue;
        }
        'dirs: for d in Dir::ALL {
            // Open space behind the entrance.
            match step(width, height, idx, d.opposite()) {
                Some(behind) if cells[behind] == Cell::Live => {}
                _ => continue,
            }
            let mut run = vec![idx];
            let mut cur = idx;
            loop {
                // Both sides of every corridor cell must be walls
                // (out-of-bounds counts as wall).
                for side in [d.cw(), d.ccw()] {
                    if let Some(s) = step(width, height, cur, side) {
                        if cells[s] != Cell::Wall {
                            continue 'dirs;
                        }
                    }
                }
                match step(width, height, cur, d) {
                    None => break,
                    Some(front) => match cells[front] {
                        Cell::Wall => break,
                        Cell::Dest => {
                            run.push(front);
                            cur = front;
                        }
                        _ => continue 'dirs,
                    },
                }
            }
            if run.len() >= 3 {
                return run;
            }
        }
    }
    Vec::new()
}

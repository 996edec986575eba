//! Plank ("river crossing") puzzles.
//!
//! Stumps live on a lattice; planks of various lengths bridge pairs of
//! stumps. The player walks across placed planks, may pick up a plank
//! adjacent to any reachable stump (when carrying nothing) and may drop the
//! carried plank across any exactly-fitting open span. The goal is to stand
//! on the target stump.
//!
//! The map uses a 2x-expanded ASCII grid: stumps at even/even coordinates,
//! bridge cells (`-`, `|`) in between.
//!
//! State encoding: one two-symbol layer per plank length that occurs, ranked
//! over that length's possible bridge spans plus one virtual slot for the
//! inventory, composed with the player's stump index as the innermost radix.
//! Reachable stumps are all equivalent for move generation; normalizing the
//! player to a canonical representative of the reachable-stump class would
//! shrink the state space further and remains future work.

use std::io::BufRead;

use rustc_hash::FxHashMap;

use crate::codec::pascal::{choose_f64, counts_agree, Pascal};
use crate::codec::rank;
use crate::core::bytes::{value_of, width_for, StateBytes};
use crate::core::grid::Dir;
use crate::domain::{parse_two_ints, Domain, Neighbour, ScriptReader, SolveError};

const MAX_DIM: usize = 33;

/// A possible bridge span: from a stump, east or south, to the next stump.
#[derive(Debug, Clone, Copy)]
struct Slot {
    stump: usize,
    dir: Dir,
}

#[derive(Debug, Clone)]
pub struct PlankConfig {
    /// The 2x-expanded grid: `b'*'` stumps, `b'-'`/`b'|'` bridge cells,
    /// `b' '` water.
    grid: Vec<u8>,
    /// Player position as a stump index.
    stump: usize,
    /// Length of the carried plank, 0 when empty-handed.
    carried: usize,
    scratch: Vec<u8>,
}

pub struct PlankInstance {
    width: usize,
    height: usize,
    /// Expanded grid dimensions (2w-1, 2h-1).
    gw: usize,
    gh: usize,
    stumps: Vec<(usize, usize)>,
    stump_at: FxHashMap<(usize, usize), usize>,
    goal_stump: usize,
    /// Number of planks of each length.
    planks_by_len: Vec<usize>,
    /// Possible bridge spans of each length.
    slots_by_len: Vec<Vec<Slot>>,
    /// The plank lengths that occur, ascending.
    lengths: Vec<usize>,
    pascal: Pascal,
    state_count: u64,
    state_width: usize,
    start: PlankConfig,
}

#[inline]
fn is_bridge(b: u8) -> bool {
    b == b'-' || b == b'|'
}

impl PlankInstance {
    pub fn load<R: BufRead>(input: R) -> Result<Self, SolveError> {
        let mut reader = ScriptReader::new(input);
        let mut width = 0usize;
        let mut height = 0usize;
        let mut grid: Vec<u8> = Vec::new();
        let mut have_map = false;

        while let Some((keyword, line)) = reader.next_directive()? {
            match keyword.as_str() {
                "size" => {
                    let (w, h) = parse_two_ints(&line, "size")?;
                    if w < 2 || h < 1 || w as usize > MAX_DIM || h as usize > MAX_DIM {
                        return Err(SolveError::InvalidPuzzle {
                            reason: format!("map size {w}x{h} out of range (max {MAX_DIM})"),
                        });
                    }
                    width = w as usize;
                    height = h as usize;
                }
                "map" => {
                    if width == 0 || height == 0 {
                        return Err(SolveError::InvalidPuzzle {
                            reason: "map given before size".to_string(),
                        });
                    }
                    let (gw, gh) = (2 * width - 1, 2 * height - 1);
                    grid = vec![b' '; gw * gh];
                    for y in 0..gh {
                        let row = reader.next_map_line()?;
                        let bytes = row.as_bytes();
                        for x in 0..gw {
                            grid[y * gw + x] = *bytes.get(x).unwrap_or(&b' ');
                        }
                    }
                    have_map = true;
                }
                other => {
                    eprintln!("ignored unknown directive {other}");
                }
            }
        }

        if !have_map {
            return Err(SolveError::InvalidPuzzle {
                reason: "no map in input".to_string(),
            });
        }

        let (gw, gh) = (2 * width - 1, 2 * height - 1);

        // Lattice points may only hold water, stumps or a crossing bridge.
        let mut starts = 0;
        let mut goals = 0;
        let mut goal_pos = (0, 0);
        for y in 0..height {
            for x in 0..width {
                let c = grid[(2 * y) * gw + 2 * x];
                match c {
                    b' ' | b'*' | b'-' | b'|' => {}
                    b'S' => {
                        starts += 1;
                    }
                    b'T' => {
                        goals += 1;
                        goal_pos = (x, y);
                    }
                    other => {
                        return Err(SolveError::InvalidPuzzle {
                            reason: format!("illegal stump character {:?}", other as char),
                        })
                    }
                }
            }
        }
        if starts != 1 {
            return Err(SolveError::InvalidPuzzle {
                reason: "there must be exactly 1 start position".to_string(),
            });
        }
        if goals != 1 {
            return Err(SolveError::InvalidPuzzle {
                reason: "there must be exactly 1 goal".to_string(),
            });
        }

        // Enumerate stumps (normalizing S/T to plain stumps), count placed
        // planks by length.
        let mut stumps = Vec::new();
        let mut stump_at = FxHashMap::default();
        let mut planks_by_len = vec![0usize; 2 * MAX_DIM];
        let mut start_stump = 0;
        for y in 0..height {
            for x in 0..width {
                let gi = (2 * y) * gw + 2 * x;
                if matches!(grid[gi], b'*' | b'S' | b'T') {
                    if grid[gi] == b'S' {
                        start_stump = stumps.len();
                    }
                    grid[gi] = b'*';
                    stump_at.insert((x, y), stumps.len());
                    stumps.push((x, y));
                    planks_by_len[scan_plank(&grid, gw, gh, x, y, Dir::East, b'-')] += 1;
                    planks_by_len[scan_plank(&grid, gw, gh, x, y, Dir::South, b'|')] += 1;
                }
            }
        }
        planks_by_len[0] = 0;
        let goal_stump = *stump_at
            .get(&goal_pos)
            .expect("goal position was seen as a stump");

        // Every possible bridge span, scanned east and south so each span is
        // found exactly once.
        let mut slots_by_len: Vec<Vec<Slot>> = vec![Vec::new(); 2 * MAX_DIM];
        for (i, &(x, y)) in stumps.iter().enumerate() {
            for dir in [Dir::East, Dir::South] {
                if let Some(len) = scan_span(&stump_at, width, height, x, y, dir) {
                    slots_by_len[len].push(Slot { stump: i, dir });
                }
            }
        }

        let lengths: Vec<usize> = (1..2 * MAX_DIM)
            .filter(|&l| planks_by_len[l] > 0)
            .collect();
        let mut max_slots = 1;
        for &l in &lengths {
            if slots_by_len[l].len() < planks_by_len[l] {
                return Err(SolveError::InvalidPuzzle {
                    reason: format!("more planks of length {l} than possible spans"),
                });
            }
            max_slots = max_slots.max(slots_by_len[l].len() + 1);
        }
        let pascal = Pascal::new(max_slots);

        let mut exact = stumps.len() as u64;
        let mut estimate = stumps.len() as f64;
        for &l in &lengths {
            let n = slots_by_len[l].len() + 1;
            exact = exact.wrapping_mul(pascal.choose(n, planks_by_len[l]));
            estimate *= choose_f64(n, planks_by_len[l]);
        }
        if !counts_agree(exact, estimate) {
            return Err(SolveError::InvalidPuzzle {
                reason: "state space too large".to_string(),
            });
        }
        let state_width = width_for(exact - 1);

        let start = PlankConfig {
            grid,
            stump: start_stump,
            carried: 0,
            scratch: Vec::with_capacity(max_slots),
        };

        Ok(PlankInstance {
            width,
            height,
            gw,
            gh,
            stumps,
            stump_at,
            goal_stump,
            planks_by_len,
            slots_by_len,
            lengths,
            pascal,
            state_count: exact,
            state_width,
            start,
        })
    }

    pub fn state_count(&self) -> u64 {
        self.state_count
    }

    pub fn stumps(&self) -> usize {
        self.stumps.len()
    }

    /// First expanded-grid cell of a slot's span.
    fn slot_cell(&self, slot: Slot) -> usize {
        let (x, y) = self.stumps[slot.stump];
        let (dx, dy) = slot.dir.delta();
        let gx = (2 * x) as i32 + dx;
        let gy = (2 * y) as i32 + dy;
        gy as usize * self.gw + gx as usize
    }

    /// Walk the expanded grid from a stump towards `dir`, filling in a
    /// bridge. Fails (drawing nothing) if any crossed cell already holds a
    /// bridge.
    fn draw_bridge(&self, cfg: &mut PlankConfig, stump: usize, dir: Dir) -> bool {
        let mark = if matches!(dir, Dir::East | Dir::West) {
            b'-'
        } else {
            b'|'
        };
        let (x, y) = self.stumps[stump];
        let (dx, dy) = dir.delta();
        let (mut gx, mut gy) = ((2 * x) as i32 + dx, (2 * y) as i32 + dy);
        while cfg.grid[gy as usize * self.gw + gx as usize] != b'*' {
            if is_bridge(cfg.grid[gy as usize * self.gw + gx as usize]) {
                return false;
            }
            gx += dx;
            gy += dy;
        }
        let (mut gx, mut gy) = ((2 * x) as i32 + dx, (2 * y) as i32 + dy);
        while cfg.grid[gy as usize * self.gw + gx as usize] != b'*' {
            cfg.grid[gy as usize * self.gw + gx as usize] = mark;
            gx += dx;
            gy += dy;
        }
        true
    }

    /// Remove the bridge leaving `stump` towards `dir`.
    fn erase_bridge(&self, cfg: &mut PlankConfig, stump: usize, dir: Dir) {
        let (x, y) = self.stumps[stump];
        let (dx, dy) = dir.delta();
        let (mut gx, mut gy) = ((2 * x) as i32 + dx, (2 * y) as i32 + dy);
        while is_bridge(cfg.grid[gy as usize * self.gw + gx as usize]) {
            cfg.grid[gy as usize * self.gw + gx as usize] = b' ';
            gx += dx;
            gy += dy;
        }
    }

    /// Length in stump steps of the bridge leaving (x, y) towards `dir`, or
    /// `None` if the walk exits the grid before reaching a stump.
    fn bridge_span(&self, x: usize, y: usize, dir: Dir) -> Option<usize> {
        scan_span(&self.stump_at, self.width, self.height, x, y, dir)
    }

    pub(crate) fn encode_config(&self, cfg: &mut PlankConfig) -> Result<StateBytes, SolveError> {
        let mut v = 0u64;
        for &l in &self.lengths {
            let slots = &self.slots_by_len[l];
            cfg.scratch.clear();
            for &slot in slots {
                cfg.scratch.push(is_bridge(cfg.grid[self.slot_cell(slot)]) as u8);
            }
            cfg.scratch.push((cfg.carried == l) as u8);
            let layer_rank = rank::rank(&self.pascal, &cfg.scratch);
            v = v
                .wrapping_mul(self.pascal.choose(slots.len() + 1, self.planks_by_len[l]))
                .wrapping_add(layer_rank);
        }
        v = v * self.stumps.len() as u64 + cfg.stump as u64;
        if v >= self.state_count {
            return Err(SolveError::Corrupt {
                stage: "plank_encode",
                detail: format!("rank {v} exceeds state count {}", self.state_count),
            });
        }
        Ok(StateBytes::from_value(v, self.state_width))
    }

    pub(crate) fn decode_config(
        &self,
        cfg: &mut PlankConfig,
        bytes: &[u8],
    ) -> Result<(), SolveError> {
        if bytes.len() != self.state_width {
            return Err(SolveError::Corrupt {
                stage: "plank_decode",
                detail: format!(
                    "state is {} bytes, expected {}",
                    bytes.len(),
                    self.state_width
                ),
            });
        }
        let mut v = value_of(bytes);
        if v >= self.state_count {
            return Err(SolveError::Corrupt {
                stage: "plank_decode",
                detail: format!("rank {v} exceeds state count {}", self.state_count),
            });
        }
        for b in cfg.grid.iter_mut() {
            if is_bridge(*b) {
                *b = b' ';
            }
        }
        cfg.carried = 0;
        cfg.stump = (v % self.stumps.len() as u64) as usize;
        v /= self.stumps.len() as u64;
        for &l in self.lengths.iter().rev() {
            let slots = &self.slots_by_len[l];
            let n = slots.len() + 1;
            let k = self.planks_by_len[l];
            let layer = self.pascal.choose(n, k);
            let layer_rank = v % layer;
            v /= layer;
            rank::unrank(&self.pascal, layer_rank, n - k, k, &mut cfg.scratch);
            for (j, &slot) in slots.iter().enumerate() {
                if cfg.scratch[j] == 1 && !self.draw_bridge(cfg, slot.stump, slot.dir) {
                    return Err(SolveError::Corrupt {
                        stage: "plank_decode",
                        detail: "decoded state has overlapping bridges".to_string(),
                    });
                }
            }
            if cfg.scratch[n - 1] == 1 {
                cfg.carried = l;
            }
        }
        Ok(())
    }

    fn won(&self, cfg: &PlankConfig) -> bool {
        cfg.stump == self.goal_stump
    }
}

/// Length (in stump steps, halved expanded cells) of a plank drawn as `mark`
/// leaving the stump at (x, y); 0 when none is placed there.
fn scan_plank(grid: &[u8], gw: usize, gh: usize, x: usize, y: usize, dir: Dir, mark: u8) -> usize {
    let (dx, dy) = dir.delta();
    let (mut gx, mut gy) = ((2 * x) as i32 + dx, (2 * y) as i32 + dy);
    let mut len = 1usize;
    while gx >= 0
        && gy >= 0
        && (gx as usize) < gw
        && (gy as usize) < gh
        && grid[gy as usize * gw + gx as usize] == mark
    {
        gx += dx;
        gy += dy;
        len += 1;
    }
    len / 2
}

/// Distance in stump steps from (x, y) to the next stump towards `dir`.
fn scan_span(
    stump_at: &FxHashMap<(usize, usize), usize>,
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    dir: Dir,
) -> Option<usize> {
    let (dx, dy) = dir.delta();
    let (mut cx, mut cy) = (x as i32 + dx, y as i32 + dy);
    let mut len = 1usize;
    while cx >= 0 && cy >= 0 && (cx as usize) < width && (cy as usize) < height {
        if stump_at.contains_key(&(cx as usize, cy as usize)) {
            return Some(len);
        }
        cx += dx;
        cy += dy;
        len += 1;
    }
    None
}

impl Domain for PlankInstance {
    type Config = PlankConfig;

    fn start_config(&self) -> PlankConfig {
        self.start.clone()
    }

    fn state_bytes(&self) -> usize {
        self.state_width
    }

    fn max_rank(&self) -> StateBytes {
        StateBytes::from_value(self.state_count - 1, self.state_width)
    }

    fn encode(&self, cfg: &mut PlankConfig) -> Result<StateBytes, SolveError> {
        self.encode_config(cfg)
    }

    fn decode(&self, cfg: &mut PlankConfig, bytes: &[u8]) -> Result<(), SolveError> {
        self.decode_config(cfg, bytes)
    }

    fn is_won(&self, cfg: &PlankConfig) -> bool {
        self.won(cfg)
    }

    fn try_for_each_neighbour<E, F>(&self, cfg: &mut PlankConfig, mut f: F) -> Result<(), E>
    where
        E: From<SolveError>,
        F: FnMut(Neighbour) -> Result<(), E>,
    {
        let origin = cfg.stump;
        let result = self.visit_reachable(cfg, &mut f);
        cfg.stump = origin;
        result
    }

    fn render(&self, cfg: &PlankConfig) -> String {
        let (px, py) = self.stumps[cfg.stump];
        let mut out = String::with_capacity((self.gw + 1) * self.gh + 32);
        for y in 0..self.gh {
            for x in 0..self.gw {
                if (x, y) == (2 * px, 2 * py) {
                    out.push('@');
                } else {
                    out.push(cfg.grid[y * self.gw + x] as char);
                }
            }
            out.push('\n');
        }
        match cfg.carried {
            0 => out.push_str("inventory: nothing\n"),
            l => out.push_str(&format!("inventory: length {l} plank\n")),
        }
        out
    }
}

impl PlankInstance {
    /// BFS over the stumps reachable across currently placed bridges; at
    /// every reached stump, try every pickup (empty-handed) or every
    /// exactly-fitting drop (carrying).
    fn visit_reachable<E: From<SolveError>>(
        &self,
        cfg: &mut PlankConfig,
        f: &mut impl FnMut(Neighbour) -> Result<(), E>,
    ) -> Result<(), E> {
        let mut visited = vec![false; self.stumps.len()];
        let mut queue = vec![cfg.stump];
        visited[cfg.stump] = true;
        let mut at = 0;
        while at < queue.len() {
            cfg.stump = queue[at];
            at += 1;
            let (cx, cy) = self.stumps[cfg.stump];

            if cfg.carried > 0 {
                self.try_drops(cfg, cx, cy, f)?;
            } else {
                self.try_pickups(cfg, cx, cy, f)?;
            }

            // Walk across adjacent bridges.
            for dir in Dir::ALL {
                if !self.bridge_leaves(cfg, cx, cy, dir) {
                    continue;
                }
                let len = self
                    .bridge_span(cx, cy, dir)
                    .ok_or_else(|| SolveError::Corrupt {
                        stage: "plank_neighbours",
                        detail: "bridge does not end at a stump".to_string(),
                    })
                    .map_err(E::from)?;
                let (dx, dy) = dir.delta();
                let nx = (cx as i32 + dx * len as i32) as usize;
                let ny = (cy as i32 + dy * len as i32) as usize;
                let next = self.stump_at[&(nx, ny)];
                if !visited[next] {
                    visited[next] = true;
                    queue.push(next);
                }
            }
        }
        Ok(())
    }

    /// Whether a bridge cell sits directly next to the stump towards `dir`.
    fn bridge_leaves(&self, cfg: &PlankConfig, x: usize, y: usize, dir: Dir) -> bool {
        let (dx, dy) = dir.delta();
        let (gx, gy) = ((2 * x) as i32 + dx, (2 * y) as i32 + dy);
        if gx < 0 || gy < 0 || gx as usize >= self.gw || gy as usize >= self.gh {
            return false;
        }
        is_bridge(cfg.grid[gy as usize * self.gw + gx as usize])
    }

    fn try_drops<E: From<SolveError>>(
        &self,
        cfg: &mut PlankConfig,
        cx: usize,
        cy: usize,
        f: &mut impl FnMut(Neighbour) -> Result<(), E>,
    ) -> Result<(), E> {
        for dir in Dir::ALL {
            // An existing bridge in this direction blocks the drop.
            let (dx, dy) = dir.delta();
            let (gx, gy) = ((2 * cx) as i32 + dx, (2 * cy) as i32 + dy);
            if gx < 0 || gy < 0 || gx as usize >= self.gw || gy as usize >= self.gh {
                continue;
            }
            if is_bridge(cfg.grid[gy as usize * self.gw + gx as usize]) {
                continue;
            }
            let Some(span) = self.bridge_span(cx, cy, dir) else {
                continue;
            };
            if span != cfg.carried {
                continue;
            }
            let carried = cfg.carried;
            cfg.carried = 0;
            let here = cfg.stump;
            if self.draw_bridge(cfg, here, dir) {
                self.emit(cfg, f)?;
                self.erase_bridge(cfg, here, dir);
            }
            cfg.carried = carried;
        }
        Ok(())
    }

    fn try_pickups<E: From<SolveError>>(
        &self,
        cfg: &mut PlankConfig,
        cx: usize,
        cy: usize,
        f: &mut impl FnMut(Neighbour) -> Result<(), E>,
    ) -> Result<(), E> {
        for dir in Dir::ALL {
            if !self.bridge_leaves(cfg, cx, cy, dir) {
                continue;
            }
            let len = self
                .bridge_span(cx, cy, dir)
                .ok_or_else(|| SolveError::Corrupt {
                    stage: "plank_neighbours",
                    detail: "bridge does not end at a stump".to_string(),
                })
                .map_err(E::from)?;
            let here = cfg.stump;
            self.erase_bridge(cfg, here, dir);
            cfg.carried = len;
            self.emit(cfg, f)?;
            cfg.carried = 0;
            let redrawn = self.draw_bridge(cfg, here, dir);
            debug_assert!(redrawn);
        }
        Ok(())
    }

    fn emit<E: From<SolveError>>(
        &self,
        cfg: &mut PlankConfig,
        f: &mut impl FnMut(Neighbour) -> Result<(), E>,
    ) -> Result<(), E> {
        let bytes = self.encode_config(cfg).map_err(E::from)?;
        let winning = self.won(cfg);
        f(Neighbour { bytes, winning })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two stumps two cells apart, the plank already bridging them.
    const CROSSING: &str = "size 3 1\nmap\nS---T\n";

    /// Three stumps in a row; the plank starts on the left span.
    const SHUFFLE: &str = "size 5 1\nmap\nS---*   T\n";

    fn load(script: &str) -> PlankInstance {
        PlankInstance::load(script.as_bytes()).unwrap()
    }

    fn neighbours(inst: &PlankInstance, cfg: &mut PlankConfig) -> Vec<Neighbour> {
        let mut out = Vec::new();
        inst.try_for_each_neighbour::<SolveError, _>(cfg, |nb| {
            out.push(nb);
            Ok(())
        })
        .unwrap();
        out
    }

    #[test]
    fn crossing_counts() {
        let inst = load(CROSSING);
        assert_eq!(inst.stumps(), 2);
        // One length-2 span plus the inventory slot, one plank: C(2,1), two
        // player stumps.
        assert_eq!(inst.state_count(), 4);
    }

    #[test]
    fn crossing_codec_is_an_exact_bijection() {
        let inst = load(CROSSING);
        let mut cfg = inst.start_config();
        for x in 0..inst.state_count() {
            inst.decode_config(&mut cfg, StateBytes::from_value(x, 1).as_slice())
                .unwrap();
            assert_eq!(inst.encode_config(&mut cfg).unwrap().value(), x);
        }
    }

    #[test]
    fn pickups_happen_at_every_reachable_stump() {
        let inst = load(CROSSING);
        let mut cfg = inst.start_config();
        let nbs = neighbours(&inst, &mut cfg);
        // The player can lift the bridge standing on either of its ends;
        // lifting it at the target stump is already a win.
        assert_eq!(nbs.len(), 2);
        assert_eq!(nbs.iter().filter(|nb| nb.winning).count(), 1);
        // Restored afterwards.
        assert_eq!(cfg.stump, inst.start.stump);
        assert_eq!(cfg.carried, 0);
    }

    #[test]
    fn shuffle_counts_and_drop_semantics() {
        let inst = load(SHUFFLE);
        assert_eq!(inst.stumps(), 3);
        // Two length-2 spans plus inventory, one plank: C(3,1); three
        // player stumps.
        assert_eq!(inst.state_count(), 9);

        // Carrying the plank at the middle stump offers two drops (left
        // span back, right span towards the target).
        let mut cfg = inst.start_config();
        let first = neighbours(&inst, &mut cfg);
        // Pickup at either end of the placed bridge.
        assert_eq!(first.len(), 2);
        let carried_at_middle = first
            .iter()
            .find(|nb| {
                let mut probe = inst.start_config();
                inst.decode_config(&mut probe, nb.bytes.as_slice()).unwrap();
                probe.stump == 1
            })
            .expect("one pickup happens at the middle stump");
        inst.decode_config(&mut cfg, carried_at_middle.bytes.as_slice())
            .unwrap();
        assert_eq!(cfg.carried, 2);
        let drops = neighbours(&inst, &mut cfg);
        assert_eq!(drops.len(), 2);
    }

    #[test]
    fn drop_towards_an_existing_bridge_is_skipped() {
        // Four stumps, three unit planks, all spans bridged at load. Lift
        // the middle plank by hand: the only legal drop is back into the
        // empty middle span; directions that already hold a bridge are
        // refused.
        let inst = load("size 4 1\nmap\nS-*-*-T\n");
        assert_eq!(inst.stumps(), 4);
        let mut cfg = inst.start_config();
        cfg.stump = 1;
        cfg.carried = 1;
        cfg.grid[3] = b' ';
        let nbs = neighbours(&inst, &mut cfg);
        assert_eq!(nbs.len(), 1);
        assert!(!nbs[0].winning);
        let mut probe = inst.start_config();
        inst.decode_config(&mut probe, nbs[0].bytes.as_slice())
            .unwrap();
        assert_eq!(probe.carried, 0);
        assert!(is_bridge(probe.grid[3]));
    }
}

//! Sokoban with deadlock pruning, block slapping, popup walls and force
//! floors.
//!
//! The instance is the static topology: the cell taxonomy, the floor
//! enumerations the codec ranks over, the precomputed deadlock-pattern
//! candidates and the total state count. The configuration is the grid
//! overlaid with the movable entities plus the player's facing direction.
//!
//! State encoding composes four layers in mixed radix, most significant
//! first: the two-symbol rank of "which live floor cells hold blocks"
//! (`C(live, blocks)` values), the player position among non-block floor
//! cells (`floor - blocks` values), the facing direction (5 values: four
//! compass directions plus "unset"; omitted entirely when slapping is
//! disabled), and one bit per popup wall. Encoding the player after the
//! blocks avoids a case split on whether the player stands on live or dead
//! floor.

use std::io::BufRead;

use rustc_hash::FxHashMap;

use crate::codec::pascal::{choose_f64, counts_agree, Pascal};
use crate::codec::rank;
use crate::core::bytes::{value_of, width_for, StateBytes};
use crate::core::grid::{step, Dir};
use crate::domain::{parse_two_ints, Domain, Neighbour, ScriptReader, SolveError};

mod deadlock;
mod movegen;

/// Grid dimension limit, matching the input format.
const MAX_DIM: usize = 33;

/// Static category of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cell {
    Wall,
    /// Block-reachable floor.
    Live,
    /// Player-traversable floor that refuses blocks.
    Dead,
    /// Live floor that must end with a block on it.
    Dest,
    /// Traversable until stepped on, then a permanent wall; refuses blocks.
    Popup,
    /// Direction-tagged conveyor; never holds the player or a block between
    /// moves.
    Force(Dir),
}

/// Dynamic content of a cell in the current configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tile {
    Wall,
    Empty,
    Block,
    Player,
    /// Popup wall not yet triggered.
    Popup,
    /// Popup wall converted to a permanent wall.
    Popped,
}

#[derive(Debug, Clone, Copy)]
pub struct SokobanOptions {
    /// Enable the block-slap move and the facing-direction state layer.
    pub slap: bool,
    pub skip_n_deadlock: bool,
    pub skip_goal_corridor_deadlock: bool,
}

impl Default for SokobanOptions {
    fn default() -> Self {
        SokobanOptions {
            slap: true,
            skip_n_deadlock: false,
            skip_goal_corridor_deadlock: false,
        }
    }
}

/// Mutable per-worker configuration.
#[derive(Debug, Clone)]
pub struct SokobanConfig {
    pub(crate) tiles: Vec<Tile>,
    pub(crate) facing: Option<Dir>,
    /// Scratch for the block-layer symbols, reused across encode/decode.
    pub(crate) scratch: Vec<u8>,
}

/// Wall/block N-pattern candidate with the two blocks at fixed cells.
///
/// Candidates where both block cells are destinations are dropped at load
/// (they can never reject a state).
pub(crate) struct NPattern {
    pub walls: [usize; 2],
    pub blocks: [usize; 2],
}

pub struct SokobanInstance {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) cells: Vec<Cell>,
    user_dead: Vec<bool>,
    /// All floor cells (live, dead, dest, popup) in row-major order.
    floor_cells: Vec<usize>,
    /// Live floor cells (incl. destinations) in row-major order; the block
    /// layer is ranked over these.
    live_cells: Vec<usize>,
    popup_cells: Vec<usize>,
    dest_cells: Vec<usize>,
    /// For each force-floor cell: where the conveyor chain lands and the
    /// final direction of travel, or `None` when the chain leaves the grid.
    pub(crate) force_exit: FxHashMap<usize, Option<(usize, Dir)>>,
    goal_cell: Option<usize>,
    blocks: usize,
    pub(crate) corridor: Vec<usize>,
    pub(crate) windows_2x2: Vec<[usize; 4]>,
    pub(crate) n_patterns: Vec<NPattern>,
    pascal: Pascal,
    state_count: u64,
    state_width: usize,
    pub(crate) options: SokobanOptions,
    start: SokobanConfig,
}

/// Cell categories produced directly by the parser, before the pull
/// preanalysis decides live vs dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parsed {
    Wall,
    Floor,
    Dest,
    UserDead,
    Popup,
    Force(Dir),
}

impl SokobanInstance {
    pub fn load<R: BufRead>(input: R, options: SokobanOptions) -> Result<Self, SolveError> {
        let mut options = options;
        let mut reader = ScriptReader::new(input);
        let mut width = 0usize;
        let mut height = 0usize;
        let mut goal: Option<usize> = None;
        let mut goal_directive: Option<(i64, i64)> = None;
        let mut parsed: Vec<Parsed> = Vec::new();
        let mut tiles: Vec<Tile> = Vec::new();
        let mut have_map = false;

        while let Some((keyword, line)) = reader.next_directive()? {
            match keyword.as_str() {
                "size" => {
                    let (w, h) = parse_two_ints(&line, "size")?;
                    if w < 1 || h < 1 || w as usize > MAX_DIM || h as usize > MAX_DIM {
                        return Err(SolveError::InvalidPuzzle {
                            reason: format!("map size {w}x{h} out of range (max {MAX_DIM})"),
                        });
                    }
                    width = w as usize;
                    height = h as usize;
                }
                "goal" => {
                    let (x, y) = parse_two_ints(&line, "goal")?;
                    goal_directive = Some((x, y));
                }
                "skip-n-deadlock" => options.skip_n_deadlock = true,
                "skip-goal-corridor-deadlock" => options.skip_goal_corridor_deadlock = true,
                "map" => {
                    if width == 0 || height == 0 {
                        return Err(SolveError::InvalidPuzzle {
                            reason: "map given before size".to_string(),
                        });
                    }
                    parsed = vec![Parsed::Floor; width * height];
                    tiles = vec![Tile::Empty; width * height];
                    for y in 0..height {
                        let row = reader.next_map_line()?;
                        let chars: Vec<char> = row.chars().collect();
                        for x in 0..width {
                            let c = *chars.get(x).ok_or_else(|| SolveError::InvalidPuzzle {
                                reason: format!("map row {y} shorter than {width} cells"),
                            })?;
                            let idx = y * width + x;
                            let (cat, tile) = match c {
                                '#' => (Parsed::Wall, Tile::Wall),
                                ' ' => (Parsed::Floor, Tile::Empty),
                                '.' => (Parsed::Dest, Tile::Empty),
                                '$' => (Parsed::Floor, Tile::Block),
                                '*' => (Parsed::Dest, Tile::Block),
                                '@' => (Parsed::Floor, Tile::Player),
                                '+' => (Parsed::Dest, Tile::Player),
                                '_' => (Parsed::UserDead, Tile::Empty),
                                '=' => (Parsed::UserDead, Tile::Player),
                                'g' => {
                                    goal = Some(idx);
                                    (Parsed::Floor, Tile::Empty)
                                }
                                'o' => (Parsed::Popup, Tile::Popup),
                                '<' => (Parsed::Force(Dir::West), Tile::Empty),
                                '>' => (Parsed::Force(Dir::East), Tile::Empty),
                                '^' => (Parsed::Force(Dir::North), Tile::Empty),
                                'v' => (Parsed::Force(Dir::South), Tile::Empty),
                                other => {
                                    return Err(SolveError::InvalidPuzzle {
                                        reason: format!("illegal map character {other:?}"),
                                    })
                                }
                            };
                            parsed[idx] = cat;
                            tiles[idx] = tile;
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

        if let Some((x, y)) = goal_directive {
            if x < 0 || y < 0 || x as usize >= width || y as usize >= height {
                return Err(SolveError::InvalidPuzzle {
                    reason: "man goal outside of map".to_string(),
                });
            }
            goal = Some(y as usize * width + x as usize);
        }

        let has_force = parsed.iter().any(|c| matches!(c, Parsed::Force(_)));

        // Liveness: pull preanalysis from the destinations, unless force
        // floors are present (pull moves do not model conveyors; every plain
        // floor cell stays live then, which only over-approximates).
        let cells = if has_force {
            parsed
                .iter()
                .map(|&p| match p {
                    Parsed::Wall => Cell::Wall,
                    Parsed::Floor => Cell::Live,
                    Parsed::Dest => Cell::Dest,
                    Parsed::UserDead => Cell::Dead,
                    Parsed::Popup => Cell::Popup,
                    Parsed::Force(d) => Cell::Force(d),
                })
                .collect::<Vec<_>>()
        } else {
            pull_preanalysis(width, height, &parsed)
        };

        let user_dead: Vec<bool> = parsed.iter().map(|&p| p == Parsed::UserDead).collect();

        let mut floor_cells = Vec::new();
        let mut live_cells = Vec::new();
        let mut popup_cells = Vec::new();
        let mut dest_cells = Vec::new();
        for (idx, &cell) in cells.iter().enumerate() {
            match cell {
                Cell::Live | Cell::Dest | Cell::Dead | Cell::Popup => floor_cells.push(idx),
                Cell::Wall | Cell::Force(_) => {}
            }
            match cell {
                Cell::Live | Cell::Dest => live_cells.push(idx),
                _ => {}
            }
            if cell == Cell::Popup {
                popup_cells.push(idx);
            }
            if cell == Cell::Dest {
                dest_cells.push(idx);
            }
        }

        let players = tiles.iter().filter(|&&t| t == Tile::Player).count();
        let blocks = tiles.iter().filter(|&&t| t == Tile::Block).count();
        if players != 1 {
            return Err(SolveError::InvalidPuzzle {
                reason: "map must contain exactly 1 player".to_string(),
            });
        }
        if dest_cells.len() != blocks {
            return Err(SolveError::InvalidPuzzle {
                reason: "map must contain the same number of blocks and destinations".to_string(),
            });
        }
        if blocks == 0 {
            return Err(SolveError::InvalidPuzzle {
                reason: "map must contain at least 1 block".to_string(),
            });
        }
        for (idx, &t) in tiles.iter().enumerate() {
            if t == Tile::Block && !matches!(cells[idx], Cell::Live | Cell::Dest) {
                return Err(SolveError::InvalidPuzzle {
                    reason: "a block starts on dead floor".to_string(),
                });
            }
        }
        if blocks > live_cells.len() {
            return Err(SolveError::InvalidPuzzle {
                reason: "more blocks than live floor cells".to_string(),
            });
        }

        // Force-floor chains are a map property; resolve them once.
        let mut force_exit = FxHashMap::default();
        for (idx, &cell) in cells.iter().enumerate() {
            if let Cell::Force(_) = cell {
                force_exit.insert(idx, follow_force(width, height, &cells, idx)?);
            }
        }

        let corridor = if options.skip_goal_corridor_deadlock {
            Vec::new()
        } else {
            deadlock::find_goal_corridor(width, height, &cells)
        };
        let windows_2x2 = deadlock::collect_2x2_windows(width, height, &cells);
        let n_patterns = if options.skip_n_deadlock {
            Vec::new()
        } else {
            deadlock::collect_n_patterns(width, height, &cells)
        };

        let pascal = Pascal::new(live_cells.len().max(1));

        // N = C(live, blocks) * (floor - blocks) * dir_radix * 2^popups.
        let man_radix = (floor_cells.len() - blocks) as u64;
        let dir_radix: u64 = if options.slap { 5 } else { 1 };
        let popups = popup_cells.len();
        if popups > 60 {
            return Err(SolveError::InvalidPuzzle {
                reason: "state space too large".to_string(),
            });
        }
        let exact = pascal
            .choose(live_cells.len(), blocks)
            .wrapping_mul(man_radix)
            .wrapping_mul(dir_radix)
            .wrapping_mul(1u64 << popups);
        let estimate = choose_f64(live_cells.len(), blocks)
            * man_radix as f64
            * dir_radix as f64
            * (popups as f64).exp2();
        if !counts_agree(exact, estimate) {
            return Err(SolveError::InvalidPuzzle {
                reason: "state space too large".to_string(),
            });
        }
        let state_width = width_for(exact - 1);

        let start = SokobanConfig {
            tiles,
            facing: None,
            scratch: Vec::with_capacity(live_cells.len()),
        };

        Ok(SokobanInstance {
            width,
            height,
            cells,
            user_dead,
            floor_cells,
            live_cells,
            popup_cells,
            dest_cells,
            force_exit,
            goal_cell: goal,
            blocks,
            corridor,
            windows_2x2,
            n_patterns,
            pascal,
            state_count: exact,
            state_width,
            options,
            start,
        })
    }

    /// Total number of encodable states, N.
    pub fn state_count(&self) -> u64 {
        self.state_count
    }

    pub fn live_floor(&self) -> usize {
        self.live_cells.len()
    }

    pub fn floor(&self) -> usize {
        self.floor_cells.len()
    }

    pub fn popups(&self) -> usize {
        self.popup_cells.len()
    }

    #[inline]
    pub(crate) fn step(&self, idx: usize, dir: Dir) -> Option<usize> {
        step(self.width, self.height, idx, dir)
    }

    /// Whether the cell currently acts as a wall (static, or a popped popup).
    #[inline]
    pub(crate) fn wall_now(&self, cfg: &SokobanConfig, idx: usize) -> bool {
        self.cells[idx] == Cell::Wall || cfg.tiles[idx] == Tile::Popped
    }

    /// Whether blocks may rest on the cell.
    #[inline]
    pub(crate) fn is_live(&self, idx: usize) -> bool {
        matches!(self.cells[idx], Cell::Live | Cell::Dest)
    }

    /// The tile the player leaves behind when stepping off `idx`.
    #[inline]
    pub(crate) fn leave_tile(&self, idx: usize) -> Tile {
        if self.cells[idx] == Cell::Popup {
            Tile::Popped
        } else {
            Tile::Empty
        }
    }

    pub(crate) fn player_cell(&self, cfg: &SokobanConfig) -> Result<usize, SolveError> {
        cfg.tiles
            .iter()
            .position(|&t| t == Tile::Player)
            .ok_or_else(|| SolveError::Corrupt {
                stage: "sokoban_player_scan",
                detail: "configuration has no player".to_string(),
            })
    }

    /// Collapse the facing direction to "unset" when it cannot enable a slap.
    ///
    /// The facing survives only if (a) the player could continue in that
    /// direction at all (the cell ahead is not a wall; a block ahead has
    /// empty live floor beyond it) and (b) a block sits directly to the
    /// player's left or right with empty live floor one cell farther out.
    /// Every other position normalizes to "unset", merging equivalent states.
    fn normalize_facing(&self, cfg: &mut SokobanConfig, player: usize) {
        let Some(d) = cfg.facing else { return };
        if !self.slap_keeps_facing(cfg, player, d) {
            cfg.facing = None;
        }
    }

    fn slap_keeps_facing(&self, cfg: &SokobanConfig, player: usize, d: Dir) -> bool {
        let Some(ahead) = self.step(player, d) else {
            return false;
        };
        if self.wall_now(cfg, ahead) {
            return false;
        }
        if cfg.tiles[ahead] == Tile::Block {
            let Some(beyond) = self.step(ahead, d) else {
                return false;
            };
            if !(self.is_live(beyond) && cfg.tiles[beyond] == Tile::Empty) {
                return false;
            }
        }
        for side in [d.cw(), d.ccw()] {
            let Some(near) = self.step(player, side) else {
                continue;
            };
            let Some(far) = self.step(near, side) else {
                continue;
            };
            if cfg.tiles[near] == Tile::Block
                && cfg.tiles[far] == Tile::Empty
                && self.is_live(far)
            {
                return true;
            }
        }
        false
    }

    pub(crate) fn encode_config(&self, cfg: &mut SokobanConfig) -> Result<StateBytes, SolveError> {
        let player = self.player_cell(cfg)?;
        if self.options.slap {
            self.normalize_facing(cfg, player);
        }

        // Player index: floor cells (of any kind) before the player, counting
        // blocks as walls.
        let mut man = 0u64;
        for idx in 0..self.cells.len() {
            if matches!(self.cells[idx], Cell::Wall | Cell::Force(_)) {
                continue;
            }
            if cfg.tiles[idx] == Tile::Block {
                continue;
            }
            if idx == player {
                break;
            }
            man += 1;
        }

        cfg.scratch.clear();
        for &c in &self.live_cells {
            cfg.scratch.push((cfg.tiles[c] == Tile::Block) as u8);
        }
        let block_rank = rank::rank(&self.pascal, &cfg.scratch);

        let man_radix = (self.floor_cells.len() - self.blocks) as u64;
        let mut v = block_rank * man_radix + man;
        if self.options.slap {
            let facing = cfg.facing.map_or(4, |d| d.index()) as u64;
            v = v * 5 + facing;
        }
        let mut bits = 0u64;
        for (i, &c) in self.popup_cells.iter().enumerate() {
            if cfg.tiles[c] != Tile::Popup {
                bits |= 1u64 << i;
            }
        }
        v = (v << self.popup_cells.len()) | bits;

        if v >= self.state_count {
            return Err(SolveError::Corrupt {
                stage: "sokoban_encode",
                detail: format!("rank {v} exceeds state count {}", self.state_count),
            });
        }
        Ok(StateBytes::from_value(v, self.state_width))
    }

    pub(crate) fn decode_config(
        &self,
        cfg: &mut SokobanConfig,
        bytes: &[u8],
    ) -> Result<(), SolveError> {
        if bytes.len() != self.state_width {
            return Err(SolveError::Corrupt {
                stage: "sokoban_decode",
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
                stage: "sokoban_decode",
                detail: format!("rank {v} exceeds state count {}", self.state_count),
            });
        }

        for &c in &self.floor_cells {
            cfg.tiles[c] = Tile::Empty;
        }
        for &c in &self.popup_cells {
            cfg.tiles[c] = if v & 1 == 1 { Tile::Popped } else { Tile::Popup };
            v >>= 1;
        }
        cfg.facing = if self.options.slap {
            let f = (v % 5) as usize;
            v /= 5;
            if f == 4 {
                None
            } else {
                Some(Dir::from_index(f))
            }
        } else {
            None
        };
        let man_radix = (self.floor_cells.len() - self.blocks) as u64;
        let mut man = v % man_radix;
        v /= man_radix;

        rank::unrank(
            &self.pascal,
            v,
            self.live_cells.len() - self.blocks,
            self.blocks,
            &mut cfg.scratch,
        );
        for (k, &c) in self.live_cells.iter().enumerate() {
            if cfg.scratch[k] == 1 {
                cfg.tiles[c] = Tile::Block;
            }
        }

        for idx in 0..self.cells.len() {
            if matches!(self.cells[idx], Cell::Wall | Cell::Force(_)) {
                continue;
            }
            if cfg.tiles[idx] == Tile::Block {
                continue;
            }
            if man == 0 {
                cfg.tiles[idx] = Tile::Player;
                return Ok(());
            }
            man -= 1;
        }
        Err(SolveError::Corrupt {
            stage: "sokoban_decode",
            detail: "player index exceeds floor count".to_string(),
        })
    }

    fn won(&self, cfg: &SokobanConfig) -> bool {
        if self
            .dest_cells
            .iter()
            .any(|&c| cfg.tiles[c] != Tile::Block)
        {
            return false;
        }
        match self.goal_cell {
            Some(g) => cfg.tiles[g] == Tile::Player,
            None => true,
        }
    }
}

/// Undirected BFS of pull moves from every destination. A block can be
/// pulled backward onto a cell iff the two cells behind it (in the pull
/// direction) are not walls and the pulled-from cell is plain floor. Cells
/// no destination can reach this way refuse blocks.
fn pull_preanalysis(width: usize, height: usize, parsed: &[Parsed]) -> Vec<Cell> {
    let mut live = vec![false; parsed.len()];
    let mut queue: Vec<usize> = Vec::new();
    for (idx, &p) in parsed.iter().enumerate() {
        if p == Parsed::Dest {
            queue.push(idx);
        }
    }
    let mut at = 0;
    while at < queue.len() {
        let c = queue[at];
        at += 1;
        for d in Dir::ALL {
            let Some(near) = step(width, height, c, d) else {
                continue;
            };
            let Some(far) = step(width, height, near, d) else {
                continue;
            };
            if parsed[near] != Parsed::Floor || live[near] {
                continue;
            }
            if parsed[far] == Parsed::Wall {
                continue;
            }
            live[near] = true;
            queue.push(near);
        }
    }
    parsed
        .iter()
        .enumerate()
        .map(|(idx, &p)| match p {
            Parsed::Wall => Cell::Wall,
            Parsed::Dest => Cell::Dest,
            Parsed::UserDead => Cell::Dead,
            Parsed::Popup => Cell::Popup,
            Parsed::Force(d) => Cell::Force(d),
            Parsed::Floor => {
                if live[idx] {
                    Cell::Live
                } else {
                    Cell::Dead
                }
            }
        })
        .collect()
}

/// Resolve a conveyor chain starting on `idx`. `None` means the chain
/// leaves the grid; a revisited cell means the map has an endless conveyor
/// loop and is rejected.
fn follow_force(
    width: usize,
    height: usize,
    cells: &[Cell],
    idx: usize,
) -> Result<Option<(usize, Dir)>, SolveError> {
    let mut cur = idx;
    let mut steps = 0usize;
    loop {
        let Cell::Force(d) = cells[cur] else {
            unreachable!("follow_force called off a force floor");
        };
        match step(width, height, cur, d) {
            None => return Ok(None),
            Some(next) => {
                if let Cell::Force(_) = cells[next] {
                    cur = next;
                    steps += 1;
                    if steps > cells.len() {
                        return Err(SolveError::InvalidPuzzle {
                            reason: "force floors form an endless loop".to_string(),
                        });
                    }
                } else {
                    return Ok(Some((next, d)));
                }
            }
        }
    }
}

impl Domain for SokobanInstance {
    type Config = SokobanConfig;

    fn start_config(&self) -> SokobanConfig {
        self.start.clone()
    }

    fn state_bytes(&self) -> usize {
        self.state_width
    }

    fn max_rank(&self) -> StateBytes {
        StateBytes::from_value(self.state_count - 1, self.state_width)
    }

    fn encode(&self, cfg: &mut SokobanConfig) -> Result<StateBytes, SolveError> {
        self.encode_config(cfg)
    }

    fn decode(&self, cfg: &mut SokobanConfig, bytes: &[u8]) -> Result<(), SolveError> {
        self.decode_config(cfg, bytes)
    }

    fn is_won(&self, cfg: &SokobanConfig) -> bool {
        self.won(cfg)
    }

    fn try_for_each_neighbour<E, F>(&self, cfg: &mut SokobanConfig, f: F) -> Result<(), E>
    where
        E: From<SolveError>,
        F: FnMut(Neighbour) -> Result<(), E>,
    {
        movegen::try_for_each_neighbour(self, cfg, f)
    }

    fn render(&self, cfg: &SokobanConfig) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let c = match self.cells[idx] {
                    Cell::Wall => '#',
                    Cell::Force(Dir::East) => '>',
                    Cell::Force(Dir::South) => 'v',
                    Cell::Force(Dir::West) => '<',
                    Cell::Force(Dir::North) => '^',
                    _ => match cfg.tiles[idx] {
                        Tile::Player => '@',
                        Tile::Block => '$',
                        Tile::Popup => 'o',
                        Tile::Popped => '#',
                        _ => {
                            if self.cells[idx] == Cell::Dest {
                                '.'
                            } else if self.user_dead[idx] {
                                '_'
                            } else {
                                ' '
                            }
                        }
                    },
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Neighbour;

    const TRIVIAL: &str = "size 5 3\nmap\n#####\n#@$.#\n#####\n";

    fn load(script: &str, options: SokobanOptions) -> SokobanInstance {
        SokobanInstance::load(script.as_bytes(), options).unwrap()
    }

    fn neighbours(inst: &SokobanInstance, cfg: &mut SokobanConfig) -> Vec<Neighbour> {
        let mut out = Vec::new();
        inst.try_for_each_neighbour::<SolveError, _>(cfg, |nb| {
            out.push(nb);
            Ok(())
        })
        .unwrap();
        out
    }

    #[test]
    fn trivial_instance_counts() {
        let inst = load(TRIVIAL, SokobanOptions::default());
        // Pull preanalysis: only the destination and the cell before it are
        // block-reachable; the player's own cell is dead floor.
        assert_eq!(inst.floor(), 3);
        assert_eq!(inst.live_floor(), 2);
        assert_eq!(inst.popups(), 0);
        // C(2,1) block layouts * 2 player slots * 5 facings.
        assert_eq!(inst.state_count(), 20);
        assert_eq!(inst.state_bytes(), 1);
    }

    #[test]
    fn trivial_single_winning_push() {
        let inst = load(TRIVIAL, SokobanOptions::default());
        let mut cfg = inst.start_config();
        let nbs = neighbours(&inst, &mut cfg);
        assert_eq!(nbs.len(), 1);
        assert!(nbs[0].winning);
        // The configuration was restored.
        assert_eq!(inst.player_cell(&cfg).unwrap(), 6); // (1, 1)
    }

    #[test]
    fn every_rank_is_a_codec_fixed_point() {
        // decode-then-encode lands on the canonical representative in one
        // step; ranks whose facing is already canonical round-trip exactly.
        let inst = load(TRIVIAL, SokobanOptions::default());
        let mut cfg = inst.start_config();
        for x in 0..inst.state_count() {
            inst.decode_config(&mut cfg, StateBytes::from_value(x, 1).as_slice())
                .unwrap();
            let y = inst.encode_config(&mut cfg).unwrap();
            inst.decode_config(&mut cfg, y.as_slice()).unwrap();
            let z = inst.encode_config(&mut cfg).unwrap();
            assert_eq!(y, z, "rank {x} is not canonical after one encode");
        }
    }

    #[test]
    fn slapless_codec_is_an_exact_bijection() {
        let inst = load(
            TRIVIAL,
            SokobanOptions {
                slap: false,
                ..SokobanOptions::default()
            },
        );
        // No facing layer: C(2,1) * 2.
        assert_eq!(inst.state_count(), 4);
        let mut cfg = inst.start_config();
        for x in 0..inst.state_count() {
            inst.decode_config(&mut cfg, StateBytes::from_value(x, 1).as_slice())
                .unwrap();
            let y = inst.encode_config(&mut cfg).unwrap();
            assert_eq!(y.value(), x);
        }
    }

    #[test]
    fn frozen_2x2_pair_rejects_every_successor() {
        // Two blocks against the left wall complete a wall/block square the
        // pull preanalysis cannot see (each block alone is still pullable).
        let script = "size 5 5\n\
                      map\n\
                      #  ##\n\
                      #$  #\n\
                      #$@ #\n\
                      #. .#\n\
                      #####\n";
        let inst = load(script, SokobanOptions::default());
        let mut cfg = inst.start_config();
        assert!(deadlock::deadlocked(&inst, &cfg));
        assert!(neighbours(&inst, &mut cfg).is_empty());
    }

    #[test]
    fn n_pattern_honors_skip_directive() {
        // Wall (1,1) / blocks (2,1), (2,2) / wall (3,2): the N pattern.
        let script = "size 6 5\n\
                      map\n\
                      #    #\n\
                      ##$ @#\n\
                      # $# #\n\
                      #. . #\n\
                      ######\n";
        let inst = load(script, SokobanOptions::default());
        let mut cfg = inst.start_config();
        assert!(deadlock::deadlocked(&inst, &cfg));
        assert!(neighbours(&inst, &mut cfg).is_empty());

        let skipping = load(
            &format!("skip-n-deadlock\n{script}"),
            SokobanOptions::default(),
        );
        let mut cfg = skipping.start_config();
        assert!(!deadlock::deadlocked(&skipping, &cfg));
        assert!(!neighbours(&skipping, &mut cfg).is_empty());
    }

    #[test]
    fn goal_corridor_is_found_and_checked() {
        // Three destinations walled in on both sides, entered from the
        // left; blocks start solved so the instance loads.
        let script = "size 7 3\n\
                      map\n\
                      ####### \n\
                      #@ ***##\n\
                      #######\n";
        let inst = load(script, SokobanOptions::default());
        assert_eq!(inst.corridor.len(), 3);

        // All blocks pushed in: fine. One block halfway with empty cells on
        // both corridor sides: rejected.
        let mut cfg = inst.start_config();
        assert!(!deadlock::deadlocked(&inst, &cfg));
        cfg.tiles[inst.corridor[0]] = Tile::Empty;
        cfg.tiles[inst.corridor[2]] = Tile::Empty;
        assert!(deadlock::deadlocked(&inst, &cfg));
    }

    #[test]
    fn popup_pops_when_stepped_on() {
        let script = "size 6 3\nmap\n######\n#@o$.#\n######\n";
        let inst = load(script, SokobanOptions::default());
        assert_eq!(inst.popups(), 1);
        let mut cfg = inst.start_config();
        let nbs = neighbours(&inst, &mut cfg);
        // Only move: walk east onto the popup.
        assert_eq!(nbs.len(), 1);
        inst.decode_config(&mut cfg, nbs[0].bytes.as_slice()).unwrap();
        // The player stands on the popup; its bit is already "popped".
        assert_eq!(inst.player_cell(&cfg).unwrap(), 8); // (2, 1)
        let again = inst.encode_config(&mut cfg).unwrap();
        assert_eq!(again, nbs[0].bytes);
        // Walking on leaves a permanent wall behind; the push beyond wins.
        let nbs2 = neighbours(&inst, &mut cfg);
        let winning: Vec<_> = nbs2.iter().filter(|nb| nb.winning).collect();
        assert_eq!(winning.len(), 1);
        inst.decode_config(&mut cfg, winning[0].bytes.as_slice())
            .unwrap();
        assert_eq!(cfg.tiles[8], Tile::Popped); // the popup cell
    }

    #[test]
    fn force_floor_carries_the_player_into_a_push() {
        let script = "size 6 3\nmap\n######\n#@>$.#\n######\n";
        let inst = load(script, SokobanOptions::default());
        let mut cfg = inst.start_config();
        let nbs = neighbours(&inst, &mut cfg);
        assert_eq!(nbs.len(), 1);
        assert!(nbs[0].winning);
        inst.decode_config(&mut cfg, nbs[0].bytes.as_slice()).unwrap();
        // The ride ended on the block's cell, the block on the destination.
        assert_eq!(inst.player_cell(&cfg).unwrap(), 9); // (3, 1)
        assert_eq!(cfg.tiles[10], Tile::Block); // (4, 1)
    }

    #[test]
    fn facing_normalizes_to_unset_without_slappable_blocks() {
        let inst = load(TRIVIAL, SokobanOptions::default());
        let mut cfg = inst.start_config();
        // No block sits beside the player with free live floor beyond, so
        // any facing collapses.
        for d in Dir::ALL {
            cfg.facing = Some(d);
            inst.encode_config(&mut cfg).unwrap();
            assert_eq!(cfg.facing, None, "facing {d:?} should normalize away");
        }
    }

    #[test]
    fn endless_conveyor_loop_is_rejected_at_load() {
        let script = "size 5 4\nmap\n#####\n#@>v#\n#$^<#\n#.###\n";
        let err = SokobanInstance::load(script.as_bytes(), SokobanOptions::default());
        assert!(err.is_err());
    }
}

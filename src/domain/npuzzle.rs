//! Generalised sliding-tile puzzle (n-puzzle).
//!
//! The whole board is a single permutation layer, ranked lexicographically.
//! Exactly half of all permutations are reachable; the solvability parity
//! check rejects inputs from the wrong half at load. If the input already is
//! the canonical goal, the search runs in exhaust-the-graph mode and the
//! goal predicate never fires.

use std::io::BufRead;

use crate::codec::factorial::FactorialRanker;
use crate::codec::pascal::counts_agree;
use crate::core::bytes::{value_of, width_for, StateBytes};
use crate::core::grid::Dir;
use crate::domain::{parse_two_ints, Domain, Neighbour, ScriptReader, SolveError};

const MAX_DIM: usize = 20;

#[derive(Debug, Clone)]
pub struct NPuzzleConfig {
    /// Row-major tile values; 0 is the blank.
    tiles: Vec<u32>,
    scratch: Vec<u32>,
}

pub struct NPuzzleInstance {
    width: usize,
    height: usize,
    n: usize,
    ranker: FactorialRanker,
    state_count: u64,
    state_width: usize,
    /// False when the input is the goal itself; then nothing ever wins.
    has_goal: bool,
    start: NPuzzleConfig,
}

impl NPuzzleInstance {
    pub fn load<R: BufRead>(input: R) -> Result<Self, SolveError> {
        let mut reader = ScriptReader::new(input);
        let mut width = 0usize;
        let mut height = 0usize;
        let mut tiles: Vec<u32> = Vec::new();
        let mut have_map = false;

        while let Some((keyword, line)) = reader.next_directive()? {
            match keyword.as_str() {
                "size" => {
                    let (w, h) = parse_two_ints(&line, "size")?;
                    if w < 2 || h < 2 || w as usize > MAX_DIM || h as usize > MAX_DIM {
                        return Err(SolveError::InvalidPuzzle {
                            reason: format!(
                                "size must be between 2x2 and {MAX_DIM}x{MAX_DIM}, got {w}x{h}"
                            ),
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
                    tiles = vec![0u32; width * height];
                    for y in 0..height {
                        let row = reader.next_map_line()?;
                        parse_tile_row(&row, width, &mut tiles[y * width..(y + 1) * width])?;
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

        let n = width * height;
        // The board must be a permutation of 0..n.
        let mut seen = vec![false; n];
        for &t in &tiles {
            if t as usize >= n || seen[t as usize] {
                return Err(SolveError::InvalidPuzzle {
                    reason: format!("input must contain each number from 0 to {} once", n - 1),
                });
            }
            seen[t as usize] = true;
        }

        let ranker = FactorialRanker::new();
        let exact = ranker.factorial(n);
        let mut estimate = 1.0f64;
        for i in 2..=n {
            estimate *= i as f64;
        }
        if !counts_agree(exact, estimate) {
            return Err(SolveError::InvalidPuzzle {
                reason: "state space too large".to_string(),
            });
        }
        let state_width = width_for(exact - 1);

        let has_goal = tiles
            .iter()
            .enumerate()
            .any(|(k, &t)| t as usize != (k + 1) % n);

        if !solvable(&tiles, width, height) {
            return Err(SolveError::InvalidPuzzle {
                reason: "unsolvable input state".to_string(),
            });
        }

        let start = NPuzzleConfig {
            tiles,
            scratch: Vec::with_capacity(n),
        };

        Ok(NPuzzleInstance {
            width,
            height,
            n,
            ranker,
            state_count: exact,
            state_width,
            has_goal,
            start,
        })
    }

    pub fn state_count(&self) -> u64 {
        self.state_count
    }

    fn won(&self, cfg: &NPuzzleConfig) -> bool {
        if !self.has_goal {
            return false;
        }
        cfg.tiles
            .iter()
            .enumerate()
            .all(|(k, &t)| t as usize == (k + 1) % self.n)
    }
}

fn parse_tile_row(row: &str, width: usize, out: &mut [u32]) -> Result<(), SolveError> {
    let chars: Vec<char> = row.chars().collect();
    let mut at = 0usize;
    for slot in out.iter_mut().take(width) {
        let c = *chars.get(at).ok_or_else(|| SolveError::InvalidPuzzle {
            reason: "map row too short".to_string(),
        })?;
        at += 1;
        *slot = match c {
            '{' => {
                let mut val = 0u32;
                let mut any = false;
                while let Some(d) = chars.get(at).and_then(|c| c.to_digit(10)) {
                    val = val * 10 + d;
                    any = true;
                    at += 1;
                }
                if !any || chars.get(at) != Some(&'}') {
                    return Err(SolveError::InvalidPuzzle {
                        reason: "expected {number} in map".to_string(),
                    });
                }
                at += 1;
                val
            }
            '0'..='9' => c as u32 - '0' as u32,
            'A'..='Z' => c as u32 - 'A' as u32 + 10,
            'a'..='z' => c as u32 - 'a' as u32 + 36,
            ' ' => 0,
            other => {
                return Err(SolveError::InvalidPuzzle {
                    reason: format!("illegal map character {other:?}"),
                })
            }
        };
    }
    Ok(())
}

/// Solvable iff the permutation parity and the blank's Manhattan distance to
/// the lower-right corner have matching parity.
fn solvable(tiles: &[u32], width: usize, height: usize) -> bool {
    let blank = tiles.iter().position(|&t| t == 0).expect("blank exists");
    let (bx, by) = (blank % width, blank / width);
    let blank_dist = (width - 1 - bx) + (height - 1 - by);

    // Permutation parity over the non-blank tiles via cycle decomposition.
    let mut perm: Vec<i64> = tiles
        .iter()
        .filter(|&&t| t != 0)
        .map(|&t| t as i64 - 1)
        .collect();
    let mut transpositions = 0usize;
    for i in 0..perm.len() {
        if perm[i] < 0 || perm[i] == i as i64 {
            continue;
        }
        let mut k = i;
        while perm[k] >= 0 {
            let next = perm[k] as usize;
            perm[k] = -1;
            k = next;
            if perm[k] >= 0 {
                transpositions += 1;
            }
        }
    }

    (blank_dist + transpositions) % 2 == 0
}

impl Domain for NPuzzleInstance {
    type Config = NPuzzleConfig;

    fn start_config(&self) -> NPuzzleConfig {
        self.start.clone()
    }

    fn state_bytes(&self) -> usize {
        self.state_width
    }

    fn max_rank(&self) -> StateBytes {
        StateBytes::from_value(self.state_count - 1, self.state_width)
    }

    fn encode(&self, cfg: &mut NPuzzleConfig) -> Result<StateBytes, SolveError> {
        let v = self.ranker.rank(&cfg.tiles);
        if v >= self.state_count {
            return Err(SolveError::Corrupt {
                stage: "npuzzle_encode",
                detail: format!("rank {v} exceeds state count {}", self.state_count),
            });
        }
        Ok(StateBytes::from_value(v, self.state_width))
    }

    fn decode(&self, cfg: &mut NPuzzleConfig, bytes: &[u8]) -> Result<(), SolveError> {
        if bytes.len() != self.state_width {
            return Err(SolveError::Corrupt {
                stage: "npuzzle_decode",
                detail: format!(
                    "state is {} bytes, expected {}",
                    bytes.len(),
                    self.state_width
                ),
            });
        }
        let v = value_of(bytes);
        if v >= self.state_count {
            return Err(SolveError::Corrupt {
                stage: "npuzzle_decode",
                detail: format!("rank {v} exceeds state count {}", self.state_count),
            });
        }
        self.ranker.unrank(v, self.n, &mut cfg.scratch);
        cfg.tiles.clear();
        cfg.tiles.extend_from_slice(&cfg.scratch);
        Ok(())
    }

    fn is_won(&self, cfg: &NPuzzleConfig) -> bool {
        self.won(cfg)
    }

    fn try_for_each_neighbour<E, F>(&self, cfg: &mut NPuzzleConfig, mut f: F) -> Result<(), E>
    where
        E: From<SolveError>,
        F: FnMut(Neighbour) -> Result<(), E>,
    {
        let blank = cfg
            .tiles
            .iter()
            .position(|&t| t == 0)
            .ok_or_else(|| SolveError::Corrupt {
                stage: "npuzzle_neighbours",
                detail: "configuration has no blank".to_string(),
            })
            .map_err(E::from)?;
        let (bx, by) = ((blank % self.width) as i32, (blank / self.width) as i32);
        for d in Dir::ALL {
            let (dx, dy) = d.delta();
            let (nx, ny) = (bx + dx, by + dy);
            if nx < 0 || ny < 0 || nx >= self.width as i32 || ny >= self.height as i32 {
                continue;
            }
            let other = ny as usize * self.width + nx as usize;
            cfg.tiles.swap(blank, other);
            let emitted = match self.encode(cfg) {
                Ok(bytes) => f(Neighbour {
                    bytes,
                    winning: self.won(cfg),
                }),
                Err(e) => Err(E::from(e)),
            };
            cfg.tiles.swap(blank, other);
            emitted?;
        }
        Ok(())
    }

    fn render(&self, cfg: &NPuzzleConfig) -> String {
        let mut out = String::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let t = cfg.tiles[y * self.width + x];
                out.push_str(&format!("{t:3}"));
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_2X2: &str = "size 2 2\nmap\n31\n2 \n";

    #[test]
    fn parses_and_sizes() {
        let inst = NPuzzleInstance::load(START_2X2.as_bytes()).unwrap();
        assert_eq!(inst.state_count(), 24);
        assert_eq!(inst.state_bytes(), 1);
        assert_eq!(inst.start.tiles, vec![3, 1, 2, 0]);
        assert!(inst.has_goal);
    }

    #[test]
    fn goal_input_runs_in_exhaust_mode() {
        let inst = NPuzzleInstance::load("size 2 2\nmap\n12\n3 \n".as_bytes()).unwrap();
        assert!(!inst.has_goal);
        assert!(!inst.is_won(&inst.start_config()));
    }

    #[test]
    fn wrong_parity_is_rejected() {
        let err = NPuzzleInstance::load("size 2 2\nmap\n21\n3 \n".as_bytes());
        assert!(err.is_err());
    }

    #[test]
    fn codec_is_an_exact_bijection() {
        let inst = NPuzzleInstance::load(START_2X2.as_bytes()).unwrap();
        let mut cfg = inst.start_config();
        for x in 0..inst.state_count() {
            inst.decode(&mut cfg, StateBytes::from_value(x, 1).as_slice())
                .unwrap();
            assert_eq!(inst.encode(&mut cfg).unwrap().value(), x);
        }
    }

    #[test]
    fn blank_moves_in_two_directions_from_the_corner() {
        let inst = NPuzzleInstance::load(START_2X2.as_bytes()).unwrap();
        let mut cfg = inst.start_config();
        let mut seen = Vec::new();
        inst.try_for_each_neighbour::<SolveError, _>(&mut cfg, |nb| {
            seen.push(nb);
            Ok(())
        })
        .unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(cfg.tiles, vec![3, 1, 2, 0]);
    }

    #[test]
    fn literal_number_tokens_parse() {
        let inst =
            NPuzzleInstance::load("size 2 2\nmap\n{3}{1}\n{2}{0}\n".as_bytes()).unwrap();
        assert_eq!(inst.start.tiles, vec![3, 1, 2, 0]);
    }
}

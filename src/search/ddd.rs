//! BFS with delayed duplicate detection.
//!
//! No bit-per-state array and no parent links: the engine keeps three sorted
//! runs in one contiguous byte buffer — `prevprev` (everything two or more
//! generations back), `prev` (one generation back) and `cur` (the generation
//! being produced) — and removes duplicates in batches with linear merges.
//! The buffer size bounds how deep the search can go; running out of space
//! even after repacking is an explicit failure.
//!
//! On undirected graphs the parent generation is the only possible source of
//! duplicates besides the grandparent one, so `prevprev` can be discarded
//! each generation instead of being accumulated.
//!
//! Solution output is not supported (no parent information is stored); a win
//! reports the move count only.

use crate::core::bytes::MAX_STATE_BYTES;
use crate::domain::{Domain, SolveError};
use crate::search::records::{remove_duplicates2, sort_dedup};
use crate::search::{reserve_exact, SearchOutcome, SearchReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphClass {
    Directed,
    Undirected,
}

#[derive(Debug, Clone)]
pub struct DddOptions {
    /// Size of the single state buffer, in bytes.
    pub buffer_bytes: usize,
    pub graph: GraphClass,
    /// Print one progress line per generation to stderr.
    pub verbose: bool,
}

impl Default for DddOptions {
    fn default() -> Self {
        DddOptions {
            buffer_bytes: 50 << 20,
            graph: GraphClass::Directed,
            verbose: false,
        }
    }
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

/// Buffer bookkeeping. All offsets are byte offsets, all counts are record
/// counts; `prevprev` always starts at offset 0.
struct Runs {
    buf: Vec<u8>,
    width: usize,
    pp_n: usize,
    p_start: usize,
    p_n: usize,
    c_start: usize,
    /// Sorted, deduplicated records at the front of `cur` (built by repacks).
    c_sorted: usize,
    /// Raw records appended after the sorted part.
    c_unsorted: usize,
    repacks: u32,
}

impl Runs {
    fn cur_end(&self) -> usize {
        self.c_start + (self.c_sorted + self.c_unsorted) * self.width
    }

    fn append(&mut self, bytes: &[u8]) -> Result<(), SolveError> {
        if self.cur_end() == self.buf.len() {
            self.repack()?;
        }
        let at = self.cur_end();
        self.buf[at..at + self.width].copy_from_slice(bytes);
        self.c_unsorted += 1;
        Ok(())
    }

    /// The current generation overflowed the buffer: sort the raw tail,
    /// drop everything already seen, and fold it into the sorted part.
    fn repack(&mut self) -> Result<(), SolveError> {
        let tail_start = self.c_start + self.c_sorted * self.width;
        self.c_unsorted = sort_dedup(&mut self.buf, self.width, tail_start, self.c_unsorted);
        self.c_unsorted = remove_duplicates2(
            &mut self.buf,
            self.width,
            0,
            self.pp_n,
            self.p_start,
            self.p_n,
            tail_start,
            self.c_unsorted,
        );
        if self.repacks > 0 {
            self.c_sorted = sort_dedup(
                &mut self.buf,
                self.width,
                self.c_start,
                self.c_sorted + self.c_unsorted,
            );
        } else {
            self.c_sorted = self.c_unsorted;
        }
        self.c_unsorted = 0;
        self.repacks += 1;
        if self.cur_end() + self.width > self.buf.len() {
            return Err(SolveError::CapacityExceeded {
                stage: "ddd_repack",
                detail: format!("buffer still full after {} repacks", self.repacks),
            });
        }
        Ok(())
    }
}

pub fn solve<D: Domain>(domain: &D, options: &DddOptions) -> Result<SearchOutcome, SolveError> {
    let width = domain.state_bytes();
    if width > MAX_STATE_BYTES {
        return Err(SolveError::CapacityExceeded {
            stage: "ddd_init",
            detail: format!("state size {width} bytes exceeds {MAX_STATE_BYTES}"),
        });
    }
    let capacity = (options.buffer_bytes / width) * width;
    if capacity < 2 * width {
        return Err(SolveError::CapacityExceeded {
            stage: "ddd_init",
            detail: "buffer too small for even two states".to_string(),
        });
    }

    let mut buf: Vec<u8> = Vec::new();
    reserve_exact(&mut buf, capacity, "ddd_init", "state buffer")?;
    buf.resize(capacity, 0);

    let mut cfg = domain.start_config();
    let start = domain.encode(&mut cfg)?;
    buf[..width].copy_from_slice(start.as_slice());

    let mut runs = Runs {
        buf,
        width,
        pp_n: 0,
        p_start: 0,
        p_n: 1,
        c_start: width,
        c_sorted: 0,
        c_unsorted: 0,
        repacks: 0,
    };

    let mut iter = 0u64;
    let mut total = 1u64;
    let mut generations: Vec<u64> = Vec::new();
    let mut record = [0u8; MAX_STATE_BYTES];
    let mut won = false;

    while runs.p_n > 0 {
        generations.push(runs.p_n as u64);
        if options.verbose {
            eprintln!("{iter}: queue {} total {total}", runs.p_n);
        }
        runs.c_sorted = 0;
        runs.c_unsorted = 0;
        runs.repacks = 0;

        'expand: for i in 0..runs.p_n {
            let at = runs.p_start + i * width;
            record[..width].copy_from_slice(&runs.buf[at..at + width]);
            domain.decode(&mut cfg, &record[..width])?;
            let walk = domain.try_for_each_neighbour::<Stop, _>(&mut cfg, |nb| {
                // Order matters: make room first, then test the goal, then
                // store; a winning child is reported, never queued.
                if runs.cur_end() == runs.buf.len() {
                    runs.repack()?;
                }
                if nb.winning {
                    return Err(Stop::Won);
                }
                runs.append(nb.bytes.as_slice())?;
                Ok(())
            });
            match walk {
                Ok(()) => {}
                Err(Stop::Won) => {
                    won = true;
                    break 'expand;
                }
                Err(Stop::Fault(e)) => return Err(e),
            }
        }
        if won {
            break;
        }

        // Close the generation: sort what was produced, drop everything
        // already seen.
        let mut c_n = sort_dedup(
            &mut runs.buf,
            width,
            runs.c_start,
            runs.c_sorted + runs.c_unsorted,
        );
        c_n = remove_duplicates2(
            &mut runs.buf,
            width,
            0,
            runs.pp_n,
            runs.p_start,
            runs.p_n,
            runs.c_start,
            c_n,
        );

        match options.graph {
            GraphClass::Directed => {
                // Fold prev into the accumulated history; cur becomes prev.
                runs.pp_n = sort_dedup(&mut runs.buf, width, 0, runs.pp_n + runs.p_n);
                runs.p_start = runs.pp_n * width;
                runs.p_n = c_n;
                runs.c_start = runs.p_start + runs.p_n * width;
            }
            GraphClass::Undirected => {
                // Drop the old prevprev: slide prev + cur to the buffer
                // start; cur becomes prev, prev becomes prevprev.
                let keep = (runs.p_n + c_n) * width;
                runs.buf.copy_within(runs.p_start..runs.p_start + keep, 0);
                runs.pp_n = runs.p_n;
                runs.p_start = runs.pp_n * width;
                runs.p_n = c_n;
                runs.c_start = runs.p_start + runs.p_n * width;
            }
        }

        total += c_n as u64;
        iter += 1;
    }

    let solution_moves = if won { Some(iter + 1) } else { None };
    if options.verbose {
        match solution_moves {
            Some(m) => eprintln!("won in {m} moves"),
            None => eprintln!("search exhausted, {total} states"),
        }
    }

    Ok(SearchOutcome {
        report: SearchReport {
            states_reached: total,
            generations,
            solution_moves,
        },
        solution: None,
    })
}

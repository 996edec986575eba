//! Disk-swapping BFS.
//!
//! Keeps only the visited bitmap resident (one bit per state, lazily
//! allocated in blocks) plus two fixed byte buffers; every discovered
//! generation is streamed to its `GEN-gggg` file and read back linearly when
//! it is expanded. Duplicates are caught immediately against the bitmap, so
//! the files partition the reachable states by BFS depth.
//!
//! The forward sweep stops as soon as a winning child is discovered; the
//! solution is then recovered by the backward scan over the generation
//! files.

use std::path::PathBuf;

use crate::core::bytes::StateBytes;
use crate::domain::{Domain, SolveError};
use crate::search::bitmap::Bitmap;
use crate::search::frontier::{create_gen_file, file_size, gen_path, FrontierReader, OutBuffer};
use crate::search::{checked_state_count, reconstruct, reserve_exact, SearchOutcome, SearchReport};

#[derive(Debug, Clone)]
pub struct DiskOptions {
    /// Directory the `GEN-gggg` files are kept in.
    pub dir: PathBuf,
    /// Buffer for reading the previous generation, in bytes.
    pub in_buffer_bytes: usize,
    /// Buffer accumulating the next generation, in bytes.
    pub out_buffer_bytes: usize,
    /// Visited-bitmap block-size exponent; 0 means a single block.
    pub block_bits: u32,
    pub verbose: bool,
}

impl Default for DiskOptions {
    fn default() -> Self {
        DiskOptions {
            dir: PathBuf::from("."),
            in_buffer_bytes: 50 << 20,
            out_buffer_bytes: 50 << 20,
            block_bits: 0,
            verbose: false,
        }
    }
}

enum Stop {
    Won(StateBytes),
    Fault(SolveError),
}

impl From<SolveError> for Stop {
    fn from(e: SolveError) -> Stop {
        Stop::Fault(e)
    }
}

pub fn solve<D: Domain>(domain: &D, options: &DiskOptions) -> Result<SearchOutcome, SolveError> {
    let width = domain.state_bytes();
    let n = checked_state_count(domain.max_rank(), width, "disk_init")?;

    let mut visited = Bitmap::new(n, options.block_bits);
    let in_capacity = ((options.in_buffer_bytes / width) * width).max(width);
    let mut in_buf: Vec<u8> = Vec::new();
    reserve_exact(&mut in_buf, in_capacity, "disk_init", "in-buffer")?;
    in_buf.resize(in_capacity, 0);
    let mut out = OutBuffer::new(options.out_buffer_bytes, width)?;

    let mut cfg = domain.start_config();
    let start = domain.encode(&mut cfg)?;
    visited.test_and_set(start.value())?;
    create_gen_file(&options.dir, 0)?;
    out.retarget(&options.dir, 0);
    out.push(start.as_slice())?;
    out.flush()?;

    let mut total = 0u64;
    let mut generations: Vec<u64> = Vec::new();
    let mut win: Option<(StateBytes, u32)> = None;

    'gens: for gen in 0u32.. {
        let len = file_size(&gen_path(&options.dir, gen))?;
        create_gen_file(&options.dir, gen + 1)?;
        out.retarget(&options.dir, gen + 1);
        let in_gen = len / width as u64;
        total += in_gen;
        if options.verbose {
            eprintln!("{gen}: q {in_gen} tot {total}");
        }
        if len == 0 {
            break;
        }
        generations.push(in_gen);

        let mut reader = FrontierReader::open(&options.dir, gen, width)?;
        loop {
            let got = reader.next_chunk(&mut in_buf)?;
            if got == 0 {
                break;
            }
            for at in (0..got).step_by(width) {
                domain.decode(&mut cfg, &in_buf[at..at + width])?;
                let walk = domain.try_for_each_neighbour::<Stop, _>(&mut cfg, |nb| {
                    let v = nb.bytes.value();
                    if v >= n {
                        return Err(Stop::Fault(SolveError::Corrupt {
                            stage: "disk_expand",
                            detail: format!("encoded rank {v} out of range"),
                        }));
                    }
                    if !visited.test_and_set(v)? {
                        if nb.winning {
                            return Err(Stop::Won(nb.bytes));
                        }
                        out.push(nb.bytes.as_slice())?;
                    }
                    Ok(())
                });
                match walk {
                    Ok(()) => {}
                    Err(Stop::Won(w)) => {
                        win = Some((w, gen));
                        break 'gens;
                    }
                    Err(Stop::Fault(e)) => return Err(e),
                }
            }
        }
        out.flush()?;
    }

    match win {
        Some((w, gen)) => {
            if options.verbose {
                eprintln!("winning state found at depth {}", gen + 1);
            }
            let solution = reconstruct::backward(domain, &mut cfg, &options.dir, w, gen, &mut in_buf)?;
            Ok(SearchOutcome {
                report: SearchReport {
                    states_reached: total,
                    generations,
                    solution_moves: Some(solution.len() as u64 - 1),
                },
                solution: Some(solution),
            })
        }
        None => Ok(SearchOutcome {
            report: SearchReport {
                states_reached: total,
                generations,
                solution_moves: None,
            },
            solution: None,
        }),
    }
}

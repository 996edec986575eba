//! Backward solution reconstruction over the generation files.
//!
//! The disk engines store no parent links. Once a winning state is known,
//! its ancestry is recovered by re-reading the generation files in reverse
//! order: the first state in generation `g` that generates the current
//! target as one of its successors is the parent at depth `g`. Every
//! neighbor enumeration is rerun at most once per scanned state, which is
//! cheap next to the forward search (no duplicate detection happens here).

use std::path::Path;

use crate::core::bytes::StateBytes;
use crate::domain::{Domain, SolveError};
use crate::search::frontier::FrontierReader;

enum Probe {
    Matched,
    Fault(SolveError),
}

impl From<SolveError> for Probe {
    fn from(e: SolveError) -> Probe {
        Probe::Fault(e)
    }
}

/// Walk `GEN-win_gen` down to `GEN-0000`, matching parents of `win` (found
/// while expanding generation `win_gen`). Returns the solution path, start
/// state first, winning state last.
pub fn backward<D: Domain>(
    domain: &D,
    cfg: &mut D::Config,
    dir: &Path,
    win: StateBytes,
    win_gen: u32,
    chunk: &mut [u8],
) -> Result<Vec<StateBytes>, SolveError> {
    let width = domain.state_bytes();
    let mut path = vec![win];
    let mut target = win;

    for gen in (0..=win_gen).rev() {
        let mut reader = FrontierReader::open(dir, gen, width)?;
        let mut matched: Option<StateBytes> = None;

        'file: loop {
            let got = reader.next_chunk(chunk)?;
            if got == 0 {
                break;
            }
            for at in (0..got).step_by(width) {
                let candidate = StateBytes::from_slice(&chunk[at..at + width]);
                domain.decode(cfg, candidate.as_slice())?;
                let probe = domain.try_for_each_neighbour::<Probe, _>(cfg, |nb| {
                    if nb.bytes == target {
                        Err(Probe::Matched)
                    } else {
                        Ok(())
                    }
                });
                match probe {
                    Ok(()) => {}
                    Err(Probe::Matched) => {
                        matched = Some(candidate);
                        break 'file;
                    }
                    Err(Probe::Fault(e)) => return Err(e),
                }
            }
        }

        match matched {
            Some(parent) => {
                path.push(parent);
                target = parent;
            }
            None => {
                return Err(SolveError::Corrupt {
                    stage: "reconstruct_backward",
                    detail: format!("no parent of the solution found in generation {gen}"),
                })
            }
        }
    }

    path.reverse();
    Ok(path)
}

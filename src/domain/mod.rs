//! The contract between puzzle domains and search engines, plus the concrete
//! domains implementing it.
//!
//! A *domain* owns the immutable instance (topology, codec tables, state
//! count) and knows how to move a mutable per-worker *configuration* around:
//! decode a rank into it, enumerate its successors, test the goal. An
//! *engine* drives any domain through the [`Domain`] trait without knowing
//! what the puzzle is.

use std::fmt;
use std::io::BufRead;

use crate::core::bytes::StateBytes;

pub mod npuzzle;
pub mod plank;
pub mod sokoban;

#[derive(Debug)]
pub enum SolveError {
    /// Malformed or unrepresentable puzzle input. Load-time only.
    InvalidPuzzle { reason: String },
    /// A configured or structural limit was hit (state too wide for the
    /// engine, state space too large, queue exhausted).
    CapacityExceeded {
        stage: &'static str,
        detail: String,
    },
    /// An allocation request failed.
    AllocationFailed {
        stage: &'static str,
        structure: &'static str,
    },
    /// File I/O failed in a disk engine.
    Io {
        stage: &'static str,
        path: String,
        error: String,
    },
    /// An internal invariant was breached (encoded rank out of range, missing
    /// parent in a generation file). These are bugs, not user errors.
    Corrupt {
        stage: &'static str,
        detail: String,
    },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::InvalidPuzzle { reason } => write!(f, "invalid puzzle: {reason}"),
            SolveError::CapacityExceeded { stage, detail } => {
                write!(f, "capacity exceeded at {stage}: {detail}")
            }
            SolveError::AllocationFailed { stage, structure } => {
                write!(f, "allocation failed at {stage} for {structure}")
            }
            SolveError::Io { stage, path, error } => {
                write!(f, "io error at {stage} for {path}: {error}")
            }
            SolveError::Corrupt { stage, detail } => {
                write!(f, "internal invariant breached at {stage}: {detail}")
            }
        }
    }
}

impl std::error::Error for SolveError {}

/// A successor produced during neighbor enumeration.
///
/// `winning` is evaluated while the successor's configuration is live, so
/// engines never have to decode a state just to test the goal.
#[derive(Debug, Clone, Copy)]
pub struct Neighbour {
    pub bytes: StateBytes,
    pub winning: bool,
}

/// The interface engines consume.
///
/// The instance itself is immutable after load and may be shared across
/// threads; every concurrent worker owns one `Config` so that decode and
/// neighbor enumeration proceed without contention.
pub trait Domain {
    type Config: Clone + Send;

    /// A fresh configuration holding the start position.
    fn start_config(&self) -> Self::Config;

    /// Serialized width of an encoded state, in bytes.
    fn state_bytes(&self) -> usize;

    /// The largest encoded rank, N - 1, serialized little-endian. N itself
    /// may be an exact power of 2^(8 * state_bytes) and would not fit.
    fn max_rank(&self) -> StateBytes;

    /// Encode the current configuration. Normalizations (facing-direction
    /// pruning) are applied to `cfg` in place before ranking. A produced
    /// rank >= N is a codec bug and reported as [`SolveError::Corrupt`].
    fn encode(&self, cfg: &mut Self::Config) -> Result<StateBytes, SolveError>;

    /// Replace `cfg` with the configuration the given rank decodes to.
    fn decode(&self, cfg: &mut Self::Config, bytes: &[u8]) -> Result<(), SolveError>;

    /// Goal predicate on the current configuration.
    fn is_won(&self, cfg: &Self::Config) -> bool;

    /// Enumerate the successors of `cfg`, feeding each to `f`. The sequence
    /// is finite and not restartable; `cfg` is restored before returning.
    /// Returning `Err` from `f` stops the enumeration early.
    fn try_for_each_neighbour<E, F>(&self, cfg: &mut Self::Config, f: F) -> Result<(), E>
    where
        E: From<SolveError>,
        F: FnMut(Neighbour) -> Result<(), E>;

    /// Human-readable rendering for solution output.
    fn render(&self, cfg: &Self::Config) -> String;
}

/// Reader for the line-oriented puzzle scripts all domains share.
///
/// Lines starting with `#` and blank lines are skipped between directives;
/// map payload lines are read raw. Carriage returns are stripped either way.
pub(crate) struct ScriptReader<R: BufRead> {
    inner: R,
}

impl<R: BufRead> ScriptReader<R> {
    pub fn new(inner: R) -> ScriptReader<R> {
        ScriptReader { inner }
    }

    fn read_line(&mut self, stage: &'static str) -> Result<Option<String>, SolveError> {
        let mut line = String::new();
        let n = self
            .inner
            .read_line(&mut line)
            .map_err(|e| SolveError::Io {
                stage,
                path: "<puzzle input>".to_string(),
                error: e.to_string(),
            })?;
        if n == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Next directive line as (keyword, full line), skipping comments and
    /// blanks. `None` at end of input.
    pub fn next_directive(&mut self) -> Result<Option<(String, String)>, SolveError> {
        loop {
            let line = match self.read_line("puzzle_script_directive")? {
                Some(l) => l,
                None => return Ok(None),
            };
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            let keyword = line.split_whitespace().next().unwrap_or("").to_string();
            return Ok(Some((keyword, line)));
        }
    }

    /// Next raw line (map payload). Missing input is a load error.
    pub fn next_map_line(&mut self) -> Result<String, SolveError> {
        self.read_line("puzzle_script_map")?
            .ok_or_else(|| SolveError::InvalidPuzzle {
                reason: "map ended unexpectedly".to_string(),
            })
    }
}

/// Parse the two integer arguments of a `size`/`goal` style directive.
pub(crate) fn parse_two_ints(line: &str, what: &str) -> Result<(i64, i64), SolveError> {
    let mut it = line.split_whitespace();
    let _keyword = it.next();
    let a = it.next().and_then(|t| t.parse::<i64>().ok());
    let b = it.next().and_then(|t| t.parse::<i64>().ok());
    match (a, b) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(SolveError::InvalidPuzzle {
            reason: format!("wrong parameters for {what}"),
        }),
    }
}

//! Multithreaded disk BFS.
//!
//! One master plus `threads` workers. The master owns all file I/O: it
//! streams the previous generation into the shared in-buffer chunk by chunk
//! and rolls generations over; the workers split each chunk by stride (worker
//! `w` takes every `threads`-th state starting at `w`) and expand it through
//! their own configurations.
//!
//! Synchronization:
//! - a barrier with `threads + 1` participants, crossed twice per chunk
//!   (chunk published, chunk drained);
//! - one mutex per visited-bitmap block (test-and-set plus lazy allocation);
//! - one mutex guarding the winning-state record;
//! - one mutex guarding the shared out-buffer and its flushes (per-worker
//!   out-buffers would remove this serialization point; future work).
//!
//! The states discovered at each depth are exactly the serial disk engine's;
//! only their order inside a generation file is scheduling-dependent. After
//! a win everything drains cooperatively and the master reconstructs the
//! solution single-threaded.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Barrier, Mutex, RwLock};

use crate::core::bytes::StateBytes;
use crate::domain::{Domain, SolveError};
use crate::search::bitmap::SharedBitmap;
use crate::search::frontier::{create_gen_file, file_size, gen_path, FrontierReader, OutBuffer};
use crate::search::{checked_state_count, reconstruct, reserve_exact, SearchOutcome, SearchReport};

const MAX_THREADS: usize = 512;

#[derive(Debug, Clone)]
pub struct ParallelOptions {
    /// Worker thread count (the master is not included).
    pub threads: usize,
    pub dir: PathBuf,
    pub in_buffer_bytes: usize,
    pub out_buffer_bytes: usize,
    /// Visited-bitmap block-size exponent; 0 means a single block.
    pub block_bits: u32,
    pub verbose: bool,
}

impl Default for ParallelOptions {
    fn default() -> Self {
        ParallelOptions {
            threads: 4,
            dir: PathBuf::from("."),
            in_buffer_bytes: 400 << 20,
            out_buffer_bytes: 50 << 20,
            block_bits: 20,
            verbose: false,
        }
    }
}

struct Shared<'a, D> {
    domain: &'a D,
    n: u64,
    width: usize,
    threads: usize,
    in_buf: RwLock<Vec<u8>>,
    /// Bytes of the in-buffer holding the published chunk.
    grab: AtomicUsize,
    out: Mutex<OutBuffer>,
    visited: SharedBitmap,
    win: Mutex<Option<StateBytes>>,
    found: AtomicBool,
    fault: Mutex<Option<SolveError>>,
    faulted: AtomicBool,
    quit: AtomicBool,
    barrier: Barrier,
}

fn record_fault<D>(shared: &Shared<'_, D>, e: SolveError) {
    if let Ok(mut slot) = shared.fault.lock() {
        if slot.is_none() {
            *slot = Some(e);
        }
    }
    shared.faulted.store(true, Ordering::SeqCst);
}

fn lock_poisoned(what: &'static str) -> SolveError {
    SolveError::Corrupt {
        stage: "parallel_lock",
        detail: format!("{what} lock poisoned"),
    }
}

fn worker<D: Domain>(shared: &Shared<'_, D>, id: usize) {
    let mut cfg = shared.domain.start_config();
    let width = shared.width;
    loop {
        shared.barrier.wait();
        if shared.quit.load(Ordering::SeqCst) {
            break;
        }
        match shared.in_buf.read() {
            Ok(guard) => {
                let grab = shared.grab.load(Ordering::SeqCst);
                let mut at = id * width;
                while at < grab {
                    if shared.found.load(Ordering::SeqCst) || shared.faulted.load(Ordering::SeqCst)
                    {
                        break;
                    }
                    if let Err(e) = expand_one(shared, &mut cfg, &guard[at..at + width]) {
                        record_fault(shared, e);
                        break;
                    }
                    at += width * shared.threads;
                }
            }
            Err(_) => record_fault(shared, lock_poisoned("in-buffer")),
        }
        shared.barrier.wait();
    }
}

fn expand_one<D: Domain>(
    shared: &Shared<'_, D>,
    cfg: &mut D::Config,
    state: &[u8],
) -> Result<(), SolveError> {
    shared.domain.decode(cfg, state)?;
    shared
        .domain
        .try_for_each_neighbour::<SolveError, _>(cfg, |nb| {
            if shared.found.load(Ordering::SeqCst) {
                return Ok(());
            }
            let v = nb.bytes.value();
            if v >= shared.n {
                return Err(SolveError::Corrupt {
                    stage: "parallel_expand",
                    detail: format!("encoded rank {v} out of range"),
                });
            }
            if shared.visited.test_and_set(v)? {
                return Ok(());
            }
            {
                let mut win = shared.win.lock().map_err(|_| lock_poisoned("solution"))?;
                if shared.found.load(Ordering::SeqCst) {
                    return Ok(());
                }
                if nb.winning {
                    *win = Some(nb.bytes);
                    shared.found.store(true, Ordering::SeqCst);
                    return Ok(());
                }
            }
            let mut out = shared.out.lock().map_err(|_| lock_poisoned("out-buffer"))?;
            out.push(nb.bytes.as_slice())?;
            Ok(())
        })
}

pub fn solve<D: Domain + Sync>(
    domain: &D,
    options: &ParallelOptions,
) -> Result<SearchOutcome, SolveError> {
    if options.threads < 1 || options.threads > MAX_THREADS {
        return Err(SolveError::CapacityExceeded {
            stage: "parallel_init",
            detail: format!("thread count must be between 1 and {MAX_THREADS}"),
        });
    }
    let width = domain.state_bytes();
    let n = checked_state_count(domain.max_rank(), width, "parallel_init")?;

    let in_capacity = ((options.in_buffer_bytes / width) * width).max(width);
    let mut in_buf: Vec<u8> = Vec::new();
    reserve_exact(&mut in_buf, in_capacity, "parallel_init", "in-buffer")?;
    in_buf.resize(in_capacity, 0);

    let shared = Shared {
        domain,
        n,
        width,
        threads: options.threads,
        in_buf: RwLock::new(in_buf),
        grab: AtomicUsize::new(0),
        out: Mutex::new(OutBuffer::new(options.out_buffer_bytes, width)?),
        visited: SharedBitmap::new(n, options.block_bits),
        win: Mutex::new(None),
        found: AtomicBool::new(false),
        fault: Mutex::new(None),
        faulted: AtomicBool::new(false),
        quit: AtomicBool::new(false),
        barrier: Barrier::new(options.threads + 1),
    };

    let mut cfg = domain.start_config();
    let start = domain.encode(&mut cfg)?;
    shared.visited.test_and_set(start.value())?;
    create_gen_file(&options.dir, 0)?;
    {
        let mut out = shared.out.lock().map_err(|_| lock_poisoned("out-buffer"))?;
        out.retarget(&options.dir, 0);
        out.push(start.as_slice())?;
        out.flush()?;
    }

    let mut total = 0u64;
    let mut generations: Vec<u64> = Vec::new();
    let mut win_gen = 0u32;

    let master_result: Result<(), SolveError> = std::thread::scope(|scope| {
        for id in 0..options.threads {
            let shared = &shared;
            scope.spawn(move || worker(shared, id));
        }

        // Everything the master does between barrier crossings; errors must
        // still release the workers, so the quit handshake runs afterwards
        // no matter how this block exits.
        let run = (|| -> Result<(), SolveError> {
            'gens: for gen in 0u32.. {
                let len = file_size(&gen_path(&options.dir, gen))?;
                create_gen_file(&options.dir, gen + 1)?;
                {
                    let mut out = shared.out.lock().map_err(|_| lock_poisoned("out-buffer"))?;
                    out.retarget(&options.dir, gen + 1);
                }
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
                    let got = {
                        let mut buf = shared
                            .in_buf
                            .write()
                            .map_err(|_| lock_poisoned("in-buffer"))?;
                        reader.next_chunk(&mut buf)?
                    };
                    if got == 0 {
                        break;
                    }
                    shared.grab.store(got, Ordering::SeqCst);
                    shared.barrier.wait();
                    shared.barrier.wait();
                    if shared.faulted.load(Ordering::SeqCst) {
                        break 'gens;
                    }
                }
                {
                    let mut out = shared.out.lock().map_err(|_| lock_poisoned("out-buffer"))?;
                    out.flush()?;
                }
                if shared.found.load(Ordering::SeqCst) {
                    win_gen = gen;
                    break;
                }
            }
            Ok(())
        })();

        shared.quit.store(true, Ordering::SeqCst);
        shared.barrier.wait();
        run
    });

    master_result?;
    if let Ok(mut fault) = shared.fault.lock() {
        if let Some(e) = fault.take() {
            return Err(e);
        }
    }

    let win = shared
        .win
        .lock()
        .map_err(|_| lock_poisoned("solution"))?
        .take();
    match win {
        Some(w) => {
            if options.verbose {
                eprintln!("winning state found at depth {}", win_gen + 1);
            }
            let mut chunk = shared.in_buf.write().map_err(|_| lock_poisoned("in-buffer"))?;
            let solution =
                reconstruct::backward(domain, &mut cfg, &options.dir, w, win_gen, &mut chunk)?;
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

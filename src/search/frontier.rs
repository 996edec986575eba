//! Per-generation frontier files.
//!
//! Generation `g` lives in a file named `GEN-gggg` (four-digit zero-padded
//! decimal): a bare concatenation of encoded states, each exactly
//! `state_bytes` little-endian bytes. No header, no separators. Files are
//! written append-only and read strictly linearly.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::domain::SolveError;
use crate::search::reserve_exact;

pub fn gen_file_name(gen: u32) -> String {
    format!("GEN-{gen:04}")
}

pub fn gen_path(dir: &Path, gen: u32) -> PathBuf {
    dir.join(gen_file_name(gen))
}

fn io_err(stage: &'static str, path: &Path, e: std::io::Error) -> SolveError {
    SolveError::Io {
        stage,
        path: path.display().to_string(),
        error: e.to_string(),
    }
}

/// Create (or truncate) the file for generation `gen`.
pub fn create_gen_file(dir: &Path, gen: u32) -> Result<(), SolveError> {
    let path = gen_path(dir, gen);
    File::create(&path).map_err(|e| io_err("frontier_create", &path, e))?;
    Ok(())
}

pub fn file_size(path: &Path) -> Result<u64, SolveError> {
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| io_err("frontier_size", path, e))
}

/// Accumulates the next generation's states and appends them to its file
/// whenever the buffer fills.
pub struct OutBuffer {
    buf: Vec<u8>,
    used: usize,
    width: usize,
    path: PathBuf,
    pub flushes: u64,
}

impl OutBuffer {
    pub fn new(capacity_bytes: usize, width: usize) -> Result<OutBuffer, SolveError> {
        let capacity = ((capacity_bytes / width) * width).max(width);
        let mut buf = Vec::new();
        reserve_exact(&mut buf, capacity, "frontier_out", "out-buffer")?;
        buf.resize(capacity, 0);
        Ok(OutBuffer {
            buf,
            used: 0,
            width,
            path: PathBuf::new(),
            flushes: 0,
        })
    }

    /// Point the buffer at generation `gen`'s file. Any unflushed states
    /// must have been flushed by the caller.
    pub fn retarget(&mut self, dir: &Path, gen: u32) {
        debug_assert_eq!(self.used, 0);
        self.path = gen_path(dir, gen);
    }

    pub fn push(&mut self, state: &[u8]) -> Result<(), SolveError> {
        debug_assert_eq!(state.len(), self.width);
        if self.used == self.buf.len() {
            self.flush()?;
        }
        self.buf[self.used..self.used + self.width].copy_from_slice(state);
        self.used += self.width;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SolveError> {
        if self.used == 0 {
            return Ok(());
        }
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| io_err("frontier_append", &self.path, e))?;
        f.write_all(&self.buf[..self.used])
            .map_err(|e| io_err("frontier_append", &self.path, e))?;
        self.used = 0;
        self.flushes += 1;
        Ok(())
    }
}

/// Reads a generation file in buffer-sized chunks, always a whole number of
/// states at a time.
pub struct FrontierReader {
    file: File,
    path: PathBuf,
    remaining: u64,
    width: usize,
}

impl FrontierReader {
    pub fn open(dir: &Path, gen: u32, width: usize) -> Result<FrontierReader, SolveError> {
        let path = gen_path(dir, gen);
        let len = file_size(&path)?;
        if len % width as u64 != 0 {
            return Err(SolveError::Corrupt {
                stage: "frontier_open",
                detail: format!(
                    "{} holds {len} bytes, not a multiple of the state width {width}",
                    path.display()
                ),
            });
        }
        let file = File::open(&path).map_err(|e| io_err("frontier_open", &path, e))?;
        Ok(FrontierReader {
            file,
            path,
            remaining: len,
            width,
        })
    }

    /// Fill `buf` with the next chunk; returns the number of bytes read, 0
    /// at end of file. Always a multiple of the state width.
    pub fn next_chunk(&mut self, buf: &mut [u8]) -> Result<usize, SolveError> {
        debug_assert!(buf.len() % self.width == 0 && !buf.is_empty());
        let grab = (self.remaining.min(buf.len() as u64)) as usize;
        if grab == 0 {
            return Ok(0);
        }
        self.file
            .read_exact(&mut buf[..grab])
            .map_err(|e| io_err("frontier_read", &self.path, e))?;
        self.remaining -= grab as u64;
        Ok(grab)
    }
}

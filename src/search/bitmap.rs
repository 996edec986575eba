//! One visited bit per state, split into lazily allocated blocks.
//!
//! The bit array for `N` states is divided into `2^m`-bit blocks; a block is
//! only materialized when the search first touches a state inside it, so
//! sparse regions of the rank space (deadlock holes, unreachable parity
//! classes) cost a pointer each. `m = 0` selects a single block spanning the
//! whole range. No block is ever freed during a run.
//!
//! [`SharedBitmap`] is the multithreaded variant: one mutex per block, so
//! the block-size exponent doubles as the lock-granularity knob.

use std::sync::Mutex;

use crate::domain::SolveError;

#[derive(Debug, Clone, Copy)]
pub struct BitmapLayout {
    /// log2 of bits per block.
    block_bits_log2: u32,
    blocks: usize,
}

impl BitmapLayout {
    /// Layout for `n` states with `2^m`-bit blocks; `m = 0` means one block
    /// covering everything (rounded up to a power of two, as allocation
    /// granularity only).
    pub fn new(n: u64, m: u32) -> BitmapLayout {
        let block_bits_log2 = if m == 0 {
            let mut b = 0u32;
            while 1u64 << b < n {
                b += 1;
            }
            b
        } else {
            m
        };
        let block_size = 1u64 << block_bits_log2;
        let blocks = n.div_ceil(block_size) as usize;
        BitmapLayout {
            block_bits_log2,
            blocks,
        }
    }

    #[inline]
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    #[inline]
    pub fn block_of(&self, state: u64) -> usize {
        (state >> self.block_bits_log2) as usize
    }

    #[inline]
    fn offset_of(&self, state: u64) -> usize {
        (state & ((1u64 << self.block_bits_log2) - 1)) as usize
    }

    #[inline]
    fn block_bytes(&self) -> usize {
        (((1u64 << self.block_bits_log2) + 7) / 8) as usize
    }

    fn alloc_block(&self) -> Result<Box<[u8]>, SolveError> {
        let bytes = self.block_bytes();
        let mut v: Vec<u8> = Vec::new();
        v.try_reserve_exact(bytes)
            .map_err(|_| SolveError::AllocationFailed {
                stage: "bitmap_block",
                structure: "visited sub-block",
            })?;
        v.resize(bytes, 0);
        Ok(v.into_boxed_slice())
    }
}

/// Single-threaded lazily allocated visited bitmap.
pub struct Bitmap {
    layout: BitmapLayout,
    blocks: Vec<Option<Box<[u8]>>>,
}

impl Bitmap {
    pub fn new(n: u64, m: u32) -> Bitmap {
        let layout = BitmapLayout::new(n, m);
        let blocks = (0..layout.blocks()).map(|_| None).collect();
        Bitmap { layout, blocks }
    }

    pub fn test(&self, state: u64) -> bool {
        let block = match &self.blocks[self.layout.block_of(state)] {
            Some(b) => b,
            None => return false,
        };
        let off = self.layout.offset_of(state);
        block[off >> 3] & (1 << (off & 7)) != 0
    }

    /// Set the bit, allocating the block on first touch. Returns the
    /// previous value.
    pub fn test_and_set(&mut self, state: u64) -> Result<bool, SolveError> {
        let slot = &mut self.blocks[self.layout.block_of(state)];
        if slot.is_none() {
            *slot = Some(self.layout.alloc_block()?);
        }
        let block = slot.as_mut().expect("block just allocated");
        let off = self.layout.offset_of(state);
        let mask = 1u8 << (off & 7);
        let was = block[off >> 3] & mask != 0;
        block[off >> 3] |= mask;
        Ok(was)
    }

    /// Number of materialized blocks, for reporting.
    pub fn allocated_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_some()).count()
    }
}

/// Thread-safe variant: one lock per block, so contention is configurable
/// through the block-size exponent.
pub struct SharedBitmap {
    layout: BitmapLayout,
    blocks: Vec<Mutex<Option<Box<[u8]>>>>,
}

impl SharedBitmap {
    pub fn new(n: u64, m: u32) -> SharedBitmap {
        let layout = BitmapLayout::new(n, m);
        let blocks = (0..layout.blocks()).map(|_| Mutex::new(None)).collect();
        SharedBitmap { layout, blocks }
    }

    /// Atomically test-and-set the bit under its block's lock, allocating
    /// the block if needed. Returns the previous value.
    pub fn test_and_set(&self, state: u64) -> Result<bool, SolveError> {
        let mut guard = self.blocks[self.layout.block_of(state)]
            .lock()
            .map_err(|_| SolveError::Corrupt {
                stage: "bitmap_lock",
                detail: "visited-block lock poisoned".to_string(),
            })?;
        if guard.is_none() {
            *guard = Some(self.layout.alloc_block()?);
        }
        let block = guard.as_mut().expect("block just allocated");
        let off = self.layout.offset_of(state);
        let mask = 1u8 << (off & 7);
        let was = block[off >> 3] & mask != 0;
        block[off >> 3] |= mask;
        Ok(was)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_block_layout() {
        let bm = BitmapLayout::new(1000, 0);
        assert_eq!(bm.blocks(), 1);
        assert_eq!(bm.block_of(999), 0);
    }

    #[test]
    fn bits_are_independent() {
        let mut bm = Bitmap::new(1 << 12, 6);
        assert!(!bm.test(0));
        assert!(!bm.test_and_set(0).unwrap());
        assert!(bm.test_and_set(0).unwrap());
        assert!(bm.test(0));
        for s in [1u64, 63, 64, 4095] {
            assert!(!bm.test(s), "state {s}");
            assert!(!bm.test_and_set(s).unwrap());
            assert!(bm.test(s));
        }
    }

    #[test]
    fn blocks_allocate_lazily() {
        let mut bm = Bitmap::new(1 << 20, 10);
        assert_eq!(bm.allocated_blocks(), 0);
        bm.test_and_set(0).unwrap();
        bm.test_and_set(1023).unwrap();
        assert_eq!(bm.allocated_blocks(), 1);
        bm.test_and_set(1024).unwrap();
        assert_eq!(bm.allocated_blocks(), 2);
    }

    #[test]
    fn shared_bitmap_matches() {
        let bm = SharedBitmap::new(1 << 16, 8);
        assert!(!bm.test_and_set(12345).unwrap());
        assert!(bm.test_and_set(12345).unwrap());
        assert!(!bm.test_and_set(12346).unwrap());
    }
}

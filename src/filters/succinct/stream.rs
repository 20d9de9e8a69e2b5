// Copyright (c) 2025 Kona Filters Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! The bracket stream: a succinct, mutable sequence of small counters.
//!
//! Every logical position contributes one *cell*, made of one bit in the
//! presence bitmap (`data`) and one bit in the continuation bitmap (`counts`).
//!
//! - A position whose presence bit is set owns its own cell: it is the first
//!   cell of that position's counter chain, worth a count of one.
//! - A set continuation bit means the chain owning the cell goes on: the count
//!   is one higher and one more cell is owed. This opens a bracket.
//! - A cell whose presence bit is clear closes the innermost open bracket: it
//!   becomes the next cell of the chain that opened it.
//!
//! So a count `c` at position `i` is stored as `c` cells, the first at `i` and
//! the rest in free cells further right, matched like nested parentheses. A
//! stream of counts has exactly one encoding.
//!
//! The *level* at a position is the number of brackets still open after it.
//! Levels are needed to mutate the stream, and computing one from position 0
//! would be linear in the filter size, so the stream keeps one mark bit per 16
//! positions recording whether the level just before that checkpoint is
//! non-zero. A level query walks back to the nearest checkpoint with a clear
//! mark and scans forward from there.

use std::fmt::Write as _;
use std::ops::Range;

use crate::filters::error::{FilterError, FilterResult};

/// Positions between two level checkpoints.
const LEVEL_STRIDE: usize = 16;

/// Succinct storage for one counter per logical position.
///
/// The stream is sized once for `words * 64` positions plus one guard word of
/// free cells that absorbs counter chains running off the end. Reads past the
/// allocation see free, empty cells; a chain that outgrows the guard word
/// extends the allocation by whole words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketStream {
    /// Logical positions that can hold a counter
    positions: usize,

    /// Presence bits: set iff the count at the position is at least one
    data: Vec<u64>,

    /// Continuation bits, one per cell
    counts: Vec<u64>,

    /// One mark per checkpoint: set iff a bracket is open just before it
    levels: Vec<u64>,
}

impl BracketStream {
    /// Create an all-zero stream for `words * 64` positions (at least one word).
    pub fn new(words: usize) -> Self {
        let words = words.max(1);
        Self {
            positions: words * 64,
            data: vec![0; words + 1],
            counts: vec![0; words + 1],
            levels: vec![0; (words + 63) / 16],
        }
    }

    /// Number of positions that can hold a counter.
    pub fn positions(&self) -> usize {
        self.positions
    }

    /// Memory held by the three bitmaps, in bits.
    pub fn bit_count(&self) -> u64 {
        (self.data.len() + self.counts.len() + self.levels.len()) as u64 * 64
    }

    /// Whether the count at `pos` is non-zero.
    ///
    /// This only reads the presence bitmap, so it costs the same as a plain
    /// Bloom filter probe.
    #[inline]
    pub fn is_present(&self, pos: usize) -> bool {
        bit(&self.data, pos)
    }

    /// Whether the chain owning the cell at `pos` continues past it.
    #[inline]
    pub fn continues(&self, pos: usize) -> bool {
        bit(&self.counts, pos)
    }

    /// Whether every bitmap is zero, i.e. every count is zero.
    pub fn is_zeroed(&self) -> bool {
        [&self.data, &self.counts, &self.levels]
            .iter()
            .all(|words| words.iter().all(|&word| word == 0))
    }

    /// The cell closing one bracket opened just before `pos`.
    ///
    /// Scans forward from `pos` with one bracket open: free cells close one,
    /// set continuation bits open one. The result is always a free cell.
    pub fn end_of(&self, mut pos: usize) -> usize {
        let mut open = 1usize;
        loop {
            if !self.is_present(pos) {
                open -= 1;
                if open == 0 {
                    return pos;
                }
            }
            if self.continues(pos) {
                open += 1;
            }
            pos += 1;
        }
    }

    /// Decode the count stored at `pos`.
    pub fn read_count(&self, pos: usize) -> u32 {
        if !self.is_present(pos) {
            return 0;
        }
        let mut count = 1;
        let mut cell = pos;
        while self.continues(cell) {
            count += 1;
            cell = self.end_of(cell + 1);
        }
        count
    }

    /// Number of brackets open after `pos`, using the checkpoint marks.
    pub fn level(&self, pos: usize) -> usize {
        (self.checkpoint_before(pos)..=pos).fold(0, |level, cell| self.step(level, cell))
    }

    /// Add one to the count at `pos`.
    ///
    /// The new cell is spliced into the chain at `pos`, and every bracket that
    /// was open across `pos` has its cells shifted one free cell to the right.
    ///
    /// # Panics
    ///
    /// Debug builds panic if `pos` is not below [`positions`](Self::positions).
    pub fn increment(&mut self, pos: usize) {
        debug_assert!(pos < self.positions, "position {pos} out of range");
        let enclosing = self.level(pos);

        let mut cursor;
        if self.is_present(pos) {
            cursor = self.splice(pos, true);
            for _ in 0..enclosing {
                cursor = self.end_of(cursor);
                cursor = self.splice(cursor, false);
            }
        } else {
            // The free cell at `pos` becomes the owner's first cell; whatever
            // chain used it moves one free cell along, for every open bracket.
            set_bit(&mut self.data, pos, true);
            cursor = pos;
            for _ in 0..=enclosing {
                cursor = self.splice(cursor, false);
                cursor = self.end_of(cursor);
            }
        }
        self.update_levels(pos, cursor);
    }

    /// Subtract one from the count at `pos`.
    ///
    /// The smallest region around `pos` that no bracket crosses is decoded,
    /// the count is lowered, and the region is encoded again. Lowering a count
    /// never keeps a bracket open for longer, so nothing outside the region
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::CountUnderflow`] if the count at `pos` is
    /// already zero. The stream is left untouched.
    pub fn decrement(&mut self, pos: usize) -> FilterResult<()> {
        if !self.is_present(pos) {
            return Err(FilterError::CountUnderflow { position: pos });
        }
        let start = self.checkpoint_before(pos);
        let mut owned = self.decode_window(start, pos);
        owned[pos - start] -= 1;

        let end = start + owned.len() - 1;
        self.encode_window(start, &owned);
        self.update_levels(start, end);
        Ok(())
    }

    /// Render the bitmaps over `range`, one row each, for diagnostics.
    pub fn dump(&self, range: Range<usize>) -> String {
        let mut out = String::new();
        let row = |out: &mut String, label: &str, cell: &dyn Fn(usize) -> char| {
            let line: String = range.clone().map(cell).collect();
            let _ = writeln!(out, "{line}  {label}");
        };
        row(&mut out, "data", &|i| if self.is_present(i) { '1' } else { '0' });
        row(&mut out, "counts", &|i| if self.continues(i) { '1' } else { '0' });
        row(&mut out, "index", &|i| char::from(b'0' + (i % 10) as u8));
        row(&mut out, "level", &|i| {
            char::from_digit((self.level(i) % 36) as u32, 36).unwrap_or('?')
        });
        out
    }

    /// Insert `bit` into the continuation sequence at `pos`.
    ///
    /// Inserting a clear bit over a clear bit changes nothing. Otherwise the
    /// cell takes the new value and the value it held is pushed on to the
    /// cell closing its bracket, until a clear bit lands on a clear cell.
    /// Returns the position after the last cell examined.
    fn splice(&mut self, mut pos: usize, mut bit: bool) -> usize {
        loop {
            if self.continues(pos) {
                if !bit {
                    self.set_continues(pos, false);
                }
                bit = true;
            } else if bit {
                self.set_continues(pos, true);
                bit = false;
            } else {
                return pos + 1;
            }
            pos = self.end_of(pos + 1);
        }
    }

    /// Advance a level across the cell at `pos`.
    #[inline]
    fn step(&self, mut level: usize, pos: usize) -> usize {
        if !self.is_present(pos) && level > 0 {
            level -= 1;
        }
        if self.continues(pos) {
            level += 1;
        }
        level
    }

    /// The nearest checkpoint at or before `pos` with no bracket open.
    fn checkpoint_before(&self, pos: usize) -> usize {
        let mut checkpoint = pos / LEVEL_STRIDE;
        while checkpoint > 0 && bit(&self.levels, checkpoint) {
            checkpoint -= 1;
        }
        checkpoint * LEVEL_STRIDE
    }

    /// Rewrite the checkpoint marks for every checkpoint in `(from, to + 1]`.
    fn update_levels(&mut self, from: usize, to: usize) {
        let mut level = 0;
        let mut pos = self.checkpoint_before(from);
        while pos <= to {
            level = self.step(level, pos);
            pos += 1;
            if pos % LEVEL_STRIDE == 0 {
                set_bit(&mut self.levels, pos / LEVEL_STRIDE, level != 0);
            }
        }
    }

    /// Counts of the positions `start..=end`, where no bracket is open before
    /// `start` and `end` is the first position at or after `pos` where every
    /// bracket is closed again.
    fn decode_window(&self, start: usize, pos: usize) -> Vec<u32> {
        let mut owned = Vec::new();
        let mut open: Vec<usize> = Vec::new();
        let mut cell = start;
        loop {
            let offset = cell - start;
            if self.is_present(cell) {
                owned.push(1);
                if self.continues(cell) {
                    open.push(offset);
                }
            } else {
                owned.push(0);
                if let Some(owner) = open.pop() {
                    owned[owner] += 1;
                    if self.continues(cell) {
                        open.push(owner);
                    }
                }
            }
            if cell >= pos && open.is_empty() {
                return owned;
            }
            cell += 1;
        }
    }

    /// Write the unique encoding of `owned` starting at `start`.
    fn encode_window(&mut self, start: usize, owned: &[u32]) {
        let mut remaining = owned.to_vec();
        let mut open: Vec<usize> = Vec::new();
        for (offset, &count) in owned.iter().enumerate() {
            let cell = start + offset;
            set_bit(&mut self.data, cell, count > 0);
            let owner = if count > 0 { Some(offset) } else { open.pop() };
            match owner {
                Some(owner) => {
                    remaining[owner] -= 1;
                    let more = remaining[owner] > 0;
                    self.set_continues(cell, more);
                    if more {
                        open.push(owner);
                    }
                }
                None => self.set_continues(cell, false),
            }
        }
        debug_assert!(open.is_empty(), "window re-encoded with open brackets");
    }

    fn set_continues(&mut self, pos: usize, value: bool) {
        if value {
            self.reserve(pos);
        }
        set_bit(&mut self.counts, pos, value);
    }

    /// Make sure `pos` is backed by `data` and `counts` words.
    fn reserve(&mut self, pos: usize) {
        let needed = pos / 64 + 1;
        if needed <= self.counts.len() {
            return;
        }
        tracing::warn!(
            position = pos,
            words = needed,
            "Counter chain ran past the guard word, extending stream"
        );
        self.data.resize(needed, 0);
        self.counts.resize(needed, 0);
    }
}

#[inline]
fn bit(words: &[u64], pos: usize) -> bool {
    words
        .get(pos / 64)
        .is_some_and(|word| word & (1u64 << (pos % 64)) != 0)
}

/// Set or clear one bit. Setting a bit past the end grows `words`; clearing
/// one is a no-op, since missing words read as zero.
#[inline]
fn set_bit(words: &mut Vec<u64>, pos: usize, value: bool) {
    let index = pos / 64;
    let mask = 1u64 << (pos % 64);
    if value {
        if index >= words.len() {
            tracing::trace!(words = index + 1, "Growing bitmap");
            words.resize(index + 1, 0);
        }
        words[index] |= mask;
    } else if let Some(word) = words.get_mut(index) {
        *word &= !mask;
    }
}

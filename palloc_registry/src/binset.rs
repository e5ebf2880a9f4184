//! Fixed-capacity bin membership bitmap and its range-list text form
//!
//! The text grammar is a comma separated list of items, each either a single
//! bin `N`, an inclusive range `N-M`, or a strided range `N-M:used/group`
//! which selects the first `used` bins of every `group` sized block in
//! `[N, M]`. Rendering always produces the canonical minimal list of
//! singletons and ranges in ascending order.

use crate::error::ParseError;
use palloc::config::BinCapacity;
use palloc::consts::{BINSET_WORDS, MAX_PALLOC_BINS};
use std::fmt;

const WORD_BITS: usize = u64::BITS as usize;

/// Set of allowed bin indices
///
/// Plain `Copy` data: a group's shared copy lives behind
/// [`GroupRecord`](crate::record::GroupRecord), everything else works on
/// owned snapshots.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BinSet {
    words: [u64; BINSET_WORDS],
}

impl BinSet {
    /// Set with no bins allowed
    pub const fn empty() -> Self {
        Self {
            words: [0; BINSET_WORDS],
        }
    }

    /// Set containing every bin below `capacity`
    pub fn full(capacity: BinCapacity) -> Self {
        let mut set = Self::empty();
        set.insert_range(0, capacity.get() - 1);
        set
    }

    /// Build a set from individual bin indices
    pub fn from_indices<I>(indices: I, capacity: BinCapacity) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut set = Self::empty();
        for index in indices {
            if index >= capacity.get() {
                return Err(ParseError::OutOfRange {
                    value: index as u64,
                    capacity: capacity.get(),
                });
            }
            set.insert_range(index, index);
        }
        Ok(set)
    }

    pub(crate) const fn from_words(words: [u64; BINSET_WORDS]) -> Self {
        Self { words }
    }

    pub(crate) const fn words(&self) -> &[u64; BINSET_WORDS] {
        &self.words
    }

    /// Remove every bin
    pub fn clear(&mut self) {
        self.words = [0; BINSET_WORDS];
    }

    /// Membership test; indices past the storage bound are never members
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index < MAX_PALLOC_BINS && self.words[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    /// Number of allowed bins
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True when no bin is allowed
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Allowed bins in ascending order
    pub fn iter(&self) -> Bins {
        Bins {
            words: self.words,
            word: 0,
            current: self.words[0],
        }
    }

    /// Bins present in both sets
    #[must_use]
    pub fn intersection(&self, other: &BinSet) -> BinSet {
        let mut words = self.words;
        for (w, o) in words.iter_mut().zip(other.words.iter()) {
            *w &= *o;
        }
        Self { words }
    }

    /// Bins present in either set
    #[must_use]
    pub fn union(&self, other: &BinSet) -> BinSet {
        let mut words = self.words;
        for (w, o) in words.iter_mut().zip(other.words.iter()) {
            *w |= *o;
        }
        Self { words }
    }

    /// Parse a range list against `capacity`
    ///
    /// Surrounding whitespace is ignored and an empty list yields the empty
    /// set. The result is built separately, so a failure anywhere in the
    /// list never produces a partially filled set.
    pub fn parse(text: &str, capacity: BinCapacity) -> Result<Self, ParseError> {
        let text = text.trim();
        let mut set = Self::empty();
        if text.is_empty() {
            return Ok(set);
        }

        for item in text.split(',') {
            RangeItem::parse(item, capacity)?.apply(&mut set);
        }
        Ok(set)
    }

    /// Canonical range-list rendering, e.g. `0-3,7,9-10`
    pub fn format(&self) -> String {
        self.to_string()
    }

    /// Set bins `lo..=hi`; callers guarantee `lo <= hi < MAX_PALLOC_BINS`
    fn insert_range(&mut self, lo: usize, hi: usize) {
        let (first, last) = (lo / WORD_BITS, hi / WORD_BITS);
        for w in first..=last {
            let start = if w == first { lo % WORD_BITS } else { 0 };
            let end = if w == last { hi % WORD_BITS } else { WORD_BITS - 1 };
            let width = end - start + 1;
            let mask = if width == WORD_BITS {
                u64::MAX
            } else {
                ((1u64 << width) - 1) << start
            };
            self.words[w] |= mask;
        }
    }
}

impl fmt::Display for BinSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bins = self.iter().peekable();
        let mut first = true;
        while let Some(start) = bins.next() {
            let mut end = start;
            while bins.peek() == Some(&(end + 1)) {
                end += 1;
                bins.next();
            }
            if !first {
                f.write_str(",")?;
            }
            first = false;
            if start == end {
                write!(f, "{start}")?;
            } else {
                write!(f, "{start}-{end}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for BinSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinSet({self})")
    }
}

impl<'a> IntoIterator for &'a BinSet {
    type Item = usize;
    type IntoIter = Bins;

    fn into_iter(self) -> Bins {
        self.iter()
    }
}

/// Ascending iterator over the bins of a [`BinSet`]
#[derive(Debug, Clone)]
pub struct Bins {
    words: [u64; BINSET_WORDS],
    word: usize,
    current: u64,
}

impl Iterator for Bins {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word * WORD_BITS + bit);
            }
            self.word += 1;
            if self.word >= BINSET_WORDS {
                return None;
            }
            self.current = self.words[self.word];
        }
    }
}

/// One list item: `lo[-hi][:used/group]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RangeItem {
    lo: u64,
    hi: u64,
    used: u64,
    group: u64,
}

impl RangeItem {
    fn parse(item: &str, capacity: BinCapacity) -> Result<Self, ParseError> {
        if item.is_empty() {
            return Err(ParseError::malformed(item, "empty list item"));
        }

        let (range, stride) = match item.split_once(':') {
            Some((range, stride)) => (range, Some(stride)),
            None => (item, None),
        };

        let (lo, hi) = match range.split_once('-') {
            Some((lo, hi)) => (parse_number(item, lo, capacity)?, parse_number(item, hi, capacity)?),
            None => {
                let n = parse_number(item, range, capacity)?;
                (n, n)
            }
        };
        if lo > hi {
            return Err(ParseError::malformed(item, "range start exceeds end"));
        }

        let (used, group) = match stride {
            None => (1, 1),
            Some(stride) => {
                if range.split_once('-').is_none() {
                    return Err(ParseError::malformed(item, "stride requires a range"));
                }
                let (used, group) = stride
                    .split_once('/')
                    .ok_or_else(|| ParseError::malformed(item, "stride must be used/group"))?;
                let (used, group) = (
                    parse_number(item, used, capacity)?,
                    parse_number(item, group, capacity)?,
                );
                if group == 0 || used > group {
                    return Err(ParseError::malformed(item, "invalid stride"));
                }
                (used, group)
            }
        };

        if hi >= capacity.get() as u64 {
            return Err(ParseError::OutOfRange {
                value: hi,
                capacity: capacity.get(),
            });
        }

        Ok(Self { lo, hi, used, group })
    }

    /// Bounds were checked in `parse`, so every value fits in `usize`
    fn apply(&self, set: &mut BinSet) {
        let (lo, hi) = (self.lo as usize, self.hi as usize);
        if self.used == self.group {
            set.insert_range(lo, hi);
            return;
        }
        if self.used == 0 {
            return;
        }
        let (used, group) = (self.used as usize, self.group as usize);
        for block in (lo..=hi).step_by(group) {
            set.insert_range(block, (block + used - 1).min(hi));
        }
    }
}

fn parse_number(item: &str, digits: &str, capacity: BinCapacity) -> Result<u64, ParseError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::malformed(item, "expected a decimal bin number"));
    }
    // All digits, so the only failure left is overflow.
    digits.parse().map_err(|_| ParseError::OutOfRange {
        value: u64::MAX,
        capacity: capacity.get(),
    })
}

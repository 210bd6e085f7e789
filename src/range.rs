use anyhow::{Result, bail};

/// An inclusive range of Unicode code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharRange {
    min: u32,
    max: u32,
}

impl CharRange {
    pub fn new(min: char, max: char) -> Result<Self> {
        if min > max {
            bail!(
                "Invalid character range: U+{:04X} > U+{:04X}",
                min as u32,
                max as u32
            );
        }
        Ok(Self {
            min: min as u32,
            max: max as u32,
        })
    }

    pub fn single(c: char) -> Self {
        Self {
            min: c as u32,
            max: c as u32,
        }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Number of code points in this range.
    pub fn size(&self) -> u64 {
        (self.max - self.min + 1) as u64
    }

    fn contains(&self, c: char) -> bool {
        let cp = c as u32;
        cp >= self.min && cp <= self.max
    }
}

/// Total size of a range set: the sum of the individual range sizes.
/// Overlapping ranges double-count their shared characters; the index
/// space is defined by sequential traversal, not by merged intervals.
pub fn size_of(ranges: &[CharRange]) -> u64 {
    ranges.iter().map(CharRange::size).sum()
}

/// Character at `index` in the sequential index space of `ranges`.
///
/// Returns `None` once the index runs past the total size, or if the
/// code point at that index is not a Unicode scalar value (a range
/// straddling the surrogate block). Degradation, not an error.
pub fn char_at(ranges: &[CharRange], index: u64) -> Option<char> {
    let mut index = index;
    for range in ranges {
        let n = range.size();
        if index < n {
            return char::from_u32(range.min + index as u32);
        }
        index -= n;
    }
    None
}

/// Position of `c` in the sequential index space of `ranges`, or `None`
/// if no range contains it. With overlapping ranges the first range in
/// declaration order wins.
pub fn index_of(ranges: &[CharRange], c: char) -> Option<u64> {
    let mut index: u64 = 0;
    for range in ranges {
        if range.contains(c) {
            return Some(index + (c as u32 - range.min) as u64);
        }
        index += range.size();
    }
    None
}

use std::ops::{Index, Range};

/// A span of bytes within a template, `begin` inclusive and `end` exclusive.
///
/// Every evaluator works inside one [`Region`] of its template, and every
/// fragment it emits is either a `Region` of literal text or the output of
/// a tag occupying a `Region`.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Region {
    pub begin: usize,
    pub end: usize,
}

impl Region {
    /// Create a new [`Region`] spanning `range`.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            begin: range.start,
            end: range.end,
        }
    }

    /// Return true if `other` lies entirely inside this [`Region`].
    pub fn contains(&self, other: Self) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }
}

impl Index<Region> for str {
    type Output = str;

    fn index(&self, region: Region) -> &Self::Output {
        &self[region.begin..region.end]
    }
}

impl From<Range<usize>> for Region {
    fn from(range: Range<usize>) -> Self {
        Self::new(range)
    }
}

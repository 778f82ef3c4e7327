//! Core data structures for the index
//!
//! Coordinates, validated ranges and the member sets stored at each breakpoint.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::{Error, Result};

/// A finite numeric coordinate on the index axis
///
/// Ordered with `f64::total_cmp`. NaN and infinities are rejected on
/// construction, and `-0.0` is folded into `0.0` so both spellings of zero land
/// on the same breakpoint.
#[derive(Debug, Clone, Copy)]
pub struct Coord(f64);

impl Coord {
    /// Create a coordinate from a finite value
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::InvalidArgument(value.to_string()));
        }
        // -0.0 == 0.0 is true, so this maps both zeros to +0.0
        Ok(Self(if value == 0.0 { 0.0 } else { value }))
    }

    /// Parse a coordinate from its textual form
    pub fn parse(text: &str) -> Result<Self> {
        let value = text
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidArgument(text.to_string()))?;
        Self::new(value).map_err(|_| Error::InvalidArgument(text.to_string()))
    }

    /// The raw value
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Coord {}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Coord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Coord {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

/// A validated `(min, max)` pair with `min <= max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Lower bound
    pub min: Coord,
    /// Upper bound
    pub max: Coord,
}

impl Span {
    /// Validate raw bounds into a span
    pub fn new(min: f64, max: f64) -> Result<Self> {
        let lo = Coord::new(min)?;
        let hi = Coord::new(max)?;
        Self::from_coords(lo, hi)
    }

    /// Build a span from already-validated coordinates
    pub fn from_coords(min: Coord, max: Coord) -> Result<Self> {
        if min > max {
            return Err(Error::InvalidRange {
                min: min.value(),
                max: max.value(),
            });
        }
        Ok(Self { min, max })
    }

    /// Parse a span from its textual bounds
    pub fn parse(min: &str, max: &str) -> Result<Self> {
        Self::from_coords(Coord::parse(min)?, Coord::parse(max)?)
    }

    /// Whether both bounds are the same coordinate
    pub fn is_point(&self) -> bool {
        self.min == self.max
    }
}

/// Inline capacity of a member set before it spills to the heap
const INLINE_MEMBERS: usize = 4;

/// The set of members active at one breakpoint
///
/// Kept sorted and deduplicated so equality, intersection and ordered output
/// are all linear merges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MemberSet {
    members: SmallVec<[Arc<str>; INLINE_MEMBERS]>,
}

impl MemberSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the set has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `member` is in the set
    pub fn contains(&self, member: &str) -> bool {
        self.position(member).is_ok()
    }

    /// Add a member, returning `true` if it was not already present
    pub fn insert(&mut self, member: Arc<str>) -> bool {
        match self.position(&member) {
            Ok(_) => false,
            Err(idx) => {
                self.members.insert(idx, member);
                true
            }
        }
    }

    /// Remove a member, returning `true` if it was present
    pub fn remove(&mut self, member: &str) -> bool {
        match self.position(member) {
            Ok(idx) => {
                self.members.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    /// Members present in both sets
    pub fn intersection(&self, other: &MemberSet) -> MemberSet {
        let mut out = MemberSet::new();
        let (mut i, mut j) = (0, 0);
        while i < self.members.len() && j < other.members.len() {
            match self.members[i].cmp(&other.members[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    out.members.push(self.members[i].clone());
                    i += 1;
                    j += 1;
                }
            }
        }
        out
    }

    /// Iterate members in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.iter().map(|m| m.as_ref())
    }

    /// Owned, sorted copy of the members
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }

    fn position(&self, member: &str) -> std::result::Result<usize, usize> {
        self.members.binary_search_by(|probe| probe.as_ref().cmp(member))
    }
}

impl FromIterator<Arc<str>> for MemberSet {
    fn from_iter<I: IntoIterator<Item = Arc<str>>>(iter: I) -> Self {
        let mut members: SmallVec<[Arc<str>; INLINE_MEMBERS]> = iter.into_iter().collect();
        members.sort();
        members.dedup();
        Self { members }
    }
}

impl<'a> FromIterator<&'a str> for MemberSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(Arc::<str>::from).collect()
    }
}

impl fmt::Display for MemberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, member) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", member)?;
        }
        write!(f, "}}")
    }
}

/// Ordered view of every breakpoint and its members
pub type Snapshot = Vec<(f64, Vec<String>)>;

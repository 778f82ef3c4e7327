//! Interval boundary policies
//!
//! A store is either `Closed` (`[min, max]`) or `HalfOpen` (`[min, max)`). The
//! policy decides which breakpoints a range touches, what the index reports
//! strictly between two breakpoints, and when a breakpoint can be dropped
//! without changing any lookup.

use std::fmt;
use std::ops::Bound;
use std::str::FromStr;

use crate::core::{Coord, MemberSet, Span};
use crate::error::Error;

/// Boundary policy, fixed for the lifetime of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Policy {
    /// Ranges include both bounds
    #[default]
    Closed,
    /// Ranges include `min` and exclude `max`
    HalfOpen,
}

impl Policy {
    /// Policy name as used in configuration and error messages
    pub fn name(self) -> &'static str {
        match self {
            Policy::Closed => "closed",
            Policy::HalfOpen => "half-open",
        }
    }

    /// Coordinate bounds of the breakpoints a range touches
    pub fn affected(self, span: Span) -> (Bound<Coord>, Bound<Coord>) {
        let upper = match self {
            Policy::Closed => Bound::Included(span.max),
            Policy::HalfOpen => Bound::Excluded(span.max),
        };
        (Bound::Included(span.min), upper)
    }

    /// Whether `at` lies inside the range under this policy
    pub fn covers(self, span: Span, at: Coord) -> bool {
        match self {
            Policy::Closed => span.min <= at && at <= span.max,
            Policy::HalfOpen => span.min <= at && at < span.max,
        }
    }

    /// Members active strictly between two adjacent breakpoints
    pub(crate) fn interior(self, floor: &MemberSet, ceil: &MemberSet) -> MemberSet {
        match self {
            Policy::Closed => floor.intersection(ceil),
            Policy::HalfOpen => floor.clone(),
        }
    }

    /// Whether a breakpoint carries no information its neighbours don't
    ///
    /// `prev` and `next` are the member sets of the adjacent breakpoints, `None`
    /// where the breakpoint sits at an end of the store. Dropping a redundant
    /// breakpoint leaves every lookup unchanged.
    pub(crate) fn is_redundant(
        self,
        members: &MemberSet,
        prev: Option<&MemberSet>,
        next: Option<&MemberSet>,
    ) -> bool {
        let empty = MemberSet::new();
        let prev = prev.unwrap_or(&empty);
        match self {
            Policy::HalfOpen => members == prev,
            Policy::Closed => {
                let next = next.unwrap_or(&empty);
                *members == prev.intersection(next)
            }
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "closed" => Ok(Policy::Closed),
            "half-open" | "halfopen" | "half_open" => Ok(Policy::HalfOpen),
            other => Err(Error::InvalidArgument(format!("unknown policy '{}'", other))),
        }
    }
}

//! rangestab: interval-stabbing index over sparse breakpoints
//!
//! This crate stores many (possibly overlapping) numeric ranges, each labelled
//! with a member identifier, and answers "which members cover point X?" without
//! keeping one entry per covered point. Ranges are folded into an ordered set of
//! breakpoints, each carrying the exact member set active at its coordinate.

#![warn(missing_docs)]

/// Core data structures shared across the engines
pub mod core;

/// Closed / half-open boundary policies
pub mod policy;

/// Ordered breakpoint storage
pub mod storage;

/// Stabbing query, insertion and deletion engines
pub mod interval;

/// Named stores, each behind its own exclusive section
pub mod registry;

/// Positional-argument command surface
pub mod command;

/// Randomised and multi-threaded tests
#[cfg(test)]
mod stress_tests;

// Re-exports
pub use crate::core::{Coord, MemberSet, Snapshot, Span};
pub use command::{Command, Reply};
pub use config::RangeIndexConfig;
pub use error::{Error, Result};
pub use interval::{IndexStats, RangeIndex};
pub use policy::Policy;
pub use registry::{Registry, SharedIndex};
pub use storage::{BreakpointStore, MemoryStore};

/// Error types for index operations
pub mod error {
    use std::time::Duration;

    use thiserror::Error;

    use crate::policy::Policy;

    /// Errors that can occur in index operations
    ///
    /// Every argument error is raised before the store is touched, so a failed
    /// call never leaves a partial mutation behind.
    #[derive(Debug, Clone, PartialEq, Error)]
    pub enum Error {
        /// The caller supplied the wrong number of positional arguments
        #[error(
            "wrong number of arguments for '{op}': expected {expected_keys} key(s) and \
             {expected_args} argument(s), got {keys} and {args}"
        )]
        InvalidArity {
            /// Operation name
            op: &'static str,
            /// Number of store keys the operation takes
            expected_keys: usize,
            /// Number of positional values the operation takes
            expected_args: usize,
            /// Number of store keys supplied
            keys: usize,
            /// Number of positional values supplied
            args: usize,
        },
        /// A bound or lookup value is not interpretable as a finite number
        #[error("value is not numeric or out of range: {0}")]
        InvalidArgument(String),
        /// The lower bound of a range exceeds its upper bound
        #[error("range is not numeric or out of range: min {min} > max {max}")]
        InvalidRange {
            /// Lower bound supplied
            min: f64,
            /// Upper bound supplied
            max: f64,
        },
        /// The command surface received an operation it does not know
        #[error("unknown command '{0}'")]
        UnknownCommand(String),
        /// A store was reopened with a policy other than the one it was created with
        #[error("store '{store}' uses the {existing} policy, cannot open it as {requested}")]
        PolicyMismatch {
            /// Store name
            store: String,
            /// Policy the store was created with
            existing: Policy,
            /// Policy the caller asked for
            requested: Policy,
        },
        /// The store's exclusive section could not be acquired in time
        #[error("timed out after {waited:?} waiting for store '{store}'")]
        LockTimeout {
            /// Store name
            store: String,
            /// How long the caller waited
            waited: Duration,
        },
    }

    /// Result alias used throughout the crate
    pub type Result<T> = std::result::Result<T, Error>;
}

/// Configuration options for indexes and registries
pub mod config {
    use crate::policy::Policy;

    /// Configuration for a range index
    #[derive(Debug, Clone, PartialEq)]
    #[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
    pub struct RangeIndexConfig {
        /// Boundary policy for newly created stores
        pub policy: Policy,
        /// Whether `remove` prunes redundant boundary breakpoints
        pub prune_on_remove: bool,
        /// Number of store slots the registry reserves up front
        pub initial_stores: usize,
    }

    impl Default for RangeIndexConfig {
        fn default() -> Self {
            Self {
                policy: Policy::Closed,
                prune_on_remove: true,
                initial_stores: 16,
            }
        }
    }

    impl RangeIndexConfig {
        /// Default configuration with the given policy
        pub fn with_policy(policy: Policy) -> Self {
            Self {
                policy,
                ..Self::default()
            }
        }
    }
}

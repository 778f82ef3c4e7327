//! Range insertion
//!
//! Adding a range first pins the function's current value at both endpoints
//! (creating breakpoints where none exist), then adds the member to every
//! breakpoint the range covers. Breakpoints are only ever created here, never
//! deleted.

use std::sync::Arc;

use tracing::trace;

use crate::core::{Coord, Span};
use crate::interval::query::stab;
use crate::policy::Policy;
use crate::storage::BreakpointStore;

/// What an insertion did to the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct InsertOutcome {
    /// Breakpoints created at the range endpoints
    pub created: usize,
    /// Breakpoints that gained the member
    pub extended: usize,
}

/// Make sure a breakpoint exists at `at`, returning `true` if one was created
///
/// A new breakpoint takes the value the index currently reports at `at`, so
/// materialising it changes no lookup anywhere.
pub(crate) fn materialize<S: BreakpointStore + ?Sized>(store: &mut S, policy: Policy, at: Coord) -> bool {
    if store.contains(at) {
        return false;
    }
    let members = stab(&*store, policy, at);
    trace!(at = %at, members = %members, "materializing breakpoint");
    store.insert(at, members);
    true
}

/// Add `member` over `span`
pub(crate) fn insert_range<S: BreakpointStore + ?Sized>(
    store: &mut S,
    policy: Policy,
    member: &Arc<str>,
    span: Span,
) -> InsertOutcome {
    let mut outcome = InsertOutcome::default();

    if materialize(store, policy, span.min) {
        outcome.created += 1;
    }
    if materialize(store, policy, span.max) {
        outcome.created += 1;
    }

    let (lower, upper) = policy.affected(span);
    for at in store.coords_in(lower, upper) {
        if store.add_member(at, member) {
            outcome.extended += 1;
        }
    }

    outcome
}

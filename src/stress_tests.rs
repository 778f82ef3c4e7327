use crate::core::{Coord, Span};
use crate::interval::RangeIndex;
use crate::interval::delete::delete_range;
use crate::interval::insert::insert_range;
use crate::interval::query::stab;
use crate::policy::Policy;
use crate::registry::Registry;
use crate::storage::{BreakpointStore, MemoryStore};
use quickcheck::{QuickCheck, TestResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::sync::{Arc, Barrier};
use std::thread;

/// Brute-force reference: the live ranges, one member each
#[derive(Debug, Default)]
struct Model {
    live: Vec<(String, Span)>,
}

impl Model {
    fn covering(&self, policy: Policy, at: f64) -> Vec<String> {
        let at = Coord::new(at).unwrap();
        let mut members: Vec<String> = self
            .live
            .iter()
            .filter(|(_, span)| policy.covers(*span, at))
            .map(|(member, _)| member.clone())
            .collect();
        members.sort();
        members
    }

    fn endpoints(&self) -> Vec<f64> {
        let coords: BTreeSet<Coord> = self
            .live
            .iter()
            .flat_map(|(_, span)| [span.min, span.max])
            .collect();
        coords.into_iter().map(|c| c.value()).collect()
    }
}

/// Probe every grid point and every midpoint around it
fn probes(limit: u8) -> impl Iterator<Item = f64> {
    (-2..=(limit as i32 + 2) * 2).map(|half| half as f64 / 2.0)
}

const GRID: u8 = 16;

/// Drive `index` and `model` through the same operations and compare
///
/// Each op is `(a, b, kind)`: adds get a fresh member over `[a, b]` on a small
/// grid so endpoints collide often; removes take back a live range picked by
/// `a`.
fn run_against_model(policy: Policy, ops: &[(u8, u8, bool)]) -> Result<(), String> {
    let mut index = RangeIndex::new(policy);
    let mut model = Model::default();

    for (step, &(a, b, is_add)) in ops.iter().enumerate() {
        if is_add || model.live.is_empty() {
            let (mut lo, mut hi) = ((a % GRID) as f64, (b % GRID) as f64);
            if lo > hi {
                std::mem::swap(&mut lo, &mut hi);
            }
            if policy == Policy::HalfOpen && lo == hi {
                hi += 1.0;
            }
            let member = format!("m{:03}", step);
            index.add(&member, lo, hi).unwrap();
            model.live.push((member, Span::new(lo, hi).unwrap()));
        } else {
            let (member, span) = model.live.remove(a as usize % model.live.len());
            index.remove(&member, span.min.value(), span.max.value()).unwrap();
        }

        for at in probes(GRID) {
            let got = index.lookup(at).unwrap().to_vec();
            let want = model.covering(policy, at);
            if got != want {
                return Err(format!(
                    "step {}: lookup({}) = {:?}, expected {:?}",
                    step, at, got, want
                ));
            }
        }

        // with one member per range the store keeps exactly the live endpoints
        if index.breakpoints() != model.endpoints() {
            return Err(format!(
                "step {}: breakpoints {:?}, expected {:?}",
                step,
                index.breakpoints(),
                model.endpoints()
            ));
        }
    }
    Ok(())
}

/// Route index logging to the test harness; repeated calls are harmless
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn check(policy: Policy, ops: Vec<(u8, u8, bool)>) -> TestResult {
    match run_against_model(policy, &ops) {
        Ok(()) => TestResult::passed(),
        Err(msg) => TestResult::error(msg),
    }
}

#[cfg(test)]
mod stress_tests {
    use super::*;

    #[test]
    fn prop_closed_matches_reference() {
        fn prop(ops: Vec<(u8, u8, bool)>) -> TestResult {
            check(Policy::Closed, ops)
        }
        QuickCheck::new()
            .tests(300)
            .quickcheck(prop as fn(Vec<(u8, u8, bool)>) -> TestResult);
    }

    #[test]
    fn prop_half_open_matches_reference() {
        fn prop(ops: Vec<(u8, u8, bool)>) -> TestResult {
            check(Policy::HalfOpen, ops)
        }
        QuickCheck::new()
            .tests(300)
            .quickcheck(prop as fn(Vec<(u8, u8, bool)>) -> TestResult);
    }

    #[test]
    fn prop_add_then_remove_restores_state() {
        fn prop(seed: Vec<(u8, u8)>, extra: (u8, u8), half_open: bool) -> TestResult {
            let policy = if half_open { Policy::HalfOpen } else { Policy::Closed };
            let mut index = RangeIndex::new(policy);
            for (i, &(a, b)) in seed.iter().enumerate() {
                let (lo, hi) = (a.min(b) as f64, a.max(b) as f64 + 1.0);
                index.add(&format!("s{}", i), lo, hi).unwrap();
            }
            let before = index.snapshot();

            let (lo, hi) = (extra.0.min(extra.1) as f64, extra.0.max(extra.1) as f64 + 0.5);
            index.add("probe", lo, hi).unwrap();
            index.add("probe", lo, hi).unwrap();
            index.remove("probe", lo, hi).unwrap();

            TestResult::from_bool(index.snapshot() == before)
        }
        QuickCheck::new()
            .tests(300)
            .quickcheck(prop as fn(Vec<(u8, u8)>, (u8, u8), bool) -> TestResult);
    }

    #[test]
    fn stress_random_sequences_seeded() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for round in 0..20 {
            let ops: Vec<(u8, u8, bool)> = (0..150)
                .map(|_| (rng.gen_range(0..64), rng.gen_range(0..64), rng.gen_bool(0.6)))
                .collect();
            for policy in [Policy::Closed, Policy::HalfOpen] {
                if let Err(msg) = run_against_model(policy, &ops) {
                    panic!("round {} ({}): {}", round, policy, msg);
                }
            }
        }
    }

    #[test]
    fn stress_pruning_never_changes_lookups() {
        // same members re-added over overlapping ranges and removed piecemeal;
        // each remove is replayed on a copy without pruning and both copies
        // must answer every probe identically
        let mut rng = StdRng::seed_from_u64(42);
        for policy in [Policy::Closed, Policy::HalfOpen] {
            let mut store = MemoryStore::new();
            let mut pruned_total = 0;

            for _ in 0..2000 {
                let member = ["A", "B", "C", "D"][rng.gen_range(0..4)];
                let a = rng.gen_range(0..40) as f64 / 2.0;
                let b = rng.gen_range(0..40) as f64 / 2.0;
                let span = Span::new(a.min(b), a.max(b)).unwrap();

                if rng.gen_bool(0.5) {
                    insert_range(&mut store, policy, &Arc::from(member), span);
                    continue;
                }

                let mut unpruned = store.clone();
                delete_range(&mut unpruned, policy, member, span, false);
                pruned_total += delete_range(&mut store, policy, member, span, true).pruned;

                assert!(store.len() <= unpruned.len());
                for at in probes(20) {
                    let at = Coord::new(at).unwrap();
                    assert_eq!(
                        stab(&store, policy, at),
                        stab(&unpruned, policy, at),
                        "{} lookup({})",
                        policy,
                        at
                    );
                }
            }
            assert!(pruned_total > 0, "{} run never pruned", policy);
        }
    }

    #[test]
    fn stress_concurrent_stores() {
        init_logging();
        let registry = Arc::new(Registry::new());
        let num_threads = 8;
        let ranges_per_thread = 500;
        let barrier = Arc::new(Barrier::new(num_threads));

        let mut handles = vec![];
        for thread_id in 0..num_threads {
            let registry = registry.clone();
            let barrier = barrier.clone();
            handles.push(thread::spawn(move || {
                barrier.wait();
                let store = format!("store-{}", thread_id);
                for i in 0..ranges_per_thread {
                    let min = i as f64;
                    registry
                        .add(&store, &format!("m{}", i), min, min + 1.5)
                        .expect("add failed");
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), num_threads);
        for thread_id in 0..num_threads {
            let store = format!("store-{}", thread_id);
            let members = registry.lookup(&store, 10.0).unwrap().to_vec();
            assert_eq!(members, vec!["m10", "m9"]);
        }
    }

    #[test]
    fn stress_concurrent_same_store() {
        init_logging();
        let registry = Arc::new(Registry::new());
        let num_threads = 8;
        let per_thread = 250;
        let barrier = Arc::new(Barrier::new(num_threads));

        let mut handles = vec![];
        for thread_id in 0..num_threads {
            let registry = registry.clone();
            let barrier = barrier.clone();
            handles.push(thread::spawn(move || {
                barrier.wait();
                for i in 0..per_thread {
                    let member = format!("t{}-{}", thread_id, i);
                    let min = (i % 50) as f64;
                    registry.add("shared", &member, min, min + 10.0).unwrap();
                    if i % 2 == 1 {
                        registry.remove("shared", &member, min, min + 10.0).unwrap();
                    }
                    registry.lookup("shared", min + 5.0).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // the survivors are the even-numbered ranges of every thread
        for at in [0.0, 12.5, 30.0, 59.0] {
            let got = registry.lookup("shared", at).unwrap().to_vec();
            let mut want = vec![];
            for thread_id in 0..num_threads {
                for i in (0..per_thread).step_by(2) {
                    let min = (i % 50) as f64;
                    if min <= at && at <= min + 10.0 {
                        want.push(format!("t{}-{}", thread_id, i));
                    }
                }
            }
            want.sort();
            assert_eq!(got, want, "lookup({})", at);
        }
    }
}

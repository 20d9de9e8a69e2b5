// Copyright (c) 2025 Kona Filters Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Property-based tests for the bracket stream and the succinct filter.

use proptest::prelude::*;
use proptest::sample::Index;
use proptest::test_runner::TestCaseError;

use crate::filters::succinct::{BracketStream, SuccinctCountingBloom};
use crate::filters::{Filter, FilterConfig};

#[derive(Debug, Clone)]
enum Op {
    Increment(usize),
    Decrement(Index),
}

// Strategy for a stream size and a sequence of operations on it. Edge
// positions are drawn often so chains run into the guard word.
fn ops_strategy() -> impl Strategy<Value = (usize, Vec<Op>)> {
    (1usize..4).prop_flat_map(|words| {
        let last = words * 64 - 1;
        let position = prop_oneof![
            4 => 0..words * 64,
            1 => Just(0usize),
            1 => Just(last),
        ];
        let op = prop_oneof![
            3 => position.prop_map(Op::Increment),
            1 => any::<Index>().prop_map(Op::Decrement),
        ];
        (Just(words), prop::collection::vec(op, 0..200))
    })
}

// Run the operations against the stream and a plain vector of counts.
fn apply(stream: &mut BracketStream, shadow: &mut [u32], ops: &[Op]) {
    for op in ops {
        match op {
            Op::Increment(pos) => {
                stream.increment(*pos);
                shadow[*pos] += 1;
            }
            Op::Decrement(index) => {
                let live: Vec<usize> = (0..shadow.len()).filter(|&p| shadow[p] > 0).collect();
                if live.is_empty() {
                    continue;
                }
                let pos = *index.get(&live);
                stream
                    .decrement(pos)
                    .expect("decrement of a live position failed");
                shadow[pos] -= 1;
            }
        }
    }
}

// Every count must decode to the shadow value, and every level served from
// the checkpoint marks must equal a scan from position 0.
fn cross_check(stream: &BracketStream, shadow: &[u32]) -> Result<(), TestCaseError> {
    for (pos, &expected) in shadow.iter().enumerate() {
        prop_assert_eq!(
            stream.read_count(pos),
            expected,
            "count at {}\n{}",
            pos,
            stream.dump(pos.saturating_sub(16)..pos + 16)
        );
        prop_assert_eq!(stream.is_present(pos), expected > 0);
    }

    let mut level = 0;
    for pos in 0..stream.positions() + 64 {
        if !stream.is_present(pos) && level > 0 {
            level -= 1;
        }
        if stream.continues(pos) {
            level += 1;
        }
        prop_assert_eq!(stream.level(pos), level, "level at {}", pos);
    }
    Ok(())
}

proptest! {
    // Property: counts and levels stay exact under any mix of operations
    #[test]
    fn prop_stream_matches_shadow((words, ops) in ops_strategy()) {
        let mut stream = BracketStream::new(words);
        let mut shadow = vec![0u32; stream.positions()];

        apply(&mut stream, &mut shadow, &ops);
        cross_check(&stream, &shadow)?;
    }

    // Property: the layout depends only on the counts, not on how they were reached
    #[test]
    fn prop_encoding_is_canonical((words, ops) in ops_strategy()) {
        let mut stream = BracketStream::new(words);
        let mut shadow = vec![0u32; stream.positions()];
        apply(&mut stream, &mut shadow, &ops);

        let mut rebuilt = BracketStream::new(words);
        for (pos, &count) in shadow.iter().enumerate() {
            for _ in 0..count {
                rebuilt.increment(pos);
            }
        }

        for pos in 0..stream.positions() * 4 {
            prop_assert_eq!(stream.is_present(pos), rebuilt.is_present(pos));
            prop_assert_eq!(stream.continues(pos), rebuilt.continues(pos), "cell {}", pos);
        }
    }

    // Property: removing everything that was added leaves an all-zero stream
    #[test]
    fn prop_drain_to_zero((words, ops) in ops_strategy()) {
        let mut stream = BracketStream::new(words);
        let mut shadow = vec![0u32; stream.positions()];
        apply(&mut stream, &mut shadow, &ops);

        for pos in (0..shadow.len()).rev() {
            for _ in 0..shadow[pos] {
                prop_assert!(stream.decrement(pos).is_ok());
            }
        }
        prop_assert!(stream.is_zeroed());
    }

    // Property: a decrement on an empty position fails and changes nothing
    #[test]
    fn prop_underflow_is_rejected((words, ops) in ops_strategy(), probe in any::<Index>()) {
        let mut stream = BracketStream::new(words);
        let mut shadow = vec![0u32; stream.positions()];
        apply(&mut stream, &mut shadow, &ops);

        let empty: Vec<usize> = (0..shadow.len()).filter(|&p| shadow[p] == 0).collect();
        if !empty.is_empty() {
            let pos = *probe.get(&empty);
            let snapshot = stream.clone();
            prop_assert!(stream.decrement(pos).is_err());
            prop_assert_eq!(stream, snapshot);
        }
    }

    // Property: removing some keys never hides the others
    #[test]
    fn prop_no_false_negatives_after_remove(
        keys in prop::collection::hash_set(any::<u64>(), 1..300),
        seed in any::<u64>(),
    ) {
        let keys: Vec<u64> = keys.into_iter().collect();
        let config = FilterConfig::new().with_seed(seed);
        let mut filter = SuccinctCountingBloom::build(&keys, &config).unwrap();

        let (removed, kept) = keys.split_at(keys.len() / 2);
        for &key in removed {
            prop_assert!(filter.remove(key).is_ok());
        }
        for &key in kept {
            prop_assert!(filter.may_contain(key));
            prop_assert!(filter.count_estimate(key) >= 1);
        }
    }

    // Property: adding a key n times makes its count estimate at least n
    #[test]
    fn prop_count_estimate_bounds_multiplicity(key in any::<u64>(), copies in 1u32..40, seed in any::<u64>()) {
        let config = FilterConfig::new().with_seed(seed);
        let mut filter = SuccinctCountingBloom::with_config(16, &config).unwrap();
        for _ in 0..copies {
            filter.add(key);
        }
        prop_assert!(filter.count_estimate(key) >= copies);

        for _ in 0..copies {
            prop_assert!(filter.remove(key).is_ok());
        }
        prop_assert!(filter.stream().is_zeroed());
    }
}

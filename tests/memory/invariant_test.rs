/*!
 * Invariant Property Tests
 * Random operation sequences never break the partition table
 */

use partition_sim::{MemoryInfo, MemoryManager, PartitionMode, PlacementPolicy, MIB};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Allocate(usize),
    Release(usize),
    Compact,
    Policy(PlacementPolicy),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (1usize..=6 * MIB).prop_map(Op::Allocate),
        3 => any::<usize>().prop_map(Op::Release),
        1 => Just(Op::Compact),
        1 => prop_oneof![
            Just(PlacementPolicy::First),
            Just(PlacementPolicy::Best),
            Just(PlacementPolicy::Worst),
        ]
        .prop_map(Op::Policy),
    ]
}

fn mode_strategy() -> impl Strategy<Value = PartitionMode> {
    prop_oneof![
        Just(PartitionMode::Fixed),
        Just(PartitionMode::Variable),
        Just(PartitionMode::Dynamic),
        Just(PartitionMode::Compaction),
    ]
}

proptest! {
    #[test]
    fn prop_table_invariants_hold(
        mode in mode_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..60),
    ) {
        let mut mgr = MemoryManager::default().with_mode(mode);
        let total = mgr.config().total_memory;

        for op in ops {
            let before = mgr.snapshot();
            match op {
                Op::Allocate(size) => {
                    if mgr.allocate("P", size).is_err() && mode != PartitionMode::Compaction {
                        prop_assert_eq!(&mgr.snapshot(), &before);
                    }
                }
                Op::Release(pick) => {
                    let owners: Vec<String> = before
                        .iter()
                        .filter_map(|b| b.owner.as_ref().map(|o| o.to_string()))
                        .collect();
                    if owners.is_empty() {
                        prop_assert!(mgr.release("nobody-0").is_err());
                        prop_assert_eq!(&mgr.snapshot(), &before);
                    } else {
                        let owner = &owners[pick % owners.len()];
                        mgr.release(owner).unwrap();
                    }
                }
                Op::Compact => {
                    let _ = mgr.compact_now();
                }
                Op::Policy(policy) => mgr.set_policy(policy),
            }

            prop_assert!(mgr.table().check_invariants(mode).is_ok());
            let covered: usize = mgr.snapshot().iter().map(|b| b.size).sum();
            prop_assert_eq!(covered, total);

            let stats = mgr.stats();
            prop_assert_eq!(stats.used_memory + stats.free_memory, total);
        }
    }

    #[test]
    fn prop_dynamic_release_leaves_no_adjacent_free(
        sizes in prop::collection::vec(1usize..=3 * MIB, 1..12),
        release_mask in prop::collection::vec(any::<bool>(), 12),
    ) {
        let mut mgr = MemoryManager::default().with_mode(PartitionMode::Dynamic);
        let mut placed = Vec::new();
        for size in sizes {
            if mgr.allocate("P", size).is_ok() {
                placed.push(format!("P-{}", placed.len() + 1));
            }
        }
        for (owner, release) in placed.iter().zip(release_mask) {
            if release {
                let snapshot = mgr.release(owner).unwrap();
                let adjacent_free = snapshot
                    .blocks
                    .windows(2)
                    .any(|pair| pair[0].free && pair[1].free);
                prop_assert!(!adjacent_free);
            }
        }
    }

    #[test]
    fn prop_compaction_is_idempotent_and_keeps_owners(
        sizes in prop::collection::vec(1usize..=2 * MIB, 1..10),
        release_every in 2usize..4,
    ) {
        let mut mgr = MemoryManager::default().with_mode(PartitionMode::Compaction);
        for size in sizes {
            let _ = mgr.allocate("P", size);
        }
        let owners: Vec<String> = mgr
            .snapshot()
            .iter()
            .filter_map(|b| b.owner.as_ref().map(|o| o.to_string()))
            .collect();
        for owner in owners.iter().step_by(release_every) {
            mgr.release(owner).unwrap();
        }

        let occupied_before: Vec<(String, usize)> = mgr
            .snapshot()
            .iter()
            .filter_map(|b| b.owner.as_ref().map(|o| (o.to_string(), b.size)))
            .collect();

        let once = mgr.compact_now().unwrap();
        let twice = mgr.compact_now().unwrap();
        prop_assert_eq!(&once, &twice);

        let occupied_after: Vec<(String, usize)> = once
            .iter()
            .filter_map(|b| b.owner.as_ref().map(|o| (o.to_string(), b.size)))
            .collect();
        prop_assert_eq!(occupied_before, occupied_after);
        prop_assert!(once.free_blocks().count() <= 1);
        if let Some(last) = once.blocks.last() {
            prop_assert_eq!(last.end(), 16 * MIB);
        }
    }
}

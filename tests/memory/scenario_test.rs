/*!
 * Scenario Tests
 * End-to-end walkthroughs of each partitioning mode
 */

use partition_sim::{
    Block, MemoryConfig, MemoryError, MemoryInfo, MemoryManager, OwnerId, PartitionMode,
    PlacementPolicy, MIB,
};
use pretty_assertions::assert_eq;

fn manager(mode: PartitionMode, policy: PlacementPolicy) -> MemoryManager {
    MemoryManager::new(MemoryConfig::default())
        .expect("default config is valid")
        .with_mode(mode)
        .with_policy(policy)
}

#[test]
fn test_fixed_mode_internal_fragmentation() {
    let mut mgr = manager(PartitionMode::Fixed, PlacementPolicy::First);
    assert_eq!(mgr.snapshot().len(), 8);
    assert!(mgr.snapshot().iter().all(|b| b.free && b.size == 2 * MIB));

    let snapshot = mgr.launch("NotePad").unwrap();
    let first = &snapshot.blocks[0];
    assert_eq!(first.owner, Some(OwnerId::from("NotePad-1")));
    assert_eq!(first.payload, Some(MIB));
    assert_eq!(first.internal_fragmentation(), Some(MIB));
    assert_eq!(snapshot.free_blocks().count(), 7);
    assert_eq!(mgr.stats().internal_fragmentation, MIB);
}

#[test]
fn test_fixed_mode_release_keeps_partition() {
    let mut mgr = manager(PartitionMode::Fixed, PlacementPolicy::First);
    mgr.allocate("A", MIB).unwrap();
    mgr.allocate("B", MIB).unwrap();
    let snapshot = mgr.release("A-1").unwrap();

    // Static partitions never merge, even with a free neighbour
    assert_eq!(snapshot.len(), 8);
    assert_eq!(snapshot.blocks[0], Block::free(0, 2 * MIB));

    // The freed slot is the first fit again
    let snapshot = mgr.allocate("C", 2 * MIB).unwrap();
    assert_eq!(snapshot.blocks[0].owner, Some(OwnerId::from("C-3")));
}

#[test]
fn test_variable_mode_first_fit_only() {
    // Best-fit would choose the 4MB partition; static placement ignores it
    let mut mgr = manager(PartitionMode::Variable, PlacementPolicy::Best);
    mgr.allocate("A", 3 * MIB).unwrap();
    let snapshot = mgr.allocate("B", 2 * MIB).unwrap();

    assert_eq!(snapshot.blocks[1].owner, Some(OwnerId::from("B-2")));
    assert_eq!(snapshot.blocks[2].owner, Some(OwnerId::from("A-1")));
    assert_eq!(snapshot.blocks[2].internal_fragmentation(), Some(0));
}

#[test]
fn test_dynamic_first_fit_walkthrough() {
    let mut mgr = manager(PartitionMode::Dynamic, PlacementPolicy::First);
    mgr.launch("VSCode").unwrap();
    let snapshot = mgr.launch("Excel").unwrap();
    assert_eq!(
        snapshot.blocks,
        vec![
            Block::occupied(0, 5 * MIB, OwnerId::from("VSCode-1")),
            Block::occupied(5 * MIB, 3 * MIB, OwnerId::from("Excel-2")),
            Block::free(8 * MIB, 8 * MIB),
        ]
    );

    let snapshot = mgr.release("VSCode-1").unwrap();
    assert_eq!(
        snapshot.blocks,
        vec![
            Block::free(0, 5 * MIB),
            Block::occupied(5 * MIB, 3 * MIB, OwnerId::from("Excel-2")),
            Block::free(8 * MIB, 8 * MIB),
        ]
    );

    let snapshot = mgr.release("Excel-2").unwrap();
    assert_eq!(snapshot.blocks, vec![Block::free(0, 16 * MIB)]);
}

#[test]
fn test_compaction_walkthrough() {
    let mut mgr = manager(PartitionMode::Compaction, PlacementPolicy::First);
    mgr.allocate("A", 5 * MIB).unwrap();
    mgr.allocate("B", 4 * MIB).unwrap();
    mgr.allocate("C", 2 * MIB).unwrap();
    let snapshot = mgr.release("A-1").unwrap();
    assert_eq!(
        snapshot.blocks,
        vec![
            Block::free(0, 5 * MIB),
            Block::occupied(5 * MIB, 4 * MIB, OwnerId::from("B-2")),
            Block::occupied(9 * MIB, 2 * MIB, OwnerId::from("C-3")),
            Block::free(11 * MIB, 5 * MIB),
        ]
    );

    let snapshot = mgr.compact_now().unwrap();
    assert_eq!(
        snapshot.blocks,
        vec![
            Block::occupied(0, 4 * MIB, OwnerId::from("B-2")),
            Block::occupied(4 * MIB, 2 * MIB, OwnerId::from("C-3")),
            Block::free(6 * MIB, 10 * MIB),
        ]
    );

    let again = mgr.compact_now().unwrap();
    assert_eq!(again, snapshot);
}

#[test]
fn test_compaction_fallback_that_still_fails_keeps_compaction() {
    let mut mgr = manager(PartitionMode::Compaction, PlacementPolicy::First);
    mgr.allocate("A", 4 * MIB).unwrap();
    mgr.allocate("B", 4 * MIB).unwrap();
    mgr.allocate("C", 4 * MIB).unwrap();
    mgr.allocate("D", 4 * MIB).unwrap();
    mgr.release("A-1").unwrap();
    mgr.release("C-3").unwrap();

    let err = mgr.allocate("Big", 9 * MIB).unwrap_err();
    assert_eq!(
        err,
        MemoryError::NoFit {
            requested: 9 * MIB,
            largest_free: 8 * MIB
        }
    );
    assert_eq!(
        mgr.snapshot().blocks,
        vec![
            Block::occupied(0, 4 * MIB, OwnerId::from("B-2")),
            Block::occupied(4 * MIB, 4 * MIB, OwnerId::from("D-4")),
            Block::free(8 * MIB, 8 * MIB),
        ]
    );

    // The next accepted request still gets the next sequence number
    let snapshot = mgr.allocate("E", 8 * MIB).unwrap();
    assert_eq!(snapshot.blocks[2].owner, Some(OwnerId::from("E-5")));
}

#[test]
fn test_dynamic_mode_never_compacts() {
    let mut mgr = manager(PartitionMode::Dynamic, PlacementPolicy::First);
    mgr.allocate("A", 6 * MIB).unwrap();
    mgr.allocate("B", 4 * MIB).unwrap();
    mgr.allocate("C", 6 * MIB).unwrap();
    mgr.release("A-1").unwrap();
    mgr.release("C-3").unwrap();

    let before = mgr.snapshot();
    assert!(matches!(
        mgr.allocate("D", 8 * MIB),
        Err(MemoryError::NoFit { .. })
    ));
    assert_eq!(mgr.snapshot(), before);
    assert_eq!(mgr.stats().external_fragmentation, 6 * MIB);
}

#[test]
fn test_oversized_request_leaves_table_identical() {
    for mode in PartitionMode::ALL {
        let mut mgr = manager(mode, PlacementPolicy::First);
        mgr.allocate("A", MIB).unwrap();
        let before = mgr.snapshot();
        let err = mgr.allocate("Huge", 17 * MIB).unwrap_err();
        assert!(matches!(err, MemoryError::NoFit { requested, .. } if requested == 17 * MIB));
        assert_eq!(mgr.snapshot(), before, "table changed in {} mode", mode);
    }
}

#[test]
fn test_unknown_release_leaves_table_identical() {
    for mode in PartitionMode::ALL {
        let mut mgr = manager(mode, PlacementPolicy::First);
        mgr.allocate("A", MIB).unwrap();
        let before = mgr.snapshot();
        assert_eq!(
            mgr.release("Ghost-42").unwrap_err(),
            MemoryError::NotFound(OwnerId::from("Ghost-42"))
        );
        assert_eq!(mgr.snapshot(), before);
    }
}

#[test]
fn test_double_release_is_not_found() {
    let mut mgr = manager(PartitionMode::Dynamic, PlacementPolicy::First);
    mgr.allocate("A", MIB).unwrap();
    mgr.release("A-1").unwrap();
    assert!(matches!(mgr.release("A-1"), Err(MemoryError::NotFound(_))));
}

#[test]
fn test_mode_switch_discards_processes() {
    let mut mgr = manager(PartitionMode::Dynamic, PlacementPolicy::First);
    mgr.allocate("A", MIB).unwrap();
    let snapshot = mgr.set_mode(PartitionMode::Variable);
    assert!(snapshot.iter().all(|b| b.free));
    assert!(mgr.block_of(&OwnerId::from("A-1")).is_none());
    assert!(matches!(mgr.release("A-1"), Err(MemoryError::NotFound(_))));
}

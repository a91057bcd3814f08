/*!
 * Configuration Tests
 * Loading geometry from JSON and rejecting layouts that cannot tile memory
 */

use partition_sim::{MemoryConfig, MemoryError, MemoryManager, PartitionMode, MIB};
use std::io::Write;

#[test]
fn test_manager_rejects_bad_variable_layout() {
    let config = MemoryConfig::default().with_variable_partitions(vec![MIB, 2 * MIB, 3 * MIB]);
    let err = MemoryManager::new(config).unwrap_err();
    assert!(matches!(err, MemoryError::Configuration(_)));
    assert!(!err.is_recoverable());
}

#[test]
fn test_custom_geometry() {
    let config = MemoryConfig::new(8 * MIB)
        .with_fixed_partition_size(MIB)
        .with_variable_partitions(vec![4 * MIB, 2 * MIB, MIB, MIB]);
    let mut mgr = MemoryManager::new(config).unwrap();

    assert_eq!(mgr.snapshot().len(), 8);
    let variable = mgr.set_mode(PartitionMode::Variable);
    let sizes: Vec<usize> = variable.iter().map(|b| b.size / MIB).collect();
    assert_eq!(sizes, vec![4, 2, 1, 1]);
    let dynamic = mgr.set_mode(PartitionMode::Dynamic);
    assert_eq!(dynamic.blocks[0].size, 8 * MIB);
}

#[test]
fn test_load_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"total_memory": {}, "fixed_partition_size": {}, "variable_partitions": [{}, {}]}}"#,
        4 * MIB,
        MIB,
        3 * MIB,
        MIB
    )
    .unwrap();

    let config = MemoryConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.total_memory, 4 * MIB);
    assert_eq!(config.fixed_partition_count(), 4);
}

#[test]
fn test_load_invalid_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"total_memory": 1000, "fixed_partition_size": 300}}"#).unwrap();
    assert!(matches!(
        MemoryConfig::from_json_file(file.path()),
        Err(MemoryError::Configuration(_))
    ));
    assert!(MemoryConfig::from_json_file("/nonexistent/partition-sim.json").is_err());
}

pub mod key_storage;
pub mod engine_registry;

// Réexportations key_storage
pub use key_storage::{
    EngineSnapshotJson,
    snapshot_to_json, json_to_snapshot,
    snapshot_to_string, snapshot_from_str,
    snapshot_to_bytes, snapshot_from_bytes,
};

// Réexportations engine_registry
pub use engine_registry::SharedEngine;

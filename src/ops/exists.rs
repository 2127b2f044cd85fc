//! Non-failing existence predicates.
//!
//! These are the one designed mechanism for silent, cheap probing: every
//! native failure reads as `false`. Callers wanting "must exist" semantics
//! use the guards in [`crate::ops::guard`] instead.

use crate::core::handle::KeyGuard;
use crate::core::hive::{Hive, Rights, Root};

/// Whether a node exists at the given path. Attempts a minimal-rights
/// open; any failure code reads as `false`.
pub fn key_exists(hive: &Hive, root: Root, path: &str) -> bool {
    KeyGuard::open(hive, root, path, Rights::QUERY_VALUE).is_ok()
}

/// Whether the named entry exists under the node at the given path.
/// Probes the entry's metadata without reading its payload.
pub fn value_exists(hive: &Hive, root: Root, path: &str, value: &str) -> bool {
    hive.query_metadata(root, path, value).is_ok()
}

/// Whether the named entry exists under an already-open node.
pub fn value_exists_at(key: &KeyGuard<'_>, value: &str) -> bool {
    key.hive().query_metadata_at(key.raw(), value).is_ok()
}

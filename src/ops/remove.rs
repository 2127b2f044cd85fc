//! Node and entry removal, non-recursive and recursive.
//!
//! Every bulk form snapshots the names it will delete before mutating
//! anything. Concurrent additions during the loop are not guaranteed to be
//! visited; a snapshotted name deleted concurrently by another actor
//! surfaces as a `SystemFailure` for that iteration, by policy.

use crate::core::error::RegError;
use crate::core::handle::KeyGuard;
use crate::core::hive::{Hive, Rights, Root, join_path};
use crate::ops::{exists, query};

/// Rights required to clear and delete a subtree.
const TEARDOWN: Rights = Rights::DELETE
    .union(Rights::ENUMERATE_SUB_KEYS)
    .union(Rights::QUERY_VALUE)
    .union(Rights::SET_VALUE);

/// Remove a childless node. Returns `false` if the node does not exist.
/// A node that still has children fails with `SystemFailure`, not `false`;
/// callers needing a populated node removed use [`remove_cluster`].
pub fn remove_key(hive: &Hive, root: Root, path: &str) -> Result<bool, RegError> {
    if !exists::key_exists(hive, root, path) {
        return Ok(false);
    }
    let key = KeyGuard::open(hive, root, path, Rights::DELETE)?;
    hive.delete_node(key.raw())?;
    Ok(true)
}

/// Remove every direct child of the node, each with its entire subtree.
/// The node itself and its own entries are untouched. Returns `true` iff
/// at least one child was removed.
pub fn remove_subkeys(hive: &Hive, root: Root, path: &str) -> Result<bool, RegError> {
    if !exists::key_exists(hive, root, path) {
        return Ok(false);
    }
    // Snapshot the children before mutating anything.
    let names = {
        let key = KeyGuard::open(
            hive,
            root,
            path,
            Rights::QUERY_VALUE | Rights::ENUMERATE_SUB_KEYS,
        )?;
        query::list_keys_at(&key)?
    };
    for name in &names {
        let child_path = join_path(path, name);
        let child = KeyGuard::open(hive, root, &child_path, TEARDOWN)?;
        hive.delete_subtree(child.raw())?;
        hive.delete_node(child.raw())?;
    }
    Ok(!names.is_empty())
}

/// Remove every entry of the node. Child nodes are untouched. Returns
/// `true` iff at least one entry was removed.
pub fn remove_values(hive: &Hive, root: Root, path: &str) -> Result<bool, RegError> {
    if !exists::key_exists(hive, root, path) {
        return Ok(false);
    }
    let key = KeyGuard::open(hive, root, path, Rights::SET_VALUE | Rights::QUERY_VALUE)?;
    let names = query::list_value_names_at(&key)?;
    for name in &names {
        hive.delete_entry(key.raw(), name)?;
    }
    Ok(!names.is_empty())
}

/// Remove a node together with all descendant nodes and entries. Returns
/// `false` if the node does not exist.
pub fn remove_cluster(hive: &Hive, root: Root, path: &str) -> Result<bool, RegError> {
    if !exists::key_exists(hive, root, path) {
        return Ok(false);
    }
    {
        let key = KeyGuard::open(hive, root, path, TEARDOWN)?;
        hive.delete_subtree(key.raw())?;
    }
    remove_key(hive, root, path)?;
    Ok(true)
}

/// Remove a single named entry. Returns `false` unless both the node and
/// the entry exist.
pub fn remove_value(hive: &Hive, root: Root, path: &str, value: &str) -> Result<bool, RegError> {
    if !exists::key_exists(hive, root, path) {
        return Ok(false);
    }
    if !exists::value_exists(hive, root, path, value) {
        return Ok(false);
    }
    let key = KeyGuard::open(hive, root, path, Rights::SET_VALUE)?;
    hive.delete_entry(key.raw(), value)?;
    Ok(true)
}

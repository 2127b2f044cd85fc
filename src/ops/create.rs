//! Idempotent node and entry creation.
//!
//! Creation is "ensure present": a pre-existing node is opened rather than
//! failed on, and a pre-existing entry is left untouched rather than
//! overwritten. The disposition tells the caller which of the four
//! outcomes actually happened.

use crate::core::error::RegError;
use crate::core::handle::KeyGuard;
use crate::core::hive::{Hive, Rights, Root};
use crate::core::value::TypedValue;
use crate::ops::{exists, update};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome tag of a creation call. Exactly one per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    KeyCreated,
    KeyExisted,
    ValueCreated,
    ValueExisted,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disposition::KeyCreated => f.write_str("key created"),
            Disposition::KeyExisted => f.write_str("key existed"),
            Disposition::ValueCreated => f.write_str("value created"),
            Disposition::ValueExisted => f.write_str("value existed"),
        }
    }
}

/// Create the node at the given path, or open it if it already exists.
/// Never fails merely because the node pre-exists. The node (and any
/// missing intermediate nodes) is created durable, with read/write rights
/// on the returned handle.
pub fn create_key<'h>(
    hive: &'h Hive,
    root: Root,
    path: &str,
) -> Result<(KeyGuard<'h>, Disposition), RegError> {
    if exists::key_exists(hive, root, path) {
        let key = KeyGuard::open(hive, root, path, Rights::READ | Rights::WRITE)?;
        Ok((key, Disposition::KeyExisted))
    } else {
        let (raw, created) = hive.create_or_open(root, path, Rights::READ | Rights::WRITE)?;
        let key = KeyGuard::new(hive, raw);
        let disposition = if created {
            Disposition::KeyCreated
        } else {
            Disposition::KeyExisted
        };
        Ok((key, disposition))
    }
}

/// Ensure the named entry is present under the node, creating the node
/// first if absent. An already-present entry is left unchanged and
/// reported as `ValueExisted`; the disposition returned is always
/// entry-level, even when the node had to be created along the way.
///
/// The empty path attaches the entry directly to the root node itself.
pub fn create_value<'h>(
    hive: &'h Hive,
    root: Root,
    path: &str,
    value: &str,
    data: TypedValue,
) -> Result<(KeyGuard<'h>, Disposition), RegError> {
    if exists::key_exists(hive, root, path) {
        let key = KeyGuard::open(hive, root, path, Rights::WRITE)?;
        if exists::value_exists(hive, root, path, value) {
            return Ok((key, Disposition::ValueExisted));
        }
        update::set_data_at(&key, value, &data)?;
        Ok((key, Disposition::ValueCreated))
    } else {
        let (key, _) = create_key(hive, root, path)?;
        update::set_data_at(&key, value, &data)?;
        Ok((key, Disposition::ValueCreated))
    }
}

/// Ensure an integer entry is present.
pub fn create_integer<'h>(
    hive: &'h Hive,
    root: Root,
    path: &str,
    value: &str,
    data: u32,
) -> Result<(KeyGuard<'h>, Disposition), RegError> {
    create_value(hive, root, path, value, TypedValue::Integer(data))
}

/// Ensure a string entry is present.
pub fn create_string<'h>(
    hive: &'h Hive,
    root: Root,
    path: &str,
    value: &str,
    data: &str,
) -> Result<(KeyGuard<'h>, Disposition), RegError> {
    create_value(hive, root, path, value, TypedValue::Text(data.to_string()))
}

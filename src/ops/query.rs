//! Typed readers and node introspection.

use crate::core::error::RegError;
use crate::core::handle::KeyGuard;
use crate::core::hive::{Hive, Rights, Root, Status};
use crate::core::value::{Restrict, ValueType};
use crate::ops::guard;
use serde::{Deserialize, Serialize};

/// Direct-child counts and longest direct-child name lengths. Each length
/// is inflated by one so a caller-allocated buffer always has room for a
/// terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
    pub subkeys: usize,
    pub max_subkey_len: usize,
    pub values: usize,
    pub max_value_len: usize,
}

/// Read a 32-bit unsigned integer entry.
///
/// Fails, in order, if the node does not exist, the entry does not exist,
/// the entry is not integer-typed, or the fetch itself fails despite the
/// checks (a concurrent retype or removal surfaces as `SystemFailure`).
pub fn read_integer(hive: &Hive, root: Root, path: &str, value: &str) -> Result<u32, RegError> {
    guard::require_type(hive, root, path, value, ValueType::Integer)?;

    let data = hive.read_typed(
        root,
        path,
        value,
        Restrict::Exact(ValueType::Integer),
        size_of::<u32>(),
    )?;
    let bytes: [u8; 4] = data
        .as_slice()
        .try_into()
        .map_err(|_| RegError::system(Status::STORAGE))?;
    Ok(u32::from_le_bytes(bytes))
}

/// Read a string entry. The trailing terminator is excluded from the
/// returned string.
pub fn read_string(hive: &Hive, root: Root, path: &str, value: &str) -> Result<String, RegError> {
    guard::require_type(hive, root, path, value, ValueType::Text)?;

    // Size the buffer from peek: character count plus one terminator.
    let (_, size) = guard::peek(hive, root, path, value)?;
    let mut data = hive.read_typed(root, path, value, Restrict::Exact(ValueType::Text), size)?;
    if data.last() == Some(&0) {
        data.pop();
    }
    Ok(String::from_utf8_lossy(&data).into_owned())
}

/// Introspect an already-open node.
pub fn key_info_at(key: &KeyGuard<'_>) -> Result<KeyInfo, RegError> {
    let (subkeys, max_subkey, values, max_value) = key.hive().query_counts(key.raw())?;
    Ok(KeyInfo {
        subkeys,
        max_subkey_len: max_subkey + 1,
        values,
        max_value_len: max_value + 1,
    })
}

/// Introspect the node at the given path.
pub fn key_info(hive: &Hive, root: Root, path: &str) -> Result<KeyInfo, RegError> {
    guard::require_key(hive, root, path)?;

    let key = KeyGuard::open(hive, root, path, Rights::QUERY_VALUE)?;
    key_info_at(&key)
}

/// Names of all direct child nodes of an already-open node, in store order
/// (undefined; callers must not assume alphabetical).
pub fn list_keys_at(key: &KeyGuard<'_>) -> Result<Vec<String>, RegError> {
    let info = key_info_at(key)?;
    enumerate(key, info.subkeys, info.max_subkey_len, Hive::enumerate_child_at)
}

/// Names of all direct child nodes of the node at the given path.
pub fn list_keys(hive: &Hive, root: Root, path: &str) -> Result<Vec<String>, RegError> {
    guard::require_key(hive, root, path)?;

    let key = KeyGuard::open(
        hive,
        root,
        path,
        Rights::QUERY_VALUE | Rights::ENUMERATE_SUB_KEYS,
    )?;
    list_keys_at(&key)
}

/// Names of all entries of an already-open node, in store order.
pub fn list_value_names_at(key: &KeyGuard<'_>) -> Result<Vec<String>, RegError> {
    let info = key_info_at(key)?;
    enumerate(key, info.values, info.max_value_len, Hive::enumerate_entry_at)
}

/// Names of all entries of the node at the given path.
pub fn list_value_names(hive: &Hive, root: Root, path: &str) -> Result<Vec<String>, RegError> {
    guard::require_key(hive, root, path)?;

    let key = KeyGuard::open(hive, root, path, Rights::QUERY_VALUE)?;
    list_value_names_at(&key)
}

/// Enumerate by increasing index until the store signals the end of the
/// sequence; a reusable buffer sized from `key_info` is guaranteed to fit
/// every name. Any status other than `NO_MORE_ITEMS` is a hard failure.
fn enumerate(
    key: &KeyGuard<'_>,
    expected: usize,
    buffer_len: usize,
    fetch: impl Fn(&Hive, crate::core::hive::RawKey, usize, usize) -> Result<String, Status>,
) -> Result<Vec<String>, RegError> {
    let mut names = Vec::with_capacity(expected);
    let mut index = 0;
    loop {
        match fetch(key.hive(), key.raw(), index, buffer_len) {
            Ok(name) => names.push(name),
            Err(status) if status == Status::NO_MORE_ITEMS => break,
            Err(status) => return Err(RegError::system(status)),
        }
        index += 1;
    }
    Ok(names)
}

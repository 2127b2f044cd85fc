//! Typed writers. These presuppose the entry already exists with a
//! matching declared type; creating a new entry goes through
//! [`crate::ops::create`], never through here.

use crate::core::error::RegError;
use crate::core::handle::KeyGuard;
use crate::core::hive::{Hive, Rights, Root};
use crate::core::value::{TypedValue, ValueType};
use crate::ops::guard;

/// Overwrite an existing integer-typed entry.
pub fn write_integer(
    hive: &Hive,
    root: Root,
    path: &str,
    value: &str,
    data: u32,
) -> Result<(), RegError> {
    guard::require_type(hive, root, path, value, ValueType::Integer)?;
    set_data(hive, root, path, value, &TypedValue::Integer(data))
}

/// Overwrite an existing string-typed entry. One trailing terminator is
/// written after the payload.
pub fn write_string(
    hive: &Hive,
    root: Root,
    path: &str,
    value: &str,
    data: &str,
) -> Result<(), RegError> {
    guard::require_type(hive, root, path, value, ValueType::Text)?;
    set_data(hive, root, path, value, &TypedValue::Text(data.to_string()))
}

pub(crate) fn set_data(
    hive: &Hive,
    root: Root,
    path: &str,
    value: &str,
    data: &TypedValue,
) -> Result<(), RegError> {
    let key = KeyGuard::open(hive, root, path, Rights::SET_VALUE)?;
    set_data_at(&key, value, data)
}

pub(crate) fn set_data_at(
    key: &KeyGuard<'_>,
    value: &str,
    data: &TypedValue,
) -> Result<(), RegError> {
    key.hive()
        .write_typed(key.raw(), value, data.value_type().code(), &data.to_bytes())?;
    Ok(())
}

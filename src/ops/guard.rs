//! Throwing validation guards, layered on the existence predicates.
//!
//! Every typed accessor runs these in a fixed order: node exists, entry
//! exists, type matches. The ordering is what makes the error kinds
//! well-defined — a missing node is never reported as a missing entry.

use crate::core::error::{RegError, describe};
use crate::core::hive::{Hive, Root};
use crate::core::value::ValueType;
use crate::ops::exists;

/// Fail with `NotFound(Key)` unless the node exists.
pub fn require_key(hive: &Hive, root: Root, path: &str) -> Result<(), RegError> {
    if exists::key_exists(hive, root, path) {
        Ok(())
    } else {
        Err(RegError::key_not_found(root, path))
    }
}

/// Fail with `NotFound(Key)` or `NotFound(Value)` unless both the node and
/// the named entry exist.
pub fn require_value(hive: &Hive, root: Root, path: &str, value: &str) -> Result<(), RegError> {
    require_key(hive, root, path)?;
    if exists::value_exists(hive, root, path, value) {
        Ok(())
    } else {
        Err(RegError::value_not_found(root, path, value))
    }
}

/// Declared type and size of an entry, without reading its payload.
///
/// The store reports text sizes with the trailing terminator counted twice
/// (it stores wide characters internally); one unit is subtracted here, so
/// for text entries the returned size equals character count plus a single
/// terminator.
pub fn peek(hive: &Hive, root: Root, path: &str, value: &str) -> Result<(ValueType, usize), RegError> {
    require_key(hive, root, path)?;
    require_value(hive, root, path, value)?;

    let (type_code, reported) = hive.query_metadata(root, path, value)?;
    let value_type = ValueType::from_code(type_code)
        .ok_or_else(|| RegError::Unsupported(format!("value type code {type_code}")))?;
    let size = if value_type == ValueType::Text {
        reported - 1
    } else {
        reported
    };
    Ok((value_type, size))
}

/// Fail with `TypeMismatch` unless the entry's declared type is `expected`.
/// Also fails, in order, if the node or entry is absent.
pub fn require_type(
    hive: &Hive,
    root: Root,
    path: &str,
    value: &str,
    expected: ValueType,
) -> Result<(), RegError> {
    require_key(hive, root, path)?;
    require_value(hive, root, path, value)?;

    let (actual, _) = peek(hive, root, path, value)?;
    if actual != expected {
        return Err(RegError::TypeMismatch {
            location: describe(root, path, Some(value)),
            expected,
            actual,
        });
    }
    Ok(())
}

//! Declared entry types and the closed set of typed payloads.

use serde::Serialize;
use std::fmt;

/// Declared type tag of an entry. The set is closed; only [`ValueType::Integer`]
/// and [`ValueType::Text`] are handled by the typed accessors, the rest
/// surface through introspection and type-mismatch diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueType {
    None,
    Text,
    ExpandText,
    Binary,
    Integer,
    BigEndianInteger,
    Link,
    MultiText,
    ResourceList,
    FullResourceDescriptor,
    ResourceRequirements,
    BigInteger,
}

impl ValueType {
    const ALL: [ValueType; 12] = [
        ValueType::None,
        ValueType::Text,
        ValueType::ExpandText,
        ValueType::Binary,
        ValueType::Integer,
        ValueType::BigEndianInteger,
        ValueType::Link,
        ValueType::MultiText,
        ValueType::ResourceList,
        ValueType::FullResourceDescriptor,
        ValueType::ResourceRequirements,
        ValueType::BigInteger,
    ];

    /// Stable numeric code stored alongside the payload.
    pub const fn code(self) -> u32 {
        match self {
            ValueType::None => 0,
            ValueType::Text => 1,
            ValueType::ExpandText => 2,
            ValueType::Binary => 3,
            ValueType::Integer => 4,
            ValueType::BigEndianInteger => 5,
            ValueType::Link => 6,
            ValueType::MultiText => 7,
            ValueType::ResourceList => 8,
            ValueType::FullResourceDescriptor => 9,
            ValueType::ResourceRequirements => 10,
            ValueType::BigInteger => 11,
        }
    }

    pub fn from_code(code: u32) -> Option<ValueType> {
        ValueType::ALL.into_iter().find(|ty| ty.code() == code)
    }

    /// Display string used in type-mismatch diagnostics.
    pub const fn display_name(self) -> &'static str {
        match self {
            ValueType::None => "no type",
            ValueType::Text => "nul terminated string",
            ValueType::ExpandText => "expandable nul terminated string",
            ValueType::Binary => "free form binary",
            ValueType::Integer => "32-bit number",
            ValueType::BigEndianInteger => "32-bit number (big endian)",
            ValueType::Link => "symbolic link",
            ValueType::MultiText => "multiple strings",
            ValueType::ResourceList => "resource list",
            ValueType::FullResourceDescriptor => "full resource descriptor",
            ValueType::ResourceRequirements => "resource requirements list",
            ValueType::BigInteger => "64-bit number",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A payload the typed accessors know how to read and write. Adding a
/// variant here is a deliberate, compile-checked extension: every match on
/// this union must be revisited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    Integer(u32),
    Text(String),
}

impl TypedValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            TypedValue::Integer(_) => ValueType::Integer,
            TypedValue::Text(_) => ValueType::Text,
        }
    }

    /// Wire form of the payload. Text carries one trailing terminator;
    /// integers are four little-endian bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            TypedValue::Integer(n) => n.to_le_bytes().to_vec(),
            TypedValue::Text(s) => {
                let mut bytes = s.as_bytes().to_vec();
                bytes.push(0);
                bytes
            }
        }
    }
}

/// Type restriction applied by the engine's payload fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restrict {
    Any,
    Exact(ValueType),
}

impl Restrict {
    pub fn admits(self, type_code: u32) -> bool {
        match self {
            Restrict::Any => true,
            Restrict::Exact(ty) => ty.code() == type_code,
        }
    }
}

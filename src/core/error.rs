//! Error taxonomy and location diagnostics.
//!
//! Two tiers by design: the `ops::exists` predicates never fail and are the
//! one mechanism for silent probing; everything else fails loudly with one
//! of the kinds below. Nothing is retried or recovered internally.

use crate::core::hive::{Root, Status};
use crate::core::value::ValueType;
use std::env;
use std::fmt;
use std::io;
use thiserror::Error;

/// What a `NotFound` failure was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Key,
    Value,
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Key => f.write_str("key"),
            Missing::Value => f.write_str("value"),
        }
    }
}

#[derive(Error, Debug)]
pub enum RegError {
    #[error("the {kind} \"{location}\" does not exist")]
    NotFound { kind: Missing, location: String },
    #[error("error working with \"{location}\" - expected a {expected}, but found a {actual}")]
    TypeMismatch {
        location: String,
        expected: ValueType,
        actual: ValueType,
    },
    #[error("operation not supported: {0}")]
    Unsupported(String),
    #[error("hive failure {code:#x}: {message}")]
    SystemFailure { code: u32, message: String },
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("environment variable error: {0}")]
    EnvVar(#[from] env::VarError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RegError {
    pub fn key_not_found(root: Root, path: &str) -> Self {
        RegError::NotFound {
            kind: Missing::Key,
            location: describe(root, path, None),
        }
    }

    pub fn value_not_found(root: Root, path: &str, value: &str) -> Self {
        RegError::NotFound {
            kind: Missing::Value,
            location: describe(root, path, Some(value)),
        }
    }

    pub fn system(status: Status) -> Self {
        RegError::SystemFailure {
            code: status.code(),
            message: status.message().to_string(),
        }
    }
}

impl From<Status> for RegError {
    fn from(status: Status) -> Self {
        RegError::system(status)
    }
}

/// Slash-joined human-readable location: root, optional path, optional
/// value name. Used only for error messages, never for lookups.
pub fn describe(root: Root, path: &str, value: Option<&str>) -> String {
    let mut location = root.as_str().to_string();
    if !path.is_empty() {
        location.push('/');
        location.push_str(path);
    }
    if let Some(value) = value {
        location.push('/');
        location.push_str(value);
    }
    location
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_joins_present_parts_only() {
        assert_eq!(describe(Root::Machine, "", None), "MACHINE");
        assert_eq!(describe(Root::Software, "a/b", None), "SOFTWARE/a/b");
        assert_eq!(
            describe(Root::User, "a", Some("port")),
            "USER/a/port"
        );
        // Default entry of the root node itself.
        assert_eq!(describe(Root::Config, "", Some("")), "CONFIG/");
    }

    #[test]
    fn system_failure_carries_code_and_message() {
        let err = RegError::system(Status::NO_MORE_ITEMS);
        match err {
            RegError::SystemFailure { code, ref message } => {
                assert_eq!(code, Status::NO_MORE_ITEMS.code());
                assert_eq!(message, Status::NO_MORE_ITEMS.message());
            }
            _ => panic!("expected SystemFailure"),
        }
    }
}

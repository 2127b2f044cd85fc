//! Infrastructure: the storage engine, handle guard, error taxonomy,
//! typed payloads, and hive location resolution.

pub mod config;
pub mod error;
pub mod handle;
pub mod hive;
pub mod value;

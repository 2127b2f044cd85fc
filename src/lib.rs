//! hivereg: a convenience layer over a hierarchical, typed key/value hive.
//!
//! The hive is a tree of named nodes ("keys") addressed by a root selector
//! plus a slash-delimited path, each node holding zero or more typed named
//! entries ("values"). This crate exposes existence checks, typed
//! create/read/update/delete, recursive subtree removal, and enumeration
//! through path-based functions that hide handle lifecycle and status-code
//! plumbing.
//!
//! # Layering
//!
//! - [`core::hive`]: the SQLite-backed store itself — raw handles, status
//!   codes, and the primitive open/query/set/delete/enumerate surface.
//! - [`core::handle`]: scoped handle ownership; release exactly once on
//!   every exit path.
//! - [`ops::exists`]: non-failing predicates, the one mechanism for silent
//!   probing.
//! - [`ops::guard`]: throwing checks in a fixed order — node exists, entry
//!   exists, type matches.
//! - [`ops::query`] / [`ops::update`] / [`ops::create`] / [`ops::remove`]:
//!   the typed operation surface on top of the guards.
//!
//! # Two-tier error design
//!
//! The existence predicates never fail; every other operation that cannot
//! complete its contract fails loudly with a [`RegError`] and is never
//! retried internally. "Check, then act" uses the predicates; "must exist"
//! uses the accessors.
//!
//! # Example
//!
//! ```
//! use hivereg::{Disposition, Hive, Root, create, query, remove};
//!
//! # fn main() -> Result<(), hivereg::RegError> {
//! let hive = Hive::open_in_memory()?;
//!
//! let (_, disposition) = create::create_integer(&hive, Root::Software, "acme/tool", "retries", 3)?;
//! assert_eq!(disposition, Disposition::ValueCreated);
//! assert_eq!(query::read_integer(&hive, Root::Software, "acme/tool", "retries")?, 3);
//!
//! assert!(remove::remove_cluster(&hive, Root::Software, "acme")?);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod ops;

pub use crate::core::config;
pub use crate::core::error::{Missing, RegError, describe};
pub use crate::core::handle::KeyGuard;
pub use crate::core::hive::{Hive, RawKey, Rights, Root, Status, join_path, split_path};
pub use crate::core::value::{Restrict, TypedValue, ValueType};
pub use crate::ops::create::Disposition;
pub use crate::ops::query::KeyInfo;
pub use crate::ops::{create, exists, guard, query, remove, update};

//! The operation surface: existence predicates, validation guards, and the
//! query/update/create/remove subsystems, layered in that order.
//!
//! Every function here takes the hive by reference, opens whatever handles
//! it needs for exactly one call, and releases them before returning. No
//! node or entry state is retained between calls.

pub mod create;
pub mod exists;
pub mod guard;
pub mod query;
pub mod remove;
pub mod update;

//! SQLite-backed hive engine.
//!
//! The hive is the single underlying store: a tree of named nodes (keys)
//! rooted at a fixed set of root selectors, each node holding zero or more
//! typed named entries (values). This module speaks raw status codes and
//! handles; everything user-facing lives in the `ops` layer above it.
//!
//! Handles are opaque tickets into an in-process handle table. Each handle
//! records the access rights it was opened with; an operation lacking the
//! required right fails with `ACCESS_DENIED`. A handle whose node has been
//! deleted out from under it yields `NOT_FOUND` on subsequent use.

use crate::core::error::RegError;
use crate::core::value::{Restrict, ValueType};
use bitflags::bitflags;
use rusqlite::{Connection, OptionalExtension, params};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Root selectors for the hive tree. Every path is resolved relative to
/// exactly one of these; the set is closed and seeded at hive open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Root {
    Machine,
    User,
    Software,
    System,
    Config,
}

impl Root {
    pub const ALL: [Root; 5] = [
        Root::Machine,
        Root::User,
        Root::Software,
        Root::System,
        Root::Config,
    ];

    /// Stable numeric code stored in the hive file.
    pub const fn code(self) -> u32 {
        match self {
            Root::Machine => 0,
            Root::User => 1,
            Root::Software => 2,
            Root::System => 3,
            Root::Config => 4,
        }
    }

    /// Display name used in diagnostics and the hive file itself.
    pub const fn as_str(self) -> &'static str {
        match self {
            Root::Machine => "MACHINE",
            Root::User => "USER",
            Root::Software => "SOFTWARE",
            Root::System => "SYSTEM",
            Root::Config => "CONFIG",
        }
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Root {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Root::ALL
            .into_iter()
            .find(|root| root.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown root '{s}' (expected one of machine, user, software, system, config)"))
    }
}

bitflags! {
    /// Access rights recorded on an open handle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Rights: u32 {
        const QUERY_VALUE        = 0x0001;
        const SET_VALUE          = 0x0002;
        const CREATE_SUB_KEY     = 0x0004;
        const ENUMERATE_SUB_KEYS = 0x0008;
        const DELETE             = 0x0010;
    }
}

impl Rights {
    pub const READ: Rights = Rights::QUERY_VALUE.union(Rights::ENUMERATE_SUB_KEYS);
    pub const WRITE: Rights = Rights::SET_VALUE.union(Rights::CREATE_SUB_KEY);
}

/// Native status code returned by every engine primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(u32);

impl Status {
    /// The node or entry addressed does not exist.
    pub const NOT_FOUND: Status = Status(2);
    /// The handle lacks the right required by the operation, or the target
    /// is permanent (a root node).
    pub const ACCESS_DENIED: Status = Status(5);
    /// The handle is not present in the handle table.
    pub const INVALID_HANDLE: Status = Status(6);
    /// Non-recursive node deletion attempted while child nodes remain.
    pub const NOT_EMPTY: Status = Status(145);
    /// The caller-supplied buffer is too small for the item.
    pub const MORE_DATA: Status = Status(234);
    /// Enumeration index ran past the end of the sequence.
    pub const NO_MORE_ITEMS: Status = Status(259);
    /// The entry's declared type does not satisfy the read restriction.
    pub const TYPE_RESTRICTED: Status = Status(1630);
    /// The storage engine itself failed.
    pub const STORAGE: Status = Status(1009);

    pub const fn code(self) -> u32 {
        self.0
    }

    /// Human-readable translation of the code. Advisory only; unknown codes
    /// render a fixed fallback.
    pub const fn message(self) -> &'static str {
        match self.0 {
            2 => "the system cannot find the item specified",
            5 => "access is denied",
            6 => "the handle is invalid",
            145 => "the node is not empty",
            234 => "more data is available than the buffer can hold",
            259 => "no more items are available",
            1630 => "the data type does not satisfy the requested restriction",
            1009 => "the hive storage engine failed",
            _ => "could not format message",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}: {}", self.0, self.message())
    }
}

impl From<rusqlite::Error> for Status {
    fn from(_: rusqlite::Error) -> Self {
        Status::STORAGE
    }
}

/// Opaque handle to an open node. Not cloneable; exactly one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawKey(u64);

struct OpenKey {
    node: i64,
    rights: Rights,
}

const HIVE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS nodes (
    id      INTEGER PRIMARY KEY,
    parent  INTEGER REFERENCES nodes(id) ON DELETE CASCADE,
    root    INTEGER,
    name    TEXT NOT NULL COLLATE NOCASE
);
CREATE UNIQUE INDEX IF NOT EXISTS nodes_child ON nodes(parent, name) WHERE parent IS NOT NULL;
CREATE UNIQUE INDEX IF NOT EXISTS nodes_root ON nodes(root) WHERE parent IS NULL;
CREATE TABLE IF NOT EXISTS entries (
    node    INTEGER NOT NULL REFERENCES nodes(id) ON DELETE CASCADE,
    name    TEXT NOT NULL COLLATE NOCASE,
    type    INTEGER NOT NULL,
    data    BLOB NOT NULL,
    PRIMARY KEY (node, name)
);
";

/// Split a node path into segments. Both separators are accepted; empty
/// segments (doubled or trailing separators) are ignored. The empty path
/// denotes the root node itself.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split(['/', '\\']).filter(|segment| !segment.is_empty())
}

/// Join a node path and a child name.
pub fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}/{name}")
    }
}

/// The underlying store. Internally synchronized; safe to share by
/// reference across threads. The `ops` layer adds no locking of its own.
pub struct Hive {
    conn: Mutex<Connection>,
    handles: Mutex<FxHashMap<u64, OpenKey>>,
    next_handle: AtomicU64,
}

impl Hive {
    /// Open (creating if necessary) a durable hive file.
    pub fn open(path: &Path) -> Result<Self, RegError> {
        Self::init(Connection::open(path)?)
    }

    /// Open a private in-memory hive. State is lost on drop.
    pub fn open_in_memory() -> Result<Self, RegError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, RegError> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))?;
        conn.execute("PRAGMA foreign_keys=ON;", [])?;
        conn.execute_batch(HIVE_SCHEMA)?;
        for root in Root::ALL {
            conn.execute(
                "INSERT OR IGNORE INTO nodes(parent, root, name) VALUES (NULL, ?1, ?2)",
                params![root.code(), root.as_str()],
            )?;
        }
        Ok(Self {
            conn: Mutex::new(conn),
            handles: Mutex::new(FxHashMap::default()),
            next_handle: AtomicU64::new(1),
        })
    }

    // ===== Handle table =====

    fn register(&self, node: i64, rights: Rights) -> Result<RawKey, Status> {
        let id = self.next_handle.fetch_add(1, Ordering::Relaxed);
        let mut handles = self.handles.lock().map_err(|_| Status::STORAGE)?;
        handles.insert(id, OpenKey { node, rights });
        Ok(RawKey(id))
    }

    fn resolve(&self, key: RawKey, need: Rights) -> Result<i64, Status> {
        let handles = self.handles.lock().map_err(|_| Status::STORAGE)?;
        let open = handles.get(&key.0).ok_or(Status::INVALID_HANDLE)?;
        if !open.rights.contains(need) {
            return Err(Status::ACCESS_DENIED);
        }
        Ok(open.node)
    }

    /// Release an open handle. Fails `INVALID_HANDLE` on double close.
    pub fn close(&self, key: RawKey) -> Result<(), Status> {
        let mut handles = self.handles.lock().map_err(|_| Status::STORAGE)?;
        handles
            .remove(&key.0)
            .map(|_| ())
            .ok_or(Status::INVALID_HANDLE)
    }

    // ===== Node resolution =====

    fn root_id(conn: &Connection, root: Root) -> Result<i64, Status> {
        conn.query_row(
            "SELECT id FROM nodes WHERE parent IS NULL AND root = ?1",
            params![root.code()],
            |row| row.get(0),
        )
        .optional()?
        .ok_or(Status::STORAGE)
    }

    fn lookup(conn: &Connection, root: Root, path: &str) -> Result<Option<i64>, Status> {
        let mut node = Self::root_id(conn, root)?;
        for segment in split_path(path) {
            let next: Option<i64> = conn
                .query_row(
                    "SELECT id FROM nodes WHERE parent = ?1 AND name = ?2",
                    params![node, segment],
                    |row| row.get(0),
                )
                .optional()?;
            match next {
                Some(id) => node = id,
                None => return Ok(None),
            }
        }
        Ok(Some(node))
    }

    fn live(conn: &Connection, node: i64) -> Result<(), Status> {
        conn.query_row("SELECT 1 FROM nodes WHERE id = ?1", params![node], |_| {
            Ok(())
        })
        .optional()?
        .ok_or(Status::NOT_FOUND)
    }

    // ===== Primitives =====

    /// Open an existing node with the given rights.
    pub fn open_key(&self, root: Root, path: &str, rights: Rights) -> Result<RawKey, Status> {
        let node = {
            let conn = self.conn.lock().map_err(|_| Status::STORAGE)?;
            Self::lookup(&conn, root, path)?.ok_or(Status::NOT_FOUND)?
        };
        self.register(node, rights)
    }

    /// Open the node, creating it (and any missing intermediate nodes,
    /// durably) if absent. The flag reports whether the final node was
    /// newly created.
    pub fn create_or_open(
        &self,
        root: Root,
        path: &str,
        rights: Rights,
    ) -> Result<(RawKey, bool), Status> {
        let (node, created) = {
            let conn = self.conn.lock().map_err(|_| Status::STORAGE)?;
            let mut node = Self::root_id(&conn, root)?;
            let mut created = false;
            for segment in split_path(path) {
                let existing: Option<i64> = conn
                    .query_row(
                        "SELECT id FROM nodes WHERE parent = ?1 AND name = ?2",
                        params![node, segment],
                        |row| row.get(0),
                    )
                    .optional()?;
                match existing {
                    Some(id) => {
                        node = id;
                        created = false;
                    }
                    None => {
                        conn.execute(
                            "INSERT INTO nodes(parent, name) VALUES (?1, ?2)",
                            params![node, segment],
                        )?;
                        node = conn.last_insert_rowid();
                        created = true;
                    }
                }
            }
            (node, created)
        };
        Ok((self.register(node, rights)?, created))
    }

    /// Declared type code and size of a named entry, without its payload.
    /// For text entries the reported size double-counts the trailing
    /// terminator; callers above apply the documented correction.
    pub fn query_metadata(&self, root: Root, path: &str, name: &str) -> Result<(u32, usize), Status> {
        let conn = self.conn.lock().map_err(|_| Status::STORAGE)?;
        let node = Self::lookup(&conn, root, path)?.ok_or(Status::NOT_FOUND)?;
        Self::metadata(&conn, node, name)
    }

    /// Handle form of [`Hive::query_metadata`].
    pub fn query_metadata_at(&self, key: RawKey, name: &str) -> Result<(u32, usize), Status> {
        let node = self.resolve(key, Rights::QUERY_VALUE)?;
        let conn = self.conn.lock().map_err(|_| Status::STORAGE)?;
        Self::live(&conn, node)?;
        Self::metadata(&conn, node, name)
    }

    fn metadata(conn: &Connection, node: i64, name: &str) -> Result<(u32, usize), Status> {
        let row: Option<(u32, i64)> = conn
            .query_row(
                "SELECT type, LENGTH(data) FROM entries WHERE node = ?1 AND name = ?2",
                params![node, name],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let (type_code, mut size) = row.ok_or(Status::NOT_FOUND)?;
        if type_code == ValueType::Text.code() {
            size += 1;
        }
        Ok((type_code, size as usize))
    }

    /// Fetch an entry's payload, restricted to the given type, into a
    /// buffer of `buffer_len` bytes.
    pub fn read_typed(
        &self,
        root: Root,
        path: &str,
        name: &str,
        restrict: Restrict,
        buffer_len: usize,
    ) -> Result<Vec<u8>, Status> {
        let conn = self.conn.lock().map_err(|_| Status::STORAGE)?;
        let node = Self::lookup(&conn, root, path)?.ok_or(Status::NOT_FOUND)?;
        let row: Option<(u32, Vec<u8>)> = conn
            .query_row(
                "SELECT type, data FROM entries WHERE node = ?1 AND name = ?2",
                params![node, name],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let (type_code, data) = row.ok_or(Status::NOT_FOUND)?;
        if !restrict.admits(type_code) {
            return Err(Status::TYPE_RESTRICTED);
        }
        if data.len() > buffer_len {
            return Err(Status::MORE_DATA);
        }
        Ok(data)
    }

    /// Write an entry's payload under the given name, replacing any
    /// previous payload and declared type.
    pub fn write_typed(
        &self,
        key: RawKey,
        name: &str,
        type_code: u32,
        data: &[u8],
    ) -> Result<(), Status> {
        let node = self.resolve(key, Rights::SET_VALUE)?;
        let conn = self.conn.lock().map_err(|_| Status::STORAGE)?;
        Self::live(&conn, node)?;
        conn.execute(
            "INSERT INTO entries(node, name, type, data) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(node, name) DO UPDATE SET type = excluded.type, data = excluded.data",
            params![node, name, type_code, data],
        )?;
        Ok(())
    }

    /// Non-recursive node deletion. Fails `NOT_EMPTY` while child nodes
    /// remain; the node's own entries are removed with it. Root nodes are
    /// permanent.
    pub fn delete_node(&self, key: RawKey) -> Result<(), Status> {
        let node = self.resolve(key, Rights::DELETE)?;
        let conn = self.conn.lock().map_err(|_| Status::STORAGE)?;
        let parent: Option<i64> = conn
            .query_row("SELECT parent FROM nodes WHERE id = ?1", params![node], |row| {
                row.get(0)
            })
            .optional()?
            .ok_or(Status::NOT_FOUND)?;
        if parent.is_none() {
            return Err(Status::ACCESS_DENIED);
        }
        let children: i64 = conn.query_row(
            "SELECT COUNT(*) FROM nodes WHERE parent = ?1",
            params![node],
            |row| row.get(0),
        )?;
        if children > 0 {
            return Err(Status::NOT_EMPTY);
        }
        conn.execute("DELETE FROM nodes WHERE id = ?1", params![node])?;
        Ok(())
    }

    /// Remove every descendant node and every entry of the node, leaving
    /// the node itself in place.
    pub fn delete_subtree(&self, key: RawKey) -> Result<(), Status> {
        let node = self.resolve(key, Rights::DELETE)?;
        let conn = self.conn.lock().map_err(|_| Status::STORAGE)?;
        Self::live(&conn, node)?;
        // Descendants fall with their parents via the cascade.
        conn.execute("DELETE FROM nodes WHERE parent = ?1", params![node])?;
        conn.execute("DELETE FROM entries WHERE node = ?1", params![node])?;
        Ok(())
    }

    /// Delete a single named entry.
    pub fn delete_entry(&self, key: RawKey, name: &str) -> Result<(), Status> {
        let node = self.resolve(key, Rights::SET_VALUE)?;
        let conn = self.conn.lock().map_err(|_| Status::STORAGE)?;
        Self::live(&conn, node)?;
        let removed = conn.execute(
            "DELETE FROM entries WHERE node = ?1 AND name = ?2",
            params![node, name],
        )?;
        if removed == 0 {
            return Err(Status::NOT_FOUND);
        }
        Ok(())
    }

    /// Name of the child node at `index` in store order. `NO_MORE_ITEMS`
    /// past the end; `MORE_DATA` if the name plus terminator exceeds
    /// `buffer_len`.
    pub fn enumerate_child_at(
        &self,
        key: RawKey,
        index: usize,
        buffer_len: usize,
    ) -> Result<String, Status> {
        let node = self.resolve(key, Rights::ENUMERATE_SUB_KEYS)?;
        let conn = self.conn.lock().map_err(|_| Status::STORAGE)?;
        Self::live(&conn, node)?;
        let name: Option<String> = conn
            .query_row(
                "SELECT name FROM nodes WHERE parent = ?1 ORDER BY id LIMIT 1 OFFSET ?2",
                params![node, index as i64],
                |row| row.get(0),
            )
            .optional()?;
        let name = name.ok_or(Status::NO_MORE_ITEMS)?;
        if name.chars().count() + 1 > buffer_len {
            return Err(Status::MORE_DATA);
        }
        Ok(name)
    }

    /// Name of the entry at `index` in store order; same protocol as
    /// [`Hive::enumerate_child_at`].
    pub fn enumerate_entry_at(
        &self,
        key: RawKey,
        index: usize,
        buffer_len: usize,
    ) -> Result<String, Status> {
        let node = self.resolve(key, Rights::QUERY_VALUE)?;
        let conn = self.conn.lock().map_err(|_| Status::STORAGE)?;
        Self::live(&conn, node)?;
        let name: Option<String> = conn
            .query_row(
                "SELECT name FROM entries WHERE node = ?1 ORDER BY rowid LIMIT 1 OFFSET ?2",
                params![node, index as i64],
                |row| row.get(0),
            )
            .optional()?;
        let name = name.ok_or(Status::NO_MORE_ITEMS)?;
        if name.chars().count() + 1 > buffer_len {
            return Err(Status::MORE_DATA);
        }
        Ok(name)
    }

    /// Direct-child and entry counts plus the longest name in each class
    /// (raw lengths; no terminator slack).
    pub fn query_counts(&self, key: RawKey) -> Result<(usize, usize, usize, usize), Status> {
        let node = self.resolve(key, Rights::QUERY_VALUE)?;
        let conn = self.conn.lock().map_err(|_| Status::STORAGE)?;
        Self::live(&conn, node)?;
        let (subkeys, max_subkey): (i64, i64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(MAX(LENGTH(name)), 0) FROM nodes WHERE parent = ?1",
            params![node],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let (values, max_value): (i64, i64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(MAX(LENGTH(name)), 0) FROM entries WHERE node = ?1",
            params![node],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok((
            subkeys as usize,
            max_subkey as usize,
            values as usize,
            max_value as usize,
        ))
    }
}

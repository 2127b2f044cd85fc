//! Scoped ownership of an open hive handle.

use crate::core::hive::{Hive, RawKey, Rights, Root, Status};

/// Exclusive owner of an open handle for the duration of one scope.
///
/// The handle is released exactly once, on drop, on every exit path
/// including error propagation. Guards are never cloned or shared; each
/// operation opens and releases its own rather than reusing a cached one.
pub struct KeyGuard<'h> {
    hive: &'h Hive,
    raw: RawKey,
}

impl<'h> KeyGuard<'h> {
    /// Adopt a handle obtained elsewhere (e.g. from
    /// [`Hive::create_or_open`]).
    pub fn new(hive: &'h Hive, raw: RawKey) -> Self {
        Self { hive, raw }
    }

    /// Open a node and bind the resulting handle to this scope.
    pub fn open(hive: &'h Hive, root: Root, path: &str, rights: Rights) -> Result<Self, Status> {
        let raw = hive.open_key(root, path, rights)?;
        Ok(Self { hive, raw })
    }

    pub fn raw(&self) -> RawKey {
        self.raw
    }

    pub fn hive(&self) -> &'h Hive {
        self.hive
    }
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        // Release failures have nowhere to go from a destructor.
        let _ = self.hive.close(self.raw);
    }
}

//! Handle tables for textures and shaders
//!
//! Every renderer owns one [`ResourceTable`] per resource kind. Handles are
//! small integers handed out in strictly increasing order starting at 1 and
//! never reused while the table lives, so a stale handle can only ever miss,
//! never alias a newer resource. Handle 0 ([`ResourceHandle::NONE`]) means
//! "no resource" and is never stored.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Opaque identifier of a texture or shader owned by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ResourceHandle(pub u32);

impl ResourceHandle {
    /// The reserved "unbound / failed" handle.
    pub const NONE: ResourceHandle = ResourceHandle(0);

    pub const fn id(&self) -> u32 {
        self.0
    }

    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_some(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<ResourceHandle> for u32 {
    fn from(handle: ResourceHandle) -> u32 {
        handle.0
    }
}

/// A texture materialized by a backend.
#[derive(Debug)]
pub struct TextureRecord<T> {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    pub resource: T,
}

/// A compiled vertex/fragment pair.
#[derive(Debug)]
pub struct ShaderRecord<S> {
    pub vertex_source: PathBuf,
    pub fragment_source: PathBuf,
    pub resource: S,
}

/// Monotonic handle allocator plus the records it names.
#[derive(Debug)]
pub struct ResourceTable<T> {
    kind: &'static str,
    entries: BTreeMap<ResourceHandle, T>,
    next_id: u32,
}

impl<T> ResourceTable<T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Resource kind, used in log output
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Reserve the next handle. Never returns a handle that was handed out
    /// before; returns [`ResourceHandle::NONE`] once every id is spent.
    pub fn allocate(&mut self) -> ResourceHandle {
        let handle = ResourceHandle(self.next_id);
        // 0 marks the space as exhausted
        self.next_id = self.next_id.checked_add(1).unwrap_or(0);
        handle
    }

    /// No further handle can be allocated.
    pub fn is_exhausted(&self) -> bool {
        self.next_id == 0
    }

    /// Allocate a handle and store `value` under it. An exhausted table
    /// drops `value` and returns [`ResourceHandle::NONE`].
    pub fn insert(&mut self, value: T) -> ResourceHandle {
        let handle = self.allocate();
        if handle.is_some() {
            self.entries.insert(handle, value);
        }
        handle
    }

    /// The handle the next successful insert will receive.
    pub fn peek_next(&self) -> ResourceHandle {
        ResourceHandle(self.next_id)
    }

    pub fn get(&self, handle: ResourceHandle) -> Option<&T> {
        if handle.is_none() {
            return None;
        }
        self.entries.get(&handle)
    }

    pub fn get_mut(&mut self, handle: ResourceHandle) -> Option<&mut T> {
        if handle.is_none() {
            return None;
        }
        self.entries.get_mut(&handle)
    }

    pub fn contains(&self, handle: ResourceHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Remove a single record. The handle is retired, not recycled.
    pub fn remove(&mut self, handle: ResourceHandle) -> Option<T> {
        self.entries.remove(&handle)
    }

    /// Remove every record in handle order. Allocation keeps counting from
    /// where it was.
    pub fn drain(&mut self) -> Vec<(ResourceHandle, T)> {
        std::mem::take(&mut self.entries).into_iter().collect()
    }

    pub fn handles(&self) -> impl Iterator<Item = ResourceHandle> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_handles_start_at_one_and_increase() {
        let mut table = ResourceTable::new("texture");
        assert_eq!(table.insert("a"), ResourceHandle(1));
        assert_eq!(table.insert("b"), ResourceHandle(2));
        assert_eq!(table.allocate(), ResourceHandle(3));
        assert_eq!(table.insert("c"), ResourceHandle(4));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_none_is_never_found() {
        let mut table = ResourceTable::new("shader");
        table.insert(7);
        assert_eq!(table.get(ResourceHandle::NONE), None);
        assert!(!table.contains(ResourceHandle(99)));
    }

    #[test]
    fn test_removed_handles_are_not_reused() {
        let mut table = ResourceTable::new("texture");
        let first = table.insert(1);
        assert_eq!(table.remove(first), Some(1));
        assert_eq!(table.remove(first), None);
        assert_eq!(table.insert(2), ResourceHandle(2));
    }

    #[test]
    fn test_drain_keeps_counter() {
        let mut table = ResourceTable::new("texture");
        table.insert("x");
        table.insert("y");
        let drained: Vec<_> = table.drain().into_iter().map(|(h, _)| h).collect();
        assert_eq!(drained, vec![ResourceHandle(1), ResourceHandle(2)]);
        assert!(table.is_empty());
        assert_eq!(table.peek_next(), ResourceHandle(3));
    }

    #[test]
    fn test_exhausted_table_stops_allocating() {
        let mut table = ResourceTable::new("shader");
        table.next_id = u32::MAX;
        assert_eq!(table.insert("last"), ResourceHandle(u32::MAX));
        assert!(table.is_exhausted());
        assert_eq!(table.insert("overflow"), ResourceHandle::NONE);
        assert_eq!(table.len(), 1);
    }
}

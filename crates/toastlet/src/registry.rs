#![forbid(unsafe_code)]

//! Live toast instances.
//!
//! The registry assigns ids, remembers which bucket each instance belongs to,
//! and is the only path by which one toast affects another: bulk closes and
//! non-stackable eviction go through [`Closable::request_close`].
//!
//! # Invariants
//!
//! 1. Ids increase monotonically and are never reused, even when the
//!    constructor passed to [`InstanceRegistry::try_register`] fails.
//! 2. An id is in `all` iff it is in exactly one of the two buckets.
//! 3. Bulk operations snapshot ids first and skip instances that left the
//!    registry while the snapshot was being processed.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Process-unique toast identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToastId(u64);

impl ToastId {
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stacking policy bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// May be shown alongside other toasts.
    Stackable,
    /// At most one is shown; a new one evicts the others.
    NonStackable,
}

impl Bucket {
    #[must_use]
    pub const fn from_stackable(stackable: bool) -> Self {
        if stackable {
            Self::Stackable
        } else {
            Self::NonStackable
        }
    }
}

/// Something the registry can ask to close.
pub trait Closable<C> {
    type Cause: Copy;

    /// Request closing. Returns true if the instance started closing, false
    /// if it was already closing or removed.
    fn request_close(&mut self, cause: Self::Cause, cx: &mut C) -> bool;
}

#[derive(Debug)]
struct Entry<H> {
    bucket: Bucket,
    handle: H,
}

/// Id allocator plus the all / stackable / non-stackable maps.
#[derive(Debug)]
pub struct InstanceRegistry<H> {
    all: BTreeMap<ToastId, Entry<H>>,
    stackable: BTreeSet<ToastId>,
    non_stackable: BTreeSet<ToastId>,
    next_id: u64,
}

impl<H> Default for InstanceRegistry<H> {
    fn default() -> Self {
        Self {
            all: BTreeMap::new(),
            stackable: BTreeSet::new(),
            non_stackable: BTreeSet::new(),
            next_id: 1,
        }
    }
}

impl<H> InstanceRegistry<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id, build the instance with it, and register the result.
    ///
    /// The id is consumed even if `build` fails.
    pub fn try_register<E>(
        &mut self,
        bucket: Bucket,
        build: impl FnOnce(ToastId) -> Result<H, E>,
    ) -> Result<ToastId, E> {
        let id = ToastId(self.next_id);
        self.next_id += 1;
        let handle = build(id)?;
        self.insert(id, bucket, handle);
        Ok(id)
    }

    /// Register an already built instance under a fresh id.
    pub fn register(&mut self, bucket: Bucket, handle: H) -> ToastId {
        let id = ToastId(self.next_id);
        self.next_id += 1;
        self.insert(id, bucket, handle);
        id
    }

    fn insert(&mut self, id: ToastId, bucket: Bucket, handle: H) {
        match bucket {
            Bucket::Stackable => self.stackable.insert(id),
            Bucket::NonStackable => self.non_stackable.insert(id),
        };
        self.all.insert(id, Entry { bucket, handle });
    }

    /// Remove an instance from every bucket. No-op for unknown ids.
    pub fn unregister(&mut self, id: ToastId) -> Option<H> {
        let entry = self.all.remove(&id)?;
        match entry.bucket {
            Bucket::Stackable => self.stackable.remove(&id),
            Bucket::NonStackable => self.non_stackable.remove(&id),
        };
        Some(entry.handle)
    }

    #[must_use]
    pub fn get(&self, id: ToastId) -> Option<&H> {
        self.all.get(&id).map(|entry| &entry.handle)
    }

    pub fn get_mut(&mut self, id: ToastId) -> Option<&mut H> {
        self.all.get_mut(&id).map(|entry| &mut entry.handle)
    }

    #[must_use]
    pub fn contains(&self, id: ToastId) -> bool {
        self.all.contains_key(&id)
    }

    #[must_use]
    pub fn bucket_of(&self, id: ToastId) -> Option<Bucket> {
        self.all.get(&id).map(|entry| entry.bucket)
    }

    /// The most recently registered id still present.
    #[must_use]
    pub fn last_active_id(&self) -> Option<ToastId> {
        self.all.keys().next_back().copied()
    }

    /// Snapshot of registered ids, optionally restricted to one bucket.
    #[must_use]
    pub fn ids(&self, bucket: Option<Bucket>) -> Vec<ToastId> {
        match bucket {
            None => self.all.keys().copied().collect(),
            Some(Bucket::Stackable) => self.stackable.iter().copied().collect(),
            Some(Bucket::NonStackable) => self.non_stackable.iter().copied().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Request closing of one instance. Unknown ids are ignored.
    pub fn close<C>(&mut self, id: ToastId, cause: H::Cause, cx: &mut C) -> bool
    where
        H: Closable<C>,
    {
        self.get_mut(id)
            .is_some_and(|handle| handle.request_close(cause, cx))
    }

    /// Request closing of every instance. Returns how many started closing.
    pub fn close_all<C>(&mut self, cause: H::Cause, cx: &mut C) -> usize
    where
        H: Closable<C>,
    {
        self.close_each(self.ids(None), cause, cx)
    }

    pub fn close_all_stackable<C>(&mut self, cause: H::Cause, cx: &mut C) -> usize
    where
        H: Closable<C>,
    {
        self.close_each(self.ids(Some(Bucket::Stackable)), cause, cx)
    }

    pub fn close_all_non_stackable<C>(&mut self, cause: H::Cause, cx: &mut C) -> usize
    where
        H: Closable<C>,
    {
        self.close_each(self.ids(Some(Bucket::NonStackable)), cause, cx)
    }

    /// Close every non-stackable instance other than `keep`.
    pub fn evict_non_stackable<C>(&mut self, keep: ToastId, cause: H::Cause, cx: &mut C) -> usize
    where
        H: Closable<C>,
    {
        let mut ids = self.ids(Some(Bucket::NonStackable));
        ids.retain(|id| *id != keep);
        self.close_each(ids, cause, cx)
    }

    fn close_each<C>(&mut self, ids: Vec<ToastId>, cause: H::Cause, cx: &mut C) -> usize
    where
        H: Closable<C>,
    {
        ids.into_iter()
            .filter(|id| self.close(*id, cause, cx))
            .count()
    }
}

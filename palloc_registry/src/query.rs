//! Allocator-facing bin lookups

use crate::binset::{BinSet, Bins};
use crate::error::PallocResult;
use crate::record::GroupRecord;
use crate::registry::{GroupId, Registry};
use std::fmt;
use std::marker::PhantomData;

/// Read-only snapshot of a group's allowed bins
///
/// Borrows the registry it came from, so the group cannot be destroyed
/// while the view is held. The contents never change after the view is
/// taken; a later write is seen only by a later [`Registry::bins_for`].
#[derive(Clone, Copy)]
pub struct BinSetView<'a> {
    group: GroupId,
    bins: BinSet,
    version: u64,
    _record: PhantomData<&'a GroupRecord>,
}

impl<'a> BinSetView<'a> {
    fn new(record: &'a GroupRecord) -> Self {
        let (bins, version) = record.snapshot();
        Self {
            group: record.id(),
            bins,
            version,
            _record: PhantomData,
        }
    }

    /// Group the view was taken from
    pub fn group(&self) -> GroupId {
        self.group
    }

    /// Version the snapshot was published under
    pub fn version(&self) -> u64 {
        self.version
    }

    /// True if allocation from `bin` is allowed
    #[inline]
    pub fn contains(&self, bin: usize) -> bool {
        self.bins.contains(bin)
    }

    /// Number of allowed bins
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// True when the group may not allocate from any bin
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Allowed bins in ascending order
    pub fn iter(&self) -> Bins {
        self.bins.iter()
    }

    /// Allowed bins the allocator can currently serve
    ///
    /// An empty result is a normal outcome left to the allocator's
    /// fallback policy.
    #[must_use]
    pub fn intersection(&self, serviceable: &BinSet) -> BinSet {
        self.bins.intersection(serviceable)
    }

    /// Owned copy of the snapshot
    pub fn to_bin_set(&self) -> BinSet {
        self.bins
    }
}

impl fmt::Debug for BinSetView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinSetView")
            .field("group", &self.group)
            .field("bins", &self.bins)
            .field("version", &self.version)
            .finish()
    }
}

impl fmt::Display for BinSetView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.bins, f)
    }
}

impl Registry {
    /// Snapshot of the bins `group` may allocate from
    ///
    /// Lock-free and allocation-free; safe to call on every page allocation.
    #[inline]
    pub fn bins_for(&self, group: GroupId) -> PallocResult<BinSetView<'_>> {
        self.record(group).map(BinSetView::new)
    }
}

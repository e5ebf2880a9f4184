//! Per-group record holding the published bin set

use crate::binset::BinSet;
use crate::registry::GroupId;
use crate::version::VersionCounter;
use palloc::consts::BINSET_WORDS;
use parking_lot::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicU64, Ordering};

/// Spins before a reader starts yielding to a stalled writer
const SPIN_LIMIT: u32 = 64;

/// Bin set state for one hierarchy node
///
/// The allowed bins are stored as atomic words guarded by a
/// [`VersionCounter`], so allocation-path readers copy a consistent snapshot
/// without locking. Administrative reads and writes serialise on a
/// per-record mutex that readers never touch.
#[derive(Debug)]
pub struct GroupRecord {
    id: GroupId,
    version: VersionCounter,
    words: [AtomicU64; BINSET_WORDS],
    admin: Mutex<()>,
}

impl GroupRecord {
    /// New record with no bins allowed
    pub(crate) fn new(id: GroupId) -> Self {
        Self {
            id,
            version: VersionCounter::new(),
            words: [const { AtomicU64::new(0) }; BINSET_WORDS],
            admin: Mutex::new(()),
        }
    }

    /// Handle the hierarchy node uses to reach this record
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Current published version (even once any write has completed)
    pub fn version(&self) -> u64 {
        self.version.load()
    }

    /// Copy the published bin set and the version it was published under
    ///
    /// Lock-free. Retries only while a write is in flight, and a write only
    /// stores `BINSET_WORDS` words.
    pub fn snapshot(&self) -> (BinSet, u64) {
        let mut spins = 0u32;
        loop {
            let before = self.version.load();
            if VersionCounter::is_stable(before) {
                let mut words = [0u64; BINSET_WORDS];
                for (dst, src) in words.iter_mut().zip(self.words.iter()) {
                    *dst = src.load(Ordering::Relaxed);
                }
                if self.version.validate(before) {
                    return (BinSet::from_words(words), before);
                }
            }

            spins += 1;
            if spins < SPIN_LIMIT {
                std::hint::spin_loop();
            } else {
                std::thread::yield_now();
            }
        }
    }

    /// Replace the whole bin set, returning the new version
    pub fn replace(&self, set: &BinSet) -> u64 {
        let guard = self.lock_admin();
        self.publish(&guard, set)
    }

    /// Remove every bin, returning the new version
    pub fn clear(&self) -> u64 {
        self.replace(&BinSet::empty())
    }

    /// Enter the administrative section for this record
    pub(crate) fn lock_admin(&self) -> MutexGuard<'_, ()> {
        self.admin.lock()
    }

    /// Store `set` under an odd/even version bump
    ///
    /// The guard proves the caller holds this record's administrative lock.
    pub(crate) fn publish(&self, _admin: &MutexGuard<'_, ()>, set: &BinSet) -> u64 {
        self.version.begin_write();
        for (dst, src) in self.words.iter().zip(set.words().iter()) {
            dst.store(*src, Ordering::Relaxed);
        }
        self.version.end_write()
    }
}

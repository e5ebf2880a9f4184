//! Atomic version counter for optimistic concurrency control

use std::sync::atomic::{AtomicU64, Ordering, fence};

/// Version counter using even/odd optimistic versioning
///
/// Writers move the version to odd before touching the guarded words and
/// back to even afterwards. Readers sample the version before and after
/// copying the words and accept the copy only when both samples are equal
/// and even. Writers must already be serialised with each other.
#[derive(Debug)]
pub struct VersionCounter {
    counter: AtomicU64,
}

impl VersionCounter {
    /// Create a new version counter starting at 0 (even)
    pub const fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Get current version with acquire ordering
    #[inline]
    pub fn load(&self) -> u64 {
        self.counter.load(Ordering::Acquire)
    }

    /// Begin write operation - increment to odd version
    ///
    /// The release fence keeps the guarded stores that follow from becoming
    /// visible before the odd version.
    pub fn begin_write(&self) -> u64 {
        let next = self.counter.load(Ordering::Relaxed) + 1;
        debug_assert!(Self::is_writing(next));
        self.counter.store(next, Ordering::Relaxed);
        fence(Ordering::Release);
        next
    }

    /// Complete write operation - increment to even version
    pub fn end_write(&self) -> u64 {
        let next = self.counter.load(Ordering::Relaxed) + 1;
        debug_assert!(Self::is_stable(next));
        self.counter.store(next, Ordering::Release);
        next
    }

    /// True if no write completed or started since `before` was loaded
    ///
    /// Call after the guarded loads; the acquire fence orders them before
    /// the second version sample.
    #[inline]
    pub fn validate(&self, before: u64) -> bool {
        fence(Ordering::Acquire);
        self.counter.load(Ordering::Relaxed) == before
    }

    /// Check if version is stable (even)
    #[inline]
    pub fn is_stable(version: u64) -> bool {
        version % 2 == 0
    }

    /// Check if version indicates write in progress (odd)
    #[inline]
    pub fn is_writing(version: u64) -> bool {
        version % 2 == 1
    }
}

impl Default for VersionCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_counter_creation() {
        let counter = VersionCounter::new();
        assert_eq!(counter.load(), 0);
        assert!(VersionCounter::is_stable(counter.load()));
    }

    #[test]
    fn test_write_cycle() {
        let counter = VersionCounter::new();

        let v1 = counter.begin_write();
        assert_eq!(v1, 1);
        assert!(VersionCounter::is_writing(v1));

        let v2 = counter.end_write();
        assert_eq!(v2, 2);
        assert!(VersionCounter::is_stable(v2));
    }

    #[test]
    fn test_validate_detects_intervening_write() {
        let counter = VersionCounter::new();
        let before = counter.load();
        assert!(counter.validate(before));

        counter.begin_write();
        assert!(!counter.validate(before));
        counter.end_write();
        assert!(!counter.validate(before));
        assert!(counter.validate(counter.load()));
    }

    #[test]
    fn test_version_validation() {
        assert!(VersionCounter::is_stable(0));
        assert!(VersionCounter::is_stable(100));
        assert!(VersionCounter::is_writing(1));
        assert!(VersionCounter::is_writing(99));
    }
}

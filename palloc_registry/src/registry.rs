//! Group record storage addressed by generation-checked handles

use crate::error::{PallocError, PallocResult};
use crate::record::GroupRecord;
use palloc::config::{BinCapacity, ConfigError, RegistryConfig};
use static_assertions::assert_impl_all;
use std::fmt;

assert_impl_all!(Registry: Send, Sync);
assert_impl_all!(GroupId: Send, Sync, Copy);

/// Opaque handle linking a hierarchy node to its group record
///
/// The generation changes every time a slot is reused, so a handle kept
/// past `destroy` resolves to [`PallocError::UnknownGroup`] instead of a
/// newer group's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId {
    index: u32,
    generation: u32,
}

impl GroupId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index
    pub fn index(self) -> u32 {
        self.index
    }

    /// Slot generation at creation time
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    record: Option<GroupRecord>,
}

/// Arena of group records for one subsystem instance
///
/// Creation and destruction take `&mut self`; every read, write and
/// allocator query takes `&self`. A hierarchy framework sharing the registry
/// across allocation contexts therefore cannot destroy a record while any
/// [`BinSetView`](crate::query::BinSetView) borrowed from it is alive.
#[derive(Debug)]
pub struct Registry {
    config: RegistryConfig,
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl Registry {
    /// Create an empty registry
    pub fn new(config: RegistryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        })
    }

    /// Registry with default limits for `capacity`
    pub fn with_capacity(capacity: BinCapacity) -> Self {
        Self {
            config: RegistryConfig::with_capacity(capacity),
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Bin capacity shared by every group
    pub fn capacity(&self) -> BinCapacity {
        self.config.bins
    }

    /// Active limits
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Number of live groups
    pub fn len(&self) -> usize {
        self.live
    }

    /// True when no group is live
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// True when `id` resolves to a live group
    pub fn contains(&self, id: GroupId) -> bool {
        self.record(id).is_ok()
    }

    /// Resolve a handle to its record
    pub fn record(&self, id: GroupId) -> PallocResult<&GroupRecord> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.record.as_ref())
            .ok_or(PallocError::UnknownGroup { id })
    }

    /// Live records in slot order
    pub fn groups(&self) -> impl Iterator<Item = &GroupRecord> {
        self.slots.iter().filter_map(|slot| slot.record.as_ref())
    }

    /// Store a fresh empty record
    ///
    /// All storage the matching `remove` needs is reserved here, so removal
    /// never allocates.
    pub(crate) fn insert(&mut self) -> PallocResult<GroupId> {
        if self.live >= self.config.max_groups {
            return Err(PallocError::ResourceExhausted);
        }

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            let id = GroupId::new(index, slot.generation);
            slot.record = Some(GroupRecord::new(id));
            self.live += 1;
            return Ok(id);
        }

        let index =
            u32::try_from(self.slots.len()).map_err(|_| PallocError::ResourceExhausted)?;
        self.slots
            .try_reserve(1)
            .map_err(|_| PallocError::ResourceExhausted)?;
        self.free
            .try_reserve(self.slots.len() + 1 - self.free.len())
            .map_err(|_| PallocError::ResourceExhausted)?;

        let id = GroupId::new(index, 0);
        self.slots.push(Slot {
            generation: 0,
            record: Some(GroupRecord::new(id)),
        });
        self.live += 1;
        Ok(id)
    }

    /// Take a record out of the arena, retiring its handle
    pub(crate) fn remove(&mut self, id: GroupId) -> Option<GroupRecord> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let record = slot.record.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(record)
    }
}

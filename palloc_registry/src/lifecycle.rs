//! Hierarchy lifecycle hooks

use crate::error::PallocResult;
use crate::registry::{GroupId, Registry};

/// Hooks a hierarchy framework drives when nodes come and go
pub trait SubsystemHooks {
    /// A node is being instantiated; allocate its record with no bins
    ///
    /// An error must abort creation of the node.
    fn create(&mut self) -> PallocResult<GroupId>;

    /// A node is being torn down; release its record
    ///
    /// Never fails. Unknown or already destroyed handles are ignored.
    fn destroy(&mut self, id: GroupId);
}

impl SubsystemHooks for Registry {
    fn create(&mut self) -> PallocResult<GroupId> {
        match self.insert() {
            Ok(id) => {
                tracing::debug!(group = %id, live = self.len(), "group created");
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(live = self.len(), "group creation failed: {}", e);
                Err(e)
            }
        }
    }

    fn destroy(&mut self, id: GroupId) {
        match self.remove(id) {
            Some(record) => {
                let (bins, _) = record.snapshot();
                tracing::debug!(group = %id, %bins, live = self.len(), "group destroyed");
            }
            None => tracing::warn!(group = %id, "destroy of unknown group ignored"),
        }
    }
}

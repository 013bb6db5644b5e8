use std::collections::BTreeSet;

use crate::api::types::ResourceHandle;

/// Tracks host render resources (body meshes, trail lines) by handle.
///
/// Releasing a handle succeeds exactly once; released handles queue up until
/// the next frame reports them to the host.
#[derive(Debug)]
pub struct ResourceTable {
    next: u32,
    live: BTreeSet<ResourceHandle>,
    released: Vec<ResourceHandle>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self {
            next: 1,
            live: BTreeSet::new(),
            released: Vec::new(),
        }
    }

    pub fn allocate(&mut self) -> ResourceHandle {
        let handle = ResourceHandle(self.next);
        self.next += 1;
        self.live.insert(handle);
        handle
    }

    /// Release a handle. Returns false if it was already released or never allocated.
    pub fn release(&mut self, handle: ResourceHandle) -> bool {
        if self.live.remove(&handle) {
            self.released.push(handle);
            true
        } else {
            log::debug!("resource {} released twice; ignoring", handle.0);
            false
        }
    }

    /// Release every live handle (teardown). Returns how many were released.
    pub fn release_all(&mut self) -> usize {
        let count = self.live.len();
        self.released.extend(std::mem::take(&mut self.live));
        count
    }

    pub fn is_live(&self, handle: ResourceHandle) -> bool {
        self.live.contains(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Handles released since the last drain.
    pub fn drain_released(&mut self) -> Vec<ResourceHandle> {
        std::mem::take(&mut self.released)
    }
}

impl Default for ResourceTable {
    fn default() -> Self {
        Self::new()
    }
}

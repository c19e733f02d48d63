use alloy_primitives::B256;

pub const DEFAULT_CAPACITY: usize = 100;

/// Ring of the most recently completed block hashes.
///
/// The tail loop rewinds `stable_height` blocks every pass; this cache elides
/// re-scanning blocks already completed inside the current window. Range
/// workers bypass it, historical replay is explicit there. Exactly-once
/// delivery is NOT this cache's job; that is the store's uniqueness key.
pub struct ScannedBlocks {
    capacity: usize,
    next_index: usize,
    hashes: Vec<B256>,
}

impl ScannedBlocks {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            next_index: 0,
            hashes: vec![B256::ZERO; capacity],
        }
    }

    /// Records a completed block, overwriting the oldest entry.
    pub fn add(&mut self, hash: B256) {
        self.hashes[self.next_index] = hash;
        self.next_index = (self.next_index + 1) % self.capacity;
    }

    pub fn is_scanned(&self, hash: &B256) -> bool {
        self.hashes.iter().any(|h| h == hash)
    }
}

impl Default for ScannedBlocks {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Snapshot of the chunk manager's cache and pipeline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChunkManagerStats {
    pub cached_chunks: usize,
    pub load_queue: usize,
    pub generate_queue: usize,
    pub mesh_queue: usize,
    pub loading: usize,
    pub generating: usize,
    pub meshing: usize,
    /// Size of the neighbour trigger registry
    pub neighbour_triggers: usize,
    pub approximate_memory_usage_bytes: usize,
}

impl ChunkManagerStats {
    pub fn queued(&self) -> usize {
        self.load_queue + self.generate_queue + self.mesh_queue
    }

    pub fn in_flight(&self) -> usize {
        self.loading + self.generating + self.meshing
    }

    /// True when nothing is queued or running.
    pub fn is_idle(&self) -> bool {
        self.queued() == 0 && self.in_flight() == 0
    }
}

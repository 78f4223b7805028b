use dashmap::DashMap;
use glam::UVec3;

use crate::voxels::{chunk_data::ChunkData, coord::ChunkPos};

/// Loads previously stored chunks.
///
/// Called from repository worker threads, possibly for several positions at once.
pub trait ChunkRepository: Send + Sync + 'static {
    /// Returns `Ok(None)` if nothing is stored for `pos`, in which case the chunk gets generated.
    fn load(&self, pos: ChunkPos, chunk_size: UVec3) -> anyhow::Result<Option<ChunkData>>;
}

/// Keeps chunk data in memory. Useful for tests and for worlds that only live for a session.
#[derive(Default)]
pub struct InMemoryChunkRepository {
    chunks: DashMap<ChunkPos, ChunkData>,
}

impl InMemoryChunkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, pos: ChunkPos, data: ChunkData) -> Option<ChunkData> {
        self.chunks.insert(pos, data)
    }

    pub fn remove(&self, pos: ChunkPos) -> Option<ChunkData> {
        self.chunks.remove(&pos).map(|(_, data)| data)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl ChunkRepository for InMemoryChunkRepository {
    fn load(&self, pos: ChunkPos, chunk_size: UVec3) -> anyhow::Result<Option<ChunkData>> {
        let Some(data) = self.chunks.get(&pos) else {
            return Ok(None);
        };

        if data.size() != chunk_size {
            anyhow::bail!(
                "Stored chunk at {:?} has size {:?}, expected {:?}",
                pos,
                data.size(),
                chunk_size
            );
        }

        Ok(Some(data.clone()))
    }
}

use glam::UVec3;

use crate::voxels::{chunk_data::ChunkData, coord::ChunkPos};

/// Procedurally creates chunks that don't exist in the repository.
///
/// Called from generator worker threads, possibly for several positions at once.
/// The returned grid must have exactly `chunk_size` dimensions.
pub trait WorldGenerator: Send + Sync + 'static {
    fn generate_chunk(&self, chunk_pos: ChunkPos, chunk_size: UVec3) -> anyhow::Result<ChunkData>;
}

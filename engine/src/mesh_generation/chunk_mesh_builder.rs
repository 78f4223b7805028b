use crate::voxels::chunk::{Chunk, ChunkRenderState};

/// Derives a render state (a mesh, a collider, ...) from a chunk's blocks.
///
/// Called from mesh worker threads. Neighbouring blocks can be read through
/// [`Chunk::neighbour`] and [`Chunk::get_block_or_neighbour`], which only see resident
/// chunks. Building the same chunk version twice must be harmless.
pub trait ChunkMeshBuilder<T: ChunkRenderState>: Send + Sync + 'static {
    fn build(&self, chunk: &Chunk<T>) -> anyhow::Result<T>;
}

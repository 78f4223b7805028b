use glam::UVec3;
use rayon::prelude::*;

pub mod noise_world_generator;
pub mod test_world_generators;
pub mod world_generator;

use crate::{
    persistence::InMemoryChunkRepository,
    voxels::coord::ChunkPos,
    worldgen::world_generator::WorldGenerator,
};

/// Generates a square of `size` x `size` chunk columns around the origin, `height` chunks
/// tall, in parallel and stores them in `repository`. Returns the number of stored chunks.
pub fn pregenerate_area(
    generator: &dyn WorldGenerator,
    repository: &InMemoryChunkRepository,
    size: i32,
    height: i32,
    chunk_size: UVec3,
) -> anyhow::Result<usize> {
    let range = -(size / 2)..(size - size / 2);
    let width = range.end - range.start;

    let chunks = (0..(width * width * height))
        .into_par_iter()
        .map(|i| {
            let x = range.start + (i % width);
            let z = range.start + ((i / width) % width);
            let y = i / (width * width);
            let pos = ChunkPos::new(x, y, z);
            generator
                .generate_chunk(pos, chunk_size)
                .map(|data| (pos, data))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let count = chunks.len();
    for (pos, data) in chunks {
        repository.store(pos, data);
    }

    Ok(count)
}

use glam::UVec3;

use crate::{
    voxels::{
        block::Block,
        chunk_data::ChunkData,
        coord::{ChunkPos, LocalPos},
    },
    worldgen::world_generator::WorldGenerator,
};

/// Solid ground below `ground_level`, nothing above it.
pub struct FlatWorldGenerator {
    ground_level: i32,
}

impl FlatWorldGenerator {
    pub fn new() -> Self {
        FlatWorldGenerator { ground_level: 0 }
    }

    pub fn with_ground_level(ground_level: i32) -> Self {
        FlatWorldGenerator { ground_level }
    }

    fn block_at(&self, world_y: i32) -> Block {
        let depth = self.ground_level - world_y;
        match depth {
            i32::MIN..=0 => Block::EMPTY,
            1 => Block::GRASS,
            2..=4 => Block::DIRT,
            _ => Block::STONE,
        }
    }
}

impl Default for FlatWorldGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldGenerator for FlatWorldGenerator {
    fn generate_chunk(&self, chunk_pos: ChunkPos, chunk_size: UVec3) -> anyhow::Result<ChunkData> {
        let mut data = ChunkData::new(chunk_size);
        let origin = chunk_pos.origin(chunk_size);

        for y in 0..chunk_size.y {
            let block = self.block_at(origin.0.y + y as i32);
            if block.is_empty() {
                continue;
            }

            for z in 0..chunk_size.z {
                for x in 0..chunk_size.x {
                    data.set_block(LocalPos::new(x, y, z), block);
                }
            }
        }

        Ok(data)
    }
}

/// Fills every other block in a 3D checkerboard pattern, which is the worst case
/// for face culling.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckerboardWorldGenerator;

impl WorldGenerator for CheckerboardWorldGenerator {
    fn generate_chunk(&self, chunk_pos: ChunkPos, chunk_size: UVec3) -> anyhow::Result<ChunkData> {
        let mut data = ChunkData::new(chunk_size);
        let origin = chunk_pos.origin(chunk_size).0;

        for y in 0..chunk_size.y {
            for z in 0..chunk_size.z {
                for x in 0..chunk_size.x {
                    let world = origin + LocalPos::new(x, y, z).0.as_ivec3();
                    if (world.x + world.y + world.z).rem_euclid(2) == 0 {
                        data.set_block(LocalPos::new(x, y, z), Block::STONE);
                    }
                }
            }
        }

        Ok(data)
    }
}

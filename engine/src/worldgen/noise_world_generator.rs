use glam::{DVec2, UVec3};
use noise::{NoiseFn, SuperSimplex};

use crate::{
    voxels::{
        block::Block,
        chunk_data::ChunkData,
        coord::{ChunkPos, LocalPos},
    },
    worldgen::world_generator::WorldGenerator,
};

const HORIZONTAL_SCALE: f64 = 0.01;
const HEIGHT_AMPLITUDE: f64 = 32.0;
const DIRT_DEPTH: i32 = 3;

/// Rolling height-map terrain.
pub struct NoiseWorldGenerator {
    noise: SuperSimplex,
}

impl NoiseWorldGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            noise: SuperSimplex::new(seed),
        }
    }

    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let pos = DVec2::new(x as f64, z as f64) * HORIZONTAL_SCALE;
        (self.noise.get(pos.to_array()) * HEIGHT_AMPLITUDE) as i32
    }
}

impl WorldGenerator for NoiseWorldGenerator {
    #[profiling::function]
    fn generate_chunk(&self, chunk_pos: ChunkPos, chunk_size: UVec3) -> anyhow::Result<ChunkData> {
        let mut data = ChunkData::new(chunk_size);
        let origin = chunk_pos.origin(chunk_size).0;

        for x in 0..chunk_size.x {
            for z in 0..chunk_size.z {
                let height = self.height_at(origin.x + x as i32, origin.z + z as i32);

                for y in 0..chunk_size.y {
                    let world_y = origin.y + y as i32;

                    let block = if world_y > height {
                        continue;
                    } else if world_y == height {
                        Block::GRASS
                    } else if world_y >= height - DIRT_DEPTH {
                        Block::DIRT
                    } else {
                        Block::STONE
                    };

                    data.set_block(LocalPos::new(x, y, z), block);
                }
            }
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let size = UVec3::splat(8);
        let pos = ChunkPos::new(3, 0, -2);

        let a = NoiseWorldGenerator::new(42).generate_chunk(pos, size).unwrap();
        let b = NoiseWorldGenerator::new(42).generate_chunk(pos, size).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_columns_follow_height_map() {
        let generator = NoiseWorldGenerator::new(7);
        let size = UVec3::new(4, 64, 4);
        // Together these cover world y = -64..64, which contains every surface height
        let lower = generator.generate_chunk(ChunkPos::new(0, -1, 0), size).unwrap();
        let upper = generator.generate_chunk(ChunkPos::new(0, 0, 0), size).unwrap();
        let block_at = |x: u32, world_y: i32, z: u32| {
            if world_y < 0 {
                lower.get_block(LocalPos::new(x, (world_y + 64) as u32, z))
            } else {
                upper.get_block(LocalPos::new(x, world_y as u32, z))
            }
        };

        for x in 0..4 {
            for z in 0..4 {
                let height = generator.height_at(x as i32, z as i32);
                assert_eq!(block_at(x, height, z), Some(Block::GRASS));
                assert_eq!(block_at(x, height - 1, z), Some(Block::DIRT));
                assert_eq!(block_at(x, height + 1, z), None);
                assert_eq!(block_at(x, -64, z), Some(Block::STONE));
            }
        }
    }
}

use glam::UVec3;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CHUNK_SIZE: u32 = 16;

/// World-wide dimensions shared by every chunk of a manager.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of blocks along each axis of a chunk
    pub chunk_size: UVec3,
    /// Size of a single block in world units
    pub block_scale: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk_size: UVec3::splat(DEFAULT_CHUNK_SIZE),
            block_scale: 1.0,
        }
    }
}

impl WorldConfig {
    pub fn is_valid(&self) -> bool {
        self.chunk_size.cmpgt(UVec3::ZERO).all()
            && self.block_scale.is_finite()
            && self.block_scale > 0.0
    }
}

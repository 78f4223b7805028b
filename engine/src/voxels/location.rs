//! Conversions between world-space locations (floats, in world units) and
//! block and chunk coordinates.
//!
//! All conversions floor, so that locations on the negative side of an axis map to
//! the block and chunk that actually contain them.

use glam::Vec3;

use crate::{
    config::world_config::WorldConfig,
    voxels::{
        coord::{ChunkPos, WorldPos},
        face::Face,
    },
};

/// How far a contact point is pushed into the surface it lies on, in blocks.
/// Points exactly on a face would otherwise resolve to the block on the far side.
pub const CONTACT_POINT_OFFSET: f32 = 0.05;

/// How far to step out of a block to reach its neighbour, in blocks.
pub const NEIGHBOUR_BLOCK_OFFSET: f32 = 0.75;

/// A point on the surface of a block, such as the result of a ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    pub point: Vec3,
    /// Surface normal at the point, pointing away from the block that was hit
    pub normal: Vec3,
}

impl ContactPoint {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        ContactPoint { point, normal }
    }
}

fn to_block_space(location: Vec3, world: &WorldConfig) -> Vec3 {
    location / world.block_scale
}

fn floor_to_block(block_space: Vec3) -> WorldPos {
    WorldPos(block_space.floor().as_ivec3())
}

/// The chunk containing `location`.
pub fn chunk_location(location: Vec3, world: &WorldConfig) -> ChunkPos {
    block_location(location, world).to_chunk_pos(world.chunk_size)
}

/// The block containing `location`.
pub fn block_location(location: Vec3, world: &WorldConfig) -> WorldPos {
    floor_to_block(to_block_space(location, world))
}

/// The block that was hit at a contact point.
pub fn block_location_at_contact(contact: &ContactPoint, world: &WorldConfig) -> WorldPos {
    floor_to_block(adjusted_contact_point(contact, world))
}

/// The block next to the block containing `location`, in the direction of `face`.
pub fn neighbour_block_location(location: Vec3, face: Face, world: &WorldConfig) -> WorldPos {
    floor_to_block(to_block_space(location, world) + face.to_vec3() * NEIGHBOUR_BLOCK_OFFSET)
}

/// The block adjacent to the hit face, i.e. where a block would be placed.
pub fn neighbour_block_location_at_contact(
    contact: &ContactPoint,
    world: &WorldConfig,
) -> WorldPos {
    let normal = contact.normal.normalize_or_zero();
    floor_to_block(adjusted_contact_point(contact, world) + normal * NEIGHBOUR_BLOCK_OFFSET)
}

/// The world-space center of a block.
pub fn block_center_location(block: WorldPos, world: &WorldConfig) -> Vec3 {
    (block.0.as_vec3() + Vec3::splat(0.5)) * world.block_scale
}

/// Contact point in block space, nudged into the block along the inverse normal.
fn adjusted_contact_point(contact: &ContactPoint, world: &WorldConfig) -> Vec3 {
    let normal = contact.normal.normalize_or_zero();
    to_block_space(contact.point, world) - normal * CONTACT_POINT_OFFSET
}

use ahash::AHashSet;
use glam::{IVec3, UVec3, Vec3};

use crate::{
    chunk_manager::{ChunkManager, Result},
    voxels::{chunk::ChunkRenderState, coord::ChunkPos, location::chunk_location},
};

/// Offsets of every chunk in a grid of `grid_size` chunks centered on the origin,
/// nearest first.
pub fn generate_grid_offsets(grid_size: UVec3) -> Vec<IVec3> {
    let size = grid_size.as_ivec3();
    let min = -(size / 2);
    let max = min + size - IVec3::ONE;

    let mut offsets = Vec::with_capacity(size.element_product().max(0) as usize);
    for x in min.x..=max.x {
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                offsets.push(IVec3::new(x, y, z));
            }
        }
    }

    offsets.sort_by_key(|offset| offset.length_squared());
    offsets
}

/// Keeps a grid of chunks around a moving location paged in.
///
/// Chunks entering the grid are requested, chunks leaving it are removed from the manager.
/// Nothing happens until the location crosses into another chunk.
pub struct ChunkPager {
    grid_size: UVec3,
    offsets: Vec<IVec3>,
    center: Option<ChunkPos>,
    paged: AHashSet<ChunkPos>,
}

impl ChunkPager {
    pub fn new(grid_size: UVec3) -> Self {
        ChunkPager {
            grid_size,
            offsets: generate_grid_offsets(grid_size),
            center: None,
            paged: AHashSet::new(),
        }
    }

    pub fn grid_size(&self) -> UVec3 {
        self.grid_size
    }

    pub fn center(&self) -> Option<ChunkPos> {
        self.center
    }

    pub fn is_paged(&self, pos: ChunkPos) -> bool {
        self.paged.contains(&pos)
    }

    pub fn paged_count(&self) -> usize {
        self.paged.len()
    }

    /// Moves the grid to the chunk containing `location`. Returns whether the grid moved.
    pub fn update<T: ChunkRenderState>(
        &mut self,
        location: Vec3,
        manager: &mut ChunkManager<T>,
    ) -> Result<bool> {
        let center = chunk_location(location, &manager.config().world);
        if self.center == Some(center) {
            return Ok(false);
        }

        let desired: Vec<ChunkPos> = self
            .offsets
            .iter()
            .map(|offset| center + ChunkPos(*offset))
            .collect();
        let desired_set: AHashSet<ChunkPos> = desired.iter().copied().collect();

        let mut removed = 0;
        for pos in self.paged.iter().filter(|pos| !desired_set.contains(pos)) {
            manager.remove_chunk(*pos)?;
            removed += 1;
        }

        let mut requested = 0;
        for pos in desired.iter().filter(|pos| !self.paged.contains(pos)) {
            manager.request_chunk(*pos)?;
            requested += 1;
        }

        log::debug!(
            "Pager moved to {:?}: {} chunks requested, {} removed",
            center,
            requested,
            removed
        );

        self.center = Some(center);
        self.paged = desired_set;
        Ok(true)
    }

    /// Removes every paged chunk from the manager.
    pub fn clear<T: ChunkRenderState>(&mut self, manager: &mut ChunkManager<T>) -> Result<()> {
        for pos in self.paged.drain() {
            manager.remove_chunk(pos)?;
        }
        self.center = None;
        Ok(())
    }
}

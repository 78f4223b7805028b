use glam::{IVec3, UVec3};

use crate::voxels::{block::Block, coord::LocalPos};

/// Dense block grid of a single chunk.
///
/// Blocks are stored in YZX order, so that iterating the storage linearly walks
/// along X first, then Z, then Y.
#[derive(Clone, PartialEq, Eq)]
pub struct ChunkData {
    size: UVec3,
    blocks: Box<[Block]>,
}

impl ChunkData {
    /// Creates an empty grid. Every dimension of `size` must be non-zero.
    pub fn new(size: UVec3) -> Self {
        assert!(
            size.cmpgt(UVec3::ZERO).all(),
            "Chunk dimensions must be non-zero, got {:?}",
            size
        );

        let volume = size.x as usize * size.y as usize * size.z as usize;
        ChunkData {
            size,
            blocks: vec![Block::EMPTY; volume].into_boxed_slice(),
        }
    }

    pub fn filled(size: UVec3, block: Block) -> Self {
        let mut data = ChunkData::new(size);
        data.fill(block);
        data
    }

    pub fn size(&self) -> UVec3 {
        self.size
    }

    pub fn volume(&self) -> usize {
        self.blocks.len()
    }

    pub fn contains(&self, pos: LocalPos) -> bool {
        pos.0.cmplt(self.size).all()
    }

    /// Same as [`ChunkData::contains`], for signed positions that may point outside the chunk.
    pub fn contains_signed(&self, pos: IVec3) -> bool {
        pos.cmpge(IVec3::ZERO).all() && pos.cmplt(self.size.as_ivec3()).all()
    }

    pub fn index_of(&self, pos: LocalPos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }

        let UVec3 { x, y, z } = pos.0;
        let (size_x, size_z) = (self.size.x as usize, self.size.z as usize);
        Some((y as usize * size_x * size_z) + (z as usize * size_x) + x as usize)
    }

    /// Convert a linear index in YZX order to a local position
    pub fn pos_of(&self, index: usize) -> LocalPos {
        assert!(index < self.volume(), "Block index out of bounds: {}", index);

        let (size_x, size_z) = (self.size.x as usize, self.size.z as usize);
        let x = index % size_x;
        let z = (index / size_x) % size_z;
        let y = index / (size_x * size_z);
        LocalPos::new(x as u32, y as u32, z as u32)
    }

    /// Returns the block at `pos`, or `None` if the cell is empty or outside the grid.
    pub fn get_block(&self, pos: LocalPos) -> Option<Block> {
        let index = self.index_of(pos)?;
        self.blocks[index].non_empty()
    }

    /// Stores `block` at `pos` and returns the previous block, if any.
    /// Setting [`Block::EMPTY`] is the same as removing the block.
    pub fn set_block(&mut self, pos: LocalPos, block: Block) -> Option<Block> {
        let Some(index) = self.index_of(pos) else {
            panic!(
                "Block position {:?} out of bounds for chunk of size {:?}",
                pos, self.size
            );
        };

        std::mem::replace(&mut self.blocks[index], block).non_empty()
    }

    pub fn remove_block(&mut self, pos: LocalPos) -> Option<Block> {
        self.set_block(pos, Block::EMPTY)
    }

    pub fn fill(&mut self, block: Block) {
        self.blocks.fill(block);
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(Block::is_empty)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.iter().filter(|block| !block.is_empty()).count()
    }

    /// Iterates over all non-empty blocks in storage order.
    pub fn iter_blocks(&self) -> impl Iterator<Item = (LocalPos, Block)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| !block.is_empty())
            .map(|(index, block)| (self.pos_of(index), *block))
    }

    pub fn approximate_size(&self) -> usize {
        std::mem::size_of::<Self>() + std::mem::size_of_val(&*self.blocks)
    }
}

impl std::fmt::Debug for ChunkData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkData")
            .field("size", &self.size)
            .field("block_count", &self.block_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_remove_blocks() {
        let mut data = ChunkData::new(UVec3::splat(4));
        let stone = Block::from_type(1);
        let dirt = Block::from_type(2);
        let pos = LocalPos::new(1, 2, 3);

        assert!(data.is_empty());
        assert_eq!(data.set_block(pos, stone), None);
        assert_eq!(data.get_block(pos), Some(stone));
        assert_eq!(data.set_block(pos, dirt), Some(stone));
        assert_eq!(data.block_count(), 1);

        assert_eq!(data.remove_block(pos), Some(dirt));
        assert_eq!(data.remove_block(pos), None);
        assert!(data.is_empty());
    }

    #[test]
    fn test_storage_order_is_yzx() {
        let data = ChunkData::new(UVec3::new(4, 3, 2));

        assert_eq!(data.volume(), 24);
        assert_eq!(data.index_of(LocalPos::new(1, 0, 0)), Some(1));
        assert_eq!(data.index_of(LocalPos::new(0, 0, 1)), Some(4));
        assert_eq!(data.index_of(LocalPos::new(0, 1, 0)), Some(8));
        assert_eq!(data.index_of(LocalPos::new(3, 2, 1)), Some(23));
        assert_eq!(data.index_of(LocalPos::new(4, 0, 0)), None);

        for index in 0..data.volume() {
            assert_eq!(data.index_of(data.pos_of(index)), Some(index));
        }
    }

    #[test]
    fn test_iter_blocks_skips_empty_cells() {
        let mut data = ChunkData::new(UVec3::splat(2));
        data.set_block(LocalPos::new(1, 1, 0), Block::from_type(3));
        data.set_block(LocalPos::new(0, 0, 1), Block::from_type(4));

        let blocks: Vec<_> = data.iter_blocks().collect();
        assert_eq!(
            blocks,
            vec![
                (LocalPos::new(0, 0, 1), Block::from_type(4)),
                (LocalPos::new(1, 1, 0), Block::from_type(3)),
            ]
        );
    }

    #[test]
    fn test_out_of_bounds_reads_are_empty() {
        let data = ChunkData::filled(UVec3::splat(2), Block::from_type(1));
        assert_eq!(data.get_block(LocalPos::new(2, 0, 0)), None);
        assert!(!data.contains_signed(IVec3::new(-1, 0, 0)));
        assert!(data.contains_signed(IVec3::new(1, 1, 1)));
    }
}

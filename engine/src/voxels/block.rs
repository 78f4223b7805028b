use bitfield_struct::bitfield;

/// A single block entry of a chunk.
///
/// Block type 0 is reserved for the empty entry, so a chunk cell is either empty
/// or holds a block type together with an optional variant (rotation, growth stage, ...).
#[bitfield(u16, hash = true)]
pub struct Block {
    #[bits(12)]
    pub block_type: u16,
    #[bits(4)]
    pub variant: u8,
}

impl Block {
    pub const EMPTY: Block = Block::new();

    pub const MAX_BLOCK_TYPE: u16 = (1 << 12) - 1;

    // Block types used by the bundled world generators
    pub const STONE: Block = Block::from_type(1);
    pub const DIRT: Block = Block::from_type(2);
    pub const GRASS: Block = Block::from_type(3);

    pub const fn from_type(block_type: u16) -> Self {
        Block::new().with_block_type(block_type)
    }

    pub const fn from_type_variant(block_type: u16, variant: u8) -> Self {
        Block::new()
            .with_block_type(block_type)
            .with_variant(variant)
    }

    pub const fn is_empty(&self) -> bool {
        self.block_type() == 0
    }

    /// Returns `None` for the empty entry.
    pub const fn non_empty(self) -> Option<Block> {
        if self.is_empty() { None } else { Some(self) }
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.into_bits() == other.into_bits()
    }
}

impl Eq for Block {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_packing() {
        let block = Block::from_type_variant(1234, 7);
        assert_eq!(block.block_type(), 1234);
        assert_eq!(block.variant(), 7);
        assert!(!block.is_empty());

        // Variant is part of the identity of a block
        assert_ne!(block, Block::from_type(1234));
        assert_eq!(block, Block::from_type_variant(1234, 7));
    }

    #[test]
    fn test_empty_block() {
        assert!(Block::EMPTY.is_empty());
        assert_eq!(Block::EMPTY.non_empty(), None);
        assert_eq!(Block::default(), Block::EMPTY);

        let stone = Block::from_type(1);
        assert_eq!(stone.non_empty(), Some(stone));
    }
}

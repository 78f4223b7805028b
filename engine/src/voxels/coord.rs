use std::ops::{Add, Sub};

use glam::{IVec3, UVec3};

use crate::voxels::face::Face;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// A position of a block within a chunk
pub struct LocalPos(pub UVec3);

impl LocalPos {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        LocalPos(UVec3 { x, y, z })
    }

    /// Returns the neighbouring position inside a chunk of the given size,
    /// or `None` if the neighbour lies in another chunk.
    pub fn offset(&self, face: Face, chunk_size: UVec3) -> Option<LocalPos> {
        let new_pos = self.0.as_ivec3() + face.to_ivec3();

        if new_pos.cmplt(IVec3::ZERO).any() || new_pos.cmpge(chunk_size.as_ivec3()).any() {
            None
        } else {
            Some(LocalPos(new_pos.as_uvec3()))
        }
    }

    pub fn x(&self) -> u32 {
        self.0.x
    }

    pub fn y(&self) -> u32 {
        self.0.y
    }

    pub fn z(&self) -> u32 {
        self.0.z
    }
}

impl From<UVec3> for LocalPos {
    fn from(value: UVec3) -> Self {
        LocalPos(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Coordinates identifying a chunk in chunk space (block coordinates divided by chunk size and floored)
pub struct ChunkPos(pub IVec3);

impl ChunkPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        ChunkPos(IVec3 { x, y, z })
    }

    pub fn x(&self) -> i32 {
        self.0.x
    }

    pub fn y(&self) -> i32 {
        self.0.y
    }

    pub fn z(&self) -> i32 {
        self.0.z
    }

    /// The block position of the chunk's (0, 0, 0) corner.
    pub fn origin(&self, chunk_size: UVec3) -> WorldPos {
        WorldPos(self.0 * chunk_size.as_ivec3())
    }

    pub fn get_neighbor(&self, face: Face) -> ChunkPos {
        ChunkPos(self.0 + face.to_ivec3())
    }

    /// The six face-adjacent chunk positions, in `Face::all()` order.
    pub fn neighbors(&self) -> [ChunkPos; 6] {
        Face::all().map(|face| self.get_neighbor(face))
    }
}

impl From<IVec3> for ChunkPos {
    fn from(value: IVec3) -> Self {
        ChunkPos(value)
    }
}

impl Add for ChunkPos {
    type Output = ChunkPos;

    fn add(self, other: ChunkPos) -> ChunkPos {
        ChunkPos(self.0 + other.0)
    }
}

impl Sub for ChunkPos {
    type Output = ChunkPos;

    fn sub(self, other: ChunkPos) -> ChunkPos {
        ChunkPos(self.0 - other.0)
    }
}

/// A position of a block in world space, measured in blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorldPos(pub IVec3);

impl WorldPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        WorldPos(IVec3 { x, y, z })
    }

    pub fn to_chunk_pos(&self, chunk_size: UVec3) -> ChunkPos {
        ChunkPos(self.0.div_euclid(chunk_size.as_ivec3()))
    }

    pub fn to_local_pos(&self, chunk_size: UVec3) -> LocalPos {
        LocalPos(self.0.rem_euclid(chunk_size.as_ivec3()).as_uvec3())
    }

    pub fn from_chunk_and_local(chunk: ChunkPos, local: LocalPos, chunk_size: UVec3) -> Self {
        chunk.origin(chunk_size) + local
    }

    pub fn offset(&self, face: Face) -> WorldPos {
        WorldPos(self.0 + face.to_ivec3())
    }
}

impl From<IVec3> for WorldPos {
    fn from(value: IVec3) -> Self {
        WorldPos(value)
    }
}

impl From<[i32; 3]> for WorldPos {
    fn from(value: [i32; 3]) -> Self {
        WorldPos(IVec3::from(value))
    }
}

impl Add for WorldPos {
    type Output = WorldPos;

    fn add(self, other: WorldPos) -> WorldPos {
        WorldPos(self.0 + other.0)
    }
}

impl Sub for WorldPos {
    type Output = WorldPos;

    fn sub(self, other: WorldPos) -> WorldPos {
        WorldPos(self.0 - other.0)
    }
}

impl Add<LocalPos> for WorldPos {
    type Output = WorldPos;

    fn add(self, other: LocalPos) -> WorldPos {
        WorldPos(self.0 + other.0.as_ivec3())
    }
}

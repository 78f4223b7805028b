use glam::UVec3;

use crate::{
    mesh_generation::chunk_mesh_builder::ChunkMeshBuilder,
    voxels::{
        block::Block,
        chunk::{Chunk, ChunkHandle},
        coord::{ChunkPos, LocalPos},
        face::Face,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshFace {
    pub position: LocalPos,
    pub direction: Face,
    pub block: Block,
}

/// The visible faces of a chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkMesh {
    pub position: Option<ChunkPos>,
    pub faces: Vec<MeshFace>,
}

impl ChunkMesh {
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// Emits one face per block side that isn't covered by another block.
///
/// Sides on the chunk boundary are culled against resident neighbours only, so a chunk
/// meshed before its neighbour arrives keeps those sides until it is rebuilt.
#[derive(Debug, Default, Clone, Copy)]
pub struct CulledMeshBuilder;

fn wrap_into_neighbour(pos: LocalPos, face: Face, size: UVec3) -> LocalPos {
    let wrapped = (pos.0.as_ivec3() + face.to_ivec3()).rem_euclid(size.as_ivec3());
    LocalPos(wrapped.as_uvec3())
}

impl ChunkMeshBuilder<ChunkMesh> for CulledMeshBuilder {
    #[profiling::function]
    fn build(&self, chunk: &Chunk<ChunkMesh>) -> anyhow::Result<ChunkMesh> {
        let size = chunk.size();
        // Resolve before taking our own lock
        let neighbours: [Option<ChunkHandle<ChunkMesh>>; 6] =
            Face::all().map(|face| chunk.neighbour(face));

        let data = chunk.data();
        let mut faces = Vec::new();

        for (pos, block) in data.iter_blocks() {
            for direction in Face::all() {
                let covered = match pos.offset(direction, size) {
                    Some(inner) => data.get_block(inner).is_some(),
                    None => neighbours[direction as usize].as_ref().is_some_and(|neighbour| {
                        neighbour
                            .get_block(wrap_into_neighbour(pos, direction, size))
                            .is_some()
                    }),
                };

                if !covered {
                    faces.push(MeshFace {
                        position: pos,
                        direction,
                        block,
                    });
                }
            }
        }

        Ok(ChunkMesh {
            position: Some(chunk.position()),
            faces,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use super::*;
    use crate::voxels::{chunk::ChunkResolver, chunk_data::ChunkData};

    struct MapResolver(HashMap<ChunkPos, ChunkHandle<ChunkMesh>>);

    impl ChunkResolver<ChunkMesh> for MapResolver {
        fn get_chunk(&self, pos: ChunkPos) -> Option<ChunkHandle<ChunkMesh>> {
            self.0.get(&pos).cloned()
        }
    }

    #[test]
    fn test_single_block_has_six_faces() {
        let chunk = Chunk::<ChunkMesh>::empty(ChunkPos::new(0, 0, 0), UVec3::splat(4));
        chunk.add_block(LocalPos::new(1, 1, 1), Block::STONE);

        let mesh = CulledMeshBuilder.build(&chunk).unwrap();
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.position, Some(ChunkPos::new(0, 0, 0)));
    }

    #[test]
    fn test_adjacent_blocks_hide_shared_faces() {
        let chunk = Chunk::<ChunkMesh>::empty(ChunkPos::new(0, 0, 0), UVec3::splat(4));
        chunk.add_block(LocalPos::new(1, 1, 1), Block::STONE);
        chunk.add_block(LocalPos::new(2, 1, 1), Block::DIRT);

        let mesh = CulledMeshBuilder.build(&chunk).unwrap();
        assert_eq!(mesh.face_count(), 10);
        assert!(!mesh.faces.iter().any(|face| {
            face.position == LocalPos::new(1, 1, 1) && face.direction == Face::Right
        }));
    }

    #[test]
    fn test_boundary_faces_are_culled_against_resident_neighbours() {
        let size = UVec3::splat(2);
        let left: ChunkHandle<ChunkMesh> = Arc::new(Chunk::new(
            ChunkPos::new(0, 0, 0),
            ChunkData::filled(size, Block::STONE),
        ));
        let right: ChunkHandle<ChunkMesh> = Arc::new(Chunk::new(
            ChunkPos::new(1, 0, 0),
            ChunkData::filled(size, Block::STONE),
        ));

        // Without neighbours every outer face of the 2x2x2 cube is visible
        assert_eq!(CulledMeshBuilder.build(&left).unwrap().face_count(), 24);

        let resolver: Arc<dyn ChunkResolver<ChunkMesh>> = Arc::new(MapResolver(HashMap::from([
            (left.position(), left.clone()),
            (right.position(), right.clone()),
        ])));
        left.set_resolver(Arc::downgrade(&resolver));

        // The 4 faces touching the right chunk are hidden now
        assert_eq!(CulledMeshBuilder.build(&left).unwrap().face_count(), 20);
    }
}

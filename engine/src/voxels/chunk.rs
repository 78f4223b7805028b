use std::sync::{
    Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak,
    atomic::{AtomicU64, Ordering},
};

use glam::{IVec3, UVec3};

use crate::voxels::{
    block::Block,
    chunk_data::ChunkData,
    coord::{ChunkPos, LocalPos, WorldPos},
    face::Face,
};

/// Identity of a single chunk instance.
///
/// Two chunks created for the same position (for example after a chunk was removed and
/// loaded again) get different ids, which lets late worker results be told apart from
/// the chunk that is currently cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(u64);

static NEXT_CHUNK_ID: AtomicU64 = AtomicU64::new(1);

impl ChunkId {
    fn next() -> Self {
        ChunkId(NEXT_CHUNK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Whatever the mesh builder derives from a chunk. Opaque to the chunk manager.
pub trait ChunkRenderState: Send + Sync + 'static {}

impl<T> ChunkRenderState for T where T: Send + Sync + 'static {}

pub type ChunkHandle<T = ()> = Arc<Chunk<T>>;

/// Looks up resident chunks by position. Never loads or generates anything.
pub trait ChunkResolver<T: ChunkRenderState>: Send + Sync {
    fn get_chunk(&self, pos: ChunkPos) -> Option<ChunkHandle<T>>;
}

struct BuiltRenderState<T> {
    version: u64,
    state: Arc<T>,
}

pub struct Chunk<T: ChunkRenderState = ()> {
    id: ChunkId,
    position: ChunkPos,
    size: UVec3,
    data: RwLock<ChunkData>,
    version: AtomicU64,
    render_state: RwLock<Option<BuiltRenderState<T>>>,
    resolver: RwLock<Option<Weak<dyn ChunkResolver<T>>>>,
}

impl<T: ChunkRenderState> Chunk<T> {
    pub fn new(position: ChunkPos, data: ChunkData) -> Self {
        Chunk {
            id: ChunkId::next(),
            position,
            size: data.size(),
            data: RwLock::new(data),
            version: AtomicU64::new(1),
            render_state: RwLock::new(None),
            resolver: RwLock::new(None),
        }
    }

    pub fn empty(position: ChunkPos, size: UVec3) -> Self {
        Chunk::new(position, ChunkData::new(size))
    }

    pub fn id(&self) -> ChunkId {
        self.id
    }

    pub fn position(&self) -> ChunkPos {
        self.position
    }

    pub fn size(&self) -> UVec3 {
        self.size
    }

    /// Incremented on every effective block change, starting from 1.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Read access to the block grid. Don't hold on to the guard across calls into the manager.
    pub fn data(&self) -> RwLockReadGuard<'_, ChunkData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn data_mut(&self) -> RwLockWriteGuard<'_, ChunkData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_block(&self, pos: LocalPos) -> Option<Block> {
        self.data().get_block(pos)
    }

    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }

    /// Writes a block, returning whether the stored value changed.
    /// The version is bumped only for effective changes.
    pub(crate) fn set_block(&self, pos: LocalPos, block: Block) -> bool {
        let mut data = self.data_mut();
        if !data.contains(pos) {
            return false;
        }

        if data.get_block(pos).unwrap_or(Block::EMPTY) == block {
            return false;
        }

        data.set_block(pos, block);
        self.version.fetch_add(1, Ordering::AcqRel);
        true
    }

    pub(crate) fn add_block(&self, pos: LocalPos, block: Block) -> bool {
        self.set_block(pos, block)
    }

    pub(crate) fn remove_block(&self, pos: LocalPos) -> bool {
        self.set_block(pos, Block::EMPTY)
    }

    pub fn render_state(&self) -> Option<Arc<T>> {
        self.render_state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|built| built.state.clone())
    }

    /// The chunk version the current render state was built from.
    pub fn mesh_version(&self) -> Option<u64> {
        self.render_state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|built| built.version)
    }

    pub fn needs_mesh(&self) -> bool {
        self.mesh_version() != Some(self.version())
    }

    /// Attaches a render state built from `version` of this chunk.
    /// A build of an older version than the one already attached is dropped.
    pub(crate) fn set_render_state(&self, version: u64, state: T) -> bool {
        let mut current = self
            .render_state
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if current.as_ref().is_some_and(|built| built.version > version) {
            return false;
        }

        *current = Some(BuiltRenderState {
            version,
            state: Arc::new(state),
        });
        true
    }

    pub(crate) fn set_resolver(&self, resolver: Weak<dyn ChunkResolver<T>>) {
        *self.resolver.write().unwrap_or_else(PoisonError::into_inner) = Some(resolver);
    }

    pub(crate) fn clear_resolver(&self) {
        *self.resolver.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn resolve(&self, pos: ChunkPos) -> Option<ChunkHandle<T>> {
        let resolver = self
            .resolver
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()?
            .upgrade()?;
        resolver.get_chunk(pos)
    }

    /// The resident chunk sharing `face` with this one, if any.
    pub fn neighbour(&self, face: Face) -> Option<ChunkHandle<T>> {
        self.resolve(self.position.get_neighbor(face))
    }

    /// Reads a block relative to this chunk's origin. Positions outside the chunk are
    /// looked up in whichever resident chunk contains them.
    pub fn get_block_or_neighbour(&self, pos: IVec3) -> Option<Block> {
        {
            let data = self.data();
            if data.contains_signed(pos) {
                return data.get_block(LocalPos(pos.as_uvec3()));
            }
        }

        let world_pos = self.position.origin(self.size) + WorldPos(pos);
        let chunk = self.resolve(world_pos.to_chunk_pos(self.size))?;
        chunk.get_block(world_pos.to_local_pos(self.size))
    }

    pub fn approximate_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.data().approximate_size()
    }
}

impl<T: ChunkRenderState> std::fmt::Debug for Chunk<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("version", &self.version())
            .field("mesh_version", &self.mesh_version())
            .finish()
    }
}

use crossbeam_channel::{Receiver, Sender};

use crate::voxels::{
    chunk::{ChunkHandle, ChunkId, ChunkRenderState},
    coord::ChunkPos,
};

/// Observes chunks becoming available or getting a new render state.
///
/// Called synchronously from [`super::ChunkManager::update`], so implementations must not block.
pub trait ChunkManagerListener<T: ChunkRenderState>: Send + Sync {
    /// A chunk was inserted into the cache.
    fn on_chunk_available(&self, _chunk: &ChunkHandle<T>) {}

    /// A resident chunk finished rebuilding its render state.
    fn on_chunk_updated(&self, _chunk: &ChunkHandle<T>) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkEvent {
    Available { position: ChunkPos, id: ChunkId },
    Updated { position: ChunkPos, id: ChunkId },
}

impl ChunkEvent {
    pub fn position(&self) -> ChunkPos {
        match self {
            ChunkEvent::Available { position, .. } | ChunkEvent::Updated { position, .. } => {
                *position
            }
        }
    }
}

/// Forwards listener callbacks to a channel, for consumers living on another thread.
#[derive(Clone)]
pub struct ChunkEventSender {
    sender: Sender<ChunkEvent>,
}

impl ChunkEventSender {
    pub fn new() -> (Self, Receiver<ChunkEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (ChunkEventSender { sender }, receiver)
    }

    fn send(&self, event: ChunkEvent) {
        // The receiving side hanging up is not our problem
        let _ = self.sender.send(event);
    }
}

impl<T: ChunkRenderState> ChunkManagerListener<T> for ChunkEventSender {
    fn on_chunk_available(&self, chunk: &ChunkHandle<T>) {
        self.send(ChunkEvent::Available {
            position: chunk.position(),
            id: chunk.id(),
        });
    }

    fn on_chunk_updated(&self, chunk: &ChunkHandle<T>) {
        self.send(ChunkEvent::Updated {
            position: chunk.position(),
            id: chunk.id(),
        });
    }
}

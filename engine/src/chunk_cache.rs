use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::voxels::{
    chunk::{ChunkHandle, ChunkRenderState, ChunkResolver},
    coord::ChunkPos,
};

/// Which chunks `maintain` discards first when the cache is over capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvictionPolicy {
    #[default]
    LeastRecentlyUsed,
    FirstInFirstOut,
}

struct CacheEntry<T: ChunkRenderState> {
    chunk: ChunkHandle<T>,
    inserted_at: u64,
    last_access: AtomicU64,
}

impl<T: ChunkRenderState> CacheEntry<T> {
    fn stamp(&self, policy: EvictionPolicy) -> u64 {
        match policy {
            EvictionPolicy::LeastRecentlyUsed => self.last_access.load(Ordering::Relaxed),
            EvictionPolicy::FirstInFirstOut => self.inserted_at,
        }
    }
}

/// Position-keyed store of resident chunks.
///
/// Reads are safe from any thread. Capacity is only enforced by [`ChunkCache::maintain`],
/// never by `put` itself, so the owner decides when eviction happens.
pub struct ChunkCache<T: ChunkRenderState> {
    chunks: DashMap<ChunkPos, CacheEntry<T>>,
    clock: AtomicU64,
    capacity: usize,
    policy: EvictionPolicy,
}

impl<T: ChunkRenderState> ChunkCache<T> {
    /// A `capacity` of 0 means unbounded.
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        ChunkCache {
            chunks: DashMap::new(),
            clock: AtomicU64::new(0),
            capacity,
            policy,
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Returns the chunk at `pos` and marks it as recently used.
    pub fn get(&self, pos: ChunkPos) -> Option<ChunkHandle<T>> {
        let entry = self.chunks.get(&pos)?;
        entry.last_access.store(self.tick(), Ordering::Relaxed);
        Some(entry.chunk.clone())
    }

    /// Same as `get`, without affecting eviction order.
    pub fn peek(&self, pos: ChunkPos) -> Option<ChunkHandle<T>> {
        self.chunks.get(&pos).map(|entry| entry.chunk.clone())
    }

    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    /// Inserts a chunk at its own position, returning the chunk it replaced.
    pub fn put(&self, chunk: ChunkHandle<T>) -> Option<ChunkHandle<T>> {
        let stamp = self.tick();
        self.chunks
            .insert(
                chunk.position(),
                CacheEntry {
                    chunk,
                    inserted_at: stamp,
                    last_access: AtomicU64::new(stamp),
                },
            )
            .map(|entry| entry.chunk)
    }

    pub fn evict(&self, pos: ChunkPos) -> Option<ChunkHandle<T>> {
        self.chunks.remove(&pos).map(|(_, entry)| entry.chunk)
    }

    pub fn evict_all(&self) -> Vec<ChunkHandle<T>> {
        let positions: Vec<ChunkPos> = self.chunks.iter().map(|entry| *entry.key()).collect();
        positions
            .into_iter()
            .filter_map(|pos| self.evict(pos))
            .collect()
    }

    /// Evicts chunks according to the eviction policy until the cache is within capacity.
    /// Chunks for which `is_pinned` returns true are never evicted, even if that leaves
    /// the cache over capacity.
    #[profiling::function]
    pub fn maintain(&self, is_pinned: impl Fn(&ChunkHandle<T>) -> bool) -> Vec<ChunkHandle<T>> {
        if self.capacity == 0 || self.chunks.len() <= self.capacity {
            return Vec::new();
        }

        let mut candidates: Vec<(u64, ChunkPos)> = self
            .chunks
            .iter()
            .filter(|entry| !is_pinned(&entry.chunk))
            .map(|entry| (entry.stamp(self.policy), *entry.key()))
            .collect();
        candidates.sort_unstable_by_key(|(stamp, _)| *stamp);

        let excess = self.chunks.len() - self.capacity;
        candidates
            .into_iter()
            .take(excess)
            .filter_map(|(_, pos)| self.evict(pos))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn positions(&self) -> Vec<ChunkPos> {
        self.chunks.iter().map(|entry| *entry.key()).collect()
    }

    pub fn approximate_size(&self) -> usize {
        self.chunks
            .iter()
            .map(|entry| entry.chunk.approximate_size())
            .sum()
    }
}

impl<T: ChunkRenderState> ChunkResolver<T> for ChunkCache<T> {
    fn get_chunk(&self, pos: ChunkPos) -> Option<ChunkHandle<T>> {
        self.peek(pos)
    }
}

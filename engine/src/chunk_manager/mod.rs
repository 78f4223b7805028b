//! Chunk lifecycle: turns requested positions into cached, meshed chunks.
//!
//! A requested position goes through up to three stages, each with its own worker pool:
//! loading from the [`ChunkRepository`], generating with the [`WorldGenerator`] if nothing
//! was stored, and building a render state with the [`ChunkMeshBuilder`]. Every stage has
//! a deduplicating queue and a tracker of jobs in flight. [`ChunkManager::update`] moves
//! at most one item through each stage per call, and is the only place where the cache is
//! populated.

use std::{
    sync::{Arc, Weak},
    time::{Duration, Instant},
};

use ahash::AHashSet;
use glam::{UVec3, Vec3};

use crate::{
    chunk_cache::ChunkCache,
    chunk_job_queue::ChunkJobQueue,
    chunk_worker_pool::{ChunkJobTracker, ChunkWorkerPool, JobResult},
    config::chunk_manager_config::ChunkManagerConfig,
    error::{ChunkManagerError, WorkerError},
    mesh_generation::chunk_mesh_builder::ChunkMeshBuilder,
    persistence::ChunkRepository,
    voxels::{
        block::Block,
        chunk::{Chunk, ChunkHandle, ChunkId, ChunkRenderState, ChunkResolver},
        chunk_data::ChunkData,
        coord::{ChunkPos, LocalPos, WorldPos},
        face::Face,
        location::{
            ContactPoint, block_location, block_location_at_contact, neighbour_block_location,
            neighbour_block_location_at_contact,
        },
    },
    world_stats::ChunkManagerStats,
    worldgen::world_generator::WorldGenerator,
};

pub mod listener;


use listener::ChunkManagerListener;

pub type Result<T, E = ChunkManagerError> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MeshJobKey {
    id: ChunkId,
    position: ChunkPos,
    /// Neighbours that were cached when the build was dispatched, in `Face::all()` order
    neighbours: [Option<ChunkId>; 6],
}

pub struct ChunkManagerBuilder<T: ChunkRenderState> {
    config: ChunkManagerConfig,
    repository: Option<Arc<dyn ChunkRepository>>,
    generator: Option<Arc<dyn WorldGenerator>>,
    mesh_builder: Arc<dyn ChunkMeshBuilder<T>>,
}

impl<T: ChunkRenderState> ChunkManagerBuilder<T> {
    pub fn config(mut self, config: ChunkManagerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn repository(mut self, repository: impl ChunkRepository) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    pub fn shared_repository(mut self, repository: Arc<dyn ChunkRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn generator(mut self, generator: impl WorldGenerator) -> Self {
        self.generator = Some(Arc::new(generator));
        self
    }

    pub fn build(self) -> ChunkManager<T> {
        ChunkManager {
            config: self.config,
            repository: self.repository,
            generator: self.generator,
            mesh_builder: self.mesh_builder,
            listeners: Vec::new(),
            pipeline: None,
        }
    }
}

/// Owns the chunk cache and the load, generate and mesh pipeline.
///
/// Everything except [`ChunkManager::add_listener`] and [`ChunkManager::remove_listener`]
/// fails with [`ChunkManagerError::NotInitialized`] outside of
/// `initialize()` .. `cleanup()`. All calls must come from the same thread; the worker
/// pools never touch the cache.
pub struct ChunkManager<T: ChunkRenderState> {
    config: ChunkManagerConfig,
    repository: Option<Arc<dyn ChunkRepository>>,
    generator: Option<Arc<dyn WorldGenerator>>,
    mesh_builder: Arc<dyn ChunkMeshBuilder<T>>,
    listeners: Vec<Arc<dyn ChunkManagerListener<T>>>,
    pipeline: Option<ChunkPipeline<T>>,
}

impl<T: ChunkRenderState> ChunkManager<T> {
    pub fn builder(mesh_builder: impl ChunkMeshBuilder<T>) -> ChunkManagerBuilder<T> {
        ChunkManagerBuilder {
            config: ChunkManagerConfig::default(),
            repository: None,
            generator: None,
            mesh_builder: Arc::new(mesh_builder),
        }
    }

    pub fn config(&self) -> &ChunkManagerConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.pipeline.is_some()
    }

    fn pipeline(&self) -> Result<&ChunkPipeline<T>> {
        self.pipeline
            .as_ref()
            .ok_or(ChunkManagerError::NotInitialized)
    }

    fn pipeline_mut(&mut self) -> Result<&mut ChunkPipeline<T>> {
        self.pipeline
            .as_mut()
            .ok_or(ChunkManagerError::NotInitialized)
    }

    pub fn initialize(&mut self) -> Result<()> {
        log::trace!("ChunkManager - initialize");

        if self.pipeline.is_some() {
            return Err(ChunkManagerError::AlreadyInitialized);
        }

        if !self.config.world.is_valid() {
            return Err(ChunkManagerError::InvalidConfig(format!(
                "{:?}",
                self.config.world
            )));
        }

        let repository_pool = match &self.repository {
            Some(_) => Some(ChunkWorkerPool::new(
                "repository",
                self.config.repository_pool_size,
            )?),
            None => {
                log::info!("No chunk repository set");
                None
            }
        };

        let generator_pool = match &self.generator {
            Some(_) => Some(ChunkWorkerPool::new(
                "generator",
                self.config.generator_pool_size,
            )?),
            None => {
                log::info!("No world generator set");
                None
            }
        };

        let mesh_pool = ChunkWorkerPool::new("mesh", self.config.mesh_pool_size)?;

        self.pipeline = Some(ChunkPipeline {
            config: self.config.clone(),
            cache: Arc::new(ChunkCache::new(
                self.config.cache_size,
                self.config.eviction_policy,
            )),
            repository: self.repository.clone().zip(repository_pool),
            generator: self.generator.clone().zip(generator_pool),
            mesh_builder: self.mesh_builder.clone(),
            mesh_pool,
            load_queue: ChunkJobQueue::new(),
            generate_queue: ChunkJobQueue::new(),
            mesh_queue: ChunkJobQueue::new(),
            load_jobs: ChunkJobTracker::new(),
            generate_jobs: ChunkJobTracker::new(),
            mesh_jobs: ChunkJobTracker::new(),
            neighbour_triggers: AHashSet::new(),
            last_maintenance: Instant::now(),
        });

        Ok(())
    }

    /// Stops the worker pools, drops all pending work and evicts every cached chunk.
    pub fn cleanup(&mut self) -> Result<()> {
        log::trace!("ChunkManager - cleanup");

        let mut pipeline = self
            .pipeline
            .take()
            .ok_or(ChunkManagerError::NotInitialized)?;
        pipeline.shutdown();
        Ok(())
    }

    /// Moves the pipeline forward by one step. Call once per frame.
    #[profiling::function]
    pub fn update(&mut self) -> Result<()> {
        let pipeline = self
            .pipeline
            .as_mut()
            .ok_or(ChunkManagerError::NotInitialized)?;

        pipeline.handle_finished_jobs(&self.listeners);
        pipeline.dispatch_jobs();
        pipeline.maintain_cache();
        Ok(())
    }

    /// Returns the cached chunk at `pos`. Never loads anything.
    pub fn get_chunk(&self, pos: ChunkPos) -> Result<Option<ChunkHandle<T>>> {
        Ok(self.pipeline()?.cache.get(pos))
    }

    /// Inserts a chunk, replacing and cleaning up whatever was at its position.
    /// A chunk without an up to date render state is queued for meshing.
    pub fn set_chunk(&mut self, chunk: ChunkHandle<T>) -> Result<()> {
        let pipeline = self
            .pipeline
            .as_mut()
            .ok_or(ChunkManagerError::NotInitialized)?;

        let expected = self.config.world.chunk_size;
        if chunk.size() != expected {
            return Err(ChunkManagerError::InvalidChunkSize {
                expected,
                actual: chunk.size(),
            });
        }

        pipeline.remove_chunk(chunk.position());
        pipeline.insert_chunk(&chunk, &self.listeners);
        if chunk.needs_mesh() {
            pipeline.enqueue_mesh(&chunk);
        }
        Ok(())
    }

    /// Queues a chunk for loading unless it is cached or already somewhere in the pipeline.
    pub fn request_chunk(&mut self, pos: ChunkPos) -> Result<()> {
        let pipeline = self.pipeline_mut()?;
        if pipeline.cache.contains(pos) || pipeline.is_pending(pos) {
            return Ok(());
        }

        pipeline.load_queue.push(pos, pos);
        Ok(())
    }

    /// Queues a rebuild of the render state of the cached chunk at `pos`.
    pub fn request_mesh_update(&mut self, pos: ChunkPos) -> Result<()> {
        let pipeline = self.pipeline_mut()?;
        if let Some(chunk) = pipeline.cache.peek(pos) {
            pipeline.enqueue_mesh(&chunk);
        }
        Ok(())
    }

    /// Same as [`ChunkManager::request_mesh_update`], ignored unless `chunk` is the one
    /// currently cached at its position.
    pub fn request_mesh_update_for(&mut self, chunk: &ChunkHandle<T>) -> Result<()> {
        let pipeline = self.pipeline_mut()?;
        let is_resident = pipeline
            .cache
            .peek(chunk.position())
            .is_some_and(|resident| resident.id() == chunk.id());

        if is_resident {
            pipeline.enqueue_mesh(chunk);
        }
        Ok(())
    }

    /// Cancels all pending work for `pos` and evicts the cached chunk, if any.
    /// Results of jobs that are still running are discarded when they arrive.
    pub fn remove_chunk(&mut self, pos: ChunkPos) -> Result<Option<ChunkHandle<T>>> {
        Ok(self.pipeline_mut()?.remove_chunk(pos))
    }

    pub fn remove_chunk_handle(&mut self, chunk: &ChunkHandle<T>) -> Result<Option<ChunkHandle<T>>> {
        self.remove_chunk(chunk.position())
    }

    /// Places a block at a world location. Returns whether anything changed; writes to
    /// chunks that aren't cached are ignored.
    pub fn add_block(&mut self, location: Vec3, block: Block) -> Result<bool> {
        let block_pos = block_location(location, &self.config.world);
        self.pipeline_mut()?
            .edit_block(block_pos, |chunk, local_pos| chunk.add_block(local_pos, block))
    }

    pub fn remove_block(&mut self, location: Vec3) -> Result<bool> {
        let block_pos = block_location(location, &self.config.world);
        self.pipeline_mut()?
            .edit_block(block_pos, |chunk, local_pos| chunk.remove_block(local_pos))
    }

    pub fn get_block(&self, location: Vec3) -> Result<Option<Block>> {
        let pipeline = self.pipeline()?;
        Ok(pipeline.get_block(block_location(location, &self.config.world)))
    }

    /// The block that was hit at a contact point.
    pub fn get_block_at_contact(&self, contact: &ContactPoint) -> Result<Option<Block>> {
        let pipeline = self.pipeline()?;
        Ok(pipeline.get_block(block_location_at_contact(contact, &self.config.world)))
    }

    pub fn get_neighbour_block(&self, location: Vec3, face: Face) -> Result<Option<Block>> {
        let pipeline = self.pipeline()?;
        Ok(pipeline.get_block(neighbour_block_location(
            location,
            face,
            &self.config.world,
        )))
    }

    /// The block next to the hit face at a contact point.
    pub fn get_neighbour_block_at_contact(&self, contact: &ContactPoint) -> Result<Option<Block>> {
        let pipeline = self.pipeline()?;
        if Face::from_normal(contact.normal).is_none() {
            return Ok(None);
        }

        Ok(pipeline.get_block(neighbour_block_location_at_contact(
            contact,
            &self.config.world,
        )))
    }

    pub fn add_listener(&mut self, listener: Arc<dyn ChunkManagerListener<T>>) {
        self.listeners.push(listener);
    }

    pub fn remove_listener(&mut self, listener: &Arc<dyn ChunkManagerListener<T>>) -> bool {
        let before = self.listeners.len();
        self.listeners
            .retain(|existing| !Arc::ptr_eq(existing, listener));
        self.listeners.len() != before
    }

    /// Read-only access to cached chunks, usable from any thread.
    pub fn chunk_resolver(&self) -> Result<Arc<dyn ChunkResolver<T>>> {
        let cache: Arc<dyn ChunkResolver<T>> = self.pipeline()?.cache.clone();
        Ok(cache)
    }

    pub fn stats(&self) -> Result<ChunkManagerStats> {
        Ok(self.pipeline()?.stats())
    }
}

impl<T: ChunkRenderState> Drop for ChunkManager<T> {
    fn drop(&mut self) {
        if let Some(mut pipeline) = self.pipeline.take() {
            pipeline.shutdown();
        }
    }
}

/// State that only exists between `initialize` and `cleanup`.
struct ChunkPipeline<T: ChunkRenderState> {
    config: ChunkManagerConfig,
    cache: Arc<ChunkCache<T>>,
    repository: Option<(Arc<dyn ChunkRepository>, ChunkWorkerPool)>,
    generator: Option<(Arc<dyn WorldGenerator>, ChunkWorkerPool)>,
    mesh_builder: Arc<dyn ChunkMeshBuilder<T>>,
    mesh_pool: ChunkWorkerPool,

    load_queue: ChunkJobQueue<ChunkPos>,
    generate_queue: ChunkJobQueue<ChunkPos>,
    mesh_queue: ChunkJobQueue<ChunkId, ChunkHandle<T>>,

    load_jobs: ChunkJobTracker<ChunkPos, Option<ChunkHandle<T>>>,
    generate_jobs: ChunkJobTracker<ChunkPos, ChunkHandle<T>>,
    mesh_jobs: ChunkJobTracker<MeshJobKey, ChunkHandle<T>>,

    /// (source, neighbour) pairs where a finished mesh of `source` already queued a
    /// rebuild of `neighbour`
    neighbour_triggers: AHashSet<(ChunkId, ChunkId)>,
    last_maintenance: Instant,
}

fn into_chunk<T: ChunkRenderState>(
    pos: ChunkPos,
    data: ChunkData,
    expected: UVec3,
) -> JobResult<ChunkHandle<T>> {
    if data.size() != expected {
        return Err(WorkerError::InvalidChunk {
            expected,
            actual: data.size(),
        });
    }

    Ok(Arc::new(Chunk::new(pos, data)))
}

impl<T: ChunkRenderState> ChunkPipeline<T> {
    fn chunk_size(&self) -> UVec3 {
        self.config.world.chunk_size
    }

    /// Whether `pos` is queued or being worked on in any stage.
    fn is_pending(&self, pos: ChunkPos) -> bool {
        self.load_queue.contains(pos)
            || self.generate_queue.contains(pos)
            || self.mesh_queue.any(|_, chunk| chunk.position() == pos)
            || self.load_jobs.any(|key| *key == pos)
            || self.generate_jobs.any(|key| *key == pos)
            || self.mesh_jobs.any(|key| key.position == pos)
    }

    fn has_pending_mesh(&self, chunk: &Chunk<T>) -> bool {
        self.mesh_queue.contains(chunk.id()) || self.mesh_jobs.any(|key| key.id == chunk.id())
    }

    fn enqueue_mesh(&mut self, chunk: &ChunkHandle<T>) -> bool {
        self.mesh_queue.push(chunk.id(), chunk.clone())
    }

    /// Lets `chunk` see its cached neighbours. Also done before the first build, so that
    /// a chunk arriving next to cached chunks is meshed against them.
    fn attach_resolver(&self, chunk: &Chunk<T>) {
        let resolver: Arc<dyn ChunkResolver<T>> = self.cache.clone();
        let resolver: Weak<dyn ChunkResolver<T>> = Arc::downgrade(&resolver);
        chunk.set_resolver(resolver);
    }

    fn cached_neighbours(&self, pos: ChunkPos) -> [Option<ChunkId>; 6] {
        pos.neighbors()
            .map(|neighbour_pos| self.cache.peek(neighbour_pos).map(|chunk| chunk.id()))
    }

    fn insert_chunk(
        &mut self,
        chunk: &ChunkHandle<T>,
        listeners: &[Arc<dyn ChunkManagerListener<T>>],
    ) {
        self.cache.put(chunk.clone());
        self.attach_resolver(chunk);

        for listener in listeners {
            listener.on_chunk_available(chunk);
        }
    }

    fn forget_triggers(&mut self, id: ChunkId) {
        self.neighbour_triggers
            .retain(|(source, neighbour)| *source != id && *neighbour != id);
    }

    fn remove_chunk(&mut self, pos: ChunkPos) -> Option<ChunkHandle<T>> {
        let dequeued = self.load_queue.remove_where(|key, _| *key == pos)
            + self.generate_queue.remove_where(|key, _| *key == pos)
            + self
                .mesh_queue
                .remove_where(|_, chunk| chunk.position() == pos);
        let cancelled = self.load_jobs.cancel_where(|key| *key == pos)
            + self.generate_jobs.cancel_where(|key| *key == pos)
            + self.mesh_jobs.cancel_where(|key| key.position == pos);

        if dequeued + cancelled > 0 {
            log::debug!(
                "Stopped pending work for chunk {:?}: {} queued, {} running",
                pos,
                dequeued,
                cancelled
            );
        }

        let chunk = self.cache.evict(pos)?;
        chunk.clear_resolver();
        self.forget_triggers(chunk.id());
        Some(chunk)
    }

    fn edit_block(
        &mut self,
        block_pos: WorldPos,
        edit: impl FnOnce(&Chunk<T>, LocalPos) -> bool,
    ) -> Result<bool> {
        let chunk_size = self.chunk_size();
        let Some(chunk) = self.cache.get(block_pos.to_chunk_pos(chunk_size)) else {
            return Ok(false);
        };

        if !edit(&chunk, block_pos.to_local_pos(chunk_size)) {
            return Ok(false);
        }

        // Changed contents may have to reach the neighbours again
        self.forget_triggers(chunk.id());
        self.enqueue_mesh(&chunk);
        Ok(true)
    }

    fn get_block(&self, block_pos: WorldPos) -> Option<Block> {
        let chunk_size = self.chunk_size();
        let chunk = self.cache.get(block_pos.to_chunk_pos(chunk_size))?;
        chunk.get_block(block_pos.to_local_pos(chunk_size))
    }

    #[profiling::function]
    fn handle_finished_jobs(&mut self, listeners: &[Arc<dyn ChunkManagerListener<T>>]) {
        if let Some((pos, result)) = self.load_jobs.poll_finished() {
            self.on_chunk_loaded(pos, result);
        }

        if let Some((pos, result)) = self.generate_jobs.poll_finished() {
            self.on_chunk_generated(pos, result);
        }

        if let Some((key, result)) = self.mesh_jobs.poll_finished() {
            self.on_chunk_meshed(key, result, listeners);
        }
    }

    fn on_chunk_loaded(&mut self, pos: ChunkPos, result: JobResult<Option<ChunkHandle<T>>>) {
        match result {
            Ok(_) if self.cache.contains(pos) => {
                log::debug!("Discarding loaded chunk {:?}, already cached", pos);
            }
            Ok(Some(chunk)) => {
                log::trace!("Loaded chunk {:?}", pos);
                self.enqueue_mesh(&chunk);
            }
            Ok(None) => {
                self.generate_queue.push(pos, pos);
            }
            Err(e) => {
                log::error!("Failed to load chunk {:?}: {}", pos, e);
            }
        }
    }

    fn on_chunk_generated(&mut self, pos: ChunkPos, result: JobResult<ChunkHandle<T>>) {
        match result {
            Ok(_) if self.cache.contains(pos) => {
                log::debug!("Discarding generated chunk {:?}, already cached", pos);
            }
            Ok(chunk) => {
                log::trace!("Generated chunk {:?}", pos);
                self.enqueue_mesh(&chunk);
            }
            Err(e) => {
                log::error!("Failed to generate chunk {:?}: {}", pos, e);
            }
        }
    }

    fn on_chunk_meshed(
        &mut self,
        key: MeshJobKey,
        result: JobResult<ChunkHandle<T>>,
        listeners: &[Arc<dyn ChunkManagerListener<T>>],
    ) {
        let chunk = match result {
            Ok(chunk) => chunk,
            Err(e) => {
                log::error!("Failed to build mesh for chunk {:?}: {}", key.position, e);
                return;
            }
        };

        match self.cache.peek(key.position) {
            Some(resident) if resident.id() == chunk.id() => {
                for listener in listeners {
                    listener.on_chunk_updated(&chunk);
                }
            }
            Some(_) => {
                log::debug!(
                    "Discarding mesh of replaced chunk {:?} ({:?})",
                    key.position,
                    key.id
                );
                chunk.clear_resolver();
                return;
            }
            None => {
                self.insert_chunk(&chunk, listeners);
            }
        }

        if self.config.trigger_adjacent_chunk_updates {
            // The neighbourhood changed while the build was running, the mesh is outdated
            if self.cached_neighbours(key.position) != key.neighbours {
                log::trace!("Neighbours of chunk {:?} changed while meshing", key.position);
                self.enqueue_mesh(&chunk);
            }
            self.trigger_neighbour_updates(&chunk);
        }
    }

    /// Queues rebuilds of the cached neighbours of a freshly meshed chunk, at most once
    /// per pair of chunks until one of them changes.
    fn trigger_neighbour_updates(&mut self, chunk: &ChunkHandle<T>) {
        for neighbour_pos in chunk.position().neighbors() {
            let Some(neighbour) = self.cache.peek(neighbour_pos) else {
                continue;
            };

            let pair = (chunk.id(), neighbour.id());
            if self.neighbour_triggers.contains(&pair)
                || self.neighbour_triggers.contains(&(pair.1, pair.0))
            {
                continue;
            }

            if self.enqueue_mesh(&neighbour) {
                log::trace!(
                    "Chunk {:?} triggered a mesh update of {:?}",
                    chunk.position(),
                    neighbour_pos
                );
                self.neighbour_triggers.insert(pair);
            }
        }
    }

    #[profiling::function]
    fn dispatch_jobs(&mut self) {
        self.dispatch_load();
        self.dispatch_generate();
        self.dispatch_mesh();
    }

    fn dispatch_load(&mut self) {
        let Some((pos, _)) = self.load_queue.pop() else {
            return;
        };

        let Some((repository, pool)) = &self.repository else {
            self.generate_queue.push(pos, pos);
            return;
        };

        if self.load_jobs.any(|key| *key == pos) {
            self.load_queue.push(pos, pos);
            return;
        }

        let repository = repository.clone();
        let chunk_size = self.config.world.chunk_size;
        let handle = pool.submit(pos, move || {
            repository
                .load(pos, chunk_size)?
                .map(|data| into_chunk(pos, data, chunk_size))
                .transpose()
        });
        self.load_jobs.push(handle);
    }

    fn dispatch_generate(&mut self) {
        let Some((pos, _)) = self.generate_queue.pop() else {
            return;
        };

        let chunk_size = self.chunk_size();
        let Some((generator, pool)) = &self.generator else {
            let chunk: ChunkHandle<T> = Arc::new(Chunk::empty(pos, chunk_size));
            self.mesh_queue.push(chunk.id(), chunk);
            return;
        };

        if self.generate_jobs.any(|key| *key == pos) {
            self.generate_queue.push(pos, pos);
            return;
        }

        let generator = generator.clone();
        let handle = pool.submit(pos, move || {
            let data = generator.generate_chunk(pos, chunk_size)?;
            into_chunk(pos, data, chunk_size)
        });
        self.generate_jobs.push(handle);
    }

    fn dispatch_mesh(&mut self) {
        let Some((id, chunk)) = self.mesh_queue.pop() else {
            return;
        };

        // Wait for the running build to finish, its result would overwrite ours otherwise
        if self.mesh_jobs.any(|key| key.id == id) {
            self.mesh_queue.push(id, chunk);
            return;
        }

        self.attach_resolver(&chunk);
        let key = MeshJobKey {
            id,
            position: chunk.position(),
            neighbours: self.cached_neighbours(chunk.position()),
        };
        let mesh_builder = self.mesh_builder.clone();
        let handle = self.mesh_pool.submit(key, move || {
            let version = chunk.version();
            let render_state = mesh_builder.build(&chunk)?;
            chunk.set_render_state(version, render_state);
            Ok(chunk)
        });
        self.mesh_jobs.push(handle);
    }

    fn maintain_cache(&mut self) {
        let interval = self.config.cache_maintenance_interval_ms;
        if interval == 0 || self.last_maintenance.elapsed() < Duration::from_millis(interval) {
            return;
        }
        self.last_maintenance = Instant::now();

        let evicted = self
            .cache
            .maintain(|chunk| self.has_pending_mesh(chunk) || self.is_pending(chunk.position()));

        if evicted.is_empty() {
            return;
        }

        log::debug!("Evicted {} chunks from the cache", evicted.len());
        for chunk in evicted {
            chunk.clear_resolver();
            self.forget_triggers(chunk.id());
        }
    }

    fn stats(&self) -> ChunkManagerStats {
        ChunkManagerStats {
            cached_chunks: self.cache.len(),
            load_queue: self.load_queue.len(),
            generate_queue: self.generate_queue.len(),
            mesh_queue: self.mesh_queue.len(),
            loading: self.load_jobs.len(),
            generating: self.generate_jobs.len(),
            meshing: self.mesh_jobs.len(),
            neighbour_triggers: self.neighbour_triggers.len(),
            approximate_memory_usage_bytes: self.cache.approximate_size(),
        }
    }

    fn shutdown(&mut self) {
        let dequeued =
            self.load_queue.clear() + self.generate_queue.clear() + self.mesh_queue.clear();
        let cancelled =
            self.load_jobs.clear() + self.generate_jobs.clear() + self.mesh_jobs.clear();
        self.neighbour_triggers.clear();

        let evicted = self.cache.evict_all();
        for chunk in &evicted {
            chunk.clear_resolver();
        }

        log::debug!(
            "Chunk manager shut down: {} queued and {} running jobs dropped, {} chunks evicted",
            dequeued,
            cancelled,
            evicted.len()
        );
    }
}

use std::sync::Arc;

use bytesize::ByteSize;
use crossbeam_channel::Receiver;
use engine::{
    chunk_manager::{
        ChunkManager,
        listener::{ChunkEvent, ChunkEventSender},
    },
    chunk_pager::ChunkPager,
    mesh_generation::culled_mesh_builder::{ChunkMesh, CulledMeshBuilder},
    persistence::InMemoryChunkRepository,
    worldgen::{noise_world_generator::NoiseWorldGenerator, pregenerate_area},
};
use glam::Vec3;

use crate::{
    config::RunnerConfig,
    game_loop::{LoopTime, Simulation},
};

#[derive(Debug, Default)]
struct EventCounts {
    available: u64,
    updated: u64,
    faces_built: u64,
}

/// Runs along -Z through noise terrain while the pager keeps the chunks around it loaded.
pub struct EndlessRunner {
    config: RunnerConfig,
    manager: ChunkManager<ChunkMesh>,
    pager: ChunkPager,
    events: Receiver<ChunkEvent>,
    counts: EventCounts,
    location: Vec3,
    elapsed_s: f64,
    last_stats_s: f64,
}

impl EndlessRunner {
    pub fn new(config: RunnerConfig) -> anyhow::Result<Self> {
        let generator = NoiseWorldGenerator::new(config.seed);
        let repository = InMemoryChunkRepository::new();

        let stored = pregenerate_area(
            &generator,
            &repository,
            config.pregenerate_size,
            config.pregenerate_height,
            config.chunk_manager.world.chunk_size,
        )?;
        log::info!("Pregenerated {} chunks", stored);

        let (listener, events) = ChunkEventSender::new();
        let mut manager = ChunkManager::builder(CulledMeshBuilder)
            .config(config.chunk_manager.clone())
            .repository(repository)
            .generator(generator)
            .build();
        manager.add_listener(Arc::new(listener));
        manager.initialize()?;

        Ok(EndlessRunner {
            pager: ChunkPager::new(config.grid_size()),
            location: config.start_location(),
            config,
            manager,
            events,
            counts: EventCounts::default(),
            elapsed_s: 0.0,
            last_stats_s: 0.0,
        })
    }

    fn drain_events(&mut self) {
        for event in self.events.try_iter() {
            match event {
                ChunkEvent::Available { .. } => self.counts.available += 1,
                ChunkEvent::Updated { position, .. } => {
                    self.counts.updated += 1;
                    let faces = self
                        .manager
                        .get_chunk(position)
                        .ok()
                        .flatten()
                        .and_then(|chunk| chunk.render_state())
                        .map_or(0, |mesh| mesh.face_count());
                    self.counts.faces_built += faces as u64;
                }
            }
        }
    }

    fn log_stats(&self) {
        let Ok(stats) = self.manager.stats() else {
            return;
        };

        log::info!(
            "t={:.1}s at {:?}: {} cached ({}), {} queued, {} in flight, events: {:?}",
            self.elapsed_s,
            self.pager.center(),
            stats.cached_chunks,
            ByteSize(stats.approximate_memory_usage_bytes as u64),
            stats.queued(),
            stats.in_flight(),
            self.counts
        );
    }

    pub fn shutdown(mut self) -> anyhow::Result<()> {
        self.drain_events();
        self.log_stats();
        self.pager.clear(&mut self.manager)?;
        self.manager.cleanup()?;
        log::info!("Runner stopped after {:.1}s", self.elapsed_s);
        Ok(())
    }
}

impl Simulation for EndlessRunner {
    #[profiling::function]
    fn update(&mut self, time: &LoopTime) -> anyhow::Result<()> {
        self.elapsed_s = time.elapsed_time_s;
        self.location.z -= self.config.run_speed * time.delta_time_s as f32;

        self.pager.update(self.location, &mut self.manager)?;
        self.manager.update()?;
        self.drain_events();

        if self.elapsed_s - self.last_stats_s >= self.config.stats_interval_s {
            self.last_stats_s = self.elapsed_s;
            self.log_stats();
        }

        Ok(())
    }

    fn should_exit(&self) -> bool {
        self.config.duration_s > 0.0 && self.elapsed_s >= self.config.duration_s
    }
}

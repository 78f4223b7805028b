pub mod chunk_cache;
pub mod chunk_job_queue;
pub mod chunk_manager;
pub mod chunk_pager;
pub mod chunk_worker_pool;
pub mod config;
pub mod error;
pub mod mesh_generation;
pub mod persistence;
pub mod voxels;
pub mod world_stats;
pub mod worldgen;

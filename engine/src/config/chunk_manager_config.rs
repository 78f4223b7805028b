use serde::{Deserialize, Serialize};

use crate::{
    chunk_cache::EvictionPolicy,
    config::{config_manager::Config, world_config::WorldConfig},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChunkManagerConfig {
    pub world: WorldConfig,
    /// Maximum number of cached chunks, 0 means unbounded
    pub cache_size: usize,
    /// Time between cache maintenance runs, 0 disables maintenance
    pub cache_maintenance_interval_ms: u64,
    pub eviction_policy: EvictionPolicy,
    pub repository_pool_size: usize,
    pub generator_pool_size: usize,
    pub mesh_pool_size: usize,
    /// Rebuild the meshes of cached neighbours when a chunk finishes meshing,
    /// so that faces hidden by the new chunk get culled
    pub trigger_adjacent_chunk_updates: bool,
}

impl Default for ChunkManagerConfig {
    fn default() -> Self {
        ChunkManagerConfig {
            world: WorldConfig::default(),
            cache_size: 0,
            cache_maintenance_interval_ms: 1000,
            eviction_policy: EvictionPolicy::default(),
            repository_pool_size: 1,
            generator_pool_size: 1,
            mesh_pool_size: 1,
            trigger_adjacent_chunk_updates: false,
        }
    }
}

impl Config for ChunkManagerConfig {
    fn get_path() -> &'static str {
        "chunk_manager.ron"
    }

    fn is_valid(&self) -> bool {
        self.world.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ChunkManagerConfig =
            ron::from_str("(cache_size: 64, trigger_adjacent_chunk_updates: true)").unwrap();

        assert_eq!(config.cache_size, 64);
        assert!(config.trigger_adjacent_chunk_updates);
        assert_eq!(config.cache_maintenance_interval_ms, 1000);
        assert_eq!(config.eviction_policy, EvictionPolicy::LeastRecentlyUsed);
        assert_eq!(config.world, WorldConfig::default());
    }

    #[test]
    fn test_invalid_world_is_rejected() {
        let mut config = ChunkManagerConfig::default();
        assert!(config.is_valid());

        config.world.block_scale = 0.0;
        assert!(!config.is_valid());

        config.world.block_scale = 0.5;
        config.world.chunk_size.y = 0;
        assert!(!config.is_valid());
    }
}

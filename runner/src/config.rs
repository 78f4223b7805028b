use engine::config::{chunk_manager_config::ChunkManagerConfig, config_manager::Config};
use glam::{UVec3, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    pub chunk_manager: ChunkManagerConfig,
    /// Chunks paged in around the runner, per axis
    pub grid_size: (u32, u32, u32),
    pub start_location: (f32, f32, f32),
    /// World units per second along -Z
    pub run_speed: f32,
    /// How long to run before exiting, 0 runs forever
    pub duration_s: f64,
    pub updates_per_s: u32,
    pub seed: u32,
    /// Chunk columns stored ahead of time around the origin, per axis
    pub pregenerate_size: i32,
    pub pregenerate_height: i32,
    pub stats_interval_s: f64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            chunk_manager: ChunkManagerConfig {
                cache_size: 512,
                generator_pool_size: 2,
                mesh_pool_size: 2,
                trigger_adjacent_chunk_updates: true,
                ..Default::default()
            },
            grid_size: (9, 5, 9),
            start_location: (0.0, 0.0, 0.0),
            run_speed: 10.0,
            duration_s: 30.0,
            updates_per_s: 60,
            seed: 4,
            pregenerate_size: 5,
            pregenerate_height: 2,
            stats_interval_s: 2.0,
        }
    }
}

impl Config for RunnerConfig {
    fn get_path() -> &'static str {
        "runner.ron"
    }

    fn is_valid(&self) -> bool {
        let (x, y, z) = self.grid_size;
        self.chunk_manager.is_valid()
            && x > 0
            && y > 0
            && z > 0
            && self.run_speed.is_finite()
            && self.duration_s >= 0.0
            && self.updates_per_s > 0
            && self.stats_interval_s > 0.0
    }
}

impl RunnerConfig {
    pub fn grid_size(&self) -> UVec3 {
        UVec3::from(self.grid_size)
    }

    pub fn start_location(&self) -> Vec3 {
        Vec3::from(self.start_location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RunnerConfig::default().is_valid());
    }

    #[test]
    fn test_partial_config() {
        let config: RunnerConfig =
            ron::from_str("(grid_size: (3, 1, 3), chunk_manager: (cache_size: 8))").unwrap();

        assert_eq!(config.grid_size(), UVec3::new(3, 1, 3));
        assert_eq!(config.chunk_manager.cache_size, 8);
        assert_eq!(config.run_speed, RunnerConfig::default().run_speed);
    }

    #[test]
    fn test_empty_grid_is_invalid() {
        let config = RunnerConfig {
            grid_size: (9, 0, 9),
            ..Default::default()
        };
        assert!(!config.is_valid());
    }
}

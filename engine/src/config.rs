pub mod chunk_manager_config;
pub mod config_manager;
pub mod world_config;

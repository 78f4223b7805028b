pub mod chunk_mesh_builder;
pub mod culled_mesh_builder;

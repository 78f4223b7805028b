pub mod block;
pub mod chunk;
pub mod chunk_data;
pub mod coord;
pub mod face;
pub mod location;

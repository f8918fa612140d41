pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod publish;
pub mod render;
pub mod summary;

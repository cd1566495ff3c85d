pub mod config;
pub mod engine;
pub mod error;
pub mod media;
pub mod net;
pub mod render;
pub mod taxonomy;

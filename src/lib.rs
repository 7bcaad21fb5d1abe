pub mod analyzers;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod render;
pub mod server;

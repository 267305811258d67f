pub mod config;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod schema;
pub mod selection;
pub mod server;

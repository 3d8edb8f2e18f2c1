//! Mirror Cache - a write-through key-value cache
//!
//! Writes go to a persistent store; reads are served from an in-process
//! mirror while entries are live and fall back to the store on a miss.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use api::AppState;
pub use config::Config;
pub use service::KeyValueCache;

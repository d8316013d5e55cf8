pub mod config;
pub mod distributions;
pub mod driver;
pub mod error;
pub mod event;
pub mod event_scheduler;
pub mod pool;
pub mod stats;
pub mod types;
pub mod vehicle;

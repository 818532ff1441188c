pub mod analyzer;
pub mod api;
pub mod config;
pub mod explorer;
pub mod fetch_stats;
pub mod models;
pub mod sampler;
pub mod time_fmt;
pub mod tracker;

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod map;
pub mod persistence;
pub mod render;
pub mod store;
pub mod types;
pub mod utils;
pub mod validate;
pub mod view;

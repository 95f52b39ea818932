pub mod config;
pub mod index;
pub mod lookup;
pub mod models;

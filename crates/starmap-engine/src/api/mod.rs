pub mod config;
pub mod fetch;
pub mod types;
pub mod view;

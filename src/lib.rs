pub mod api;
pub mod config;
pub mod entry;
pub mod mention;
pub mod observability;
pub mod store;
pub mod timecodec;

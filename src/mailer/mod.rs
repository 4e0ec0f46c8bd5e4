pub mod api_model;
pub mod client;
pub mod config;
pub mod error;
pub mod feedback;
pub mod transport;

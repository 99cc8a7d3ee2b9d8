pub mod config;
pub mod drill;
pub mod gesture;
pub mod logging;
pub mod render;
pub mod session;

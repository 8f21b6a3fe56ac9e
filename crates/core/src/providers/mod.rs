pub mod registry;
pub mod traits;

// API provider implementations
pub mod backend;
pub mod metals_dev;

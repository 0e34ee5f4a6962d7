/*
[INPUT]:  Public API exports for nakarobo-cli crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod cli;
pub mod config;
pub mod datetime;
pub mod format;
pub mod state;
pub mod validation;

// Re-export main types for convenience
pub use cli::AppContext;
pub use config::AppConfig;

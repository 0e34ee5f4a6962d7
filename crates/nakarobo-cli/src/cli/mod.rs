/*
[INPUT]:  Parsed CLI subcommands
[OUTPUT]: Command implementations
[POS]:    CLI layer
[UPDATE]: When adding or removing commands
*/

pub mod context;
pub mod dashboard;
pub mod init;
pub mod quests;
pub mod render;
pub mod session;
pub mod social;

pub use context::AppContext;

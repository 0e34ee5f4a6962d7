/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod auth;
pub mod client;
pub mod envelope;
pub mod error;
pub mod network;
pub mod node;
pub mod points;
pub mod quests;
pub mod referral;
pub mod user;
pub mod yappers;

pub use error::{NakaroboError, Result};
pub use envelope::Envelope;

pub use client::{ClientConfig, DEFAULT_API_BASE_URL, NakaroboClient};

//! Data models and configuration.

pub mod card;
pub mod config;

pub use card::{CardRecord, CardSide};
pub use config::CinConfig;

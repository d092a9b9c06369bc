// src/models/mod.rs

//! Domain models for the leaderboard job.

mod config;
mod identity;
pub(crate) mod numeric;
mod profile;
mod webhook;

// Re-export all public types
pub use config::{
    API_KEY_ENV, ApiConfig, CacheConfig, Config, HttpConfig, WEBHOOK_URL_ENV, WebhookConfig,
};
pub use identity::Identity;
pub use profile::{Profile, Solve, SolveKey};
pub use webhook::{Embed, EmbedAuthor, EmbedFooter, EmbedImage, WebhookMessage};

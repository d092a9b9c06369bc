//! Remote services: the challenge API and the webhook.

pub mod rootme;
pub mod webhook;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Profile, WebhookMessage};

pub use rootme::RootMeClient;
pub use webhook::{DryRunPublisher, WebhookPublisher};

/// Source of user profiles.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Resolve a display name to an account id.
    async fn lookup_id(&self, name: &str) -> Result<u64>;

    /// Fetch the current profile for an account id.
    async fn fetch_profile(&self, id: u64) -> Result<Profile>;
}

/// Destination for leaderboard and notification messages.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Post a new message, returning its id.
    async fn create_message(&self, message: &WebhookMessage) -> Result<String>;

    /// Replace the content of an existing message.
    async fn edit_message(&self, message_id: &str, message: &WebhookMessage) -> Result<()>;

    /// Post into the notification thread.
    ///
    /// Returns `None` without sending anything when no thread is configured.
    async fn post_to_thread(&self, message: &WebhookMessage) -> Result<Option<String>>;
}

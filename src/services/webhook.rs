// src/services/webhook.rs

//! Discord webhook publisher.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{WebhookConfig, WebhookMessage};
use crate::services::Publisher;
use crate::utils::http::read_body;

/// Subset of the message object returned with `?wait=true`.
#[derive(Debug, Deserialize)]
struct MessageReply {
    #[serde(default)]
    id: Option<serde_json::Value>,
}

impl MessageReply {
    fn id(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Publishes messages through a webhook execute URL.
#[derive(Debug, Clone)]
pub struct WebhookPublisher {
    client: Client,
    url: Url,
    thread_id: Option<String>,
}

impl WebhookPublisher {
    pub fn new(client: Client, config: &WebhookConfig) -> Result<Self> {
        Ok(Self {
            client,
            url: Url::parse(&config.url)?,
            thread_id: config.thread().map(String::from),
        })
    }

    /// `{webhook}/messages/{id}`
    fn message_url(&self, message_id: &str) -> Result<Url> {
        let mut url = self.url.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| AppError::config("webhook.url cannot be a base"))?
            .pop_if_empty()
            .push("messages")
            .push(message_id);
        Ok(url)
    }

    /// `{webhook}?wait=true[&thread_id=...]`
    fn execute_url(&self, thread_id: Option<&str>) -> Url {
        let mut url = self.url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("wait", "true");
            if let Some(thread) = thread_id {
                query.append_pair("thread_id", thread);
            }
        }
        url
    }

    /// Send a message and return the id echoed back by the webhook.
    async fn send(&self, method: Method, url: Url, message: &WebhookMessage) -> Result<String> {
        log::debug!("{} {}", method, url);
        let response = self
            .client
            .request(method, url)
            .json(message)
            .send()
            .await?;
        let (status, body) = read_body(response).await?;

        serde_json::from_str::<MessageReply>(&body)
            .ok()
            .and_then(|reply| reply.id())
            .ok_or_else(|| AppError::post(format!("HTTP {status}: {body}")))
    }
}

#[async_trait]
impl Publisher for WebhookPublisher {
    async fn create_message(&self, message: &WebhookMessage) -> Result<String> {
        self.send(Method::POST, self.execute_url(None), message)
            .await
            .map_err(|e| match e {
                AppError::Post(msg) => {
                    AppError::post(format!("failed to send leaderboard update: {msg}"))
                }
                other => other,
            })
    }

    async fn edit_message(&self, message_id: &str, message: &WebhookMessage) -> Result<()> {
        let url = self.message_url(message_id)?;
        self.send(Method::PATCH, url, message)
            .await
            .map_err(|e| match e {
                AppError::Post(msg) => {
                    AppError::post(format!("failed to edit leaderboard {message_id}: {msg}"))
                }
                other => other,
            })?;
        Ok(())
    }

    async fn post_to_thread(&self, message: &WebhookMessage) -> Result<Option<String>> {
        let Some(thread) = self.thread_id.as_deref() else {
            log::debug!("No notification thread configured, skipping");
            return Ok(None);
        };
        let id = self
            .send(Method::POST, self.execute_url(Some(thread)), message)
            .await?;
        Ok(Some(id))
    }
}

/// Logs messages instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct DryRunPublisher {
    thread_id: Option<String>,
}

impl DryRunPublisher {
    pub fn new(config: &WebhookConfig) -> Self {
        Self {
            thread_id: config.thread().map(String::from),
        }
    }

    fn log_message(label: &str, message: &WebhookMessage) {
        for embed in &message.embeds {
            log::info!("[dry-run] {}: {}", label, embed.title);
            for line in embed.description.lines() {
                log::info!("    {}", line);
            }
        }
    }
}

#[async_trait]
impl Publisher for DryRunPublisher {
    async fn create_message(&self, message: &WebhookMessage) -> Result<String> {
        Self::log_message("create", message);
        Ok("dry-run".to_string())
    }

    async fn edit_message(&self, message_id: &str, message: &WebhookMessage) -> Result<()> {
        Self::log_message(&format!("edit {message_id}"), message);
        Ok(())
    }

    async fn post_to_thread(&self, message: &WebhookMessage) -> Result<Option<String>> {
        if self.thread_id.is_none() {
            return Ok(None);
        }
        Self::log_message("thread", message);
        Ok(Some("dry-run".to_string()))
    }
}

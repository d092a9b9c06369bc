// src/pipeline/run.rs

//! One fetch-compare-notify-persist cycle.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::models::{Config, Identity, Profile};
use crate::pipeline::diff::{NewSolves, calculate_diff};
use crate::pipeline::render::Renderer;
use crate::services::{ProfileSource, Publisher};
use crate::storage::{Cache, CacheStore};

/// How the leaderboard message was published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardPost {
    Created(String),
    Edited(String),
}

/// A new-solve notification produced during the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub name: String,
    pub new_solves: NewSolves,
    /// Id of the posted message; `None` when notifications are disabled
    pub message_id: Option<String>,
}

/// What happened during one cycle.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Profiles shown on the leaderboard, in processing order
    pub profiles: Vec<Profile>,
    /// Users shown from their cached snapshot after a failed fetch
    pub fallbacks: Vec<String>,
    /// Users left off the leaderboard entirely
    pub skipped: Vec<String>,
    pub notifications: Vec<Notification>,
    /// Number of cache entries replaced
    pub cache_updates: usize,
    pub leaderboard: Option<LeaderboardPost>,
}

/// Options for [`run_pipeline`].
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Write the cache back after a successful cycle
    pub persist: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { persist: true }
    }
}

/// Account id for an identity: configured, then cached, then remote lookup.
async fn resolve_id(
    identity: &Identity,
    cache: &Cache,
    source: &dyn ProfileSource,
) -> Result<u64> {
    if let Some(id) = identity.known_id {
        return Ok(id);
    }
    if let Some(cached) = cache.get(&identity.name) {
        return Ok(cached.id);
    }
    log::debug!("No cached id for {}, looking it up", identity.name);
    source.lookup_id(&identity.name).await
}

/// Run one cycle over `identities` against an in-memory cache.
///
/// Fetch failures fall back to the cached snapshot. Lookup failures and
/// webhook failures abort the cycle.
pub async fn run_cycle<R: Rng>(
    config: &Config,
    identities: &[Identity],
    cache: &mut Cache,
    source: &dyn ProfileSource,
    publisher: &dyn Publisher,
    rng: &mut R,
) -> Result<RunSummary> {
    let renderer = Renderer::new(&config.webhook, &config.api.site_url);
    let mut summary = RunSummary::default();

    for identity in identities {
        let id = resolve_id(identity, cache, source).await.inspect_err(|e| {
            log::error!("Failed to get user id from username {}: {}", identity.name, e);
        })?;

        let fetched = match source.fetch_profile(id).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                log::error!("Failed to fetch user data for id {}: {}", id, e);
                let cached = cache.get(&identity.name).cloned();
                if cached.is_some() {
                    summary.fallbacks.push(identity.name.clone());
                }
                cached
            }
        };

        let Some(mut current) = fetched else {
            log::warn!("No data for {}, leaving it off the leaderboard", identity.name);
            summary.skipped.push(identity.name.clone());
            continue;
        };
        current.url_slug = identity.slug().to_string();

        let diff = calculate_diff(cache.get(&identity.name), &current);

        if let Some(new_solves) = diff.new_solves {
            log::info!(
                "{}: {} new solves, {:+} pts",
                current.name,
                new_solves.solves.len(),
                new_solves.score_gained
            );
            let message_id = if config.webhook.thread().is_some() {
                let message = renderer.new_solves(&current, &new_solves, rng, Utc::now())?;
                publisher.post_to_thread(&message).await?
            } else {
                log::debug!("Notifications disabled, not posting for {}", current.name);
                None
            };
            summary.notifications.push(Notification {
                name: identity.name.clone(),
                new_solves,
                message_id,
            });
        }

        if diff.changed {
            cache.insert(identity.name.clone(), current.clone());
            summary.cache_updates += 1;
        }

        summary.profiles.push(current);
    }

    let message = renderer.leaderboard(&summary.profiles, Utc::now())?;
    let post = match cache.leaderboard_message_id().map(str::to_string) {
        Some(existing) => {
            publisher.edit_message(&existing, &message).await?;
            LeaderboardPost::Edited(existing)
        }
        None => {
            let id = publisher.create_message(&message).await?;
            cache.set_leaderboard_message_id(id.clone());
            LeaderboardPost::Created(id)
        }
    };
    summary.leaderboard = Some(post);

    Ok(summary)
}

/// Load the cache, run one cycle, and write the cache back.
///
/// The cache is only written when the whole cycle succeeded.
pub async fn run_pipeline(
    config: &Config,
    storage: &dyn CacheStore,
    source: &dyn ProfileSource,
    publisher: &dyn Publisher,
    options: RunOptions,
) -> Result<RunSummary> {
    let identities = config.identities()?;
    let mut cache = storage.load().await?;
    log::info!(
        "Tracking {} users ({} cached)",
        identities.len(),
        cache.len()
    );

    let mut rng = StdRng::from_entropy();
    let summary = run_cycle(config, &identities, &mut cache, source, publisher, &mut rng).await?;

    if options.persist {
        storage.save(&cache).await?;
    } else {
        log::info!("Cache left untouched at {}", storage.location());
    }

    log::info!(
        "Run complete: {} on leaderboard, {} notifications, {} cache updates",
        summary.profiles.len(),
        summary.notifications.len(),
        summary.cache_updates
    );
    if !summary.fallbacks.is_empty() {
        log::warn!("Served from cache: {}", summary.fallbacks.join(", "));
    }
    if !summary.skipped.is_empty() {
        log::warn!("Skipped: {}", summary.skipped.join(", "));
    }

    Ok(summary)
}

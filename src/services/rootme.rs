// src/services/rootme.rs

//! Root-Me API client.
//!
//! Both endpoints answer with either an error descriptor or a record; the
//! raw payloads are decoded into tagged variants here so the rest of the
//! crate only ever sees a `Profile` or an `AppError`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::COOKIE;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, Profile, numeric};
use crate::services::ProfileSource;
use crate::utils::http::read_body;

/// `{"error": {"code": 404, "message": "..."}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default, deserialize_with = "numeric::optional")]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

impl ApiError {
    fn is_not_found(&self) -> bool {
        self.code == Some(404)
    }

    fn describe(&self) -> String {
        match self.code {
            Some(code) => format!("{} (code {})", self.message, code),
            None => self.message.clone(),
        }
    }
}

/// First element of a lookup-by-name response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LookupReply {
    Error(ErrorEnvelope),
    Candidates(BTreeMap<String, Candidate>),
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    #[serde(deserialize_with = "numeric::required")]
    id_auteur: u64,
    nom: String,
}

/// Fetch-by-id response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FetchReply {
    Errors(Vec<ErrorEnvelope>),
    Error(ErrorEnvelope),
    Profile(Box<Profile>),
}

/// Client for the Root-Me `auteurs` endpoints.
#[derive(Debug, Clone)]
pub struct RootMeClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl RootMeClient {
    pub fn new(client: Client, api: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(&api.base_url)?,
            api_key: api.key.clone(),
        })
    }

    /// Build `{base}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::config(format!("api.base_url cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(COOKIE, format!("api_key={}", self.api_key))
            .send()
            .await?;
        let (status, body) = read_body(response).await?;

        // Error descriptors come with non-2xx statuses, so decode before checking.
        serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                AppError::Json(e)
            } else {
                AppError::remote(format!("HTTP {status}: {body}"))
            }
        })
    }
}

/// Pick the account matching `name` among lookup candidates.
fn select_candidate(name: &str, candidates: Vec<Candidate>) -> Result<u64> {
    match candidates.len() {
        0 => Err(AppError::NotFound(name.to_string())),
        1 => Ok(candidates[0].id_auteur),
        _ => {
            let exact: Vec<&Candidate> = candidates.iter().filter(|c| c.nom == name).collect();
            match exact.as_slice() {
                [] => Err(AppError::NotFound(name.to_string())),
                [only] => Ok(only.id_auteur),
                many => {
                    log::error!(
                        "Ambiguous user {}: ids {:?}",
                        name,
                        many.iter().map(|c| c.id_auteur).collect::<Vec<_>>()
                    );
                    Err(AppError::AmbiguousUser {
                        name: name.to_string(),
                        count: many.len(),
                    })
                }
            }
        }
    }
}

#[async_trait]
impl ProfileSource for RootMeClient {
    async fn lookup_id(&self, name: &str) -> Result<u64> {
        let mut url = self.endpoint(&["auteurs"])?;
        url.query_pairs_mut().append_pair("nom", name);

        // Only the first element carries results; pagination links follow it.
        let replies: Vec<serde_json::Value> = self.get_json(url).await?;
        let first = replies
            .into_iter()
            .next()
            .map(serde_json::from_value::<LookupReply>)
            .transpose()?;
        match first {
            None => Err(AppError::NotFound(name.to_string())),
            Some(LookupReply::Error(envelope)) if envelope.error.is_not_found() => {
                Err(AppError::NotFound(name.to_string()))
            }
            Some(LookupReply::Error(envelope)) => Err(AppError::remote(envelope.error.describe())),
            Some(LookupReply::Candidates(map)) => {
                select_candidate(name, map.into_values().collect())
            }
        }
    }

    async fn fetch_profile(&self, id: u64) -> Result<Profile> {
        let url = self.endpoint(&["auteurs", &id.to_string()])?;

        match self.get_json::<FetchReply>(url).await? {
            FetchReply::Profile(profile) => Ok(*profile),
            FetchReply::Error(envelope) => Err(AppError::remote(envelope.error.describe())),
            FetchReply::Errors(envelopes) => Err(AppError::remote(
                envelopes
                    .first()
                    .map(|e| e.error.describe())
                    .unwrap_or_else(|| format!("empty response for user {id}")),
            )),
        }
    }
}

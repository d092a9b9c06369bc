//! User profile and solve records.
//!
//! Field names follow the Root-Me API so that the cache file stays
//! readable by anything else consuming the same payloads.

use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::models::numeric;

/// Date layout used by the Root-Me API for validations.
const SOLVE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One user's current standing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Stable numeric account id
    #[serde(rename = "id_auteur", deserialize_with = "numeric::required")]
    pub id: u64,

    /// Display name
    #[serde(rename = "nom")]
    pub name: String,

    /// Total score
    #[serde(deserialize_with = "numeric::required")]
    pub score: i64,

    /// Global rank, when the API reports one
    #[serde(
        default,
        deserialize_with = "numeric::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<i64>,

    /// Avatar path relative to the site root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,

    /// Slug used to build the public profile link
    #[serde(rename = "url_name", default)]
    pub url_slug: String,

    /// Solved challenges, in API order
    #[serde(default)]
    pub validations: Vec<Solve>,
}

impl Profile {
    /// Number of solved challenges.
    pub fn solve_count(&self) -> usize {
        self.validations.len()
    }

    /// Unix timestamp of the most recent solve, if any date parses.
    pub fn last_solve_timestamp(&self) -> Option<i64> {
        self.validations
            .iter()
            .filter_map(Solve::timestamp)
            .max()
    }

    /// Whether the name or score differ from `other`.
    pub fn differs_from(&self, other: &Profile) -> bool {
        self.name != other.name || self.score != other.score
    }

    /// Solves present here but not in `previous`, keyed by challenge and category.
    pub fn solves_since(&self, previous: &Profile) -> Vec<Solve> {
        let known: HashSet<SolveKey> = previous.validations.iter().map(Solve::key).collect();
        self.validations
            .iter()
            .filter(|s| !known.contains(&s.key()))
            .cloned()
            .collect()
    }
}

/// Identity of a solve within one profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SolveKey {
    pub challenge_id: u64,
    pub category_id: u64,
}

/// A solved challenge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Solve {
    #[serde(rename = "id_challenge", deserialize_with = "numeric::required")]
    pub challenge_id: u64,

    #[serde(rename = "id_rubrique", deserialize_with = "numeric::required")]
    pub category_id: u64,

    #[serde(rename = "titre")]
    pub title: String,

    /// Raw solve date as reported by the API
    #[serde(rename = "date")]
    pub date: String,
}

impl Solve {
    pub fn key(&self) -> SolveKey {
        SolveKey {
            challenge_id: self.challenge_id,
            category_id: self.category_id,
        }
    }

    /// Unix timestamp of the solve.
    ///
    /// The API reports naive local dates; RFC 3339 is accepted too.
    pub fn timestamp(&self) -> Option<i64> {
        let raw = self.date.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.timestamp());
        }
        let naive = NaiveDateTime::parse_from_str(raw, SOLVE_DATE_FORMAT).ok()?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.timestamp())
    }
}

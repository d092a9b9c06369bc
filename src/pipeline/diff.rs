//! Snapshot diff for new-solve notifications.
//!
//! A profile counts as changed when its name or score moved. Only a change
//! against an existing snapshot produces a notification; the first sighting
//! of a user just seeds the cache.

use crate::models::{Profile, Solve};

/// Solves gained since the previous snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSolves {
    pub solves: Vec<Solve>,
    /// `current.score - previous.score`, possibly negative
    pub score_gained: i64,
}

/// Outcome of comparing a fresh profile with its cached snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileDiff {
    /// The cache entry must be replaced
    pub changed: bool,
    /// Notification to send, if any
    pub new_solves: Option<NewSolves>,
}

/// Compare `current` against the cached `previous` snapshot.
pub fn calculate_diff(previous: Option<&Profile>, current: &Profile) -> ProfileDiff {
    let Some(previous) = previous else {
        return ProfileDiff {
            changed: true,
            new_solves: None,
        };
    };

    if !current.differs_from(previous) {
        return ProfileDiff::default();
    }

    ProfileDiff {
        changed: true,
        new_solves: Some(NewSolves {
            solves: current.solves_since(previous),
            score_gained: current.score - previous.score,
        }),
    }
}

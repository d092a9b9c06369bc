//! Tracked user identities.

use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, Result};

/// A configured user to track.
///
/// Written in config as `name`, `name:id` or `name:id:slug`. An empty id
/// segment (`name::slug`) means "look the id up".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub known_id: Option<u64>,
    pub url_slug: Option<String>,
}

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            known_id: None,
            url_slug: None,
        }
    }

    /// Slug for the profile link, falling back to the display name.
    pub fn slug(&self) -> &str {
        self.url_slug.as_deref().unwrap_or(&self.name)
    }
}

impl FromStr for Identity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let name = parts.next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(AppError::validation(format!("empty user name in {s:?}")));
        }

        let known_id = match parts.next().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<u64>().map_err(|e| {
                AppError::validation(format!("invalid user id {raw:?} for {name}: {e}"))
            })?),
        };

        let url_slug = parts
            .next()
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
            .map(String::from);

        let mut identity = Self::new(name);
        identity.known_id = known_id;
        identity.url_slug = url_slug;
        Ok(identity)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(id) = self.known_id {
            write!(f, " (#{id})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_only() {
        let id: Identity = "alice".parse().unwrap();
        assert_eq!(id, Identity::new("alice"));
        assert_eq!(id.slug(), "alice");
    }

    #[test]
    fn test_parse_full() {
        let id: Identity = "Bob Smith:123:bob-smith".parse().unwrap();
        assert_eq!(id.name, "Bob Smith");
        assert_eq!(id.known_id, Some(123));
        assert_eq!(id.slug(), "bob-smith");
    }

    #[test]
    fn test_parse_slug_without_id() {
        let id: Identity = "carol::carol-x".parse().unwrap();
        assert_eq!(id.known_id, None);
        assert_eq!(id.slug(), "carol-x");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("".parse::<Identity>().is_err());
        assert!(":12".parse::<Identity>().is_err());
        assert!("dave:abc".parse::<Identity>().is_err());
    }
}

//! Utility functions and helpers.

pub mod http;

use url::Url;

use crate::error::Result;

/// Public profile link for a user slug, with the slug percent-encoded.
pub fn profile_url(site_url: &str, slug: &str) -> Result<String> {
    let mut url = Url::parse(site_url)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .push(slug);
    Ok(url.to_string())
}

/// Resolve a site-relative path (avatars) against the site root.
pub fn resolve(site_url: &str, href: &str) -> Option<String> {
    let mut base = Url::parse(site_url).ok()?;
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }
    base.join(href).ok().map(|u| u.to_string())
}

/// Discord relative timestamp markup.
pub fn relative_time(unix: i64) -> String {
    format!("<t:{unix}:R>")
}

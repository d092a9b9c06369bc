//! Message rendering for the leaderboard and new-solve notifications.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::Result;
use crate::models::{
    Embed, EmbedAuthor, EmbedFooter, EmbedImage, Profile, WebhookConfig, WebhookMessage,
};
use crate::pipeline::diff::NewSolves;
use crate::utils::{profile_url, relative_time, resolve};

/// Markers for the first three ranks.
const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

const EMOTES: [&str; 7] = ["🎉", "🔥", "💪", "✨", "😎", "🏆", "🧠"];

const KAOMOJIS: [&str; 6] = [
    "◝(ᵔᗜᵔ)◜",
    "٩(^ᗜ^ )و ´-",
    "ᐠ( ᐛ )ᐟ",
    "( ◡̀_◡́)ᕤ",
    "ദ്ദി(ᵔᗜᵔ)",
    "(•̀ᴗ•́ )و",
];

/// Discord caps embed descriptions at this many characters.
const DESCRIPTION_LIMIT: usize = 4096;

/// Profiles ordered by descending score; ties keep their input order.
pub fn rank_profiles(profiles: &[Profile]) -> Vec<&Profile> {
    let mut ranked: Vec<&Profile> = profiles.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// Marker for a zero-based rank.
fn rank_marker(index: usize) -> String {
    MEDALS
        .get(index)
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("{}.", index + 1))
}

/// Keep whole lines while the text fits in `limit` characters.
fn fit_description(text: String, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text;
    }
    let mut out = String::new();
    let mut used = 0;
    for line in text.lines() {
        let cost = line.chars().count() + 1;
        if used + cost + 1 > limit {
            break;
        }
        out.push_str(line);
        out.push('\n');
        used += cost;
    }
    out.push('…');
    out
}

/// Builds webhook messages from profiles.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    webhook: &'a WebhookConfig,
    site_url: &'a str,
}

impl<'a> Renderer<'a> {
    pub fn new(webhook: &'a WebhookConfig, site_url: &'a str) -> Self {
        Self { webhook, site_url }
    }

    /// One line per profile, best score first.
    pub fn leaderboard_description(&self, profiles: &[Profile]) -> Result<String> {
        if profiles.is_empty() {
            return Ok("No tracked users yet.".to_string());
        }

        let mut lines = Vec::with_capacity(profiles.len());
        for (index, profile) in rank_profiles(profiles).into_iter().enumerate() {
            let link = profile_url(self.site_url, &profile.url_slug)?;
            let mut line = format!(
                "**{}** [{}]({}) - `{}`pts - `{}` solves",
                rank_marker(index),
                profile.name,
                link,
                profile.score,
                profile.solve_count()
            );
            if let Some(last) = profile.last_solve_timestamp() {
                line.push_str(&format!(" - Last solve: {}", relative_time(last)));
            }
            lines.push(line);
        }
        Ok(fit_description(lines.join("\n"), DESCRIPTION_LIMIT))
    }

    pub fn leaderboard(&self, profiles: &[Profile], now: DateTime<Utc>) -> Result<WebhookMessage> {
        let image = Some(self.webhook.image_url.trim())
            .filter(|u| !u.is_empty())
            .map(|u| EmbedImage { url: u.to_string() });

        Ok(self.wrap(Embed {
            author: None,
            title: self.webhook.title.clone(),
            url: Some(self.site_url.to_string()),
            description: self.leaderboard_description(profiles)?,
            image,
            color: self.webhook.color,
            footer: EmbedFooter {
                text: self.webhook.footer.clone(),
            },
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }))
    }

    /// Notification listing every new solve of one user.
    pub fn new_solves<R: Rng>(
        &self,
        profile: &Profile,
        new: &NewSolves,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<WebhookMessage> {
        let mut lines = vec![format!("**Score gained**: `{}`pts", new.score_gained)];
        if let Some(position) = profile.position {
            lines.push(format!("**New rank**: `#{position}`"));
        }
        for solve in &new.solves {
            match solve.timestamp() {
                Some(ts) => lines.push(format!("✦ `{}` - {}", solve.title, relative_time(ts))),
                None => lines.push(format!("✦ `{}`", solve.title)),
            }
        }

        let emote = EMOTES.choose(rng).copied().unwrap_or("🎉");
        let kaomoji = KAOMOJIS.choose(rng).copied().unwrap_or_default();
        let what = if new.solves.len() == 1 {
            "a new challenge"
        } else {
            "new challenges"
        };

        let link = profile_url(self.site_url, &profile.url_slug)?;
        let icon_url = profile
            .logo_url
            .as_deref()
            .and_then(|logo| resolve(self.site_url, logo))
            .unwrap_or_else(|| self.webhook.avatar_url.clone());

        Ok(self.wrap(Embed {
            author: Some(EmbedAuthor {
                name: profile.name.clone(),
                icon_url,
                url: link,
            }),
            title: format!("\\{} {} just solved {}! {}", emote, profile.name, what, kaomoji),
            url: None,
            description: fit_description(lines.join("\n"), DESCRIPTION_LIMIT),
            image: None,
            color: rng.gen_range(0..0xFF_FFFF),
            footer: EmbedFooter {
                text: self.webhook.footer.clone(),
            },
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }))
    }

    fn wrap(&self, embed: Embed) -> WebhookMessage {
        WebhookMessage {
            username: self.webhook.username.clone(),
            avatar_url: self.webhook.avatar_url.clone(),
            embeds: vec![embed],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Solve;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const SITE: &str = "https://www.root-me.org";

    fn solve(id: u64, title: &str, date: &str) -> Solve {
        Solve {
            challenge_id: id,
            category_id: 1,
            title: title.into(),
            date: date.into(),
        }
    }

    fn profile(name: &str, score: i64, validations: Vec<Solve>) -> Profile {
        Profile {
            id: 1,
            name: name.into(),
            score,
            position: None,
            logo_url: None,
            url_slug: name.into(),
            validations,
        }
    }

    #[test]
    fn test_rank_is_descending_and_stable() {
        let profiles = vec![
            profile("a", 10, vec![]),
            profile("b", 30, vec![]),
            profile("c", 10, vec![]),
            profile("d", 20, vec![]),
        ];
        let names: Vec<&str> = rank_profiles(&profiles)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_rank_markers() {
        assert_eq!(rank_marker(0), "🥇");
        assert_eq!(rank_marker(2), "🥉");
        assert_eq!(rank_marker(3), "4.");
    }

    #[test]
    fn test_leaderboard_lines() {
        let webhook = WebhookConfig::default();
        let renderer = Renderer::new(&webhook, SITE);
        let mut bob = profile("bob", 50, vec![]);
        bob.url_slug = "Bob Smith".into();
        let profiles = vec![
            bob,
            profile(
                "alice",
                100,
                vec![
                    solve(1, "X", "2024-01-01T00:00:00Z"),
                    solve(2, "Y", "2024-06-01T00:00:00Z"),
                ],
            ),
        ];

        let description = renderer.leaderboard_description(&profiles).unwrap();
        let lines: Vec<&str> = description.lines().collect();
        assert_eq!(
            lines[0],
            "**🥇** [alice](https://www.root-me.org/alice) - `100`pts - `2` solves - Last solve: <t:1717200000:R>"
        );
        assert_eq!(
            lines[1],
            "**🥈** [bob](https://www.root-me.org/Bob%20Smith) - `50`pts - `0` solves"
        );
    }

    #[test]
    fn test_leaderboard_message_shape() {
        let webhook = WebhookConfig::default();
        let renderer = Renderer::new(&webhook, SITE);
        let now = DateTime::parse_from_rfc3339("2025-01-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let msg = renderer.leaderboard(&[profile("a", 1, vec![])], now).unwrap();
        assert_eq!(msg.username, webhook.username);
        let embed = &msg.embeds[0];
        assert_eq!(embed.title, webhook.title);
        assert_eq!(embed.color, 45300);
        assert_eq!(embed.timestamp, "2025-01-01T12:00:00.000Z");
        assert!(embed.image.is_some());
        assert!(embed.author.is_none());
    }

    #[test]
    fn test_empty_leaderboard_has_placeholder() {
        let webhook = WebhookConfig::default();
        let renderer = Renderer::new(&webhook, SITE);
        assert_eq!(
            renderer.leaderboard_description(&[]).unwrap(),
            "No tracked users yet."
        );
    }

    #[test]
    fn test_long_description_is_cut_on_line_boundary() {
        let text = (0..1000).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let cut = fit_description(text, 100);
        assert!(cut.chars().count() <= 100);
        assert!(cut.ends_with('…'));
        assert!(cut.starts_with("line 0\nline 1\n"));
    }

    #[test]
    fn test_new_solves_message() {
        let webhook = WebhookConfig::default();
        let renderer = Renderer::new(&webhook, SITE);
        let mut alice = profile("alice", 150, vec![]);
        alice.position = Some(321);
        alice.logo_url = Some("IMG/logo/auton42.png".into());
        let new = NewSolves {
            solves: vec![solve(2, "SQL injection", "2024-06-01T00:00:00Z")],
            score_gained: 50,
        };

        let mut rng = StdRng::seed_from_u64(7);
        let msg = renderer
            .new_solves(&alice, &new, &mut rng, Utc::now())
            .unwrap();
        let embed = &msg.embeds[0];

        assert_eq!(
            embed.description,
            "**Score gained**: `50`pts\n**New rank**: `#321`\n✦ `SQL injection` - <t:1717200000:R>"
        );
        assert!(embed.title.contains("alice just solved a new challenge!"));
        assert!(embed.title.starts_with('\\'));
        assert!(embed.color < 0xFF_FFFF);

        let author = embed.author.as_ref().unwrap();
        assert_eq!(author.icon_url, "https://www.root-me.org/IMG/logo/auton42.png");
        assert_eq!(author.url, "https://www.root-me.org/alice");
    }

    #[test]
    fn test_new_solves_plural_and_negative() {
        let webhook = WebhookConfig::default();
        let renderer = Renderer::new(&webhook, SITE);
        let new = NewSolves {
            solves: vec![],
            score_gained: -15,
        };

        let mut rng = StdRng::seed_from_u64(1);
        let msg = renderer
            .new_solves(&profile("bob", 5, vec![]), &new, &mut rng, Utc::now())
            .unwrap();
        let embed = &msg.embeds[0];
        assert_eq!(embed.description, "**Score gained**: `-15`pts");
        assert!(embed.title.contains("just solved new challenges!"));
        assert_eq!(embed.author.as_ref().unwrap().icon_url, webhook.avatar_url);
    }
}

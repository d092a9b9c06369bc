//! Pipeline entry points.
//!
//! - `diff`: decide whether a fresh profile warrants a notification
//! - `render`: build leaderboard and notification messages
//! - `run`: one fetch-compare-notify-persist cycle

pub mod diff;
pub mod render;
pub mod run;

pub use diff::{NewSolves, ProfileDiff, calculate_diff};
pub use render::{Renderer, rank_profiles};
pub use run::{LeaderboardPost, Notification, RunOptions, RunSummary, run_cycle, run_pipeline};

use std::time::Duration;

use chrono::{DateTime, Local};
use clap::Parser;

pub const FRONT_PAGE_URL: &str = "https://news.ycombinator.com";
pub const BOARD_TITLE: &str = "Hacker News";
pub const EXIT_HINT: &str = "Press ESC to exit";
pub const DEFAULT_ITEMS: usize = 10;
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Anchor text of the front page's pagination link. Matching entries are
/// dropped from the board but still consume a slot of the item cap.
pub const SENTINEL_LABEL: &str = "More";

#[derive(Debug, Parser, Clone)]
#[command(
    name = "hnwatch",
    version,
    about = "Live Hacker News front page in your terminal"
)]
pub struct Cli {
    #[arg(value_name = "URL", default_value = FRONT_PAGE_URL)]
    pub url: String,

    #[arg(long, value_name = "N", default_value_t = DEFAULT_ITEMS)]
    pub items: usize,

    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval: u64,

    #[arg(long, default_value_t = false)]
    pub no_tui: bool,
}

impl Cli {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.interval.max(1))
    }
}

/// One front page entry. Rebuilt in full on every refresh; the renderer only
/// reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub title: String,
    pub url: String,
    pub score: String,
}

/// A full extraction pass: the stories in document order plus the common
/// column width every rendered row is padded to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headlines {
    pub stories: Vec<Story>,
    pub column_width: usize,
}

/// Everything the draw pass reads. A failed refresh keeps the previous
/// headlines on screen and records the error for the status line.
#[derive(Default)]
pub struct BoardState {
    pub headlines: Headlines,
    pub refreshed_at: Option<DateTime<Local>>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    Exit,
    Refresh,
    Ignore,
}

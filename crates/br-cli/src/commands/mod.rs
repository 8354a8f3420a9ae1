pub mod check;
pub mod play;
pub mod reset;
pub mod stats;

use std::path::Path;
use std::sync::Arc;

use colored::{ColoredString, Colorize};

use br_core::{Band, ContentStore, Stat, StatDelta, StatVector};
use br_engine::{EndingConfig, EngineConfig, JsonFileStore, Leaderboard};

/// Load both content documents.
fn load_content(scenarios: &Path, endings: &Path) -> Result<Arc<ContentStore>, String> {
    ContentStore::load(scenarios, endings)
        .map(Arc::new)
        .map_err(|e| format!("failed to load content: {e}"))
}

/// Load a config file, or the defaults.
fn load_config(path: Option<&Path>) -> Result<EngineConfig, String> {
    match path {
        Some(path) => EngineConfig::load(path).map_err(|e| e.to_string()),
        None => Ok(EngineConfig::default()),
    }
}

/// Open a counter file, reporting unreadable files.
fn open_leaderboard(path: &Path) -> Result<Leaderboard, String> {
    let board = Leaderboard::with_store(JsonFileStore::new(path));
    board
        .try_refresh()
        .map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(board)
}

/// A stat value colored by its band.
fn paint(value: f64, band: Band) -> ColoredString {
    let text = format!("{value:.0}");
    match band {
        Band::Bad => text.red(),
        Band::Neutral => text.yellow(),
        Band::Good => text.green(),
    }
}

/// One-line stat summary colored by ending band.
fn format_stats(stats: &StatVector, endings: &EndingConfig) -> String {
    let parts: Vec<String> = Stat::TRACKED
        .iter()
        .chain(std::iter::once(&Stat::Aggregate))
        .map(|&stat| {
            let value = stats.get(stat);
            let name = if stat == Stat::Aggregate {
                "Overall".to_string()
            } else {
                stat.to_string()
            };
            format!("{name} {}", paint(value, endings.band(value)))
        })
        .collect();
    parts.join(" | ")
}

/// Signed per-stat change, skipping stats that did not move.
fn format_delta(delta: &StatDelta) -> String {
    let parts: Vec<String> = Stat::TRACKED
        .iter()
        .filter(|&&stat| delta.get(stat).abs() >= 0.05)
        .map(|&stat| {
            let d = delta.get(stat);
            let text = format!("{stat} {d:+.1}");
            if d < 0.0 {
                text.red().to_string()
            } else {
                text.green().to_string()
            }
        })
        .collect();
    if parts.is_empty() {
        "no change".dimmed().to_string()
    } else {
        parts.join(", ")
    }
}

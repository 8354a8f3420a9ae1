use std::path::Path;

use br_engine::AnswerKey;

pub fn run(leaderboard: &Path, key: &str) -> Result<(), String> {
    let key: AnswerKey = key.parse().map_err(|e| format!("{e}"))?;
    let board = super::open_leaderboard(leaderboard)?;

    let before = board.count(&key);
    board.reset(&key).map_err(|e| e.to_string())?;

    if before == 0 {
        println!("  {key} had no votes.");
    } else {
        println!("  Reset {key} (was {before}).");
    }
    Ok(())
}

use std::path::Path;

use comfy_table::{ContentArrangement, Table};

use br_core::SetupId;

pub fn run(leaderboard: &Path, setup: Option<u32>) -> Result<(), String> {
    let board = super::open_leaderboard(leaderboard)?;

    let rows: Vec<_> = board
        .snapshot()
        .into_iter()
        .filter(|(key, _)| setup.is_none_or(|id| key.setup == SetupId(id)))
        .collect();

    if rows.is_empty() {
        println!("  No answers recorded.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Answer", "Setup", "Option", "Count", "Share"]);

    for (key, count) in &rows {
        let percent = board.percent_chosen(key.setup, key);
        table.add_row(vec![
            key.to_string(),
            key.setup.to_string(),
            key.letter().to_string(),
            count.to_string(),
            format!("{percent}%"),
        ]);
    }

    println!("{table}");
    println!();
    let total: u64 = rows.iter().map(|(_, count)| count).sum();
    println!("  {} answers, {total} votes", rows.len());

    Ok(())
}

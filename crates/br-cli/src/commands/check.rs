use std::path::Path;

use br_engine::Session;

pub fn run(scenarios: &Path, endings: &Path, config: Option<&Path>) -> Result<(), String> {
    let content = super::load_content(scenarios, endings)?;
    let config = super::load_config(config)?;

    let set = content.scenarios();
    let choices: usize = set.iter().map(|s| s.options.len()).sum();
    let rare = config.sequencer.rare_setup;
    let max = config.sequencer.max_choices.min(set.len());

    // Starting a session runs every content-vs-config check.
    Session::start(content.clone(), config).map_err(|e| e.to_string())?;

    println!("  All checks passed.");
    println!("  {} setups, {choices} choices, {max} decisions per session", set.len());

    let stats: Vec<String> = content.endings().stats().map(|s| s.to_string()).collect();
    println!("  Endings for: {}", stats.join(", "));
    if content.endings().has_verdict() {
        println!("  Overall verdict: yes");
    }
    match rare {
        Some(id) if set.get(id).is_some() => println!("  Rare event setup: {id}"),
        Some(id) => println!("  Rare event setup {id} is not in the scenario set"),
        None => {}
    }

    Ok(())
}

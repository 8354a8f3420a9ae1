use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use colored::Colorize;
use tracing::debug;

use br_core::{Setup, SetupId};
use br_core::setup::{option_index, option_letter};
use br_engine::{
    AggregateMode, Decision, EngineError, JsonFileStore, Leaderboard, SelectionStrategy, Session,
    SessionEvent, crowd_message,
};

pub struct PlayArgs {
    pub scenarios: PathBuf,
    pub endings: PathBuf,
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
    pub random_order: bool,
    pub max_choices: Option<usize>,
    pub rare_setup: Option<u32>,
    pub independent_aggregate: bool,
    pub leaderboard: Option<PathBuf>,
    pub transcript: Option<PathBuf>,
}

/// Map "b", "B" or "2" to option index 1.
fn parse_answer(input: &str) -> Option<usize> {
    let mut chars = input.chars();
    let first = chars.next()?;
    if chars.next().is_none() && first.is_ascii_alphabetic() {
        return option_index(first);
    }
    match input.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n - 1),
        _ => None,
    }
}

fn print_setup(setup: &Setup, number: usize, total: usize, seconds: f64) {
    let title = if setup.name.is_empty() {
        format!("Decision {number}/{total}")
    } else {
        format!("Decision {number}/{total}: {}", setup.name)
    };
    println!("  {}", title.bold());
    if !setup.character_id.is_empty() {
        println!("  {}", setup.character_id.cyan());
    }
    println!("  {}\n", setup.prompt);
    for (i, choice) in setup.options.iter().enumerate() {
        let letter = option_letter(i).unwrap_or('?');
        println!("    {}) {}", letter.to_string().bold(), choice.label);
    }
    println!("\n  {}", format!("{seconds:.0}s on the clock").dimmed());
}

fn print_decision(decision: &Decision, session: &Session) {
    let endings = &session.config().endings;
    if decision.answer_key.is_none() {
        println!("  {}", "Time ran out!".red().bold());
    } else if !decision.result_text.is_empty() {
        println!("  {}", decision.result_text);
    }
    println!(
        "  {} ({})",
        super::format_delta(&decision.resolution.applied),
        decision.emotion
    );
    if let Some(percent) = decision.crowd_percent {
        println!("  {}", crowd_message(percent).italic());
    }
    println!("  {}\n", super::format_stats(&decision.resolution.stats, endings));
}

fn read_line(reader: &mut impl BufRead, line: &mut String) -> Result<bool, String> {
    print!("> ");
    io::stdout().flush().map_err(|e| e.to_string())?;
    line.clear();
    let read = reader.read_line(line).map_err(|e| e.to_string())?;
    Ok(read > 0)
}

enum Turn {
    Decided(Decision),
    Quit,
}

/// Ask until the current setup is answered or times out.
fn take_turn(session: &mut Session, reader: &mut impl BufRead) -> Result<Turn, String> {
    let mut line = String::new();
    let mut clock = Instant::now();
    loop {
        if !read_line(reader, &mut line)? {
            return Ok(Turn::Quit);
        }

        let waited = clock.elapsed().as_secs_f64();
        clock = Instant::now();
        if let SessionEvent::TimedOut(decision) = session.tick(waited).map_err(|e| e.to_string())? {
            return Ok(Turn::Decided(decision));
        }

        let input = line.trim();
        let selection = match input.to_lowercase().as_str() {
            "quit" | "q" => return Ok(Turn::Quit),
            "stats" => {
                println!(
                    "  {}\n",
                    super::format_stats(session.stats(), &session.config().endings)
                );
                continue;
            }
            "" => None,
            _ => match parse_answer(input) {
                Some(index) => Some(index),
                None => {
                    println!("  {}\n", format!("'{input}' is not an option.").yellow());
                    continue;
                }
            },
        };

        match session.submit(selection) {
            Ok(decision) => return Ok(Turn::Decided(decision)),
            Err(EngineError::NothingSelected) => {
                println!("  {}\n", "Pick an option first.".yellow());
            }
            Err(e @ EngineError::InvalidChoice { .. }) => {
                println!("  {}\n", e.to_string().yellow());
            }
            Err(e) => return Err(e.to_string()),
        }
    }
}

pub fn run(args: PlayArgs) -> Result<(), String> {
    let content = super::load_content(&args.scenarios, &args.endings)?;
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if args.random_order {
        config = config.with_selection(SelectionStrategy::UniformRandom);
    }
    if let Some(max) = args.max_choices {
        config = config.with_max_choices(max);
    }
    if let Some(id) = args.rare_setup {
        config = config.with_rare_setup(Some(SetupId(id)));
    }
    if args.independent_aggregate {
        config = config.with_aggregate(AggregateMode::Independent);
    }
    let seconds = config.timer.total_secs;

    let mut session =
        Session::start(content, config).map_err(|e| format!("failed to start session: {e}"))?;
    if let Some(path) = &args.leaderboard {
        let board = Leaderboard::with_store(JsonFileStore::new(path));
        board.refresh();
        session = session.with_leaderboard(Arc::new(board));
    }
    debug!(session = %session.id(), "session started");

    let total = session.state().max_choices();
    println!("  {} Boardroom", "Starting".bold());
    println!("  {total} decisions. Answer with a letter; an empty line submits nothing.");
    println!("  Type 'stats' for your standing, 'quit' to leave.\n");
    println!("  {}\n", super::format_stats(session.stats(), &session.config().endings));

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut number = 0;

    while !session.is_complete() {
        let setup = session.next_setup().map_err(|e| e.to_string())?;
        number += 1;
        print_setup(setup, number, total, seconds);

        match take_turn(&mut session, &mut reader)? {
            Turn::Decided(decision) => print_decision(&decision, &session),
            Turn::Quit => {
                println!("  Session abandoned after {} decisions.", number - 1);
                return write_transcript(&session, args.transcript.as_deref());
            }
        }
    }

    let endings = session.finish().map_err(|e| e.to_string())?;
    println!("  {}\n", "The board has reached its verdict.".bold());
    for ending in &endings {
        println!("  {}", ending.text);
        println!("  {}\n", format!("[{}]", ending.background).dimmed());
    }

    write_transcript(&session, args.transcript.as_deref())
}

fn write_transcript(session: &Session, path: Option<&Path>) -> Result<(), String> {
    if let Some(path) = path {
        std::fs::write(path, session.log().export_markdown())
            .map_err(|e| format!("failed to write transcript: {e}"))?;
        println!("  Transcript written to {}", path.display());
    }
    Ok(())
}

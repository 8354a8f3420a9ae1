//! Journal storage and export.

use serde::{Deserialize, Serialize};

use br_core::StatDelta;

use super::entry::LogEntry;

fn signed(delta: &StatDelta) -> String {
    format!(
        "efficiency {:+.1}, approval {:+.1}, finance {:+.1}",
        delta.efficiency, delta.approval, delta.finance
    )
}

/// A chronological log of one session's decisions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionLog {
    entries: Vec<LogEntry>,
}

impl DecisionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// All entries in order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Export the log as markdown.
    pub fn export_markdown(&self) -> String {
        let mut out = String::from("# Boardroom Session\n\n");
        let mut decision = 0;
        for entry in &self.entries {
            match entry {
                LogEntry::SessionStart {
                    session_id,
                    max_choices,
                    stats,
                    timestamp,
                    ..
                } => {
                    out.push_str(&format!("*Session {session_id}*, started {timestamp}\n\n"));
                    out.push_str(&format!("{max_choices} decisions. Starting stats: {stats}\n\n"));
                }
                LogEntry::Decision {
                    setup_id,
                    prompt,
                    choice,
                    answer_key,
                    multiplier,
                    applied,
                    stats,
                    emotion,
                    crowd_percent,
                    ..
                } => {
                    decision += 1;
                    out.push_str(&format!("## Decision {decision} (setup {setup_id})\n\n"));
                    out.push_str(&format!("{prompt}\n\n"));
                    out.push_str(&format!("**Choice** ({answer_key}): {choice}\n"));
                    out.push_str(&format!(
                        "**Effect** (x{multiplier:.2}): {}\n",
                        signed(applied)
                    ));
                    out.push_str(&format!("**Reaction**: {emotion}\n"));
                    if let Some(p) = crowd_percent {
                        out.push_str(&format!("**Crowd**: {p}%\n"));
                    }
                    out.push_str(&format!("**Stats**: {stats}\n\n"));
                }
                LogEntry::Timeout {
                    setup_id,
                    prompt,
                    stats,
                    ..
                } => {
                    decision += 1;
                    out.push_str(&format!("## Decision {decision} (setup {setup_id})\n\n"));
                    out.push_str(&format!("{prompt}\n\n"));
                    out.push_str("*Time ran out.*\n");
                    out.push_str(&format!("**Stats**: {stats}\n\n"));
                }
                LogEntry::Ending { text, .. } => {
                    out.push_str(&format!("> {text}\n\n"));
                }
            }
        }
        out
    }

    /// Export the log as plain text.
    pub fn export_text(&self) -> String {
        let mut out = String::from("Boardroom Session\n=================\n\n");
        for entry in &self.entries {
            match entry {
                LogEntry::SessionStart {
                    session_id, stats, ..
                } => {
                    out.push_str(&format!("Session {session_id}\n"));
                    out.push_str(&format!("Start: {stats}\n\n"));
                }
                LogEntry::Decision {
                    setup_id,
                    choice,
                    multiplier,
                    applied,
                    emotion,
                    crowd_percent,
                    ..
                } => {
                    out.push_str(&format!("[{setup_id}] {choice} (x{multiplier:.2})\n"));
                    out.push_str(&format!("  {}\n", signed(applied)));
                    match crowd_percent {
                        Some(p) => out.push_str(&format!("  Reaction: {emotion}, crowd {p}%\n\n")),
                        None => out.push_str(&format!("  Reaction: {emotion}\n\n")),
                    }
                }
                LogEntry::Timeout {
                    setup_id, stats, ..
                } => {
                    out.push_str(&format!("[{setup_id}] timed out\n"));
                    out.push_str(&format!("  {stats}\n\n"));
                }
                LogEntry::Ending {
                    background, text, ..
                } => {
                    out.push_str(&format!("Ending ({background}): {text}\n"));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::Emotion;
    use br_core::{SetupId, StatVector};
    use chrono::Utc;
    use uuid::Uuid;

    fn decision(crowd_percent: Option<u32>) -> LogEntry {
        LogEntry::Decision {
            setup_id: SetupId(3),
            prompt: "The printer is on fire.".to_string(),
            choice: "Call IT".to_string(),
            answer_key: "Answer3A".to_string(),
            multiplier: 0.75,
            applied: StatDelta::new(3.0, -1.5, 0.0),
            stats: StatVector::new(50.5, 53.0, 48.5, 50.0),
            emotion: Emotion::Thinking,
            crowd_percent,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn empty_log() {
        let log = DecisionLog::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn export_markdown_decision() {
        let mut log = DecisionLog::new();
        log.append(decision(Some(40)));
        let md = log.export_markdown();
        assert!(md.contains("## Decision 1 (setup 3)"));
        assert!(md.contains("**Choice** (Answer3A): Call IT"));
        assert!(md.contains("efficiency +3.0, approval -1.5, finance +0.0"));
        assert!(md.contains("**Crowd**: 40%"));
        assert!(md.contains("**Reaction**: Thinking"));
    }

    #[test]
    fn export_markdown_timeout_counts_as_decision() {
        let mut log = DecisionLog::new();
        log.append(decision(None));
        log.append(LogEntry::Timeout {
            setup_id: SetupId(4),
            prompt: "Lunch order?".to_string(),
            stats: StatVector::splat(45.0),
            timestamp: Utc::now(),
        });
        let md = log.export_markdown();
        assert!(md.contains("## Decision 2 (setup 4)"));
        assert!(md.contains("*Time ran out.*"));
        assert!(!md.contains("**Crowd**"));
    }

    #[test]
    fn export_text_entries() {
        let mut log = DecisionLog::new();
        log.append(LogEntry::SessionStart {
            session_id: Uuid::nil(),
            setups: 12,
            max_choices: 12,
            stats: StatVector::default(),
            timestamp: Utc::now(),
        });
        log.append(decision(Some(12)));
        log.append(LogEntry::Ending {
            background: "finance_good".to_string(),
            text: "The coffers overflow.".to_string(),
            timestamp: Utc::now(),
        });
        let txt = log.export_text();
        assert!(txt.contains("Session 00000000-0000-0000-0000-000000000000"));
        assert!(txt.contains("[3] Call IT (x0.75)"));
        assert!(txt.contains("crowd 12%"));
        assert!(txt.contains("Ending (finance_good): The coffers overflow."));
    }

    #[test]
    fn log_serde_roundtrip() {
        let mut log = DecisionLog::new();
        log.append(decision(None));
        let json = serde_json::to_string(&log).unwrap();
        let back: DecisionLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
    }
}

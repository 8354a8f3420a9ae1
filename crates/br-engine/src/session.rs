//! Boardroom session management.
//!
//! `Session` owns everything one playthrough mutates: stats, the remaining
//! setups, the response timer, the RNG and the decision log. The host drives
//! it with `next_setup`, `tick` and `submit`, and finally `finish`.
//!
//! ```text
//! AwaitingSetup --next_setup--> Deciding --submit/timeout--> Reviewing --next_setup--> Deciding
//!                                                |
//!                                                +--last decision--> Complete --finish--> Finished
//! ```

use std::sync::Arc;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use br_core::{ContentStore, Setup, SetupId, StatVector};

use crate::config::EngineConfig;
use crate::delay::Delay;
use crate::emotion::{Emotion, EmotionClassifier};
use crate::ending::{Ending, EndingResolver};
use crate::error::{EngineError, EngineResult};
use crate::journal::{DecisionLog, LogEntry};
use crate::leaderboard::{AnswerKey, Leaderboard};
use crate::resolver::{ChoiceResolver, Resolution};
use crate::sequencer::ScenarioSequencer;
use crate::state::SessionState;
use crate::timer::{ResponseTimer, TimerEvent, TimerPhase, TimerState};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Ready to draw the first setup.
    AwaitingSetup,
    /// A setup is on screen and the timer runs.
    Deciding,
    /// The last decision is being shown; the next setup may be drawn.
    Reviewing,
    /// Every decision is made; endings are pending.
    Complete,
    /// Endings were produced.
    Finished,
}

/// Everything the host needs to present a resolved decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// The setup answered.
    pub setup_id: SetupId,
    /// Crowd counter key, absent on timeout.
    pub answer_key: Option<AnswerKey>,
    /// Stat outcome.
    pub resolution: Resolution,
    /// The character's reaction.
    pub emotion: Emotion,
    /// Share of players who chose the same, when a leaderboard is attached.
    pub crowd_percent: Option<u32>,
    /// Text shown for the chosen option. Empty on timeout.
    pub result_text: String,
}

/// What a tick produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Nothing is counting.
    Idle,
    /// The decision timer is running (or paused).
    Counting {
        /// Current reward multiplier.
        multiplier: f64,
        /// Current reward window.
        phase: TimerPhase,
    },
    /// Time ran out and the decision was resolved with no selection.
    TimedOut(Decision),
    /// The transition after a decision has finished.
    TransitionElapsed,
}

/// One playthrough.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    content: Arc<ContentStore>,
    config: EngineConfig,
    state: SessionState,
    sequencer: ScenarioSequencer,
    timer: ResponseTimer,
    resolver: ChoiceResolver,
    classifier: EmotionClassifier,
    endings: EndingResolver,
    leaderboard: Option<Arc<Leaderboard>>,
    current: Option<SetupId>,
    transition: Option<Delay>,
    phase: SessionPhase,
    log: DecisionLog,
    rng: StdRng,
}

impl Session {
    /// Start a session over `content`.
    ///
    /// Fails if the config is inconsistent or the content lacks endings the
    /// config asks for.
    pub fn start(content: Arc<ContentStore>, config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let endings = EndingResolver::new(config.endings.clone());
        endings.check_content(content.endings())?;

        let sequencer = ScenarioSequencer::new(config.sequencer);
        let state = sequencer.start(content.scenarios(), config.resolver.starting_stats);
        let id = Uuid::new_v4();

        let mut log = DecisionLog::new();
        log.append(LogEntry::SessionStart {
            session_id: id,
            setups: content.scenarios().len(),
            max_choices: state.max_choices(),
            stats: *state.stats(),
            timestamp: Utc::now(),
        });
        info!(%id, max_choices = state.max_choices(), "session started");

        Ok(Self {
            id,
            timer: ResponseTimer::new(config.timer),
            resolver: ChoiceResolver::new(config.resolver),
            classifier: EmotionClassifier::new(config.emotion.clone()),
            rng: StdRng::seed_from_u64(config.seed),
            content,
            config,
            state,
            sequencer,
            endings,
            leaderboard: None,
            current: None,
            transition: None,
            phase: SessionPhase::AwaitingSetup,
            log,
        })
    }

    /// Record answers in a shared leaderboard.
    pub fn with_leaderboard(mut self, leaderboard: Arc<Leaderboard>) -> Self {
        self.leaderboard = Some(leaderboard);
        self
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Current stats.
    pub fn stats(&self) -> &StatVector {
        self.state.stats()
    }

    /// Full session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The session's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The decision timer.
    pub fn timer(&self) -> &ResponseTimer {
        &self.timer
    }

    /// The decision log.
    pub fn log(&self) -> &DecisionLog {
        &self.log
    }

    /// The setup awaiting an answer.
    pub fn current_setup(&self) -> Option<&Setup> {
        self.current.and_then(|id| self.content.scenarios().get(id))
    }

    /// Whether every decision has been made.
    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// Whether the post-decision transition has run out. Advisory only:
    /// `next_setup` never waits for it.
    pub fn transition_done(&self) -> bool {
        self.transition.as_ref().is_none_or(Delay::is_elapsed)
    }

    /// Draw the next setup and start its timer.
    ///
    /// While a setup is already awaiting an answer, that setup is returned
    /// again and its timer keeps running.
    pub fn next_setup(&mut self) -> EngineResult<&Setup> {
        match self.phase {
            SessionPhase::Finished => return Err(EngineError::SessionFinished),
            SessionPhase::Complete => return Err(EngineError::Exhausted),
            SessionPhase::Deciding => {
                let id = self.current.ok_or(EngineError::NoActiveSetup)?;
                return Ok(self.content.setup(id)?);
            }
            SessionPhase::AwaitingSetup | SessionPhase::Reviewing => {}
        }

        let id = self.sequencer.next(&mut self.state, &mut self.rng)?;
        let setup = self.content.setup(id)?;
        self.timer.start(self.config.timer);
        self.current = Some(id);
        self.transition = None;
        self.phase = SessionPhase::Deciding;
        debug!(%id, "deciding");
        Ok(setup)
    }

    /// Advance time by `delta_secs`.
    pub fn tick(&mut self, delta_secs: f64) -> EngineResult<SessionEvent> {
        match self.phase {
            SessionPhase::Deciding => match self.timer.tick(delta_secs)? {
                TimerEvent::Running { multiplier, phase } => {
                    Ok(SessionEvent::Counting { multiplier, phase })
                }
                TimerEvent::Paused => Ok(SessionEvent::Counting {
                    multiplier: self.timer.current_multiplier(),
                    phase: self.timer.phase(),
                }),
                TimerEvent::TimedOut => Ok(SessionEvent::TimedOut(self.conclude(None, 0.0)?)),
            },
            SessionPhase::Reviewing => {
                let elapsed = self
                    .transition
                    .as_mut()
                    .is_some_and(|delay| delay.tick(delta_secs));
                Ok(if elapsed {
                    SessionEvent::TransitionElapsed
                } else {
                    SessionEvent::Idle
                })
            }
            _ => Ok(SessionEvent::Idle),
        }
    }

    /// Suspend the decision timer.
    pub fn pause(&mut self) {
        self.timer.pause();
    }

    /// Resume the decision timer where it stopped.
    pub fn resume(&mut self) {
        self.timer.resume();
    }

    /// Answer the current setup with an option index, or `None` for no selection.
    ///
    /// `None` while time remains is rejected with
    /// [`EngineError::NothingSelected`]; an out-of-range index with
    /// [`EngineError::InvalidChoice`]. Either way nothing changes and the
    /// timer keeps running.
    pub fn submit(&mut self, selection: Option<usize>) -> EngineResult<Decision> {
        match self.phase {
            SessionPhase::Finished => return Err(EngineError::SessionFinished),
            SessionPhase::Deciding => {}
            _ => return Err(EngineError::NoActiveSetup),
        }
        let setup = self.current_setup().ok_or(EngineError::NoActiveSetup)?;

        let Some(index) = selection else {
            if self.timer.state() == TimerState::Counting {
                return Err(EngineError::NothingSelected);
            }
            return self.conclude(None, 0.0);
        };
        if setup.option(index).is_none() {
            return Err(EngineError::InvalidChoice {
                index,
                available: setup.options.len(),
            });
        }

        let multiplier = self.timer.stop()?;
        self.conclude(Some(index), multiplier)
    }

    /// Resolve the current setup, then react, count and journal, in that order.
    fn conclude(&mut self, selection: Option<usize>, multiplier: f64) -> EngineResult<Decision> {
        let id = self.current.ok_or(EngineError::NoActiveSetup)?;
        let content = Arc::clone(&self.content);
        let setup = content.setup(id)?;

        let resolution = self
            .resolver
            .resolve(&mut self.state, setup, selection, multiplier)?;
        let emotion = self
            .classifier
            .react(&setup.character_id, &resolution, &mut self.rng);

        let answer_key = selection.map(|index| AnswerKey::new(id, index));
        let crowd_percent = match (&self.leaderboard, &answer_key) {
            (Some(board), Some(key)) => {
                board.increment(key);
                Some(board.percent_chosen(id, key))
            }
            _ => None,
        };

        let chosen = selection.and_then(|index| setup.option(index));
        let result_text = chosen.map(|c| c.result_text.clone()).unwrap_or_default();

        let timestamp = Utc::now();
        match (chosen, &answer_key) {
            (Some(choice), Some(key)) => self.log.append(LogEntry::Decision {
                setup_id: id,
                prompt: setup.prompt.clone(),
                choice: choice.label.clone(),
                answer_key: key.to_string(),
                multiplier: resolution.multiplier,
                applied: resolution.applied,
                stats: resolution.stats,
                emotion,
                crowd_percent,
                timestamp,
            }),
            _ => self.log.append(LogEntry::Timeout {
                setup_id: id,
                prompt: setup.prompt.clone(),
                stats: resolution.stats,
                timestamp,
            }),
        }

        self.current = None;
        if self.state.is_complete() {
            self.phase = SessionPhase::Complete;
            self.transition = None;
            info!(id = %self.id, stats = %resolution.stats, "all decisions made");
        } else {
            self.phase = SessionPhase::Reviewing;
            self.transition = Some(Delay::new(self.config.transition_secs));
        }

        Ok(Decision {
            setup_id: id,
            answer_key,
            resolution,
            emotion,
            crowd_percent,
            result_text,
        })
    }

    /// Produce the ending sequence and close the session.
    pub fn finish(&mut self) -> EngineResult<Vec<Ending>> {
        if self.phase == SessionPhase::Finished {
            return Err(EngineError::SessionFinished);
        }
        let endings = self
            .endings
            .resolve(&mut self.state, self.content.endings(), &mut self.rng)?;

        let timestamp = Utc::now();
        for ending in &endings {
            self.log.append(LogEntry::Ending {
                background: ending.background.clone(),
                text: ending.text.clone(),
                timestamp,
            });
        }
        self.phase = SessionPhase::Finished;
        info!(id = %self.id, "session finished");
        Ok(endings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ending::{EndingConfig, EndingKind};
    use crate::sequencer::SelectionStrategy;
    use crate::timer::TimerConfig;
    use br_core::{Choice, EndingText, EndingTextSet, ScenarioSet, Stat, StatDelta};

    fn triple(stat: &str) -> Vec<String> {
        vec![format!("{stat} bad"), format!("{stat} ok"), format!("{stat} good")]
    }

    fn content() -> Arc<ContentStore> {
        let setups = (1..=8)
            .map(|id| {
                Setup::new(id, format!("Question {id}"))
                    .with_character("Intern")
                    .with_choice(
                        Choice::new("Invest", "Money well spent.")
                            .with_delta(StatDelta::new(10.0, -5.0, 0.0)),
                    )
                    .with_choice(
                        Choice::new("Save", "Nobody notices.")
                            .with_delta(StatDelta::new(-2.0, 0.0, 4.0)),
                    )
            })
            .collect();
        let endings = EndingTextSet::new(
            [
                (Stat::Efficiency, triple("eff")),
                (Stat::Approval, triple("app")),
                (Stat::Finance, triple("fin")),
            ],
            EndingText::new("Godzilla.", "rare"),
        )
        .unwrap()
        .with_verdict("fired", "promoted");
        Arc::new(ContentStore::new(ScenarioSet::new(setups).unwrap(), endings))
    }

    fn config() -> EngineConfig {
        EngineConfig::default()
            .with_max_choices(3)
            .with_timer(TimerConfig::new(20.0, 5.0, 5.0, 0.5))
    }

    #[test]
    fn scenario_one_first_decision() {
        let mut session = Session::start(content(), config()).unwrap();
        assert_eq!(session.next_setup().unwrap().id, SetupId(1));
        let d = session.submit(Some(0)).unwrap();
        assert_eq!(d.resolution.stats.efficiency, 60.0);
        assert_eq!(d.resolution.stats.approval, 45.0);
        assert_eq!(d.resolution.stats.finance, 50.0);
        assert!((d.resolution.stats.aggregate - 155.0 / 3.0).abs() < 1e-9);
        assert_eq!(d.emotion, Emotion::Happy);
        assert_eq!(d.result_text, "Money well spent.");
        assert_eq!(d.answer_key.unwrap().to_string(), "Answer1A");
        assert_eq!(session.phase(), SessionPhase::Reviewing);
    }

    #[test]
    fn full_playthrough() {
        let mut session = Session::start(content(), config()).unwrap();
        for _ in 0..3 {
            session.next_setup().unwrap();
            session.tick(1.0).unwrap();
            session.submit(Some(0)).unwrap();
        }
        assert_eq!(session.phase(), SessionPhase::Complete);
        assert!(matches!(session.next_setup(), Err(EngineError::Exhausted)));
        assert_eq!(session.state().remaining().len(), 5);

        let endings = session.finish().unwrap();
        assert_eq!(endings.len(), 4);
        assert_eq!(endings[0].text, "eff good");
        assert_eq!(endings[1].text, "app ok");
        assert_eq!(endings[3].kind, EndingKind::Verdict { good: true });
        assert!(matches!(session.finish(), Err(EngineError::SessionFinished)));
        assert!(matches!(session.next_setup(), Err(EngineError::SessionFinished)));

        // start + 3 decisions + 4 endings
        assert_eq!(session.log().len(), 8);
    }

    #[test]
    fn finish_before_complete() {
        let mut session = Session::start(content(), config()).unwrap();
        assert!(matches!(
            session.finish(),
            Err(EngineError::NotComplete { made: 0, max: 3 })
        ));
    }

    #[test]
    fn slow_answer_is_scaled() {
        let mut session = Session::start(content(), config()).unwrap();
        session.next_setup().unwrap();
        session.tick(7.5).unwrap();
        let d = session.submit(Some(0)).unwrap();
        assert!((d.resolution.multiplier - 0.75).abs() < 1e-9);
        assert!((d.resolution.stats.efficiency - 57.5).abs() < 1e-9);
    }

    #[test]
    fn timeout_resolves_with_penalty() {
        let mut session = Session::start(content(), config()).unwrap();
        session.next_setup().unwrap();
        assert!(matches!(
            session.tick(19.0).unwrap(),
            SessionEvent::Counting {
                phase: TimerPhase::Expired,
                ..
            }
        ));
        let SessionEvent::TimedOut(d) = session.tick(1.0).unwrap() else {
            panic!("expected timeout");
        };
        assert_eq!(d.answer_key, None);
        assert_eq!(d.emotion, Emotion::Shocked);
        assert_eq!(d.resolution.stats, StatVector::splat(45.0));
        assert_eq!(session.state().choices_made(), 1);
        assert_eq!(session.tick(1.0).unwrap(), SessionEvent::Idle);
        assert!(matches!(
            session.log().entries().last(),
            Some(LogEntry::Timeout { .. })
        ));
    }

    #[test]
    fn nothing_selected_while_time_remains() {
        let mut session = Session::start(content(), config()).unwrap();
        session.next_setup().unwrap();
        session.tick(2.0).unwrap();
        assert!(matches!(
            session.submit(None),
            Err(EngineError::NothingSelected)
        ));
        assert_eq!(session.phase(), SessionPhase::Deciding);
        assert_eq!(session.state().choices_made(), 0);
        assert_eq!(session.timer().elapsed(), 2.0);
    }

    #[test]
    fn invalid_choice_keeps_timer_running() {
        let mut session = Session::start(content(), config()).unwrap();
        session.next_setup().unwrap();
        assert!(matches!(
            session.submit(Some(4)),
            Err(EngineError::InvalidChoice {
                index: 4,
                available: 2
            })
        ));
        assert_eq!(session.timer().state(), TimerState::Counting);
        assert!(session.submit(Some(1)).is_ok());
    }

    #[test]
    fn submit_without_setup() {
        let mut session = Session::start(content(), config()).unwrap();
        assert!(matches!(
            session.submit(Some(0)),
            Err(EngineError::NoActiveSetup)
        ));
    }

    #[test]
    fn next_setup_while_deciding_is_stable() {
        let mut session = Session::start(content(), config()).unwrap();
        session.next_setup().unwrap();
        session.tick(3.0).unwrap();
        assert_eq!(session.next_setup().unwrap().id, SetupId(1));
        assert_eq!(session.timer().elapsed(), 3.0);
        assert_eq!(session.state().drawn(), 1);
    }

    #[test]
    fn pause_holds_the_clock() {
        let mut session = Session::start(content(), config()).unwrap();
        session.next_setup().unwrap();
        session.tick(4.0).unwrap();
        session.pause();
        assert!(matches!(
            session.tick(100.0).unwrap(),
            SessionEvent::Counting { .. }
        ));
        session.resume();
        session.tick(1.0).unwrap();
        assert_eq!(session.timer().elapsed(), 5.0);
    }

    #[test]
    fn leaderboard_counts_answers() {
        let board = Arc::new(Leaderboard::new());
        board.increment(&AnswerKey::new(SetupId(1), 1));

        let mut session = Session::start(content(), config())
            .unwrap()
            .with_leaderboard(Arc::clone(&board));
        session.next_setup().unwrap();
        let d = session.submit(Some(0)).unwrap();
        assert_eq!(d.crowd_percent, Some(50));
        assert_eq!(board.participants(SetupId(1)), 2);
    }

    #[test]
    fn timeouts_are_not_counted() {
        let board = Arc::new(Leaderboard::new());
        let mut session = Session::start(content(), config())
            .unwrap()
            .with_leaderboard(Arc::clone(&board));
        session.next_setup().unwrap();
        let SessionEvent::TimedOut(d) = session.tick(25.0).unwrap() else {
            panic!("expected timeout");
        };
        assert_eq!(d.crowd_percent, None);
        assert_eq!(board.participants(SetupId(1)), 0);
    }

    #[test]
    fn transition_delay_elapses() {
        let mut session = Session::start(content(), config().with_transition(1.0)).unwrap();
        session.next_setup().unwrap();
        session.submit(Some(0)).unwrap();
        assert!(!session.transition_done());
        assert_eq!(session.tick(0.5).unwrap(), SessionEvent::Idle);
        assert_eq!(session.tick(0.5).unwrap(), SessionEvent::TransitionElapsed);
        assert!(session.transition_done());
        assert_eq!(session.tick(0.5).unwrap(), SessionEvent::Idle);
    }

    #[test]
    fn rare_setup_can_swap_first_ending() {
        let endings = EndingConfig {
            rarity: 1,
            ..EndingConfig::default()
        };
        let cfg = config().with_max_choices(8).with_endings(endings);
        let mut session = Session::start(content(), cfg).unwrap();
        while !session.is_complete() {
            session.next_setup().unwrap();
            session.submit(Some(1)).unwrap();
        }
        assert!(session.state().special_flag());
        let endings = session.finish().unwrap();
        assert_eq!(endings[0].kind, EndingKind::Rare);
        assert_eq!(endings[0].text, "Godzilla.");
    }

    #[test]
    fn random_order_is_seeded() {
        let cfg = config()
            .with_selection(SelectionStrategy::UniformRandom)
            .with_seed(123);
        let order = |cfg: EngineConfig| {
            let mut session = Session::start(content(), cfg).unwrap();
            let mut ids = Vec::new();
            while !session.is_complete() {
                ids.push(session.next_setup().unwrap().id);
                session.submit(Some(0)).unwrap();
            }
            ids
        };
        assert_eq!(order(cfg.clone()), order(cfg));
    }

    #[test]
    fn missing_endings_fail_start() {
        let cfg = config().with_endings(EndingConfig {
            order: vec![Stat::Aggregate],
            ..EndingConfig::default()
        });
        assert!(matches!(
            Session::start(content(), cfg),
            Err(EngineError::Content(_))
        ));
    }

    #[test]
    fn invalid_config_fails_start() {
        assert!(matches!(
            Session::start(content(), config().with_max_choices(0)),
            Err(EngineError::InvalidConfig(_))
        ));
    }
}

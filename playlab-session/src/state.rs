use crate::game::{Game, Termination, Verdict};
use crate::session::{Session, Snapshot, Summary};
use crate::trial::{Trial, TrialDurations};
use playlab_core::{Outcome, RandomSource, SessionStatus, Stimulus, TrialState};
use playlab_timing::{Clock, TimerId, TrialTimer};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session already terminated; start a new one to play again")]
    AlreadyTerminated,
    #[error("session already started")]
    AlreadyStarted,
    #[error("session has not terminated yet")]
    StillRunning,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started,
    TrialArmed {
        trial: usize,
        level: u32,
    },
    StimulusOnset {
        trial: usize,
    },
    RecallOpened {
        trial: usize,
    },
    TrialResolved {
        trial: usize,
        outcome: Outcome,
        latency_ms: Option<f64>,
    },
    Terminated,
}

/// What a single user input did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEffect {
    /// Nothing changed: wrong state, trial already resolved, duplicate pick.
    Ignored,
    /// Input failed a shape check and was not consumed.
    Rejected,
    /// Partial recall accepted.
    Progress { accepted: usize },
    Resolved(Outcome),
}

/// What the pending timer means when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
    Onset,
    Recall,
    Timeout,
    NextTrial,
}

/// Timed trial session: arms trials, opens stimuli on timer fire, resolves
/// on input or timeout and folds each sealed trial into the [`Session`].
///
/// Single-threaded and event driven. The host calls [`update`] on every
/// tick and [`respond`] for each user action; whichever reaches a trial
/// first wins and the other becomes a no-op.
///
/// [`update`]: SessionMachine::update
/// [`respond`]: SessionMachine::respond
pub struct SessionMachine<G, C, R>
where
    G: Game,
    C: Clock,
    R: RandomSource,
{
    game: G,
    clock: C,
    rng: R,
    session: Session<G::Stimulus, G::Response>,
    timer: TrialTimer,
    wake: Option<(TimerId, Wake)>,
    current: Option<Trial<G::Stimulus, G::Response>>,
    trial_number: usize,
    outbox: Vec<SessionEvent>,
}

impl<G, C, R> SessionMachine<G, C, R>
where
    G: Game,
    C: Clock,
    R: RandomSource,
{
    pub fn new(game: G, clock: C, rng: R) -> Self {
        let session = Session::new(game.kind(), game.termination());
        Self {
            game,
            clock,
            rng,
            session,
            timer: TrialTimer::new(),
            wake: None,
            current: None,
            trial_number: 0,
            outbox: Vec::new(),
        }
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.session.status() {
            SessionStatus::Terminated => return Err(SessionError::AlreadyTerminated),
            SessionStatus::Active => return Err(SessionError::AlreadyStarted),
            SessionStatus::NotStarted => {}
        }
        let now = self.clock.now();
        self.session.begin(now);
        info!(game = self.game.kind().slug(), "session started");
        self.outbox.push(SessionEvent::Started);
        self.arm_trial(now);
        Ok(())
    }

    /// Polls timers against the clock and returns every event produced since
    /// the last call.
    pub fn update(&mut self) -> Vec<SessionEvent> {
        if self.session.status().is_active() {
            let now = self.clock.now();
            if self.session.should_terminate(now) {
                if let Some(trial) = self.current.take() {
                    debug!(trial = trial.id, "time expired; abandoning trial");
                }
                self.terminate(now);
            } else {
                while let Some(id) = self.timer.poll(now) {
                    match self.wake.take() {
                        Some((armed, wake)) if armed == id => self.on_wake(wake, now),
                        _ => warn!(timer = id.raw(), "ignoring stale timer fire"),
                    }
                }
            }
        }
        std::mem::take(&mut self.outbox)
    }

    /// Routes one user action to the current trial.
    pub fn respond(&mut self, response: G::Response) -> InputEffect {
        if !self.session.status().is_active() {
            return InputEffect::Ignored;
        }
        let now = self.clock.now();
        if self.session.should_terminate(now) {
            self.terminate(now);
            return InputEffect::Ignored;
        }
        let penalize_early = self.game.penalizes_early_input();
        let Some(trial) = self.current.as_mut() else {
            return InputEffect::Ignored;
        };
        if !trial.state.allows_input() {
            return InputEffect::Ignored;
        }

        match trial.state {
            TrialState::Armed if penalize_early => {
                self.timer.cancel();
                self.wake = None;
                debug!(trial = trial.id, "premature response");
                self.resolve(Outcome::Premature, Some(now))
            }
            state if state.is_measuring() => {
                let verdict = self.game.judge(&trial.stimulus, &trial.accepted, &response);
                match verdict {
                    Verdict::Correct => {
                        trial.accepted.push(response);
                        self.resolve(Outcome::OnTimeCorrect, Some(now))
                    }
                    Verdict::Incorrect => {
                        trial.accepted.push(response);
                        self.resolve(Outcome::OnTimeIncorrect, Some(now))
                    }
                    Verdict::Continue => {
                        trial.accepted.push(response);
                        InputEffect::Progress {
                            accepted: trial.accepted.len(),
                        }
                    }
                    Verdict::Ignored => InputEffect::Ignored,
                    Verdict::Rejected => InputEffect::Rejected,
                }
            }
            _ => InputEffect::Ignored,
        }
    }

    /// Releases the pending timer and ends the session, as when the player
    /// navigates away. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.timer.cancel();
        self.wake = None;
        if self.session.status().is_active() {
            let now = self.clock.now();
            self.current = None;
            self.terminate(now);
        }
    }

    /// Swaps in a fresh session once the current one has terminated and
    /// returns the finished one.
    pub fn replay(&mut self) -> Result<Session<G::Stimulus, G::Response>, SessionError> {
        if !self.session.status().is_terminated() {
            return Err(SessionError::StillRunning);
        }
        self.timer.cancel();
        self.wake = None;
        self.current = None;
        self.trial_number = 0;
        self.outbox.clear();
        self.game.reset();
        let fresh = Session::new(self.game.kind(), self.game.termination());
        Ok(std::mem::replace(&mut self.session, fresh))
    }

    fn on_wake(&mut self, wake: Wake, now: u64) {
        match wake {
            Wake::Onset => self.open_stimulus(now),
            Wake::Recall => self.open_recall(now),
            Wake::Timeout => {
                debug!("response window closed");
                self.resolve(Outcome::Missed, None);
            }
            Wake::NextTrial => self.arm_trial(now),
        }
    }

    fn schedule(&mut self, now: u64, delay: Duration, wake: Wake) {
        let id = self.timer.arm(now, delay);
        self.wake = Some((id, wake));
    }

    fn arm_trial(&mut self, now: u64) {
        if self.session.should_terminate(now) {
            self.terminate(now);
            return;
        }
        let id = self.trial_number;
        let level = self.session.level();
        let stimulus = self.game.generate_stimulus(level, &mut self.rng);
        let arming = self.game.arming_delay(id, level, &mut self.rng);
        let durations = TrialDurations {
            arming,
            presentation: self.game.presentation(&stimulus, level),
            response_window: self.game.response_window(),
        };
        debug!(trial = id, level, stimulus = %stimulus.describe(), ?arming, "trial armed");

        self.current = Some(Trial::new(id, level, stimulus, durations, now));
        self.outbox.push(SessionEvent::TrialArmed { trial: id, level });

        if arming.is_zero() {
            self.open_stimulus(now);
        } else {
            self.schedule(now, arming, Wake::Onset);
        }
    }

    fn open_stimulus(&mut self, now: u64) {
        let Some(trial) = self.current.as_mut() else {
            return;
        };
        trial.timestamps.stimulus_start = Some(now);
        let id = trial.id;
        let durations = trial.durations;
        match durations.presentation {
            Some(show) => {
                trial.state = TrialState::Presenting;
                self.outbox.push(SessionEvent::StimulusOnset { trial: id });
                debug!(trial = id, ?show, "presenting");
                self.schedule(now, show, Wake::Recall);
            }
            None => {
                trial.state = TrialState::Active;
                self.outbox.push(SessionEvent::StimulusOnset { trial: id });
                debug!(trial = id, at_ns = now, "stimulus onset");
                if let Some(window) = durations.response_window {
                    self.schedule(now, window, Wake::Timeout);
                }
            }
        }
    }

    fn open_recall(&mut self, now: u64) {
        let Some(trial) = self.current.as_mut() else {
            return;
        };
        trial.state = TrialState::Recalling;
        trial.timestamps.recall_start = Some(now);
        let id = trial.id;
        let window = trial.durations.response_window;
        self.outbox.push(SessionEvent::RecallOpened { trial: id });
        debug!(trial = id, "recall opened");
        if let Some(window) = window {
            self.schedule(now, window, Wake::Timeout);
        }
    }

    fn resolve(&mut self, outcome: Outcome, response_ns: Option<u64>) -> InputEffect {
        let Some(mut trial) = self.current.take() else {
            return InputEffect::Ignored;
        };
        self.timer.cancel();
        self.wake = None;

        let now = self.clock.now();
        trial.state = TrialState::Resolved;
        trial.timestamps.response = response_ns;
        let record = trial.seal(outcome, response_ns);
        let latency_ms = record.latency_ms();
        self.game.on_resolved(&record);
        let adj = self.game.score(&record);
        let trial_id = record.trial_id();
        self.session.record(record, adj, self.game.max_level());
        self.trial_number += 1;

        debug!(
            trial = trial_id,
            outcome = outcome.label(),
            ?latency_ms,
            score = self.session.score(),
            "trial resolved"
        );
        self.outbox.push(SessionEvent::TrialResolved {
            trial: trial_id,
            outcome,
            latency_ms,
        });

        if self.session.should_terminate(now) {
            self.terminate(now);
        } else {
            let pause = self.game.inter_trial();
            if pause.is_zero() {
                self.arm_trial(now);
            } else {
                self.schedule(now, pause, Wake::NextTrial);
            }
        }
        InputEffect::Resolved(outcome)
    }

    fn terminate(&mut self, now: u64) {
        self.timer.cancel();
        self.wake = None;
        self.current = None;
        self.session.terminate(now);
        let summary = self.session.summary();
        info!(
            game = summary.game.slug(),
            score = summary.score,
            trials = summary.trials,
            accuracy = summary.accuracy,
            "session terminated"
        );
        self.outbox.push(SessionEvent::Terminated);
    }

    pub fn session(&self) -> &Session<G::Stimulus, G::Response> {
        &self.session
    }

    pub fn summary(&self) -> Summary {
        self.session.summary()
    }

    pub fn snapshot(&self) -> Snapshot<'_, G::Stimulus, G::Response> {
        self.session.snapshot()
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    pub fn current_trial(&self) -> Option<&Trial<G::Stimulus, G::Response>> {
        self.current.as_ref()
    }

    pub fn current_trial_state(&self) -> Option<TrialState> {
        self.current.as_ref().map(|t| t.state)
    }

    /// The stimulus, only while the player is meant to perceive it.
    pub fn visible_stimulus(&self) -> Option<&G::Stimulus> {
        self.current.as_ref().and_then(|t| match t.state {
            TrialState::Active | TrialState::Presenting => Some(&t.stimulus),
            _ => None,
        })
    }

    pub fn has_pending_timer(&self) -> bool {
        self.timer.is_armed()
    }

    /// Time until the pending timer is due, for hosts that sleep between
    /// updates.
    pub fn next_wake_in(&self) -> Option<Duration> {
        self.timer.remaining(self.clock.now())
    }

    /// The game's own share line when it has one, the generic one otherwise.
    pub fn share_text(&self) -> String {
        self.game
            .share_text(&self.session)
            .unwrap_or_else(|| self.session.summary().share_text())
    }

    pub fn time_remaining(&self) -> Option<Duration> {
        self.session.time_remaining(self.clock.now())
    }

    /// `(current, total)` for games that stop after a fixed trial count.
    pub fn trial_progress(&self) -> Option<(usize, usize)> {
        match self.session.termination() {
            Termination::TrialCount(n) => Some(((self.trial_number + 1).min(n), n)),
            Termination::CorrectCount(n) => Some((self.session.correct_count(), n)),
            _ => None,
        }
    }
}

impl<G, C, R> Drop for SessionMachine<G, C, R>
where
    G: Game,
    C: Clock,
    R: RandomSource,
{
    fn drop(&mut self) {
        if self.timer.cancel().is_some() {
            debug!("pending trial timer released on drop");
        }
    }
}

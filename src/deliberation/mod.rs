//! Multi-round deliberation: arguments, persuasion, and termination.
//!
//! Each call to [`Deliberation::advance`] runs exactly one round against a
//! working copy of the session's jury and id generator, then commits both in
//! one step. A caller that drops the future, or simply stops calling
//! `advance`, aborts between rounds with nothing half-applied.

pub mod narrative;
pub mod persuasion;
pub mod result;

pub use narrative::{
    ArgumentRequest, ArgumentSource, GeneratedArgument, NarrativeError, NarrativeGenerator,
};
pub use persuasion::PersuasionShift;
pub use result::{ArgumentRecord, DeliberationResult, RoundTrace, Verdict};

use std::time::Duration;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::events::apply_event;
use crate::id::{IdGenerator, JurorId};
use crate::jury::Jury;
use crate::model::Vote;
use crate::opinion::derive_expression;
use crate::session::JurySession;

/// Balance constants for deliberation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliberationConfig {
    /// Rounds before the jury is declared hung.
    pub max_rounds: u32,
    pub min_speakers: usize,
    /// Rounds that use `early_speaker_fraction` before the taper starts.
    pub early_rounds: u32,
    pub early_speaker_fraction: f64,
    pub late_speaker_fraction: f64,
    /// Fraction of speakers dropped per round after the early rounds.
    pub speaker_taper: f64,
    pub leadership_weight: f64,
    pub confidence_weight: f64,
    pub persuasion_amplifier: f64,
    /// Extra openness for followers, scaled by follower tendency.
    pub follower_boost: f64,
    /// Listeners already this far toward the argued side barely move.
    pub ally_threshold: f64,
    pub ally_dampening: f64,
    /// Listener confidence gained per point of opinion shift.
    pub confidence_gain: f64,
    /// Memories passed to the narrative generator.
    pub memory_window: usize,
    pub narrative_timeout_ms: u64,
}

impl Default for DeliberationConfig {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            min_speakers: 3,
            early_rounds: 2,
            early_speaker_fraction: 0.8,
            late_speaker_fraction: 0.5,
            speaker_taper: 0.1,
            leadership_weight: 0.6,
            confidence_weight: 0.4,
            persuasion_amplifier: 3.0,
            follower_boost: 0.5,
            ally_threshold: 30.0,
            ally_dampening: 0.2,
            confidence_gain: 0.5,
            memory_window: 3,
            narrative_timeout_ms: 5000,
        }
    }
}

impl DeliberationConfig {
    pub fn narrative_timeout(&self) -> Duration {
        Duration::from_millis(self.narrative_timeout_ms)
    }

    /// Round cap, never below one.
    pub fn round_cap(&self) -> u32 {
        self.max_rounds.max(1)
    }
}

/// Phases of a deliberation.
///
/// A round runs atomically, so between calls to [`Deliberation::advance`] the
/// stored state is always `RoundStart` or terminal. `Voting` through
/// `EventCheck` are passed through inside a round and show up only in
/// trace-level logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliberationState {
    RoundStart,
    Voting,
    Arguing,
    Persuading,
    EventCheck,
    Unanimous(Vote),
    Hung,
}

impl DeliberationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, DeliberationState::Unanimous(_) | DeliberationState::Hung)
    }
}

/// One deliberation in flight. Owned by the caller alongside its session.
#[derive(Debug, Clone)]
pub struct Deliberation {
    pub config: DeliberationConfig,
    pub state: DeliberationState,
    /// Number of the next round to run, starting at 1.
    pub round: u32,
    pub foreperson: Option<JurorId>,
    pub foreperson_name: Option<String>,
    pub trace: Vec<RoundTrace>,
}

impl Deliberation {
    /// Start deliberating. The foreperson is chosen here, once, and keeps the
    /// role for the whole deliberation.
    pub fn begin(session: &JurySession) -> Self {
        let foreperson = session.jury.select_foreperson();
        let foreperson_name = foreperson
            .and_then(|id| session.jury.get(id))
            .map(|j| j.name().to_string());
        tracing::info!(
            foreperson = ?foreperson_name,
            jurors = session.jury.active_count(),
            "deliberation begins"
        );
        Self {
            config: session.config.deliberation.clone(),
            state: DeliberationState::RoundStart,
            round: 1,
            foreperson,
            foreperson_name,
            trace: Vec::new(),
        }
    }

    fn enter(&self, phase: DeliberationState) {
        tracing::trace!(round = self.round, ?phase, "deliberation phase");
    }

    /// Run one round and return the state it ends in.
    ///
    /// Terminal deliberations return their state without doing anything.
    pub async fn advance(
        &mut self,
        session: &mut JurySession,
        rng: &mut dyn RngCore,
        narrator: Option<&dyn NarrativeGenerator>,
    ) -> DeliberationState {
        if self.state.is_terminal() {
            return self.state;
        }

        let round = self.round;
        let config = self.config.clone();
        let mut jury = session.jury.clone();
        let mut ids = session.ids.clone();

        self.enter(DeliberationState::Voting);
        let votes_before = jury.tally();
        if let Some(vote) = votes_before.unanimous() {
            let trace = RoundTrace {
                round,
                votes_after: votes_before.clone(),
                votes_before,
                arguments: Vec::new(),
                event: None,
            };
            let next = DeliberationState::Unanimous(vote);
            self.commit(session, jury, ids, trace, next);
            return next;
        }

        self.enter(DeliberationState::Arguing);
        let count = persuasion::speaker_count(round, jury.active_count(), &config);
        let speakers: Vec<JurorId> = jury.ranked_by_leadership().into_iter().take(count).collect();
        let mut arguments = Vec::with_capacity(speakers.len());

        for speaker_id in speakers {
            let Some(speaker) = jury.get(speaker_id).filter(|j| j.is_active()) else {
                continue;
            };
            let vote = speaker.vote();
            let power = persuasion::persuasion_power(speaker, &config);
            let request = narrative::ArgumentRequest::for_speaker(
                speaker,
                round,
                self.foreperson == Some(speaker_id),
                config.memory_window,
            );
            let spoken = narrative::speak(narrator, &request, config.narrative_timeout()).await;

            self.enter(DeliberationState::Persuading);
            let shifts = persuasion::apply_argument(&mut jury, speaker_id, vote, power, &config);
            tracing::debug!(
                round,
                speaker = %speaker_id,
                %vote,
                power,
                source = ?spoken.source,
                "argument"
            );
            arguments.push(ArgumentRecord {
                juror: speaker_id,
                name: request.name,
                vote,
                statement: spoken.statement,
                persuasion_target: spoken.persuasion_target,
                source: spoken.source,
                power,
                shifts,
            });
        }

        let history_turn = session.turn + round;
        for juror in jury.seated.iter_mut().filter(|j| j.is_active()) {
            juror.record_opinion(history_turn);
            juror.expression = derive_expression(juror, &session.config.opinion);
        }

        self.enter(DeliberationState::EventCheck);
        let event =
            session
                .events
                .check(&session.config.events, &jury, round, true, &mut ids, rng);
        if let Some(e) = &event {
            let outcome = apply_event(&mut jury, e);
            tracing::debug!(round, event = e.id, ?outcome, "deliberation event applied");
        }

        let votes_after = jury.tally();
        let next = match votes_after.unanimous() {
            Some(vote) => DeliberationState::Unanimous(vote),
            None if round >= config.round_cap() => DeliberationState::Hung,
            None => DeliberationState::RoundStart,
        };

        let trace = RoundTrace {
            round,
            votes_before,
            arguments,
            event,
            votes_after,
        };
        self.commit(session, jury, ids, trace, next);
        next
    }

    fn commit(
        &mut self,
        session: &mut JurySession,
        jury: Jury,
        ids: IdGenerator,
        trace: RoundTrace,
        next: DeliberationState,
    ) {
        tracing::debug!(
            round = trace.round,
            guilty = trace.votes_after.guilty,
            not_guilty = trace.votes_after.not_guilty,
            arguments = trace.arguments.len(),
            "round complete"
        );
        session.jury = jury;
        session.ids = ids;
        if let Some(e) = &trace.event {
            session.event_log.push(e.clone());
        }
        self.trace.push(trace);
        self.state = next;
        self.round += 1;

        match next {
            DeliberationState::Unanimous(vote) => {
                tracing::info!(%vote, rounds = self.trace.len(), "unanimous verdict");
            }
            DeliberationState::Hung => {
                tracing::info!(rounds = self.trace.len(), "hung jury");
            }
            _ => {}
        }
    }

    /// The outcome, once the deliberation has terminated.
    pub fn result(&self) -> Option<DeliberationResult> {
        let verdict = match self.state {
            DeliberationState::Unanimous(vote) => Verdict::from(vote),
            DeliberationState::Hung => Verdict::Hung,
            _ => return None,
        };
        Some(DeliberationResult {
            verdict,
            unanimous: verdict != Verdict::Hung,
            rounds: self.trace.clone(),
            foreperson: self.foreperson,
            foreperson_name: self.foreperson_name.clone(),
            final_tally: self
                .trace
                .last()
                .map(|t| t.votes_after.clone())
                .unwrap_or_default(),
        })
    }
}

/// Deliberate until the jury agrees or hangs.
pub async fn deliberate(
    session: &mut JurySession,
    rng: &mut dyn RngCore,
    narrator: Option<&dyn NarrativeGenerator>,
) -> DeliberationResult {
    let mut deliberation = Deliberation::begin(session);
    loop {
        if let Some(result) = deliberation.result() {
            return result;
        }
        deliberation.advance(session, rng, narrator).await;
    }
}

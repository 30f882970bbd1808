//! Session-scoped container for one trial: configuration, id source, jury,
//! disruption system, turn counter, and the log of fired jury events.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::config::JuryConfig;
use crate::deliberation::{self, Deliberation, DeliberationResult, NarrativeGenerator};
use crate::error::Result;
use crate::events::{JuryEvent, JuryEventSystem, apply_event};
use crate::id::{IdGenerator, JurorId};
use crate::jury::{Jury, VoteTally, select_jury};
use crate::model::{CourtroomEvent, Expression, JurorPersona, JurorTemplate};
use crate::opinion;
use crate::persona::{builtin_catalog, generate_pool, validate_catalog};

/// How one juror reacted to a courtroom event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpinionChange {
    pub juror: JurorId,
    pub before: f64,
    pub after: f64,
    pub expression: Expression,
}

impl OpinionChange {
    pub fn delta(&self) -> f64 {
        self.after - self.before
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialTurnReport {
    pub turn: u32,
    pub changes: Vec<OpinionChange>,
    pub jury_event: Option<JuryEvent>,
}

pub struct JurySession {
    pub config: JuryConfig,
    pub ids: IdGenerator,
    pub catalog: Vec<JurorTemplate>,
    pub jury: Jury,
    /// Disruption templates; tuning is read from `config.events` on every check.
    pub events: JuryEventSystem,
    /// Trial turns presented so far.
    pub turn: u32,
    pub event_log: Vec<JuryEvent>,
}

impl JurySession {
    /// Session over the built-in archetype catalog, with no jury yet.
    pub fn new(config: JuryConfig) -> Self {
        Self {
            config,
            ids: IdGenerator::new(),
            catalog: builtin_catalog(),
            jury: Jury::default(),
            events: JuryEventSystem::new(),
            turn: 0,
            event_log: Vec::new(),
        }
    }

    /// Session over a caller-supplied catalog, validated up front.
    pub fn with_catalog(config: JuryConfig, catalog: Vec<JurorTemplate>) -> Result<Self> {
        validate_catalog(&catalog)?;
        let mut session = Self::new(config);
        session.catalog = catalog;
        Ok(session)
    }

    /// Session around an already-seated jury. `ids` must continue past every
    /// id the jury already uses.
    pub fn from_jury(config: JuryConfig, jury: Jury, ids: IdGenerator) -> Self {
        let mut session = Self::new(config);
        session.jury = jury;
        session.ids = ids;
        session
    }

    pub fn generate_pool(&mut self, case_id: Option<&str>, rng: &mut dyn RngCore) -> Vec<JurorPersona> {
        generate_pool(&self.catalog, &self.config.pool, case_id, &mut self.ids, rng)
    }

    /// Seat a jury from `pool`, skipping struck personas.
    pub fn empanel(
        &mut self,
        pool: &[JurorPersona],
        struck: &[JurorId],
        rng: &mut dyn RngCore,
    ) -> &Jury {
        self.jury = select_jury(pool, struck, &self.config.selection, rng);
        &self.jury
    }

    /// Play one courtroom event to the jury and alternates, then roll for a
    /// trial-phase jury event.
    pub fn present_event(&mut self, event: &CourtroomEvent, rng: &mut dyn RngCore) -> TrialTurnReport {
        self.turn += 1;
        let turn = self.turn;
        let tuning = &self.config.opinion;

        let mut changes = Vec::new();
        for juror in self
            .jury
            .seated
            .iter_mut()
            .chain(self.jury.alternates.iter_mut())
            .filter(|j| j.is_active())
        {
            let before = juror.opinion;
            *juror = opinion::update(juror, event, turn, tuning);
            changes.push(OpinionChange {
                juror: juror.id(),
                before,
                after: juror.opinion,
                expression: juror.expression,
            });
        }
        tracing::debug!(turn, event = %event.description, jurors = changes.len(), "courtroom event presented");

        let jury_event =
            self.events
                .check(&self.config.events, &self.jury, turn, false, &mut self.ids, rng);
        if let Some(e) = &jury_event {
            let outcome = apply_event(&mut self.jury, e);
            tracing::info!(turn, description = %e.description, ?outcome, "jury event during trial");
            self.event_log.push(e.clone());
        }

        TrialTurnReport {
            turn,
            changes,
            jury_event,
        }
    }

    pub fn tally(&self) -> VoteTally {
        self.jury.tally()
    }

    pub fn begin_deliberation(&self) -> Deliberation {
        Deliberation::begin(self)
    }

    pub async fn deliberate(
        &mut self,
        rng: &mut dyn RngCore,
        narrator: Option<&dyn NarrativeGenerator>,
    ) -> DeliberationResult {
        deliberation::deliberate(self, rng, narrator).await
    }
}

//! Random jury disruptions: illness, misconduct, tampering, conflict, holdouts.
//!
//! At most one event fires per check. Applying an event is idempotent: the
//! jury remembers applied event ids.

pub mod catalog;

pub use catalog::{EVENT_TEMPLATES, EventPhase, JuryEventKind, JuryEventTemplate};

use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::id::{IdGenerator, JurorId};
use crate::jury::{Jury, RemovalOutcome};
use crate::model::TraitRange;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JuryEventConfig {
    pub enabled: bool,
    /// Multiplies every template probability (clamped to 1).
    pub probability_scale: f64,
    /// Chance that tampering removes the juror rather than shifting them.
    pub tampering_removal_chance: f64,
    /// Bystanders with |opinion| below this can be swayed by a conflict.
    pub neutral_bystander_band: f64,
    pub conflict_shift: TraitRange,
    pub tampering_shift: TraitRange,
    pub holdout_drop: TraitRange,
    pub doze_drop: TraitRange,
    pub outburst_severity: TraitRange,
}

impl Default for JuryEventConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            probability_scale: 1.0,
            tampering_removal_chance: 0.5,
            neutral_bystander_band: 20.0,
            conflict_shift: TraitRange::new(5.0, 12.0),
            tampering_shift: TraitRange::new(15.0, 25.0),
            holdout_drop: TraitRange::new(25.0, 40.0),
            doze_drop: TraitRange::new(10.0, 20.0),
            outburst_severity: TraitRange::new(0.1, 0.4),
        }
    }
}

/// State change carried by a jury event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Consequence {
    RemoveJuror { juror: JurorId, reason: String },
    OpinionShift { juror: JurorId, delta: f64 },
    EngagementChange { juror: JurorId, delta: f64 },
    /// Recorded for the host; no jury state changes.
    MistrialRisk { severity: f64 },
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JuryEvent {
    pub id: u64,
    pub kind: JuryEventKind,
    pub turn: u32,
    pub deliberation: bool,
    pub description: String,
    pub target: JurorId,
    pub secondary: Option<JurorId>,
    pub consequence: Consequence,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    AlreadyApplied,
    Removal(RemovalOutcome),
    OpinionShifted { juror: JurorId, delta: f64 },
    EngagementChanged { juror: JurorId, delta: f64 },
    NoChange,
}

/// Disruption generator over a template table. Tuning is passed per check,
/// so the caller's configuration is always the live one.
#[derive(Debug, Clone)]
pub struct JuryEventSystem {
    pub templates: Vec<JuryEventTemplate>,
}

impl Default for JuryEventSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl JuryEventSystem {
    pub fn new() -> Self {
        Self::with_templates(EVENT_TEMPLATES.to_vec())
    }

    pub fn with_templates(templates: Vec<JuryEventTemplate>) -> Self {
        Self { templates }
    }

    /// Roll for one jury event this turn.
    ///
    /// Templates are scanned in shuffled order; the first one whose turn and
    /// phase gates pass and whose probability roll succeeds fires.
    pub fn check(
        &self,
        config: &JuryEventConfig,
        jury: &Jury,
        turn: u32,
        deliberating: bool,
        ids: &mut IdGenerator,
        rng: &mut dyn RngCore,
    ) -> Option<JuryEvent> {
        if !config.enabled {
            return None;
        }
        let active = jury.active_ids();
        if active.is_empty() {
            return None;
        }

        let mut order: Vec<usize> = (0..self.templates.len()).collect();
        order.shuffle(rng);

        for idx in order {
            let template = &self.templates[idx];
            if turn < template.min_turn || !template.phase.allows(deliberating) {
                continue;
            }
            if template.kind == JuryEventKind::Conflict && active.len() < 2 {
                continue;
            }
            let p = (template.probability * config.probability_scale).min(1.0);
            // Also rejects NaN.
            if !(p > 0.0) || !rng.random_bool(p) {
                continue;
            }
            let event =
                Self::build_event(config, template, jury, &active, turn, deliberating, ids, rng);
            if let Some(e) = &event {
                tracing::debug!(id = e.id, kind = ?e.kind, turn, target = %e.target, "jury event fired");
            }
            return event;
        }
        None
    }

    #[allow(clippy::too_many_arguments)]
    fn build_event(
        config: &JuryEventConfig,
        template: &JuryEventTemplate,
        jury: &Jury,
        active: &[JurorId],
        turn: u32,
        deliberating: bool,
        ids: &mut IdGenerator,
        rng: &mut dyn RngCore,
    ) -> Option<JuryEvent> {
        let target = *active.choose(rng)?;
        let mut secondary = None;

        let consequence = match template.kind {
            JuryEventKind::Illness => Consequence::RemoveJuror {
                juror: target,
                reason: "illness".into(),
            },
            JuryEventKind::Misconduct => Consequence::RemoveJuror {
                juror: target,
                reason: "misconduct".into(),
            },
            JuryEventKind::Tampering => {
                if rng.random_bool(config.tampering_removal_chance.clamp(0.0, 1.0)) {
                    Consequence::RemoveJuror {
                        juror: target,
                        reason: "tampering".into(),
                    }
                } else {
                    let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                    Consequence::OpinionShift {
                        juror: target,
                        delta: sign * config.tampering_shift.sample(rng),
                    }
                }
            }
            JuryEventKind::Conflict => {
                let others: Vec<JurorId> =
                    active.iter().copied().filter(|id| *id != target).collect();
                let other = *others.choose(rng)?;
                secondary = Some(other);

                let bystanders: Vec<JurorId> = jury
                    .active()
                    .filter(|j| {
                        j.id() != target
                            && j.id() != other
                            && j.opinion.abs() < config.neutral_bystander_band
                    })
                    .map(|j| j.id())
                    .collect();
                match bystanders.choose(rng) {
                    // The bystander drifts toward whoever started it.
                    Some(&bystander) => {
                        let sign = jury
                            .get(target)
                            .map(|j| j.vote().opinion_sign())
                            .unwrap_or(1.0);
                        Consequence::OpinionShift {
                            juror: bystander,
                            delta: sign * config.conflict_shift.sample(rng),
                        }
                    }
                    None => Consequence::None,
                }
            }
            JuryEventKind::Holdout => Consequence::EngagementChange {
                juror: target,
                delta: -config.holdout_drop.sample(rng),
            },
            JuryEventKind::Dozing => Consequence::EngagementChange {
                juror: target,
                delta: -config.doze_drop.sample(rng),
            },
            JuryEventKind::Outburst => Consequence::MistrialRisk {
                severity: config.outburst_severity.sample(rng),
            },
            JuryEventKind::NoteToJudge => Consequence::None,
        };

        let name = |id: JurorId| {
            jury.get(id)
                .map(|j| j.name().to_string())
                .unwrap_or_else(|| id.to_string())
        };
        let narrative = template.narratives.choose(rng).copied().unwrap_or("{juror}");
        let mut description = narrative.replace("{juror}", &name(target));
        if let Some(other) = secondary {
            description = description.replace("{other}", &name(other));
        }

        Some(JuryEvent {
            id: ids.next_id(),
            kind: template.kind,
            turn,
            deliberation: deliberating,
            description,
            target,
            secondary,
            consequence,
        })
    }
}

/// Apply an event's consequence to the jury. Applying the same event twice is a no-op.
pub fn apply_event(jury: &mut Jury, event: &JuryEvent) -> ApplyOutcome {
    if !jury.applied_events.insert(event.id) {
        return ApplyOutcome::AlreadyApplied;
    }
    match &event.consequence {
        Consequence::RemoveJuror { juror, reason } => {
            ApplyOutcome::Removal(jury.remove_juror(*juror, reason))
        }
        Consequence::OpinionShift { juror, delta } => match jury.active_mut(*juror) {
            Some(j) => {
                let before = j.opinion;
                j.set_opinion(before + delta);
                ApplyOutcome::OpinionShifted {
                    juror: *juror,
                    delta: j.opinion - before,
                }
            }
            None => ApplyOutcome::NoChange,
        },
        Consequence::EngagementChange { juror, delta } => match jury.active_mut(*juror) {
            Some(j) => {
                let before = j.engagement;
                j.set_engagement(before + delta);
                ApplyOutcome::EngagementChanged {
                    juror: *juror,
                    delta: j.engagement - before,
                }
            }
            None => ApplyOutcome::NoChange,
        },
        Consequence::MistrialRisk { severity } => {
            tracing::warn!(severity, description = %event.description, "mistrial risk raised");
            ApplyOutcome::NoChange
        }
        Consequence::None => ApplyOutcome::NoChange,
    }
}

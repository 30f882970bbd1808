//! Seated jury, alternates, and the bookkeeping that keeps seats stable.

use std::collections::BTreeSet;
use std::sync::Arc;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::config::SelectionConfig;
use crate::id::JurorId;
use crate::model::juror::{clamp_opinion, clamp_scale};
use crate::model::{JurorPersona, JurorState, TraitRange, Vote};
use crate::persona::generator::jitter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastVote {
    pub juror: JurorId,
    pub vote: Vote,
}

/// Votes of every active seated juror, projected from opinion sign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
    pub votes: Vec<CastVote>,
    pub guilty: usize,
    pub not_guilty: usize,
}

impl VoteTally {
    pub fn total(&self) -> usize {
        self.guilty + self.not_guilty
    }

    /// The shared vote, if there is at least one juror and all agree.
    pub fn unanimous(&self) -> Option<Vote> {
        match (self.guilty, self.not_guilty) {
            (0, 0) => None,
            (_, 0) => Some(Vote::Guilty),
            (0, _) => Some(Vote::NotGuilty),
            _ => None,
        }
    }

    /// Strict majority, if any.
    pub fn majority(&self) -> Option<Vote> {
        if self.guilty > self.not_guilty {
            Some(Vote::Guilty)
        } else if self.not_guilty > self.guilty {
            Some(Vote::NotGuilty)
        } else {
            None
        }
    }

    pub fn vote_of(&self, juror: JurorId) -> Option<Vote> {
        self.votes.iter().find(|v| v.juror == juror).map(|v| v.vote)
    }
}

/// What happened when a removal was requested.
#[derive(Debug, Clone, PartialEq)]
pub enum RemovalOutcome {
    /// The seat was handed to the next alternate.
    Replaced {
        removed: JurorId,
        replacement: JurorId,
        seat: usize,
    },
    /// No alternate was left; the seat stays empty.
    SeatVacated { removed: JurorId, seat: usize },
    /// An alternate was dismissed from the pool.
    AlternateDismissed { removed: JurorId },
    AlreadyRemoved,
    NotFound,
}

/// The jury for one trial.
///
/// `seated` keeps one entry per seat; a vacated seat keeps its removed juror.
/// `alternates` are promoted front-first and never grow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Jury {
    pub seated: Vec<JurorState>,
    pub alternates: Vec<JurorState>,
    pub dismissed: Vec<JurorState>,
    /// Ids of jury events already applied.
    pub applied_events: BTreeSet<u64>,
}

impl Jury {
    pub fn new(seated: Vec<JurorState>, alternates: Vec<JurorState>) -> Self {
        Self {
            seated,
            alternates,
            dismissed: Vec::new(),
            applied_events: BTreeSet::new(),
        }
    }

    /// Active seated jurors in seat order.
    pub fn active(&self) -> impl Iterator<Item = &JurorState> {
        self.seated.iter().filter(|j| j.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn active_ids(&self) -> Vec<JurorId> {
        self.active().map(|j| j.id()).collect()
    }

    /// Look up a juror anywhere: seated, alternate, or dismissed.
    pub fn get(&self, id: JurorId) -> Option<&JurorState> {
        self.seated
            .iter()
            .chain(self.alternates.iter())
            .chain(self.dismissed.iter())
            .find(|j| j.id() == id)
    }

    /// Mutable access to a seated or alternate juror that has not been removed.
    pub fn active_mut(&mut self, id: JurorId) -> Option<&mut JurorState> {
        self.seated
            .iter_mut()
            .chain(self.alternates.iter_mut())
            .find(|j| j.id() == id && j.is_active())
    }

    pub fn tally(&self) -> VoteTally {
        let mut tally = VoteTally::default();
        for juror in self.active() {
            let vote = juror.vote();
            match vote {
                Vote::Guilty => tally.guilty += 1,
                Vote::NotGuilty => tally.not_guilty += 1,
            }
            tally.votes.push(CastVote {
                juror: juror.id(),
                vote,
            });
        }
        tally
    }

    /// Active juror with the lowest leader/follower value; ties go to the lower seat.
    pub fn select_foreperson(&self) -> Option<JurorId> {
        self.active()
            .min_by(|a, b| {
                a.persona
                    .leader_follower
                    .total_cmp(&b.persona.leader_follower)
                    .then(a.seat.cmp(&b.seat))
            })
            .map(|j| j.id())
    }

    /// Active jurors ordered strongest leader first.
    pub fn ranked_by_leadership(&self) -> Vec<JurorId> {
        let mut ranked: Vec<&JurorState> = self.active().collect();
        ranked.sort_by(|a, b| {
            a.persona
                .leader_follower
                .total_cmp(&b.persona.leader_follower)
                .then(a.seat.cmp(&b.seat))
        });
        ranked.into_iter().map(|j| j.id()).collect()
    }

    /// Remove a juror. A seated juror's seat passes to the next alternate, if any.
    ///
    /// Removing an already-removed juror is a no-op.
    pub fn remove_juror(&mut self, id: JurorId, reason: &str) -> RemovalOutcome {
        if let Some(idx) = self.seated.iter().position(|j| j.id() == id) {
            if self.seated[idx].removed {
                return RemovalOutcome::AlreadyRemoved;
            }
            let seat = self.seated[idx].seat;

            if self.alternates.is_empty() {
                let juror = &mut self.seated[idx];
                juror.removed = true;
                juror.removal_reason = Some(reason.to_string());
                tracing::warn!(juror = %id, seat, reason, "juror removed, no alternate left");
                return RemovalOutcome::SeatVacated { removed: id, seat };
            }

            let mut replacement = self.alternates.remove(0);
            replacement.seat = seat;
            replacement.alternate = false;
            let replacement_id = replacement.id();

            let mut gone = std::mem::replace(&mut self.seated[idx], replacement);
            gone.removed = true;
            gone.removal_reason = Some(reason.to_string());
            self.dismissed.push(gone);

            tracing::info!(
                juror = %id,
                replacement = %replacement_id,
                seat,
                reason,
                "juror removed, alternate seated"
            );
            return RemovalOutcome::Replaced {
                removed: id,
                replacement: replacement_id,
                seat,
            };
        }

        if let Some(idx) = self.alternates.iter().position(|j| j.id() == id) {
            let mut gone = self.alternates.remove(idx);
            gone.removed = true;
            gone.removal_reason = Some(reason.to_string());
            self.dismissed.push(gone);
            tracing::info!(juror = %id, reason, "alternate dismissed");
            return RemovalOutcome::AlternateDismissed { removed: id };
        }

        if self.dismissed.iter().any(|j| j.id() == id) {
            RemovalOutcome::AlreadyRemoved
        } else {
            RemovalOutcome::NotFound
        }
    }
}

/// Build the starting state for one selected juror.
fn initial_state(
    persona: &JurorPersona,
    seat: usize,
    alternate: bool,
    config: &SelectionConfig,
    rng: &mut dyn RngCore,
) -> JurorState {
    let mut state = JurorState::new(Arc::new(persona.clone()), seat, alternate);
    // Prosecution-leaning personas start on the guilty side of the axis.
    state.opinion = clamp_opinion(
        -persona.prosecution_bias * config.initial_opinion_bias_factor
            + jitter(config.initial_opinion_jitter, rng),
    );
    let (lo, hi) = (
        config.initial_confidence_min,
        config.initial_confidence_max.max(config.initial_confidence_min),
    );
    state.confidence = clamp_scale(TraitRange::new(lo, hi).sample(rng));
    state.engagement = clamp_scale(
        persona.attention_span * config.initial_engagement_factor
            + jitter(config.initial_engagement_jitter, rng),
    );
    state.record_opinion(0);
    state
}

/// Seat a jury from a pool: struck personas are skipped, the first
/// `jury_size` remaining are seated in pool order, the next
/// `max_alternates` become alternates with seat numbers continuing on.
pub fn select_jury(
    pool: &[JurorPersona],
    struck: &[JurorId],
    config: &SelectionConfig,
    rng: &mut dyn RngCore,
) -> Jury {
    let eligible: Vec<&JurorPersona> = pool.iter().filter(|p| !struck.contains(&p.id)).collect();

    let seated: Vec<JurorState> = eligible
        .iter()
        .take(config.jury_size)
        .enumerate()
        .map(|(seat, p)| initial_state(p, seat, false, config, rng))
        .collect();

    let first_alternate = seated.len();
    let alternates: Vec<JurorState> = eligible
        .iter()
        .skip(config.jury_size)
        .take(config.max_alternates)
        .enumerate()
        .map(|(i, p)| initial_state(p, first_alternate + i, true, config, rng))
        .collect();

    tracing::info!(
        seated = seated.len(),
        alternates = alternates.len(),
        struck = struck.len(),
        "jury selected"
    );
    Jury::new(seated, alternates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::IdGenerator;
    use crate::persona::{builtin_catalog, generate_pool};
    use crate::config::PoolConfig;
    use crate::scenario::JuryScenario;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn pool(seed: u64) -> Vec<JurorPersona> {
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_pool(
            &builtin_catalog(),
            &PoolConfig::default(),
            None,
            &mut IdGenerator::new(),
            &mut rng,
        )
    }

    #[test]
    fn selects_twelve_and_four() {
        let pool = pool(1);
        let mut rng = SmallRng::seed_from_u64(1);
        let jury = select_jury(&pool, &[], &SelectionConfig::default(), &mut rng);
        assert_eq!(jury.seated.len(), 12);
        assert_eq!(jury.alternates.len(), 4);
        for (i, j) in jury.seated.iter().enumerate() {
            assert_eq!(j.seat, i);
            assert!(!j.alternate);
            assert_eq!(j.id(), pool[i].id);
        }
        for (i, j) in jury.alternates.iter().enumerate() {
            assert_eq!(j.seat, 12 + i);
            assert!(j.alternate);
        }
    }

    #[test]
    fn struck_personas_are_skipped() {
        let pool = pool(2);
        let struck = [pool[0].id, pool[5].id];
        let mut rng = SmallRng::seed_from_u64(2);
        let jury = select_jury(&pool, &struck, &SelectionConfig::default(), &mut rng);
        assert!(jury.get(pool[0].id).is_none());
        assert!(jury.get(pool[5].id).is_none());
        assert_eq!(jury.seated[0].id(), pool[1].id);
        assert_eq!(jury.seated.len(), 12);
        assert_eq!(jury.alternates.len(), 4);
    }

    #[test]
    fn small_pool_fills_what_it_can() {
        let pool: Vec<_> = pool(3).into_iter().take(13).collect();
        let mut rng = SmallRng::seed_from_u64(3);
        let jury = select_jury(&pool, &[], &SelectionConfig::default(), &mut rng);
        assert_eq!(jury.seated.len(), 12);
        assert_eq!(jury.alternates.len(), 1);
    }

    #[test]
    fn initial_opinion_tilts_with_bias() {
        let config = SelectionConfig {
            initial_opinion_jitter: 0.0,
            ..SelectionConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(4);
        for p in pool(4) {
            let state = initial_state(&p, 0, false, &config, &mut rng);
            assert!((state.opinion + p.prosecution_bias * 0.3).abs() < 1e-9);
            assert!((10.0..=30.0).contains(&state.confidence));
            assert_eq!(state.opinion_history.len(), 1);
        }
    }

    #[test]
    fn removal_promotes_alternate_into_same_seat() {
        let mut s = JuryScenario::new();
        let ids = s.jurors_at(12, 10.0);
        let alt = s.alternate().opinion(-5.0).id();
        s.alternate();
        let mut jury = s.build();

        let outcome = jury.remove_juror(ids[3], "illness");
        assert_eq!(
            outcome,
            RemovalOutcome::Replaced { removed: ids[3], replacement: alt, seat: 3 }
        );
        assert_eq!(jury.seated[3].id(), alt);
        assert_eq!(jury.seated[3].seat, 3);
        assert!(!jury.seated[3].alternate);
        assert!(jury.seated[3].is_active());
        assert_eq!(jury.alternates.len(), 1);
        let gone = jury.get(ids[3]).unwrap();
        assert!(gone.removed);
        assert_eq!(gone.removal_reason.as_deref(), Some("illness"));
        assert_eq!(jury.active_count(), 12);
    }

    #[test]
    fn removal_without_alternates_vacates_seat() {
        let mut s = JuryScenario::new();
        let ids = s.jurors_at(3, 10.0);
        let mut jury = s.build();
        assert_eq!(
            jury.remove_juror(ids[1], "misconduct"),
            RemovalOutcome::SeatVacated { removed: ids[1], seat: 1 }
        );
        assert_eq!(jury.active_count(), 2);
        assert_eq!(jury.tally().total(), 2);
    }

    #[test]
    fn removing_twice_is_noop() {
        let mut s = JuryScenario::new();
        let ids = s.jurors_at(2, 10.0);
        s.alternate();
        let mut jury = s.build();
        jury.remove_juror(ids[0], "illness");
        let snapshot = jury.clone();
        assert_eq!(jury.remove_juror(ids[0], "illness"), RemovalOutcome::AlreadyRemoved);
        assert_eq!(jury, snapshot);
    }

    #[test]
    fn unknown_juror_not_found() {
        let mut jury = JuryScenario::new().build();
        assert_eq!(jury.remove_juror(JurorId(99), "x"), RemovalOutcome::NotFound);
    }

    #[test]
    fn tally_projects_sign() {
        let mut s = JuryScenario::new();
        s.jurors_at(3, 20.0);
        s.jurors_at(2, 0.0);
        let tally = s.build().tally();
        assert_eq!(tally.not_guilty, 3);
        assert_eq!(tally.guilty, 2);
        assert_eq!(tally.unanimous(), None);
        assert_eq!(tally.majority(), Some(Vote::NotGuilty));
    }

    #[test]
    fn empty_tally_is_not_unanimous() {
        assert_eq!(VoteTally::default().unanimous(), None);
    }

    #[test]
    fn foreperson_is_lowest_leader_follower_even_after_removal() {
        let mut s = JuryScenario::new();
        let a = s.juror().leader_follower(30.0).id();
        let b = s.juror().leader_follower(5.0).id();
        let c = s.juror().leader_follower(12.0).id();
        let mut jury = s.build();
        assert_eq!(jury.select_foreperson(), Some(b));
        jury.remove_juror(b, "illness");
        assert_eq!(jury.select_foreperson(), Some(c));
        assert_eq!(jury.ranked_by_leadership(), vec![c, a]);
    }

    #[test]
    fn foreperson_tie_goes_to_lower_seat() {
        let mut s = JuryScenario::new();
        let a = s.juror().leader_follower(10.0).id();
        s.juror().leader_follower(10.0);
        assert_eq!(s.build().select_foreperson(), Some(a));
    }
}

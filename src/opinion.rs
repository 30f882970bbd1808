//! Per-juror opinion model: how one courtroom event moves one juror.
//!
//! Everything here is a pure function of its inputs. Positive impact always
//! means "toward acquittal".

use serde::{Deserialize, Serialize};

use crate::model::juror::clamp_scale;
use crate::model::{CourtroomEvent, EventCategory, Expression, JurorState, Memory};

/// Balance constants for the opinion model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpinionTuning {
    /// Multiplier when the event category matches the juror's disposition.
    pub disposition_multiplier: f64,
    /// Split point of the 0-100 analytical/emotional scale.
    pub disposition_midpoint: f64,
    /// Weight of the persona's prosecution bias on side-tagged events.
    pub side_bias_scale: f64,
    /// Weight of each matching topic bias.
    pub topic_bias_scale: f64,
    pub trigger_multiplier: f64,
    /// Confidence gained per point of applied impact.
    pub confidence_gain: f64,
    /// Felt impact above which engagement rises instead of decaying.
    pub engagement_threshold: f64,
    pub engagement_gain: f64,
    pub engagement_decay: f64,
    /// Applied impact above which the event is remembered.
    pub memory_threshold: f64,
    pub bored_below: f64,
    pub shocked_above: f64,
    pub swing_above: f64,
    pub confident_above: f64,
    pub skeptical_above: f64,
}

impl Default for OpinionTuning {
    fn default() -> Self {
        Self {
            disposition_multiplier: 1.5,
            disposition_midpoint: 50.0,
            side_bias_scale: 0.1,
            topic_bias_scale: 0.1,
            trigger_multiplier: 2.0,
            confidence_gain: 0.5,
            engagement_threshold: 3.0,
            engagement_gain: 2.0,
            engagement_decay: 1.0,
            memory_threshold: 2.0,
            bored_below: 20.0,
            shocked_above: 15.0,
            swing_above: 5.0,
            confident_above: 70.0,
            skeptical_above: 70.0,
        }
    }
}

/// How hard one event hits one juror, before it is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactAssessment {
    /// Unsigned-frame impact after every multiplier, in the favored side's direction.
    pub felt: f64,
    /// Signed change to opinion (+ = toward acquittal).
    pub applied: f64,
    pub disposition_match: bool,
    pub triggered: bool,
}

fn disposition_matches(state: &JurorState, category: EventCategory, tuning: &OpinionTuning) -> bool {
    let persona = &state.persona;
    match category {
        EventCategory::Emotional => persona.is_emotional(tuning.disposition_midpoint),
        EventCategory::Analytical => persona.is_analytical(tuning.disposition_midpoint),
        EventCategory::Procedural => false,
    }
}

pub fn assess_impact(
    state: &JurorState,
    event: &CourtroomEvent,
    tuning: &OpinionTuning,
) -> ImpactAssessment {
    let persona = &state.persona;
    let side = event.favors.bias_sign();

    let mut impact = if event.base_impact.is_finite() {
        event.base_impact
    } else {
        0.0
    };

    let disposition_match = disposition_matches(state, event.category, tuning);
    if disposition_match {
        impact *= tuning.disposition_multiplier;
    }

    // Jurors already leaning toward the favored side feel its evidence more.
    impact += persona.prosecution_bias * tuning.side_bias_scale * side;

    for tag in &event.tags {
        if let Some(bias) = persona.topic_biases.get(tag) {
            impact += bias * tuning.topic_bias_scale * side;
        }
    }

    impact *= clamp_scale(state.engagement) / 100.0;

    let triggered = persona.triggered_by(&event.tags);
    if triggered {
        impact *= tuning.trigger_multiplier;
    }

    ImpactAssessment {
        felt: impact,
        applied: impact * event.favors.opinion_sign(),
        disposition_match,
        triggered,
    }
}

/// Apply one courtroom event to one juror and return the updated state.
///
/// Removed jurors come back unchanged.
pub fn update(
    state: &JurorState,
    event: &CourtroomEvent,
    turn: u32,
    tuning: &OpinionTuning,
) -> JurorState {
    let mut next = state.clone();
    if state.removed {
        return next;
    }

    let impact = assess_impact(state, event, tuning);

    next.set_opinion(state.opinion + impact.applied);
    next.set_confidence(state.confidence + impact.applied.abs() * tuning.confidence_gain);
    if impact.felt.abs() > tuning.engagement_threshold {
        next.set_engagement(state.engagement + tuning.engagement_gain);
    } else {
        next.set_engagement(state.engagement - tuning.engagement_decay);
    }

    next.record_opinion(turn);

    if impact.applied.abs() > tuning.memory_threshold {
        next.memories.push(Memory {
            turn,
            description: event.description.clone(),
            impact: impact.applied,
            emotional: event.category == EventCategory::Emotional || impact.triggered,
        });
    }

    next.expression = derive_expression(&next, tuning);
    next
}

/// Pick the expression a juror shows right now.
pub fn derive_expression(state: &JurorState, tuning: &OpinionTuning) -> Expression {
    if state.engagement < tuning.bored_below {
        return Expression::Bored;
    }

    if let [.., prev, last] = state.opinion_history.as_slice() {
        let swing = last.opinion - prev.opinion;
        if swing.abs() > tuning.shocked_above {
            return Expression::Shocked;
        }
        if swing > tuning.swing_above {
            return if state.opinion > 0.0 {
                Expression::Sympathetic
            } else {
                Expression::Thoughtful
            };
        }
    }

    if state.confidence > tuning.confident_above {
        Expression::Confident
    } else if state.persona.skepticism > tuning.skeptical_above {
        Expression::Skeptical
    } else {
        Expression::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OpinionSnapshot, Side};
    use crate::scenario::JuryScenario;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn juror(setup: impl FnOnce(&mut JuryScenario) -> crate::id::JurorId) -> JurorState {
        let mut s = JuryScenario::new();
        let id = setup(&mut s);
        s.build().get(id).unwrap().clone()
    }

    fn emotional_event() -> CourtroomEvent {
        CourtroomEvent::new("Victim's mother weeps", EventCategory::Emotional, 10.0, Side::Prosecution)
    }

    #[test]
    fn prosecution_event_moves_toward_guilty() {
        let j = juror(|s| s.juror().id());
        let next = update(&j, &emotional_event(), 1, &OpinionTuning::default());
        assert!(next.opinion < j.opinion);
    }

    #[test]
    fn defense_event_moves_toward_acquittal() {
        let j = juror(|s| s.juror().id());
        let event = CourtroomEvent::new("Alibi confirmed", EventCategory::Analytical, 8.0, Side::Defense);
        let next = update(&j, &event, 1, &OpinionTuning::default());
        assert!(next.opinion > j.opinion);
    }

    #[test]
    fn neutral_event_leaves_opinion() {
        let j = juror(|s| s.juror().opinion(12.0).prosecution_bias(30.0).id());
        let event = CourtroomEvent::new("Recess", EventCategory::Procedural, 10.0, Side::Neutral);
        let next = update(&j, &event, 1, &OpinionTuning::default());
        assert_eq!(next.opinion, 12.0);
        assert!(next.memories.is_empty());
    }

    #[test]
    fn emotional_juror_hit_harder_by_emotional_event() {
        let tuning = OpinionTuning::default();
        let hot = juror(|s| s.juror().analytical_emotional(75.0).id());
        let cold = juror(|s| s.juror().analytical_emotional(25.0).id());
        let event = emotional_event();
        let d_hot = (update(&hot, &event, 1, &tuning).opinion - hot.opinion).abs();
        let d_cold = (update(&cold, &event, 1, &tuning).opinion - cold.opinion).abs();
        assert!(d_hot > d_cold, "hot={d_hot} cold={d_cold}");
    }

    #[test]
    fn analytical_juror_hit_harder_by_analytical_event() {
        let tuning = OpinionTuning::default();
        let hot = juror(|s| s.juror().analytical_emotional(75.0).id());
        let cold = juror(|s| s.juror().analytical_emotional(25.0).id());
        let event = CourtroomEvent::new("DNA match", EventCategory::Analytical, 10.0, Side::Prosecution);
        let d_hot = assess_impact(&hot, &event, &tuning).applied.abs();
        let d_cold = assess_impact(&cold, &event, &tuning).applied.abs();
        assert!(d_cold > d_hot);
    }

    #[test]
    fn trigger_topic_strictly_increases_impact() {
        let tuning = OpinionTuning::default();
        let j = juror(|s| s.juror().trigger("child_victim").id());
        let plain = emotional_event().with_tags(["violence"]);
        let triggering = emotional_event().with_tags(["violence", "child_victim"]);
        let a = assess_impact(&j, &plain, &tuning).applied.abs();
        let b = assess_impact(&j, &triggering, &tuning).applied.abs();
        assert!(b > a, "trigger {b} should exceed plain {a}");
    }

    #[test]
    fn disengaged_juror_barely_moves() {
        let tuning = OpinionTuning::default();
        let sleepy = juror(|s| s.juror().engagement(5.0).id());
        let alert = juror(|s| s.juror().engagement(100.0).id());
        let event = emotional_event();
        assert!(
            assess_impact(&sleepy, &event, &tuning).applied.abs()
                < assess_impact(&alert, &event, &tuning).applied.abs() / 10.0
        );
    }

    #[test]
    fn side_bias_amplifies_favored_side() {
        let tuning = OpinionTuning::default();
        let pro = juror(|s| s.juror().prosecution_bias(40.0).id());
        let anti = juror(|s| s.juror().prosecution_bias(-40.0).id());
        let event = CourtroomEvent::new("Confession", EventCategory::Procedural, 10.0, Side::Prosecution);
        assert!(assess_impact(&pro, &event, &tuning).felt > assess_impact(&anti, &event, &tuning).felt);
    }

    #[test]
    fn topic_bias_adds_contribution() {
        let tuning = OpinionTuning::default();
        let j = juror(|s| s.juror().topic_bias("police", 30.0).id());
        let event = CourtroomEvent::new("Officer testifies", EventCategory::Procedural, 5.0, Side::Prosecution);
        let without = assess_impact(&j, &event, &tuning).felt;
        let with = assess_impact(&j, &event.clone().with_tags(["police"]), &tuning).felt;
        assert!((with - without - 3.0).abs() < 1e-9, "with={with} without={without}");
    }

    #[test]
    fn bounds_hold_for_random_states_and_events() {
        let tuning = OpinionTuning::default();
        let mut rng = SmallRng::seed_from_u64(2024);
        let categories = [EventCategory::Emotional, EventCategory::Analytical, EventCategory::Procedural];
        let sides = [Side::Prosecution, Side::Defense, Side::Neutral];
        for i in 0..2000 {
            let mut s = JuryScenario::new();
            let id = s
                .juror()
                .opinion(rng.random_range(-100.0..=100.0))
                .confidence(rng.random_range(0.0..=100.0))
                .engagement(rng.random_range(0.0..=100.0))
                .analytical_emotional(rng.random_range(0.0..=100.0))
                .prosecution_bias(rng.random_range(-50.0..=50.0))
                .topic_bias("police", rng.random_range(-50.0..=50.0))
                .trigger("police")
                .id();
            let state = s.build().get(id).unwrap().clone();
            let event = CourtroomEvent::new(
                "random",
                categories[i % 3],
                rng.random_range(-500.0..=500.0),
                sides[(i / 3) % 3],
            )
            .with_tags(["police"]);
            let next = update(&state, &event, 1, &tuning);
            assert!((-100.0..=100.0).contains(&next.opinion), "opinion {}", next.opinion);
            assert!((0.0..=100.0).contains(&next.confidence), "confidence {}", next.confidence);
            assert!((0.0..=100.0).contains(&next.engagement), "engagement {}", next.engagement);
        }
    }

    #[test]
    fn non_finite_impact_is_ignored() {
        let j = juror(|s| s.juror().opinion(10.0).id());
        let event = CourtroomEvent::new("glitch", EventCategory::Emotional, f64::NAN, Side::Defense);
        let next = update(&j, &event, 1, &OpinionTuning::default());
        assert_eq!(next.opinion, 10.0);
    }

    #[test]
    fn engagement_rises_on_big_events_and_decays_on_small() {
        let tuning = OpinionTuning::default();
        let j = juror(|s| s.juror().engagement(50.0).id());
        let big = update(&j, &emotional_event(), 1, &tuning);
        assert_eq!(big.engagement, 52.0);
        let small = CourtroomEvent::new("Sidebar", EventCategory::Procedural, 1.0, Side::Defense);
        assert_eq!(update(&j, &small, 1, &tuning).engagement, 49.0);
    }

    #[test]
    fn engagement_decay_floors_at_zero() {
        let j = juror(|s| s.juror().engagement(0.5).id());
        let small = CourtroomEvent::new("Sidebar", EventCategory::Procedural, 1.0, Side::Defense);
        assert_eq!(update(&j, &small, 1, &OpinionTuning::default()).engagement, 0.0);
    }

    #[test]
    fn memory_only_for_significant_impact() {
        let tuning = OpinionTuning::default();
        let j = juror(|s| s.juror().id());
        let minor = CourtroomEvent::new("Minor", EventCategory::Procedural, 1.0, Side::Defense);
        assert!(update(&j, &minor, 1, &tuning).memories.is_empty());

        let major = update(&j, &emotional_event(), 4, &tuning);
        assert_eq!(major.memories.len(), 1);
        let m = &major.memories[0];
        assert_eq!(m.turn, 4);
        assert!(m.emotional);
        assert!(m.impact < 0.0);
    }

    #[test]
    fn confidence_gains_half_the_applied_impact() {
        let tuning = OpinionTuning::default();
        let j = juror(|s| s.juror().confidence(20.0).id());
        let event = CourtroomEvent::new("Receipt", EventCategory::Procedural, 8.0, Side::Defense);
        let next = update(&j, &event, 1, &tuning);
        let applied = next.opinion - j.opinion;
        assert!((next.confidence - (20.0 + applied.abs() * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn removed_juror_is_untouched() {
        let mut s = JuryScenario::new();
        let id = s.juror().opinion(5.0).id();
        let mut jury = s.build();
        jury.remove_juror(id, "illness");
        let state = jury.get(id).unwrap();
        let next = update(state, &emotional_event(), 1, &OpinionTuning::default());
        assert_eq!(&next, state);
    }

    #[test]
    fn update_does_not_mutate_input() {
        let j = juror(|s| s.juror().id());
        let before = j.clone();
        let _ = update(&j, &emotional_event(), 1, &OpinionTuning::default());
        assert_eq!(j, before);
    }

    fn with_history(mut state: JurorState, points: &[f64]) -> JurorState {
        state.opinion_history = points
            .iter()
            .enumerate()
            .map(|(i, &opinion)| OpinionSnapshot { turn: i as u32, opinion })
            .collect();
        state.opinion = *points.last().unwrap_or(&0.0);
        state
    }

    #[test]
    fn expression_bored_when_disengaged() {
        let j = juror(|s| s.juror().engagement(10.0).id());
        assert_eq!(derive_expression(&with_history(j, &[0.0, 40.0]), &OpinionTuning::default()), Expression::Bored);
    }

    #[test]
    fn expression_shocked_on_big_swing_either_way() {
        let tuning = OpinionTuning::default();
        let j = juror(|s| s.juror().id());
        assert_eq!(derive_expression(&with_history(j.clone(), &[10.0, -10.0]), &tuning), Expression::Shocked);
        assert_eq!(derive_expression(&with_history(j, &[-10.0, 10.0]), &tuning), Expression::Shocked);
    }

    #[test]
    fn expression_moderate_positive_swing_depends_on_sign() {
        let tuning = OpinionTuning::default();
        let j = juror(|s| s.juror().id());
        assert_eq!(derive_expression(&with_history(j.clone(), &[5.0, 15.0]), &tuning), Expression::Sympathetic);
        assert_eq!(derive_expression(&with_history(j, &[-20.0, -10.0]), &tuning), Expression::Thoughtful);
    }

    #[test]
    fn expression_defaults() {
        let tuning = OpinionTuning::default();
        let confident = juror(|s| s.juror().confidence(90.0).id());
        assert_eq!(derive_expression(&confident, &tuning), Expression::Confident);
        let skeptic = juror(|s| s.juror().confidence(40.0).skepticism(85.0).id());
        assert_eq!(derive_expression(&skeptic, &tuning), Expression::Skeptical);
        let plain = juror(|s| s.juror().confidence(40.0).id());
        assert_eq!(derive_expression(&plain, &tuning), Expression::Neutral);
    }
}

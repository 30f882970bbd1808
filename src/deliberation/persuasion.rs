use serde::{Deserialize, Serialize};

use super::DeliberationConfig;
use crate::id::JurorId;
use crate::jury::Jury;
use crate::model::{JurorState, Vote};

/// Opinion change one argument caused in one listener, after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersuasionShift {
    pub juror: JurorId,
    pub delta: f64,
}

/// How many of the ranked jurors speak this round.
///
/// The share of speakers tapers from the early fraction to the late one as
/// the talk runs dry, never below `min_speakers` and never above the jury.
pub fn speaker_count(round: u32, active: usize, config: &DeliberationConfig) -> usize {
    let fraction = if round <= config.early_rounds {
        config.early_speaker_fraction
    } else {
        let tapered = config.early_speaker_fraction
            - config.speaker_taper * f64::from(round - config.early_rounds);
        tapered.max(config.late_speaker_fraction)
    };
    let wanted = (active as f64 * fraction).ceil() as usize;
    wanted.max(config.min_speakers).min(active)
}

/// Weighted blend of leadership and confidence, on 0..1.
pub fn persuasion_power(speaker: &JurorState, config: &DeliberationConfig) -> f64 {
    let total = config.leadership_weight + config.confidence_weight;
    if total <= 0.0 {
        return 0.0;
    }
    let blended = config.leadership_weight * speaker.persona.leadership / 100.0
        + config.confidence_weight * speaker.confidence / 100.0;
    (blended / total).clamp(0.0, 1.0)
}

/// Signed opinion shift an argument for `direction` exerts on `listener`.
pub fn persuasion_shift(
    power: f64,
    direction: Vote,
    listener: &JurorState,
    config: &DeliberationConfig,
) -> f64 {
    let resistance = (listener.persona.persuasion_resistance / 100.0).clamp(0.0, 1.0);
    let openness = 1.0 + config.follower_boost * listener.persona.follower_tendency();
    let sign = direction.opinion_sign();
    let shift = power * (1.0 - resistance) * openness * config.persuasion_amplifier * sign;

    if listener.opinion * sign > config.ally_threshold {
        shift * config.ally_dampening
    } else {
        shift
    }
}

/// Apply one argument to every other active seated juror.
pub fn apply_argument(
    jury: &mut Jury,
    speaker: JurorId,
    direction: Vote,
    power: f64,
    config: &DeliberationConfig,
) -> Vec<PersuasionShift> {
    jury.seated
        .iter_mut()
        .filter(|j| j.is_active() && j.id() != speaker)
        .map(|listener| {
            let before = listener.opinion;
            let shift = persuasion_shift(power, direction, listener, config);
            listener.set_opinion(before + shift);
            let delta = listener.opinion - before;
            listener.set_confidence(listener.confidence + delta.abs() * config.confidence_gain);
            PersuasionShift {
                juror: listener.id(),
                delta,
            }
        })
        .collect()
}

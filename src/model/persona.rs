use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::template::{DeliberationStyle, TriggerDirection};
use crate::id::JurorId;

/// One concrete juror drawn from an archetype template. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurorPersona {
    pub id: JurorId,
    pub archetype: String,
    pub name: String,
    pub age: u32,
    pub occupation: String,
    pub background: String,
    pub analytical_emotional: f64,
    pub trust: f64,
    pub skepticism: f64,
    pub leader_follower: f64,
    pub attention_span: f64,
    pub persuasion_resistance: f64,
    /// -50 (defense-leaning) to +50 (prosecution-leaning).
    pub prosecution_bias: f64,
    pub topic_biases: BTreeMap<String, f64>,
    pub trigger_topics: Vec<String>,
    /// Colors how the persona is described. Opinion updates only use the
    /// trigger topics, which amplify impact whichever side the event favors.
    pub trigger_direction: TriggerDirection,
    pub leadership: f64,
    pub deliberation_style: DeliberationStyle,
}

impl JurorPersona {
    pub fn is_emotional(&self, threshold: f64) -> bool {
        self.analytical_emotional > threshold
    }

    pub fn is_analytical(&self, threshold: f64) -> bool {
        self.analytical_emotional < threshold
    }

    pub fn triggered_by<'a>(&self, tags: impl IntoIterator<Item = &'a String>) -> bool {
        tags.into_iter().any(|t| self.trigger_topics.contains(t))
    }

    /// Follower tendency on 0..1 (1 = pure follower).
    pub fn follower_tendency(&self) -> f64 {
        (self.leader_follower / 100.0).clamp(0.0, 1.0)
    }

    /// Short third-person description used when asking for argument text.
    pub fn summary(&self) -> String {
        let lean = match self.prosecution_bias {
            b if b > 15.0 => "inclined to trust the prosecution",
            b if b < -15.0 => "wary of the prosecution",
            _ => "without an obvious lean",
        };
        let temperament = if self.analytical_emotional > 60.0 {
            "driven by feeling"
        } else if self.analytical_emotional < 40.0 {
            "driven by evidence"
        } else {
            "balanced between evidence and feeling"
        };
        let mut summary = format!(
            "{}, {}, {} ({}). {} Tends to be {temperament}, {lean}.",
            self.name, self.age, self.occupation, self.archetype, self.background
        );
        if !self.trigger_topics.is_empty() {
            let toward = match self.trigger_direction {
                TriggerDirection::Sympathetic => "sympathetic to the accused",
                TriggerDirection::Hostile => "hostile to the accused",
            };
            summary.push_str(&format!(
                " Reacts strongly to {}, usually {toward}.",
                self.trigger_topics.join(", ")
            ));
        }
        summary
    }
}

use std::collections::BTreeMap;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{JuryError, Result};

/// Inclusive min/max pair a persona trait is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitRange {
    pub min: f64,
    pub max: f64,
}

impl TraitRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Uniform draw within the range (both ends inclusive).
    pub fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn check(&self, id: &str, name: &str, lo: f64, hi: f64) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(JuryError::InvalidTemplate {
                id: id.to_string(),
                reason: format!("{name} range {}..{} is not ordered", self.min, self.max),
            });
        }
        if self.min < lo || self.max > hi {
            return Err(JuryError::InvalidTemplate {
                id: id.to_string(),
                reason: format!("{name} range {}..{} leaves {lo}..{hi}", self.min, self.max),
            });
        }
        Ok(())
    }
}

/// Whether a juror's trigger topics make them lean toward or against the accused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerDirection {
    Sympathetic,
    Hostile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliberationStyle {
    Methodical,
    Passionate,
    Authoritative,
    Consensus,
    Contrarian,
    Reserved,
}

/// One archetype in the juror catalog. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurorTemplate {
    pub id: String,
    pub description: String,
    pub occupations: Vec<String>,
    pub age: TraitRange,
    /// 0 = purely analytical, 100 = purely emotional.
    pub analytical_emotional: TraitRange,
    pub trust: TraitRange,
    pub skepticism: TraitRange,
    /// 0 = natural leader, 100 = follower.
    pub leader_follower: TraitRange,
    pub attention_span: TraitRange,
    pub persuasion_resistance: TraitRange,
    /// Topic -> bias tendency, -50 (defense-leaning) to +50 (prosecution-leaning).
    pub topic_biases: BTreeMap<String, f64>,
    pub trigger_topics: Vec<String>,
    pub trigger_direction: TriggerDirection,
    pub leadership: f64,
    pub deliberation_style: DeliberationStyle,
    /// Background blurb; `{occupation}` and `{age}` are substituted per persona.
    pub background: String,
}

impl JurorTemplate {
    pub fn validate(&self) -> Result<()> {
        let id = self.id.as_str();
        if id.trim().is_empty() {
            return Err(JuryError::InvalidTemplate {
                id: id.to_string(),
                reason: "id cannot be empty".into(),
            });
        }
        if self.occupations.is_empty() {
            return Err(JuryError::InvalidTemplate {
                id: id.to_string(),
                reason: "needs at least one occupation".into(),
            });
        }
        self.age.check(id, "age", 18.0, 100.0)?;
        for (name, range) in [
            ("analytical_emotional", &self.analytical_emotional),
            ("trust", &self.trust),
            ("skepticism", &self.skepticism),
            ("leader_follower", &self.leader_follower),
            ("attention_span", &self.attention_span),
            ("persuasion_resistance", &self.persuasion_resistance),
        ] {
            range.check(id, name, 0.0, 100.0)?;
        }
        if !(0.0..=100.0).contains(&self.leadership) {
            return Err(JuryError::InvalidTemplate {
                id: id.to_string(),
                reason: format!("leadership {} outside 0..100", self.leadership),
            });
        }
        if let Some((topic, bias)) = self
            .topic_biases
            .iter()
            .find(|(_, b)| !(-50.0..=50.0).contains(*b))
        {
            return Err(JuryError::InvalidTemplate {
                id: id.to_string(),
                reason: format!("bias {bias} for '{topic}' outside -50..50"),
            });
        }
        Ok(())
    }

    /// Mean of the jitter-free topic biases, 0 when the map is empty.
    pub fn mean_topic_bias(&self) -> f64 {
        if self.topic_biases.is_empty() {
            return 0.0;
        }
        self.topic_biases.values().sum::<f64>() / self.topic_biases.len() as f64
    }
}

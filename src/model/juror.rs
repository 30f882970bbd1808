use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::persona::JurorPersona;
use crate::id::JurorId;

pub const OPINION_MIN: f64 = -100.0;
pub const OPINION_MAX: f64 = 100.0;
pub const SCALE_MIN: f64 = 0.0;
pub const SCALE_MAX: f64 = 100.0;

pub fn clamp_opinion(v: f64) -> f64 {
    v.clamp(OPINION_MIN, OPINION_MAX)
}

pub fn clamp_scale(v: f64) -> f64 {
    v.clamp(SCALE_MIN, SCALE_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    Guilty,
    NotGuilty,
}

impl Vote {
    /// Projection of opinion onto a vote: anything at or below zero votes guilty.
    pub fn from_opinion(opinion: f64) -> Self {
        if opinion > 0.0 {
            Vote::NotGuilty
        } else {
            Vote::Guilty
        }
    }

    /// Direction on the opinion axis this vote pulls toward.
    pub fn opinion_sign(self) -> f64 {
        match self {
            Vote::Guilty => -1.0,
            Vote::NotGuilty => 1.0,
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vote::Guilty => f.write_str("guilty"),
            Vote::NotGuilty => f.write_str("not guilty"),
        }
    }
}

/// Facial expression shown by rendering layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    #[default]
    Neutral,
    Bored,
    Shocked,
    Sympathetic,
    Thoughtful,
    Confident,
    Skeptical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub turn: u32,
    pub description: String,
    /// Signed applied impact (+ = toward acquittal).
    pub impact: f64,
    pub emotional: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpinionSnapshot {
    pub turn: u32,
    pub opinion: f64,
}

/// Mutable per-juror state for one trial. The persona it points at never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurorState {
    pub persona: Arc<JurorPersona>,
    /// -100 (convinced guilty) to +100 (convinced not guilty).
    pub opinion: f64,
    pub confidence: f64,
    pub engagement: f64,
    pub expression: Expression,
    pub memories: Vec<Memory>,
    pub opinion_history: Vec<OpinionSnapshot>,
    pub seat: usize,
    pub alternate: bool,
    pub removed: bool,
    pub removal_reason: Option<String>,
}

impl JurorState {
    pub fn new(persona: Arc<JurorPersona>, seat: usize, alternate: bool) -> Self {
        Self {
            persona,
            opinion: 0.0,
            confidence: 0.0,
            engagement: 50.0,
            expression: Expression::Neutral,
            memories: Vec::new(),
            opinion_history: Vec::new(),
            seat,
            alternate,
            removed: false,
            removal_reason: None,
        }
    }

    pub fn id(&self) -> JurorId {
        self.persona.id
    }

    pub fn name(&self) -> &str {
        &self.persona.name
    }

    pub fn is_active(&self) -> bool {
        !self.removed
    }

    pub fn vote(&self) -> Vote {
        Vote::from_opinion(self.opinion)
    }

    pub fn set_opinion(&mut self, value: f64) {
        self.opinion = clamp_opinion(value);
    }

    pub fn set_confidence(&mut self, value: f64) {
        self.confidence = clamp_scale(value);
    }

    pub fn set_engagement(&mut self, value: f64) {
        self.engagement = clamp_scale(value);
    }

    /// Append a history point for the current opinion.
    pub fn record_opinion(&mut self, turn: u32) {
        self.opinion_history.push(OpinionSnapshot {
            turn,
            opinion: self.opinion,
        });
    }

    pub fn recent_memories(&self, n: usize) -> &[Memory] {
        let start = self.memories.len().saturating_sub(n);
        &self.memories[start..]
    }
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::deliberation::DeliberationConfig;
use crate::error::{JuryError, Result};
use crate::events::JuryEventConfig;
use crate::opinion::OpinionTuning;

/// Knobs for persona pool generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Personas to generate per case (seated + alternates + spares for striking).
    pub pool_size: usize,
    /// Symmetric jitter added to every topic bias.
    pub bias_jitter: f64,
    /// Symmetric jitter added to the derived prosecution bias.
    pub prosecution_jitter: f64,
    /// Name draws before falling back to a numbered placeholder.
    pub name_attempts: u32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_size: 18,
            bias_jitter: 10.0,
            prosecution_jitter: 10.0,
            name_attempts: 20,
        }
    }
}

/// Knobs for turning a pool into a seated jury.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub jury_size: usize,
    pub max_alternates: usize,
    /// Fraction of prosecution bias carried into the starting opinion.
    pub initial_opinion_bias_factor: f64,
    pub initial_opinion_jitter: f64,
    pub initial_confidence_min: f64,
    pub initial_confidence_max: f64,
    /// Fraction of attention span carried into the starting engagement.
    pub initial_engagement_factor: f64,
    pub initial_engagement_jitter: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            jury_size: 12,
            max_alternates: 4,
            initial_opinion_bias_factor: 0.3,
            initial_opinion_jitter: 5.0,
            initial_confidence_min: 10.0,
            initial_confidence_max: 30.0,
            initial_engagement_factor: 0.6,
            initial_engagement_jitter: 10.0,
        }
    }
}

/// Full configuration of a jury session.
///
/// Every section defaults independently, so a JSON document only needs the
/// knobs it wants to change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JuryConfig {
    pub pool: PoolConfig,
    pub selection: SelectionConfig,
    pub opinion: OpinionTuning,
    pub events: JuryEventConfig,
    pub deliberation: DeliberationConfig,
}

impl JuryConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| JuryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

use serde::{Deserialize, Serialize};

/// How an event lands on a juror: by feeling, by reasoning, or as court procedure.
///
/// Parsing is lenient: anything unrecognized becomes `Procedural`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventCategory {
    Emotional,
    Analytical,
    Procedural,
}

impl From<EventCategory> for String {
    fn from(c: EventCategory) -> Self {
        match c {
            EventCategory::Emotional => "emotional".into(),
            EventCategory::Analytical => "analytical".into(),
            EventCategory::Procedural => "procedural".into(),
        }
    }
}

impl From<String> for EventCategory {
    fn from(s: String) -> Self {
        EventCategory::from(s.as_str())
    }
}

impl From<&str> for EventCategory {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "emotional" => EventCategory::Emotional,
            "analytical" => EventCategory::Analytical,
            _ => EventCategory::Procedural,
        }
    }
}

/// Which side of the case an event helps. Unrecognized input becomes `Neutral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Side {
    Prosecution,
    Defense,
    Neutral,
}

impl Side {
    /// Direction on the opinion axis (+ = toward acquittal).
    pub fn opinion_sign(self) -> f64 {
        match self {
            Side::Prosecution => -1.0,
            Side::Defense => 1.0,
            Side::Neutral => 0.0,
        }
    }

    /// Direction on the prosecution-bias axis (+ = toward prosecution).
    pub fn bias_sign(self) -> f64 {
        -self.opinion_sign()
    }
}

impl From<Side> for String {
    fn from(s: Side) -> Self {
        match s {
            Side::Prosecution => "prosecution".into(),
            Side::Defense => "defense".into(),
            Side::Neutral => "neutral".into(),
        }
    }
}

impl From<String> for Side {
    fn from(s: String) -> Self {
        Side::from(s.as_str())
    }
}

impl From<&str> for Side {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "prosecution" => Side::Prosecution,
            "defense" | "defence" => Side::Defense,
            _ => Side::Neutral,
        }
    }
}

/// Something that happened in the courtroom, as reported by card resolution or examination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourtroomEvent {
    pub description: String,
    pub category: EventCategory,
    pub base_impact: f64,
    pub favors: Side,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CourtroomEvent {
    pub fn new(
        description: impl Into<String>,
        category: EventCategory,
        base_impact: f64,
        favors: Side,
    ) -> Self {
        Self {
            description: description.into(),
            category,
            base_impact,
            favors,
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of one juror persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JurorId(pub u64);

impl fmt::Display for JurorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "juror-{}", self.0)
    }
}

/// Monotonic ID generator owned by a jury session.
/// Personas and jury events draw from the same counter, so no two share an ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn starting_from(start: u64) -> Self {
        Self { next: start }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn next_juror_id(&mut self) -> JurorId {
        JurorId(self.next_id())
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use super::narrative::ArgumentSource;
use super::persuasion::PersuasionShift;
use crate::events::JuryEvent;
use crate::id::JurorId;
use crate::jury::VoteTally;
use crate::model::Vote;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Guilty,
    NotGuilty,
    Hung,
}

impl From<Vote> for Verdict {
    fn from(vote: Vote) -> Self {
        match vote {
            Vote::Guilty => Verdict::Guilty,
            Vote::NotGuilty => Verdict::NotGuilty,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Guilty => f.write_str("guilty"),
            Verdict::NotGuilty => f.write_str("not guilty"),
            Verdict::Hung => f.write_str("hung"),
        }
    }
}

/// One speaker's turn within a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentRecord {
    pub juror: JurorId,
    pub name: String,
    pub vote: Vote,
    pub statement: String,
    pub persuasion_target: Option<String>,
    pub source: ArgumentSource,
    pub power: f64,
    pub shifts: Vec<PersuasionShift>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTrace {
    pub round: u32,
    pub votes_before: VoteTally,
    pub arguments: Vec<ArgumentRecord>,
    pub event: Option<JuryEvent>,
    pub votes_after: VoteTally,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationResult {
    pub verdict: Verdict,
    pub unanimous: bool,
    pub rounds: Vec<RoundTrace>,
    pub foreperson: Option<JurorId>,
    pub foreperson_name: Option<String>,
    pub final_tally: VoteTally,
}

impl DeliberationResult {
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn argument_count(&self) -> usize {
        self.rounds.iter().map(|r| r.arguments.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_strings() {
        for vote in [Vote::Guilty, Vote::NotGuilty] {
            assert_eq!(Verdict::from(vote).to_string(), vote.to_string());
            assert_eq!(
                serde_json::to_string(&Verdict::from(vote)).unwrap(),
                serde_json::to_string(&vote).unwrap()
            );
        }
        assert_eq!(Verdict::NotGuilty.to_string(), "not guilty");
        assert_eq!(serde_json::to_string(&Verdict::NotGuilty).unwrap(), "\"not_guilty\"");
        assert_eq!(serde_json::to_string(&Verdict::Hung).unwrap(), "\"hung\"");
    }
}

use serde::{Deserialize, Serialize};

/// Which part of the trial an event template can fire in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPhase {
    Trial,
    Deliberation,
    Any,
}

impl EventPhase {
    pub fn allows(self, deliberating: bool) -> bool {
        match self {
            EventPhase::Trial => !deliberating,
            EventPhase::Deliberation => deliberating,
            EventPhase::Any => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JuryEventKind {
    Illness,
    Misconduct,
    Tampering,
    Conflict,
    Holdout,
    Dozing,
    Outburst,
    NoteToJudge,
}

/// One entry of the disruption catalog.
///
/// Narratives use `{juror}` for the target and `{other}` for the second
/// juror of a conflict.
#[derive(Debug, Clone, PartialEq)]
pub struct JuryEventTemplate {
    pub kind: JuryEventKind,
    /// Chance per check, before `probability_scale`.
    pub probability: f64,
    pub min_turn: u32,
    pub phase: EventPhase,
    pub narratives: &'static [&'static str],
}

pub const EVENT_TEMPLATES: &[JuryEventTemplate] = &[
    JuryEventTemplate {
        kind: JuryEventKind::Illness,
        probability: 0.03,
        min_turn: 3,
        phase: EventPhase::Any,
        narratives: &[
            "{juror} has fallen ill and is excused by the judge.",
            "{juror} collapses during a recess and cannot continue.",
        ],
    },
    JuryEventTemplate {
        kind: JuryEventKind::Misconduct,
        probability: 0.02,
        min_turn: 5,
        phase: EventPhase::Trial,
        narratives: &[
            "{juror} is caught researching the case online and is dismissed.",
            "{juror} was overheard discussing the trial with a reporter.",
        ],
    },
    JuryEventTemplate {
        kind: JuryEventKind::Tampering,
        probability: 0.01,
        min_turn: 8,
        phase: EventPhase::Trial,
        narratives: &[
            "Someone approached {juror} outside the courthouse.",
            "{juror} received an anonymous envelope at home.",
        ],
    },
    JuryEventTemplate {
        kind: JuryEventKind::Conflict,
        probability: 0.15,
        min_turn: 1,
        phase: EventPhase::Deliberation,
        narratives: &[
            "{juror} and {other} get into a heated shouting match.",
            "{juror} accuses {other} of not listening to the evidence.",
        ],
    },
    JuryEventTemplate {
        kind: JuryEventKind::Holdout,
        probability: 0.10,
        min_turn: 2,
        phase: EventPhase::Deliberation,
        narratives: &[
            "{juror} crosses their arms and refuses to discuss it further.",
            "{juror} announces nothing anyone says will change their mind.",
        ],
    },
    JuryEventTemplate {
        kind: JuryEventKind::Dozing,
        probability: 0.05,
        min_turn: 2,
        phase: EventPhase::Trial,
        narratives: &[
            "{juror} appears to nod off during testimony.",
            "{juror} is staring out the window.",
        ],
    },
    JuryEventTemplate {
        kind: JuryEventKind::Outburst,
        probability: 0.02,
        min_turn: 4,
        phase: EventPhase::Trial,
        narratives: &["{juror} blurts out a reaction in open court."],
    },
    JuryEventTemplate {
        kind: JuryEventKind::NoteToJudge,
        probability: 0.05,
        min_turn: 1,
        phase: EventPhase::Any,
        narratives: &["{juror} passes a note to the bailiff asking for clarification."],
    },
];

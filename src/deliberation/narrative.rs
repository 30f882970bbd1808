//! Boundary to whatever writes the jurors' spoken arguments.
//!
//! The generator is optional and untrusted: failures, empty answers and
//! timeouts all resolve to a canned line keyed by deliberation style and vote.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::JurorId;
use crate::model::{DeliberationStyle, JurorState, Memory, Vote};

/// Everything a narrative generator gets to see about one speaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentRequest {
    pub juror: JurorId,
    pub name: String,
    pub seat: usize,
    pub persona_summary: String,
    pub style: DeliberationStyle,
    pub vote: Vote,
    pub confidence: f64,
    pub recent_memories: Vec<Memory>,
    pub round: u32,
    pub foreperson: bool,
}

impl ArgumentRequest {
    pub fn for_speaker(
        speaker: &JurorState,
        round: u32,
        foreperson: bool,
        memory_window: usize,
    ) -> Self {
        Self {
            juror: speaker.id(),
            name: speaker.name().to_string(),
            seat: speaker.seat,
            persona_summary: speaker.persona.summary(),
            style: speaker.persona.deliberation_style,
            vote: speaker.vote(),
            confidence: speaker.confidence,
            recent_memories: speaker.recent_memories(memory_window).to_vec(),
            round,
            foreperson,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedArgument {
    /// Short first-person statement.
    pub statement: String,
    /// Who the speaker says they are trying to convince. Recorded, never acted on.
    #[serde(default)]
    pub persuasion_target: Option<String>,
}

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("narrative generator unavailable: {0}")]
    Unavailable(String),
    #[error("malformed narrative response: {0}")]
    Malformed(String),
    #[error("narrative generator timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn argument(&self, request: &ArgumentRequest) -> Result<GeneratedArgument, NarrativeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentSource {
    Narrative,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpokenArgument {
    pub statement: String,
    pub persuasion_target: Option<String>,
    pub source: ArgumentSource,
}

impl SpokenArgument {
    fn fallback(request: &ArgumentRequest) -> Self {
        Self {
            statement: fallback_statement(request.style, request.vote, request.round, request.seat)
                .to_string(),
            persuasion_target: None,
            source: ArgumentSource::Fallback,
        }
    }
}

/// Ask the generator for one argument, falling back on any failure.
pub async fn speak(
    narrator: Option<&dyn NarrativeGenerator>,
    request: &ArgumentRequest,
    timeout: Duration,
) -> SpokenArgument {
    let Some(narrator) = narrator else {
        return SpokenArgument::fallback(request);
    };

    let err = match tokio::time::timeout(timeout, narrator.argument(request)).await {
        Ok(Ok(generated)) if !generated.statement.trim().is_empty() => {
            return SpokenArgument {
                statement: generated.statement.trim().to_string(),
                persuasion_target: generated.persuasion_target,
                source: ArgumentSource::Narrative,
            };
        }
        Ok(Ok(_)) => NarrativeError::Malformed("empty statement".into()),
        Ok(Err(e)) => e,
        Err(_) => NarrativeError::Timeout(timeout),
    };
    tracing::warn!(juror = %request.juror, round = request.round, error = %err, "using canned argument");
    SpokenArgument::fallback(request)
}

/// Canned line for a speaker. The pick rotates with round and seat so a
/// jury of one style does not repeat itself every turn.
pub fn fallback_statement(style: DeliberationStyle, vote: Vote, round: u32, seat: usize) -> &'static str {
    let lines = canned_lines(style, vote);
    lines[(round as usize + seat) % lines.len()]
}

fn canned_lines(style: DeliberationStyle, vote: Vote) -> &'static [&'static str] {
    use DeliberationStyle::*;
    use Vote::*;
    match (style, vote) {
        (Methodical, Guilty) => &[
            "If we go through the evidence item by item, it all points the same way.",
            "The timeline holds together. I don't see a gap the defense explained.",
        ],
        (Methodical, NotGuilty) => &[
            "Walk through it step by step and there are holes the prosecution never filled.",
            "I wrote down every piece of evidence. Too much of it is circumstantial.",
        ],
        (Passionate, Guilty) => &[
            "Think about the victim. Someone has to answer for what happened.",
            "I can't look past what we heard in that courtroom. It still makes me angry.",
        ],
        (Passionate, NotGuilty) => &[
            "We're talking about someone's whole life here. We'd better be sure.",
            "My gut tells me this person didn't do it, and I can't shake that.",
        ],
        (Authoritative, Guilty) => &[
            "I've seen enough. The evidence is clear and we should say so.",
            "Let's not overthink this. The prosecution proved its case.",
        ],
        (Authoritative, NotGuilty) => &[
            "The burden is on the prosecution, and they didn't carry it. That settles it for me.",
            "Reasonable doubt means exactly this situation. We acquit.",
        ],
        (Consensus, Guilty) => &[
            "I think most of us see where the evidence leads. Can we agree on that?",
            "I hear the concerns, but I keep coming back to the same conclusion.",
        ],
        (Consensus, NotGuilty) => &[
            "I don't think any of us is fully sure, and that should matter.",
            "Can we at least agree there's real doubt here?",
        ],
        (Contrarian, Guilty) => &[
            "Everyone keeps defending the accused, but nobody has explained away the facts.",
            "I'm not going to go along with this just because it's easier.",
        ],
        (Contrarian, NotGuilty) => &[
            "Everyone's so certain, and that's exactly what worries me.",
            "Somebody has to push back. The prosecution's story has too many convenient parts.",
        ],
        (Reserved, Guilty) => &[
            "I think... the evidence is hard to argue with.",
            "I've been quiet, but I'm leaning guilty.",
        ],
        (Reserved, NotGuilty) => &[
            "I'm just not convinced, I'm sorry.",
            "I keep thinking there's something we haven't been told.",
        ],
    }
}

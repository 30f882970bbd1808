use std::sync::Arc;

use crate::id::{IdGenerator, JurorId};
use crate::jury::Jury;
use crate::model::*;

/// Typed reference to one juror in a [`JuryScenario`], enabling chained field mutation.
///
/// Created by [`JuryScenario::juror`] or [`JuryScenario::alternate`].
/// Call [`.id()`](JurorRef::id) to terminate the chain and extract the juror ID.
pub struct JurorRef<'a> {
    scenario: &'a mut JuryScenario,
    alternate: bool,
    index: usize,
}

impl<'a> JurorRef<'a> {
    fn state_mut(&mut self) -> &mut JurorState {
        if self.alternate {
            &mut self.scenario.alternates[self.index]
        } else {
            &mut self.scenario.seated[self.index]
        }
    }

    fn persona_mut(&mut self) -> &mut JurorPersona {
        Arc::make_mut(&mut self.state_mut().persona)
    }

    pub fn opinion(mut self, v: f64) -> Self { self.state_mut().opinion = v; self }
    pub fn confidence(mut self, v: f64) -> Self { self.state_mut().confidence = v; self }
    pub fn engagement(mut self, v: f64) -> Self { self.state_mut().engagement = v; self }

    pub fn name(mut self, v: &str) -> Self { self.persona_mut().name = v.to_string(); self }
    pub fn analytical_emotional(mut self, v: f64) -> Self { self.persona_mut().analytical_emotional = v; self }
    pub fn skepticism(mut self, v: f64) -> Self { self.persona_mut().skepticism = v; self }
    pub fn leader_follower(mut self, v: f64) -> Self { self.persona_mut().leader_follower = v; self }
    pub fn leadership(mut self, v: f64) -> Self { self.persona_mut().leadership = v; self }
    pub fn persuasion_resistance(mut self, v: f64) -> Self { self.persona_mut().persuasion_resistance = v; self }
    pub fn prosecution_bias(mut self, v: f64) -> Self { self.persona_mut().prosecution_bias = v; self }
    pub fn style(mut self, v: DeliberationStyle) -> Self { self.persona_mut().deliberation_style = v; self }

    pub fn topic_bias(mut self, topic: &str, v: f64) -> Self {
        self.persona_mut().topic_biases.insert(topic.to_string(), v);
        self
    }

    pub fn trigger(mut self, topic: &str) -> Self {
        self.persona_mut().trigger_topics.push(topic.to_string());
        self
    }

    /// Escape hatch: apply an arbitrary closure to the juror state.
    pub fn with(mut self, f: impl FnOnce(&mut JurorState)) -> Self { f(self.state_mut()); self }

    /// Terminate the chain and return the juror ID.
    pub fn id(mut self) -> JurorId { self.state_mut().id() }
}

/// Builder for hand-tuned juries in tests.
///
/// Jurors start balanced: every trait at 50, no bias, full engagement,
/// moderate confidence, opinion 0.
pub struct JuryScenario {
    ids: IdGenerator,
    seated: Vec<JurorState>,
    alternates: Vec<JurorState>,
}

impl JuryScenario {
    pub fn new() -> Self {
        Self {
            ids: IdGenerator::new(),
            seated: Vec::new(),
            alternates: Vec::new(),
        }
    }

    fn blank_persona(&mut self) -> JurorPersona {
        let id = self.ids.next_juror_id();
        JurorPersona {
            id,
            archetype: "test".to_string(),
            name: format!("Juror {}", id.0),
            age: 40,
            occupation: "clerk".to_string(),
            background: String::new(),
            analytical_emotional: 50.0,
            trust: 50.0,
            skepticism: 50.0,
            leader_follower: 50.0,
            attention_span: 70.0,
            persuasion_resistance: 50.0,
            prosecution_bias: 0.0,
            topic_biases: Default::default(),
            trigger_topics: Vec::new(),
            trigger_direction: TriggerDirection::Sympathetic,
            leadership: 50.0,
            deliberation_style: DeliberationStyle::Reserved,
        }
    }

    fn blank_state(&mut self, seat: usize, alternate: bool) -> JurorState {
        let persona = Arc::new(self.blank_persona());
        let mut state = JurorState::new(persona, seat, alternate);
        state.confidence = 50.0;
        state.engagement = 100.0;
        state
    }

    /// Seat a new juror in the next free seat.
    pub fn juror(&mut self) -> JurorRef<'_> {
        let seat = self.seated.len();
        let state = self.blank_state(seat, false);
        self.seated.push(state);
        JurorRef {
            index: self.seated.len() - 1,
            alternate: false,
            scenario: self,
        }
    }

    /// Add an alternate behind the existing ones.
    pub fn alternate(&mut self) -> JurorRef<'_> {
        let state = self.blank_state(0, true);
        self.alternates.push(state);
        JurorRef {
            index: self.alternates.len() - 1,
            alternate: true,
            scenario: self,
        }
    }

    /// Seat `n` jurors at the same opinion.
    pub fn jurors_at(&mut self, n: usize, opinion: f64) -> Vec<JurorId> {
        (0..n).map(|_| self.juror().opinion(opinion).id()).collect()
    }

    /// Finish, numbering alternates after the seated jurors and recording
    /// each juror's starting opinion as turn 0.
    pub fn build(self) -> Jury {
        let first_alternate_seat = self.seated.len();
        let start = |mut s: JurorState| {
            s.record_opinion(0);
            s
        };
        let alternates = self
            .alternates
            .into_iter()
            .enumerate()
            .map(|(i, mut s)| {
                s.seat = first_alternate_seat + i;
                start(s)
            })
            .collect();
        Jury::new(self.seated.into_iter().map(start).collect(), alternates)
    }

    /// Ids handed out so far; continue from here when more ids are needed.
    pub fn into_parts(self) -> (Jury, IdGenerator) {
        let ids = self.ids.clone();
        (self.build(), ids)
    }
}

impl Default for JuryScenario {
    fn default() -> Self {
        Self::new()
    }
}

pub mod courtroom;
pub mod juror;
pub mod persona;
pub mod template;

pub use courtroom::{CourtroomEvent, EventCategory, Side};
pub use juror::{Expression, JurorState, Memory, OpinionSnapshot, Vote};
pub use persona::JurorPersona;
pub use template::{DeliberationStyle, JurorTemplate, TraitRange, TriggerDirection};

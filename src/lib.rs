pub mod config;
pub mod deliberation;
pub mod error;
pub mod events;
pub mod id;
pub mod jury;
pub mod model;
pub mod opinion;
pub mod persona;
pub mod scenario;
pub mod session;

pub use config::JuryConfig;
pub use deliberation::{
    ArgumentRequest, Deliberation, DeliberationResult, DeliberationState, GeneratedArgument,
    NarrativeError, NarrativeGenerator, Verdict,
};
pub use error::{JuryError, Result};
pub use events::{Consequence, JuryEvent, JuryEventKind, JuryEventSystem};
pub use id::{IdGenerator, JurorId};
pub use jury::{Jury, VoteTally};
pub use model::{
    CourtroomEvent, EventCategory, Expression, JurorPersona, JurorState, JurorTemplate, Side, Vote,
};
pub use session::{JurySession, TrialTurnReport};

#![allow(dead_code)]

use jury_sim::events::JuryEventConfig;
use jury_sim::model::{CourtroomEvent, EventCategory, Side};
use jury_sim::scenario::JuryScenario;
use jury_sim::{JuryConfig, JurySession};
use rand::SeedableRng;
use rand::rngs::SmallRng;

pub fn rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Default configuration with jury events switched off.
pub fn quiet_config() -> JuryConfig {
    JuryConfig {
        events: JuryEventConfig {
            enabled: false,
            ..JuryEventConfig::default()
        },
        ..JuryConfig::default()
    }
}

/// Session over a scenario-built jury.
pub fn session_from(scenario: JuryScenario, config: JuryConfig) -> JurySession {
    let (jury, ids) = scenario.into_parts();
    JurySession::from_jury(config, jury, ids)
}

/// Two opposed blocs of equal resistance.
pub fn split_jury(each: usize, opinion: f64, resistance: f64) -> JuryScenario {
    let mut s = JuryScenario::new();
    for _ in 0..each {
        s.juror().opinion(opinion).persuasion_resistance(resistance);
    }
    for _ in 0..each {
        s.juror().opinion(-opinion).persuasion_resistance(resistance);
    }
    s
}

/// A short prosecution-heavy trial.
pub fn prosecution_case() -> Vec<CourtroomEvent> {
    vec![
        CourtroomEvent::new(
            "Fingerprints on the weapon match the defendant",
            EventCategory::Analytical,
            14.0,
            Side::Prosecution,
        )
        .with_tags(["forensics"]),
        CourtroomEvent::new(
            "The victim's mother testifies through tears",
            EventCategory::Emotional,
            12.0,
            Side::Prosecution,
        )
        .with_tags(["violence"]),
        CourtroomEvent::new(
            "Defense questions the chain of custody",
            EventCategory::Procedural,
            6.0,
            Side::Defense,
        )
        .with_tags(["police"]),
        CourtroomEvent::new(
            "Security footage places the defendant at the scene",
            EventCategory::Analytical,
            18.0,
            Side::Prosecution,
        )
        .with_tags(["forensics"]),
        CourtroomEvent::new(
            "Recess is called",
            EventCategory::Procedural,
            0.0,
            Side::Neutral,
        ),
    ]
}

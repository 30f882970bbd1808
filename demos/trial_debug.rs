use jury_sim::model::{CourtroomEvent, EventCategory, Side};
use jury_sim::{JuryConfig, JurySession};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut session = JurySession::new(JuryConfig::default());

    let pool = session.generate_pool(Some("state-v-doe"), &mut rng);
    let struck = [pool[0].id, pool[1].id];
    session.empanel(&pool, &struck, &mut rng);

    for juror in &session.jury.seated {
        eprintln!(
            "seat {:>2} {:<22} {:<22} bias={:+.1} opinion={:+.1}",
            juror.seat,
            juror.name(),
            juror.persona.archetype,
            juror.persona.prosecution_bias,
            juror.opinion
        );
    }

    let trial = [
        CourtroomEvent::new("Detective describes the arrest", EventCategory::Procedural, 6.0, Side::Prosecution)
            .with_tags(["police"]),
        CourtroomEvent::new("Lab analyst matches DNA from the scene", EventCategory::Analytical, 16.0, Side::Prosecution)
            .with_tags(["forensics"]),
        CourtroomEvent::new("Eyewitness admits she wasn't wearing glasses", EventCategory::Analytical, 12.0, Side::Defense)
            .with_tags(["eyewitness"]),
        CourtroomEvent::new("Defendant's daughter pleads for her father", EventCategory::Emotional, 14.0, Side::Defense)
            .with_tags(["family"]),
        CourtroomEvent::new("Bank records show a large unexplained deposit", EventCategory::Analytical, 10.0, Side::Prosecution)
            .with_tags(["money", "motive"]),
        CourtroomEvent::new("Closing arguments", EventCategory::Emotional, 8.0, Side::Defense),
    ];

    for event in &trial {
        let report = session.present_event(event, &mut rng);
        let tally = session.tally();
        eprintln!(
            "turn {}: {:<48} guilty={} not_guilty={}",
            report.turn, event.description, tally.guilty, tally.not_guilty
        );
        if let Some(e) = &report.jury_event {
            eprintln!("    ! {}", e.description);
        }
    }

    let result = session.deliberate(&mut rng, None).await;
    for round in &result.rounds {
        eprintln!(
            "round {}: {} arguments, {}-{} -> {}-{}",
            round.round,
            round.arguments.len(),
            round.votes_before.guilty,
            round.votes_before.not_guilty,
            round.votes_after.guilty,
            round.votes_after.not_guilty
        );
        for arg in &round.arguments {
            eprintln!("    {} ({}): {}", arg.name, arg.vote, arg.statement);
        }
        if let Some(e) = &round.event {
            eprintln!("    ! {}", e.description);
        }
    }
    eprintln!(
        "verdict: {} (foreperson {})",
        result.verdict,
        result.foreperson_name.as_deref().unwrap_or("none")
    );
}

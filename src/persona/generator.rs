use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use rand::RngCore;
use rand::seq::{IndexedRandom, SliceRandom};

use super::names::unique_juror_name;
use crate::config::PoolConfig;
use crate::id::{IdGenerator, JurorId};
use crate::model::{JurorPersona, JurorTemplate};

pub const BIAS_LIMIT: f64 = 50.0;

/// Symmetric uniform jitter in `[-amount, amount]`; zero when `amount` is not positive.
pub fn jitter(amount: f64, rng: &mut dyn RngCore) -> f64 {
    if amount > 0.0 {
        rng.random_range(-amount..=amount)
    } else {
        0.0
    }
}

/// Small per-case bias offset in `[-5, 5]`, derived from the character codes of the case id.
///
/// The same case always gets the same offset, so reruns feel consistent.
pub fn case_bias_offset(case_id: &str) -> f64 {
    let sum: u64 = case_id.chars().map(|c| c as u64).sum();
    (sum % 11) as f64 - 5.0
}

/// Instantiate one persona from a template.
pub fn instantiate(
    template: &JurorTemplate,
    id: JurorId,
    name: String,
    case_offset: f64,
    config: &PoolConfig,
    rng: &mut dyn RngCore,
) -> JurorPersona {
    let age = template.age.sample(rng).round() as u32;
    let occupation = template
        .occupations
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| template.id.clone());
    let background = template
        .background
        .replace("{occupation}", &occupation)
        .replace("{age}", &age.to_string());

    let analytical_emotional = template.analytical_emotional.sample(rng);
    let trust = template.trust.sample(rng);
    let skepticism = template.skepticism.sample(rng);
    let leader_follower = template.leader_follower.sample(rng);
    let attention_span = template.attention_span.sample(rng);
    let persuasion_resistance = template.persuasion_resistance.sample(rng);

    let topic_biases: BTreeMap<String, f64> = template
        .topic_biases
        .iter()
        .map(|(topic, bias)| {
            let jittered = bias + jitter(config.bias_jitter, rng);
            (topic.clone(), jittered.clamp(-BIAS_LIMIT, BIAS_LIMIT))
        })
        .collect();

    // Averaged from the template's jitter-free biases, then jittered once.
    let prosecution_bias = (template.mean_topic_bias()
        + jitter(config.prosecution_jitter, rng)
        + case_offset)
        .clamp(-BIAS_LIMIT, BIAS_LIMIT);

    JurorPersona {
        id,
        archetype: template.id.clone(),
        name,
        age,
        occupation,
        background,
        analytical_emotional,
        trust,
        skepticism,
        leader_follower,
        attention_span,
        persuasion_resistance,
        prosecution_bias,
        topic_biases,
        trigger_topics: template.trigger_topics.clone(),
        trigger_direction: template.trigger_direction,
        leadership: template.leadership,
        deliberation_style: template.deliberation_style,
    }
}

/// Generate a pool of personas from distinct archetypes.
///
/// Archetypes never repeat within a pool, so the pool is capped at the catalog
/// size. Names are unique within the pool.
pub fn generate_pool(
    catalog: &[JurorTemplate],
    config: &PoolConfig,
    case_id: Option<&str>,
    ids: &mut IdGenerator,
    rng: &mut dyn RngCore,
) -> Vec<JurorPersona> {
    let size = config.pool_size.min(catalog.len());
    if size < config.pool_size {
        tracing::warn!(
            requested = config.pool_size,
            available = catalog.len(),
            "catalog smaller than requested pool; generating one persona per archetype"
        );
    }

    let mut order: Vec<usize> = (0..catalog.len()).collect();
    order.shuffle(rng);

    let case_offset = case_id.map(case_bias_offset).unwrap_or(0.0);
    let mut taken = HashSet::new();
    let mut pool = Vec::with_capacity(size);

    for (i, &idx) in order.iter().take(size).enumerate() {
        let name = unique_juror_name(&mut taken, config.name_attempts, i + 1, rng);
        let persona = instantiate(
            &catalog[idx],
            ids.next_juror_id(),
            name,
            case_offset,
            config,
            rng,
        );
        tracing::debug!(
            id = %persona.id,
            archetype = %persona.archetype,
            name = %persona.name,
            bias = persona.prosecution_bias,
            "generated persona"
        );
        pool.push(persona);
    }

    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::catalog::builtin_catalog;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn pool(seed: u64, case_id: Option<&str>) -> Vec<JurorPersona> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut ids = IdGenerator::new();
        generate_pool(
            &builtin_catalog(),
            &PoolConfig::default(),
            case_id,
            &mut ids,
            &mut rng,
        )
    }

    #[test]
    fn traits_stay_within_template_ranges() {
        let catalog = builtin_catalog();
        for seed in 0..50 {
            for p in pool(seed, Some("State v. Marlowe")) {
                let t = catalog.iter().find(|t| t.id == p.archetype).unwrap();
                assert!(t.analytical_emotional.contains(p.analytical_emotional));
                assert!(t.trust.contains(p.trust));
                assert!(t.skepticism.contains(p.skepticism));
                assert!(t.leader_follower.contains(p.leader_follower));
                assert!(t.attention_span.contains(p.attention_span));
                assert!(t.persuasion_resistance.contains(p.persuasion_resistance));
                assert!((t.age.min.floor() as u32) <= p.age && p.age <= (t.age.max.ceil() as u32));
                assert!(
                    (-BIAS_LIMIT..=BIAS_LIMIT).contains(&p.prosecution_bias),
                    "bias {} out of range",
                    p.prosecution_bias
                );
            }
        }
    }

    #[test]
    fn archetypes_and_names_distinct() {
        for seed in 0..50 {
            let personas = pool(seed, None);
            assert_eq!(personas.len(), 18);
            let archetypes: HashSet<_> = personas.iter().map(|p| &p.archetype).collect();
            let names: HashSet<_> = personas.iter().map(|p| &p.name).collect();
            assert_eq!(archetypes.len(), 18);
            assert_eq!(names.len(), 18);
        }
    }

    #[test]
    fn same_seed_same_pool() {
        assert_eq!(pool(9, Some("case-1")), pool(9, Some("case-1")));
    }

    #[test]
    fn topic_bias_jitter_is_bounded() {
        let catalog = builtin_catalog();
        let config = PoolConfig::default();
        for p in pool(3, None) {
            let t = catalog.iter().find(|t| t.id == p.archetype).unwrap();
            for (topic, bias) in &p.topic_biases {
                let base = t.topic_biases[topic];
                assert!((bias - base).abs() <= config.bias_jitter + 1e-9);
            }
        }
    }

    #[test]
    fn case_offset_is_deterministic_and_small() {
        assert_eq!(case_bias_offset("abc"), case_bias_offset("abc"));
        for id in ["", "a", "State v. Marlowe", "People v. Ortiz", "zzzzzzzz"] {
            let off = case_bias_offset(id);
            assert!((-5.0..=5.0).contains(&off), "{id}: {off}");
        }
        // 'a' + 'b' + 'c' = 294, 294 % 11 = 8
        assert_eq!(case_bias_offset("abc"), 3.0);
    }

    #[test]
    fn case_id_shifts_prosecution_bias() {
        let base = pool(11, None);
        let abc = pool(11, Some("abc"));
        // 'a' + 'b' + 'd' = 295, 295 % 11 = 9
        let abd = pool(11, Some("abd"));
        assert_eq!(case_bias_offset("abd"), 4.0);

        let mut shifted = 0;
        for ((b, c), d) in base.iter().zip(&abc).zip(&abd) {
            assert_eq!(b.archetype, c.archetype);
            assert_eq!(b.topic_biases, c.topic_biases);
            if b.prosecution_bias.abs() >= BIAS_LIMIT {
                continue;
            }
            let expected = (b.prosecution_bias + 3.0).clamp(-BIAS_LIMIT, BIAS_LIMIT);
            assert!((c.prosecution_bias - expected).abs() < 1e-9, "{}", b.archetype);
            if expected < BIAS_LIMIT {
                assert!(d.prosecution_bias > c.prosecution_bias);
                shifted += 1;
            }
        }
        assert!(shifted > 0);
    }

    #[test]
    fn pool_capped_by_catalog_size() {
        let catalog: Vec<_> = builtin_catalog().into_iter().take(5).collect();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ids = IdGenerator::new();
        let personas = generate_pool(&catalog, &PoolConfig::default(), None, &mut ids, &mut rng);
        assert_eq!(personas.len(), 5);
    }

    #[test]
    fn zero_jitter_keeps_template_biases() {
        let catalog = builtin_catalog();
        let config = PoolConfig {
            bias_jitter: 0.0,
            prosecution_jitter: 0.0,
            ..PoolConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(2);
        let mut ids = IdGenerator::new();
        let p = instantiate(&catalog[5], ids.next_juror_id(), "X Y".into(), 0.0, &config, &mut rng);
        assert_eq!(p.topic_biases, catalog[5].topic_biases);
        assert!((p.prosecution_bias - catalog[5].mean_topic_bias()).abs() < 1e-9);
    }
}

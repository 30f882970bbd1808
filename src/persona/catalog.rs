//! Archetype catalog: the built-in table plus loading of custom JSON catalogs.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::error::{JuryError, Result};
use crate::model::{DeliberationStyle, JurorTemplate, TraitRange, TriggerDirection};

use DeliberationStyle::*;
use TriggerDirection::*;

/// Static archetype definition. Converted into an owned [`JurorTemplate`] at load time.
pub struct ArchetypeDef {
    pub id: &'static str,
    pub description: &'static str,
    pub occupations: &'static [&'static str],
    pub age: (f64, f64),
    pub analytical_emotional: (f64, f64),
    pub trust: (f64, f64),
    pub skepticism: (f64, f64),
    pub leader_follower: (f64, f64),
    pub attention_span: (f64, f64),
    pub persuasion_resistance: (f64, f64),
    pub topic_biases: &'static [(&'static str, f64)],
    pub triggers: &'static [&'static str],
    pub trigger_direction: TriggerDirection,
    pub leadership: f64,
    pub style: DeliberationStyle,
    pub background: &'static str,
}

impl From<&ArchetypeDef> for JurorTemplate {
    fn from(def: &ArchetypeDef) -> Self {
        let range = |(min, max): (f64, f64)| TraitRange::new(min, max);
        JurorTemplate {
            id: def.id.to_string(),
            description: def.description.to_string(),
            occupations: def.occupations.iter().map(|s| s.to_string()).collect(),
            age: range(def.age),
            analytical_emotional: range(def.analytical_emotional),
            trust: range(def.trust),
            skepticism: range(def.skepticism),
            leader_follower: range(def.leader_follower),
            attention_span: range(def.attention_span),
            persuasion_resistance: range(def.persuasion_resistance),
            topic_biases: def
                .topic_biases
                .iter()
                .map(|(t, b)| (t.to_string(), *b))
                .collect::<BTreeMap<_, _>>(),
            trigger_topics: def.triggers.iter().map(|s| s.to_string()).collect(),
            trigger_direction: def.trigger_direction,
            leadership: def.leadership,
            deliberation_style: def.style,
            background: def.background.to_string(),
        }
    }
}

pub const ARCHETYPES: &[ArchetypeDef] = &[
    ArchetypeDef {
        id: "retired_engineer",
        description: "Trusts measurements over testimony and wants every number to add up",
        occupations: &["retired civil engineer", "retired machinist", "former quality inspector"],
        age: (58.0, 74.0),
        analytical_emotional: (8.0, 28.0),
        trust: (35.0, 55.0),
        skepticism: (60.0, 85.0),
        leader_follower: (15.0, 35.0),
        attention_span: (65.0, 90.0),
        persuasion_resistance: (60.0, 80.0),
        topic_biases: &[("forensics", 15.0), ("eyewitness", -15.0), ("technology", 10.0)],
        triggers: &["contaminated_evidence"],
        trigger_direction: Hostile,
        leadership: 75.0,
        style: Methodical,
        background: "Spent a career as a {occupation} signing off on load calculations.",
    },
    ArchetypeDef {
        id: "schoolteacher",
        description: "Reads people for a living and is moved by stories about children",
        occupations: &["elementary teacher", "high school counselor", "reading specialist"],
        age: (30.0, 58.0),
        analytical_emotional: (55.0, 75.0),
        trust: (50.0, 70.0),
        skepticism: (30.0, 50.0),
        leader_follower: (30.0, 50.0),
        attention_span: (60.0, 85.0),
        persuasion_resistance: (30.0, 50.0),
        topic_biases: &[("youth", -15.0), ("family", -10.0), ("violence", 15.0)],
        triggers: &["child_victim"],
        trigger_direction: Sympathetic,
        leadership: 60.0,
        style: Consensus,
        background: "A {occupation} who has heard every excuse and believes most of them.",
    },
    ArchetypeDef {
        id: "er_nurse",
        description: "Calm under pressure, unimpressed by gore, sharp on medical detail",
        occupations: &["emergency room nurse", "paramedic", "trauma nurse"],
        age: (26.0, 55.0),
        analytical_emotional: (35.0, 55.0),
        trust: (40.0, 60.0),
        skepticism: (45.0, 65.0),
        leader_follower: (25.0, 45.0),
        attention_span: (55.0, 80.0),
        persuasion_resistance: (45.0, 65.0),
        topic_biases: &[("forensics", 10.0), ("violence", 5.0), ("mental_health", -10.0)],
        triggers: &["medical_testimony"],
        trigger_direction: Hostile,
        leadership: 55.0,
        style: Methodical,
        background: "Works night shifts as a {occupation} and has seen what people do to each other.",
    },
    ArchetypeDef {
        id: "small_business_owner",
        description: "Pragmatic, protective of property, impatient with long arguments",
        occupations: &["restaurant owner", "hardware store owner", "auto shop owner"],
        age: (35.0, 65.0),
        analytical_emotional: (40.0, 60.0),
        trust: (35.0, 55.0),
        skepticism: (45.0, 70.0),
        leader_follower: (15.0, 35.0),
        attention_span: (40.0, 65.0),
        persuasion_resistance: (55.0, 75.0),
        topic_biases: &[("money", 20.0), ("police", 10.0), ("drugs", 15.0)],
        triggers: &["theft"],
        trigger_direction: Hostile,
        leadership: 70.0,
        style: Authoritative,
        background: "A {occupation} who has been robbed twice.",
    },
    ArchetypeDef {
        id: "college_student",
        description: "Idealistic, distrustful of institutions, easily swayed by a good speech",
        occupations: &["philosophy student", "nursing student", "computer science student"],
        age: (18.0, 24.0),
        analytical_emotional: (45.0, 70.0),
        trust: (20.0, 40.0),
        skepticism: (50.0, 75.0),
        leader_follower: (55.0, 80.0),
        attention_span: (30.0, 60.0),
        persuasion_resistance: (20.0, 40.0),
        topic_biases: &[("police", -25.0), ("authority", -20.0), ("technology", 5.0)],
        triggers: &["police_misconduct"],
        trigger_direction: Sympathetic,
        leadership: 30.0,
        style: Passionate,
        background: "A {occupation} missing midterms for jury duty.",
    },
    ArchetypeDef {
        id: "retired_officer",
        description: "Twenty-five years on patrol; gives officers the benefit of the doubt",
        occupations: &["retired police sergeant", "retired state trooper", "former corrections officer"],
        age: (52.0, 72.0),
        analytical_emotional: (30.0, 50.0),
        trust: (55.0, 75.0),
        skepticism: (40.0, 60.0),
        leader_follower: (8.0, 25.0),
        attention_span: (60.0, 85.0),
        persuasion_resistance: (70.0, 90.0),
        topic_biases: &[("police", 35.0), ("authority", 25.0), ("drugs", 20.0), ("weapons", 15.0)],
        triggers: &["police_misconduct", "attack_on_officer"],
        trigger_direction: Hostile,
        leadership: 85.0,
        style: Authoritative,
        background: "A {occupation} who still reads incident reports for fun.",
    },
    ArchetypeDef {
        id: "social_worker",
        description: "Sees the circumstances behind the crime before the crime itself",
        occupations: &["child protective caseworker", "hospital social worker", "addiction counselor"],
        age: (28.0, 60.0),
        analytical_emotional: (60.0, 80.0),
        trust: (45.0, 65.0),
        skepticism: (35.0, 55.0),
        leader_follower: (30.0, 55.0),
        attention_span: (55.0, 80.0),
        persuasion_resistance: (40.0, 60.0),
        topic_biases: &[("poverty", -25.0), ("mental_health", -25.0), ("drugs", -15.0)],
        triggers: &["abuse_history", "poverty"],
        trigger_direction: Sympathetic,
        leadership: 50.0,
        style: Consensus,
        background: "A {occupation} with a caseload that never gets smaller.",
    },
    ArchetypeDef {
        id: "accountant",
        description: "Follows the paper trail and distrusts anything that is not written down",
        occupations: &["tax accountant", "auditor", "bookkeeper"],
        age: (30.0, 62.0),
        analytical_emotional: (5.0, 25.0),
        trust: (40.0, 60.0),
        skepticism: (55.0, 80.0),
        leader_follower: (40.0, 65.0),
        attention_span: (70.0, 95.0),
        persuasion_resistance: (55.0, 75.0),
        topic_biases: &[("money", 15.0), ("motive", 10.0), ("eyewitness", -10.0)],
        triggers: &["financial_records"],
        trigger_direction: Hostile,
        leadership: 45.0,
        style: Methodical,
        background: "A {occupation} who reconciles receipts to the cent.",
    },
    ArchetypeDef {
        id: "artist",
        description: "Intuitive, empathetic, suspicious of authority figures",
        occupations: &["painter", "session musician", "tattoo artist"],
        age: (22.0, 55.0),
        analytical_emotional: (70.0, 92.0),
        trust: (30.0, 50.0),
        skepticism: (40.0, 60.0),
        leader_follower: (50.0, 75.0),
        attention_span: (30.0, 60.0),
        persuasion_resistance: (25.0, 45.0),
        topic_biases: &[("authority", -20.0), ("police", -15.0), ("reputation", -5.0)],
        triggers: &["police_misconduct"],
        trigger_direction: Sympathetic,
        leadership: 35.0,
        style: Passionate,
        background: "A {occupation} who takes commissions between gigs.",
    },
    ArchetypeDef {
        id: "military_veteran",
        description: "Disciplined and decisive, values chain of command and loyalty",
        occupations: &["army veteran", "marine veteran", "navy veteran"],
        age: (28.0, 70.0),
        analytical_emotional: (25.0, 45.0),
        trust: (45.0, 65.0),
        skepticism: (45.0, 65.0),
        leader_follower: (10.0, 30.0),
        attention_span: (60.0, 85.0),
        persuasion_resistance: (65.0, 85.0),
        topic_biases: &[("authority", 20.0), ("weapons", 10.0), ("violence", 10.0)],
        triggers: &["self_defense"],
        trigger_direction: Sympathetic,
        leadership: 80.0,
        style: Authoritative,
        background: "An {occupation} who now manages a warehouse crew.",
    },
    ArchetypeDef {
        id: "stay_at_home_parent",
        description: "Protective, practical, and worried about safety in the neighborhood",
        occupations: &["stay-at-home parent", "part-time daycare aide", "PTA organizer"],
        age: (28.0, 50.0),
        analytical_emotional: (55.0, 75.0),
        trust: (50.0, 70.0),
        skepticism: (30.0, 50.0),
        leader_follower: (45.0, 70.0),
        attention_span: (45.0, 70.0),
        persuasion_resistance: (30.0, 50.0),
        topic_biases: &[("violence", 20.0), ("drugs", 20.0), ("youth", 5.0)],
        triggers: &["child_victim"],
        trigger_direction: Hostile,
        leadership: 40.0,
        style: Consensus,
        background: "A {occupation} juggling school runs with jury service.",
    },
    ArchetypeDef {
        id: "software_developer",
        description: "Debugs every claim, fascinated by digital evidence",
        occupations: &["backend developer", "data analyst", "IT administrator"],
        age: (23.0, 45.0),
        analytical_emotional: (10.0, 30.0),
        trust: (30.0, 50.0),
        skepticism: (60.0, 85.0),
        leader_follower: (45.0, 70.0),
        attention_span: (50.0, 80.0),
        persuasion_resistance: (50.0, 70.0),
        topic_biases: &[("technology", 20.0), ("eyewitness", -20.0), ("authority", -10.0)],
        triggers: &["digital_evidence"],
        trigger_direction: Hostile,
        leadership: 40.0,
        style: Contrarian,
        background: "A {occupation} who reads the terms of service.",
    },
    ArchetypeDef {
        id: "clergy_member",
        description: "Believes in redemption and weighs intent above outcome",
        occupations: &["parish pastor", "hospital chaplain", "youth minister"],
        age: (35.0, 70.0),
        analytical_emotional: (55.0, 75.0),
        trust: (60.0, 80.0),
        skepticism: (20.0, 40.0),
        leader_follower: (20.0, 40.0),
        attention_span: (60.0, 85.0),
        persuasion_resistance: (45.0, 65.0),
        topic_biases: &[("motive", -10.0), ("mental_health", -15.0), ("family", -10.0)],
        triggers: &["remorse"],
        trigger_direction: Sympathetic,
        leadership: 65.0,
        style: Consensus,
        background: "A {occupation} who has sat with families on both sides of a crime.",
    },
    ArchetypeDef {
        id: "union_tradesperson",
        description: "Blunt, loyal to working people, dislikes corporate lawyers",
        occupations: &["union electrician", "pipefitter", "ironworker"],
        age: (28.0, 60.0),
        analytical_emotional: (40.0, 60.0),
        trust: (35.0, 55.0),
        skepticism: (50.0, 70.0),
        leader_follower: (25.0, 45.0),
        attention_span: (45.0, 70.0),
        persuasion_resistance: (60.0, 80.0),
        topic_biases: &[("corporate", -25.0), ("money", -10.0), ("police", 5.0)],
        triggers: &["corporate_cover_up"],
        trigger_direction: Sympathetic,
        leadership: 60.0,
        style: Contrarian,
        background: "A {occupation} who walked a picket line last spring.",
    },
    ArchetypeDef {
        id: "corporate_manager",
        description: "Results-driven, trusts institutions, wants a tidy decision",
        occupations: &["regional sales manager", "operations director", "HR manager"],
        age: (32.0, 60.0),
        analytical_emotional: (25.0, 45.0),
        trust: (55.0, 75.0),
        skepticism: (35.0, 55.0),
        leader_follower: (5.0, 25.0),
        attention_span: (40.0, 65.0),
        persuasion_resistance: (50.0, 70.0),
        topic_biases: &[("corporate", 20.0), ("authority", 15.0), ("reputation", 10.0)],
        triggers: &["corporate_cover_up"],
        trigger_direction: Hostile,
        leadership: 80.0,
        style: Authoritative,
        background: "An {occupation} who runs meetings on a strict agenda.",
    },
    ArchetypeDef {
        id: "grandparent",
        description: "Gentle, traditional, slow to condemn and slow to forgive",
        occupations: &["retired librarian", "retired postal worker", "retired homemaker"],
        age: (65.0, 85.0),
        analytical_emotional: (50.0, 70.0),
        trust: (55.0, 75.0),
        skepticism: (25.0, 45.0),
        leader_follower: (50.0, 75.0),
        attention_span: (35.0, 60.0),
        persuasion_resistance: (40.0, 60.0),
        topic_biases: &[("family", -10.0), ("drugs", 25.0), ("youth", -10.0)],
        triggers: &["elder_victim"],
        trigger_direction: Hostile,
        leadership: 35.0,
        style: Reserved,
        background: "A {occupation} with nine grandchildren and a long memory.",
    },
    ArchetypeDef {
        id: "true_crime_enthusiast",
        description: "Has seen every documentary and suspects a twist in every case",
        occupations: &["podcast host", "pharmacy technician", "call center agent"],
        age: (24.0, 48.0),
        analytical_emotional: (45.0, 65.0),
        trust: (25.0, 45.0),
        skepticism: (65.0, 90.0),
        leader_follower: (35.0, 60.0),
        attention_span: (70.0, 95.0),
        persuasion_resistance: (35.0, 55.0),
        topic_biases: &[("forensics", -10.0), ("police", -10.0), ("alibi", 10.0)],
        triggers: &["wrongful_conviction"],
        trigger_direction: Sympathetic,
        leadership: 45.0,
        style: Contrarian,
        background: "A {occupation} who keeps a corkboard of cold cases at home.",
    },
    ArchetypeDef {
        id: "civil_rights_advocate",
        description: "Watches for bias in every procedure and every witness",
        occupations: &["legal aid paralegal", "community organizer", "nonprofit director"],
        age: (25.0, 60.0),
        analytical_emotional: (45.0, 65.0),
        trust: (20.0, 40.0),
        skepticism: (60.0, 85.0),
        leader_follower: (15.0, 35.0),
        attention_span: (60.0, 85.0),
        persuasion_resistance: (65.0, 85.0),
        topic_biases: &[("police", -35.0), ("authority", -25.0), ("poverty", -20.0), ("immigration", -20.0)],
        triggers: &["racial_profiling", "police_misconduct"],
        trigger_direction: Sympathetic,
        leadership: 70.0,
        style: Passionate,
        background: "A {occupation} who has filed more complaints than most lawyers.",
    },
    ArchetypeDef {
        id: "farmer",
        description: "Self-reliant and plain-spoken, judges character by hard work",
        occupations: &["dairy farmer", "orchard owner", "ranch hand"],
        age: (35.0, 70.0),
        analytical_emotional: (35.0, 55.0),
        trust: (45.0, 65.0),
        skepticism: (45.0, 65.0),
        leader_follower: (35.0, 55.0),
        attention_span: (45.0, 70.0),
        persuasion_resistance: (65.0, 85.0),
        topic_biases: &[("weapons", -10.0), ("drugs", 15.0), ("reputation", 10.0)],
        triggers: &["self_defense"],
        trigger_direction: Sympathetic,
        leadership: 50.0,
        style: Reserved,
        background: "A {occupation} who drove two hours to get to the courthouse.",
    },
    ArchetypeDef {
        id: "gig_worker",
        description: "Stretched thin, half-listening, sympathetic to anyone scraping by",
        occupations: &["rideshare driver", "food courier", "warehouse temp"],
        age: (20.0, 45.0),
        analytical_emotional: (50.0, 70.0),
        trust: (30.0, 50.0),
        skepticism: (40.0, 60.0),
        leader_follower: (60.0, 85.0),
        attention_span: (20.0, 45.0),
        persuasion_resistance: (20.0, 40.0),
        topic_biases: &[("poverty", -20.0), ("money", -10.0), ("police", -10.0)],
        triggers: &["poverty"],
        trigger_direction: Sympathetic,
        leadership: 25.0,
        style: Reserved,
        background: "A {occupation} losing a week of income to be here.",
    },
];

/// The built-in catalog as owned templates.
pub fn builtin_catalog() -> Vec<JurorTemplate> {
    ARCHETYPES.iter().map(JurorTemplate::from).collect()
}

/// Validate a catalog: non-empty, unique ids, every template well-formed.
pub fn validate_catalog(templates: &[JurorTemplate]) -> Result<()> {
    if templates.is_empty() {
        return Err(JuryError::EmptyCatalog);
    }
    let mut seen = HashSet::new();
    for t in templates {
        if !seen.insert(t.id.as_str()) {
            return Err(JuryError::DuplicateArchetype(t.id.clone()));
        }
        t.validate()?;
    }
    Ok(())
}

/// Parse a JSON array of templates and validate it.
pub fn load_catalog_json(json: &str) -> Result<Vec<JurorTemplate>> {
    let templates: Vec<JurorTemplate> = serde_json::from_str(json)?;
    validate_catalog(&templates)?;
    Ok(templates)
}

pub fn load_catalog_path(path: &Path) -> Result<Vec<JurorTemplate>> {
    let text = std::fs::read_to_string(path).map_err(|source| JuryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_catalog_json(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = builtin_catalog();
        validate_catalog(&catalog).unwrap();
        assert!(catalog.len() >= 18, "pool of 18 needs 18 archetypes");
    }

    #[test]
    fn catalog_round_trips_through_json() {
        let json = serde_json::to_string(&builtin_catalog()).unwrap();
        let loaded = load_catalog_json(&json).unwrap();
        assert_eq!(loaded, builtin_catalog());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut catalog = builtin_catalog();
        catalog.push(catalog[0].clone());
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(matches!(
            load_catalog_json(&json),
            Err(JuryError::DuplicateArchetype(id)) if id == "retired_engineer"
        ));
    }

    #[test]
    fn empty_catalog_rejected() {
        assert!(matches!(load_catalog_json("[]"), Err(JuryError::EmptyCatalog)));
    }
}

//! QA tests for headquarters development and stored campaign records.

use std::collections::HashSet;
use vaesen_core::testing::{sample_character, sample_headquarters};
use vaesen_core::world::UpgradeType;
use vaesen_core::{
    evaluate_prerequisite, purchase_upgrade, Campaign, CampaignCreationData, PurchaseError,
    TABLES,
};

// =============================================================================
// UPGRADES
// =============================================================================

#[test]
fn test_upgrade_tree_for_occultist() {
    let occultist = sample_character("Occultist");
    let mut hq = sample_headquarters();
    hq.adjust_development_points(20);

    // Occult Collection needs Occultist or Library
    purchase_upgrade(&mut hq, "occult-collection", &occultist, &TABLES).unwrap();
    purchase_upgrade(&mut hq, "chapel", &occultist, &TABLES).unwrap();

    // Both halves of the crypt's prerequisite now hold, so it shows up
    let available: Vec<_> = hq.available(&occultist, &TABLES).iter().map(|u| u.id.clone()).collect();
    assert!(available.contains(&"crypt".to_string()));
    assert!(!available.contains(&"secret-passage".to_string()));

    purchase_upgrade(&mut hq, "crypt", &occultist, &TABLES).unwrap();
    assert_eq!(hq.development_points, 20 - 4 - 2 - 4);
    assert_eq!(hq.purchased().len(), 3);
}

#[test]
fn test_archetype_or_resources() {
    let mut servant = sample_character("Servant");
    let mut hq = sample_headquarters();
    hq.adjust_development_points(3);

    servant.resources = 2;
    let result = purchase_upgrade(&mut hq, "armory", &servant, &TABLES);
    assert!(matches!(result, Err(PurchaseError::PrerequisiteNotMet(_))));

    servant.resources = 3;
    purchase_upgrade(&mut hq, "armory", &servant, &TABLES).unwrap();
    assert_eq!(hq.development_points, 0);
}

#[test]
fn test_prerequisite_examples() {
    let mut hunter = sample_character("Hunter");
    hunter.resources = 2;
    let none = HashSet::new();
    assert!(!evaluate_prerequisite("Resources 3 & Hunter", &hunter, &none, &TABLES));
    assert!(evaluate_prerequisite("Available from start", &hunter, &none, &TABLES));
    assert!(evaluate_prerequisite("Hunter or Resources 3", &hunter, &none, &TABLES));
}

#[test]
fn test_insufficient_points_leaves_state() {
    let character = sample_character("Academic");
    let mut hq = sample_headquarters();
    hq.adjust_development_points(3);
    let result = purchase_upgrade(&mut hq, "observatory", &character, &TABLES);
    assert_eq!(
        result.unwrap_err(),
        PurchaseError::InsufficientPoints {
            cost: 5,
            available: 3
        }
    );
    assert_eq!(hq.development_points, 3);
    assert!(hq.purchased().is_empty());
}

// =============================================================================
// STORED RECORDS
// =============================================================================

const STORED_CAMPAIGN: &str = r#"{
  "id": "6f1c2a8e-3b4d-4e5f-9a0b-1c2d3e4f5a6b",
  "user_id": "b7e9d1f0-0000-4000-8000-000000000001",
  "character_data": {
    "name": "Signe Ek",
    "archetype": {
      "name": "Writer",
      "description": "A chronicler of wonders and horrors.",
      "mainAttribute": "Logic",
      "mainSkill": "Inspiration",
      "talents": ["Wordsmith", "Journalist", "Inspiring"],
      "equipment": ["Typewriter or Notebooks", "Fountain pen", "Letters of introduction"],
      "resources": [2, 4],
      "motivations": ["You chase the story no one else dares."],
      "traumas": ["The thing you wrote about came to visit."],
      "darkSecrets": ["You invented your most famous interview."],
      "relationships": []
    },
    "age": "Middle-aged",
    "attributes": { "Physique": 3, "Precision": 3, "Logic": 5, "Empathy": 3 },
    "skills": {
      "Agility": 1, "Close Combat": 0, "Force": 0, "Medicine": 0,
      "Ranged Combat": 1, "Stealth": 1, "Investigation": 2, "Learning": 2,
      "Vigilance": 1, "Inspiration": 3, "Manipulation": 1, "Observation": 0
    },
    "talents": ["Journalist"],
    "motivation": "You chase the story no one else dares.",
    "trauma": "The thing you wrote about came to visit.",
    "darkSecret": "You invented your most famous interview.",
    "relationships": [{ "name": "Elsa", "description": "Editor in Stockholm" }],
    "memento": "A lock of hair tied with red thread",
    "equipment": ["Notebooks", "Fountain pen", "Letters of introduction"],
    "resources": 2,
    "conditions": [
      { "name": "Exhausted", "type": "physical", "active": false },
      { "name": "Battered", "type": "physical", "active": true },
      { "name": "Wounded", "type": "physical", "active": false },
      { "name": "Angry", "type": "mental", "active": false },
      { "name": "Frightened", "type": "mental", "active": false },
      { "name": "Hopeless", "type": "mental", "active": false }
    ],
    "xp": 7,
    "defects": [],
    "insights": [{ "name": "Visions", "description": "Glimpses of the other side; +1 to Observation.", "type": "mental" }],
    "portraitUrl": ""
  },
  "headquarters_data": {
    "name": "Castle Gyllencreutz",
    "developmentPoints": 4,
    "upgrades": [
      { "id": "library", "name": "Library", "type": "Facility", "prerequisite": "Available from start", "cost": 2, "description": "", "purchased": true },
      { "id": "laboratory", "name": "Laboratory", "type": "Facility", "prerequisite": "Library", "cost": 3, "description": "", "purchased": false },
      { "id": "ballroom", "name": "Ballroom", "type": "Facility", "prerequisite": "Orangery", "cost": 2, "description": "", "purchased": false }
    ]
  },
  "journal_data": "We arrived at the castle."
}"#;

#[test]
fn test_load_stored_campaign() {
    let mut campaign = Campaign::from_json(STORED_CAMPAIGN).expect("stored record should load");
    let character = &campaign.character_data;
    assert_eq!(character.condition_counts().physical, 1);
    assert_eq!(character.xp, 7);

    let hq = &mut campaign.headquarters_data;
    assert_eq!(hq.upgrades[2].kind, UpgradeType::Facility);

    // Unknown upgrade names are reported, and never satisfied
    let warnings = hq.integrity_warnings(&TABLES);
    assert_eq!(warnings.len(), 1);
    let status = hq.status("ballroom", character, &TABLES).unwrap();
    assert!(!status.prerequisite_met);

    purchase_upgrade(hq, "laboratory", character, &TABLES).unwrap();
    assert_eq!(hq.development_points, 1);

    let reloaded = Campaign::from_json(&campaign.to_json().unwrap()).unwrap();
    assert_eq!(reloaded, campaign);
}

#[test]
fn test_new_campaign_record() {
    let data = CampaignCreationData::new(sample_character("Vagabond"), sample_headquarters());
    let a = Campaign::new("user", data.clone());
    let b = Campaign::new("user", data);
    assert_ne!(a.id, b.id);
    assert_eq!(a.headquarters_data.name, "Castle Gyllencreutz");
    assert_eq!(a.headquarters_data.upgrades.len(), TABLES.upgrades.len());
}

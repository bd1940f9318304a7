//! Fixtures for tests.
//!
//! - `sample_character` builds a legal starting investigator of any archetype
//! - `sample_headquarters` is a fresh headquarters with no points
//! - `seeded_engine` gives a dice engine with reproducible rolls

use crate::character_builder::CharacterBuilder;
use crate::config::EngineConfig;
use crate::rules::DicePoolEngine;
use crate::tables::TABLES;
use crate::world::{Character, Headquarters};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A young investigator with budgets auto-allocated, first equipment options
/// and no active conditions.
///
/// # Panics
///
/// If `archetype` is not in the standard tables.
pub fn sample_character(archetype: &str) -> Character {
    let archetype = TABLES
        .archetype(archetype)
        .unwrap_or_else(|| panic!("unknown archetype {archetype}"))
        .clone();
    let mut builder = CharacterBuilder::new(archetype);
    builder.set_name(format!("Test {}", builder.archetype().name));
    builder.auto_allocate();
    builder.choose_equipment_defaults();
    builder.set_memento("A lucky coin from your first wage");
    builder
        .build(&TABLES)
        .expect("sample character should build")
}

pub fn sample_headquarters() -> Headquarters {
    Headquarters::new(&EngineConfig::default(), &TABLES)
}

pub fn seeded_engine(seed: u64) -> DicePoolEngine<StdRng> {
    DicePoolEngine::new(&EngineConfig::default(), StdRng::seed_from_u64(seed))
}

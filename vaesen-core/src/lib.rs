//! Rules engine for Vaesen investigators.
//!
//! This crate provides:
//! - Point-buy character creation with age budgets and archetype caps
//! - Dice pool tests with pushing, condition penalties and fear
//! - Condition tracking and the broken state
//! - Headquarters upgrades gated by prerequisite expressions
//! - Experience, advances and end-of-mystery recovery
//! - Campaign records serialized with the stored field names
//!
//! The core performs no I/O. Randomness is injected through [`rand::Rng`].
//!
//! # Quick Start
//!
//! ```ignore
//! use vaesen_core::{CharacterBuilder, DicePoolEngine, EngineConfig, Test, TABLES};
//! use vaesen_core::world::Skill;
//!
//! let mut builder = CharacterBuilder::new(TABLES.archetype("Hunter").unwrap().clone());
//! builder.set_name("Ingrid");
//! builder.auto_allocate();
//! builder.choose_equipment_defaults();
//! let mut character = builder.build(&TABLES)?;
//!
//! let mut engine = DicePoolEngine::new(&EngineConfig::default(), rand::thread_rng());
//! let result = engine.roll_test(&character, Test::Skill(Skill::RangedCombat), 0)?;
//! if result.roll.successes == 0 {
//!     engine.push(&mut character)?;
//! }
//! ```

pub mod advancement;
pub mod campaign;
pub mod character_builder;
pub mod conditions;
pub mod config;
pub mod dice;
pub mod headquarters;
pub mod rules;
pub mod tables;
pub mod testing;
pub mod world;

// Primary public API
pub use advancement::{Advance, AdvanceError, RecoverySession};
pub use campaign::{Campaign, CampaignCreationData, CampaignError, CampaignId};
pub use character_builder::{Allocation, BuilderError, CharacterBuilder};
pub use conditions::{ConditionCounts, ConditionError};
pub use config::EngineConfig;
pub use dice::{roll_dice, DiceRoll};
pub use headquarters::{
    evaluate_prerequisite, purchase_upgrade, IntegrityWarning, Prerequisite, PurchaseError,
    UpgradeStatus,
};
pub use rules::{
    compute_fear_pool, compute_skill_pool, push_roll, resolve_fear, ActionError, DicePoolEngine,
    FearOutcome, ResistWith, RollHistory, RollSession, SkillPool, Test,
};
pub use tables::{RulesTables, TABLES};
pub use world::{Character, Headquarters};

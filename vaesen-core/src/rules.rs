//! Dice pool resolution: skill and attribute tests, pushing, fear.
//!
//! Pool sizes come from the character's attribute (plus skill), the caller's
//! modifier, and one die lost per active condition of either category. A
//! character broken in the category tied to the tested attribute may not roll
//! at all. Fear tests are never blocked.
//!
//! [`DicePoolEngine`] wraps the pure functions with a single roll session
//! (`Idle -> Rolled -> Pushed`) and a bounded roll history.

use crate::config::EngineConfig;
use crate::dice::DiceRoll;
use crate::world::{Attribute, Character, ConditionKind, Skill};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

/// Most dice companions can add to a fear test.
pub const MAX_COMPANION_BONUS: u32 = 3;

/// Errors from attempting a roll or a push.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("You are broken ({0}) and cannot roll this test")]
    Broken(ConditionKind),

    #[error("You are already broken and cannot take another {0} condition")]
    NoConditionSlot(ConditionKind),

    #[error("This roll has already been pushed")]
    AlreadyPushed,

    #[error("Nothing to push: roll first")]
    NotRolled,

    #[error("Fear tests cannot be pushed")]
    NotPushable,
}

// ============================================================================
// Pools
// ============================================================================

/// What is being tested: a skill (attribute + skill) or a bare attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Test {
    Skill(Skill),
    Attribute(Attribute),
}

impl Test {
    /// Test for `skill`, or for its attribute alone.
    pub fn from_skill(skill: Skill, attribute_only: bool) -> Self {
        if attribute_only {
            Test::Attribute(skill.attribute())
        } else {
            Test::Skill(skill)
        }
    }

    pub fn attribute(&self) -> Attribute {
        match self {
            Test::Skill(skill) => skill.attribute(),
            Test::Attribute(attribute) => *attribute,
        }
    }

    /// Condition category taken when this test is pushed.
    pub fn condition_kind(&self) -> ConditionKind {
        self.attribute().condition_kind()
    }

    fn base(&self, character: &Character) -> i32 {
        let attribute = i32::from(character.attribute(self.attribute()));
        match self {
            Test::Skill(skill) => attribute + i32::from(character.skill(*skill)),
            Test::Attribute(_) => attribute,
        }
    }
}

impl fmt::Display for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Test::Skill(skill) => write!(f, "{skill} Test"),
            Test::Attribute(attribute) => write!(f, "{attribute} Test"),
        }
    }
}

/// Pool size for a skill or attribute test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillPool {
    pub pool: u32,
    /// Broken in the tested category; the roll is forbidden.
    pub blocked: bool,
}

fn floor_pool(dice: i32) -> u32 {
    dice.max(1) as u32
}

pub fn compute_test_pool(character: &Character, test: Test, modifier: i32) -> SkillPool {
    let penalty = character.condition_counts().total() as i32;
    SkillPool {
        pool: floor_pool(test.base(character) + modifier - penalty),
        blocked: character.is_broken(test.condition_kind()),
    }
}

pub fn compute_skill_pool(
    character: &Character,
    skill: Skill,
    modifier: i32,
    attribute_only: bool,
) -> SkillPool {
    compute_test_pool(character, Test::from_skill(skill, attribute_only), modifier)
}

/// Attribute used to resist fear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResistWith {
    Logic,
    Empathy,
}

impl ResistWith {
    pub fn attribute(&self) -> Attribute {
        match self {
            ResistWith::Logic => Attribute::Logic,
            ResistWith::Empathy => Attribute::Empathy,
        }
    }

    pub fn from_name(name: &str) -> Option<ResistWith> {
        match Attribute::from_name(name)? {
            Attribute::Logic => Some(ResistWith::Logic),
            Attribute::Empathy => Some(ResistWith::Empathy),
            _ => None,
        }
    }
}

pub fn compute_fear_pool(character: &Character, resist: ResistWith, companions: u32) -> u32 {
    let base = i32::from(character.attribute(resist.attribute()));
    let bonus = companions.min(MAX_COMPANION_BONUS) as i32;
    let penalty = character.condition_counts().total() as i32;
    floor_pool(base + bonus - penalty)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FearOutcome {
    Resisted,
    /// The character must take this many mental conditions.
    Terrified { conditions_required: u32 },
}

pub fn resolve_fear(successes: u32, fear_value: u32) -> FearOutcome {
    if successes >= fear_value {
        FearOutcome::Resisted
    } else {
        FearOutcome::Terrified {
            conditions_required: fear_value - successes,
        }
    }
}

impl fmt::Display for FearOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FearOutcome::Resisted => write!(f, "Success! You resisted the fear."),
            FearOutcome::Terrified {
                conditions_required: 1,
            } => write!(f, "Terrified! Take 1 mental condition."),
            FearOutcome::Terrified {
                conditions_required,
            } => write!(f, "Terrified! Take {conditions_required} mental conditions."),
        }
    }
}

// ============================================================================
// Pushing
// ============================================================================

/// Result of a successful push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    pub roll: DiceRoll,
    /// Name of the condition taken to push.
    pub condition: String,
}

/// Push a test of `attribute`: take the first inactive condition of the
/// matching category, then reroll every die that is not a 6.
///
/// The character is only changed once the push is known to succeed.
pub fn push_roll<R: Rng + ?Sized>(
    character: &mut Character,
    attribute: Attribute,
    prior: &DiceRoll,
    rng: &mut R,
) -> Result<PushOutcome, ActionError> {
    let kind = attribute.condition_kind();
    let condition = character
        .take_condition(kind)
        .ok_or(ActionError::NoConditionSlot(kind))?
        .name
        .clone();
    let roll = prior.push_with_rng(rng);
    tracing::debug!(%attribute, %condition, successes = roll.successes, "roll pushed");
    Ok(PushOutcome { roll, condition })
}

// ============================================================================
// History
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub label: String,
    pub roll: DiceRoll,
    pub pushed: bool,
}

/// Bounded log of recent rolls, most recent first. Display only.
#[derive(Debug, Clone)]
pub struct RollHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl RollHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Engine
// ============================================================================

/// State of the current roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollSession {
    Idle,
    Rolled { test: Test, roll: DiceRoll },
    Pushed { test: Test, roll: DiceRoll },
    Fear {
        resist: ResistWith,
        fear_value: u32,
        roll: DiceRoll,
        outcome: FearOutcome,
    },
}

/// A completed skill or attribute roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub test: Test,
    pub pool: u32,
    pub roll: DiceRoll,
}

/// A completed fear test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FearResult {
    pub pool: u32,
    pub roll: DiceRoll,
    pub outcome: FearOutcome,
}

/// Rolls dice for one character at a time and remembers recent results.
pub struct DicePoolEngine<R> {
    rng: R,
    session: RollSession,
    history: RollHistory,
}

impl<R: Rng> DicePoolEngine<R> {
    pub fn new(config: &EngineConfig, rng: R) -> Self {
        Self {
            rng,
            session: RollSession::Idle,
            history: RollHistory::new(config.history_len),
        }
    }

    pub fn session(&self) -> &RollSession {
        &self.session
    }

    pub fn history(&self) -> &RollHistory {
        &self.history
    }

    /// Whether the current roll may still be pushed.
    pub fn can_push(&self) -> bool {
        matches!(self.session, RollSession::Rolled { .. })
    }

    /// Roll a skill or attribute test. Starts a new session.
    pub fn roll_test(
        &mut self,
        character: &Character,
        test: Test,
        modifier: i32,
    ) -> Result<TestResult, ActionError> {
        let pool = compute_test_pool(character, test, modifier);
        if pool.blocked {
            tracing::debug!(%test, "roll blocked by broken state");
            return Err(ActionError::Broken(test.condition_kind()));
        }

        let roll = DiceRoll::roll_with_rng(pool.pool, &mut self.rng);
        tracing::debug!(%test, pool = pool.pool, successes = roll.successes, "test rolled");

        self.history.record(HistoryEntry {
            label: test.to_string(),
            roll: roll.clone(),
            pushed: false,
        });
        self.session = RollSession::Rolled {
            test,
            roll: roll.clone(),
        };
        Ok(TestResult {
            test,
            pool: pool.pool,
            roll,
        })
    }

    /// Roll a fear test. A fear value below 1 counts as 1.
    pub fn roll_fear(
        &mut self,
        character: &Character,
        resist: ResistWith,
        fear_value: u32,
        companions: u32,
    ) -> FearResult {
        let fear_value = fear_value.max(1);
        let pool = compute_fear_pool(character, resist, companions);
        let roll = DiceRoll::roll_with_rng(pool, &mut self.rng);
        let outcome = resolve_fear(roll.successes, fear_value);
        tracing::debug!(pool, fear_value, successes = roll.successes, ?outcome, "fear test rolled");

        self.history.record(HistoryEntry {
            label: format!("Fear Test (vs {fear_value})"),
            roll: roll.clone(),
            pushed: false,
        });
        self.session = RollSession::Fear {
            resist,
            fear_value,
            roll: roll.clone(),
            outcome,
        };
        FearResult {
            pool,
            roll,
            outcome,
        }
    }

    /// Push the current roll, taking a condition on `character`.
    ///
    /// `character` must be the one the current roll was made for.
    pub fn push(&mut self, character: &mut Character) -> Result<PushOutcome, ActionError> {
        let (test, prior) = match &self.session {
            RollSession::Idle => return Err(ActionError::NotRolled),
            RollSession::Pushed { .. } => return Err(ActionError::AlreadyPushed),
            RollSession::Fear { .. } => return Err(ActionError::NotPushable),
            RollSession::Rolled { test, roll } => (*test, roll.clone()),
        };

        let outcome = push_roll(character, test.attribute(), &prior, &mut self.rng)?;

        self.history.record(HistoryEntry {
            label: test.to_string(),
            roll: outcome.roll.clone(),
            pushed: true,
        });
        self.session = RollSession::Pushed {
            test,
            roll: outcome.roll.clone(),
        };
        Ok(outcome)
    }

    /// End the current roll.
    pub fn close(&mut self) {
        self.session = RollSession::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_character;
    use crate::world::Attributes;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn engine() -> DicePoolEngine<StdRng> {
        DicePoolEngine::new(&EngineConfig::default(), StdRng::seed_from_u64(11))
    }

    #[test]
    fn test_skill_pool_example() {
        let mut character = sample_character("Officer");
        character.attributes.set(Attribute::Physique, 3);
        character.skills.set(Skill::Force, 2);
        character.set_condition("Battered", true).unwrap();

        let pool = compute_skill_pool(&character, Skill::Force, 1, false);
        assert_eq!(pool, SkillPool { pool: 5, blocked: false });

        let pool = compute_skill_pool(&character, Skill::Force, 1, true);
        assert_eq!(pool.pool, 3);
    }

    #[test]
    fn test_penalty_counts_both_categories() {
        let mut character = sample_character("Officer");
        character.attributes.set(Attribute::Logic, 3);
        character.skills.set(Skill::Learning, 1);
        character.set_condition("Exhausted", true).unwrap();
        character.set_condition("Angry", true).unwrap();

        let pool = compute_skill_pool(&character, Skill::Learning, 0, false);
        assert_eq!(pool.pool, 2);
    }

    #[test]
    fn test_pool_floor_is_one() {
        let mut character = sample_character("Officer");
        character.attributes = Attributes::new(2, 2, 2, 2);
        character.skills.set(Skill::Stealth, 0);
        let pool = compute_skill_pool(&character, Skill::Stealth, -10, false);
        assert_eq!(pool.pool, 1);
        assert!(!pool.blocked);
    }

    #[test]
    fn test_broken_lockout_by_category() {
        let mut character = sample_character("Officer");
        for name in ["Exhausted", "Battered", "Wounded"] {
            character.set_condition(name, true).unwrap();
        }

        assert!(compute_skill_pool(&character, Skill::Force, 0, false).blocked);
        assert!(compute_skill_pool(&character, Skill::Stealth, 0, true).blocked);
        assert!(!compute_skill_pool(&character, Skill::Learning, 0, false).blocked);

        let mut engine = engine();
        assert_eq!(
            engine.roll_test(&character, Test::Skill(Skill::Force), 0),
            Err(ActionError::Broken(ConditionKind::Physical))
        );
        assert_eq!(engine.session(), &RollSession::Idle);
        assert!(engine.history().is_empty());
        assert!(engine.roll_test(&character, Test::Skill(Skill::Learning), 0).is_ok());
    }

    #[test]
    fn test_fear_pool_example() {
        let mut character = sample_character("Academic");
        character.attributes.set(Attribute::Logic, 3);
        assert_eq!(compute_fear_pool(&character, ResistWith::Logic, 5), 6);
        assert_eq!(
            resolve_fear(2, 4),
            FearOutcome::Terrified {
                conditions_required: 2
            }
        );
        assert_eq!(resolve_fear(4, 4), FearOutcome::Resisted);
    }

    #[test]
    fn test_fear_not_blocked_when_broken() {
        let mut character = sample_character("Academic");
        character.attributes.set(Attribute::Logic, 3);
        for name in ["Angry", "Frightened", "Hopeless"] {
            character.set_condition(name, true).unwrap();
        }
        assert_eq!(compute_fear_pool(&character, ResistWith::Logic, 0), 1);

        let mut engine = engine();
        let result = engine.roll_fear(&character, ResistWith::Logic, 2, 0);
        assert_eq!(result.pool, 1);
        assert_eq!(engine.push(&mut character), Err(ActionError::NotPushable));
    }

    #[test]
    fn test_push_takes_matching_condition() {
        let mut character = sample_character("Officer");
        let mut rng = StdRng::seed_from_u64(5);
        let prior = DiceRoll::from_faces(vec![6, 2, 3, 6, 1]);

        let outcome = push_roll(&mut character, Attribute::Precision, &prior, &mut rng).unwrap();
        assert_eq!(outcome.condition, "Exhausted");
        assert!(character.condition("Exhausted").unwrap().active);
        assert_eq!(outcome.roll.pool(), 5);
        assert_eq!(&outcome.roll.faces[..2], &[6, 6]);
        assert!(outcome.roll.successes >= 2);

        let outcome = push_roll(&mut character, Attribute::Empathy, &prior, &mut rng).unwrap();
        assert_eq!(outcome.condition, "Angry");
    }

    #[test]
    fn test_push_without_slot_changes_nothing() {
        let mut character = sample_character("Officer");
        for name in ["Angry", "Frightened", "Hopeless"] {
            character.set_condition(name, true).unwrap();
        }
        let before = character.clone();
        let mut rng = StdRng::seed_from_u64(5);
        let prior = DiceRoll::from_faces(vec![1, 2]);

        let result = push_roll(&mut character, Attribute::Logic, &prior, &mut rng);
        assert_eq!(result, Err(ActionError::NoConditionSlot(ConditionKind::Mental)));
        assert_eq!(character, before);
    }

    #[test]
    fn test_push_keeps_sixes_from_faces() {
        let mut character = sample_character("Officer");
        let mut rng = StdRng::seed_from_u64(5);
        let prior: DiceRoll =
            serde_json::from_str(r#"{"faces":[6,6,1],"successes":0}"#).unwrap();

        let outcome = push_roll(&mut character, Attribute::Physique, &prior, &mut rng).unwrap();
        assert_eq!(&outcome.roll.faces[..2], &[6, 6]);
        assert!(outcome.roll.successes >= 2);
        assert_eq!(outcome.condition, "Exhausted");
    }

    #[test]
    fn test_push_once_per_roll() {
        let mut character = sample_character("Officer");
        let mut engine = engine();

        assert_eq!(engine.push(&mut character), Err(ActionError::NotRolled));

        let rolled = engine
            .roll_test(&character, Test::Skill(Skill::CloseCombat), 0)
            .unwrap();
        assert!(engine.can_push());
        let pushed = engine.push(&mut character).unwrap();
        assert!(pushed.roll.successes >= rolled.roll.successes);
        assert_eq!(character.active_conditions(ConditionKind::Physical), 1);

        assert_eq!(engine.push(&mut character), Err(ActionError::AlreadyPushed));
        assert_eq!(character.active_conditions(ConditionKind::Physical), 1);

        engine.close();
        assert_eq!(engine.push(&mut character), Err(ActionError::NotRolled));
    }

    #[test]
    fn test_history_is_capped_most_recent_first() {
        let character = sample_character("Officer");
        let mut engine = engine();
        let skills = [
            Skill::Agility,
            Skill::Force,
            Skill::Medicine,
            Skill::Stealth,
            Skill::Learning,
            Skill::Inspiration,
        ];
        for skill in skills {
            engine.roll_test(&character, Test::Skill(skill), 0).unwrap();
        }
        assert_eq!(engine.history().len(), 5);
        let labels: Vec<_> = engine.history().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels[0], "Inspiration Test");
        assert_eq!(labels[4], "Force Test");
    }

    #[test]
    fn test_new_roll_resets_push() {
        let mut character = sample_character("Officer");
        let mut engine = engine();
        engine.roll_test(&character, Test::Attribute(Attribute::Physique), 0).unwrap();
        engine.push(&mut character).unwrap();
        engine.roll_test(&character, Test::Attribute(Attribute::Logic), 0).unwrap();
        assert!(engine.can_push());
    }
}

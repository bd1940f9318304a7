//! Play-time character maintenance: experience, advances, mementos,
//! relationships, critical injuries and end-of-mystery recovery.

use crate::conditions::ConditionError;
use crate::dice::DiceRoll;
use crate::tables::{RulesTables, XP_QUESTIONS};
use crate::world::{Attribute, Character, ConditionKind, DefectInsight, Relationship, Skill};
use rand::Rng;
use thiserror::Error;

/// Experience spent per advance.
pub const ADVANCE_COST: u32 = 5;

/// Highest a skill can be raised through advances.
pub const MAX_SKILL: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvanceError {
    #[error("Not enough XP: need {needed}, have {available}")]
    NotEnoughExperience { needed: u32, available: u32 },

    #[error("{0} is already at maximum level")]
    SkillAtMaximum(Skill),

    #[error("You already have the talent {0}")]
    TalentKnown(String),

    #[error("Unknown talent: {0}")]
    UnknownTalent(String),

    #[error("The {0} recovery roll has already been made")]
    AlreadyRolled(ConditionKind),

    #[error("No {0} successes left to spend")]
    NoSuccessesLeft(ConditionKind),

    #[error("{0} successes cannot be spent on that")]
    WrongKind(ConditionKind),

    #[error("Nothing at position {0}")]
    NotFound(usize),

    #[error("{0} is not active")]
    NotActive(String),

    #[error(transparent)]
    Condition(#[from] ConditionError),
}

/// What 5 XP buys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Skill(Skill),
    Talent(String),
}

impl Character {
    /// Add 1 XP per "yes" answer to the end-of-mystery questions.
    pub fn award_experience(&mut self, answers: &[bool]) -> u32 {
        let earned = answers
            .iter()
            .take(XP_QUESTIONS.len())
            .filter(|&&yes| yes)
            .count() as u32;
        self.xp += earned;
        earned
    }

    /// Add or remove XP, never going below zero.
    pub fn adjust_experience(&mut self, delta: i64) -> u32 {
        self.xp = (i64::from(self.xp) + delta).clamp(0, i64::from(u32::MAX)) as u32;
        self.xp
    }

    pub fn buy_advance(&mut self, advance: Advance, tables: &RulesTables) -> Result<(), AdvanceError> {
        if self.xp < ADVANCE_COST {
            return Err(AdvanceError::NotEnoughExperience {
                needed: ADVANCE_COST,
                available: self.xp,
            });
        }

        match advance {
            Advance::Skill(skill) => {
                let value = self.skill(skill);
                if value >= MAX_SKILL {
                    return Err(AdvanceError::SkillAtMaximum(skill));
                }
                self.skills.set(skill, value + 1);
            }
            Advance::Talent(talent) => {
                if tables.talent_description(&talent).is_none() {
                    return Err(AdvanceError::UnknownTalent(talent));
                }
                if self.has_talent(&talent) {
                    return Err(AdvanceError::TalentKnown(talent));
                }
                self.talents.push(talent);
            }
        }

        self.xp -= ADVANCE_COST;
        Ok(())
    }

    /// Clear one active condition by turning to the memento.
    pub fn heal_with_memento(&mut self, condition: &str) -> Result<(), AdvanceError> {
        let current = self
            .condition(condition)
            .ok_or_else(|| ConditionError::UnknownCondition(condition.trim().to_string()))?;
        if !current.active {
            return Err(AdvanceError::NotActive(current.name.clone()));
        }
        self.set_condition(condition, false)?;
        Ok(())
    }

    /// Add a relationship; blank names are ignored.
    pub fn add_relationship(&mut self, name: &str, description: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.relationships.push(Relationship {
            name: name.to_string(),
            description: description.trim().to_string(),
        });
        true
    }

    pub fn remove_relationship(&mut self, index: usize) -> Result<Relationship, AdvanceError> {
        if index >= self.relationships.len() {
            return Err(AdvanceError::NotFound(index));
        }
        Ok(self.relationships.remove(index))
    }

    /// Record a critical injury. Injuries granting a bonus ("+" in the
    /// description) are insights, the rest defects.
    pub fn add_critical_injury(&mut self, injury: DefectInsight) {
        if injury.description.contains('+') {
            self.insights.push(injury);
        } else {
            self.defects.push(injury);
        }
    }

    pub fn remove_defect(&mut self, index: usize) -> Result<DefectInsight, AdvanceError> {
        if index >= self.defects.len() {
            return Err(AdvanceError::NotFound(index));
        }
        Ok(self.defects.remove(index))
    }

    pub fn remove_insight(&mut self, index: usize) -> Result<DefectInsight, AdvanceError> {
        if index >= self.insights.len() {
            return Err(AdvanceError::NotFound(index));
        }
        Ok(self.insights.remove(index))
    }
}

// ============================================================================
// End-of-mystery recovery
// ============================================================================

/// Dice for a recovery roll: Physique + Precision or Logic + Empathy.
pub fn recovery_pool(character: &Character, kind: ConditionKind) -> u32 {
    let (a, b) = match kind {
        ConditionKind::Physical => (Attribute::Physique, Attribute::Precision),
        ConditionKind::Mental => (Attribute::Logic, Attribute::Empathy),
    };
    u32::from(character.attribute(a)) + u32::from(character.attribute(b))
}

#[derive(Debug, Clone, Default)]
struct Pool {
    roll: Option<DiceRoll>,
    left: u32,
}

/// Recovery after a mystery.
///
/// Each category is rolled at most once. Every success may heal one defect
/// or keep one insight of the same category. When the session finishes,
/// unhealed defects stay and only kept insights survive.
#[derive(Debug, Clone)]
pub struct RecoverySession {
    physical: Pool,
    mental: Pool,
    defects: Vec<DefectInsight>,
    healed: Vec<bool>,
    insights: Vec<DefectInsight>,
    kept: Vec<bool>,
}

impl RecoverySession {
    pub fn new(character: &Character) -> Self {
        Self {
            physical: Pool::default(),
            mental: Pool::default(),
            healed: vec![false; character.defects.len()],
            defects: character.defects.clone(),
            kept: vec![false; character.insights.len()],
            insights: character.insights.clone(),
        }
    }

    fn pool(&self, kind: ConditionKind) -> &Pool {
        match kind {
            ConditionKind::Physical => &self.physical,
            ConditionKind::Mental => &self.mental,
        }
    }

    fn pool_mut(&mut self, kind: ConditionKind) -> &mut Pool {
        match kind {
            ConditionKind::Physical => &mut self.physical,
            ConditionKind::Mental => &mut self.mental,
        }
    }

    pub fn roll<R: Rng + ?Sized>(
        &mut self,
        character: &Character,
        kind: ConditionKind,
        rng: &mut R,
    ) -> Result<&DiceRoll, AdvanceError> {
        if self.pool(kind).roll.is_some() {
            return Err(AdvanceError::AlreadyRolled(kind));
        }
        let roll = DiceRoll::roll_with_rng(recovery_pool(character, kind), rng);
        tracing::debug!(%kind, successes = roll.successes, "recovery rolled");
        let pool = self.pool_mut(kind);
        pool.left = roll.successes;
        Ok(pool.roll.insert(roll))
    }

    pub fn successes_left(&self, kind: ConditionKind) -> u32 {
        self.pool(kind).left
    }

    fn spend(&mut self, kind: ConditionKind) -> Result<(), AdvanceError> {
        let pool = self.pool_mut(kind);
        if pool.left == 0 {
            return Err(AdvanceError::NoSuccessesLeft(kind));
        }
        pool.left -= 1;
        Ok(())
    }

    /// Spend a success of `kind` to heal the defect at `index`.
    pub fn heal_defect(&mut self, kind: ConditionKind, index: usize) -> Result<(), AdvanceError> {
        let defect = self.defects.get(index).ok_or(AdvanceError::NotFound(index))?;
        if defect.kind != kind {
            return Err(AdvanceError::WrongKind(kind));
        }
        if self.healed[index] {
            return Ok(());
        }
        self.spend(kind)?;
        self.healed[index] = true;
        Ok(())
    }

    /// Spend a success of `kind` to keep the insight at `index`.
    pub fn keep_insight(&mut self, kind: ConditionKind, index: usize) -> Result<(), AdvanceError> {
        let insight = self.insights.get(index).ok_or(AdvanceError::NotFound(index))?;
        if insight.kind != kind {
            return Err(AdvanceError::WrongKind(kind));
        }
        if self.kept[index] {
            return Ok(());
        }
        self.spend(kind)?;
        self.kept[index] = true;
        Ok(())
    }

    /// Write the surviving defects and insights back to the character.
    pub fn finish(self, character: &mut Character) {
        character.defects = self
            .defects
            .into_iter()
            .zip(self.healed)
            .filter(|(_, healed)| !healed)
            .map(|(d, _)| d)
            .collect();
        character.insights = self
            .insights
            .into_iter()
            .zip(self.kept)
            .filter(|(_, kept)| *kept)
            .map(|(i, _)| i)
            .collect();
    }
}

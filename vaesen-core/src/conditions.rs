//! Condition tracking.
//!
//! A character carries three physical and three mental conditions. Three
//! active conditions in one category leaves the character broken in it.

use crate::world::{Character, Condition, ConditionKind};
use thiserror::Error;

/// Active conditions needed to be broken in a category.
pub const BROKEN_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error("Unknown condition: {0}")]
    UnknownCondition(String),
}

/// Active condition counts per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConditionCounts {
    pub physical: u32,
    pub mental: u32,
}

impl ConditionCounts {
    pub fn get(&self, kind: ConditionKind) -> u32 {
        match kind {
            ConditionKind::Physical => self.physical,
            ConditionKind::Mental => self.mental,
        }
    }

    /// Dice lost from every pool.
    pub fn total(&self) -> u32 {
        self.physical + self.mental
    }
}

impl Character {
    fn condition_index(&self, name: &str) -> Result<usize, ConditionError> {
        let name = name.trim();
        self.conditions
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ConditionError::UnknownCondition(name.to_string()))
    }

    pub fn condition(&self, name: &str) -> Option<&Condition> {
        self.condition_index(name).ok().map(|i| &self.conditions[i])
    }

    /// Flip a condition and return its new state.
    pub fn toggle_condition(&mut self, name: &str) -> Result<bool, ConditionError> {
        let index = self.condition_index(name)?;
        let condition = &mut self.conditions[index];
        condition.active = !condition.active;
        tracing::debug!(condition = %condition.name, active = condition.active, "condition toggled");
        Ok(condition.active)
    }

    pub fn set_condition(&mut self, name: &str, active: bool) -> Result<(), ConditionError> {
        let index = self.condition_index(name)?;
        self.conditions[index].active = active;
        Ok(())
    }

    pub fn condition_counts(&self) -> ConditionCounts {
        self.conditions
            .iter()
            .filter(|c| c.active)
            .fold(ConditionCounts::default(), |mut counts, c| {
                match c.kind {
                    ConditionKind::Physical => counts.physical += 1,
                    ConditionKind::Mental => counts.mental += 1,
                }
                counts
            })
    }

    pub fn active_conditions(&self, kind: ConditionKind) -> u32 {
        self.condition_counts().get(kind)
    }

    pub fn is_broken(&self, kind: ConditionKind) -> bool {
        self.active_conditions(kind) >= BROKEN_THRESHOLD
    }

    /// Index of the first inactive condition of `kind`.
    pub fn first_inactive_condition(&self, kind: ConditionKind) -> Option<usize> {
        self.conditions
            .iter()
            .position(|c| c.kind == kind && !c.active)
    }

    /// Activate the first inactive condition of `kind`, if any.
    pub fn take_condition(&mut self, kind: ConditionKind) -> Option<&Condition> {
        let index = self.first_inactive_condition(kind)?;
        self.conditions[index].active = true;
        Some(&self.conditions[index])
    }

    /// Activate up to `count` conditions of `kind`; returns how many were
    /// actually taken.
    pub fn take_conditions(&mut self, kind: ConditionKind, count: u32) -> u32 {
        let mut taken = 0;
        while taken < count && self.take_condition(kind).is_some() {
            taken += 1;
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_character;

    #[test]
    fn test_toggle_twice_restores() {
        let mut character = sample_character("Officer");
        assert_eq!(character.toggle_condition("Battered"), Ok(true));
        assert_eq!(character.toggle_condition("battered"), Ok(false));
        assert_eq!(character.condition_counts(), ConditionCounts::default());
    }

    #[test]
    fn test_unknown_condition() {
        let mut character = sample_character("Officer");
        let before = character.clone();
        assert_eq!(
            character.toggle_condition("Sleepy"),
            Err(ConditionError::UnknownCondition("Sleepy".to_string()))
        );
        assert_eq!(character, before);
    }

    #[test]
    fn test_counts_and_broken() {
        let mut character = sample_character("Officer");
        character.set_condition("Exhausted", true).unwrap();
        character.set_condition("Battered", true).unwrap();
        character.set_condition("Angry", true).unwrap();
        assert_eq!(
            character.condition_counts(),
            ConditionCounts {
                physical: 2,
                mental: 1
            }
        );
        assert_eq!(character.condition_counts().total(), 3);
        assert!(!character.is_broken(ConditionKind::Physical));

        character.set_condition("Wounded", true).unwrap();
        assert!(character.is_broken(ConditionKind::Physical));
        assert!(!character.is_broken(ConditionKind::Mental));
    }

    #[test]
    fn test_take_condition_in_order() {
        let mut character = sample_character("Officer");
        character.set_condition("Angry", true).unwrap();
        let taken = character.take_condition(ConditionKind::Mental).unwrap();
        assert_eq!(taken.name, "Frightened");
        assert_eq!(character.take_conditions(ConditionKind::Mental, 5), 1);
        assert!(character.take_condition(ConditionKind::Mental).is_none());
    }
}

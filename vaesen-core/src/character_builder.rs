//! Point-buy character creation.
//!
//! Attributes start at 2 and skills at 0. The age group fixes how many points
//! go into each, the archetype raises the cap on its main attribute and main
//! skill, and every resource point above the archetype minimum is paid for
//! out of the skill budget.

use crate::tables::{standard_conditions, RulesTables};
use crate::world::{AgeGroup, Archetype, Attribute, Attributes, Character, Skill, Skills};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use thiserror::Error;

pub const MIN_ATTRIBUTE: u8 = 2;
pub const MIN_SKILL: u8 = 0;

/// Separator marking an equipment entry as a choice between two options.
pub const EQUIPMENT_CHOICE_SEPARATOR: &str = " or ";

// ============================================================================
// Budgets
// ============================================================================

/// Attribute points for an age group.
pub fn attribute_budget(age: AgeGroup) -> u32 {
    match age {
        AgeGroup::Young => 15,
        AgeGroup::MiddleAged => 14,
        AgeGroup::Old => 13,
    }
}

/// Skill points for an age group.
pub fn skill_budget(age: AgeGroup) -> u32 {
    match age {
        AgeGroup::Young => 10,
        AgeGroup::MiddleAged => 12,
        AgeGroup::Old => 14,
    }
}

pub fn max_attribute(archetype: &Archetype, attribute: Attribute) -> u8 {
    if archetype.main_attribute == attribute {
        5
    } else {
        4
    }
}

pub fn max_skill(archetype: &Archetype, skill: Skill) -> u8 {
    if archetype.main_skill == skill {
        3
    } else {
        2
    }
}

pub fn attribute_total(attributes: &Attributes) -> u32 {
    attributes.total()
}

/// Skill points spent on resources above the archetype minimum.
pub fn resource_cost(archetype: &Archetype, resources: u8) -> u32 {
    u32::from(resources.saturating_sub(archetype.min_resources()))
}

/// Result of checking an allocation against its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub legal: bool,
    /// Unspent points; negative when over budget.
    pub remaining: i32,
}

fn remaining(budget: u32, spent: u32) -> i32 {
    budget as i32 - spent as i32
}

pub fn validate_attribute_allocation(
    archetype: &Archetype,
    age: AgeGroup,
    attributes: &Attributes,
) -> Allocation {
    let remaining = remaining(attribute_budget(age), attribute_total(attributes));
    let in_bounds = Attribute::all().into_iter().all(|attribute| {
        let value = attributes.get(attribute);
        (MIN_ATTRIBUTE..=max_attribute(archetype, attribute)).contains(&value)
    });
    Allocation {
        legal: in_bounds && remaining == 0,
        remaining,
    }
}

pub fn validate_skill_allocation(
    archetype: &Archetype,
    age: AgeGroup,
    skills: &Skills,
    resources: u8,
) -> Allocation {
    let spent = skills.total() + resource_cost(archetype, resources);
    let remaining = remaining(skill_budget(age), spent);
    let in_bounds = Skill::all()
        .into_iter()
        .all(|skill| skills.get(skill) <= max_skill(archetype, skill))
        && (archetype.min_resources()..=archetype.max_resources()).contains(&resources);
    Allocation {
        legal: in_bounds && remaining == 0,
        remaining,
    }
}

/// The two options of a choice entry, or `None` for fixed equipment.
pub fn equipment_options(entry: &str) -> Option<(&str, &str)> {
    entry
        .split_once(EQUIPMENT_CHOICE_SEPARATOR)
        .map(|(a, b)| (a.trim(), b.trim()))
}

// ============================================================================
// Errors
// ============================================================================

/// Error from character building.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("{attribute} must be between {min} and {max}, got {value}")]
    AttributeOutOfRange {
        attribute: Attribute,
        value: u8,
        min: u8,
        max: u8,
    },

    #[error("{skill} must be between 0 and {max}, got {value}")]
    SkillOutOfRange { skill: Skill, value: u8, max: u8 },

    #[error("Resources must be between {min} and {max}, got {value}")]
    ResourcesOutOfRange { value: u8, min: u8, max: u8 },

    #[error("Attribute budget of {budget} points exceeded")]
    AttributeBudgetExceeded { budget: u32 },

    #[error("Skill budget of {budget} points exceeded")]
    SkillBudgetExceeded { budget: u32 },

    #[error("{remaining} attribute points left to spend")]
    AttributePointsUnspent { remaining: i32 },

    #[error("{remaining} skill points left to spend")]
    SkillPointsUnspent { remaining: i32 },

    #[error("Character name is required")]
    MissingName,

    #[error("{value} is not a {field} option for this archetype")]
    NotAnOption { field: &'static str, value: String },

    #[error("Equipment entry {0} is not a choice")]
    NotAChoice(usize),

    #[error("Choose between {0}")]
    MissingEquipmentChoice(String),
}

// ============================================================================
// Builder
// ============================================================================

/// In-progress character.
///
/// Every setter either applies its change or returns an error and leaves the
/// builder exactly as it was.
#[derive(Debug, Clone)]
pub struct CharacterBuilder {
    archetype: Archetype,
    age: AgeGroup,
    name: String,
    attributes: Attributes,
    skills: Skills,
    resources: u8,
    motivation: String,
    trauma: String,
    dark_secret: String,
    talent: String,
    /// Chosen option keyed by equipment entry index.
    equipment_choices: BTreeMap<usize, String>,
    memento: Option<String>,
    portrait_url: String,
}

fn first_or_empty(options: &[String]) -> String {
    options.first().cloned().unwrap_or_default()
}

fn pick(field: &'static str, options: &[String], value: &str) -> Result<String, BuilderError> {
    options
        .iter()
        .find(|o| o.as_str() == value)
        .cloned()
        .ok_or_else(|| BuilderError::NotAnOption {
            field,
            value: value.to_string(),
        })
}

impl CharacterBuilder {
    /// Start a young character of the given archetype.
    pub fn new(archetype: Archetype) -> Self {
        let mut builder = Self {
            archetype,
            age: AgeGroup::default(),
            name: String::new(),
            attributes: Attributes::default(),
            skills: Skills::new(),
            resources: 0,
            motivation: String::new(),
            trauma: String::new(),
            dark_secret: String::new(),
            talent: String::new(),
            equipment_choices: BTreeMap::new(),
            memento: None,
            portrait_url: String::new(),
        };
        builder.reset();
        builder
    }

    /// Clear allocations, background picks and equipment choices.
    fn reset(&mut self) {
        self.attributes = Attributes::default();
        self.skills = Skills::new();
        self.resources = self.archetype.min_resources();
        self.motivation = first_or_empty(&self.archetype.motivations);
        self.trauma = first_or_empty(&self.archetype.traumas);
        self.dark_secret = first_or_empty(&self.archetype.dark_secrets);
        self.talent = first_or_empty(&self.archetype.talents);
        self.equipment_choices.clear();
    }

    pub fn archetype(&self) -> &Archetype {
        &self.archetype
    }

    pub fn age(&self) -> AgeGroup {
        self.age
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn skills(&self) -> &Skills {
        &self.skills
    }

    pub fn resources(&self) -> u8 {
        self.resources
    }

    pub fn set_archetype(&mut self, archetype: Archetype) {
        self.archetype = archetype;
        self.reset();
    }

    pub fn set_age(&mut self, age: AgeGroup) {
        self.age = age;
        self.reset();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_memento(&mut self, memento: impl Into<String>) {
        self.memento = Some(memento.into());
    }

    pub fn set_portrait(&mut self, portrait_url: impl Into<String>) {
        self.portrait_url = portrait_url.into();
    }

    pub fn attribute_allocation(&self) -> Allocation {
        validate_attribute_allocation(&self.archetype, self.age, &self.attributes)
    }

    pub fn skill_allocation(&self) -> Allocation {
        validate_skill_allocation(&self.archetype, self.age, &self.skills, self.resources)
    }

    pub fn set_attribute(&mut self, attribute: Attribute, value: u8) -> Result<(), BuilderError> {
        let max = max_attribute(&self.archetype, attribute);
        if !(MIN_ATTRIBUTE..=max).contains(&value) {
            tracing::debug!(%attribute, value, "attribute out of range");
            return Err(BuilderError::AttributeOutOfRange {
                attribute,
                value,
                min: MIN_ATTRIBUTE,
                max,
            });
        }

        let budget = attribute_budget(self.age);
        let total = self.attributes.total() - u32::from(self.attributes.get(attribute))
            + u32::from(value);
        if total > budget {
            tracing::debug!(%attribute, value, budget, "attribute budget exceeded");
            return Err(BuilderError::AttributeBudgetExceeded { budget });
        }

        self.attributes.set(attribute, value);
        Ok(())
    }

    pub fn set_skill(&mut self, skill: Skill, value: u8) -> Result<(), BuilderError> {
        let max = max_skill(&self.archetype, skill);
        if value > max {
            tracing::debug!(%skill, value, "skill out of range");
            return Err(BuilderError::SkillOutOfRange { skill, value, max });
        }

        let budget = skill_budget(self.age);
        let total = self.skills.total() - u32::from(self.skills.get(skill))
            + u32::from(value)
            + resource_cost(&self.archetype, self.resources);
        if total > budget {
            tracing::debug!(%skill, value, budget, "skill budget exceeded");
            return Err(BuilderError::SkillBudgetExceeded { budget });
        }

        self.skills.set(skill, value);
        Ok(())
    }

    /// Set resources; points above the archetype minimum come out of the
    /// skill budget.
    pub fn set_resources(&mut self, value: u8) -> Result<(), BuilderError> {
        let (min, max) = self.archetype.resources;
        if !(min..=max).contains(&value) {
            return Err(BuilderError::ResourcesOutOfRange { value, min, max });
        }

        let budget = skill_budget(self.age);
        if self.skills.total() + resource_cost(&self.archetype, value) > budget {
            tracing::debug!(value, budget, "resources exceed skill budget");
            return Err(BuilderError::SkillBudgetExceeded { budget });
        }

        self.resources = value;
        Ok(())
    }

    pub fn set_motivation(&mut self, motivation: &str) -> Result<(), BuilderError> {
        self.motivation = pick("motivation", &self.archetype.motivations, motivation)?;
        Ok(())
    }

    pub fn set_trauma(&mut self, trauma: &str) -> Result<(), BuilderError> {
        self.trauma = pick("trauma", &self.archetype.traumas, trauma)?;
        Ok(())
    }

    pub fn set_dark_secret(&mut self, dark_secret: &str) -> Result<(), BuilderError> {
        self.dark_secret = pick("dark secret", &self.archetype.dark_secrets, dark_secret)?;
        Ok(())
    }

    pub fn set_talent(&mut self, talent: &str) -> Result<(), BuilderError> {
        self.talent = pick("talent", &self.archetype.talents, talent)?;
        Ok(())
    }

    /// Resolve the choice entry at `index` to one of its two options.
    pub fn choose_equipment(&mut self, index: usize, option: &str) -> Result<(), BuilderError> {
        let entry = self
            .archetype
            .equipment
            .get(index)
            .ok_or(BuilderError::NotAChoice(index))?;
        let (a, b) = equipment_options(entry).ok_or(BuilderError::NotAChoice(index))?;
        let option = option.trim();
        if option != a && option != b {
            return Err(BuilderError::NotAnOption {
                field: "equipment",
                value: option.to_string(),
            });
        }
        self.equipment_choices.insert(index, option.to_string());
        Ok(())
    }

    /// Pick the first option for every unresolved equipment choice.
    pub fn choose_equipment_defaults(&mut self) {
        for (index, entry) in self.archetype.equipment.iter().enumerate() {
            if let Some((first, _)) = equipment_options(entry) {
                self.equipment_choices
                    .entry(index)
                    .or_insert_with(|| first.to_string());
            }
        }
    }

    /// Choice entries still waiting for a decision.
    pub fn pending_equipment_choices(&self) -> Vec<&str> {
        self.archetype
            .equipment
            .iter()
            .enumerate()
            .filter(|(index, entry)| {
                equipment_options(entry).is_some() && !self.equipment_choices.contains_key(index)
            })
            .map(|(_, entry)| entry.as_str())
            .collect()
    }

    /// Spend both budgets legally, main attribute and main skill first.
    ///
    /// Resources are left at the archetype minimum.
    pub fn auto_allocate(&mut self) {
        let archetype = &self.archetype;

        let mut attributes = Attributes::default();
        let mut left = attribute_budget(self.age).saturating_sub(attributes.total());
        let main = archetype.main_attribute;
        while left > 0 && attributes.get(main) < max_attribute(archetype, main) {
            attributes.set(main, attributes.get(main) + 1);
            left -= 1;
        }
        while left > 0 {
            let mut progressed = false;
            for attribute in Attribute::all() {
                if left > 0 && attributes.get(attribute) < max_attribute(archetype, attribute) {
                    attributes.set(attribute, attributes.get(attribute) + 1);
                    left -= 1;
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }

        let mut skills = Skills::new();
        let mut left = skill_budget(self.age);
        let main = archetype.main_skill;
        while left > 0 && skills.get(main) < max_skill(archetype, main) {
            skills.set(main, skills.get(main) + 1);
            left -= 1;
        }
        while left > 0 {
            let mut progressed = false;
            for skill in Skill::all() {
                if left > 0 && skills.get(skill) < max_skill(archetype, skill) {
                    skills.set(skill, skills.get(skill) + 1);
                    left -= 1;
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }

        self.attributes = attributes;
        self.skills = skills;
        self.resources = archetype.min_resources();
    }

    /// Equipment list with every choice replaced by the chosen option.
    fn resolved_equipment(&self) -> Result<Vec<String>, BuilderError> {
        self.archetype
            .equipment
            .iter()
            .enumerate()
            .map(|(index, entry)| match equipment_options(entry) {
                None => Ok(entry.clone()),
                Some(_) => self
                    .equipment_choices
                    .get(&index)
                    .cloned()
                    .ok_or_else(|| BuilderError::MissingEquipmentChoice(entry.clone())),
            })
            .collect()
    }

    /// Finish the character, drawing a memento from `rng` if none was set.
    pub fn build_with_rng<R: Rng + ?Sized>(
        &self,
        tables: &RulesTables,
        rng: &mut R,
    ) -> Result<Character, BuilderError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(BuilderError::MissingName);
        }

        let attributes = self.attribute_allocation();
        if !attributes.legal {
            return Err(BuilderError::AttributePointsUnspent {
                remaining: attributes.remaining,
            });
        }
        let skills = self.skill_allocation();
        if !skills.legal {
            return Err(BuilderError::SkillPointsUnspent {
                remaining: skills.remaining,
            });
        }

        let equipment = self.resolved_equipment()?;

        let memento = match &self.memento {
            Some(memento) => memento.clone(),
            None => tables
                .mementos
                .choose(rng)
                .map(|m| m.to_string())
                .unwrap_or_default(),
        };

        tracing::debug!(name, archetype = %self.archetype.name, "character created");

        Ok(Character {
            name: name.to_string(),
            archetype: self.archetype.clone(),
            age: self.age,
            attributes: self.attributes,
            skills: self.skills.clone(),
            talents: if self.talent.is_empty() {
                Vec::new()
            } else {
                vec![self.talent.clone()]
            },
            motivation: self.motivation.clone(),
            trauma: self.trauma.clone(),
            dark_secret: self.dark_secret.clone(),
            relationships: Vec::new(),
            memento,
            equipment,
            resources: self.resources,
            conditions: standard_conditions(),
            xp: 0,
            defects: Vec::new(),
            insights: Vec::new(),
            portrait_url: self.portrait_url.clone(),
        })
    }

    /// Finish the character using the thread-local RNG.
    pub fn build(&self, tables: &RulesTables) -> Result<Character, BuilderError> {
        self.build_with_rng(tables, &mut rand::thread_rng())
    }
}

/// Validate and finish a builder in one step.
pub fn finalize_character(
    builder: &CharacterBuilder,
    tables: &RulesTables,
) -> Result<Character, BuilderError> {
    builder.build(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::TABLES;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn builder(archetype: &str) -> CharacterBuilder {
        CharacterBuilder::new(TABLES.archetype(archetype).unwrap().clone())
    }

    #[test]
    fn test_age_budgets() {
        assert_eq!((attribute_budget(AgeGroup::Young), skill_budget(AgeGroup::Young)), (15, 10));
        assert_eq!(
            (attribute_budget(AgeGroup::MiddleAged), skill_budget(AgeGroup::MiddleAged)),
            (14, 12)
        );
        assert_eq!((attribute_budget(AgeGroup::Old), skill_budget(AgeGroup::Old)), (13, 14));
    }

    #[test]
    fn test_caps_follow_archetype() {
        let officer = TABLES.archetype("Officer").unwrap();
        assert_eq!(max_attribute(officer, Attribute::Physique), 5);
        assert_eq!(max_attribute(officer, Attribute::Logic), 4);
        assert_eq!(max_skill(officer, Skill::CloseCombat), 3);
        assert_eq!(max_skill(officer, Skill::Force), 2);
    }

    #[test]
    fn test_attribute_out_of_range_keeps_value() {
        let mut b = builder("Officer");
        b.set_attribute(Attribute::Logic, 4).unwrap();

        let result = b.set_attribute(Attribute::Logic, 5);
        assert!(matches!(result, Err(BuilderError::AttributeOutOfRange { max: 4, .. })));
        assert_eq!(b.attributes().get(Attribute::Logic), 4);

        let result = b.set_attribute(Attribute::Logic, 1);
        assert!(matches!(result, Err(BuilderError::AttributeOutOfRange { min: 2, .. })));
        assert_eq!(b.attributes().get(Attribute::Logic), 4);

        b.set_attribute(Attribute::Physique, 5).unwrap();
    }

    #[test]
    fn test_attribute_budget_exceeded() {
        let mut b = builder("Officer");
        b.set_age(AgeGroup::Old);
        // 13 points: 2+2+2+2 = 8 base, 5 to spend
        b.set_attribute(Attribute::Physique, 5).unwrap();
        b.set_attribute(Attribute::Precision, 4).unwrap();
        let result = b.set_attribute(Attribute::Logic, 3);
        assert_eq!(result, Err(BuilderError::AttributeBudgetExceeded { budget: 13 }));
        assert_eq!(b.attributes().get(Attribute::Logic), 2);
        assert_eq!(b.attribute_allocation(), Allocation { legal: true, remaining: 0 });
    }

    #[test]
    fn test_resources_cost_skill_points() {
        let mut b = builder("Academic");
        assert_eq!(b.resources(), 4);
        b.set_resources(6).unwrap();
        assert_eq!(b.skill_allocation().remaining, 8);

        b.set_skill(Skill::Learning, 3).unwrap();
        b.set_skill(Skill::Investigation, 2).unwrap();
        b.set_skill(Skill::Vigilance, 2).unwrap();
        b.set_skill(Skill::Observation, 1).unwrap();
        assert_eq!(b.skill_allocation(), Allocation { legal: true, remaining: 0 });

        assert_eq!(
            b.set_skill(Skill::Agility, 1),
            Err(BuilderError::SkillBudgetExceeded { budget: 10 })
        );
        assert!(matches!(
            b.set_resources(7),
            Err(BuilderError::ResourcesOutOfRange { .. })
        ));

        // Lowering resources frees points again
        b.set_resources(5).unwrap();
        b.set_skill(Skill::Agility, 1).unwrap();
    }

    #[test]
    fn test_resources_blocked_by_spent_skills() {
        let mut b = builder("Academic");
        b.auto_allocate();
        assert_eq!(
            b.set_resources(5),
            Err(BuilderError::SkillBudgetExceeded { budget: 10 })
        );
        assert_eq!(b.resources(), 4);
    }

    #[test]
    fn test_skill_over_cap() {
        let mut b = builder("Doctor");
        b.set_skill(Skill::Medicine, 3).unwrap();
        assert!(matches!(
            b.set_skill(Skill::Force, 3),
            Err(BuilderError::SkillOutOfRange { max: 2, .. })
        ));
    }

    #[test]
    fn test_auto_allocate_is_legal_for_every_archetype_and_age() {
        for archetype in &TABLES.archetypes {
            for age in AgeGroup::all() {
                let mut b = CharacterBuilder::new(archetype.clone());
                b.set_age(age);
                b.auto_allocate();
                assert!(b.attribute_allocation().legal, "{} {age}", archetype.name);
                assert!(b.skill_allocation().legal, "{} {age}", archetype.name);
                assert_eq!(
                    b.attributes().get(archetype.main_attribute),
                    max_attribute(archetype, archetype.main_attribute)
                );
            }
        }
    }

    #[test]
    fn test_missing_name_error() {
        let mut b = builder("Hunter");
        b.auto_allocate();
        b.choose_equipment_defaults();
        let result = b.build(&TABLES);
        assert!(matches!(result, Err(BuilderError::MissingName)));
    }

    #[test]
    fn test_unspent_points_error() {
        let mut b = builder("Hunter");
        b.set_name("Ingrid");
        let result = b.build(&TABLES);
        assert!(matches!(
            result,
            Err(BuilderError::AttributePointsUnspent { remaining: 7 })
        ));
    }

    #[test]
    fn test_equipment_choice_required() {
        let mut b = builder("Hunter");
        b.set_name("Ingrid");
        b.auto_allocate();
        assert_eq!(b.pending_equipment_choices(), vec!["Bear trap or Hunting dog"]);
        assert!(matches!(
            b.build(&TABLES),
            Err(BuilderError::MissingEquipmentChoice(_))
        ));

        assert_eq!(b.choose_equipment(0, "Rifle"), Err(BuilderError::NotAChoice(0)));
        assert!(matches!(
            b.choose_equipment(2, "Crossbow"),
            Err(BuilderError::NotAnOption { .. })
        ));
        b.choose_equipment(2, "Hunting dog").unwrap();
        assert!(b.pending_equipment_choices().is_empty());

        let character = b.build(&TABLES).expect("Should build successfully");
        assert_eq!(character.equipment, vec!["Rifle", "Hunting knife", "Hunting dog"]);
    }

    #[test]
    fn test_build_hunter() {
        let mut b = builder("Hunter");
        b.set_name("Ingrid Svensson");
        b.set_age(AgeGroup::MiddleAged);
        b.auto_allocate();
        b.choose_equipment_defaults();
        b.set_talent("Lone Wolf").unwrap();
        b.set_memento("A silver locket");

        let character = b.build(&TABLES).expect("Should build successfully");
        assert_eq!(character.name, "Ingrid Svensson");
        assert_eq!(character.age, AgeGroup::MiddleAged);
        assert_eq!(character.attributes.total(), 14);
        assert_eq!(character.talents, vec!["Lone Wolf"]);
        assert_eq!(character.memento, "A silver locket");
        assert_eq!(character.conditions.len(), 6);
        assert!(character.conditions.iter().all(|c| !c.active));
        assert_eq!(character.xp, 0);
        assert!(character.defects.is_empty());
        assert!(character.insights.is_empty());
        assert!(character.relationships.is_empty());
    }

    #[test]
    fn test_random_memento_from_table() {
        let mut b = builder("Priest");
        b.set_name("Father Lind");
        b.auto_allocate();
        b.choose_equipment_defaults();

        let mut rng = StdRng::seed_from_u64(7);
        let first = b.build_with_rng(&TABLES, &mut rng).unwrap();
        assert!(TABLES.mementos.contains(&first.memento.as_str()));

        let mut rng = StdRng::seed_from_u64(7);
        let second = b.build_with_rng(&TABLES, &mut rng).unwrap();
        assert_eq!(first.memento, second.memento);
    }

    #[test]
    fn test_background_must_be_archetype_option() {
        let mut b = builder("Writer");
        let before = b.clone();
        assert!(matches!(
            b.set_motivation("Fame and fortune"),
            Err(BuilderError::NotAnOption { field: "motivation", .. })
        ));
        assert_eq!(b.motivation, before.motivation);

        let option = b.archetype().traumas[1].clone();
        b.set_trauma(&option).unwrap();
        assert_eq!(b.trauma, option);
    }

    #[test]
    fn test_archetype_change_resets() {
        let mut b = builder("Academic");
        b.auto_allocate();
        b.choose_equipment_defaults();
        b.set_archetype(TABLES.archetype("Vagabond").unwrap().clone());

        assert_eq!(b.attributes().total(), 8);
        assert_eq!(b.skills().total(), 0);
        assert_eq!(b.resources(), 1);
        assert_eq!(b.talent, b.archetype().talents[0]);
        assert!(b.equipment_choices.is_empty());
    }

    #[test]
    fn test_equipment_options() {
        assert_eq!(equipment_options("Morphine or Liquor"), Some(("Morphine", "Liquor")));
        assert_eq!(equipment_options("Doctor's bag"), None);
    }
}

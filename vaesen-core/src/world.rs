//! Investigator and headquarters types.
//!
//! These are the shapes handed to the persistence layer verbatim, so the
//! serde field names follow the stored campaign records (camelCase keys,
//! display names for attributes and skills, `type` for condition and
//! upgrade categories).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Attributes
// ============================================================================

/// The four attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Physique,
    Precision,
    Logic,
    Empathy,
}

impl Attribute {
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Physique => "Physique",
            Attribute::Precision => "Precision",
            Attribute::Logic => "Logic",
            Attribute::Empathy => "Empathy",
        }
    }

    pub fn all() -> [Attribute; 4] {
        [
            Attribute::Physique,
            Attribute::Precision,
            Attribute::Logic,
            Attribute::Empathy,
        ]
    }

    /// The condition category that pushing or breaking affects for this attribute.
    pub fn condition_kind(&self) -> ConditionKind {
        match self {
            Attribute::Physique | Attribute::Precision => ConditionKind::Physical,
            Attribute::Logic | Attribute::Empathy => ConditionKind::Mental,
        }
    }

    /// Parse a case-insensitive attribute name.
    pub fn from_name(name: &str) -> Option<Attribute> {
        Attribute::all()
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Attribute values container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(rename = "Physique")]
    pub physique: u8,
    #[serde(rename = "Precision")]
    pub precision: u8,
    #[serde(rename = "Logic")]
    pub logic: u8,
    #[serde(rename = "Empathy")]
    pub empathy: u8,
}

impl Attributes {
    pub fn new(physique: u8, precision: u8, logic: u8, empathy: u8) -> Self {
        Self {
            physique,
            precision,
            logic,
            empathy,
        }
    }

    pub fn get(&self, attribute: Attribute) -> u8 {
        match attribute {
            Attribute::Physique => self.physique,
            Attribute::Precision => self.precision,
            Attribute::Logic => self.logic,
            Attribute::Empathy => self.empathy,
        }
    }

    pub fn set(&mut self, attribute: Attribute, value: u8) {
        match attribute {
            Attribute::Physique => self.physique = value,
            Attribute::Precision => self.precision = value,
            Attribute::Logic => self.logic = value,
            Attribute::Empathy => self.empathy = value,
        }
    }

    pub fn total(&self) -> u32 {
        Attribute::all()
            .iter()
            .map(|a| u32::from(self.get(*a)))
            .sum()
    }
}

impl Default for Attributes {
    /// Every attribute at the creation minimum of 2.
    fn default() -> Self {
        Self::new(2, 2, 2, 2)
    }
}

// ============================================================================
// Skills
// ============================================================================

/// The twelve skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Skill {
    Agility,
    #[serde(rename = "Close Combat")]
    CloseCombat,
    Force,
    Medicine,
    #[serde(rename = "Ranged Combat")]
    RangedCombat,
    Stealth,
    Investigation,
    Learning,
    Vigilance,
    Inspiration,
    Manipulation,
    Observation,
}

impl Skill {
    /// The attribute every test of this skill is rolled with.
    pub fn attribute(&self) -> Attribute {
        match self {
            Skill::Agility | Skill::CloseCombat | Skill::Force => Attribute::Physique,
            Skill::Medicine | Skill::RangedCombat | Skill::Stealth => Attribute::Precision,
            Skill::Investigation | Skill::Learning | Skill::Vigilance => Attribute::Logic,
            Skill::Inspiration | Skill::Manipulation | Skill::Observation => Attribute::Empathy,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Agility => "Agility",
            Skill::CloseCombat => "Close Combat",
            Skill::Force => "Force",
            Skill::Medicine => "Medicine",
            Skill::RangedCombat => "Ranged Combat",
            Skill::Stealth => "Stealth",
            Skill::Investigation => "Investigation",
            Skill::Learning => "Learning",
            Skill::Vigilance => "Vigilance",
            Skill::Inspiration => "Inspiration",
            Skill::Manipulation => "Manipulation",
            Skill::Observation => "Observation",
        }
    }

    pub fn all() -> [Skill; 12] {
        [
            Skill::Agility,
            Skill::CloseCombat,
            Skill::Force,
            Skill::Medicine,
            Skill::RangedCombat,
            Skill::Stealth,
            Skill::Investigation,
            Skill::Learning,
            Skill::Vigilance,
            Skill::Inspiration,
            Skill::Manipulation,
            Skill::Observation,
        ]
    }

    /// Parse a skill name, ignoring case, spaces and hyphens ("close-combat" works).
    pub fn from_name(name: &str) -> Option<Skill> {
        let wanted = normalize(name);
        Skill::all()
            .into_iter()
            .find(|s| normalize(s.name()) == wanted)
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Skill values keyed by skill. Missing entries read as 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Skills(BTreeMap<Skill, u8>);

impl Skills {
    /// All twelve skills at 0.
    pub fn new() -> Self {
        Self(Skill::all().into_iter().map(|s| (s, 0)).collect())
    }

    pub fn get(&self, skill: Skill) -> u8 {
        self.0.get(&skill).copied().unwrap_or(0)
    }

    pub fn set(&mut self, skill: Skill, value: u8) {
        self.0.insert(skill, value);
    }

    pub fn total(&self) -> u32 {
        self.0.values().map(|v| u32::from(*v)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Skill, u8)> + '_ {
        self.0.iter().map(|(s, v)| (*s, *v))
    }
}

impl Default for Skills {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Age
// ============================================================================

/// Age band chosen at creation; fixes the point budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AgeGroup {
    #[default]
    Young,
    #[serde(rename = "Middle-aged")]
    MiddleAged,
    Old,
}

impl AgeGroup {
    pub fn name(&self) -> &'static str {
        match self {
            AgeGroup::Young => "Young",
            AgeGroup::MiddleAged => "Middle-aged",
            AgeGroup::Old => "Old",
        }
    }

    pub fn all() -> [AgeGroup; 3] {
        [AgeGroup::Young, AgeGroup::MiddleAged, AgeGroup::Old]
    }

    pub fn from_name(name: &str) -> Option<AgeGroup> {
        let wanted = normalize(name);
        AgeGroup::all()
            .into_iter()
            .find(|a| normalize(a.name()) == wanted)
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Archetypes
// ============================================================================

/// Immutable character template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Archetype {
    pub name: String,
    pub description: String,
    pub main_attribute: Attribute,
    pub main_skill: Skill,
    pub talents: Vec<String>,
    /// Entries containing " or " are a choice between two options.
    pub equipment: Vec<String>,
    /// Inclusive `[min, max]` resources range.
    pub resources: (u8, u8),
    pub motivations: Vec<String>,
    pub traumas: Vec<String>,
    pub dark_secrets: Vec<String>,
    pub relationships: Vec<String>,
}

impl Archetype {
    pub fn min_resources(&self) -> u8 {
        self.resources.0
    }

    pub fn max_resources(&self) -> u8 {
        self.resources.1
    }
}

// ============================================================================
// Conditions, defects and insights
// ============================================================================

/// Physical or mental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionKind {
    Physical,
    Mental,
}

impl ConditionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConditionKind::Physical => "physical",
            ConditionKind::Mental => "mental",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One of the six fixed conditions on a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ConditionKind,
    pub active: bool,
}

impl Condition {
    pub fn new(name: impl Into<String>, kind: ConditionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            active: false,
        }
    }
}

/// A permanent defect or a fading insight left by a critical injury.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefectInsight {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ConditionKind,
}

impl DefectInsight {
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: ConditionKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub name: String,
    pub description: String,
}

// ============================================================================
// Character
// ============================================================================

/// A finished investigator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub name: String,
    pub archetype: Archetype,
    pub age: AgeGroup,
    pub attributes: Attributes,
    pub skills: Skills,
    pub talents: Vec<String>,
    pub motivation: String,
    pub trauma: String,
    pub dark_secret: String,
    pub relationships: Vec<Relationship>,
    pub memento: String,
    pub equipment: Vec<String>,
    pub resources: u8,
    pub conditions: Vec<Condition>,
    pub xp: u32,
    pub defects: Vec<DefectInsight>,
    pub insights: Vec<DefectInsight>,
    /// Opaque reference to a portrait image.
    pub portrait_url: String,
}

impl Character {
    pub fn attribute(&self, attribute: Attribute) -> u8 {
        self.attributes.get(attribute)
    }

    pub fn skill(&self, skill: Skill) -> u8 {
        self.skills.get(skill)
    }

    pub fn has_talent(&self, talent: &str) -> bool {
        self.talents.iter().any(|t| t == talent)
    }

    /// Whether `skill` is this character's archetype main skill.
    pub fn is_main_skill(&self, skill: Skill) -> bool {
        self.archetype.main_skill == skill
    }
}

// ============================================================================
// Headquarters
// ============================================================================

/// Upgrade category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeType {
    Facility,
    Contact,
    Personnel,
}

impl UpgradeType {
    pub fn name(&self) -> &'static str {
        match self {
            UpgradeType::Facility => "Facility",
            UpgradeType::Contact => "Contact",
            UpgradeType::Personnel => "Personnel",
        }
    }
}

impl fmt::Display for UpgradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Marker on upgrades hidden from listings until their prerequisite is met.
pub const DISCOVERED_MARKER: &str = "(Discovered)";

/// A headquarters upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrade {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: UpgradeType,
    /// Prerequisite expression, see [`crate::headquarters::Prerequisite`].
    pub prerequisite: String,
    pub cost: u32,
    pub description: String,
    pub purchased: bool,
}

impl Upgrade {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: UpgradeType,
        prerequisite: impl Into<String>,
        cost: u32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            prerequisite: prerequisite.into(),
            cost,
            description: description.into(),
            purchased: false,
        }
    }

    pub fn is_discovered_only(&self) -> bool {
        self.name.contains(DISCOVERED_MARKER)
    }

    /// Name with the "(Discovered)" marker removed.
    pub fn display_name(&self) -> String {
        self.name
            .replace(&format!(" {DISCOVERED_MARKER}"), "")
            .replace(DISCOVERED_MARKER, "")
            .trim()
            .to_string()
    }
}

/// The shared home base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headquarters {
    pub name: String,
    pub development_points: u32,
    pub upgrades: Vec<Upgrade>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_attribute_mapping() {
        for attribute in Attribute::all() {
            let count = Skill::all()
                .iter()
                .filter(|s| s.attribute() == attribute)
                .count();
            assert_eq!(count, 3, "{attribute} should govern three skills");
        }
        assert_eq!(Skill::Force.attribute(), Attribute::Physique);
        assert_eq!(Skill::Medicine.attribute(), Attribute::Precision);
        assert_eq!(Skill::Vigilance.attribute(), Attribute::Logic);
        assert_eq!(Skill::Observation.attribute(), Attribute::Empathy);
    }

    #[test]
    fn test_condition_kind_for_attribute() {
        assert_eq!(Attribute::Physique.condition_kind(), ConditionKind::Physical);
        assert_eq!(Attribute::Precision.condition_kind(), ConditionKind::Physical);
        assert_eq!(Attribute::Logic.condition_kind(), ConditionKind::Mental);
        assert_eq!(Attribute::Empathy.condition_kind(), ConditionKind::Mental);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(Skill::from_name("close-combat"), Some(Skill::CloseCombat));
        assert_eq!(Skill::from_name("Ranged Combat"), Some(Skill::RangedCombat));
        assert_eq!(Skill::from_name("dancing"), None);
        assert_eq!(Attribute::from_name("logic"), Some(Attribute::Logic));
        assert_eq!(AgeGroup::from_name("middle-aged"), Some(AgeGroup::MiddleAged));
    }

    #[test]
    fn test_serialized_field_names() {
        let skills = serde_json::to_value(Skills::new()).unwrap();
        assert_eq!(skills["Close Combat"], 0);

        let attributes = serde_json::to_value(Attributes::default()).unwrap();
        assert_eq!(attributes["Physique"], 2);

        let condition = serde_json::to_value(Condition::new("Angry", ConditionKind::Mental)).unwrap();
        assert_eq!(condition["type"], "mental");
        assert_eq!(condition["active"], false);

        let age = serde_json::to_value(AgeGroup::MiddleAged).unwrap();
        assert_eq!(age, "Middle-aged");
    }

    #[test]
    fn test_upgrade_display_name() {
        let upgrade = Upgrade::new(
            "crypt",
            "Crypt (Discovered)",
            UpgradeType::Facility,
            "Chapel",
            4,
            "",
        );
        assert!(upgrade.is_discovered_only());
        assert_eq!(upgrade.display_name(), "Crypt");
    }
}

//! Headquarters development: prerequisite expressions and upgrade purchases.
//!
//! Prerequisites are stored as strings in the upgrade catalog:
//!
//! - `"None"` / `"Available from start"`: always met
//! - `"A & B"`: both sides met (split on `&` first, so it binds outermost)
//! - `"A or B"`: either side met
//! - `"Resources N"`: character resources of at least N
//! - anything mentioning doctor, hunter or occultist: archetype check
//! - otherwise the exact name of another upgrade, which must be purchased
//!
//! [`Prerequisite::parse`] turns a string into a tree once; evaluation never
//! re-splits strings.

use crate::config::EngineConfig;
use crate::tables::RulesTables;
use crate::world::{Character, Headquarters, Upgrade};
use std::borrow::Cow;
use std::collections::HashSet;
use thiserror::Error;

/// Archetype keywords recognised in prerequisite terms.
const ARCHETYPE_KEYWORDS: [(&str, &str); 3] = [
    ("doctor", "Doctor"),
    ("hunter", "Hunter"),
    ("occultist", "Occultist"),
];

/// Parsed prerequisite expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prerequisite {
    Always,
    And(Vec<Prerequisite>),
    Or(Vec<Prerequisite>),
    ResourcesAtLeast(u8),
    ArchetypeIs(String),
    UpgradeNamed(String),
}

impl Prerequisite {
    /// Parse a prerequisite string. Never fails: unrecognised terms become
    /// upgrade names, which evaluate false if no such upgrade exists.
    pub fn parse(expr: &str) -> Self {
        let expr = expr.trim();

        if expr == "None" || expr == "Available from start" {
            return Prerequisite::Always;
        }
        if expr.contains('&') {
            return Prerequisite::And(expr.split('&').map(Prerequisite::parse).collect());
        }
        if expr.contains(" or ") {
            return Prerequisite::Or(expr.split(" or ").map(Prerequisite::parse).collect());
        }
        if let Some(level) = expr
            .strip_prefix("Resources")
            .and_then(|rest| rest.trim().parse::<u8>().ok())
        {
            return Prerequisite::ResourcesAtLeast(level);
        }

        let lower = expr.to_lowercase();
        for (keyword, archetype) in ARCHETYPE_KEYWORDS {
            if lower.contains(keyword) {
                return Prerequisite::ArchetypeIs(archetype.to_string());
            }
        }

        Prerequisite::UpgradeNamed(expr.to_string())
    }

    /// Evaluate against a character and the set of purchased upgrade ids.
    ///
    /// Upgrade names are resolved through the catalog in `tables`.
    pub fn evaluate(
        &self,
        character: &Character,
        purchased: &HashSet<&str>,
        tables: &RulesTables,
    ) -> bool {
        match self {
            Prerequisite::Always => true,
            Prerequisite::And(terms) => terms
                .iter()
                .all(|t| t.evaluate(character, purchased, tables)),
            Prerequisite::Or(terms) => terms
                .iter()
                .any(|t| t.evaluate(character, purchased, tables)),
            Prerequisite::ResourcesAtLeast(level) => character.resources >= *level,
            Prerequisite::ArchetypeIs(name) => character.archetype.name == *name,
            Prerequisite::UpgradeNamed(name) => match tables.upgrade_named(name) {
                Some(required) => purchased.contains(required.upgrade.id.as_str()),
                None => {
                    tracing::debug!(upgrade = %name, "prerequisite references unknown upgrade");
                    false
                }
            },
        }
    }

    /// Names of every upgrade this expression depends on.
    pub fn referenced_upgrades(&self) -> Vec<&str> {
        match self {
            Prerequisite::And(terms) | Prerequisite::Or(terms) => terms
                .iter()
                .flat_map(|t| t.referenced_upgrades())
                .collect(),
            Prerequisite::UpgradeNamed(name) => vec![name.as_str()],
            _ => Vec::new(),
        }
    }
}

/// Parse and evaluate a prerequisite string in one call.
pub fn evaluate_prerequisite(
    expr: &str,
    character: &Character,
    purchased: &HashSet<&str>,
    tables: &RulesTables,
) -> bool {
    Prerequisite::parse(expr).evaluate(character, purchased, tables)
}

/// Errors from purchasing an upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("Unknown upgrade: {0}")]
    UnknownUpgrade(String),

    #[error("{0} has already been purchased")]
    AlreadyPurchased(String),

    #[error("Not enough Development Points: need {cost}, have {available}")]
    InsufficientPoints { cost: u32, available: u32 },

    #[error("Prerequisite not met: {0}")]
    PrerequisiteNotMet(String),
}

/// A prerequisite that names an upgrade missing from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityWarning {
    UnknownUpgrade { upgrade_id: String, referenced: String },
}

/// Listing and purchase state of one upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeStatus {
    /// Shown in the "available" listing (unpurchased, and not hidden by the
    /// "(Discovered)" marker).
    pub visible: bool,
    /// Could be bought right now.
    pub purchasable: bool,
    pub prerequisite_met: bool,
    pub affordable: bool,
}

impl Headquarters {
    /// A fresh headquarters with every catalog upgrade unpurchased.
    pub fn new(config: &EngineConfig, tables: &RulesTables) -> Self {
        Self {
            name: config.headquarters_name.clone(),
            development_points: 0,
            upgrades: tables
                .upgrades
                .iter()
                .map(|entry| Upgrade {
                    purchased: false,
                    ..entry.upgrade.clone()
                })
                .collect(),
        }
    }

    pub fn upgrade(&self, id: &str) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn purchased_ids(&self) -> HashSet<&str> {
        self.upgrades
            .iter()
            .filter(|u| u.purchased)
            .map(|u| u.id.as_str())
            .collect()
    }

    /// The parsed prerequisite for an upgrade, reusing the catalog's parse
    /// when the stored string has not diverged from it.
    fn prerequisite_of<'t>(&self, upgrade: &Upgrade, tables: &'t RulesTables) -> Cow<'t, Prerequisite> {
        match tables.upgrade(&upgrade.id) {
            Some(entry) if entry.upgrade.prerequisite == upgrade.prerequisite => {
                Cow::Borrowed(&entry.prerequisite)
            }
            _ => Cow::Owned(Prerequisite::parse(&upgrade.prerequisite)),
        }
    }

    fn prerequisite_met(&self, upgrade: &Upgrade, character: &Character, tables: &RulesTables) -> bool {
        self.prerequisite_of(upgrade, tables)
            .evaluate(character, &self.purchased_ids(), tables)
    }

    fn status_of(&self, upgrade: &Upgrade, character: &Character, tables: &RulesTables) -> UpgradeStatus {
        let prerequisite_met = self.prerequisite_met(upgrade, character, tables);
        let affordable = self.development_points >= upgrade.cost;
        UpgradeStatus {
            visible: !upgrade.purchased && (!upgrade.is_discovered_only() || prerequisite_met),
            purchasable: !upgrade.purchased && prerequisite_met && affordable,
            prerequisite_met,
            affordable,
        }
    }

    /// Visibility and purchasability of one upgrade.
    pub fn status(&self, id: &str, character: &Character, tables: &RulesTables) -> Option<UpgradeStatus> {
        self.upgrade(id)
            .map(|upgrade| self.status_of(upgrade, character, tables))
    }

    /// Upgrades shown in the "available to purchase" listing.
    pub fn available(&self, character: &Character, tables: &RulesTables) -> Vec<&Upgrade> {
        self.upgrades
            .iter()
            .filter(|u| self.status_of(u, character, tables).visible)
            .collect()
    }

    pub fn purchased(&self) -> Vec<&Upgrade> {
        self.upgrades.iter().filter(|u| u.purchased).collect()
    }

    /// Buy an upgrade, deducting its cost. Nothing changes on error.
    pub fn purchase(
        &mut self,
        id: &str,
        character: &Character,
        tables: &RulesTables,
    ) -> Result<&Upgrade, PurchaseError> {
        let index = self
            .upgrades
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| PurchaseError::UnknownUpgrade(id.to_string()))?;
        let upgrade = &self.upgrades[index];

        if upgrade.purchased {
            return Err(PurchaseError::AlreadyPurchased(upgrade.display_name()));
        }
        if self.development_points < upgrade.cost {
            return Err(PurchaseError::InsufficientPoints {
                cost: upgrade.cost,
                available: self.development_points,
            });
        }
        if !self.prerequisite_met(upgrade, character, tables) {
            return Err(PurchaseError::PrerequisiteNotMet(upgrade.prerequisite.clone()));
        }

        self.development_points -= upgrade.cost;
        self.upgrades[index].purchased = true;
        tracing::debug!(
            upgrade = %self.upgrades[index].id,
            remaining = self.development_points,
            "upgrade purchased"
        );
        Ok(&self.upgrades[index])
    }

    /// Add or remove Development Points, never going below zero.
    pub fn adjust_development_points(&mut self, delta: i64) -> u32 {
        let updated = (i64::from(self.development_points) + delta).clamp(0, i64::from(u32::MAX));
        self.development_points = updated as u32;
        self.development_points
    }

    /// Prerequisites that reference upgrades the catalog does not know.
    pub fn integrity_warnings(&self, tables: &RulesTables) -> Vec<IntegrityWarning> {
        self.upgrades
            .iter()
            .flat_map(|upgrade| {
                let prerequisite = self.prerequisite_of(upgrade, tables);
                prerequisite
                    .referenced_upgrades()
                    .into_iter()
                    .filter(|name| tables.upgrade_named(name).is_none())
                    .map(|name| IntegrityWarning::UnknownUpgrade {
                        upgrade_id: upgrade.id.clone(),
                        referenced: name.to_string(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// Purchase an upgrade on `headquarters`.
pub fn purchase_upgrade<'h>(
    headquarters: &'h mut Headquarters,
    id: &str,
    character: &Character,
    tables: &RulesTables,
) -> Result<&'h Upgrade, PurchaseError> {
    headquarters.purchase(id, character, tables)
}

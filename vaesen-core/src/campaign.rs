//! Campaign records as handed to storage.
//!
//! The core only converts to and from JSON; reading and writing files is
//! up to the caller.

use crate::world::{Character, Headquarters};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Unique identifier for a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(pub Uuid);

impl CampaignId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CampaignId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Data needed to create a campaign, before storage assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignCreationData {
    pub character_data: Character,
    pub headquarters_data: Headquarters,
    pub journal_data: String,
}

impl CampaignCreationData {
    pub fn new(character: Character, headquarters: Headquarters) -> Self {
        Self {
            character_data: character,
            headquarters_data: headquarters,
            journal_data: String::new(),
        }
    }
}

/// One investigator, their headquarters and the campaign journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub user_id: String,
    pub character_data: Character,
    pub headquarters_data: Headquarters,
    pub journal_data: String,
}

impl Campaign {
    pub fn new(user_id: impl Into<String>, data: CampaignCreationData) -> Self {
        Self {
            id: CampaignId::new(),
            user_id: user_id.into(),
            character_data: data.character_data,
            headquarters_data: data.headquarters_data,
            journal_data: data.journal_data,
        }
    }

    /// Append a paragraph to the journal.
    pub fn append_journal(&mut self, entry: &str) {
        let entry = entry.trim();
        if entry.is_empty() {
            return;
        }
        if !self.journal_data.is_empty() {
            self.journal_data.push_str("\n\n");
        }
        self.journal_data.push_str(entry);
    }

    pub fn to_json(&self) -> Result<String, CampaignError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CampaignError> {
        Ok(serde_json::from_str(json)?)
    }
}

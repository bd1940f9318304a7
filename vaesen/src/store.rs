//! Campaign files on disk.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use vaesen_core::{Campaign, CampaignError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Campaign(#[from] CampaignError),
}

/// Write a campaign as pretty JSON, creating parent directories.
pub async fn save_campaign(campaign: &Campaign, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, campaign.to_json()?).await?;
    tracing::debug!(path = %path.display(), "campaign saved");
    Ok(())
}

pub async fn load_campaign(path: impl AsRef<Path>) -> Result<Campaign, StoreError> {
    let content = fs::read_to_string(path).await?;
    Ok(Campaign::from_json(&content)?)
}

/// Default file for a character's campaign inside `base_dir`.
pub fn campaign_save_path(base_dir: impl AsRef<Path>, character_name: &str) -> PathBuf {
    let sanitized: String = character_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    base_dir.as_ref().join(format!("{sanitized}.json"))
}

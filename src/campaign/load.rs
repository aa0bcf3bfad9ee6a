use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::Campaign;

#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    #[error("entity id {id:?} is used more than once")]
    DuplicateId { id: String },
    #[error("entity {name:?} has an empty id")]
    EmptyId { name: String },
}

pub fn parse_campaign(raw: &str) -> Result<Campaign> {
    let campaign: Campaign = serde_json::from_str(raw).context("invalid campaign JSON")?;
    validate(&campaign)?;
    Ok(campaign)
}

pub fn load_campaign(path: &Path) -> Result<Campaign> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read campaign file {}", path.display()))?;
    let campaign =
        parse_campaign(&raw).with_context(|| format!("failed to load {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        entities = campaign.entity_count(),
        "loaded campaign"
    );
    Ok(campaign)
}

fn validate(campaign: &Campaign) -> Result<(), CampaignError> {
    let mut seen = HashSet::with_capacity(campaign.entity_count());
    for (_, entity) in campaign.entities() {
        if entity.id.trim().is_empty() {
            return Err(CampaignError::EmptyId {
                name: entity.name.clone(),
            });
        }
        if !seen.insert(entity.id.as_str()) {
            return Err(CampaignError::DuplicateId {
                id: entity.id.clone(),
            });
        }
    }
    Ok(())
}

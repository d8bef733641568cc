//! Credits collaborator
//!
//! The hub never formats credits itself. It hands contributor ids to a
//! [`CreditsProvider`] and returns whatever records come back.

use serde::{Deserialize, Serialize};

/// Display-ready credit for one contributor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditRecord {
    pub contributor_id: String,
    pub display_name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub badges: Vec<String>,
}

/// Contributor as known to the lineage registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contributor<'a> {
    pub id: &'a str,
    pub role: &'a str,
}

/// Turns contributor ids into display records
pub trait CreditsProvider: Send + Sync {
    fn credits(&self, contributors: &[Contributor<'_>]) -> Vec<CreditRecord>;
}

/// Uses the id as the display name and the registered role as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCredits;

impl CreditsProvider for PlainCredits {
    fn credits(&self, contributors: &[Contributor<'_>]) -> Vec<CreditRecord> {
        contributors
            .iter()
            .map(|c| CreditRecord {
                contributor_id: c.id.to_string(),
                display_name: c.id.to_string(),
                role: Some(c.role.to_string()),
                badges: Vec::new(),
            })
            .collect()
    }
}

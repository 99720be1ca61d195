//! Fixture data loaded into the in-memory repository at startup.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::domain::audit::Audit;
use crate::domain::client::Client;
use crate::domain::proposal::Proposal;
use crate::domain::tax_credit::TaxCredit;
use crate::repository::errors::{RepositoryError, RepositoryResult};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedData {
    pub clients: Vec<Client>,
    pub tax_credits: Vec<TaxCredit>,
    pub audits: Vec<Audit>,
    pub proposals: Vec<Proposal>,
}

impl SeedData {
    pub fn from_json(json: &str) -> RepositoryResult<Self> {
        serde_json::from_str(json).map_err(|e| RepositoryError::Seed(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| RepositoryError::Seed(format!("{}: {e}", path.display())))?;
        let seed = Self::from_json(&json)?;
        log::info!(
            "Loaded seed data from {}: {} clients, {} tax credits, {} audits, {} proposals",
            path.display(),
            seed.clients.len(),
            seed.tax_credits.len(),
            seed.audits.len(),
            seed.proposals.len()
        );
        Ok(seed)
    }
}

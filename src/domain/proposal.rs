//! Commercial proposals sent to prospects and clients.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::money::percentage;
use crate::domain::types::{ClientId, ProposalId, TypeConstraintError};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Draft,
    Sent,
    Accepted,
    Declined,
}

impl ProposalStatus {
    pub const ALL: [ProposalStatus; 4] = [
        ProposalStatus::Draft,
        ProposalStatus::Sent,
        ProposalStatus::Accepted,
        ProposalStatus::Declined,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProposalStatus::Draft => "Rascunho",
            ProposalStatus::Sent => "Enviada",
            ProposalStatus::Accepted => "Aceita",
            ProposalStatus::Declined => "Recusada",
        }
    }
}

impl Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            ProposalStatus::Draft => "draft",
            ProposalStatus::Sent => "sent",
            ProposalStatus::Accepted => "accepted",
            ProposalStatus::Declined => "declined",
        };
        write!(f, "{value}")
    }
}

impl FromStr for ProposalStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(ProposalStatus::Draft),
            "sent" => Ok(ProposalStatus::Sent),
            "accepted" => Ok(ProposalStatus::Accepted),
            "declined" => Ok(ProposalStatus::Declined),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown proposal status `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: ProposalId,
    pub client_id: ClientId,
    pub title: String,
    pub status: ProposalStatus,
    pub value_cents: i64,
    /// Success fee charged over the recovered amount.
    pub fee_percent: f64,
    pub sent_at: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default)]
pub struct ProposalFilter {
    pub client_id: Option<ClientId>,
    pub status: Option<ProposalStatus>,
}

impl ProposalFilter {
    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn status(mut self, status: ProposalStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, proposal: &Proposal) -> bool {
        self.client_id.as_ref().is_none_or(|id| *id == proposal.client_id)
            && self.status.is_none_or(|s| s == proposal.status)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProposalStats {
    pub total: usize,
    pub by_status: BTreeMap<ProposalStatus, usize>,
    /// Accepted over accepted + declined, in percent.
    pub acceptance_rate: f64,
    pub accepted_value_cents: i64,
}

impl ProposalStats {
    pub fn from_proposals<'a, I>(proposals: I) -> Self
    where
        I: IntoIterator<Item = &'a Proposal>,
    {
        let mut stats = Self::default();
        let mut accepted = 0i64;
        let mut decided = 0i64;
        for proposal in proposals {
            stats.total += 1;
            *stats.by_status.entry(proposal.status).or_insert(0) += 1;
            match proposal.status {
                ProposalStatus::Accepted => {
                    accepted += 1;
                    decided += 1;
                    stats.accepted_value_cents += proposal.value_cents;
                }
                ProposalStatus::Declined => decided += 1,
                ProposalStatus::Draft | ProposalStatus::Sent => {}
            }
        }
        stats.acceptance_rate = percentage(accepted, decided);
        stats
    }
}

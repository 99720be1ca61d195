use serde::Serialize;

use crate::domain::client::Client;
use crate::domain::money::{format_brl, format_percent};
use crate::domain::proposal::{Proposal, ProposalStats, ProposalStatus};
use crate::dto::{Choice, StatusCount, status_counts};

#[derive(Debug, Default)]
pub struct ProposalsQuery {
    pub status: Option<ProposalStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProposalRow {
    #[serde(flatten)]
    pub proposal: Proposal,
    pub client_name: String,
    pub status_label: &'static str,
    pub value: String,
    pub fee: String,
}

impl ProposalRow {
    pub fn new(proposal: Proposal, client_name: String) -> Self {
        Self {
            client_name,
            status_label: proposal.status.label(),
            value: format_brl(proposal.value_cents),
            fee: format_percent(proposal.fee_percent),
            proposal,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProposalStatsView {
    pub total: usize,
    pub by_status: Vec<StatusCount>,
    pub acceptance_rate: String,
    pub accepted_value: String,
}

impl From<&ProposalStats> for ProposalStatsView {
    fn from(stats: &ProposalStats) -> Self {
        Self {
            total: stats.total,
            by_status: status_counts(&stats.by_status, ProposalStatus::label),
            acceptance_rate: format_percent(stats.acceptance_rate),
            accepted_value: format_brl(stats.accepted_value_cents),
        }
    }
}

pub struct ProposalsPageData {
    pub proposals: Vec<ProposalRow>,
    pub stats: ProposalStatsView,
    pub scope: Option<Client>,
    pub status: Option<ProposalStatus>,
    pub status_choices: Vec<Choice>,
}

pub fn status_choices() -> Vec<Choice> {
    ProposalStatus::ALL
        .into_iter()
        .map(|s| Choice::new(s, s.label()))
        .collect()
}

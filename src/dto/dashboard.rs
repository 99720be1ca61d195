use serde::Serialize;

use crate::domain::client::Client;
use crate::dto::StatusCount;
use crate::dto::audits::{AuditRow, AuditStatsView};
use crate::dto::proposals::ProposalStatsView;
use crate::dto::tax_credits::{CreditSummaryView, TaxCreditRow};

/// Data required to render the dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardData {
    /// Active client the figures are limited to; `None` covers every client.
    pub scope: Option<Client>,
    pub client_count: usize,
    pub clients_by_status: Vec<StatusCount>,
    pub credits: CreditSummaryView,
    pub audits: AuditStatsView,
    pub proposals: ProposalStatsView,
    /// Next open audits by date.
    pub upcoming_audits: Vec<AuditRow>,
    pub latest_credits: Vec<TaxCreditRow>,
}

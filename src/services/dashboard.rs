//! Headline figures for the admin dashboard.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::audit::{AuditFilter, AuditStats};
use crate::domain::client::{Client, ClientStatus};
use crate::domain::permissions::SERVICE_ACCESS_ROLE;
use crate::domain::proposal::{ProposalFilter, ProposalStats};
use crate::domain::tax_credit::{TaxCreditFilter, TaxCreditSummary};
use crate::dto::audits::{AuditRow, AuditStatsView};
use crate::dto::dashboard::DashboardData;
use crate::dto::proposals::ProposalStatsView;
use crate::dto::status_counts;
use crate::dto::tax_credits::{CreditSummaryView, TaxCreditRow};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    AuditReader, ClientListQuery, ClientReader, ProposalReader, TaxCreditReader,
};
use crate::services::{ServiceResult, client_index, client_name, ensure_role};

const DASHBOARD_LIST_SIZE: usize = 5;

/// Aggregates clients, credits, audits and proposals.
///
/// With an active client every figure is limited to that client.
pub fn load_dashboard<R>(
    repo: &R,
    user: &AuthenticatedUser,
    active: Option<&Client>,
    today: NaiveDate,
) -> ServiceResult<DashboardData>
where
    R: ClientReader + TaxCreditReader + AuditReader + ProposalReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let clients = client_index(repo)?;

    let mut by_status: BTreeMap<ClientStatus, usize> = BTreeMap::new();
    let client_count = match active {
        Some(client) => {
            by_status.insert(client.status, 1);
            1
        }
        None => {
            let (total, all) = repo.list_clients(ClientListQuery::new())?;
            for client in &all {
                *by_status.entry(client.status).or_insert(0) += 1;
            }
            total
        }
    };

    let mut credit_filter = TaxCreditFilter::default();
    let mut audit_filter = AuditFilter::default();
    let mut proposal_filter = ProposalFilter::default();
    if let Some(client) = active {
        credit_filter = credit_filter.client(client.id.clone());
        audit_filter = audit_filter.client(client.id.clone());
        proposal_filter = proposal_filter.client(client.id.clone());
    }

    let credits = repo.list_tax_credits(&credit_filter)?;
    let audits = repo.list_audits(&audit_filter)?;
    let proposals = repo.list_proposals(&proposal_filter)?;

    let credit_summary = CreditSummaryView::from(&TaxCreditSummary::from_credits(&credits));
    let audit_stats = AuditStatsView::from(&AuditStats::from_audits(&audits, today));
    let proposal_stats = ProposalStatsView::from(&ProposalStats::from_proposals(&proposals));

    let upcoming_audits = audits
        .into_iter()
        .filter(|audit| audit.status.is_open())
        .take(DASHBOARD_LIST_SIZE)
        .map(|audit| {
            let name = client_name(&clients, &audit.client_id);
            AuditRow::new(audit, name, today)
        })
        .collect();

    let latest_credits = credits
        .into_iter()
        .take(DASHBOARD_LIST_SIZE)
        .map(|credit| {
            let name = client_name(&clients, &credit.client_id);
            TaxCreditRow::new(credit, name, Vec::new())
        })
        .collect();

    Ok(DashboardData {
        scope: active.cloned(),
        client_count,
        clients_by_status: status_counts(&by_status, ClientStatus::label),
        credits: credit_summary,
        audits: audit_stats,
        proposals: proposal_stats,
        upcoming_audits,
        latest_credits,
    })
}

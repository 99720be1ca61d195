use crate::domain::client::Client;
use crate::domain::permissions::SERVICE_ACCESS_ROLE;
use crate::domain::proposal::{ProposalFilter, ProposalStats};
use crate::dto::proposals::{
    ProposalRow, ProposalStatsView, ProposalsPageData, ProposalsQuery, status_choices,
};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{ClientReader, ProposalReader};
use crate::services::{ServiceResult, client_index, client_name, ensure_role};

/// Loads proposals, scoped to the active client if any.
pub fn load_proposals_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    active: Option<&Client>,
    query: ProposalsQuery,
) -> ServiceResult<ProposalsPageData>
where
    R: ClientReader + ProposalReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let mut filter = ProposalFilter::default();
    if let Some(client) = active {
        filter = filter.client(client.id.clone());
    }
    if let Some(status) = query.status {
        filter = filter.status(status);
    }

    let proposals = repo.list_proposals(&filter)?;
    let stats = ProposalStatsView::from(&ProposalStats::from_proposals(&proposals));

    let clients = client_index(repo)?;
    let proposals = proposals
        .into_iter()
        .map(|proposal| {
            let name = client_name(&clients, &proposal.client_id);
            ProposalRow::new(proposal, name)
        })
        .collect();

    Ok(ProposalsPageData {
        proposals,
        stats,
        scope: active.cloned(),
        status: query.status,
        status_choices: status_choices(),
    })
}

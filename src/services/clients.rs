//! Client list, detail and active client selection.

use chrono::NaiveDate;

use crate::domain::audit::AuditFilter;
use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::permissions::SERVICE_ACCESS_ROLE;
use crate::domain::proposal::ProposalFilter;
use crate::domain::tax_credit::{TaxCreditFilter, TaxCreditSummary};
use crate::domain::types::ClientId;
use crate::dto::audits::AuditRow;
use crate::dto::clients::{ClientDetailData, ClientRow, ClientsPageData, ClientsQuery};
use crate::dto::proposals::ProposalRow;
use crate::dto::tax_credits::TaxCreditRow;
use crate::forms::clients::{AddClientForm, SaveClientForm, UploadClientsForm};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    AuditReader, ClientListQuery, ClientReader, ClientWriter, ProposalReader, TaxCreditReader,
};
use crate::services::tax_credits::allowed_transitions;
use crate::services::{
    ServiceError, ServiceResult, ensure_capability, ensure_role, permissions_for,
};
use crate::store::{ClientStore, Notifier, SelectionStorage};

fn can_edit_clients(user: &AuthenticatedUser) -> bool {
    user.capabilities().is_some_and(|caps| caps.can_edit)
}

fn find_client<R>(repo: &R, client_id: &str) -> ServiceResult<Client>
where
    R: ClientReader + ?Sized,
{
    let id = ClientId::new(client_id)?;
    repo.get_client_by_id(&id)?.ok_or(ServiceError::NotFound)
}

/// Loads one page of clients matching the filters.
pub fn load_clients_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    active: Option<&Client>,
    query: ClientsQuery,
) -> ServiceResult<ClientsPageData>
where
    R: ClientReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let page = query.page.unwrap_or(1).max(1);
    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let mut list_query = ClientListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }
    if let Some(status) = query.status {
        list_query = list_query.status(status);
    }
    if let Some(client_type) = query.client_type {
        list_query = list_query.client_type(client_type);
    }

    let (total, clients) = repo.list_clients(list_query)?;
    let clients = Paginated::new(clients, page, total, DEFAULT_ITEMS_PER_PAGE).map(|client| {
        let is_active = active.is_some_and(|a| a.id == client.id);
        ClientRow::new(client, is_active)
    });

    Ok(ClientsPageData {
        clients,
        search_query,
        status: query.status,
        client_type: query.client_type,
        can_edit: can_edit_clients(user),
    })
}

/// Loads a client with its credits, audits and proposals.
pub fn load_client_detail<R>(
    repo: &R,
    user: &AuthenticatedUser,
    active: Option<&Client>,
    client_id: &str,
    today: NaiveDate,
) -> ServiceResult<ClientDetailData>
where
    R: ClientReader + TaxCreditReader + AuditReader + ProposalReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let client = find_client(repo, client_id)?;
    let permissions = permissions_for(user, &client);
    ensure_capability(permissions.can_view)?;

    let credits = repo.list_tax_credits(&TaxCreditFilter::default().client(client.id.clone()))?;
    let credit_summary = (&TaxCreditSummary::from_credits(&credits)).into();
    let credits = credits
        .into_iter()
        .map(|credit| {
            let transitions = allowed_transitions(credit.status, &permissions);
            TaxCreditRow::new(credit, client.name.clone(), transitions)
        })
        .collect();

    let audits = repo
        .list_audits(&AuditFilter::default().client(client.id.clone()))?
        .into_iter()
        .map(|audit| AuditRow::new(audit, client.name.clone(), today))
        .collect();

    let proposals = repo
        .list_proposals(&ProposalFilter::default().client(client.id.clone()))?
        .into_iter()
        .map(|proposal| ProposalRow::new(proposal, client.name.clone()))
        .collect();

    let is_active = active.is_some_and(|a| a.id == client.id);

    Ok(ClientDetailData {
        client: ClientRow::new(client, is_active),
        permissions,
        credits,
        credit_summary,
        audits,
        proposals,
    })
}

/// Validates the add-client form and stores the new client.
pub fn add_client<R, S, N>(
    store: &mut ClientStore<'_, R, S, N>,
    user: &AuthenticatedUser,
    form: AddClientForm,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + ?Sized,
    S: SelectionStorage,
    N: Notifier,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    ensure_capability(can_edit_clients(user))?;

    let new_client = NewClient::try_from(form)?;

    let client = store.add_client(&new_client).map_err(|err| {
        log::error!("Failed to add a client: {err}");
        ServiceError::from(err)
    })?;
    log::info!("Client {} added by {}", client.id, user.email);
    Ok(client)
}

/// Applies the edit form to a client; the selection picks up the change.
pub fn update_client<R, S, N>(
    store: &mut ClientStore<'_, R, S, N>,
    user: &AuthenticatedUser,
    client_id: &str,
    form: SaveClientForm,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + ?Sized,
    S: SelectionStorage,
    N: Notifier,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let client = find_client(store.repository(), client_id)?;
    ensure_capability(permissions_for(user, &client).can_edit)?;

    let updates = UpdateClient::try_from(form)?;
    store.update_client(&client.id, &updates).map_err(|err| {
        log::error!("Failed to update client {}: {err}", client.id);
        ServiceError::from(err)
    })
}

/// Deletes a client; only administrators may do so.
pub fn delete_client<R, S, N>(
    store: &mut ClientStore<'_, R, S, N>,
    user: &AuthenticatedUser,
    client_id: &str,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + ?Sized,
    S: SelectionStorage,
    N: Notifier,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let client = find_client(store.repository(), client_id)?;
    ensure_capability(permissions_for(user, &client).is_admin)?;

    store.remove_client(&client.id).map_err(|err| {
        log::error!("Failed to delete client {}: {err}", client.id);
        ServiceError::from(err)
    })?;
    log::info!("Client {} deleted by {}", client.id, user.email);
    Ok(client)
}

/// Parses the uploaded CSV file and creates client records in bulk.
pub fn upload_clients<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &UploadClientsForm,
) -> ServiceResult<usize>
where
    R: ClientWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    ensure_capability(can_edit_clients(user))?;

    let clients = form.parse().map_err(|err| {
        log::error!("Failed to parse clients: {err}");
        ServiceError::from(err)
    })?;

    let created = repo.create_clients(&clients).map_err(|err| {
        log::error!("Failed to add clients: {err}");
        ServiceError::from(err)
    })?;
    Ok(created.len())
}

/// Makes the client with `client_id` the session's active client.
pub fn select_client<R, S, N>(
    store: &mut ClientStore<'_, R, S, N>,
    user: &AuthenticatedUser,
    client_id: &str,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + ?Sized,
    S: SelectionStorage,
    N: Notifier,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let id = ClientId::new(client_id)?;
    store.select_client(&id).map_err(ServiceError::from)
}

pub fn clear_active_client<R, S, N>(
    store: &mut ClientStore<'_, R, S, N>,
    user: &AuthenticatedUser,
) -> ServiceResult<()>
where
    R: ClientReader + ClientWriter + ?Sized,
    S: SelectionStorage,
    N: Notifier,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    store.clear_active_client();
    Ok(())
}

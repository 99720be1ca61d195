//! Services backing the JSON API.

use crate::domain::permissions::SERVICE_ACCESS_ROLE;
use crate::dto::api::{ClientsQuery, ClientsResponse};
use crate::dto::selection::SelectionView;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{ClientListQuery, ClientReader, ClientWriter};
use crate::services::{ServiceResult, ensure_role};
use crate::store::{ClientStore, Notifier, SelectionStorage};

/// Lists clients matching the optional search term.
pub fn list_clients<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ClientsQuery,
) -> ServiceResult<ClientsResponse>
where
    R: ClientReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let mut list_query = ClientListQuery::new();
    if let Some(term) = query.search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        list_query = list_query.search(term);
    }

    let (total, clients) = repo.list_clients(list_query)?;
    Ok(ClientsResponse { total, clients })
}

/// Active client, recents and permissions for the current session.
pub fn selection_view<R, S, N>(
    store: &ClientStore<'_, R, S, N>,
    user: &AuthenticatedUser,
) -> SelectionView
where
    R: ClientReader + ClientWriter + ?Sized,
    S: SelectionStorage,
    N: Notifier,
{
    SelectionView {
        active_client: store.active_client().cloned(),
        recent_clients: store.recent_clients().to_vec(),
        permissions: store.permissions(user.capabilities().as_ref()),
    }
}

/// JSON form of [`selection_view`] for the API.
pub fn active_client<R, S, N>(
    store: &ClientStore<'_, R, S, N>,
    user: &AuthenticatedUser,
) -> ServiceResult<SelectionView>
where
    R: ClientReader + ClientWriter + ?Sized,
    S: SelectionStorage,
    N: Notifier,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    Ok(selection_view(store, user))
}

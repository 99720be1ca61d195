//! DTOs exposed by the JSON API endpoints.

use serde::Serialize;

use crate::domain::client::Client;

/// Query parameters accepted by the `/api/v1/clients` service.
#[derive(Debug, Default)]
pub struct ClientsQuery {
    /// Optional free-form search string applied to the client list.
    pub search: Option<String>,
}

/// Result payload returned by [`crate::services::api::list_clients`].
#[derive(Debug, Serialize)]
pub struct ClientsResponse {
    /// Total number of clients matching the filter.
    pub total: usize,
    pub clients: Vec<Client>,
}

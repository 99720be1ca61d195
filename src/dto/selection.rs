use serde::Serialize;

use crate::domain::client::Client;
use crate::domain::permissions::ClientPermissions;

/// Active client, recents and the resolved permission flags.
///
/// Rendered by the header partial and returned by `/api/v1/active-client`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionView {
    pub active_client: Option<Client>,
    pub recent_clients: Vec<Client>,
    pub permissions: ClientPermissions,
}

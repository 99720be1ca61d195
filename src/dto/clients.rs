use serde::Serialize;

use crate::domain::client::{Client, ClientStatus, ClientType};
use crate::domain::permissions::ClientPermissions;
use crate::dto::Choice;
use crate::dto::audits::AuditRow;
use crate::dto::proposals::ProposalRow;
use crate::dto::tax_credits::{CreditSummaryView, TaxCreditRow};
use crate::pagination::Paginated;

/// Query parameters accepted by the client list.
#[derive(Debug, Default)]
pub struct ClientsQuery {
    /// Optional search string entered by the user.
    pub search: Option<String>,
    pub status: Option<ClientStatus>,
    pub client_type: Option<ClientType>,
    /// Page number requested by the user interface.
    pub page: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientRow {
    #[serde(flatten)]
    pub client: Client,
    pub status_label: &'static str,
    pub type_label: &'static str,
    /// Whether this is the session's active client.
    pub is_active: bool,
}

impl ClientRow {
    pub fn new(client: Client, is_active: bool) -> Self {
        Self {
            status_label: client.status.label(),
            type_label: client.client_type.label(),
            is_active,
            client,
        }
    }
}

/// Data required to render the client list.
pub struct ClientsPageData {
    pub clients: Paginated<ClientRow>,
    /// Search query echoed back to the template when present.
    pub search_query: Option<String>,
    pub status: Option<ClientStatus>,
    pub client_type: Option<ClientType>,
    pub can_edit: bool,
}

/// Data required to render a single client.
pub struct ClientDetailData {
    pub client: ClientRow,
    pub permissions: ClientPermissions,
    pub credits: Vec<TaxCreditRow>,
    pub credit_summary: CreditSummaryView,
    pub audits: Vec<AuditRow>,
    pub proposals: Vec<ProposalRow>,
}

pub fn status_choices() -> Vec<Choice> {
    ClientStatus::ALL
        .into_iter()
        .map(|s| Choice::new(s, s.label()))
        .collect()
}

pub fn type_choices() -> Vec<Choice> {
    ClientType::ALL
        .into_iter()
        .map(|t| Choice::new(t, t.label()))
        .collect()
}

use crate::{
    domain::{
        audit::{Audit, AuditFilter},
        client::{Client, ClientStatus, ClientType, NewClient, UpdateClient},
        proposal::{Proposal, ProposalFilter},
        tax_credit::{TaxCredit, TaxCreditFilter, TaxCreditStatus},
        types::{ClientId, TaxCreditId},
    },
    repository::errors::RepositoryResult,
};

pub mod errors;
pub mod memory;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod seed;

pub use memory::InMemoryRepository;

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ClientListQuery {
    pub search: Option<String>,
    pub status: Option<ClientStatus>,
    pub client_type: Option<ClientType>,
    pub pagination: Option<Pagination>,
}

impl ClientListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: ClientStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn client_type(mut self, client_type: ClientType) -> Self {
        self.client_type = Some(client_type);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait ClientReader {
    fn get_client_by_id(&self, id: &ClientId) -> RepositoryResult<Option<Client>>;
    /// Returns the total number of matches and the requested page.
    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
}

pub trait ClientWriter {
    fn create_clients(&self, new_clients: &[NewClient]) -> RepositoryResult<Vec<Client>>;
    fn update_client(&self, id: &ClientId, updates: &UpdateClient) -> RepositoryResult<Client>;
    /// Removes the client together with its credits, audits and proposals.
    fn delete_client(&self, id: &ClientId) -> RepositoryResult<()>;
}

pub trait TaxCreditReader {
    fn get_tax_credit_by_id(&self, id: &TaxCreditId) -> RepositoryResult<Option<TaxCredit>>;
    fn list_tax_credits(&self, filter: &TaxCreditFilter) -> RepositoryResult<Vec<TaxCredit>>;
}

pub trait TaxCreditWriter {
    fn update_tax_credit_status(
        &self,
        id: &TaxCreditId,
        status: TaxCreditStatus,
    ) -> RepositoryResult<TaxCredit>;
}

pub trait AuditReader {
    fn list_audits(&self, filter: &AuditFilter) -> RepositoryResult<Vec<Audit>>;
}

pub trait ProposalReader {
    fn list_proposals(&self, filter: &ProposalFilter) -> RepositoryResult<Vec<Proposal>>;
}

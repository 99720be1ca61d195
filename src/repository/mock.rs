//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::audit::{Audit, AuditFilter};
use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::proposal::{Proposal, ProposalFilter};
use crate::domain::tax_credit::{TaxCredit, TaxCreditFilter, TaxCreditStatus};
use crate::domain::types::{ClientId, TaxCreditId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AuditReader, ClientListQuery, ClientReader, ClientWriter, ProposalReader, TaxCreditReader,
    TaxCreditWriter,
};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: &ClientId) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
    }

    impl ClientWriter for Repository {
        fn create_clients(&self, new_clients: &[NewClient]) -> RepositoryResult<Vec<Client>>;
        fn update_client(&self, id: &ClientId, updates: &UpdateClient) -> RepositoryResult<Client>;
        fn delete_client(&self, id: &ClientId) -> RepositoryResult<()>;
    }

    impl TaxCreditReader for Repository {
        fn get_tax_credit_by_id(&self, id: &TaxCreditId) -> RepositoryResult<Option<TaxCredit>>;
        fn list_tax_credits(&self, filter: &TaxCreditFilter) -> RepositoryResult<Vec<TaxCredit>>;
    }

    impl TaxCreditWriter for Repository {
        fn update_tax_credit_status(
            &self,
            id: &TaxCreditId,
            status: TaxCreditStatus,
        ) -> RepositoryResult<TaxCredit>;
    }

    impl AuditReader for Repository {
        fn list_audits(&self, filter: &AuditFilter) -> RepositoryResult<Vec<Audit>>;
    }

    impl ProposalReader for Repository {
        fn list_proposals(&self, filter: &ProposalFilter) -> RepositoryResult<Vec<Proposal>>;
    }
}

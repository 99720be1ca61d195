//! Process-local repository backing every reader and writer trait.
//!
//! The dashboard keeps no database of its own; records live in memory,
//! seeded from a JSON fixture, and are shared by all workers.

use std::sync::{Arc, RwLock};

use chrono::Utc;

use crate::domain::audit::{Audit, AuditFilter};
use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::proposal::{Proposal, ProposalFilter};
use crate::domain::tax_credit::{TaxCredit, TaxCreditFilter, TaxCreditStatus};
use crate::domain::types::{ClientId, TaxCreditId, digits_only};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::seed::SeedData;
use crate::repository::{
    AuditReader, ClientListQuery, ClientReader, ClientWriter, ProposalReader, TaxCreditReader,
    TaxCreditWriter,
};

#[derive(Debug, Default)]
struct RepositoryState {
    clients: RwLock<Vec<Client>>,
    tax_credits: RwLock<Vec<TaxCredit>>,
    audits: RwLock<Vec<Audit>>,
    proposals: RwLock<Vec<Proposal>>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<RepositoryState>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: SeedData) -> Self {
        Self {
            state: Arc::new(RepositoryState {
                clients: RwLock::new(seed.clients),
                tax_credits: RwLock::new(seed.tax_credits),
                audits: RwLock::new(seed.audits),
                proposals: RwLock::new(seed.proposals),
            }),
        }
    }
}

fn client_matches(client: &Client, query: &ClientListQuery) -> bool {
    if query.status.is_some_and(|s| s != client.status) {
        return false;
    }
    if query.client_type.is_some_and(|t| t != client.client_type) {
        return false;
    }

    let Some(term) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return true;
    };

    let term_lower = term.to_lowercase();
    let contains = |value: &str| value.to_lowercase().contains(&term_lower);
    let term_digits = digits_only(term);

    contains(&client.name)
        || contains(&client.segment)
        || client.city.as_deref().is_some_and(contains)
        || client.contact_name.as_deref().is_some_and(contains)
        || (!term_digits.is_empty() && digits_only(&client.cnpj).contains(&term_digits))
}

fn same_cnpj(a: &str, b: &str) -> bool {
    digits_only(a) == digits_only(b)
}

impl ClientReader for InMemoryRepository {
    fn get_client_by_id(&self, id: &ClientId) -> RepositoryResult<Option<Client>> {
        let clients = self.state.clients.read()?;
        Ok(clients.iter().find(|c| &c.id == id).cloned())
    }

    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)> {
        let clients = self.state.clients.read()?;
        let mut matching: Vec<Client> = clients
            .iter()
            .filter(|c| client_matches(c, &query))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });

        let total = matching.len();
        let items = match &query.pagination {
            Some(p) => {
                let page = p.page.max(1);
                matching
                    .into_iter()
                    .skip((page - 1) * p.per_page)
                    .take(p.per_page)
                    .collect()
            }
            None => matching,
        };

        Ok((total, items))
    }
}

impl ClientWriter for InMemoryRepository {
    fn create_clients(&self, new_clients: &[NewClient]) -> RepositoryResult<Vec<Client>> {
        let mut clients = self.state.clients.write()?;

        let mut created: Vec<Client> = Vec::with_capacity(new_clients.len());
        for new_client in new_clients {
            let cnpj = new_client.cnpj.to_string();
            let duplicate = clients
                .iter()
                .chain(created.iter())
                .any(|c| same_cnpj(&c.cnpj, &cnpj));
            if duplicate {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "CNPJ {cnpj} already registered"
                )));
            }
            created.push(new_client.clone().into_client(ClientId::generate()));
        }

        clients.extend(created.iter().cloned());
        Ok(created)
    }

    fn update_client(&self, id: &ClientId, updates: &UpdateClient) -> RepositoryResult<Client> {
        let mut clients = self.state.clients.write()?;

        if let Some(cnpj) = &updates.cnpj {
            let cnpj = cnpj.to_string();
            if clients
                .iter()
                .any(|c| &c.id != id && same_cnpj(&c.cnpj, &cnpj))
            {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "CNPJ {cnpj} already registered"
                )));
            }
        }

        let client = clients
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        client.apply(updates);
        client.updated_at = Utc::now().naive_utc();

        Ok(client.clone())
    }

    fn delete_client(&self, id: &ClientId) -> RepositoryResult<()> {
        let mut clients = self.state.clients.write()?;
        let before = clients.len();
        clients.retain(|c| &c.id != id);
        if clients.len() == before {
            return Err(RepositoryError::NotFound);
        }

        self.state.tax_credits.write()?.retain(|t| &t.client_id != id);
        self.state.audits.write()?.retain(|a| &a.client_id != id);
        self.state.proposals.write()?.retain(|p| &p.client_id != id);

        Ok(())
    }
}

impl TaxCreditReader for InMemoryRepository {
    fn get_tax_credit_by_id(&self, id: &TaxCreditId) -> RepositoryResult<Option<TaxCredit>> {
        let credits = self.state.tax_credits.read()?;
        Ok(credits.iter().find(|t| &t.id == id).cloned())
    }

    fn list_tax_credits(&self, filter: &TaxCreditFilter) -> RepositoryResult<Vec<TaxCredit>> {
        let credits = self.state.tax_credits.read()?;
        let mut items: Vec<TaxCredit> = credits
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }
}

impl TaxCreditWriter for InMemoryRepository {
    fn update_tax_credit_status(
        &self,
        id: &TaxCreditId,
        status: TaxCreditStatus,
    ) -> RepositoryResult<TaxCredit> {
        let mut credits = self.state.tax_credits.write()?;
        let credit = credits
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or(RepositoryError::NotFound)?;

        credit.status = status;
        if status == TaxCreditStatus::Recovered && credit.recovered_cents == 0 {
            credit.recovered_cents = credit.identified_cents;
        }

        Ok(credit.clone())
    }
}

impl AuditReader for InMemoryRepository {
    fn list_audits(&self, filter: &AuditFilter) -> RepositoryResult<Vec<Audit>> {
        let audits = self.state.audits.read()?;
        let mut items: Vec<Audit> = audits
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.scheduled_for.cmp(&b.scheduled_for).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }
}

impl ProposalReader for InMemoryRepository {
    fn list_proposals(&self, filter: &ProposalFilter) -> RepositoryResult<Vec<Proposal>> {
        let proposals = self.state.proposals.read()?;
        Ok(proposals
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }
}

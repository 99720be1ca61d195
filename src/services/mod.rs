use std::collections::HashMap;

use thiserror::Error;

use crate::domain::client::Client;
use crate::domain::permissions::{ClientPermissions, check_role};
use crate::domain::types::ClientId;
use crate::models::auth::AuthenticatedUser;
use crate::repository::errors::RepositoryError;
use crate::repository::{ClientListQuery, ClientReader};

pub mod api;
pub mod audits;
pub mod clients;
pub mod dashboard;
pub mod landing;
pub mod proposals;
pub mod tax_credits;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// User-facing validation message.
    #[error("{0}")]
    Form(String),

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ValidationError(message) => ServiceError::TypeConstraint(message),
            RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

/// Fails with [`ServiceError::Unauthorized`] unless the user holds `role`.
pub fn ensure_role(user: &AuthenticatedUser, role: &str) -> ServiceResult<()> {
    if check_role(role, &user.roles) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Fails with [`ServiceError::Unauthorized`] unless `allowed` holds.
pub fn ensure_capability(allowed: bool) -> ServiceResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Flags `user` holds on `client`.
pub fn permissions_for(user: &AuthenticatedUser, client: &Client) -> ClientPermissions {
    ClientPermissions::resolve(Some(client), user.capabilities().as_ref())
}

/// Every client keyed by id, for labelling rows of other collections.
pub(crate) fn client_index<R>(repo: &R) -> ServiceResult<HashMap<ClientId, Client>>
where
    R: ClientReader + ?Sized,
{
    let (_, clients) = repo.list_clients(ClientListQuery::new())?;
    Ok(clients.into_iter().map(|c| (c.id.clone(), c)).collect())
}

pub(crate) fn client_name(index: &HashMap<ClientId, Client>, id: &ClientId) -> String {
    index
        .get(id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDateTime;

    use crate::domain::client::{Client, ClientStatus, ClientType};
    use crate::domain::types::ClientId;
    use crate::models::auth::AuthenticatedUser;

    pub fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "user@example.com".to_string(),
            name: "User".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: 0,
        }
    }

    pub fn client(id: &str, name: &str) -> Client {
        Client {
            id: ClientId::new(id).expect("valid client id"),
            name: name.to_string(),
            cnpj: "11.222.333/0001-81".to_string(),
            client_type: ClientType::Private,
            status: ClientStatus::Active,
            segment: "Indústria".to_string(),
            address: None,
            city: Some("Campinas".to_string()),
            state: Some("SP".to_string()),
            contact_name: None,
            contact_email: None,
            contact_phone: None,
            user_roles: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }
}

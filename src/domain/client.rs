use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ClientId, ClientName, Cnpj, ContactEmail, PhoneNumber, SegmentName, TypeConstraintError,
};

/// Whether the client is a public body or a private company.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    Public,
    #[default]
    Private,
}

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Inactive,
    Pending,
    #[default]
    Prospect,
    Archived,
}

impl ClientType {
    pub const ALL: [ClientType; 2] = [ClientType::Public, ClientType::Private];

    pub fn label(self) -> &'static str {
        match self {
            ClientType::Public => "Público",
            ClientType::Private => "Privado",
        }
    }
}

impl ClientStatus {
    pub const ALL: [ClientStatus; 5] = [
        ClientStatus::Active,
        ClientStatus::Inactive,
        ClientStatus::Pending,
        ClientStatus::Prospect,
        ClientStatus::Archived,
    ];

    /// Portuguese label used by templates.
    pub fn label(self) -> &'static str {
        match self {
            ClientStatus::Active => "Ativo",
            ClientStatus::Inactive => "Inativo",
            ClientStatus::Pending => "Pendente",
            ClientStatus::Prospect => "Prospecção",
            ClientStatus::Archived => "Arquivado",
        }
    }
}

impl Display for ClientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientType::Public => write!(f, "public"),
            ClientType::Private => write!(f, "private"),
        }
    }
}

impl FromStr for ClientType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(ClientType::Public),
            "private" => Ok(ClientType::Private),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown client type `{other}`"
            ))),
        }
    }
}

impl Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientStatus::Active => write!(f, "active"),
            ClientStatus::Inactive => write!(f, "inactive"),
            ClientStatus::Pending => write!(f, "pending"),
            ClientStatus::Prospect => write!(f, "prospect"),
            ClientStatus::Archived => write!(f, "archived"),
        }
    }
}

impl FromStr for ClientStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(ClientStatus::Active),
            "inactive" => Ok(ClientStatus::Inactive),
            "pending" => Ok(ClientStatus::Pending),
            "prospect" => Ok(ClientStatus::Prospect),
            "archived" => Ok(ClientStatus::Archived),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown client status `{other}`"
            ))),
        }
    }
}

/// Permission flags embedded on a client record.
///
/// Only consulted when the session carries no capability set; see
/// [`crate::domain::permissions::ClientPermissions::resolve`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRoles {
    pub can_view: bool,
    pub can_edit: bool,
    pub can_approve: bool,
    pub is_admin: bool,
    pub is_representative: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub cnpj: String,
    #[serde(rename = "type")]
    pub client_type: ClientType,
    pub status: ClientStatus,
    #[serde(default)]
    pub segment: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_roles: Option<UserRoles>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Client {
    /// Merges the provided partial update into this record.
    pub fn apply(&mut self, updates: &UpdateClient) {
        if let Some(name) = &updates.name {
            self.name = name.to_string();
        }
        if let Some(cnpj) = &updates.cnpj {
            self.cnpj = cnpj.to_string();
        }
        if let Some(client_type) = updates.client_type {
            self.client_type = client_type;
        }
        if let Some(status) = updates.status {
            self.status = status;
        }
        if let Some(segment) = &updates.segment {
            self.segment = segment
                .as_ref()
                .map(SegmentName::to_string)
                .unwrap_or_default();
        }
        if let Some(address) = &updates.address {
            self.address = address.clone();
        }
        if let Some(city) = &updates.city {
            self.city = city.clone();
        }
        if let Some(state) = &updates.state {
            self.state = state.clone();
        }
        if let Some(contact_name) = &updates.contact_name {
            self.contact_name = contact_name.clone();
        }
        if let Some(contact_email) = &updates.contact_email {
            self.contact_email = contact_email.as_ref().map(|e| e.to_string());
        }
        if let Some(contact_phone) = &updates.contact_phone {
            self.contact_phone = contact_phone.as_ref().map(|p| p.to_string());
        }
        if let Some(user_roles) = updates.user_roles {
            self.user_roles = user_roles;
        }
    }
}

/// Contact details shared by [`NewClient`] and client forms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientContact {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<ContactEmail>,
    pub contact_phone: Option<PhoneNumber>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl ClientContact {
    #[must_use]
    pub fn new(
        address: Option<String>,
        city: Option<String>,
        state: Option<String>,
        contact_name: Option<String>,
        contact_email: Option<ContactEmail>,
        contact_phone: Option<PhoneNumber>,
    ) -> Self {
        Self {
            address: trimmed(address),
            city: trimmed(city),
            state: trimmed(state).map(|s| s.to_uppercase()),
            contact_name: trimmed(contact_name),
            contact_email,
            contact_phone,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewClient {
    pub name: ClientName,
    pub cnpj: Cnpj,
    pub client_type: ClientType,
    pub status: ClientStatus,
    pub segment: Option<SegmentName>,
    pub contact: ClientContact,
    pub user_roles: Option<UserRoles>,
}

impl NewClient {
    #[must_use]
    pub fn new(
        name: ClientName,
        cnpj: Cnpj,
        client_type: ClientType,
        status: ClientStatus,
        segment: Option<SegmentName>,
        contact: ClientContact,
    ) -> Self {
        Self {
            name,
            cnpj,
            client_type,
            status,
            segment,
            contact,
            user_roles: None,
        }
    }

    /// Materializes the full record with a freshly generated identifier.
    pub fn into_client(self, id: ClientId) -> Client {
        let now = Utc::now().naive_utc();
        Client {
            id,
            name: self.name.into_inner(),
            cnpj: self.cnpj.to_string(),
            client_type: self.client_type,
            status: self.status,
            segment: self.segment.map(SegmentName::into_inner).unwrap_or_default(),
            address: self.contact.address,
            city: self.contact.city,
            state: self.contact.state,
            contact_name: self.contact.contact_name,
            contact_email: self.contact.contact_email.map(ContactEmail::into_inner),
            contact_phone: self.contact.contact_phone.map(PhoneNumber::into_inner),
            user_roles: self.user_roles,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a client.
///
/// `None` leaves a field untouched; for the segment and optional contact
/// fields `Some(None)` clears the value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateClient {
    pub name: Option<ClientName>,
    pub cnpj: Option<Cnpj>,
    pub client_type: Option<ClientType>,
    pub status: Option<ClientStatus>,
    pub segment: Option<Option<SegmentName>>,
    pub address: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub state: Option<Option<String>>,
    pub contact_name: Option<Option<String>>,
    pub contact_email: Option<Option<ContactEmail>>,
    pub contact_phone: Option<Option<PhoneNumber>>,
    pub user_roles: Option<Option<UserRoles>>,
}

impl UpdateClient {
    /// Update touching only the status field.
    pub fn status(status: ClientStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

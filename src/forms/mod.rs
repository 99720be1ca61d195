//! Form definitions backing the admin routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod clients;
pub mod landing;
pub mod tax_credits;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("erro de validação: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("nome inválido")]
    InvalidName,

    #[error("CNPJ inválido")]
    InvalidCnpj,

    #[error("tipo de cliente inválido")]
    InvalidClientType,

    #[error("status inválido")]
    InvalidStatus,

    #[error("segmento inválido")]
    InvalidSegment,

    #[error("e-mail inválido")]
    InvalidEmail,

    #[error("telefone inválido")]
    InvalidPhoneNumber,

    #[error("arquivo CSV inválido: {0}")]
    Csv(String),

    #[error("linha {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<FormError>,
    },
}

/// `None` for missing or whitespace-only input, the trimmed value otherwise.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

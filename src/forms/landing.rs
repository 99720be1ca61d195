use serde::Deserialize;
use validator::Validate;

use crate::domain::types::ContactEmail;
use crate::forms::{FormError, non_blank};

#[derive(Debug, Default, Deserialize, Validate)]
/// Contact form on the public landing page.
pub struct ContactForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 120))]
    pub company: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}

/// A validated lead coming from the landing page.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactLead {
    pub name: String,
    pub email: ContactEmail,
    pub company: Option<String>,
    pub message: String,
}

impl TryFrom<ContactForm> for ContactLead {
    type Error = FormError;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let name = form.name.trim().to_string();
        if name.is_empty() {
            return Err(FormError::InvalidName);
        }
        let email = ContactEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?;

        Ok(Self {
            name,
            email,
            company: non_blank(form.company),
            message: ammonia::clean(form.message.trim()),
        })
    }
}

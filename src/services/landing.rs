use crate::forms::landing::{ContactForm, ContactLead};
use crate::services::ServiceResult;

/// Validates a contact request from the public site and records the lead.
pub fn submit_contact(form: ContactForm) -> ServiceResult<ContactLead> {
    let lead = ContactLead::try_from(form).map_err(|err| {
        log::warn!("Rejected contact form: {err}");
        err
    })?;

    log::info!(
        "New contact lead from {} <{}> ({}): {}",
        lead.name,
        lead.email,
        lead.company.as_deref().unwrap_or("-"),
        lead.message
    );
    Ok(lead)
}

use serde::Deserialize;

use crate::domain::tax_credit::TaxCreditStatus;
use crate::forms::FormError;

#[derive(Debug, Deserialize)]
pub struct ChangeTaxCreditStatusForm {
    pub status: String,
}

impl TryFrom<ChangeTaxCreditStatusForm> for TaxCreditStatus {
    type Error = FormError;

    fn try_from(form: ChangeTaxCreditStatusForm) -> Result<Self, Self::Error> {
        form.status.parse().map_err(|_| FormError::InvalidStatus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_status() {
        let form = ChangeTaxCreditStatusForm {
            status: "under_analysis".into(),
        };
        assert_eq!(
            TaxCreditStatus::try_from(form).unwrap(),
            TaxCreditStatus::UnderAnalysis
        );
    }

    #[test]
    fn rejects_unknown_status() {
        let form = ChangeTaxCreditStatusForm {
            status: "paid".into(),
        };
        assert!(matches!(
            TaxCreditStatus::try_from(form),
            Err(FormError::InvalidStatus)
        ));
    }
}

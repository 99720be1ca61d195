use serde::Serialize;

use crate::domain::client::Client;
use crate::domain::money::{format_brl, format_percent};
use crate::domain::tax_credit::{TaxCredit, TaxCreditStatus, TaxCreditSummary, TaxKind};
use crate::dto::{Choice, StatusCount, status_counts};

/// Filters accepted by the tax credit list.
#[derive(Debug, Default)]
pub struct TaxCreditsQuery {
    pub search: Option<String>,
    pub status: Option<TaxCreditStatus>,
    pub kind: Option<TaxKind>,
}

/// Table row for a tax credit.
#[derive(Debug, Clone, Serialize)]
pub struct TaxCreditRow {
    #[serde(flatten)]
    pub credit: TaxCredit,
    pub client_name: String,
    pub status_label: &'static str,
    pub identified: String,
    pub recovered: String,
    /// Statuses the current user may move this credit to.
    pub transitions: Vec<Choice>,
}

impl TaxCreditRow {
    pub fn new(credit: TaxCredit, client_name: String, transitions: Vec<TaxCreditStatus>) -> Self {
        Self {
            client_name,
            status_label: credit.status.label(),
            identified: format_brl(credit.identified_cents),
            recovered: format_brl(credit.recovered_cents),
            transitions: transitions
                .into_iter()
                .map(|s| Choice::new(s, s.label()))
                .collect(),
            credit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreditSummaryView {
    pub count: usize,
    pub identified: String,
    pub recovered: String,
    pub recovery_rate: String,
    pub by_status: Vec<StatusCount>,
}

impl From<&TaxCreditSummary> for CreditSummaryView {
    fn from(summary: &TaxCreditSummary) -> Self {
        Self {
            count: summary.count,
            identified: format_brl(summary.identified_cents),
            recovered: format_brl(summary.recovered_cents),
            recovery_rate: format_percent(summary.recovery_rate),
            by_status: status_counts(&summary.by_status, TaxCreditStatus::label),
        }
    }
}

/// Data required to render the tax credit list.
pub struct TaxCreditsPageData {
    pub credits: Vec<TaxCreditRow>,
    pub summary: CreditSummaryView,
    /// Client the list is scoped to, when one is active.
    pub scope: Option<Client>,
    pub search_query: Option<String>,
    pub status: Option<TaxCreditStatus>,
    pub kind: Option<TaxKind>,
    pub status_choices: Vec<Choice>,
    pub kind_choices: Vec<Choice>,
}

pub fn status_choices() -> Vec<Choice> {
    TaxCreditStatus::ALL
        .into_iter()
        .map(|s| Choice::new(s, s.label()))
        .collect()
}

pub fn kind_choices() -> Vec<Choice> {
    TaxKind::ALL
        .into_iter()
        .map(|k| Choice::new(k, k.label()))
        .collect()
}

/// Per-client line of the recovery report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub client_id: String,
    pub client_name: String,
    pub cnpj: String,
    pub summary: CreditSummaryView,
}

pub struct ReportPageData {
    pub rows: Vec<ReportRow>,
    pub totals: CreditSummaryView,
}

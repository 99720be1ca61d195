//! Tax credits identified for clients and their recovery progress.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::money::percentage;
use crate::domain::types::{ClientId, TaxCreditId, TypeConstraintError};

/// Federal and state taxes a credit can be recovered from.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaxKind {
    Pis,
    Cofins,
    Irpj,
    Csll,
    Icms,
    Inss,
    Ipi,
}

impl TaxKind {
    pub const ALL: [TaxKind; 7] = [
        TaxKind::Pis,
        TaxKind::Cofins,
        TaxKind::Irpj,
        TaxKind::Csll,
        TaxKind::Icms,
        TaxKind::Inss,
        TaxKind::Ipi,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaxKind::Pis => "PIS",
            TaxKind::Cofins => "COFINS",
            TaxKind::Irpj => "IRPJ",
            TaxKind::Csll => "CSLL",
            TaxKind::Icms => "ICMS",
            TaxKind::Inss => "INSS",
            TaxKind::Ipi => "IPI",
        }
    }
}

impl Display for TaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TaxKind {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PIS" => Ok(TaxKind::Pis),
            "COFINS" => Ok(TaxKind::Cofins),
            "IRPJ" => Ok(TaxKind::Irpj),
            "CSLL" => Ok(TaxKind::Csll),
            "ICMS" => Ok(TaxKind::Icms),
            "INSS" => Ok(TaxKind::Inss),
            "IPI" => Ok(TaxKind::Ipi),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown tax kind `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TaxCreditStatus {
    Identified,
    UnderAnalysis,
    Approved,
    Filed,
    Recovered,
    Rejected,
}

impl TaxCreditStatus {
    pub const ALL: [TaxCreditStatus; 6] = [
        TaxCreditStatus::Identified,
        TaxCreditStatus::UnderAnalysis,
        TaxCreditStatus::Approved,
        TaxCreditStatus::Filed,
        TaxCreditStatus::Recovered,
        TaxCreditStatus::Rejected,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, TaxCreditStatus::Recovered | TaxCreditStatus::Rejected)
    }

    /// Terminal states are final and a status never transitions to itself.
    pub fn can_transition_to(self, next: TaxCreditStatus) -> bool {
        !self.is_terminal() && self != next
    }

    /// Whether moving into this status needs approval rights rather than edit rights.
    pub fn requires_approval(self) -> bool {
        matches!(
            self,
            TaxCreditStatus::Approved | TaxCreditStatus::Filed | TaxCreditStatus::Recovered
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            TaxCreditStatus::Identified => "Identificado",
            TaxCreditStatus::UnderAnalysis => "Em análise",
            TaxCreditStatus::Approved => "Aprovado",
            TaxCreditStatus::Filed => "Protocolado",
            TaxCreditStatus::Recovered => "Recuperado",
            TaxCreditStatus::Rejected => "Indeferido",
        }
    }
}

impl Display for TaxCreditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            TaxCreditStatus::Identified => "identified",
            TaxCreditStatus::UnderAnalysis => "under_analysis",
            TaxCreditStatus::Approved => "approved",
            TaxCreditStatus::Filed => "filed",
            TaxCreditStatus::Recovered => "recovered",
            TaxCreditStatus::Rejected => "rejected",
        };
        write!(f, "{value}")
    }
}

impl FromStr for TaxCreditStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "identified" => Ok(TaxCreditStatus::Identified),
            "under_analysis" => Ok(TaxCreditStatus::UnderAnalysis),
            "approved" => Ok(TaxCreditStatus::Approved),
            "filed" => Ok(TaxCreditStatus::Filed),
            "recovered" => Ok(TaxCreditStatus::Recovered),
            "rejected" => Ok(TaxCreditStatus::Rejected),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown tax credit status `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaxCredit {
    pub id: TaxCreditId,
    pub client_id: ClientId,
    pub kind: TaxKind,
    /// Competence period, e.g. `2022-Q3`.
    pub period: String,
    pub identified_cents: i64,
    #[serde(default)]
    pub recovered_cents: i64,
    pub status: TaxCreditStatus,
    pub created_at: NaiveDate,
}

/// In-memory filter applied to the tax credit list.
#[derive(Clone, Debug, Default)]
pub struct TaxCreditFilter {
    pub client_id: Option<ClientId>,
    pub status: Option<TaxCreditStatus>,
    pub kind: Option<TaxKind>,
    pub search: Option<String>,
}

impl TaxCreditFilter {
    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn status(mut self, status: TaxCreditStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn kind(mut self, kind: TaxKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn matches(&self, credit: &TaxCredit) -> bool {
        if self.client_id.as_ref().is_some_and(|id| *id != credit.client_id) {
            return false;
        }
        if self.status.is_some_and(|s| s != credit.status) {
            return false;
        }
        if self.kind.is_some_and(|k| k != credit.kind) {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                let term = term.to_lowercase();
                credit.period.to_lowercase().contains(&term)
                    || credit.kind.to_string().to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

/// Aggregated totals over a set of tax credits.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TaxCreditSummary {
    pub count: usize,
    pub identified_cents: i64,
    pub recovered_cents: i64,
    /// Recovered over identified, in percent.
    pub recovery_rate: f64,
    pub by_status: BTreeMap<TaxCreditStatus, usize>,
}

impl TaxCreditSummary {
    pub fn from_credits<'a, I>(credits: I) -> Self
    where
        I: IntoIterator<Item = &'a TaxCredit>,
    {
        let mut summary = Self::default();
        for credit in credits {
            summary.count += 1;
            // Rejected credits stay listed but no longer count as identified value.
            if credit.status != TaxCreditStatus::Rejected {
                summary.identified_cents += credit.identified_cents;
            }
            summary.recovered_cents += credit.recovered_cents;
            *summary.by_status.entry(credit.status).or_insert(0) += 1;
        }
        summary.recovery_rate = percentage(summary.recovered_cents, summary.identified_cents);
        summary
    }
}

/// Per-client line of the recovery report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClientCreditReport {
    pub client_id: ClientId,
    pub summary: TaxCreditSummary,
}

/// Groups credits by client, largest identified amount first.
pub fn report_by_client(credits: &[TaxCredit]) -> Vec<ClientCreditReport> {
    let mut grouped: BTreeMap<&ClientId, Vec<&TaxCredit>> = BTreeMap::new();
    for credit in credits {
        grouped.entry(&credit.client_id).or_default().push(credit);
    }

    let mut report: Vec<ClientCreditReport> = grouped
        .into_iter()
        .map(|(client_id, credits)| ClientCreditReport {
            client_id: client_id.clone(),
            summary: TaxCreditSummary::from_credits(credits),
        })
        .collect();

    report.sort_by(|a, b| {
        b.summary
            .identified_cents
            .cmp(&a.summary.identified_cents)
            .then_with(|| a.client_id.cmp(&b.client_id))
    });
    report
}

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::audit::{Audit, AuditRisk, AuditStats, AuditStatus};
use crate::domain::client::Client;
use crate::domain::money::format_brl;
use crate::dto::{Choice, StatusCount, status_counts};

#[derive(Debug, Default)]
pub struct AuditsQuery {
    pub search: Option<String>,
    pub status: Option<AuditStatus>,
    pub risk: Option<AuditRisk>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditRow {
    #[serde(flatten)]
    pub audit: Audit,
    pub client_name: String,
    pub status_label: &'static str,
    pub risk_label: &'static str,
    pub estimated_recovery: String,
    pub overdue: bool,
}

impl AuditRow {
    pub fn new(audit: Audit, client_name: String, today: NaiveDate) -> Self {
        Self {
            client_name,
            status_label: audit.status.label(),
            risk_label: audit.risk.label(),
            estimated_recovery: format_brl(audit.estimated_recovery_cents),
            overdue: audit.is_overdue(today),
            audit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditStatsView {
    pub total: usize,
    pub by_status: Vec<StatusCount>,
    pub open_high_risk: usize,
    pub overdue: usize,
    pub estimated_recovery: String,
}

impl From<&AuditStats> for AuditStatsView {
    fn from(stats: &AuditStats) -> Self {
        Self {
            total: stats.total,
            by_status: status_counts(&stats.by_status, AuditStatus::label),
            open_high_risk: stats.open_high_risk,
            overdue: stats.overdue,
            estimated_recovery: format_brl(stats.estimated_recovery_cents),
        }
    }
}

pub struct AuditsPageData {
    pub audits: Vec<AuditRow>,
    pub stats: AuditStatsView,
    pub scope: Option<Client>,
    pub search_query: Option<String>,
    pub status: Option<AuditStatus>,
    pub risk: Option<AuditRisk>,
    pub status_choices: Vec<Choice>,
    pub risk_choices: Vec<Choice>,
}

pub fn status_choices() -> Vec<Choice> {
    AuditStatus::ALL
        .into_iter()
        .map(|s| Choice::new(s, s.label()))
        .collect()
}

pub fn risk_choices() -> Vec<Choice> {
    AuditRisk::ALL
        .into_iter()
        .map(|r| Choice::new(r, r.label()))
        .collect()
}

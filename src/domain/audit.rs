//! Fiscal audits scheduled for clients.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AuditId, ClientId, TypeConstraintError};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl AuditStatus {
    pub const ALL: [AuditStatus; 4] = [
        AuditStatus::Scheduled,
        AuditStatus::InProgress,
        AuditStatus::Completed,
        AuditStatus::Cancelled,
    ];

    pub fn is_open(self) -> bool {
        matches!(self, AuditStatus::Scheduled | AuditStatus::InProgress)
    }

    pub fn label(self) -> &'static str {
        match self {
            AuditStatus::Scheduled => "Agendada",
            AuditStatus::InProgress => "Em andamento",
            AuditStatus::Completed => "Concluída",
            AuditStatus::Cancelled => "Cancelada",
        }
    }
}

impl Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            AuditStatus::Scheduled => "scheduled",
            AuditStatus::InProgress => "in_progress",
            AuditStatus::Completed => "completed",
            AuditStatus::Cancelled => "cancelled",
        };
        write!(f, "{value}")
    }
}

impl FromStr for AuditStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Ok(AuditStatus::Scheduled),
            "in_progress" => Ok(AuditStatus::InProgress),
            "completed" => Ok(AuditStatus::Completed),
            "cancelled" => Ok(AuditStatus::Cancelled),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown audit status `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AuditRisk {
    Low,
    Medium,
    High,
}

impl AuditRisk {
    pub const ALL: [AuditRisk; 3] = [AuditRisk::Low, AuditRisk::Medium, AuditRisk::High];

    pub fn label(self) -> &'static str {
        match self {
            AuditRisk::Low => "Baixo",
            AuditRisk::Medium => "Médio",
            AuditRisk::High => "Alto",
        }
    }
}

impl Display for AuditRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            AuditRisk::Low => "low",
            AuditRisk::Medium => "medium",
            AuditRisk::High => "high",
        };
        write!(f, "{value}")
    }
}

impl FromStr for AuditRisk {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(AuditRisk::Low),
            "medium" => Ok(AuditRisk::Medium),
            "high" => Ok(AuditRisk::High),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown audit risk `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub id: AuditId,
    pub client_id: ClientId,
    pub title: String,
    pub status: AuditStatus,
    pub risk: AuditRisk,
    pub scheduled_for: NaiveDate,
    pub completed_at: Option<NaiveDate>,
    #[serde(default)]
    pub findings: u32,
    #[serde(default)]
    pub estimated_recovery_cents: i64,
}

impl Audit {
    /// Still open after its scheduled date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status.is_open() && self.scheduled_for < today
    }
}

#[derive(Clone, Debug, Default)]
pub struct AuditFilter {
    pub client_id: Option<ClientId>,
    pub status: Option<AuditStatus>,
    pub risk: Option<AuditRisk>,
    pub search: Option<String>,
}

impl AuditFilter {
    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn status(mut self, status: AuditStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn risk(mut self, risk: AuditRisk) -> Self {
        self.risk = Some(risk);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn matches(&self, audit: &Audit) -> bool {
        if self.client_id.as_ref().is_some_and(|id| *id != audit.client_id) {
            return false;
        }
        if self.status.is_some_and(|s| s != audit.status) {
            return false;
        }
        if self.risk.is_some_and(|r| r != audit.risk) {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => audit.title.to_lowercase().contains(&term.to_lowercase()),
            None => true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AuditStats {
    pub total: usize,
    pub by_status: BTreeMap<AuditStatus, usize>,
    pub open_high_risk: usize,
    pub overdue: usize,
    pub estimated_recovery_cents: i64,
}

impl AuditStats {
    pub fn from_audits<'a, I>(audits: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a Audit>,
    {
        let mut stats = Self::default();
        for audit in audits {
            stats.total += 1;
            *stats.by_status.entry(audit.status).or_insert(0) += 1;
            if audit.status.is_open() && audit.risk == AuditRisk::High {
                stats.open_high_risk += 1;
            }
            if audit.is_overdue(today) {
                stats.overdue += 1;
            }
            if audit.status != AuditStatus::Cancelled {
                stats.estimated_recovery_cents += audit.estimated_recovery_cents;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn audit(id: &str, status: AuditStatus, risk: AuditRisk, scheduled_for: NaiveDate) -> Audit {
        Audit {
            id: AuditId::new(id).unwrap(),
            client_id: ClientId::new("1").unwrap(),
            title: format!("Revisão fiscal {id}"),
            status,
            risk,
            scheduled_for,
            completed_at: None,
            findings: 0,
            estimated_recovery_cents: 1_000,
        }
    }

    #[test]
    fn stats_count_overdue_and_high_risk() {
        let today = date(2024, 6, 1);
        let audits = vec![
            audit("a", AuditStatus::Scheduled, AuditRisk::High, date(2024, 5, 1)),
            audit("b", AuditStatus::InProgress, AuditRisk::Low, date(2024, 7, 1)),
            audit("c", AuditStatus::Completed, AuditRisk::High, date(2024, 1, 1)),
            audit("d", AuditStatus::Cancelled, AuditRisk::Medium, date(2024, 1, 1)),
        ];

        let stats = AuditStats::from_audits(&audits, today);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.open_high_risk, 1);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.estimated_recovery_cents, 3_000);
        assert_eq!(stats.by_status.get(&AuditStatus::Completed), Some(&1));
    }

    #[test]
    fn scheduled_today_is_not_overdue() {
        let today = date(2024, 6, 1);
        let a = audit("a", AuditStatus::Scheduled, AuditRisk::Low, today);
        assert!(!a.is_overdue(today));
    }

    #[test]
    fn filter_by_risk_and_title() {
        let today = date(2024, 6, 1);
        let audits = vec![
            audit("alpha", AuditStatus::Scheduled, AuditRisk::High, today),
            audit("beta", AuditStatus::Scheduled, AuditRisk::Low, today),
        ];
        let filter = AuditFilter::default().risk(AuditRisk::High);
        assert_eq!(audits.iter().filter(|a| filter.matches(a)).count(), 1);

        let filter = AuditFilter::default().search("BETA");
        let found: Vec<_> = audits.iter().filter(|a| filter.matches(a)).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "beta");
    }
}

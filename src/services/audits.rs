use chrono::NaiveDate;

use crate::domain::audit::{AuditFilter, AuditStats};
use crate::domain::client::Client;
use crate::domain::permissions::SERVICE_ACCESS_ROLE;
use crate::dto::audits::{
    AuditRow, AuditStatsView, AuditsPageData, AuditsQuery, risk_choices, status_choices,
};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{AuditReader, ClientReader};
use crate::services::{ServiceResult, client_index, client_name, ensure_role};

/// Loads audits and their statistics, scoped to the active client if any.
pub fn load_audits_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    active: Option<&Client>,
    query: AuditsQuery,
    today: NaiveDate,
) -> ServiceResult<AuditsPageData>
where
    R: ClientReader + AuditReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let mut filter = AuditFilter::default();
    if let Some(client) = active {
        filter = filter.client(client.id.clone());
    }
    if let Some(status) = query.status {
        filter = filter.status(status);
    }
    if let Some(risk) = query.risk {
        filter = filter.risk(risk);
    }
    if let Some(term) = &search_query {
        filter = filter.search(term.clone());
    }

    let audits = repo.list_audits(&filter)?;
    let stats = AuditStatsView::from(&AuditStats::from_audits(&audits, today));

    let clients = client_index(repo)?;
    let audits = audits
        .into_iter()
        .map(|audit| {
            let name = client_name(&clients, &audit.client_id);
            AuditRow::new(audit, name, today)
        })
        .collect();

    Ok(AuditsPageData {
        audits,
        stats,
        scope: active.cloned(),
        search_query,
        status: query.status,
        risk: query.risk,
        status_choices: status_choices(),
        risk_choices: risk_choices(),
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::audit::{Audit, AuditRisk, AuditStatus};
    use crate::domain::types::{AuditId, ClientId};
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::test_support::{client, user_with_roles};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).expect("valid date")
    }

    fn audit(id: &str, status: AuditStatus, risk: AuditRisk, scheduled: NaiveDate) -> Audit {
        Audit {
            id: AuditId::new(id).expect("valid id"),
            client_id: ClientId::new("1").expect("valid id"),
            title: format!("Auditoria {id}"),
            status,
            risk,
            scheduled_for: scheduled,
            completed_at: None,
            findings: 2,
            estimated_recovery_cents: 50_000,
        }
    }

    #[test]
    fn requires_access_role() {
        let mut repo = MockRepository::new();
        repo.expect_list_audits().times(0);
        let user = user_with_roles(&[]);

        let result = load_audits_page(&repo, &user, None, AuditsQuery::default(), date(5, 1));

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn flags_overdue_audits() {
        let mut repo = MockRepository::new();
        repo.expect_list_audits()
            .withf(|filter| filter.risk == Some(AuditRisk::High))
            .returning(|_| {
                Ok(vec![
                    audit("a1", AuditStatus::Scheduled, AuditRisk::High, date(4, 1)),
                    audit("a2", AuditStatus::Scheduled, AuditRisk::High, date(6, 1)),
                ])
            });
        repo.expect_list_clients()
            .returning(|_| Ok((1, vec![client("1", "Alpha")])));
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        let data = load_audits_page(
            &repo,
            &user,
            None,
            AuditsQuery {
                risk: Some(AuditRisk::High),
                ..AuditsQuery::default()
            },
            date(5, 1),
        )
        .expect("should load audits");

        assert!(data.audits[0].overdue);
        assert!(!data.audits[1].overdue);
        assert_eq!(data.stats.overdue, 1);
        assert_eq!(data.stats.open_high_risk, 2);
        assert_eq!(data.audits[0].client_name, "Alpha");
    }
}

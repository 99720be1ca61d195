//! Tax credit listing, status workflow and the per-client report.

use crate::domain::client::Client;
use crate::domain::permissions::{ClientPermissions, SERVICE_ACCESS_ROLE};
use crate::domain::tax_credit::{
    TaxCredit, TaxCreditFilter, TaxCreditStatus, TaxCreditSummary, report_by_client,
};
use crate::domain::types::TaxCreditId;
use crate::dto::tax_credits::{
    CreditSummaryView, ReportPageData, ReportRow, TaxCreditRow, TaxCreditsPageData,
    TaxCreditsQuery, kind_choices, status_choices,
};
use crate::forms::tax_credits::ChangeTaxCreditStatusForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{ClientReader, TaxCreditReader, TaxCreditWriter};
use crate::services::{
    ServiceError, ServiceResult, client_index, client_name, ensure_capability, ensure_role,
    permissions_for,
};

/// Statuses a credit in `current` may move to under `permissions`.
pub fn allowed_transitions(
    current: TaxCreditStatus,
    permissions: &ClientPermissions,
) -> Vec<TaxCreditStatus> {
    TaxCreditStatus::ALL
        .into_iter()
        .filter(|next| current.can_transition_to(*next))
        .filter(|next| {
            if next.requires_approval() {
                permissions.can_approve
            } else {
                permissions.can_edit
            }
        })
        .collect()
}

/// Loads credits, scoped to the active client when one is selected.
pub fn load_tax_credits_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    active: Option<&Client>,
    query: TaxCreditsQuery,
) -> ServiceResult<TaxCreditsPageData>
where
    R: ClientReader + TaxCreditReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let mut filter = TaxCreditFilter::default();
    if let Some(client) = active {
        filter = filter.client(client.id.clone());
    }
    if let Some(status) = query.status {
        filter = filter.status(status);
    }
    if let Some(kind) = query.kind {
        filter = filter.kind(kind);
    }
    if let Some(term) = &search_query {
        filter = filter.search(term.clone());
    }

    let credits = repo.list_tax_credits(&filter)?;
    let summary = CreditSummaryView::from(&TaxCreditSummary::from_credits(&credits));

    let clients = client_index(repo)?;
    let credits = credits
        .into_iter()
        .map(|credit| {
            let transitions = match clients.get(&credit.client_id) {
                Some(client) => allowed_transitions(credit.status, &permissions_for(user, client)),
                None => Vec::new(),
            };
            let name = client_name(&clients, &credit.client_id);
            TaxCreditRow::new(credit, name, transitions)
        })
        .collect();

    Ok(TaxCreditsPageData {
        credits,
        summary,
        scope: active.cloned(),
        search_query,
        status: query.status,
        kind: query.kind,
        status_choices: status_choices(),
        kind_choices: kind_choices(),
    })
}

/// Moves a credit to the submitted status.
///
/// Approval-level statuses need `can_approve` on the credit's client, the
/// rest need `can_edit`.
pub fn change_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    credit_id: &str,
    form: ChangeTaxCreditStatusForm,
) -> ServiceResult<TaxCredit>
where
    R: ClientReader + TaxCreditReader + TaxCreditWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let next = TaxCreditStatus::try_from(form)?;
    let id = TaxCreditId::new(credit_id)?;
    let credit = repo
        .get_tax_credit_by_id(&id)?
        .ok_or(ServiceError::NotFound)?;
    let client = repo
        .get_client_by_id(&credit.client_id)?
        .ok_or(ServiceError::NotFound)?;

    let permissions = permissions_for(user, &client);
    ensure_capability(if next.requires_approval() {
        permissions.can_approve
    } else {
        permissions.can_edit
    })?;

    if !credit.status.can_transition_to(next) {
        return Err(ServiceError::Form(format!(
            "Não é possível mudar de \"{}\" para \"{}\".",
            credit.status.label(),
            next.label()
        )));
    }

    let updated = repo.update_tax_credit_status(&id, next).map_err(|err| {
        log::error!("Failed to update tax credit {id}: {err}");
        ServiceError::from(err)
    })?;
    log::info!(
        "Tax credit {id} moved from {} to {next} by {}",
        credit.status,
        user.email
    );
    Ok(updated)
}

/// Recovery totals per client, largest identified amount first.
pub fn load_report<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<ReportPageData>
where
    R: ClientReader + TaxCreditReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let credits = repo.list_tax_credits(&TaxCreditFilter::default())?;
    let clients = client_index(repo)?;

    let rows = report_by_client(&credits)
        .into_iter()
        .map(|line| ReportRow {
            client_name: client_name(&clients, &line.client_id),
            cnpj: clients
                .get(&line.client_id)
                .map(|c| c.cnpj.clone())
                .unwrap_or_default(),
            client_id: line.client_id.to_string(),
            summary: CreditSummaryView::from(&line.summary),
        })
        .collect();

    Ok(ReportPageData {
        rows,
        totals: CreditSummaryView::from(&TaxCreditSummary::from_credits(&credits)),
    })
}

#[cfg(test)]
mod transition_tests {
    use super::*;

    #[test]
    fn editors_cannot_approve() {
        let permissions = ClientPermissions {
            can_view: true,
            can_edit: true,
            ..ClientPermissions::default()
        };
        assert_eq!(
            allowed_transitions(TaxCreditStatus::Identified, &permissions),
            vec![TaxCreditStatus::UnderAnalysis, TaxCreditStatus::Rejected]
        );
    }

    #[test]
    fn terminal_credits_offer_nothing() {
        let permissions = ClientPermissions {
            can_edit: true,
            can_approve: true,
            ..ClientPermissions::default()
        };
        assert!(allowed_transitions(TaxCreditStatus::Recovered, &permissions).is_empty());
        assert!(allowed_transitions(TaxCreditStatus::Rejected, &permissions).is_empty());
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::permissions::{SERVICE_ANALYST_ROLE, SERVICE_MANAGER_ROLE};
    use crate::domain::tax_credit::TaxKind;
    use crate::domain::types::ClientId;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{client, user_with_roles};

    fn credit(id: &str, client_id: &str, status: TaxCreditStatus, identified: i64) -> TaxCredit {
        TaxCredit {
            id: TaxCreditId::new(id).expect("valid id"),
            client_id: ClientId::new(client_id).expect("valid id"),
            kind: TaxKind::Icms,
            period: "2023-Q4".into(),
            identified_cents: identified,
            recovered_cents: 0,
            status,
            created_at: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
        }
    }

    fn status_form(status: &str) -> ChangeTaxCreditStatusForm {
        ChangeTaxCreditStatusForm {
            status: status.into(),
        }
    }

    #[test]
    fn page_is_scoped_to_active_client() {
        let mut repo = MockRepository::new();
        repo.expect_list_tax_credits()
            .withf(|filter| filter.client_id.as_ref().map(ClientId::as_str) == Some("1"))
            .times(1)
            .returning(|_| Ok(vec![credit("c1", "1", TaxCreditStatus::Identified, 10_000)]));
        repo.expect_list_clients()
            .returning(|_| Ok((1, vec![client("1", "Alpha")])));
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE, SERVICE_ANALYST_ROLE]);
        let active = client("1", "Alpha");

        let data = load_tax_credits_page(&repo, &user, Some(&active), TaxCreditsQuery::default())
            .expect("should load credits");

        assert_eq!(data.credits.len(), 1);
        assert_eq!(data.credits[0].client_name, "Alpha");
        assert_eq!(data.credits[0].identified, "R$ 100,00");
        assert_eq!(data.summary.count, 1);
        let values: Vec<_> = data.credits[0]
            .transitions
            .iter()
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(values, vec!["under_analysis", "rejected"]);
    }

    #[test]
    fn approval_requires_approver() {
        let mut repo = MockRepository::new();
        repo.expect_get_tax_credit_by_id()
            .returning(|_| Ok(Some(credit("c1", "1", TaxCreditStatus::UnderAnalysis, 500))));
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(client("1", "Alpha"))));
        repo.expect_update_tax_credit_status().times(0);
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE, SERVICE_ANALYST_ROLE]);

        let result = change_status(&repo, &user, "c1", status_form("approved"));

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn terminal_credit_cannot_change() {
        let mut repo = MockRepository::new();
        repo.expect_get_tax_credit_by_id()
            .returning(|_| Ok(Some(credit("c1", "1", TaxCreditStatus::Rejected, 500))));
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(client("1", "Alpha"))));
        repo.expect_update_tax_credit_status().times(0);
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE, SERVICE_MANAGER_ROLE]);

        let result = change_status(&repo, &user, "c1", status_form("identified"));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn manager_approves_credit() {
        let mut repo = MockRepository::new();
        repo.expect_get_tax_credit_by_id()
            .returning(|_| Ok(Some(credit("c1", "1", TaxCreditStatus::UnderAnalysis, 500))));
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(client("1", "Alpha"))));
        repo.expect_update_tax_credit_status()
            .withf(|id, status| id.as_str() == "c1" && *status == TaxCreditStatus::Approved)
            .times(1)
            .returning(|_, _| Ok(credit("c1", "1", TaxCreditStatus::Approved, 500)));
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE, SERVICE_MANAGER_ROLE]);

        let updated =
            change_status(&repo, &user, "c1", status_form("approved")).expect("should approve");

        assert_eq!(updated.status, TaxCreditStatus::Approved);
    }

    #[test]
    fn report_orders_by_identified_amount() {
        let mut repo = MockRepository::new();
        repo.expect_list_tax_credits().returning(|_| {
            Ok(vec![
                credit("c1", "1", TaxCreditStatus::Identified, 100),
                credit("c2", "2", TaxCreditStatus::Identified, 900),
            ])
        });
        repo.expect_list_clients()
            .returning(|_| Ok((2, vec![client("1", "Alpha"), client("2", "Beta")])));
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        let report = load_report(&repo, &user).expect("should build report");

        let names: Vec<_> = report.rows.iter().map(|r| r.client_name.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Alpha"]);
        assert_eq!(report.totals.identified, "R$ 10,00");
    }
}

use recovery_admin::domain::audit::{AuditFilter, AuditRisk};
use recovery_admin::domain::client::{
    ClientContact, ClientStatus, ClientType, NewClient, UpdateClient,
};
use recovery_admin::domain::proposal::{ProposalFilter, ProposalStatus};
use recovery_admin::domain::tax_credit::{TaxCreditFilter, TaxCreditStatus, TaxKind};
use recovery_admin::domain::types::{ClientId, ClientName, Cnpj, TaxCreditId};
use recovery_admin::repository::errors::RepositoryError;
use recovery_admin::repository::seed::SeedData;
use recovery_admin::repository::{
    AuditReader, ClientListQuery, ClientReader, ClientWriter, InMemoryRepository, ProposalReader,
    TaxCreditReader, TaxCreditWriter,
};

mod common;

fn new_client(name: &str, cnpj: &str) -> NewClient {
    NewClient::new(
        ClientName::new(name).unwrap(),
        Cnpj::new(cnpj).unwrap(),
        ClientType::Private,
        ClientStatus::Prospect,
        None,
        ClientContact::new(None, Some(" Curitiba ".into()), Some("pr".into()), None, None, None),
    )
}

#[test]
fn test_seed_rejects_malformed_json() {
    assert!(matches!(
        SeedData::from_json("{\"clients\": [{}]}"),
        Err(RepositoryError::Seed(_))
    ));
}

#[test]
fn test_client_repository_crud() {
    let repo = InMemoryRepository::new();

    let created = repo
        .create_clients(&[new_client("Gráfica Pinheiro Ltda", "11222333000181")])
        .unwrap();
    assert_eq!(created.len(), 1);
    let client = created[0].clone();
    assert_eq!(client.cnpj, "11.222.333/0001-81");
    assert_eq!(client.city.as_deref(), Some("Curitiba"));
    assert_eq!(client.state.as_deref(), Some("PR"));

    let fetched = repo.get_client_by_id(&client.id).unwrap().unwrap();
    assert_eq!(fetched, client);

    let updated = repo
        .update_client(
            &client.id,
            &UpdateClient {
                status: Some(ClientStatus::Active),
                city: Some(None),
                ..UpdateClient::default()
            },
        )
        .unwrap();
    assert_eq!(updated.status, ClientStatus::Active);
    assert!(updated.city.is_none());
    assert_eq!(updated.name, "Gráfica Pinheiro Ltda");

    repo.delete_client(&client.id).unwrap();
    assert!(repo.get_client_by_id(&client.id).unwrap().is_none());
    assert!(matches!(
        repo.delete_client(&client.id),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_duplicate_cnpj_is_rejected() {
    let repo = common::seeded_repository();

    // Client 1 is registered as 52.601.815/0001-20.
    let result = repo.create_clients(&[new_client("Outra Metalúrgica", "52601815000120")]);
    assert!(matches!(result, Err(RepositoryError::ConstraintViolation(_))));

    let update = UpdateClient {
        cnpj: Some(Cnpj::new("52.601.815/0001-20").unwrap()),
        ..UpdateClient::default()
    };
    assert!(matches!(
        repo.update_client(&ClientId::new("2").unwrap(), &update),
        Err(RepositoryError::ConstraintViolation(_))
    ));

    let (total, _) = repo.list_clients(ClientListQuery::new()).unwrap();
    assert_eq!(total, 8);
}

#[test]
fn test_batch_insert_is_all_or_nothing() {
    let repo = InMemoryRepository::new();
    let batch = [
        new_client("Primeira", "11222333000181"),
        new_client("Segunda", "11.222.333/0001-81"),
    ];

    assert!(repo.create_clients(&batch).is_err());
    let (total, _) = repo.list_clients(ClientListQuery::new()).unwrap();
    assert_eq!(total, 0);
}

#[test]
fn test_client_search_and_filters() {
    let repo = common::seeded_repository();

    let (total, items) = repo
        .list_clients(ClientListQuery::new().search("horizonte"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id.as_str(), "1");

    let (total, items) = repo
        .list_clients(ClientListQuery::new().search("52601815"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id.as_str(), "1");

    let (total, _) = repo
        .list_clients(ClientListQuery::new().status(ClientStatus::Active))
        .unwrap();
    assert_eq!(total, 4);

    let (total, items) = repo
        .list_clients(ClientListQuery::new().client_type(ClientType::Public))
        .unwrap();
    assert_eq!(total, 2);
    assert!(items.iter().all(|c| c.client_type == ClientType::Public));
}

#[test]
fn test_client_pagination() {
    let repo = common::seeded_repository();

    let (total, first) = repo
        .list_clients(ClientListQuery::new().paginate(1, 3))
        .unwrap();
    assert_eq!(total, 8);
    assert_eq!(first.len(), 3);
    assert_eq!(first[0].name, "Agropecuária Três Rios");

    let (_, last) = repo
        .list_clients(ClientListQuery::new().paginate(3, 3))
        .unwrap();
    assert_eq!(last.len(), 2);

    let (_, beyond) = repo
        .list_clients(ClientListQuery::new().paginate(4, 3))
        .unwrap();
    assert!(beyond.is_empty());
}

#[test]
fn test_delete_cascades_to_related_records() {
    let repo = common::seeded_repository();
    let id = ClientId::new("1").unwrap();

    repo.delete_client(&id).unwrap();

    assert!(
        repo.list_tax_credits(&TaxCreditFilter::default().client(id.clone()))
            .unwrap()
            .is_empty()
    );
    assert!(
        repo.list_audits(&AuditFilter::default().client(id.clone()))
            .unwrap()
            .is_empty()
    );
    assert!(
        repo.list_proposals(&ProposalFilter::default().client(id))
            .unwrap()
            .is_empty()
    );
    assert_eq!(repo.list_tax_credits(&TaxCreditFilter::default()).unwrap().len(), 6);
}

#[test]
fn test_tax_credit_listing_and_status_update() {
    let repo = common::seeded_repository();

    let credits = repo.list_tax_credits(&TaxCreditFilter::default()).unwrap();
    assert_eq!(credits.len(), 9);
    assert!(credits.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    let icms = repo
        .list_tax_credits(&TaxCreditFilter::default().kind(TaxKind::Icms))
        .unwrap();
    assert_eq!(icms.len(), 2);

    let by_period = repo
        .list_tax_credits(&TaxCreditFilter::default().search("2021"))
        .unwrap();
    assert_eq!(by_period.len(), 1);
    assert_eq!(by_period[0].id.as_str(), "tc-4");

    let id = TaxCreditId::new("tc-3").unwrap();
    let recovered = repo
        .update_tax_credit_status(&id, TaxCreditStatus::Recovered)
        .unwrap();
    assert_eq!(recovered.status, TaxCreditStatus::Recovered);
    assert_eq!(recovered.recovered_cents, recovered.identified_cents);

    let missing = TaxCreditId::new("tc-404").unwrap();
    assert!(matches!(
        repo.update_tax_credit_status(&missing, TaxCreditStatus::Approved),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_audit_and_proposal_filters() {
    let repo = common::seeded_repository();

    let audits = repo.list_audits(&AuditFilter::default()).unwrap();
    assert_eq!(audits.len(), 5);
    assert!(audits.windows(2).all(|w| w[0].scheduled_for <= w[1].scheduled_for));

    let high = repo
        .list_audits(&AuditFilter::default().risk(AuditRisk::High))
        .unwrap();
    assert_eq!(high.len(), 2);

    let accepted = repo
        .list_proposals(&ProposalFilter::default().status(ProposalStatus::Accepted))
        .unwrap();
    let ids: Vec<_> = accepted.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["pr-1", "pr-5"]);
}

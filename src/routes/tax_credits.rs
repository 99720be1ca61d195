use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::dto::tax_credits::TaxCreditsQuery;
use crate::forms::tax_credits::ChangeTaxCreditStatusForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::InMemoryRepository;
use crate::routes::{
    base_context, error_page, flash_error, open_store, parse_filter, redirect, render_template,
};
use crate::services::tax_credits as tax_credits_service;

#[derive(Deserialize)]
struct TaxCreditsQueryParams {
    q: Option<String>,
    status: Option<String>,
    kind: Option<String>,
}

#[get("/tax-credits")]
pub async fn show_tax_credits(
    params: web::Query<TaxCreditsQueryParams>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<InMemoryRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let params = params.into_inner();
    let store = open_store(repo.get_ref(), &session);
    let query = TaxCreditsQuery {
        search: params.q,
        status: parse_filter(params.status.as_deref()),
        kind: parse_filter(params.kind.as_deref()),
    };

    let data = match tax_credits_service::load_tax_credits_page(
        repo.get_ref(),
        &user,
        store.active_client(),
        query,
    ) {
        Ok(data) => data,
        Err(err) => return error_page(err),
    };

    let mut context =
        base_context(&flash_messages, &user, &store, &server_config, "tax_credits");
    context.insert("credits", &data.credits);
    context.insert("summary", &data.summary);
    context.insert("scope", &data.scope);
    context.insert("search_query", &data.search_query);
    context.insert("status", &data.status);
    context.insert("kind", &data.kind);
    context.insert("status_choices", &data.status_choices);
    context.insert("kind_choices", &data.kind_choices);
    render_template(&tera, "tax_credits/index.html", &context)
}

#[post("/tax-credits/{credit_id}/status")]
pub async fn change_tax_credit_status(
    credit_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    web::Form(form): web::Form<ChangeTaxCreditStatusForm>,
) -> impl Responder {
    match tax_credits_service::change_status(repo.get_ref(), &user, &credit_id, form) {
        Ok(credit) => {
            FlashMessage::success(format!(
                "Crédito {} {} agora está \"{}\".",
                credit.kind,
                credit.period,
                credit.status.label()
            ))
            .send();
        }
        Err(err) => flash_error(&err),
    }
    redirect("/admin/tax-credits")
}

#[get("/reports")]
pub async fn show_report(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<InMemoryRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let store = open_store(repo.get_ref(), &session);

    let data = match tax_credits_service::load_report(repo.get_ref(), &user) {
        Ok(data) => data,
        Err(err) => return error_page(err),
    };

    let mut context = base_context(&flash_messages, &user, &store, &server_config, "reports");
    context.insert("rows", &data.rows);
    context.insert("totals", &data.totals);
    render_template(&tera, "reports/index.html", &context)
}

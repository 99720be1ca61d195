use actix_session::Session;
use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use chrono::Utc;
use serde::Deserialize;
use tera::Tera;

use crate::dto::audits::AuditsQuery;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::InMemoryRepository;
use crate::routes::{base_context, error_page, open_store, parse_filter, render_template};
use crate::services::audits as audits_service;

#[derive(Deserialize)]
struct AuditsQueryParams {
    q: Option<String>,
    status: Option<String>,
    risk: Option<String>,
}

#[get("/audits")]
pub async fn show_audits(
    params: web::Query<AuditsQueryParams>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<InMemoryRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let params = params.into_inner();
    let store = open_store(repo.get_ref(), &session);
    let query = AuditsQuery {
        search: params.q,
        status: parse_filter(params.status.as_deref()),
        risk: parse_filter(params.risk.as_deref()),
    };

    let data = match audits_service::load_audits_page(
        repo.get_ref(),
        &user,
        store.active_client(),
        query,
        Utc::now().date_naive(),
    ) {
        Ok(data) => data,
        Err(err) => return error_page(err),
    };

    let mut context = base_context(&flash_messages, &user, &store, &server_config, "audits");
    context.insert("audits", &data.audits);
    context.insert("stats", &data.stats);
    context.insert("scope", &data.scope);
    context.insert("search_query", &data.search_query);
    context.insert("status", &data.status);
    context.insert("risk", &data.risk);
    context.insert("status_choices", &data.status_choices);
    context.insert("risk_choices", &data.risk_choices);
    render_template(&tera, "audits/index.html", &context)
}

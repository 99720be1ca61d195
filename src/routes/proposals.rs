use actix_session::Session;
use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::dto::proposals::ProposalsQuery;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::InMemoryRepository;
use crate::routes::{base_context, error_page, open_store, parse_filter, render_template};
use crate::services::proposals as proposals_service;

#[derive(Deserialize)]
struct ProposalsQueryParams {
    status: Option<String>,
}

#[get("/proposals")]
pub async fn show_proposals(
    params: web::Query<ProposalsQueryParams>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<InMemoryRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let store = open_store(repo.get_ref(), &session);
    let query = ProposalsQuery {
        status: parse_filter(params.status.as_deref()),
    };

    let data = match proposals_service::load_proposals_page(
        repo.get_ref(),
        &user,
        store.active_client(),
        query,
    ) {
        Ok(data) => data,
        Err(err) => return error_page(err),
    };

    let mut context = base_context(&flash_messages, &user, &store, &server_config, "proposals");
    context.insert("proposals", &data.proposals);
    context.insert("stats", &data.stats);
    context.insert("scope", &data.scope);
    context.insert("status", &data.status);
    context.insert("status_choices", &data.status_choices);
    render_template(&tera, "proposals/index.html", &context)
}

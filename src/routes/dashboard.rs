use actix_session::Session;
use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use chrono::Utc;
use tera::Tera;

use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::InMemoryRepository;
use crate::routes::{base_context, error_page, open_store, render_template};
use crate::services::dashboard as dashboard_service;

#[get("")]
pub async fn show_dashboard(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<InMemoryRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let store = open_store(repo.get_ref(), &session);
    let today = Utc::now().date_naive();

    let data = match dashboard_service::load_dashboard(
        repo.get_ref(),
        &user,
        store.active_client(),
        today,
    ) {
        Ok(data) => data,
        Err(err) => return error_page(err),
    };

    let mut context = base_context(&flash_messages, &user, &store, &server_config, "dashboard");
    context.insert("dashboard", &data);
    render_template(&tera, "dashboard/index.html", &context)
}

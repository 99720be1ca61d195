//! HTTP handlers and the helpers they share.

use std::str::FromStr;

use actix_session::Session;
use actix_web::{HttpResponse, http::header, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::middleware::RedirectUnauthorized;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::InMemoryRepository;
use crate::services::ServiceError;
use crate::services::api::selection_view;
use crate::store::session::SessionStorage;
use crate::store::{ClientStore, Notification, NotificationLevel, Notifier};

pub mod api;
pub mod audits;
pub mod clients;
pub mod dashboard;
pub mod main;
pub mod proposals;
pub mod tax_credits;

/// Store for the current request, persisted in the session cookie.
pub type SessionClientStore<'a> =
    ClientStore<'a, InMemoryRepository, SessionStorage<'a>, FlashNotifier>;

/// Sends store notifications as flash messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlashNotifier;

impl Notifier for FlashNotifier {
    fn notify(&self, notification: Notification) {
        let level = match notification.level {
            NotificationLevel::Info => Level::Info,
            NotificationLevel::Success => Level::Success,
            NotificationLevel::Warning => Level::Warning,
            NotificationLevel::Error => Level::Error,
        };
        FlashMessage::new(notification.message(), level).send();
    }
}

pub fn open_store<'a>(repo: &'a InMemoryRepository, session: &'a Session) -> SessionClientStore<'a> {
    ClientStore::open(repo, SessionStorage::new(session), FlashNotifier)
}

/// Registers every route of the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(main::landing)
        .service(main::contact)
        .service(main::not_assigned)
        .service(main::logout)
        .service(
            web::scope("/api")
                .service(api::api_v1_clients)
                .service(api::api_v1_active_client),
        )
        .service(
            web::scope("/admin")
                .wrap(RedirectUnauthorized)
                .service(dashboard::show_dashboard)
                .service(clients::show_clients)
                .service(clients::add_client)
                .service(clients::upload_clients)
                .service(clients::clear_active_client)
                .service(clients::show_client)
                .service(clients::save_client)
                .service(clients::delete_client)
                .service(clients::select_client)
                .service(tax_credits::show_tax_credits)
                .service(tax_credits::change_tax_credit_status)
                .service(tax_credits::show_report)
                .service(audits::show_audits)
                .service(proposals::show_proposals),
        );
}

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err:?}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Alerts plus the chrome every authenticated page renders.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    store: &SessionClientStore<'_>,
    server_config: &ServerConfig,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", user);
    context.insert("current_page", current_page);
    context.insert("home_url", &server_config.auth_service_url);
    context.insert("selection", &selection_view(store, user));
    context
}

/// Response for a page whose data could not be loaded.
pub fn error_page(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => redirect("/na"),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        other => {
            log::error!("Failed to load page: {other}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Flashes a failed action in terms the user can act on.
pub fn flash_error(err: &ServiceError) {
    let message = match err {
        ServiceError::Unauthorized => "Você não tem permissão para esta ação.".to_string(),
        ServiceError::NotFound => "Registro não encontrado.".to_string(),
        ServiceError::Form(message) => message.clone(),
        ServiceError::TypeConstraint(_) => "Dados inválidos.".to_string(),
        ServiceError::Conflict(_) => "Já existe um cliente com este CNPJ.".to_string(),
        ServiceError::Internal(_) => "Erro interno. Tente novamente.".to_string(),
    };
    FlashMessage::error(message).send();
}

/// Parses an optional query value, treating blank or unknown input as absent.
pub fn parse_filter<T: FromStr>(value: Option<&str>) -> Option<T> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::ClientStatus;

    #[test]
    fn filters_ignore_blank_and_unknown_values() {
        assert_eq!(parse_filter::<ClientStatus>(None), None);
        assert_eq!(parse_filter::<ClientStatus>(Some("  ")), None);
        assert_eq!(parse_filter::<ClientStatus>(Some("bogus")), None);
        assert_eq!(
            parse_filter::<ClientStatus>(Some("active")),
            Some(ClientStatus::Active)
        );
    }

    #[test]
    fn redirect_is_see_other() {
        let response = redirect("/admin");
        assert_eq!(response.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/admin"
        );
    }
}

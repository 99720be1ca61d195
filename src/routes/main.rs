use actix_identity::Identity;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::forms::landing::ContactForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::routes::{alert_level_to_str, flash_error, redirect, render_template};
use crate::services::landing as landing_service;

fn alerts_context(flash_messages: &IncomingFlashMessages) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();
    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context
}

/// Public marketing page.
#[get("/")]
pub async fn landing(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let mut context = alerts_context(&flash_messages);
    context.insert("home_url", &server_config.auth_service_url);
    render_template(&tera, "main/landing.html", &context)
}

#[post("/contact")]
pub async fn contact(web::Form(form): web::Form<ContactForm>) -> impl Responder {
    match landing_service::submit_contact(form) {
        Ok(_) => {
            FlashMessage::success("Mensagem recebida. Entraremos em contato em breve.".to_string())
                .send();
        }
        Err(err) => flash_error(&err),
    }
    redirect("/#contato")
}

#[get("/na")]
pub async fn not_assigned(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let mut context = alerts_context(&flash_messages);
    context.insert("current_user", &user);
    context.insert("current_page", "na");
    context.insert("home_url", &server_config.auth_service_url);
    render_template(&tera, "main/not_assigned.html", &context)
}

#[post("/logout")]
pub async fn logout(user: Option<Identity>) -> HttpResponse {
    if let Some(user) = user {
        user.logout();
    }
    redirect("/")
}

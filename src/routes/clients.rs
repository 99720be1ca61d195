use actix_multipart::form::MultipartForm;
use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use serde::Deserialize;
use tera::Tera;

use crate::dto::clients::{ClientsQuery, status_choices, type_choices};
use crate::forms::clients::{AddClientForm, SaveClientForm, UploadClientsForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::InMemoryRepository;
use crate::routes::{
    base_context, error_page, flash_error, open_store, parse_filter, redirect, render_template,
};
use crate::services::clients as clients_service;

#[derive(Deserialize)]
struct ClientsQueryParams {
    q: Option<String>,
    status: Option<String>,
    #[serde(rename = "type")]
    client_type: Option<String>,
    page: Option<usize>,
}

#[get("/clients")]
pub async fn show_clients(
    params: web::Query<ClientsQueryParams>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<InMemoryRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let params = params.into_inner();
    let store = open_store(repo.get_ref(), &session);
    let query = ClientsQuery {
        search: params.q,
        status: parse_filter(params.status.as_deref()),
        client_type: parse_filter(params.client_type.as_deref()),
        page: params.page,
    };

    let data = match clients_service::load_clients_page(
        repo.get_ref(),
        &user,
        store.active_client(),
        query,
    ) {
        Ok(data) => data,
        Err(err) => return error_page(err),
    };

    let mut context = base_context(&flash_messages, &user, &store, &server_config, "clients");
    context.insert("clients", &data.clients);
    context.insert("search_query", &data.search_query);
    context.insert("status", &data.status);
    context.insert("client_type", &data.client_type);
    context.insert("can_edit", &data.can_edit);
    context.insert("status_choices", &status_choices());
    context.insert("type_choices", &type_choices());
    render_template(&tera, "clients/index.html", &context)
}

#[post("/clients/add")]
pub async fn add_client(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<InMemoryRepository>,
    web::Form(form): web::Form<AddClientForm>,
) -> impl Responder {
    let mut store = open_store(repo.get_ref(), &session);
    match clients_service::add_client(&mut store, &user, form) {
        Ok(client) => {
            FlashMessage::success(format!("Cliente {} cadastrado.", client.name)).send();
        }
        Err(err) => flash_error(&err),
    }
    redirect("/admin/clients")
}

#[post("/clients/upload")]
pub async fn upload_clients(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    MultipartForm(form): MultipartForm<UploadClientsForm>,
) -> impl Responder {
    match clients_service::upload_clients(repo.get_ref(), &user, &form) {
        Ok(count) => {
            FlashMessage::success(format!("{count} clientes importados.")).send();
        }
        Err(err) => flash_error(&err),
    }
    redirect("/admin/clients")
}

#[post("/clients/clear")]
pub async fn clear_active_client(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<InMemoryRepository>,
) -> impl Responder {
    let mut store = open_store(repo.get_ref(), &session);
    if let Err(err) = clients_service::clear_active_client(&mut store, &user) {
        flash_error(&err);
    }
    redirect("/admin")
}

#[get("/clients/{client_id}")]
pub async fn show_client(
    client_id: web::Path<String>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<InMemoryRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let store = open_store(repo.get_ref(), &session);
    let today = Utc::now().date_naive();

    let data = match clients_service::load_client_detail(
        repo.get_ref(),
        &user,
        store.active_client(),
        &client_id,
        today,
    ) {
        Ok(data) => data,
        Err(err) => return error_page(err),
    };

    let mut context = base_context(&flash_messages, &user, &store, &server_config, "clients");
    context.insert("client", &data.client);
    context.insert("permissions", &data.permissions);
    context.insert("credits", &data.credits);
    context.insert("credit_summary", &data.credit_summary);
    context.insert("audits", &data.audits);
    context.insert("proposals", &data.proposals);
    context.insert("status_choices", &status_choices());
    context.insert("type_choices", &type_choices());
    render_template(&tera, "clients/show.html", &context)
}

#[post("/clients/{client_id}/save")]
pub async fn save_client(
    client_id: web::Path<String>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<InMemoryRepository>,
    web::Form(form): web::Form<SaveClientForm>,
) -> impl Responder {
    let client_id = client_id.into_inner();
    let mut store = open_store(repo.get_ref(), &session);
    match clients_service::update_client(&mut store, &user, &client_id, form) {
        Ok(_) => {
            FlashMessage::success("Cliente atualizado.".to_string()).send();
        }
        Err(err) => flash_error(&err),
    }
    redirect(&format!("/admin/clients/{client_id}"))
}

#[post("/clients/{client_id}/delete")]
pub async fn delete_client(
    client_id: web::Path<String>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<InMemoryRepository>,
) -> impl Responder {
    let mut store = open_store(repo.get_ref(), &session);
    match clients_service::delete_client(&mut store, &user, &client_id) {
        Ok(client) => {
            FlashMessage::success(format!("Cliente {} excluído.", client.name)).send();
            redirect("/admin/clients")
        }
        Err(err) => {
            flash_error(&err);
            redirect(&format!("/admin/clients/{client_id}"))
        }
    }
}

/// Makes the client active and lands on the dashboard.
#[post("/clients/{client_id}/select")]
pub async fn select_client(
    client_id: web::Path<String>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<InMemoryRepository>,
) -> impl Responder {
    let mut store = open_store(repo.get_ref(), &session);
    match clients_service::select_client(&mut store, &user, &client_id) {
        Ok(_) => redirect("/admin"),
        Err(err) => {
            flash_error(&err);
            redirect("/admin/clients")
        }
    }
}

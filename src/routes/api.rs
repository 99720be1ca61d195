use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, web};
use serde::Deserialize;

use crate::dto::api::ClientsQuery;
use crate::models::auth::AuthenticatedUser;
use crate::repository::InMemoryRepository;
use crate::routes::open_store;
use crate::services::ServiceError;
use crate::services::api as api_service;

#[derive(Deserialize)]
struct ApiV1ClientsQueryParams {
    search: Option<String>,
}

fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        other => {
            log::error!("API request failed: {other}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/clients")]
pub async fn api_v1_clients(
    params: web::Query<ApiV1ClientsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
) -> impl Responder {
    let query = ClientsQuery {
        search: params.into_inner().search,
    };

    match api_service::list_clients(repo.get_ref(), &user, query) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}

#[get("/v1/active-client")]
pub async fn api_v1_active_client(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<InMemoryRepository>,
) -> impl Responder {
    let store = open_store(repo.get_ref(), &session);

    match api_service::active_client(&store, &user) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response(err),
    }
}

use actix_identity::{Identity, IdentityMiddleware};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpMessage, HttpRequest, HttpResponse, test, web};
use actix_web_flash_messages::{FlashMessagesFramework, Level, storage::CookieMessageStore};
use serde_json::Value;
use tera::Tera;

use recovery_admin::models::auth::AuthenticatedUser;
use recovery_admin::models::config::ServerConfig;
use recovery_admin::routes::{self, alert_level_to_str};

mod common;

const SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

fn server_config() -> ServerConfig {
    ServerConfig {
        domain: "localhost".into(),
        address: "127.0.0.1".into(),
        port: 8080,
        templates_dir: "templates/**/*".into(),
        secret: SECRET.into(),
        auth_service_url: "http://localhost:8000".into(),
        seed_path: "data/seed.json".into(),
    }
}

fn manager() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "42".into(),
        email: "gestora@example.com".into(),
        name: "Gestora".into(),
        roles: vec!["recovery".into(), "recovery_manager".into()],
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    }
}

async fn test_login(req: HttpRequest) -> HttpResponse {
    let token = manager().to_jwt(SECRET).unwrap();
    Identity::login(&req.extensions(), token).unwrap();
    HttpResponse::Ok().finish()
}

macro_rules! test_app {
    () => {{
        let key = Key::from(SECRET.as_bytes());
        let message_store = CookieMessageStore::builder(key.clone()).build();
        let tera = Tera::new("templates/**/*").unwrap();
        test::init_service(
            App::new()
                .wrap(FlashMessagesFramework::builder(message_store).build())
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), key)
                        .cookie_secure(false)
                        .build(),
                )
                .route("/test/login", web::post().to(test_login))
                .configure(routes::configure)
                .app_data(web::Data::new(tera))
                .app_data(web::Data::new(common::seeded_repository()))
                .app_data(web::Data::new(server_config())),
        )
        .await
    }};
}

/// Replaces cookies in `jar` with the ones set by `resp`.
fn keep_cookies<B>(jar: &mut Vec<Cookie<'static>>, resp: &ServiceResponse<B>) {
    for cookie in resp.response().cookies() {
        jar.retain(|c| c.name() != cookie.name());
        jar.push(cookie.into_owned());
    }
}

fn with_cookies(mut req: test::TestRequest, jar: &[Cookie<'static>]) -> test::TestRequest {
    for cookie in jar {
        req = req.cookie(cookie.clone());
    }
    req
}

#[test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[actix_web::test]
async fn test_landing_is_public() {
    let app = test_app!();

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("id=\"contato\""));
}

#[actix_web::test]
async fn test_admin_redirects_to_signin() {
    let app = test_app!();

    let resp = test::call_service(&app, test::TestRequest::get().uri("/admin").to_request()).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/auth/signin");
}

#[actix_web::test]
async fn test_api_requires_identity() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/api/v1/active-client").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_select_client_persists_in_session() {
    let app = test_app!();
    let mut jar = Vec::new();

    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/test/login").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    keep_cookies(&mut jar, &resp);

    let req = with_cookies(test::TestRequest::post().uri("/admin/clients/1/select"), &jar);
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/admin");
    keep_cookies(&mut jar, &resp);

    let req = with_cookies(test::TestRequest::get().uri("/api/v1/active-client"), &jar);
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let view: Value = test::read_body_json(resp).await;

    assert_eq!(view["activeClient"]["id"], "1");
    assert_eq!(view["recentClients"].as_array().unwrap().len(), 1);
    assert_eq!(view["permissions"]["canApprove"], true);
    assert_eq!(view["permissions"]["isAdmin"], false);
}

#[actix_web::test]
async fn test_unknown_client_is_not_selected() {
    let app = test_app!();
    let mut jar = Vec::new();

    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/test/login").to_request(),
    )
    .await;
    keep_cookies(&mut jar, &resp);

    let req = with_cookies(test::TestRequest::post().uri("/admin/clients/404/select"), &jar);
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/admin/clients"
    );
    keep_cookies(&mut jar, &resp);

    let req = with_cookies(test::TestRequest::get().uri("/api/v1/active-client"), &jar);
    let view: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert!(view["activeClient"].is_null());
}

#[actix_web::test]
async fn test_clients_api_searches() {
    let app = test_app!();
    let mut jar = Vec::new();

    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/test/login").to_request(),
    )
    .await;
    keep_cookies(&mut jar, &resp);

    let req = with_cookies(
        test::TestRequest::get().uri("/api/v1/clients?search=saneamento"),
        &jar,
    );
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;

    assert_eq!(body["total"], 1);
    assert_eq!(body["clients"][0]["id"], "7");
}

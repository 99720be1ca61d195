use std::env;

use dotenvy::dotenv;
use recovery_admin::models::config::ServerConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
    let server_config = ServerConfig::load("config", &app_env).map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        std::io::Error::other(format!("Configuration error: {e}"))
    })?;

    recovery_admin::run(server_config).await
}

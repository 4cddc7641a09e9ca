//! # Vet Agenda
//!
//! Veterinary-clinic appointment service: tutors book services for
//! their pets with a veterinarian; clinic staff manage the appointment
//! lifecycle. JSON API over ntex with a sqlite-backed repository.

#![recursion_limit = "256"]

pub mod api;
pub mod config;
pub mod consts;
pub mod front;
pub mod logger;
pub mod models;
pub mod repo;
pub mod utils;

use ntex::web;
use ntex_cors::Cors;
use ntex_identity::{CookieIdentityPolicy, IdentityService};
use ntex_session::CookieSession;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    logger::setup_simple_logger()?;

    let sqlite_repo = repo::sqlite::SqlxSqliteRepo {
        db_pool: utils::setup_sqlite_db_pool(config::APP_CONFIG.db_is_encrypted()).await?,
    };
    utils::run_migrations(&sqlite_repo.db_pool).await?;

    // Identity cookies must survive restarts, so their key is derived
    // from configuration; the session key may rotate per boot.
    let identity_key =
        utils::build_cookie_key(&config::APP_CONFIG.identity_pass, &config::APP_CONFIG.identity_salt)?;
    let session_key = utils::build_random_cookie_key()?;

    configure_and_run_server(identity_key, session_key, sqlite_repo).await
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor() -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    ssl_acceptor
        .set_private_key_file(&config::APP_CONFIG.private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                config::APP_CONFIG.private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&config::APP_CONFIG.certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                config::APP_CONFIG.certificate_path,
                e
            )
        })?;

    Ok(ssl_acceptor)
}

async fn configure_and_run_server(
    identity_key: [u8; 32],
    session_key: [u8; 32],
    sqlite_repo: repo::sqlite::SqlxSqliteRepo,
) -> anyhow::Result<()> {
    let server_addr = ("0.0.0.0", config::APP_CONFIG.web_server_port);

    let server = web::server(move || {
        web::App::new()
            .wrap(
                Cors::new()
                    .allowed_methods(vec!["GET", "HEAD", "POST", "OPTIONS", "PUT", "DELETE"])
                    .allowed_origin("http://localhost:8080")
                    .finish(),
            )
            .wrap(
                CookieSession::private(&session_key)
                    .secure(config::APP_CONFIG.is_prod())
                    .domain(config::APP_CONFIG.web_server_host.to_string())
                    .max_age(consts::MAX_AGE_COOKIES)
                    .name(consts::SESSION_COOKIE_NAME),
            )
            .wrap(IdentityService::new(
                CookieIdentityPolicy::new(&identity_key)
                    .name(consts::IDENTITY_COOKIE_NAME)
                    .domain(config::APP_CONFIG.web_server_host.to_string())
                    .max_age(consts::MAX_AGE_COOKIES)
                    .secure(config::APP_CONFIG.is_prod()),
            ))
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(front::AppState {
                repo: Box::new(sqlite_repo.clone()),
            })
            .configure(front::routes::auth)
            .configure(front::routes::appointments)
    });

    let bound_server = if config::APP_CONFIG.is_prod() {
        let ssl_acceptor = setup_ssl_acceptor()?;
        server.bind_openssl(server_addr, ssl_acceptor)?
    } else {
        server.bind(server_addr)?
    };

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}

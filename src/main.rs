//! Flora backend server.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use flora_backend::adapters::auth::{Argon2PasswordHasher, JwtSessionService};
use flora_backend::adapters::email::{ResendConfig, ResendContactMailer};
use flora_backend::adapters::http::{app_router, AppState, RouterOptions};
use flora_backend::adapters::memory::{InMemoryEntitlementRepository, InMemoryUserRepository};
use flora_backend::adapters::postgres::{PostgresEntitlementRepository, PostgresUserRepository};
use flora_backend::adapters::razorpay::{RazorpayConfig, RazorpayGateway};
use flora_backend::application::EntitlementService;
use flora_backend::config::{AppConfig, ConfigError, DatabaseConfig, LogFormat, ServerConfig};
use flora_backend::domain::entitlement::PaymentVerifier;
use flora_backend::domain::foundation::{Clock, SystemClock};
use flora_backend::ports::{EntitlementRepository, UserRepository};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid bind address: {0}")]
    BindAddress(#[from] std::net::AddrParseError),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);

    config.validate().map_err(ConfigError::from)?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let (users, entitlement_repository) = repositories(config.database.as_ref()).await?;

    let gateway = Arc::new(RazorpayGateway::new(
        RazorpayConfig::new(&config.payment.razorpay_key_id, config.payment.key_secret())
            .with_base_url(&config.payment.api_base_url),
    ));
    let entitlements = EntitlementService::new(
        entitlement_repository.clone(),
        users.clone(),
        gateway,
        PaymentVerifier::new(config.payment.key_secret()),
        config.price_table(),
        clock.clone(),
    );

    let sessions = Arc::new(JwtSessionService::new(
        config.auth.jwt_secret(),
        config.auth.token_ttl_secs,
        &config.auth.issuer,
        clock.clone(),
    ));
    let mailer = Arc::new(ResendContactMailer::new(ResendConfig::new(
        config.email.api_key(),
        config.email.from_header(),
        &config.email.contact_email,
        &config.email.site_name,
    )));

    let state = AppState {
        users,
        entitlement_repository,
        entitlements,
        hasher: Arc::new(Argon2PasswordHasher::new()),
        token_issuer: sessions.clone(),
        session_validator: sessions,
        mailer,
        clock,
    };

    let app = app_router(
        state,
        RouterOptions {
            cors_origins: config.server.cors_origins_list(),
            request_timeout: config.server.request_timeout(),
        },
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        test_mode = config.payment.is_test_mode(),
        "flora backend listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let _ = match server.log_format {
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
}

async fn repositories(
    database: Option<&DatabaseConfig>,
) -> Result<(Arc<dyn UserRepository>, Arc<dyn EntitlementRepository>), StartupError> {
    let Some(database) = database else {
        tracing::warn!("no database configured; accounts and entitlements are kept in memory");
        return Ok((
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryEntitlementRepository::new()),
        ));
    };

    tracing::info!(url = %database.redacted_url(), "connecting to database");
    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .idle_timeout(database.idle_timeout())
        .connect(&database.url)
        .await?;

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    Ok((
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresEntitlementRepository::new(pool)),
    ))
}

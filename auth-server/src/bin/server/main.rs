use std::sync::Arc;

use auth_server::account::policy::AccountPolicy;
use auth_server::account::ports::AccountServicePort;
use auth_server::account::service::AccountService;
use auth_server::config::Config;
use auth_server::inbound::http::router::create_router;
use auth_server::repositories::InMemoryUserStore;
use auth_server::repositories::PostgresUserStore;
use credentials::Authenticator;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-server",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_seconds = config.jwt.ttl_seconds,
        default_active = config.accounts.default_active,
        store = if config.database.is_some() { "postgresql" } else { "memory" },
        "Configuration loaded"
    );

    let policy = AccountPolicy::from_config(&config.accounts)?;
    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        config.jwt.ttl(),
    ));

    let account_service: Arc<dyn AccountServicePort> = match &config.database {
        Some(database) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            Arc::new(AccountService::new(
                Arc::new(PostgresUserStore::new(pg_pool)),
                Arc::clone(&authenticator),
                policy,
            ))
        }
        None => {
            tracing::warn!("No database configured, accounts are kept in memory");
            Arc::new(AccountService::new(
                Arc::new(InMemoryUserStore::new()),
                Arc::clone(&authenticator),
                policy,
            ))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(account_service, authenticator);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");

    Ok(())
}

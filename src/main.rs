use actix_web::{App, HttpServer, middleware::Logger, web};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use registrar::{
  adapters::http::{SecurityHeadersMiddleware, configure_registration_routes},
  application::registration::RegisterUserUseCase,
  domain::registration::RegistrationService,
  infrastructure::{
    config::Config,
    notification::SmtpNotifier,
    persistence::postgres::PostgresAccountRepository,
    security::{JwtTokenIssuer, Pbkdf2PasswordHasher},
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "registrar=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting registrar");

  let config = Config::load().expect("Failed to load configuration");
  config.validate().map_err(|e| {
    tracing::error!("Invalid configuration: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;
  tracing::info!("Configuration loaded successfully");

  // Set up database connection pool with timeout
  tracing::info!("Connecting to database");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?",
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .expect("Failed to run database migrations");
  tracing::info!("Database migrations completed");

  // Wire adapters into the registration service
  let accounts = Arc::new(PostgresAccountRepository::new(db_pool));
  let password_hasher = Arc::new(Pbkdf2PasswordHasher::new());
  let token_issuer = Arc::new(JwtTokenIssuer::new(&config.jwt).map_err(|e| {
    tracing::error!("Failed to create token issuer: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?);
  let notifier = Arc::new(SmtpNotifier::new(&config.email).map_err(|e| {
    tracing::error!("Failed to create SMTP notifier: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?);

  let registration_service = Arc::new(RegistrationService::new(
    accounts,
    password_hasher,
    token_issuer,
    notifier,
  ));
  let register_use_case = Arc::new(RegisterUserUseCase::new(registration_service));

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    App::new()
      .wrap(SecurityHeadersMiddleware::new())
      .wrap(Logger::default())
      .service(
        web::scope("/api/v1")
          .configure(|cfg| configure_registration_routes(cfg, register_use_case.clone())),
      )
      // Health check endpoint
      .route("/health", web::get().to(health_check))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}

/// Health check endpoint
async fn health_check() -> &'static str {
  "OK"
}

//! Gym Membership API server.
//!
//! ## Endpoints
//!
//! - `/api/members` - Enrollment, listing, edits, renewals and plan switches
//! - `/api/payments/:member_id` - Record and list payments
//! - `/api/plans` - Plan catalog
//! - `/api/checkins/:member_id` - Check-in, check-out and visit history
//! - `/api/dashboard/stats` - Front-desk counters
//! - `/api/tasks/update-member-status` - Run the status sweep on demand
//! - `/api/users` - Staff accounts (admin)
//! - `/api/auth/login` - Exchange staff credentials for a bearer token
//! - `/health` - Liveness check
//!
//! The status sweep also runs in the background on a fixed interval.

use std::sync::Arc;

use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use gym_membership::adapters::http::{app_router, AppState};
use gym_membership::adapters::{
    Argon2PasswordHasher, JwtSessionValidator, JwtTokenIssuer, LoggingNotifier,
    PostgresCheckinRepository, PostgresMembershipReader, PostgresPlanRepository,
    PostgresUnitOfWork, PostgresUserRepository, ResendNotifier, StatusSweepScheduler, SystemClock,
};
use gym_membership::application::handlers::{
    RunStatusSweepHandler, SeedAdminCommand, SeedAdminHandler, SeedPlansHandler,
};
use gym_membership::config::{AppConfig, SeedConfig, ServerConfig};
use gym_membership::ports::Notifier;
use secrecy::ExposeSecret;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        port = config.server.port,
        "starting gym membership service"
    );

    let pool = config
        .database
        .pool_options()
        .connect_with(config.database.connect_options()?)
        .await?;
    tracing::info!("database pool created");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("migrations applied");
    }

    let notifier: Arc<dyn Notifier> = match ResendNotifier::from_config(&config.email)? {
        Some(resend) => {
            tracing::info!(from = %config.email.from_header(), "email delivery enabled");
            Arc::new(resend)
        }
        None => {
            tracing::info!("no email API key configured, notifications are logged only");
            Arc::new(LoggingNotifier::new())
        }
    };

    let state = AppState {
        uow: Arc::new(PostgresUnitOfWork::new(pool.clone())),
        reader: Arc::new(PostgresMembershipReader::new(pool.clone())),
        plans: Arc::new(PostgresPlanRepository::new(pool.clone())),
        checkins: Arc::new(PostgresCheckinRepository::new(pool.clone())),
        notifier,
        clock: Arc::new(SystemClock),
        session_validator: Arc::new(JwtSessionValidator::from_config(&config.auth)),
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        password_hasher: Arc::new(Argon2PasswordHasher::new()),
        token_issuer: Arc::new(JwtTokenIssuer::from_config(&config.auth)),
    };

    seed(&state, &config.seed).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = if config.scheduler.status_sweep_enabled {
        let scheduler = StatusSweepScheduler::from_config(
            Arc::new(RunStatusSweepHandler::new(
                state.uow.clone(),
                state.reader.clone(),
                state.clock.clone(),
            )),
            &config.scheduler,
        );
        Some(tokio::spawn(async move { scheduler.run(shutdown_rx).await }))
    } else {
        tracing::info!("background status sweep disabled");
        None
    };

    let app = app_router(state, &config.server);
    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The receiver may already be gone if the sweeper exited on its own.
    let _ = shutdown_tx.send(true);
    if let Some(handle) = sweeper {
        match tokio::time::timeout(config.server.shutdown_grace(), handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "status sweep task failed"),
            Err(_) => tracing::warn!("status sweep still running at shutdown, abandoning it"),
        }
    }

    pool.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}

/// Creates the configured admin and starter plans when missing.
async fn seed(state: &AppState, config: &SeedConfig) -> anyhow::Result<()> {
    if let Some((email, password)) = config.admin() {
        SeedAdminHandler::new(
            state.users.clone(),
            state.password_hasher.clone(),
            state.clock.clone(),
        )
        .handle(SeedAdminCommand {
            email: email.to_string(),
            password: password.expose_secret().clone(),
        })
        .await?;
    }
    if config.default_plans {
        let created = SeedPlansHandler::new(state.plans.clone(), state.clock.clone())
            .handle()
            .await?;
        tracing::info!(created, "starter plans checked");
    }
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins
/// over the configured level.
fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, starting graceful shutdown");
}

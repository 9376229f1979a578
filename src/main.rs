use grocer::infrastructure::{self, config::AppConfig, state::AppState};
use grocer::presentation;

use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::future::Future;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    run_with_signal(config).await
}

fn init_tracing() {
    // Ignore the error: tests may initialise more than once
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "grocer=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

async fn run_with_signal(config: AppConfig) -> anyhow::Result<()> {
    run(config, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown signal received");
    })
    .await
}

async fn run<F>(config: AppConfig, shutdown_signal: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (listener, app) = bootstrap(config).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await?;

    Ok(())
}

async fn bootstrap(config: AppConfig) -> anyhow::Result<(tokio::net::TcpListener, axum::Router)> {
    let pool = infrastructure::db::create_pool(&config.database_url, &config.db).await?;

    // Run migrations
    sqlx::migrate!().run(&pool).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = presentation::router::app(AppState::new(pool, config))?;

    tracing::debug!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    Ok((listener, app))
}

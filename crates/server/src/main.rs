use std::sync::Arc;

use db::DBService;
use server::{AppState, config::Config, routes};
use services::services::{photos::DbPhotoLookup, report::ReportService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let db = DBService::new(&config.database_url).await?;

    let reports = ReportService::new(Arc::new(DbPhotoLookup::new(db.pool.clone())));
    let state = AppState {
        db,
        phase_mode: config.phase_mode,
        reports,
    };

    let app = routes::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, phase_mode = %config.phase_mode, "sitelog server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

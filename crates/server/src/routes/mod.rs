use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub mod houses;
pub mod phases;
pub mod records;
pub mod stats;
pub mod workers;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(records::router())
        .merge(workers::router())
        .merge(houses::router())
        .merge(phases::router())
        .merge(stats::router());

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

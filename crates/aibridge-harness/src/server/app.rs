use crate::server::{routes, websocket};
use crate::state::HarnessState;
use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the Axum application
pub fn build_app(state: HarnessState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(state.config.port))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::bootstrap_page))
        .route("/health", get(routes::health))
        .route("/resource", get(routes::resource))
        .route("/message", post(routes::message))
        .route("/labels", get(routes::labels))
        .route("/model", put(routes::set_model).get(routes::get_model))
        .route("/metrics", get(routes::metrics))
        .route("/ws", get(websocket::websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Local origins of the harness itself. Set `AIBRIDGE_ALLOW_ANY_ORIGIN=1`
/// to open the harness to other browser tooling.
fn allowed_origins(port: u16) -> AllowOrigin {
    let allow_any = std::env::var("AIBRIDGE_ALLOW_ANY_ORIGIN")
        .is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    if allow_any {
        return AllowOrigin::any();
    }
    let origins = ["localhost", "127.0.0.1"]
        .iter()
        .filter_map(|host| HeaderValue::from_str(&format!("http://{host}:{port}")).ok())
        .collect::<Vec<_>>();
    AllowOrigin::list(origins)
}

/// Run the server
pub async fn run_server(state: HarnessState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = build_app(state);

    tracing::info!("Starting aibridge harness on {}", addr);
    tracing::info!("Open http://{} in your browser", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

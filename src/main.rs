use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use redis::Client as RedisClient;
use tower_http::cors::{AllowHeaders, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobboard_api::{config::Config, db, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let config = Arc::new(config);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let redis_client = RedisClient::open(config.redis_url.as_str())?;
    let redis_conn = redis_client.get_multiplexed_async_connection().await?;
    info!("Redis connected");

    let state = AppState {
        db: pool,
        redis: redis_conn,
        config: config.clone(),
    };

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_origin(Any);

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        // Auth
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh))
        .route("/auth/me", get(routes::auth::me))
        // Accounts
        .route(
            "/accounts",
            get(routes::accounts::list_accounts).post(routes::accounts::register),
        )
        .route(
            "/accounts/{id}",
            get(routes::accounts::get_account)
                .put(routes::accounts::update_account)
                .delete(routes::accounts::delete_account),
        )
        // Job offers
        .route("/jobs", get(routes::jobs::list_jobs).post(routes::jobs::create_job))
        .route("/jobs/my-offers", get(routes::jobs::my_offers))
        .route(
            "/jobs/{id}",
            get(routes::jobs::get_job)
                .put(routes::jobs::update_job)
                .delete(routes::jobs::delete_job),
        )
        .route("/jobs/{id}/publish", post(routes::jobs::publish_job))
        .route("/jobs/{id}/close", post(routes::jobs::close_job))
        // Applications
        .route(
            "/applications",
            get(routes::applications::list_applications).post(routes::applications::create_application),
        )
        .route("/applications/stats", get(routes::applications::dashboard_stats))
        .route(
            "/applications/{id}",
            get(routes::applications::get_application)
                .put(routes::applications::update_application)
                .delete(routes::applications::delete_application),
        )
        .route("/applications/{id}/review", post(routes::applications::review_application))
        .route("/applications/{id}/accept", post(routes::applications::accept_application))
        .route("/applications/{id}/reject", post(routes::applications::reject_application))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("jobboard API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

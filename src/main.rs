mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use axum::http::{header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE}, HeaderValue, Method};
use config::Config;
use db::DBClient;
use dotenv::dotenv;
use routes::create_router;
use service::{changefeed::ChangeFeed, leaderboard::LiveLeaderboard, signup::WaitlistBackend};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

#[derive(Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: DBClient,
    pub waitlist_backend: WaitlistBackend,
    pub leaderboard: LiveLeaderboard,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    let pool = match PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            println!("✅Connection to the database is successful!");
            pool
        }
        Err(err) => {
            println!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = sqlx::migrate!().run(&pool).await {
        println!("🔥 Failed to run database migrations: {:?}", err);
        std::process::exit(1);
    }

    let allowed_origins = vec![
        config.frontend_origin.parse::<HeaderValue>().unwrap(),
        "http://localhost:5173".parse::<HeaderValue>().unwrap(),
        "http://localhost:8000".parse::<HeaderValue>().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST]);

    let db_client = DBClient::new(pool.clone());

    let change_feed = ChangeFeed::new();
    {
        let feed = change_feed.clone();
        tokio::spawn(async move {
            if let Err(err) = feed.run(pool).await {
                tracing::error!("waitlist change listener exited: {}", err);
            }
        });
    }

    let leaderboard = LiveLeaderboard::start(db_client.clone(), &change_feed).await;
    let waitlist_backend = WaitlistBackend::from_config(&config);

    let app_state = AppState {
        env: config.clone(),
        db_client,
        waitlist_backend,
        leaderboard,
    };

    let app = create_router(Arc::new(app_state)).layer(cors);

    println!(
        "{}",
        format!("🚀 Server is running on http://localhost:{}", config.port)
    );

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}

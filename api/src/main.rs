use std::{net::SocketAddr, time::Duration};

use axum::{
    Router,
    http::{HeaderName, Method, header},
};
use diesel_async::{
    AsyncPgConnection,
    pooled_connection::{AsyncDieselConnectionManager, deadpool::Pool},
};
use dotenv::dotenv;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod comment;
mod config;
mod error;
mod identity;
mod json;
mod models;
mod schema;
mod store;

use comment::CommentHandler;
use config::{Env, ServerConfig};
use store::Stores;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Clone)]
pub struct App {
    stores: Stores,
    comments: CommentHandler,
}

impl App {
    fn new(stores: Stores) -> Self {
        App {
            comments: CommentHandler::new(&stores),
            stores,
        }
    }
}

fn init_tracing(env: Env) {
    let default_filter = match env {
        Env::Dev => "comments_api=debug,tower_http=debug",
        Env::Staging | Env::Production => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    let registry = tracing_subscriber::registry().with(filter);

    match env {
        Env::Production => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        Env::Dev | Env::Staging => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    match (&config.cors_allowed_origins, config.env) {
        (Some(origins), _) => CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins.clone()))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([
                header::CONTENT_TYPE,
                HeaderName::from_static(identity::TOKEN_HEADER),
            ])
            .allow_credentials(true),
        (None, Env::Dev) => CorsLayer::permissive(),
        // Same-origin only
        (None, _) => CorsLayer::new(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Could not listen for the shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();

    let env = Env::from_env();
    init_tracing(env);

    let config = ServerConfig::new_from_env(env);

    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
    let pool = Pool::builder(manager)
        .max_size(config.database_max_connections)
        .runtime(deadpool_runtime::Runtime::Tokio1)
        .wait_timeout(Some(Duration::from_secs(10)))
        .create_timeout(Some(Duration::from_secs(10)))
        .recycle_timeout(Some(Duration::from_secs(10)))
        .build()?;

    // fail fast on a bad DATABASE_URL instead of on the first request
    drop(pool.get().await?);

    let app = App::new(Stores::postgres(pool));

    let router = Router::new()
        .nest("/api/comments", comment::routes::route())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .with_state(app);

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

use anyhow::{Result, ensure};
use backend::{build_schema, router};
use schematic::{Config, ConfigLoader, validate::not_empty};
use serde::Serialize;
use services::VideoService;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Serialize, Config)]
#[config(env)]
struct AppConfig {
    #[setting(default = "0.0.0.0", env = "HOST")]
    host: String,
    #[setting(default = 5000, env = "PORT")]
    port: u16,
    #[setting(default = "/graphql", validate = not_empty, env = "GRAPHQL_ENDPOINT")]
    graphql_endpoint: String,
    #[setting(default = true, env = "GRAPHIQL")]
    graphiql: bool,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    #[cfg(debug_assertions)]
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,services=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    tracing::info!("Starting Videos GraphQL API");

    let config = ConfigLoader::<AppConfig>::new().load()?.config;
    ensure!(
        config.graphql_endpoint.starts_with('/'),
        "GRAPHQL_ENDPOINT must start with '/', got {:?}",
        config.graphql_endpoint
    );
    tracing::info!("Configuration loaded successfully");

    tracing::debug!("Initializing service");
    let service = VideoService::in_memory();
    let schema = build_schema(service);

    tracing::debug!("Creating API router");
    let app = router(schema, &config.graphql_endpoint, config.graphiql);

    tracing::debug!("Binding TCP listener");
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(
        "Listening on http://{}{}",
        listener.local_addr()?,
        config.graphql_endpoint
    );

    let server_result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    match &server_result {
        Ok(_) => tracing::info!("Server shutdown gracefully"),
        Err(e) => tracing::error!("Server error: {}", e),
    }

    server_result.map_err(Into::into)
}

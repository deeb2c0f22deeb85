//! Flashcard generation service

use notecards_api::api;
use notecards_api::config::AppConfig;
use notecards_api::core::assistant::TemplateResponseGenerator;
use notecards_api::core::services::{
    MyAdminService, MyAuthService, MyChatSessionService, MyFlashcardService,
    MyGenerationWorkflow, MyProfileService,
};
use notecards_api::infrastructure::database::DatabaseConnection;
use notecards_api::infrastructure::repositories::{
    DbAuthSessionRepository, DbChatSessionRepository, DbFlashcardRepository, DbProfileRepository,
};

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use di::{Injectable, ServiceCollection};
use di_axum::RouterServiceProviderExtensions;
use log::{info, warn};
use tokio::runtime::{Builder, Runtime};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

fn main() -> anyhow::Result<()> {
    // initialize tracing
    tracing_subscriber::fmt::init();

    let runtime: Runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(web_server_task(AppConfig::create()))
}

async fn web_server_task(config: AppConfig) -> anyhow::Result<()> {
    DatabaseConnection::migrate(&config.database_url).await?;

    let cors = cors_layer(&config.allowed_origins);
    let bind_address = config.bind_address.clone();

    let provider = ServiceCollection::new()
        .add(AppConfig::singleton())
        .add(DatabaseConnection::singleton())
        .add(TemplateResponseGenerator::singleton())
        .add(DbProfileRepository::scoped())
        .add(DbAuthSessionRepository::scoped())
        .add(DbChatSessionRepository::scoped())
        .add(DbFlashcardRepository::scoped())
        .add(MyAuthService::scoped())
        .add(MyProfileService::scoped())
        .add(MyChatSessionService::scoped())
        .add(MyFlashcardService::scoped())
        .add(MyGenerationWorkflow::scoped())
        .add(MyAdminService::scoped())
        .build_provider()?;

    let app = api::router()
        .layer(cors)
        .merge(api::functions::router())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_provider(provider);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    info!("Shutting down...");

    Ok(())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(AllowOrigin::list(origins))
}

use std::sync::Arc;

use salvo::Listener;
use salvo::conn::TcpListener;

use cocina_app::app::build_service;
use cocina_core::config::load_config;
use cocina_db::db::connection::create_pool;
use cocina_db::db::migrate::run_migrations;
use cocina_db::store::Store;
use cocina_db::store::memory::MemoryStore;
use cocina_db::store::pg::PgStore;
use cocina_service::media::{CloudinaryHost, MediaHost, UnconfiguredMediaHost};
use cocina_service::resource::accounts::ensure_bootstrap_admin;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting family recipes API");

    let config = load_config()?;

    tracing::info!(
        environment = ?config.environment,
        bind = %config.server.bind_address(),
        in_memory = config.database.is_in_memory(),
        "Configuration loaded"
    );

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let store: Arc<dyn Store> = if config.database.is_in_memory() {
        tracing::warn!("Using in-memory store; data will not survive a restart");
        Arc::new(MemoryStore::new())
    } else {
        run_migrations(&config.database.url).await?;
        let pool = create_pool(
            &config.database.url,
            u32::from(config.database.max_connections),
        )
        .await?;
        Arc::new(PgStore::new(pool))
    };

    let media_host: Arc<dyn MediaHost> = match config.media.cloudinary.clone() {
        Some(cloudinary) => Arc::new(CloudinaryHost::new(cloudinary)),
        None => {
            tracing::warn!("No media host configured; uploads will fail");
            Arc::new(UnconfiguredMediaHost)
        }
    };

    if let Some(admin) = &config.auth.bootstrap_admin {
        ensure_bootstrap_admin(
            store.as_ref(),
            &admin.email,
            &admin.password,
            admin.name.as_deref(),
        )
        .await?;
    }

    let bind_addr = config.server.bind_address();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;
    let service = build_service(config, store, media_host);

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(service).await;

    Ok(())
}

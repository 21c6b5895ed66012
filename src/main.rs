use std::net::SocketAddr;

use minister_connect::{
    config::{Config, LogFormat, StorageBackend},
    database::{
        pool::{create_pool, run_migrations},
        Stores,
    },
    routes::build_router,
    AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("minister_connect=info,tower_http=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let stores = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = create_pool(&config).await?;
            run_migrations(&pool).await?;
            info!("using postgres storage");
            Stores::postgres(pool)
        }
        StorageBackend::Memory => {
            info!("using in-memory storage; data is lost on restart");
            Stores::in_memory()
        }
    };

    let bootstrap = config.bootstrap_superadmin.clone();
    let addr: SocketAddr = config.server_address.parse()?;
    let state = AppState::new(config, stores);

    if let Some(account) = bootstrap {
        state.auth_service.ensure_superadmin(&account).await?;
    }

    let app = build_router(state);
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

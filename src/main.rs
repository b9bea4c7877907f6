use std::{sync::Arc, time::Duration};

use catalogd::{AppState, config::Config, db, reconcile, store::DbStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,catalogd=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = db::connect_and_migrate(&config.database_url).await?;
    let store = DbStore::new(db);

    if config.orphan_sweep_secs > 0 {
        tokio::spawn(reconcile::run(
            store.clone(),
            Duration::from_secs(config.orphan_sweep_secs),
            config.orphan_grace_secs,
        ));
    }

    let state = Arc::new(AppState { config: config.clone(), store });
    let app = catalogd::app(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

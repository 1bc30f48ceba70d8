use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

mod app;
mod config;
mod data;
mod db;
mod features;
mod handlers;
mod schema;
mod utils;

#[cfg(test)]
mod testing;

use config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;

    // Database configuration
    let pool = db::build_pool(&config.database_url, config.db_pool_size)
        .with_context(|| format!("Failed to create DB pool for {}", config.database_url))?;
    {
        let mut conn = pool.get().context("Failed to get DB connection")?;
        db::init_schema(&mut conn).context("Failed to initialise schema")?;
    }

    let bind_addr = config.bind_addr;
    let app = app::build_router(pool, Arc::new(config));

    // Start server
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    log::info!("Server running on http://{}", bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

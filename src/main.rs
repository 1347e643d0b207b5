//! Entry point for the salary engine binary.
//!
//! Running this binary starts the HTTP server.  A directory of
//! versioned rate-table JSON files may be supplied via the
//! `SALARY_RATE_DIR` environment variable; when unset the built-in
//! 2024 defaults apply.  The bind address comes from
//! `SALARY_BIND_ADDR` and defaults to 127.0.0.1:3000.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let rate_dir = std::env::var("SALARY_RATE_DIR").ok().map(PathBuf::from);
    let addr = std::env::var("SALARY_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    salary_engine::api::serve(&addr, rate_dir).await
}

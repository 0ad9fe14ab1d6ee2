//! Topup server entry point.
//!
//! ```text
//! topup-server [config.toml]
//! topup-server hash-password <password>
//! ```

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use topup_server::auth::hash_password;
use topup_server::{Server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // Prints a hash for the [auth] section and exits
    if args.get(1).map(String::as_str) == Some("hash-password") {
        let password = args
            .get(2)
            .ok_or_else(|| anyhow::anyhow!("usage: topup-server hash-password <password>"))?;
        println!("{}", hash_password(password)?);
        return Ok(());
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,topup=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Topup Server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_path = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "config/topup.toml".to_string());

    let server_config = if std::path::Path::new(&config_path).exists() {
        info!("Loading configuration from {}", config_path);
        ServerConfig::from_file(&config_path)?
    } else {
        info!("Using default configuration");
        ServerConfig::default()
    }
    .apply_env();

    let server = Server::from_config(server_config)?;
    server.start().await?;

    Ok(())
}

use contact_store::config::ServerConfig;
use contact_store::server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before reading RUST_LOG or any config var
    match dotenvy::dotenv() {
        Err(e) if !e.not_found() => eprintln!("Warning: could not load .env: {e}"),
        _ => {}
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    eprintln!("📬 Contact Store v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Database: {}", config.store.describe());
    eprintln!("   API: http://{}\n", config.socket_addr());

    server::run(config).await?;

    Ok(())
}

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "unshade-server")]
#[command(version, about = "Gradient removal API server", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, value_name = "ADDR", default_value = "0.0.0.0:5001")]
    listen: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    tracing::info!(addr = %cli.listen, "starting gradient removal API server");

    axum::serve(listener, unshade_server::build_router()).await?;
    Ok(())
}

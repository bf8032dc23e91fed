use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use simple_oauth2_testing::mock_idp::MockIdpServer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Mock OIDC identity provider serving the simple-oauth2 test fixtures
#[derive(Parser, Debug)]
#[command(name = "mock-idp")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "127.0.0.1", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3001", env = "PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mock_idp=debug,simple_oauth2_testing=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    MockIdpServer::new(addr).run().await?;

    tracing::info!("Mock IdP stopped");
    Ok(())
}

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use api::{serve, util};
use gemini::models::Models;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let secrets = util::load_env()?;
    let api_key = secrets
        .get("GEMINI_API_KEY")
        .and_then(|v| v.as_str())
        .context("GEMINI_API_KEY is not defined in Secrets.toml")?;

    let model = Models::new(api_key)?;
    let staging_dir = util::workspace_dir()?.join("uploads");

    let router = serve(Arc::new(model), staging_dir).await?;

    let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 3000));
    let listener = TcpListener::bind(&address).await?;
    Ok(axum::serve(listener, router).await?)
}

//! Example: signing in to the console API and making authenticated calls
//!
//! Configuration comes from `DEVCONSOLE_*` environment variables, a `.env`
//! file, or a `devconsole.toml` next to the working directory.
//!
//! # Usage
//!
//! ```bash
//! export DEVCONSOLE_API_BASE_URL=http://localhost:8000/api/v1
//! export DEVCONSOLE_USERNAME=admin
//! export DEVCONSOLE_PASSWORD=...
//! cargo run -p devconsole-infra --example console_session
//! ```
//!
//! Expired access tokens are renewed transparently; if the refresh token is
//! rejected too, the session ends and a redirect to the login route is
//! published.

use anyhow::Context;
use devconsole_infra::{config, init_tracing, ApiClient, NavigationEvent, NotFoundAsNone};
use serde_json::Value;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load().context("loading configuration")?;
    init_tracing(&config.logging)?;

    let client = ApiClient::from_config(&config)?;

    if let Some(mut navigation) = client.subscribe_navigation() {
        tokio::spawn(async move {
            while let Ok(NavigationEvent::Redirect { route }) = navigation.recv().await {
                tracing::warn!(%route, "session ended; user must sign in again");
            }
        });
    }

    if !client.is_authenticated().await? {
        let username = std::env::var("DEVCONSOLE_USERNAME").context("DEVCONSOLE_USERNAME not set")?;
        let password = std::env::var("DEVCONSOLE_PASSWORD").context("DEVCONSOLE_PASSWORD not set")?;
        client.login(&username, &password).await.context("login failed")?;
    }

    let user = client.current_user().await?;
    tracing::info!(username = %user.username, admin = user.is_admin, "signed in");

    let devices = client.get::<Value>("/devices").await.not_found_as_none()?;
    match devices {
        Some(devices) => tracing::info!(%devices, "devices"),
        None => tracing::info!("device endpoint not available on this server"),
    }

    Ok(())
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use powergate::api::{ApiServer, ApiState};
use powergate::{Fleet, FleetConfig, ServerConfig, TotpVerifier};

/// powergate - TOTP-gated power control for a fleet of smart plugs
#[derive(Parser)]
#[command(name = "powergate", version, about)]
struct Cli {
    /// Host to listen on
    #[arg(long, env = "WG_HOST", default_value = ServerConfig::DEFAULT_HOST)]
    host: String,

    /// Port to listen on
    #[arg(long, env = "WG_PORT", default_value_t = ServerConfig::DEFAULT_PORT)]
    port: u16,

    /// Path to the JSON fleet inventory
    #[arg(long, env = "FLEET_CONFIG", default_value = "fleet.json")]
    fleet: PathBuf,

    /// Base32 TOTP secret guarding /submit
    #[arg(long, env = "TOTP_SECRET", hide_env_values = true)]
    totp_secret: String,

    /// Adjacent 30 s steps also accepted on each side
    #[arg(long, env = "TOTP_SKEW", default_value_t = 0)]
    totp_skew: u8,

    /// Front-end origin allowed during local development
    #[arg(long, env = "LOCAL_DEVELOPMENT_FRONTEND_URL")]
    dev_frontend_url: Option<String>,

    /// Production front-end origin
    #[arg(long, env = "PROD_FRONTEND_URL")]
    frontend_url: Option<String>,

    /// Per-device deadline for queries and commands, in milliseconds
    #[arg(long, env = "DEVICE_TIMEOUT_MS")]
    device_timeout_ms: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,powergate=info",
        1 => "info,powergate=debug,tower_http=debug",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let inventory = FleetConfig::load(&cli.fleet)
        .await
        .with_context(|| format!("loading fleet inventory from {}", cli.fleet.display()))?;

    let device_timeout = cli.device_timeout_ms.map(Duration::from_millis);
    let fleet = Fleet::from_config(&inventory, device_timeout).context("building fleet")?;

    let verifier = TotpVerifier::new(&cli.totp_secret, cli.totp_skew).context("TOTP_SECRET")?;

    let mut config = ServerConfig::new().with_host(cli.host).with_port(cli.port);
    for origin in [cli.dev_frontend_url, cli.frontend_url].into_iter().flatten() {
        config = config.with_allowed_origin(origin);
    }

    let state = ApiState::new(fleet, Arc::new(verifier));
    ApiServer::new(state, config)
        .run_until(shutdown_signal())
        .await?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, process::ExitCode, time::Duration};

use axum_server::Handle;
use jiaxun_server::{
    api::{auth::seed_bootstrap_account, router},
    config::AppConfig,
    logging::init_logging,
    state::AppState,
    storage::UserRepository,
};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> ExitCode {
    // Logging is not up yet, so configuration errors go to stderr
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(config.log_format);
    for warning in config.warnings() {
        tracing::warn!("{warning}");
    }

    let state = AppState::new(UserRepository::new(), &config.signing_key);

    if let Some(account) = &config.bootstrap {
        match seed_bootstrap_account(&state, account).await {
            Ok(user) => tracing::info!(
                user_id = user.id,
                username = %user.username,
                "Seeded bootstrap teacher account"
            ),
            Err(e) => {
                tracing::error!(error = %e.message, "Failed to seed bootstrap account");
                return ExitCode::FAILURE;
            }
        }
    }

    let app = router(state);

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(host = %config.host, port = config.port, error = %e, "Invalid bind address");
            return ExitCode::FAILURE;
        }
    };

    let handle: Handle<SocketAddr> = Handle::new();
    tokio::spawn(shutdown_on_ctrl_c(handle.clone()));

    tracing::info!(%addr, "Jiaxun server listening (docs at /docs)");

    if let Err(e) = axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await
    {
        tracing::error!(error = %e, "HTTP server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("Server stopped");
    ExitCode::SUCCESS
}

async fn shutdown_on_ctrl_c(handle: Handle<SocketAddr>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}

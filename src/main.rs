//! vsmtpd - Entry Point
//!
//! Usage: `vsmtpd [CONFIG_FILE]`. Without an argument, `vsmtpd.toml` in the
//! working directory is read if present.

use log::{error, info};
use std::path::Path;
use std::sync::Arc;

use vsmtpd::resolver::{DnsResolver, HostnameResolver, NoReverseDns};
use vsmtpd::utils::setup_logging;
use vsmtpd::{Server, ServerConfig, ServerContext};

#[tokio::main]
async fn main() {
    let loaded = match std::env::args().nth(1) {
        Some(path) => ServerConfig::load_from(Path::new(&path)),
        None => ServerConfig::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    setup_logging(&config.log_level);
    info!("Launching vsmtpd...");

    let resolver: Arc<dyn HostnameResolver> = if config.resolve_hostnames {
        Arc::new(DnsResolver::from_system_conf())
    } else {
        Arc::new(NoReverseDns)
    };

    let context = ServerContext::from_config(&config);
    let server = match Server::bind(&config, context, resolver).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            std::process::exit(1);
        }
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Unable to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    };
    server.run_until(shutdown).await;
}

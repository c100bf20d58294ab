//! Sectional server binary.
//!
//! ```bash
//! sectional serve --config config.toml --port 8080
//! ```
//!
//! See `sectional --help` for all available commands and options.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use sectional_core::config::SectionalConfig;
use sectional_core::http::{build_router, HttpServer, Namespace};
use sectional_core::logging;

#[derive(Parser)]
#[command(name = "sectional", about = "Dynamic content-schema engine", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the REST server
    Serve {
        /// Path to a TOML config file
        #[arg(long, default_value = "config.toml")]
        config: PathBuf,

        /// Override the listening port
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { config, port } => serve(&config, port),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn serve(config_path: &PathBuf, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = SectionalConfig::load_from(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;

    logging::init(&config.logging);
    log::info!("namespaces: {}", config.engine.namespaces.join(", "));
    if config.auth.admin_token.is_none() {
        log::warn!("no admin token configured; mutating routes are open");
    }

    let namespaces: Vec<_> =
        config.engine.namespaces.iter().map(|p| Arc::new(Namespace::new(p))).collect();
    let router = build_router(namespaces, config.auth.clone());
    let server = HttpServer::new(router, config.server.max_body_size);
    let addr = config.server.socket_addr()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(server.serve(addr))
}

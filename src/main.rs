// Main entry point for cutout-server.
// Parses configuration, prepares directories, builds the background
// remover and the Axum router, then serves until Ctrl-C / SIGTERM.

mod bootstrap;
mod config;
mod remover;
mod shutdown_signal;
mod web;

use clap::Parser;
use config::AppConfig;
use shutdown_signal::shutdown_signal;
use web::AppState;

#[tokio::main]
async fn main() {
    // Parse command line args and environment variables
    let config = AppConfig::parse();

    // Initialize tracing subscriber for structured logging.
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_target(true) // Include module path in logs
        .with_file(true) // Include source file name
        .with_line_number(true) // Include line numbers
        .init();

    tracing::info!("Starting cutout-server...");

    if let Err(e) = bootstrap::ensure_directories(&[&config.static_dir, &config.templates_dir]) {
        tracing::error!("FATAL: Failed to create directories: {}", e);
        eprintln!("FATAL: Could not create static/templates directories. Error: {}. Exiting.", e);
        std::process::exit(1);
    }

    let state = AppState {
        remover: remover::default_remover(config.model_path()),
        max_upload_bytes: config.max_upload_bytes,
        templates_dir: config.templates_dir.clone(),
    };
    tracing::info!(
        "Maximum upload size: {} bytes",
        config.max_upload_bytes
    );

    let app = web::create_app(state, &config.static_dir);

    tracing::info!("Axum router configured.");

    // --- Start HTTP Server ---
    let listener = match web::create_listener(&config.host, config.port).await {
        Ok((addr, l)) => {
            tracing::info!("Server successfully bound. Listening on {}", addr);
            l
        }
        Err(e) => {
            tracing::error!("FATAL: Failed to bind server: {}", e);
            eprintln!("FATAL: Could not bind server. Error: {}. Exiting.", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server run error: {}", e);
        eprintln!("ERROR: Server shut down unexpectedly. Error: {}", e);
    }

    tracing::info!("cutout-server has shut down.");
}

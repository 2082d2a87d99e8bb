//! Devices API - Entry Point
//!
//! Serves device records over HTTP.

use std::collections::HashMap;
use std::env;

use devices_api::app::options::AppOptions;
use devices_api::app::run::run;
use devices_api::filesys::file::File;
use devices_api::logs::{init_logging, LogOptions};
use devices_api::storage::layout::StorageLayout;
use devices_api::storage::settings::Settings;
use devices_api::utils::version_info;

use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    let version = version_info();
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to render version: {e}"),
        }
        return;
    }

    // Settings file lives at the root of the storage layout
    let (layout, settings_file) = match cli_args.get("config") {
        Some(path) => {
            let file = File::new(path);
            let base_dir = file
                .path()
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            (StorageLayout::new(base_dir), file)
        }
        None => {
            let layout = StorageLayout::default();
            let file = layout.settings_file();
            (layout, file)
        }
    };

    let mut settings = match Settings::load(&settings_file).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    if let Err(e) = settings.apply_overrides(&cli_args) {
        eprintln!("{e}");
        return;
    }

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        json_format: settings.log_json,
        log_dir: settings.log_dir.as_ref().map(|dir| layout.resolve(dir)),
        ..Default::default()
    };
    if let Err(e) = init_logging(log_options) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let options = AppOptions::from_settings(&settings, &layout);

    info!(version = %version.version, "Running devices API with options: {:?}", options);
    if let Err(e) = run(options, await_shutdown_signal()).await {
        error!("Devices API stopped with error: {e}");
        std::process::exit(1);
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                _ => {
                    error!("Unable to install signal handlers, falling back to Ctrl+C");
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Ctrl+C received, shutting down...");
    }
}

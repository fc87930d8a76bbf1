use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::RwLock;

use relvis::load::DocumentSource;
use relvis::server::{self, SharedPipelines};
use relvis::watch;
use relvis::Config;

#[derive(Parser, Debug)]
#[command(name = "relvis")]
#[command(about = "Serve relation graph and route map visualization models")]
struct Args {
    /// Rebuild models when input documents change on disk
    #[arg(long)]
    watch: bool,

    /// Override the configured server port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();

    let mut config = Config::load()?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    log::info!("Configuration loaded successfully");
    log::info!("Data directory: {}", config.data_dir().display());

    let pipelines = server::build_pipelines(&config).await;
    let state: SharedPipelines = Arc::new(RwLock::new(pipelines));

    if args.watch {
        spawn_watcher(&config, state.clone());
    }

    server::run(&config, state).await?;

    Ok(())
}

/// Start the data-directory watcher plus the reload task that swaps rebuilt
/// pipeline state in behind the running server.
fn spawn_watcher(config: &Config, state: SharedPipelines) {
    let data_dir = config.data_dir().to_path_buf();
    let debounce_ms = config.watch.debounce_ms;

    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        log::info!("Watching {} for changes", data_dir.display());
        if let Err(e) = watch::run_watcher(&data_dir, debounce_ms, tx) {
            log::error!("Watcher stopped: {}", e);
        }
    });

    // Bridge the blocking channel into the async reload task.
    let (async_tx, mut async_rx) = tokio::sync::mpsc::unbounded_channel();
    std::thread::spawn(move || {
        while let Ok(path) = rx.recv() {
            if async_tx.send(path).is_err() {
                break;
            }
        }
    });

    let config = config.clone();
    tokio::spawn(async move {
        while let Some(path) = async_rx.recv().await {
            reload_changed(&config, &state, &path).await;
        }
    });
}

/// Rebuild whichever pipelines the changed path belongs to. Remote inputs
/// are never reloaded by the watcher.
async fn reload_changed(config: &Config, state: &SharedPipelines, changed: &Path) {
    if is_local_input(&config.graph_source(), changed) {
        log::info!("Reloading relation graph after change to {}", changed.display());
        let rebuilt = server::build_relation_graph(&config.graph_source()).await;
        state.write().await.graph = rebuilt;
    }
    if is_local_input(&config.entities_source(), changed) {
        log::info!("Reloading entity graph after change to {}", changed.display());
        let rebuilt = server::build_entities(&config.entities_source()).await;
        state.write().await.entities = rebuilt;
    }
    if is_local_input(&config.routes_source(), changed) {
        log::info!("Reloading route map after change to {}", changed.display());
        let rebuilt = server::build_routes(&config.routes_source()).await;
        state.write().await.routes = rebuilt;
    }
}

fn is_local_input(source: &DocumentSource, changed: &Path) -> bool {
    match source {
        DocumentSource::File(path) => watch::touches_input(changed, path),
        DocumentSource::Remote(_) => false,
    }
}

use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Notify;

mod config;
mod handler;
mod http;
mod logger;
mod server;
mod wiki;

#[derive(Parser)]
#[command(name = "wikid")]
#[command(about = "Flat-file wiki server")]
struct Cli {
    /// Config file path without extension (`config` loads `config.toml`)
    #[arg(default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = config::Config::load_from(&cli.config)?;
    logger::init(&cfg)?;

    // Create Tokio runtime, sized by the workers setting when present
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    // Templates and content directory must be usable before anything is served
    let templates = wiki::Templates::load_dir(Path::new(&cfg.wiki.template_dir))?;
    let store = wiki::PageStore::open(&cfg.wiki.content_dir).map_err(|e| {
        format!(
            "cannot open content directory '{}': {e}",
            cfg.wiki.content_dir
        )
    })?;

    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)
        .map_err(|e| format!("cannot bind {addr}: {e}"))?;

    logger::log_server_start(&addr, &cfg, store.root());

    let state = Arc::new(config::AppState::new(
        &cfg,
        wiki::Wiki::new(store, templates),
    ));

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    server::start_server_loop(listener, state, shutdown).await;
    logger::log_info("Server stopped");
    Ok(())
}

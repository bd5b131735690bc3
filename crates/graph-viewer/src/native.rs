use crate::{StartupOptions, create_app};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "graph-viewer")]
#[command(about = "Interactive knowledge graph layout viewer")]
struct Args {
    /// Graph snapshot to open (JSON with `nodes` and `edges`)
    graph: Option<PathBuf>,

    /// Engine configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Saved viewer settings to restore
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Layout seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

impl From<Args> for StartupOptions {
    fn from(args: Args) -> Self {
        Self {
            graph: args.graph,
            config: args.config,
            settings: args.settings,
            seed: args.seed,
        }
    }
}

/// Entry point used by the native executable.
pub fn run() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = StartupOptions::from(Args::parse());
    tracing::info!(?options, "starting viewer");

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Knowledge Graph Viewer",
        native_options,
        Box::new(move |cc| Ok(Box::new(create_app(cc, &options)))),
    )
}

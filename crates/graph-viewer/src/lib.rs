mod actions;
mod app;
mod cache;
mod effects;
mod error;
mod graph_view;
mod settings;
mod state;
mod stats_view;
mod store;
mod versioned;

pub mod native;

pub use app::ViewerApp;
pub use error::ViewerError;
pub use settings::ViewerSettings;

use graph_engine::{EngineConfig, KnowledgeGraph};
use state::State;
use std::path::PathBuf;
use store::Store;

/// What the viewer starts with.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    pub graph: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub settings: Option<PathBuf>,
    pub seed: u64,
}

fn load_config(options: &StartupOptions) -> EngineConfig {
    let Some(path) = &options.config else {
        return EngineConfig::default();
    };
    match EngineConfig::from_path(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "using default configuration"
            );
            EngineConfig::default()
        }
    }
}

/// Build the initial store: configuration first, then the graph and
/// saved settings. Load failures are shown in the error dialog.
fn initial_store(options: &StartupOptions) -> Store {
    let mut store = Store::new(load_config(options), options.seed);

    match &options.graph {
        Some(path) => {
            if let Err(e) = store.load_graph(path) {
                tracing::warn!(path = %path.display(), error = %e, "graph not loaded");
                store.error_message = Some(e.to_string());
            }
        }
        None => store.set_graph(KnowledgeGraph::default()),
    }

    if let Some(path) = &options.settings
        && let Err(e) = store.load_settings(path)
    {
        tracing::warn!(path = %path.display(), error = %e, "settings not loaded");
        store.error_message = Some(e.to_string());
    }

    store.controller.start();
    store
}

pub fn create_app(
    _cc: &eframe::CreationContext<'_>,
    options: &StartupOptions,
) -> ViewerApp {
    ViewerApp::new(State::new(initial_store(options)))
}

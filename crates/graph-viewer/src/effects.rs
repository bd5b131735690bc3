use crate::store::Store;
use std::path::PathBuf;

/// Deferred effects that must run outside the main reducer (file IO)
#[derive(Debug, Clone)]
pub enum Effect {
    LoadGraph { path: PathBuf },
    SaveSettings { path: PathBuf },
    LoadSettings { path: PathBuf },
}

/// Execute a single effect against the store
pub fn run(store: &mut Store, effect: Effect) {
    let result = match &effect {
        Effect::LoadGraph { path } => store.load_graph(path),
        Effect::SaveSettings { path } => store.save_settings(path),
        Effect::LoadSettings { path } => store.load_settings(path),
    };
    if let Err(e) = result {
        tracing::warn!(?effect, error = %e, "effect failed");
        store.error_message = Some(e.to_string());
    }
}

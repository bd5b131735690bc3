// Viewer settings - the user-facing knobs that can be saved and restored

use crate::error::ViewerError;
use graph_engine::{FilterCriteria, LayoutMode, ViewTransform};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub criteria: FilterCriteria,
    pub mode: LayoutMode,
    pub seed: u64,
    pub view: ViewTransform,
    pub show_labels: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            mode: LayoutMode::default(),
            seed: 0,
            view: ViewTransform::default(),
            show_labels: true,
        }
    }
}

impl ViewerSettings {
    pub fn save(&self, path: &Path) -> Result<(), ViewerError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ViewerError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let json = std::fs::read_to_string(path).map_err(|source| {
            ViewerError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

use crate::effects::Effect;
use crate::store::Store;
use graph_engine::{FilterCriteria, LayoutMode, Point, ViewTransform};
use std::path::PathBuf;
use std::time::Instant;

/// Actions that can be dispatched to modify the viewer state
#[derive(Debug, Clone)]
pub enum Action {
    // Files
    OpenGraph { path: PathBuf },
    SaveSettings { path: PathBuf },
    LoadSettings { path: PathBuf },

    // Filtering and layout
    /// New criteria from the filter panel; applied after the debounce
    EditCriteria { criteria: FilterCriteria },
    SetMode { mode: LayoutMode },
    Reseed { seed: u64 },

    // Simulation clock
    Play,
    Pause,
    Step,

    // View
    Zoom { delta: f32 },
    Pan { delta: Point },
    ResetView,
    SetShowLabels { show: bool },

    ClearErrorMessage,
}

/// Apply a single action to the store
pub fn update(store: &mut Store, action: Action, now: Instant) -> Vec<Effect> {
    match action {
        Action::OpenGraph { path } => vec![Effect::LoadGraph { path }],
        Action::SaveSettings { path } => vec![Effect::SaveSettings { path }],
        Action::LoadSettings { path } => vec![Effect::LoadSettings { path }],

        Action::EditCriteria { criteria } => {
            store.edit_criteria(criteria, now);
            vec![]
        }
        Action::SetMode { mode } => {
            store.set_mode(mode);
            vec![]
        }
        Action::Reseed { seed } => {
            store.set_seed(seed);
            vec![]
        }

        Action::Play => {
            store.controller.start();
            vec![]
        }
        Action::Pause => {
            store.controller.stop();
            vec![]
        }
        Action::Step => {
            store.controller.step_once();
            vec![]
        }

        Action::Zoom { delta } => {
            store.view.zoom_by(delta);
            vec![]
        }
        Action::Pan { delta } => {
            store.view.pan_by(delta);
            vec![]
        }
        Action::ResetView => {
            store.view = ViewTransform::default();
            vec![]
        }
        Action::SetShowLabels { show } => {
            store.show_labels = show;
            vec![]
        }

        Action::ClearErrorMessage => {
            store.error_message = None;
            vec![]
        }
    }
}

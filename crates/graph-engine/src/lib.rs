pub mod config;
pub mod controller;
pub mod debounce;
pub mod filter;
pub mod hyperedge;
pub mod integrator;
pub mod ix_map;
pub mod kind_set;
pub mod layout;
pub mod model;
pub mod stats;
pub mod view;

pub use config::{
    Canvas, ConfigError, EngineConfig, IntegratorConfig, LayoutConfig,
};
pub use controller::{
    FrameLoop, SimulationController, SimulationStatus, TickToken,
};
pub use debounce::Debouncer;
pub use filter::{FilterCriteria, VisibleGraph, filter};
pub use hyperedge::{CURVE_OFFSET, curve_points, sample_curve};
pub use integrator::{Body, SimulationState, step};
pub use ix_map::IxMap;
pub use kind_set::{EdgeKindSet, KindSet, NodeKindSet};
pub use layout::{LayoutError, LayoutMode, Positions, layout};
pub use model::{Edge, EdgeKind, KnowledgeGraph, Node, NodeId, NodeKind, Point};
pub use stats::{
    ConfidenceStats, Flagged, Quartiles, detect_outliers, percentile,
    significant_changes,
};
pub use view::{ViewTransform, apply_zoom};

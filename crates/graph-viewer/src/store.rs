use crate::error::ViewerError;
use crate::settings::ViewerSettings;
use crate::versioned::Versioned;
use graph_engine::{
    ConfidenceStats, Debouncer, EngineConfig, FilterCriteria, FrameLoop,
    KnowledgeGraph, LayoutMode, SimulationController, ViewTransform,
    detect_outliers, significant_changes,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Confidence figures for one set of nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceSummary {
    pub stats: ConfidenceStats,
    pub outliers: usize,
    /// Standard deviations used for `significant`.
    pub sigmas: f64,
    pub significant: usize,
}

impl ConfidenceSummary {
    pub fn from_values(values: &[f64], sigmas: f64) -> Option<Self> {
        let stats = ConfidenceStats::from_values(values)?;
        let outliers =
            detect_outliers(values).iter().filter(|f| f.flagged).count();
        let significant = significant_changes(values, sigmas)
            .iter()
            .filter(|f| f.flagged)
            .count();
        Some(Self {
            stats,
            outliers,
            sigmas,
            significant,
        })
    }
}

pub struct Store {
    /// Graph as loaded, before filtering.
    pub graph: Versioned<KnowledgeGraph>,
    /// Criteria as edited in the UI. The controller sees them only after
    /// the debounce delay.
    pub criteria: FilterCriteria,
    pending_criteria: Debouncer<FilterCriteria>,
    pub controller: SimulationController,
    pub frame_loop: FrameLoop,
    /// Bumped whenever the controller recomputes its visible subgraph.
    visible_version: u64,
    pub view: ViewTransform,
    pub show_labels: bool,
    pub source: Option<PathBuf>,
    pub error_message: Option<String>,
}

impl Store {
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        Self {
            graph: Versioned::new(KnowledgeGraph::default()),
            criteria: FilterCriteria::default(),
            pending_criteria: Debouncer::new(config.filter_debounce()),
            controller: SimulationController::new(config, seed),
            frame_loop: FrameLoop::new(),
            visible_version: 0,
            view: ViewTransform::default(),
            show_labels: true,
            source: None,
            error_message: None,
        }
    }

    pub fn visible_version(&self) -> u64 {
        self.visible_version
    }

    // ------------------------------------------------------------------
    // Graph

    pub fn set_graph(&mut self, graph: KnowledgeGraph) {
        tracing::info!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "graph loaded"
        );
        self.controller.set_graph(graph.clone());
        self.graph.set(graph);
        self.visible_version += 1;
    }

    pub fn load_graph(&mut self, path: &Path) -> Result<(), ViewerError> {
        let graph = KnowledgeGraph::from_path(path)?;
        self.set_graph(graph);
        self.source = Some(path.to_path_buf());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Filtering and layout

    /// Record an edit; it reaches the controller once edits pause.
    pub fn edit_criteria(&mut self, criteria: FilterCriteria, now: Instant) {
        self.criteria = criteria.clone();
        self.pending_criteria.push(criteria, now);
    }

    /// Hand settled criteria to the controller. Returns how long until
    /// the next pending edit settles, if any.
    pub fn apply_pending_criteria(&mut self, now: Instant) -> Option<Duration> {
        if let Some(criteria) = self.pending_criteria.poll(now) {
            tracing::debug!(threshold = criteria.threshold, "criteria applied");
            self.controller.set_criteria(criteria);
            self.visible_version += 1;
        }
        self.pending_criteria.remaining(now)
    }

    pub fn set_mode(&mut self, mode: LayoutMode) {
        self.controller.set_mode(mode);
        self.visible_version += 1;
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.controller.set_seed(seed);
        self.visible_version += 1;
    }

    // ------------------------------------------------------------------
    // Settings

    pub fn settings(&self) -> ViewerSettings {
        ViewerSettings {
            criteria: self.criteria.clone(),
            mode: self.controller.mode(),
            seed: self.controller.seed(),
            view: self.view,
            show_labels: self.show_labels,
        }
    }

    /// Apply saved settings at once, bypassing the debounce.
    pub fn apply_settings(&mut self, settings: ViewerSettings) {
        self.criteria = settings.criteria.clone();
        self.pending_criteria = Debouncer::new(
            self.controller.config().filter_debounce(),
        );
        self.controller.set_criteria(settings.criteria);
        self.controller.set_mode(settings.mode);
        if settings.seed != self.controller.seed() {
            self.controller.set_seed(settings.seed);
        }
        self.view = settings.view.clamped();
        self.show_labels = settings.show_labels;
        self.visible_version += 1;
    }

    pub fn save_settings(&self, path: &Path) -> Result<(), ViewerError> {
        self.settings().save(path)
    }

    pub fn load_settings(&mut self, path: &Path) -> Result<(), ViewerError> {
        let settings = ViewerSettings::load(path)?;
        self.apply_settings(settings);
        Ok(())
    }

    /// Stop the simulation before the window goes away.
    pub fn shutdown(&mut self) {
        tracing::info!(ticks = self.controller.ticks(), "viewer shutting down");
        self.controller.stop();
    }

    // ------------------------------------------------------------------
    // Derived data (cached in `Cache`)

    pub fn graph_summary_uncached(&self) -> Option<ConfidenceSummary> {
        ConfidenceSummary::from_values(
            &self.graph.get().confidences(),
            self.criteria.significance_threshold,
        )
    }

    pub fn visible_summary_uncached(&self) -> Option<ConfidenceSummary> {
        let confidences: Vec<f64> = self
            .controller
            .visible()
            .nodes
            .iter()
            .map(|n| n.confidence)
            .collect();
        ConfidenceSummary::from_values(
            &confidences,
            self.criteria.significance_threshold,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_engine::{Node, NodeKind, Point, SimulationStatus};

    fn store_with_graph() -> Store {
        let mut store = Store::new(EngineConfig::default(), 1);
        store.set_graph(KnowledgeGraph::new(
            vec![
                Node::new("a", "Alpha", NodeKind::Input, 0.9),
                Node::new("b", "Beta", NodeKind::Output, 0.2),
            ],
            vec![],
        ));
        store
    }

    #[test]
    fn test_criteria_wait_for_debounce() {
        let mut store = store_with_graph();
        let t0 = Instant::now();

        store.edit_criteria(FilterCriteria::default().with_threshold(0.5), t0);
        let remaining =
            store.apply_pending_criteria(t0 + Duration::from_millis(100));
        assert_eq!(remaining, Some(Duration::from_millis(150)));
        assert_eq!(store.controller.visible().nodes.len(), 2);

        let remaining =
            store.apply_pending_criteria(t0 + Duration::from_millis(250));
        assert_eq!(remaining, None);
        assert_eq!(store.controller.visible().nodes.len(), 1);
    }

    #[test]
    fn test_summary_counts_flags() {
        let mut values = vec![0.5; 9];
        values.push(0.99);

        let summary = ConfidenceSummary::from_values(&values, 2.0).unwrap();
        assert_eq!(summary.outliers, 1);
        assert_eq!(summary.significant, 1);

        // mean 0.549, σ 0.147: every value is at least σ/3 away
        let loose = ConfidenceSummary::from_values(&values, 0.1).unwrap();
        assert_eq!(loose.significant, 10);
        assert!(ConfidenceSummary::from_values(&[], 2.0).is_none());
    }

    #[test]
    fn test_settings_apply_immediately() {
        let mut store = store_with_graph();
        let settings = ViewerSettings {
            criteria: FilterCriteria::default().with_threshold(0.5),
            mode: LayoutMode::Hierarchical,
            seed: 9,
            show_labels: false,
            ..ViewerSettings::default()
        };

        store.apply_settings(settings.clone());

        assert_eq!(store.controller.visible().nodes.len(), 1);
        assert_eq!(store.controller.mode(), LayoutMode::Hierarchical);
        assert_eq!(store.settings(), settings);
    }

    #[test]
    fn test_loaded_view_is_clamped() {
        let mut store = store_with_graph();
        let settings: ViewerSettings = serde_json::from_str(
            r#"{"view": {"scale": 0.0, "translation": {"x": 3.0, "y": 4.0}}}"#,
        )
        .unwrap();

        store.apply_settings(settings);

        assert_eq!(store.view.scale, graph_engine::view::MIN_SCALE);
        let back = store.view.invert(store.view.apply(Point::new(10.0, 20.0)));
        assert!(back.x.is_finite() && back.y.is_finite());
        assert!(back.distance(Point::new(10.0, 20.0)) < 1e-3);
    }

    #[test]
    fn test_shutdown_stops_running_simulation() {
        let mut store = store_with_graph();
        let token = store.controller.start();
        assert!(store.controller.is_running());

        store.shutdown();

        assert_eq!(store.controller.status(), SimulationStatus::Stopped);
        assert!(!store.controller.tick(token));
    }
}

//! Simulation controller: owns the animated state and the clock that
//! drives it.
//!
//! Ticks are cancelled through a generation counter rather than a flag.
//! `start` hands out a [`TickToken`] stamped with the current generation
//! and `stop` bumps the generation, so a tick scheduled before the stop
//! can never run after it, however late it arrives.

use crate::config::EngineConfig;
use crate::filter::{FilterCriteria, VisibleGraph, filter};
use crate::integrator::{Body, SimulationState, step};
use crate::layout::{LayoutError, LayoutMode, layout, random_point};
use crate::model::KnowledgeGraph;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};

/// Nominal frame time handed to the integrator.
pub const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationStatus {
    Idle,
    Running,
    Stopped,
}

/// Permission to run one tick, valid until the next `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken {
    generation: u64,
}

impl TickToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct SimulationController {
    config: EngineConfig,
    graph: KnowledgeGraph,
    criteria: FilterCriteria,
    mode: LayoutMode,
    seed: u64,
    // Start positions for bodies entering the visible set
    spawn_rng: StdRng,
    visible: VisibleGraph,
    state: SimulationState,
    status: SimulationStatus,
    generation: u64,
    ticks: u64,
}

impl SimulationController {
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        Self {
            config,
            graph: KnowledgeGraph::default(),
            criteria: FilterCriteria::default(),
            mode: LayoutMode::default(),
            seed,
            spawn_rng: StdRng::seed_from_u64(seed),
            visible: VisibleGraph::default(),
            state: SimulationState::new(),
            status: SimulationStatus::Idle,
            generation: 0,
            ticks: 0,
        }
    }

    // ------------------------------------------------------------------
    // Clock

    /// Begin (or resume) animation. Calling it while already running
    /// returns the live token instead of invalidating it.
    pub fn start(&mut self) -> TickToken {
        if self.status != SimulationStatus::Running {
            self.generation += 1;
            self.status = SimulationStatus::Running;
            tracing::info!(generation = self.generation, "simulation started");
        }
        TickToken {
            generation: self.generation,
        }
    }

    /// Halt animation. Every token issued so far becomes stale. Safe to
    /// call any number of times, in any state.
    pub fn stop(&mut self) {
        self.generation += 1;
        if self.status == SimulationStatus::Running {
            self.status = SimulationStatus::Stopped;
            tracing::info!(ticks = self.ticks, "simulation stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == SimulationStatus::Running
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    /// The live token, if running.
    pub fn current_token(&self) -> Option<TickToken> {
        self.is_running().then_some(TickToken {
            generation: self.generation,
        })
    }

    /// Run one integrator step if `token` is still current. Returns
    /// whether a step happened.
    pub fn tick(&mut self, token: TickToken) -> bool {
        if !self.is_running() || token.generation != self.generation {
            return false;
        }
        self.advance();
        true
    }

    /// One step regardless of status, for single-stepping while paused.
    pub fn step_once(&mut self) {
        self.advance();
    }

    fn advance(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.state = step(
            state,
            FRAME_DT,
            &self.config.integrator,
            &self.config.canvas,
        );
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    // ------------------------------------------------------------------
    // Inputs

    pub fn set_graph(&mut self, graph: KnowledgeGraph) {
        self.graph = graph;
        self.retarget();
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if criteria == self.criteria {
            return;
        }
        self.criteria = criteria;
        self.retarget();
    }

    pub fn set_mode(&mut self, mode: LayoutMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.retarget();
    }

    /// Switch layout mode by name. An unknown name leaves the current
    /// mode untouched.
    pub fn set_mode_by_name(&mut self, name: &str) -> Result<(), LayoutError> {
        let mode = name.parse::<LayoutMode>()?;
        self.set_mode(mode);
        Ok(())
    }

    /// New layout seed; recomputes targets.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.retarget();
    }

    /// Filter and lay out the current graph, then swap every target in
    /// one go. Tracked bodies keep their position and velocity, newly
    /// visible ones spawn at a random spot, hidden ones are dropped.
    fn retarget(&mut self) {
        self.visible =
            filter(&self.graph.nodes, &self.graph.edges, &self.criteria);
        let targets = layout(
            &self.visible.nodes,
            &self.visible.edges,
            self.mode,
            self.seed,
            &self.config.canvas,
            &self.config.layout,
        );

        let mut previous = std::mem::take(&mut self.state);
        let mut spawned = 0usize;
        let mut next = SimulationState::new();
        for (id, target) in targets {
            let body = match previous.bodies_mut().remove(&id) {
                Some(body) => Body { target, ..body },
                None => {
                    spawned += 1;
                    let start =
                        random_point(&mut self.spawn_rng, &self.config.canvas);
                    Body::new(start, target)
                }
            };
            next.insert(id, body);
        }

        tracing::debug!(
            mode = %self.mode,
            visible_nodes = self.visible.nodes.len(),
            visible_edges = self.visible.edges.len(),
            spawned,
            dropped = previous.len(),
            "targets updated"
        );
        self.state = next;
    }

    // ------------------------------------------------------------------
    // Read access

    /// Current positions, for drawing.
    pub fn snapshot(&self) -> &SimulationState {
        &self.state
    }

    pub fn visible(&self) -> &VisibleGraph {
        &self.visible
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Drives a controller from the host's repaint callback, one tick per
/// frame.
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    last_frame: Option<Instant>,
    frame_time: Option<Duration>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tick `controller` if it is running. Returns whether the host
    /// should schedule another frame.
    pub fn on_frame(
        &mut self,
        controller: &mut SimulationController,
        now: Instant,
    ) -> bool {
        let Some(token) = controller.current_token() else {
            self.last_frame = None;
            return false;
        };

        if let Some(last) = self.last_frame {
            let elapsed = now.saturating_duration_since(last);
            // Exponential moving average, 1/8 weight on the newest frame
            self.frame_time = Some(match self.frame_time {
                Some(avg) => (avg * 7 + elapsed) / 8,
                None => elapsed,
            });
        }
        self.last_frame = Some(now);

        controller.tick(token)
    }

    /// Smoothed frames per second while running.
    pub fn fps(&self) -> Option<f32> {
        self.frame_time
            .filter(|d| !d.is_zero())
            .map(|d| 1.0 / d.as_secs_f32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edge, EdgeKind, Node, NodeKind};

    fn sample_graph() -> KnowledgeGraph {
        KnowledgeGraph::new(
            vec![
                Node::new("a", "Alpha", NodeKind::Input, 0.9),
                Node::new("b", "Beta", NodeKind::Output, 0.4),
                Node::new("c", "Gamma", NodeKind::Context, 0.1),
            ],
            vec![
                Edge::new("a", "b", EdgeKind::Direct, 0.8),
                Edge::new("b", "c", EdgeKind::Temporal, 0.5),
            ],
        )
    }

    fn controller() -> SimulationController {
        let mut controller =
            SimulationController::new(EngineConfig::default(), 7);
        controller.set_graph(sample_graph());
        controller
    }

    #[test]
    fn test_start_stop_stop() {
        let mut controller = controller();
        assert_eq!(controller.status(), SimulationStatus::Idle);

        controller.start();
        assert!(controller.is_running());
        controller.stop();
        controller.stop();

        assert!(!controller.is_running());
        assert_eq!(controller.status(), SimulationStatus::Stopped);
    }

    #[test]
    fn test_stop_from_idle() {
        let mut controller = controller();
        controller.stop();
        assert_eq!(controller.status(), SimulationStatus::Idle);
    }

    #[test]
    fn test_stale_token_is_noop() {
        let mut controller = controller();
        let old = controller.start();
        assert!(controller.tick(old));

        controller.stop();
        let before = controller.snapshot().clone();
        assert!(!controller.tick(old));
        assert_eq!(controller.snapshot(), &before);

        // Restarting does not revive the old token
        let new = controller.start();
        assert_ne!(old, new);
        assert!(!controller.tick(old));
        assert!(controller.tick(new));
        assert_eq!(controller.ticks(), 2);
    }

    #[test]
    fn test_start_while_running_keeps_token() {
        let mut controller = controller();
        let first = controller.start();
        let second = controller.start();
        assert_eq!(first, second);
        assert!(controller.tick(first));
    }

    #[test]
    fn test_step_once_while_idle() {
        let mut controller = controller();
        let before = controller.snapshot().max_displacement();
        controller.step_once();
        assert!(controller.snapshot().max_displacement() < before);
        assert!(!controller.is_running());
    }

    #[test]
    fn test_retarget_keeps_positions_and_drops_hidden() {
        let mut controller = controller();
        for _ in 0..10 {
            controller.step_once();
        }
        let a_before = controller.snapshot().get("a").copied();
        assert!(controller.snapshot().get("c").is_some());

        controller.set_criteria(FilterCriteria::default().with_threshold(0.3));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.get("c").is_none());
        let a_after = snapshot.get("a").copied();
        assert_eq!(
            a_before.map(|b| (b.position, b.velocity)),
            a_after.map(|b| (b.position, b.velocity))
        );
        assert_eq!(controller.visible().edges.len(), 1);
    }

    #[test]
    fn test_bodies_stay_inside_canvas() {
        let mut controller = controller();
        let canvas = controller.config().canvas;
        let token = controller.start();
        for _ in 0..50 {
            controller.tick(token);
            assert!(
                controller
                    .snapshot()
                    .iter()
                    .all(|(_, body)| canvas.contains(body.position))
            );
        }
    }

    #[test]
    fn test_unknown_mode_is_reported() {
        let mut controller = controller();
        let err = controller.set_mode_by_name("radial").unwrap_err();
        assert_eq!(err, LayoutError::UnknownMode("radial".to_string()));
        assert_eq!(controller.mode(), LayoutMode::Multilevel);

        controller.set_mode_by_name("Hierarchical").unwrap();
        assert_eq!(controller.mode(), LayoutMode::Hierarchical);
    }

    #[test]
    fn test_frame_loop_only_ticks_while_running() {
        let mut controller = controller();
        let mut frames = FrameLoop::new();
        let t0 = Instant::now();

        assert!(!frames.on_frame(&mut controller, t0));
        assert_eq!(controller.ticks(), 0);

        controller.start();
        assert!(frames.on_frame(&mut controller, t0));
        assert!(frames.on_frame(&mut controller, t0 + Duration::from_millis(20)));
        assert_eq!(controller.ticks(), 2);
        let fps = frames.fps().unwrap();
        assert!((fps - 50.0).abs() < 0.5);

        controller.stop();
        assert!(!frames.on_frame(&mut controller, t0 + Duration::from_millis(40)));
        assert_eq!(controller.ticks(), 2);
    }
}

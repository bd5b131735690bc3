use crate::actions::Action;
use crate::graph_view::{self, ScreenMap, edge_color, node_color};
use crate::state::State;
use crate::stats_view;
use eframe::egui;
use graph_engine::{EdgeKind, LayoutMode, NodeKind, percentile};
use std::time::Instant;

// UI Constants
const SIDE_PANEL_WIDTH: f32 = 260.0;
const SCROLL_ZOOM_RATE: f32 = 0.002;
const SIGNIFICANCE_CHOICES: [f64; 3] = [1.0, 2.0, 3.0];

pub struct ViewerApp {
    state: State,
}

impl ViewerApp {
    pub(crate) fn new(state: State) -> Self {
        Self { state }
    }
}

impl eframe::App for ViewerApp {
    fn update(
        &mut self,
        ctx: &egui::Context,
        _frame: &mut eframe::Frame,
    ) {
        self.menu_bar(ctx);
        self.filter_panel(ctx);
        self.stats_panel(ctx);
        self.status_bar(ctx);
        self.canvas(ctx);

        // Display error dialog if there's an error message
        if let Some(error) = self.state.store.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&error);
                    if ui.button("OK").clicked() {
                        self.state.dispatch(Action::ClearErrorMessage);
                    }
                });
        }

        let now = Instant::now();
        let pending = self.state.flush_actions(now);
        self.state.flush_effects();

        let store = &mut self.state.store;
        if store.frame_loop.on_frame(&mut store.controller, now) {
            ctx.request_repaint();
        }
        if let Some(wait) = pending {
            ctx.request_repaint_after(wait);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.store.shutdown();
    }
}

impl ViewerApp {
    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open graph…").clicked() {
                        ui.close();
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .pick_file()
                        {
                            self.state.dispatch(Action::OpenGraph { path });
                        }
                    }

                    ui.separator();

                    if ui.button("Save settings…").clicked() {
                        ui.close();
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .save_file()
                        {
                            self.state
                                .dispatch(Action::SaveSettings { path });
                        }
                    }

                    if ui.button("Load settings…").clicked() {
                        ui.close();
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .pick_file()
                        {
                            self.state
                                .dispatch(Action::LoadSettings { path });
                        }
                    }
                });

                ui.menu_button("View", |ui| {
                    let mut show = self.state.store.show_labels;
                    if ui.checkbox(&mut show, "Labels").changed() {
                        self.state.dispatch(Action::SetShowLabels { show });
                    }
                    if ui.button("Reset view").clicked() {
                        ui.close();
                        self.state.dispatch(Action::ResetView);
                    }
                });
            });
        });
    }

    fn filter_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("filter_panel")
            .exact_width(SIDE_PANEL_WIDTH)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(8.0),
            )
            .show(ctx, |ui| {
                ui.heading("Filter");
                ui.separator();

                let mut criteria = self.state.store.criteria.clone();
                let mut changed = false;

                ui.label("Search");
                changed |= ui.text_edit_singleline(&mut criteria.search).changed();

                ui.label("Minimum confidence");
                changed |= ui
                    .add(egui::Slider::new(&mut criteria.threshold, 0.0..=1.0))
                    .changed();

                let mut capped = criteria.max_confidence.is_some();
                if ui.checkbox(&mut capped, "Maximum confidence").changed() {
                    criteria.max_confidence = capped.then_some(1.0);
                    changed = true;
                }
                if let Some(max) = criteria.max_confidence.as_mut() {
                    changed |= ui
                        .add(egui::Slider::new(max, 0.0..=1.0))
                        .changed();
                }

                changed |= ui
                    .checkbox(&mut criteria.hide_outliers, "Hide outliers")
                    .changed();

                ui.horizontal(|ui| {
                    changed |= ui
                        .checkbox(
                            &mut criteria.only_significant,
                            "Only significant",
                        )
                        .changed();
                    egui::ComboBox::from_id_salt("significance_threshold")
                        .selected_text(format!(
                            "{}σ",
                            criteria.significance_threshold
                        ))
                        .show_ui(ui, |ui| {
                            for sigmas in SIGNIFICANCE_CHOICES {
                                changed |= ui
                                    .selectable_value(
                                        &mut criteria.significance_threshold,
                                        sigmas,
                                        format!("{sigmas}σ"),
                                    )
                                    .changed();
                            }
                        });
                });

                ui.add_space(6.0);
                ui.label("Node types");
                for kind in NodeKind::ALL {
                    let mut on = criteria.node_kinds.contains(kind);
                    let text = egui::RichText::new(kind.label())
                        .color(node_color(kind));
                    if ui.checkbox(&mut on, text).changed() {
                        criteria.node_kinds.set(kind, on);
                        changed = true;
                    }
                }

                ui.add_space(6.0);
                ui.label("Edge types");
                for kind in EdgeKind::ALL {
                    let mut on = criteria.edge_kinds.contains(kind);
                    let text = egui::RichText::new(kind.label())
                        .color(edge_color(kind));
                    if ui.checkbox(&mut on, text).changed() {
                        criteria.edge_kinds.set(kind, on);
                        changed = true;
                    }
                }

                if changed {
                    self.state.dispatch(Action::EditCriteria { criteria });
                }

                ui.add_space(12.0);
                ui.heading("Layout");
                ui.separator();

                let mut mode = self.state.store.controller.mode();
                egui::ComboBox::from_label("Mode")
                    .selected_text(mode.name())
                    .show_ui(ui, |ui| {
                        for option in LayoutMode::ALL {
                            ui.selectable_value(&mut mode, option, option.name());
                        }
                    });
                if mode != self.state.store.controller.mode() {
                    self.state.dispatch(Action::SetMode { mode });
                }

                ui.horizontal(|ui| {
                    let running = self.state.store.controller.is_running();
                    let label = if running { "⏸ Pause" } else { "▶ Play" };
                    if ui.button(label).clicked() {
                        self.state.dispatch(if running {
                            Action::Pause
                        } else {
                            Action::Play
                        });
                    }
                    if ui
                        .add_enabled(!running, egui::Button::new("Step"))
                        .clicked()
                    {
                        self.state.dispatch(Action::Step);
                    }
                    if ui.button("Shuffle").clicked() {
                        let seed =
                            self.state.store.controller.seed().wrapping_add(1);
                        self.state.dispatch(Action::Reseed { seed });
                    }
                });

                ui.add_space(12.0);
                ui.heading("View");
                ui.separator();
                let mut scale = self.state.store.view.scale;
                if ui
                    .add(
                        egui::Slider::new(
                            &mut scale,
                            graph_engine::view::MIN_SCALE
                                ..=graph_engine::view::MAX_SCALE,
                        )
                        .text("Zoom"),
                    )
                    .changed()
                {
                    let delta = scale - self.state.store.view.scale;
                    self.state.dispatch(Action::Zoom { delta });
                }
            });
    }

    fn stats_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("stats_panel")
            .exact_width(SIDE_PANEL_WIDTH)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(8.0),
            )
            .show(ctx, |ui| {
                ui.heading("Confidence");
                ui.separator();

                let State { store, cache, .. } = &mut self.state;
                let all = cache.graph_summary.get(store).clone();
                let visible = cache.visible_summary.get(store).clone();

                stats_view::confidence_box_plot(
                    ui,
                    all.as_ref(),
                    visible.as_ref(),
                );

                egui::ScrollArea::vertical().show(ui, |ui| {
                    match &all {
                        Some(summary) => {
                            ui.label("All nodes");
                            stats_view::summary_grid(ui, "all_stats", summary);
                        }
                        None => {
                            ui.label("No graph loaded");
                        }
                    }
                    if let Some(summary) = &visible {
                        ui.add_space(8.0);
                        ui.label("Visible nodes");
                        stats_view::summary_grid(
                            ui,
                            "visible_stats",
                            summary,
                        );
                    }
                });
            });
    }

    fn status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let store = &self.state.store;
            let visible = store.controller.visible();
            ui.horizontal(|ui| {
                ui.label(format!("{:?}", store.controller.status()));
                ui.separator();
                ui.label(format!(
                    "Nodes: {}/{}",
                    visible.nodes.len(),
                    store.graph.get().nodes.len()
                ));
                ui.label(format!(
                    "Edges: {}/{}",
                    visible.edges.len(),
                    store.graph.get().edges.len()
                ));
                ui.separator();
                ui.label(format!("Ticks: {}", store.controller.ticks()));
                if store.controller.is_running()
                    && let Some(fps) = store.frame_loop.fps()
                {
                    ui.label(format!("{fps:.0} fps"));
                }
                if let Some(path) = &store.source {
                    ui.separator();
                    ui.label(path.display().to_string());
                }
            });
        });
    }

    fn canvas(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(
                ui.available_size(),
                egui::Sense::click_and_drag(),
            );

            let store = &self.state.store;
            let map = ScreenMap::new(
                response.rect,
                &store.controller.config().canvas,
                store.view,
            );
            let visible = store.controller.visible();
            let snapshot = store.controller.snapshot();

            graph_view::draw_graph(
                &painter,
                &map,
                visible,
                snapshot,
                store.show_labels,
                ui.visuals().text_color(),
            );

            if let Some(pointer) = response.hover_pos()
                && let Some(node) =
                    graph_view::node_at(&map, visible, snapshot, pointer)
            {
                let confidences = store.graph.get().confidences();
                let rank = percentile(node.confidence, &confidences);
                response.clone().on_hover_text(format!(
                    "{} ({})\nconfidence {:.2}, percentile {:.0}",
                    node.label,
                    node.kind.label(),
                    node.confidence,
                    rank
                ));
            }

            if response.dragged() {
                let delta = map.pan_delta(response.drag_delta());
                self.state.dispatch(Action::Pan { delta });
            }
            if response.hovered() {
                let scroll = ui.input(|i| i.smooth_scroll_delta.y);
                if scroll != 0.0 {
                    self.state.dispatch(Action::Zoom {
                        delta: scroll * SCROLL_ZOOM_RATE,
                    });
                }
            }
        });
    }
}

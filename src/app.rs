use eframe::egui;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

use crate::config::QuizConfig;
use crate::effects::{verdict_color, Effects, FEEDBACK_BURST, SELECTION_BURST, SELECTION_COLOR};
use crate::flow::QuizController;
use crate::layout::Layout;
use crate::quiz::QuestionBank;
use crate::ui::{QuizAction, QuizUI};

/// Controller plus the effects it drives. Quiz events flow one way into
/// the particles; nothing here reads them back.
pub struct Stage {
    controller: QuizController,
    effects: Effects,
    rng: StdRng,
}

impl Stage {
    pub fn new(controller: QuizController, rng: StdRng) -> Self {
        Self {
            controller,
            effects: Effects::default(),
            rng,
        }
    }

    /// Frame start: fire the pending advance and step existing particles,
    /// so anything spawned this frame is first drawn where it was spawned.
    pub fn begin_frame(&mut self, now: Instant) {
        self.controller.tick(now);
        self.effects.update();
    }

    pub fn handle_click(&mut self, layout: &Layout, pointer: egui::Pos2) {
        if self.controller.select_at(layout, pointer).is_some() {
            self.effects
                .burst(&mut self.rng, pointer, SELECTION_BURST, SELECTION_COLOR);
        }
    }

    pub fn handle_action(&mut self, action: QuizAction, layout: &Layout, now: Instant) {
        match action {
            QuizAction::Start => {
                if self.controller.start() {
                    self.effects.clear();
                }
            }
            QuizAction::Submit => {
                if let Some(verdict) = self.controller.submit(now) {
                    self.effects.burst(
                        &mut self.rng,
                        layout.center(),
                        FEEDBACK_BURST,
                        verdict_color(verdict),
                    );
                }
            }
            QuizAction::Restart => {
                if self.controller.restart() {
                    self.effects.clear();
                }
            }
            QuizAction::None => {}
        }
    }
}

pub struct QuizApp {
    stage: Stage,
    ui: QuizUI,
    layout: Option<Layout>,
}

impl QuizApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, bank: QuestionBank, config: &QuizConfig) -> Self {
        let controller =
            QuizController::new(bank, config.sample_size, config.feedback_duration());
        Self {
            stage: Stage::new(controller, StdRng::from_entropy()),
            ui: QuizUI::default(),
            layout: None,
        }
    }

    /// Rebuilds the layout when the surface size changes.
    fn relayout(&mut self, screen: egui::Rect) -> Layout {
        match self.layout {
            Some(layout) if layout.screen == screen => layout,
            _ => {
                log::debug!("Surface resized to {:?}", screen.size());
                let layout = Layout::new(screen);
                self.layout = Some(layout);
                layout
            }
        }
    }
}

impl eframe::App for QuizApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let layout = self.relayout(ctx.screen_rect());
        self.stage.begin_frame(now);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::click());
                if response.clicked() {
                    if let Some(pointer) = response.interact_pointer_pos() {
                        self.stage.handle_click(&layout, pointer);
                    }
                }

                self.ui
                    .show_screen(&painter, &layout, self.stage.controller.screen());
                self.ui.show_particles(&painter, self.stage.effects.particles());
            });

        let action = self
            .ui
            .show_controls(ctx, &layout, self.stage.controller.controls());
        self.stage.handle_action(action, &layout, now);

        // Particles and the feedback timer both need a steady frame clock.
        ctx.request_repaint();
    }
}

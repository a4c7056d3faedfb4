use egui::{Align2, Button, Color32, Context, FontId, Order, Painter, Pos2, Stroke, Vec2};

use crate::effects::{verdict_color, Particle, PARTICLE_RADIUS};
use crate::flow::{Controls, Screen};
use crate::layout::Layout;
use crate::quiz::{QuizSession, ResultSummary, Tier};

const OPTION_ROUNDING: f32 = 10.0;
const BUTTON_SIZE: Vec2 = Vec2 { x: 160.0, y: 32.0 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAction {
    None,
    Start,
    Submit,
    Restart,
}

pub struct QuizUI {
    pub font: FontId,
    pub text_color: Color32,
    pub backdrop: Color32,
    pub option_fill: Color32,
    pub option_selected: Color32,
}

impl Default for QuizUI {
    fn default() -> Self {
        Self {
            font: FontId::proportional(20.0),
            text_color: Color32::BLACK,
            backdrop: Color32::from_gray(220),
            option_fill: Color32::from_gray(240),
            option_selected: Color32::from_rgb(150, 200, 255),
        }
    }
}

impl QuizUI {
    pub fn tier_backdrop(tier: Tier) -> Color32 {
        match tier {
            Tier::Perfect => Color32::from_rgb(150, 255, 150),
            Tier::Good => Color32::from_rgb(200, 200, 100),
            Tier::KeepPracticing => Color32::from_rgb(255, 150, 150),
        }
    }

    pub fn backdrop_for(&self, screen: &Screen) -> Color32 {
        match screen {
            Screen::Result(summary) => Self::tier_backdrop(summary.tier),
            _ => self.backdrop,
        }
    }

    pub fn show_screen(&self, painter: &Painter, layout: &Layout, screen: &Screen) {
        painter.rect_filled(layout.screen, 0.0, self.backdrop_for(screen));
        match screen {
            Screen::Start => self.show_start(painter, layout),
            Screen::Question(session) => self.show_question(painter, layout, session),
            Screen::Result(summary) => self.show_results(painter, layout, summary),
        }
    }

    fn show_start(&self, painter: &Painter, layout: &Layout) {
        self.label(painter, layout.center() - Vec2::new(0.0, 50.0), "Welcome to the Quiz!");
    }

    fn show_question(&self, painter: &Painter, layout: &Layout, session: &QuizSession) {
        let Some(question) = session.current_question() else {
            return;
        };

        self.label(
            painter,
            layout.question_header(),
            &format!(
                "Question {} of {}:",
                session.current_index() + 1,
                session.total()
            ),
        );
        self.wrapped(
            painter,
            layout.question_text(),
            &question.text,
            layout.text_wrap_width(),
            self.text_color,
        );

        let selected = session.current_answer();
        for (i, (rect, option)) in layout
            .option_rects()
            .into_iter()
            .zip(question.options.iter())
            .enumerate()
        {
            let fill = if selected == Some(i) {
                self.option_selected
            } else {
                self.option_fill
            };
            painter.rect_filled(rect, OPTION_ROUNDING, fill);
            painter.rect_stroke(rect, OPTION_ROUNDING, Stroke::new(1.0, Color32::BLACK));
            self.label(painter, rect.center(), option);
        }

        if let Some(feedback) = session.feedback() {
            self.wrapped(
                painter,
                layout.feedback_text(),
                &feedback.message(),
                layout.text_wrap_width(),
                verdict_color(feedback.verdict),
            );
        }
    }

    fn show_results(&self, painter: &Painter, layout: &Layout, summary: &ResultSummary) {
        let center = layout.center();
        self.label(painter, center - Vec2::new(0.0, 100.0), "Quiz Finished!");
        self.label(
            painter,
            center - Vec2::new(0.0, 50.0),
            &format!(
                "You scored {} out of {} questions.",
                summary.score, summary.total
            ),
        );
        self.label(painter, center, summary.tier.message());
    }

    pub fn show_particles(&self, painter: &Painter, particles: &[Particle]) {
        for particle in particles {
            let color = particle.display_color();
            painter.circle(particle.pos, PARTICLE_RADIUS, color, Stroke::new(2.0, color));
        }
    }

    /// Draws the buttons live on this screen, each re-anchored to the layout.
    pub fn show_controls(&self, ctx: &Context, layout: &Layout, controls: Controls) -> QuizAction {
        let mut action = QuizAction::None;
        if controls.start && self.button(ctx, "start", layout.start_button, "Start Quiz", true) {
            action = QuizAction::Start;
        }
        if controls.submit
            && self.button(
                ctx,
                "submit",
                layout.submit_button,
                "Submit Answer",
                controls.submit_enabled,
            )
        {
            action = QuizAction::Submit;
        }
        if controls.restart
            && self.button(ctx, "restart", layout.restart_button, "Restart Quiz", true)
        {
            action = QuizAction::Restart;
        }
        action
    }

    fn button(&self, ctx: &Context, id: &'static str, at: Pos2, text: &str, enabled: bool) -> bool {
        egui::Area::new(id)
            .order(Order::Foreground)
            .fixed_pos(at)
            .pivot(Align2::CENTER_CENTER)
            .show(ctx, |ui| {
                ui.add_enabled(enabled, Button::new(text).min_size(BUTTON_SIZE))
                    .clicked()
            })
            .inner
    }

    fn label(&self, painter: &Painter, at: Pos2, text: &str) {
        painter.text(at, Align2::CENTER_CENTER, text, self.font.clone(), self.text_color);
    }

    fn wrapped(&self, painter: &Painter, at: Pos2, text: &str, width: f32, color: Color32) {
        let galley = painter.layout(text.to_owned(), self.font.clone(), color, width);
        let top_left = at - galley.size() / 2.0;
        painter.galley(top_left, galley);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_tint_the_backdrop_by_tier() {
        let ui = QuizUI::default();
        assert_eq!(ui.backdrop_for(&Screen::Start), Color32::from_gray(220));
        let perfect = Screen::Result(ResultSummary::new(5, 5));
        assert_eq!(ui.backdrop_for(&perfect), Color32::from_rgb(150, 255, 150));
        let empty = Screen::Result(ResultSummary::new(0, 0));
        assert_eq!(ui.backdrop_for(&empty), Color32::from_rgb(255, 150, 150));
    }
}

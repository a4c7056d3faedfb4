use egui::{pos2, vec2, Pos2, Rect};

use crate::quiz::OPTION_COUNT;

const FIRST_OPTION_Y: f32 = 250.0;
const OPTION_HEIGHT: f32 = 50.0;
const OPTION_SPACING: f32 = 10.0;
const OPTION_WIDTH_RATIO: f32 = 0.6;

/// Screen geometry derived from the current surface size.
/// Rebuilt whenever the surface is resized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub screen: Rect,
    pub start_button: Pos2,
    pub submit_button: Pos2,
    pub restart_button: Pos2,
}

impl Layout {
    pub fn new(screen: Rect) -> Self {
        let center = screen.center();
        Self {
            screen,
            start_button: center + vec2(0.0, 50.0),
            submit_button: pos2(center.x, screen.bottom() - 50.0),
            restart_button: center + vec2(0.0, 100.0),
        }
    }

    pub fn center(&self) -> Pos2 {
        self.screen.center()
    }

    pub fn option_rect(&self, index: usize) -> Rect {
        let step = OPTION_HEIGHT + OPTION_SPACING;
        let center = pos2(
            self.screen.center().x,
            self.screen.top() + FIRST_OPTION_Y + index as f32 * step,
        );
        Rect::from_center_size(
            center,
            vec2(self.screen.width() * OPTION_WIDTH_RATIO, OPTION_HEIGHT),
        )
    }

    pub fn option_rects(&self) -> [Rect; OPTION_COUNT] {
        std::array::from_fn(|i| self.option_rect(i))
    }

    /// The option whose box strictly contains `pointer`, if any.
    pub fn hit_option(&self, pointer: Pos2) -> Option<usize> {
        self.option_rects().iter().position(|rect| {
            pointer.x > rect.left()
                && pointer.x < rect.right()
                && pointer.y > rect.top()
                && pointer.y < rect.bottom()
        })
    }

    pub fn question_header(&self) -> Pos2 {
        pos2(self.screen.center().x, self.screen.top() + 50.0)
    }

    pub fn question_text(&self) -> Pos2 {
        pos2(self.screen.center().x, self.screen.top() + 150.0)
    }

    pub fn feedback_text(&self) -> Pos2 {
        let below_options = self.option_rect(OPTION_COUNT - 1).bottom() + 40.0;
        pos2(self.screen.center().x, below_options)
    }

    pub fn text_wrap_width(&self) -> f32 {
        self.screen.width() * 0.8
    }
}

use std::time::{Duration, Instant};

use egui::Pos2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::layout::Layout;
use crate::quiz::{QuestionBank, QuizSession, ResultSummary, Verdict};

/// The screen being shown. Question owns the live session, and with it any
/// pending advance, so leaving that screen drops both.
#[derive(Debug)]
pub enum Screen {
    Start,
    Question(QuizSession),
    Result(ResultSummary),
}

/// Which triggers are live on the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub start: bool,
    pub submit: bool,
    pub submit_enabled: bool,
    pub restart: bool,
}

pub struct QuizController {
    bank: QuestionBank,
    sample_size: usize,
    feedback_duration: Duration,
    screen: Screen,
    rng: StdRng,
}

impl QuizController {
    pub fn new(bank: QuestionBank, sample_size: usize, feedback_duration: Duration) -> Self {
        Self::with_rng(bank, sample_size, feedback_duration, StdRng::from_entropy())
    }

    pub fn with_rng(
        bank: QuestionBank,
        sample_size: usize,
        feedback_duration: Duration,
        rng: StdRng,
    ) -> Self {
        Self {
            bank,
            sample_size,
            feedback_duration,
            screen: Screen::Start,
            rng,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    #[cfg(test)]
    pub fn session(&self) -> Option<&QuizSession> {
        match &self.screen {
            Screen::Question(session) => Some(session),
            _ => None,
        }
    }

    pub fn controls(&self) -> Controls {
        match &self.screen {
            Screen::Start => Controls {
                start: true,
                ..Default::default()
            },
            Screen::Question(session) => Controls {
                submit: true,
                submit_enabled: session.can_submit(),
                ..Default::default()
            },
            Screen::Result(_) => Controls {
                restart: true,
                ..Default::default()
            },
        }
    }

    /// Start -> Question with a freshly sampled session.
    pub fn start(&mut self) -> bool {
        if !matches!(self.screen, Screen::Start) {
            return false;
        }
        let selected = self.bank.sample(&mut self.rng, self.sample_size);
        log::info!(
            "Starting quiz with {} of {} questions",
            selected.len(),
            self.bank.len()
        );
        if selected.is_empty() {
            log::warn!("No questions available, going straight to results");
            self.screen = Screen::Result(ResultSummary::new(0, 0));
            return true;
        }
        self.screen = Screen::Question(QuizSession::new(selected));
        true
    }

    pub fn select(&mut self, option: usize) -> bool {
        match &mut self.screen {
            Screen::Question(session) => session.select(option),
            _ => false,
        }
    }

    /// Selects whichever option box lies under `pointer`.
    pub fn select_at(&mut self, layout: &Layout, pointer: Pos2) -> Option<usize> {
        if !matches!(self.screen, Screen::Question(_)) {
            return None;
        }
        let option = layout.hit_option(pointer)?;
        self.select(option).then_some(option)
    }

    pub fn submit(&mut self, now: Instant) -> Option<Verdict> {
        let Screen::Question(session) = &mut self.screen else {
            return None;
        };
        let verdict = session.submit(now + self.feedback_duration)?;
        log::info!(
            "Question {} answered: {:?} (score {})",
            session.current_index() + 1,
            verdict,
            session.score()
        );
        Some(verdict)
    }

    /// Fires the pending advance once its feedback window has closed.
    pub fn tick(&mut self, now: Instant) {
        let Screen::Question(session) = &mut self.screen else {
            return;
        };
        if !session.feedback_elapsed(now) {
            return;
        }
        if !session.advance() {
            let summary = session.summary();
            log::info!(
                "Quiz finished: {}/{} ({:.0}%, {:?})",
                summary.score,
                summary.total,
                summary.percentage,
                summary.tier
            );
            self.screen = Screen::Result(summary);
        }
    }

    /// Back to Start. Drops the session along with any pending advance.
    pub fn restart(&mut self) -> bool {
        if matches!(self.screen, Screen::Start) {
            return false;
        }
        log::info!("Restarting quiz");
        self.screen = Screen::Start;
        true
    }
}

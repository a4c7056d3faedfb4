mod app;
mod config;
mod effects;
mod flow;
mod layout;
mod quiz;
mod ui;

use app::QuizApp;
use config::QuizConfig;
use eframe::egui;
use quiz::QuestionBank;
use simplelog::{ColorChoice, CombinedLogger, SharedLogger, TermLogger, TerminalMode, WriteLogger};

fn init_logging(config: &QuizConfig) {
    let level = config.level_filter();
    let log_config = simplelog::Config::default();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        log_config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &config.log_file {
        match std::fs::File::create(path) {
            Ok(file) => loggers.push(WriteLogger::new(level, log_config, file)),
            Err(e) => eprintln!("Could not open log file {}: {}", path.display(), e),
        }
    }
    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Logger already initialised: {}", e);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = QuizConfig::load();
    init_logging(&config);
    log::debug!("Using config: {:?}", config);

    let bank = match QuestionBank::load_from_csv(&config.questions_path) {
        Ok(bank) => bank,
        Err(e) => {
            log::error!(
                "Failed to load questions from {}: {}",
                config.questions_path.display(),
                e
            );
            return Err(e.into());
        }
    };

    if bank.is_empty() {
        log::warn!("Question source has a header but no rows; quizzes will score 0/0");
    }

    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(800.0, 600.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Quiz",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Box::new(QuizApp::new(cc, bank, &config))
        }),
    )?;
    Ok(())
}

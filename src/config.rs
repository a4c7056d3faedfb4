use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "quizconfig.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    pub questions_path: PathBuf,
    pub sample_size: usize,
    pub feedback_millis: u64,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions_path: PathBuf::from("assets/questions.csv"),
            sample_size: 5,
            feedback_millis: 1500,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl QuizConfig {
    /// Looks in the working directory first, then the per-user config dir.
    /// Falls back to defaults when neither file is usable. Runs before the
    /// logger exists, so problems go straight to stderr.
    pub fn load() -> Self {
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Self::load_from(&local);
        }
        match Self::user_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                let config = Self::default();
                // First run: leave a file behind for the user to edit.
                if let Err(e) = config.save(&path) {
                    eprintln!("Could not write default config to {}: {}", path.display(), e);
                }
                config
            }
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                eprintln!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                eprintln!("Could not read config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(contents)?;
        config.sample_size = config.sample_size.max(1);
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("canvas_quiz").join(CONFIG_FILE))
    }

    pub fn feedback_duration(&self) -> Duration {
        Duration::from_millis(self.feedback_millis)
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

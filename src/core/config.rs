//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

/// Daybook configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the entity collections live
    pub data_dir: Option<PathBuf>,

    /// Editor command for `daybook note edit`
    pub editor: Option<String>,

    /// Keep synthetic numbers across listings instead of renumbering
    pub keep_numbers: Option<bool>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. User config (~/.config/daybook/config.yaml)
        if let Some(path) = Self::config_path() {
            if path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&path) {
                    if let Ok(user) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(user);
                    }
                }
            }
        }

        // 3. Environment variables
        if let Ok(dir) = std::env::var("DAYBOOK_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Ok(editor) = std::env::var("DAYBOOK_EDITOR") {
            config.editor = Some(editor);
        }

        config
    }

    /// Get the path to the user config file
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "daybook")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }
        if other.editor.is_some() {
            self.editor = other.editor;
        }
        if other.keep_numbers.is_some() {
            self.keep_numbers = other.keep_numbers;
        }
    }

    /// Resolve the data directory: config, then the platform data dir,
    /// then `./daybook` as a last resort
    pub fn data_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.data_dir {
            return dir.clone();
        }
        directories::ProjectDirs::from("", "", "daybook")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("daybook"))
    }

    /// Whether listings reuse the existing numbering epoch
    pub fn keep_numbers(&self) -> bool {
        self.keep_numbers.unwrap_or(false)
    }

    /// Get the editor command
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .unwrap_or_else(|| "vi".to_string())
    }

    /// Run the editor on a file, properly handling commands with arguments
    /// (e.g., "emacsclient -nw" or "code --wait")
    pub fn run_editor(
        &self,
        file_path: &std::path::Path,
    ) -> std::io::Result<std::process::ExitStatus> {
        let editor = self.editor();
        let parts: Vec<&str> = editor.split_whitespace().collect();

        if parts.is_empty() {
            return std::process::Command::new("vi").arg(file_path).status();
        }

        let cmd = parts[0];
        let args = &parts[1..];

        std::process::Command::new(cmd)
            .args(args)
            .arg(file_path)
            .status()
    }
}

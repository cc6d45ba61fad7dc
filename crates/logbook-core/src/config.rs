//! Store settings for logbook
//!
//! Settings are stored in `.logbook/config.json`. Every key is optional;
//! anything missing falls back to its default.

pub mod types;

use std::fs;
use std::path::Path;

use crate::error::Result;

pub use types::{GcConfig, GitConfig, Settings};

impl Settings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from a file, or defaults if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        fs::write(path, content)?;
        Ok(())
    }

    /// Body skeleton for a new session
    pub fn session_template(&self) -> String {
        render_template(&self.session_sections)
    }

    /// Body skeleton for a new task
    pub fn task_template(&self) -> String {
        render_template(&self.task_sections)
    }
}

fn render_template(sections: &[String]) -> String {
    let mut body = String::new();
    for section in sections {
        body.push_str("\n## ");
        body.push_str(section);
        body.push('\n');
    }
    body
}

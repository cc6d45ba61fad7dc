//! Store management for logbook
//!
//! The store is the root directory holding every record:
//!
//! ```text
//! .logbook/
//!   config.json
//!   sessions/            active sessions
//!     archive/           archived sessions
//!   tasks/
//!     open/ in_progress/ done/ cancelled/
//!   index/
//!     sessions.jsonl tasks.jsonl
//! ```
//!
//! There is no locking: concurrent processes may race on the same files.
//! The indexes can always be rebuilt from the documents.

pub mod paths;
pub mod scan;
mod sessions;
mod tasks;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::{LogbookError, Result};
use crate::task::TaskStatus;
use crate::vcs::{GitHook, NoopHook, VcsHook};
use paths::{
    ARCHIVE_DIR, CONFIG_FILE, DEFAULT_STORE_DIR, INDEX_DIR, SESSIONS_DIR, SESSION_INDEX_FILE,
    TASKS_DIR, TASK_INDEX_FILE,
};

pub use scan::{LoadReport, ScanFailure};
pub use sessions::{find_session, ArchiveOutcome};
pub use tasks::find_task;

/// Outcome of a bulk delete
#[derive(Debug, Default)]
pub struct PurgeReport {
    /// Files deleted
    pub removed: Vec<PathBuf>,
    /// Files that could not be deleted, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

/// The logbook store
#[derive(Debug)]
pub struct Store {
    /// Root path of the store
    root: PathBuf,
    /// Store settings
    settings: Settings,
    /// Version-control notifications
    hook: Box<dyn VcsHook>,
}

impl Store {
    /// Discover a store by walking up from the given directory
    pub fn discover(start: &Path) -> Result<Self> {
        let store_path = paths::discover_store(start)?;
        Self::open(&store_path)
    }

    /// Open an existing store at the given path
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(LogbookError::StoreNotFound {
                search_root: path.to_path_buf(),
            });
        }

        validate_layout(path)?;

        let settings = Settings::load_or_default(&path.join(CONFIG_FILE))?;
        let hook = default_hook(path, &settings);

        Ok(Store {
            root: path.to_path_buf(),
            settings,
            hook,
        })
    }

    /// Initialize a new store under the given project root
    pub fn init(project_root: &Path) -> Result<Self> {
        Self::init_at(&project_root.join(DEFAULT_STORE_DIR))
    }

    /// Initialize a store at an explicit path (idempotent)
    pub fn init_at(store_root: &Path) -> Result<Self> {
        fs::create_dir_all(store_root.join(SESSIONS_DIR).join(ARCHIVE_DIR))?;
        for status in TaskStatus::ALL {
            fs::create_dir_all(store_root.join(TASKS_DIR).join(status.as_str()))?;
        }
        fs::create_dir_all(store_root.join(INDEX_DIR))?;

        // Never rewrite an existing config
        let config_path = store_root.join(CONFIG_FILE);
        let settings = if config_path.exists() {
            Settings::load(&config_path)?
        } else {
            let settings = Settings::default();
            settings.save(&config_path)?;
            settings
        };

        let hook = default_hook(store_root, &settings);

        Ok(Store {
            root: store_root.to_path_buf(),
            settings,
            hook,
        })
    }

    /// Replace the version-control hook
    pub fn with_hook(mut self, hook: impl VcsHook + 'static) -> Self {
        self.hook = Box::new(hook);
        self
    }

    /// Replace the settings (e.g. with command-line overrides)
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Get the store root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Directory of active sessions
    pub fn sessions_dir(&self) -> PathBuf {
        self.root.join(SESSIONS_DIR)
    }

    /// Directory of archived sessions
    pub fn archive_dir(&self) -> PathBuf {
        self.sessions_dir().join(ARCHIVE_DIR)
    }

    /// Parent of the per-status task directories
    pub fn tasks_dir(&self) -> PathBuf {
        self.root.join(TASKS_DIR)
    }

    /// Directory holding tasks of the given status
    pub fn status_dir(&self, status: TaskStatus) -> PathBuf {
        self.tasks_dir().join(status.as_str())
    }

    /// Session index file
    pub fn session_index_path(&self) -> PathBuf {
        self.root.join(INDEX_DIR).join(SESSION_INDEX_FILE)
    }

    /// Task index file
    pub fn task_index_path(&self) -> PathBuf {
        self.root.join(INDEX_DIR).join(TASK_INDEX_FILE)
    }

    /// Get the config file path
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Tell version control about a written file; failures are only logged
    pub(crate) fn stage(&self, path: &Path) {
        if let Err(e) = self.hook.stage(path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to stage file");
        }
    }

    /// Tell version control about a removed file; failures are only logged
    pub(crate) fn unstage(&self, path: &Path) {
        if let Err(e) = self.hook.unstage(path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to unstage file");
        }
    }
}

fn validate_layout(store_root: &Path) -> Result<()> {
    let mut missing = Vec::new();

    if !store_root.join(SESSIONS_DIR).is_dir() {
        missing.push(SESSIONS_DIR.to_string());
    }
    for status in TaskStatus::ALL {
        let dir = Path::new(TASKS_DIR).join(status.as_str());
        if !store_root.join(&dir).is_dir() {
            missing.push(dir.display().to_string());
        }
    }

    // Derived; safe to recreate.
    let index_dir = store_root.join(INDEX_DIR);
    if !index_dir.exists() {
        fs::create_dir_all(&index_dir)?;
    }

    if !missing.is_empty() {
        return Err(LogbookError::InvalidStore {
            reason: format!(
                "missing required store dirs: {} (store_root={})",
                missing.join(", "),
                store_root.display()
            ),
        });
    }

    Ok(())
}

fn default_hook(store_root: &Path, settings: &Settings) -> Box<dyn VcsHook> {
    if !settings.git.auto_stage {
        return Box::new(NoopHook);
    }

    match GitHook::discover(store_root) {
        Some(hook) => Box::new(hook),
        None => {
            tracing::warn!(
                store = %store_root.display(),
                "git.auto_stage is set but the store is not inside a git repository"
            );
            Box::new(NoopHook)
        }
    }
}

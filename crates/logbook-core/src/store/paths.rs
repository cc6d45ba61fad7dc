use crate::error::{LogbookError, Result};
use std::path::{Path, PathBuf};

/// Default store directory name (hidden)
pub const DEFAULT_STORE_DIR: &str = ".logbook";

/// Store subdirectories
pub const SESSIONS_DIR: &str = "sessions";
pub const ARCHIVE_DIR: &str = "archive";
pub const TASKS_DIR: &str = "tasks";
pub const INDEX_DIR: &str = "index";

/// Index files, one per entity kind
pub const SESSION_INDEX_FILE: &str = "sessions.jsonl";
pub const TASK_INDEX_FILE: &str = "tasks.jsonl";

/// Settings filename
pub const CONFIG_FILE: &str = "config.json";

/// Document file extension
pub const DOCUMENT_EXT: &str = "md";

/// Walk up from `root` looking for a store directory
pub fn discover_store(root: &Path) -> Result<PathBuf> {
    root.ancestors()
        .map(|dir| dir.join(DEFAULT_STORE_DIR))
        .find(|candidate| candidate.is_dir())
        .ok_or_else(|| LogbookError::StoreNotFound {
            search_root: root.to_path_buf(),
        })
}

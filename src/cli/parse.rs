use logbook_core::task::{Priority, TaskStatus};

/// Parse task status from string
pub fn parse_status(s: &str) -> std::result::Result<TaskStatus, String> {
    s.parse::<TaskStatus>().map_err(|e| e.to_string())
}

/// Parse task priority from string
pub fn parse_priority(s: &str) -> std::result::Result<Priority, String> {
    s.parse::<Priority>().map_err(|e| e.to_string())
}

//! Command implementations for logbook

pub mod dispatch;
pub mod format;
pub mod gc;
pub mod index;
pub mod init;
pub mod io;
pub mod session;
pub mod task;

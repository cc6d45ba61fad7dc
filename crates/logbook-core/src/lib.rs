//! Logbook Core Library
//!
//! Plain-file storage for agent work sessions and tasks: the document codec,
//! the session and task stores, the secondary index and the retention policy.

pub mod config;
pub mod document;
pub mod error;
pub mod id;
pub mod index;
pub mod logging;
pub mod resolve;
pub mod retention;
pub mod session;
pub mod store;
pub mod task;
pub mod vcs;

//! Backend worker: commands queued by the UI and the tokio runtime that serves them.

pub mod commands;
pub mod runtime;

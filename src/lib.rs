// Library surface for the binary, headless tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error_tracker;
pub mod metrics;
pub mod passage;
pub mod personal_best;
pub mod runtime;
pub mod settings;
pub mod timer;
pub mod ui;

// Library surface for headless/integration tests and reuse.
// The binary in main.rs only wires the terminal to these modules.
pub mod app;
pub mod config;
pub mod controls;
pub mod logging;
pub mod practice_text;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod text_provider;
pub mod time_series;
pub mod timer;
pub mod ui;

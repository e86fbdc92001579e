// Library root: exposes the orchestrator, protocol and TUI so integration
// tests can drive them over channels.

pub mod app;
pub mod debounce;
pub mod protocol;
pub mod tui;

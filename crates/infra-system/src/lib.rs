// Provider Platform Infrastructure - System Adapters
// Implements: ProcessInspector, CommandRunner

pub mod process_inspector_impl;
pub mod subprocess_runner;

pub use process_inspector_impl::SysinfoProcessInspector;
pub use subprocess_runner::SubprocessRunner;

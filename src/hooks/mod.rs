//! Pre-publish hook
//!
//! A project may declare a shell command that runs after the build and
//! before its output is packaged, for project-specific preparation.

pub mod context;
pub mod executor;

pub use context::HookContext;
pub use executor::HookExecutor;

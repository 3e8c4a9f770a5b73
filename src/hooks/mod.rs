//! Lifecycle hooks run at pipeline stage boundaries
//!
//! Hooks are external scripts configured per hook point. Context reaches
//! the script through SEMREL_* environment variables. A failing pre-hook
//! aborts its stage; a failing post-publish hook is a warning only, since
//! the release already exists.

pub mod executor;
pub mod lifecycle;

pub use executor::HookExecutor;
pub use lifecycle::{HookContext, HookType};

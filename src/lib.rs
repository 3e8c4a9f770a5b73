pub mod boundary;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod orchestrator;
pub mod policy;
pub mod publish;
pub mod resolver;
pub mod store;
pub mod ui;

pub use error::{Result, SemrelError};

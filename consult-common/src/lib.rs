//! Shared types, configuration, and logging for the consultation feedback
//! services.

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{Error, Result, ResultExt};

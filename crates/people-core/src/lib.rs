//! People Core — error taxonomy, process configuration, request context.

pub mod config;
pub mod context;
pub mod error;

pub use config::ServiceConfig;
pub use context::RequestContext;
pub use error::{Error, Result};

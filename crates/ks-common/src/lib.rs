//! OS-ROLES Common
//!
//! Utilities shared by every crate and binary in the workspace.

pub mod logging;

pub use logging::init_logging;

//! Measure Plugin System
//!
//! Provides the traits and registry used to expose pure functions
//! (unit conversion, catalogue inspection) to callers such as the MCP server.

mod traits;
mod registry;
mod context;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::EvalContext;

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{FunctionPlugin, FunctionMeta, ArgMeta, PluginRegistry, EvalContext};
    pub use measure_core::prelude::*;
}

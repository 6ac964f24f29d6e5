//! Tools the executor agent can run on behalf of the model
//!
//! # Module Structure
//!
//! - [`registry`](crate::tools::registry) - Static tool table and typed handler trait
//! - [`markdown`](crate::tools::markdown) - `lint_and_fix_markdown` and `scan_markdown`
//!
//! # Tool Registry
//!
//! The set of tools is fixed at compile time. Each [`ToolId`] maps to one
//! strongly typed handler whose argument struct also produces the JSON
//! schema sent to the model:
//!
//! ```ignore
//! let registry = ToolRegistry::default();
//! let schemas = registry.get_tool_definitions();
//! let output = registry
//!     .execute("lint_and_fix_markdown", json!({ "file_path": "./input.md" }))
//!     .await?;
//! println!("{}", output.content);
//! ```

/// Markdown lint and fix tools.
pub mod markdown;
/// Tool registration and dispatch.
pub mod registry;

pub use markdown::{lint_and_fix_markdown, lint_and_fix_markdown_with, FixError, FixResult};
pub use registry::{Tool, ToolId, ToolOutput, ToolRegistry};

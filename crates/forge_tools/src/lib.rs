//! # forge_tools
//!
//! Tools the role agents can call, and the registry that binds them.
//!
//! | Tool | Bound to | Effect |
//! |------|----------|--------|
//! | [`WriteToFile`] | Developer | Writes an artifact under the tools directory |
//! | [`ReadFile`] | Analyst | Returns an artifact's content |
//! | [`ListFiles`] | Analyst | Lists `.py` artifacts |
//!
//! Tool failures are data: every tool returns text, and error conditions
//! (missing file, bad arguments, path escaping the root) are described in
//! that text so the model can see them in its follow-up call.

pub mod error;
pub mod files;
pub mod registry;
pub mod workspace;

pub use error::{ToolError, ToolResult};
pub use files::{
    file_tools, ListFiles, ReadFile, WriteToFile, ANALYST_TOOLS, ARTIFACT_EXTENSION,
    DEVELOPER_TOOLS, LIST_FILES, READ_FILE, WRITE_TO_FILE,
};
pub use registry::{parse_args, Tool, ToolRegistry};
pub use workspace::{Workspace, DEFAULT_TOOLS_DIR};

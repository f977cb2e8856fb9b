//! Working root for generated artifacts.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::{ToolError, ToolResult};

/// Default directory name for generated tools.
pub const DEFAULT_TOOLS_DIR: &str = "created_tools";

/// Directory that every file tool is confined to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(DEFAULT_TOOLS_DIR)
    }
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if it does not exist yet.
    pub fn ensure(&self) -> ToolResult<()> {
        if !self.root.exists() {
            debug!("Creating tools directory: {:?}", self.root);
            std::fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }

    /// Resolve a model-supplied filename to a path inside the root.
    ///
    /// Only relative paths made of normal components are accepted; `..`,
    /// absolute paths and drive prefixes are rejected.
    pub fn resolve(&self, filename: &str) -> ToolResult<PathBuf> {
        if filename.trim().is_empty() {
            return Err(ToolError::InvalidFilename(filename.to_string()));
        }

        let path = Path::new(filename);
        let escapes = path.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(ToolError::PathEscape(filename.to_string()));
        }

        Ok(self.root.join(path))
    }
}

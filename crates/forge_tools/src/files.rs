//! File tools: write, read and list generated artifacts.
//!
//! All three tools are confined to a [`Workspace`] and report every failure as
//! text in their result.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use forge_core::ToolDefinition;

use crate::error::ToolResult;
use crate::registry::{parse_args, Tool, ToolRegistry};
use crate::workspace::Workspace;

pub const WRITE_TO_FILE: &str = "write_to_file";
pub const READ_FILE: &str = "read_file";
pub const LIST_FILES: &str = "list_files";

/// Tools bound to the developer.
pub const DEVELOPER_TOOLS: &[&str] = &[WRITE_TO_FILE];

/// Tools bound to the analyst.
pub const ANALYST_TOOLS: &[&str] = &[LIST_FILES, READ_FILE];

/// Extension of the artifacts reported by `list_files`.
pub const ARTIFACT_EXTENSION: &str = "py";

/// Registry holding all three file tools over `workspace`.
pub fn file_tools(workspace: &Workspace) -> ToolRegistry {
    ToolRegistry::new()
        .with_tool(Arc::new(WriteToFile::new(workspace.clone())))
        .with_tool(Arc::new(ReadFile::new(workspace.clone())))
        .with_tool(Arc::new(ListFiles::new(workspace.clone())))
}

#[derive(Debug, Deserialize)]
struct WriteArgs {
    filename: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ReadArgs {
    filename: String,
}

/// Writes content to a file in the tools directory.
pub struct WriteToFile {
    workspace: Workspace,
    definition: ToolDefinition,
}

impl WriteToFile {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            definition: ToolDefinition::new(
                WRITE_TO_FILE,
                "Writes content to a file in the tools directory. Use this to save Python code.",
                json!({
                    "type": "object",
                    "properties": {
                        "filename": {
                            "type": "string",
                            "description": "File name relative to the tools directory, e.g. password_gen.py"
                        },
                        "content": {
                            "type": "string",
                            "description": "Full file content"
                        }
                    },
                    "required": ["filename", "content"]
                }),
            ),
        }
    }

    async fn write(&self, args: &Map<String, Value>) -> ToolResult<String> {
        let args: WriteArgs = parse_args(WRITE_TO_FILE, args)?;
        let path = self.workspace.resolve(&args.filename)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, args.content.as_bytes()).await?;
        debug!("Wrote {} bytes to {:?}", args.content.len(), path);

        Ok(format!("Successfully saved code to {}", path.display()))
    }
}

#[async_trait]
impl Tool for WriteToFile {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, args: &Map<String, Value>) -> String {
        self.write(args)
            .await
            .unwrap_or_else(|e| format!("Error writing file: {}", e))
    }
}

/// Reads a file from the tools directory.
pub struct ReadFile {
    workspace: Workspace,
    definition: ToolDefinition,
}

impl ReadFile {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            definition: ToolDefinition::new(
                READ_FILE,
                "Reads the content of a file from the tools directory.",
                json!({
                    "type": "object",
                    "properties": {
                        "filename": {
                            "type": "string",
                            "description": "File name relative to the tools directory"
                        }
                    },
                    "required": ["filename"]
                }),
            ),
        }
    }

    async fn read(&self, args: &Map<String, Value>) -> ToolResult<String> {
        let args: ReadArgs = parse_args(READ_FILE, args)?;
        let path = self.workspace.resolve(&args.filename)?;

        if !tokio::fs::try_exists(&path).await? {
            return Ok(format!(
                "Error: File {} does not exist in {}.",
                args.filename,
                self.workspace.root().display()
            ));
        }

        Ok(tokio::fs::read_to_string(&path).await?)
    }
}

#[async_trait]
impl Tool for ReadFile {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, args: &Map<String, Value>) -> String {
        self.read(args)
            .await
            .unwrap_or_else(|e| format!("Error reading file: {}", e))
    }
}

/// Lists the Python artifacts in the tools directory.
pub struct ListFiles {
    workspace: Workspace,
    definition: ToolDefinition,
}

impl ListFiles {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            definition: ToolDefinition::new(
                LIST_FILES,
                "Lists all Python files in the tools directory.",
                json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            ),
        }
    }

    async fn list(&self) -> ToolResult<String> {
        let root = self.workspace.root();
        if !tokio::fs::try_exists(root).await? {
            return Ok("Tools directory is empty.".to_string());
        }

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_artifact = path
                .extension()
                .map_or(false, |ext| ext == ARTIFACT_EXTENSION);
            if is_artifact && entry.file_type().await?.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        if files.is_empty() {
            return Ok("No Python files found in tools directory.".to_string());
        }

        files.sort();
        Ok(files.join(", "))
    }
}

#[async_trait]
impl Tool for ListFiles {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _args: &Map<String, Value>) -> String {
        self.list()
            .await
            .unwrap_or_else(|e| format!("Error listing files: {}", e))
    }
}

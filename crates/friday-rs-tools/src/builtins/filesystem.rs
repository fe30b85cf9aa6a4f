//! Built-in file tools: create, read, delete, and list.

use crate::builtins::utils::{lenient_int, parse_args, schema_of};
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use autoagents_core::tool::ToolInputT;
use autoagents_derive::ToolInput;
use friday_rs_protocol::{Capability, ToolError};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Read};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct CreateArgs {
    #[input(description = "Path where to create the file")]
    file_path: String,
    #[input(description = "Optional content to write to the file")]
    #[serde(default)]
    content: String,
}

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct ReadArgs {
    #[input(description = "Path to the file to read")]
    file_path: String,
    #[input(description = "Maximum number of characters to read")]
    #[serde(default = "default_max_chars", deserialize_with = "lenient_int")]
    max_chars: i64,
}

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct DeleteArgs {
    #[input(description = "Path to the file or directory to delete")]
    file_path: String,
}

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct ListArgs {
    #[input(description = "Path to the directory to list (default: current directory)")]
    #[serde(default = "default_directory")]
    directory_path: String,
}

fn default_max_chars() -> i64 {
    1000
}

fn default_directory() -> String {
    ".".to_string()
}

fn io_error(err: std::io::Error, path: &Path) -> ToolError {
    if err.kind() == ErrorKind::PermissionDenied {
        ToolError::PermissionDenied(path.display().to_string())
    } else {
        ToolError::ExecutionFailed(format!("{}: {err}", path.display()))
    }
}

fn require_path(raw: &str) -> Result<(), ToolError> {
    if raw.trim().is_empty() {
        return Err(ToolError::InvalidArguments(
            "path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Tool that creates a file, including missing parent directories.
#[derive(Debug, Default)]
pub struct CreateFileTool;

#[async_trait]
impl Tool for CreateFileTool {
    fn capability(&self) -> Capability {
        Capability::CreateFile
    }

    fn args_schema(&self) -> Value {
        schema_of(CreateArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: CreateArgs = parse_args(args)?;
        require_path(&input.file_path)?;
        let path = ctx.resolve_path(&input.file_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| io_error(err, parent))?;
        }
        fs::write(&path, input.content.as_bytes()).map_err(|err| io_error(err, &path))?;
        let chars = input.content.chars().count();
        info!("created file (chars={chars})");
        let mut result = format!("Created file: {}", input.file_path);
        if chars > 0 {
            result.push_str(&format!(" with {chars} characters"));
        }
        Ok(result)
    }
}

/// Tool that reads the start of a text file.
#[derive(Debug, Default)]
pub struct ReadFileContentTool;

#[async_trait]
impl Tool for ReadFileContentTool {
    fn capability(&self) -> Capability {
        Capability::ReadFileContent
    }

    fn args_schema(&self) -> Value {
        schema_of(ReadArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: ReadArgs = parse_args(args)?;
        require_path(&input.file_path)?;
        let max_chars = usize::try_from(input.max_chars).map_err(|_| {
            ToolError::InvalidArguments(format!(
                "Invalid max_chars: {}. Use a non-negative number",
                input.max_chars
            ))
        })?;
        let path = ctx.resolve_path(&input.file_path);
        if !path.exists() {
            return Ok(format!("File not found: {}", input.file_path));
        }
        if path.is_dir() {
            return Err(ToolError::ExecutionFailed(format!(
                "{} is a directory",
                input.file_path
            )));
        }
        let size = fs::metadata(&path)
            .map_err(|err| io_error(err, &path))?
            .len();
        // A char is at most four bytes, so this prefix always holds one char
        // past the limit when the file has one.
        let limit = max_chars.saturating_add(1).saturating_mul(4) as u64;
        let mut bytes = Vec::new();
        fs::File::open(&path)
            .and_then(|file| file.take(limit).read_to_end(&mut bytes))
            .map_err(|err| io_error(err, &path))?;
        let text = String::from_utf8_lossy(&bytes);
        let mut content = match text.char_indices().nth(max_chars) {
            Some((end, _)) => {
                let mut head = text[..end].to_string();
                head.push_str(&format!(
                    "\n... (truncated, file is larger than {max_chars} chars)"
                ));
                head
            }
            None => text.into_owned(),
        };
        if content.is_empty() {
            content.push_str("(empty file)");
        }
        info!("read file (bytes={}, read={})", size, bytes.len());
        Ok(format!("Content of {}:\n{content}", input.file_path))
    }
}

/// Tool that deletes a file or a directory tree.
#[derive(Debug, Default)]
pub struct DeleteFileTool;

#[async_trait]
impl Tool for DeleteFileTool {
    fn capability(&self) -> Capability {
        Capability::DeleteFile
    }

    fn args_schema(&self) -> Value {
        schema_of(DeleteArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: DeleteArgs = parse_args(args)?;
        require_path(&input.file_path)?;
        let path = ctx.resolve_path(&input.file_path);
        let Ok(metadata) = fs::symlink_metadata(&path) else {
            return Ok(format!(
                "File or directory not found: {}",
                input.file_path
            ));
        };
        if metadata.is_dir() {
            fs::remove_dir_all(&path).map_err(|err| io_error(err, &path))?;
            info!("deleted directory");
            Ok(format!("Deleted directory: {}", input.file_path))
        } else {
            fs::remove_file(&path).map_err(|err| io_error(err, &path))?;
            info!("deleted file");
            Ok(format!("Deleted file: {}", input.file_path))
        }
    }
}

/// Tool that lists directory entries with sizes.
#[derive(Debug, Default)]
pub struct ListDirectoryTool;

#[async_trait]
impl Tool for ListDirectoryTool {
    fn capability(&self) -> Capability {
        Capability::ListDirectory
    }

    fn args_schema(&self) -> Value {
        schema_of(ListArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: ListArgs = parse_args(args)?;
        let raw = if input.directory_path.trim().is_empty() {
            "."
        } else {
            input.directory_path.as_str()
        };
        let dir = ctx.resolve_path(raw);
        if !dir.exists() {
            return Ok(format!("Directory not found: {raw}"));
        }
        if !dir.is_dir() {
            return Err(ToolError::InvalidArguments(format!("Not a directory: {raw}")));
        }

        let mut entries = fs::read_dir(&dir)
            .map_err(|err| io_error(err, &dir))?
            .filter_map(Result::ok)
            .map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                let path = entry.path();
                if path.is_dir() {
                    (name.clone(), format!("📁 {name}/"))
                } else {
                    let size = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
                    (name.clone(), format!("📄 {name} ({size} bytes)"))
                }
            })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        info!("listed directory (entries={})", entries.len());

        let mut output = format!("Contents of {raw}:");
        if entries.is_empty() {
            output.push_str("\n(empty)");
        }
        for (_, line) in entries {
            output.push('\n');
            output.push_str(&line);
        }
        Ok(output)
    }
}

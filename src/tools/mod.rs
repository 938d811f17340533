//! Wrappers around the external tools this stage delegates to.
//!
//! Each wrapper holds the path of the program it invokes (overridable, so
//! tests can substitute mock scripts), builds a `std::process::Command`, runs
//! it blocking, and checks the exit status. A non-zero exit fails the call
//! with the tool name, exit code, and captured stderr; no step ever continues
//! past a failed predecessor.

pub mod bracken;
pub mod helpers;
pub mod kraken;

use std::io;
use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("failed to spawn {tool} ({program}): {source}")]
    Spawn {
        tool: &'static str,
        program: PathBuf,
        source: io::Error,
    },

    #[error("{tool} exited with code {code}: {stderr}")]
    Failed {
        tool: &'static str,
        code: i32,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Run a prepared command to completion and map a non-zero exit to
/// `ToolError::Failed`. Stdout follows whatever the caller configured on the
/// command (inherited, or redirected into an output file); stderr is captured
/// for diagnostics.
pub(crate) fn run_checked(tool: &'static str, cmd: &mut Command) -> Result<(), ToolError> {
    let program = PathBuf::from(cmd.get_program());
    let output = cmd.output().map_err(|source| ToolError::Spawn {
        tool,
        program,
        source,
    })?;

    if !output.status.success() {
        return Err(ToolError::Failed {
            tool,
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    //! Mock external tools for wrapper tests: executable shell scripts that
    //! record their argv to a shared log file.

    use std::fs::File;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    pub fn write_mock_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh").unwrap();
        file.write_all(body.as_bytes()).unwrap();
        drop(file);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
        }

        path
    }

    /// A mock that appends `<name> <argv>` to `log` and exits 0.
    pub fn recording_mock(dir: &Path, name: &str, log: &Path) -> PathBuf {
        let body = format!("echo \"{} $@\" >> \"{}\"\n", name, log.display());
        write_mock_tool(dir, name, &body)
    }

    /// A mock that prints `msg` to stderr and exits with `code`.
    pub fn failing_mock(dir: &Path, name: &str, code: i32, msg: &str) -> PathBuf {
        let body = format!("echo \"{msg}\" >&2\nexit {code}\n");
        write_mock_tool(dir, name, &body)
    }
}

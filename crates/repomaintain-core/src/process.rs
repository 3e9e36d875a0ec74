use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to start '{command}' in '{cwd}'")]
    Spawn {
        command: String,
        cwd: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {code}{}", render_stderr(stderr))]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("'{command}' was terminated by a signal")]
    Terminated { command: String },

    #[error("'{command}' produced non-UTF-8 output")]
    InvalidOutput { command: String },
}

fn render_stderr(stderr: &str) -> String {
    if stderr.trim().is_empty() {
        String::new()
    } else {
        format!(":\n{}", stderr.trim_end())
    }
}

/// Runs external commands from a fixed set of tools (npm, npx, lerna, ncu).
///
/// All invocations are blocking; no timeouts are applied beyond whatever the
/// tool itself enforces.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Run a command with inherited stdio so the user sees the tool's output.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NonZeroExit`] on a non-zero exit code; call sites
    /// that tolerate a known non-zero meaning must do so explicitly.
    pub fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<(), ToolError> {
        debug!(program, ?args, cwd = %cwd.display(), "running tool");
        let status = command(program, args)
            .current_dir(cwd)
            .status()
            .map_err(|source| ToolError::Spawn {
                command: render_command(program, args),
                cwd: cwd.to_path_buf(),
                source,
            })?;

        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(ToolError::NonZeroExit {
                command: render_command(program, args),
                code,
                stderr: String::new(),
            }),
            None => Err(ToolError::Terminated {
                command: render_command(program, args),
            }),
        }
    }

    /// Run a command and capture its stdout; stderr is captured into the
    /// error on failure and not shown otherwise.
    pub fn run_captured(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
    ) -> Result<String, ToolError> {
        debug!(program, ?args, cwd = %cwd.display(), "running tool (captured)");
        let output = command(program, args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ToolError::Spawn {
                command: render_command(program, args),
                cwd: cwd.to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return match output.status.code() {
                Some(code) => Err(ToolError::NonZeroExit {
                    command: render_command(program, args),
                    code,
                    stderr,
                }),
                None => Err(ToolError::Terminated {
                    command: render_command(program, args),
                }),
            };
        }

        String::from_utf8(output.stdout).map_err(|_| ToolError::InvalidOutput {
            command: render_command(program, args),
        })
    }
}

// npm and friends are .cmd shims on Windows and need a shell to resolve.
#[cfg(windows)]
fn command(program: &str, args: &[&str]) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(program).args(args);
    cmd
}

#[cfg(not(windows))]
fn command(program: &str, args: &[&str]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd
}

fn render_command(program: &str, args: &[&str]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

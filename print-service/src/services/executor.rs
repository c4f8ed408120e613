use service_core::error::AppError;
use std::fmt;
use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("could not be started: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },

    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("{}", describe_failure(.status, .stderr))]
    Failed { status: ExitStatus, stderr: String },
}

fn describe_failure(status: &ExitStatus, stderr: &str) -> String {
    if stderr.is_empty() {
        status.to_string()
    } else {
        stderr.to_string()
    }
}

/// Runs external programs with piped output and an optional time limit.
#[derive(Debug, Clone, Default)]
pub struct CommandExecutor {
    timeout: Option<Duration>,
}

impl CommandExecutor {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Runs `program` to completion. A non-zero exit status is an error.
    pub async fn execute(
        &self,
        program: &str,
        args: &[String],
        envs: &[(&str, &str)],
    ) -> Result<Output, CommandError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .envs(envs.iter().copied())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // a timed-out child is killed when its future is dropped
            .kill_on_drop(true);

        tracing::debug!(
            program = %program,
            args = ?args,
            timeout = ?self.timeout,
            "Executing command"
        );

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| CommandError::TimedOut(limit))?,
            None => cmd.output().await,
        }
        .map_err(|source| CommandError::Spawn { source })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(
                program = %program,
                args = ?args,
                status = %output.status,
                stderr = %stderr,
                "Command failed"
            );
            return Err(CommandError::Failed {
                status: output.status,
                stderr,
            });
        }

        tracing::debug!(
            program = %program,
            output_size = output.stdout.len(),
            "Command succeeded"
        );

        Ok(output)
    }
}

/// A program plus whitespace-separated argument template.
///
/// Placeholders such as `{input}` may appear anywhere inside an argument and
/// are substituted on [`render`](CommandTemplate::render). No shell is
/// involved, so paths are passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    program: String,
    args: Vec<String>,
}

impl CommandTemplate {
    /// Parses a full command line, program first.
    pub fn parse(line: &str) -> Result<Self, AppError> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!("command template is empty"))
        })?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn with_args(program: &str, args: &str) -> Result<Self, AppError> {
        let program = program.trim();
        if program.is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "command program is empty"
            )));
        }
        Ok(Self {
            program: program.to_string(),
            args: args.split_whitespace().map(str::to_string).collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn render(&self, vars: &[(&str, &str)]) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                vars.iter().fold(arg.clone(), |acc, (key, value)| {
                    acc.replace(&format!("{{{}}}", key), value)
                })
            })
            .collect()
    }

    /// The command line as it would be typed, for logs and error context.
    pub fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line(&self.args))
    }
}

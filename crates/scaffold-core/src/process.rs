//! Subprocess invocation
//!
//! Every external tool (template retrieval, package manager, registry query)
//! goes through [`ProcessRunner`], so the orchestrator can be driven by a
//! recording runner in tests.

use std::fmt;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command as TokioCommand;

/// A program, its arguments and the directory to run it in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    fn to_tokio(&self) -> TokioCommand {
        let mut command = TokioCommand::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }
        command
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Result of a subprocess that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubprocessOutcome {
    /// Exit code, `-1` when the process was terminated by a signal
    pub exit_code: i32,
    pub command_line: String,
}

impl SubprocessOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Seam between the scaffolding stages and the operating system
pub trait ProcessRunner: Send + Sync {
    /// Run with inherited standard streams and wait for exit
    fn run_inherited(
        &self,
        command: &CommandLine,
    ) -> impl Future<Output = io::Result<SubprocessOutcome>> + Send;

    /// Run with captured stdout; `None` if the command could not run or exited non-zero
    fn capture_stdout(&self, command: &CommandLine) -> impl Future<Output = Option<String>> + Send;
}

/// Runs commands on the host with tokio
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    async fn run_inherited(&self, command: &CommandLine) -> io::Result<SubprocessOutcome> {
        tracing::debug!(command = %command, "spawning");
        let status = command
            .to_tokio()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        Ok(SubprocessOutcome {
            exit_code: status.code().unwrap_or(-1),
            command_line: command.to_string(),
        })
    }

    async fn capture_stdout(&self, command: &CommandLine) -> Option<String> {
        tracing::debug!(command = %command, "capturing");
        let output = command
            .to_tokio()
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .ok()?;

        if output.status.success() {
            Some(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    type Hook = Box<dyn Fn(&CommandLine) + Send + Sync>;

    /// Records every invocation and answers from canned responses.
    /// Commands are matched on `program arg...` with the program's `.cmd` suffix removed.
    #[derive(Default)]
    pub struct RecordingRunner {
        pub calls: Mutex<Vec<CommandLine>>,
        exit_codes: HashMap<String, i32>,
        outputs: HashMap<String, String>,
        hooks: HashMap<String, Hook>,
    }

    pub fn key(command: &CommandLine) -> String {
        let program = command
            .program
            .strip_suffix(".cmd")
            .unwrap_or(&command.program);
        CommandLine {
            program: program.to_string(),
            args: command.args.clone(),
            cwd: None,
        }
        .to_string()
    }

    impl RecordingRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Exit code for commands whose rendered line starts with `prefix`
        pub fn exit_with(mut self, prefix: &str, code: i32) -> Self {
            self.exit_codes.insert(prefix.to_string(), code);
            self
        }

        /// Stdout for commands whose rendered line starts with `prefix`
        pub fn output(mut self, prefix: &str, stdout: &str) -> Self {
            self.outputs.insert(prefix.to_string(), stdout.to_string());
            self
        }

        /// Side effect performed when a matching command runs
        pub fn on_run(
            mut self,
            prefix: &str,
            hook: impl Fn(&CommandLine) + Send + Sync + 'static,
        ) -> Self {
            self.hooks.insert(prefix.to_string(), Box::new(hook));
            self
        }

        pub fn invoked(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(key).collect()
        }

        fn lookup<'a, T>(map: &'a HashMap<String, T>, line: &str) -> Option<&'a T> {
            map.iter()
                .filter(|(prefix, _)| line.starts_with(prefix.as_str()))
                .max_by_key(|(prefix, _)| prefix.len())
                .map(|(_, value)| value)
        }
    }

    impl ProcessRunner for RecordingRunner {
        async fn run_inherited(&self, command: &CommandLine) -> io::Result<SubprocessOutcome> {
            self.calls.lock().unwrap().push(command.clone());
            let line = key(command);
            if let Some(hook) = Self::lookup(&self.hooks, &line) {
                hook(command);
            }
            let exit_code = Self::lookup(&self.exit_codes, &line).copied().unwrap_or(0);
            Ok(SubprocessOutcome {
                exit_code,
                command_line: command.to_string(),
            })
        }

        async fn capture_stdout(&self, command: &CommandLine) -> Option<String> {
            self.calls.lock().unwrap().push(command.clone());
            Self::lookup(&self.outputs, &key(command)).cloned()
        }
    }
}

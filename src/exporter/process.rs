//! External tool execution.
//!
//! Commands run without a shell, with stdout/stderr captured. A spinner is
//! shown while the tool blocks and is always stopped before the result line
//! is printed.

use crate::cli::{RuntimeConfig, Spinner};
use crate::exporter::error::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

/// Prefix `apksigner` uses for inline passwords.
const INLINE_SECRET_PREFIX: &str = "pass:";

/// Program plus argument vector.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ToolCommand {
    /// Starts a command for `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends a path argument.
    pub fn arg_path(self, path: &Path) -> Self {
        self.arg(path.as_os_str())
    }

    /// Program to execute.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments passed to the program.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Command line for display, with `pass:` secrets masked.
    pub fn display(&self) -> String {
        let program = self
            .program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned();

        std::iter::once(program)
            .chain(self.args.iter().map(|arg| {
                let arg = arg.to_string_lossy();
                if arg.starts_with(INLINE_SECRET_PREFIX) {
                    format!("{INLINE_SECRET_PREFIX}********")
                } else {
                    arg.into_owned()
                }
            }))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs tools inside the working directory and reports their outcome.
pub struct ProcessRunner<'a> {
    working_dir: &'a Path,
    runtime: &'a RuntimeConfig,
}

impl<'a> ProcessRunner<'a> {
    /// Creates a runner executing in `working_dir`.
    pub fn new(working_dir: &'a Path, runtime: &'a RuntimeConfig) -> Self {
        Self {
            working_dir,
            runtime,
        }
    }

    /// Runs `command` to completion.
    ///
    /// # Errors
    ///
    /// - [`Error::CommandLaunch`] if the program cannot be started
    /// - [`Error::CommandFailed`] if it exits unsuccessfully; `label` prefixes the message
    pub async fn run(&self, command: &ToolCommand, label: &str) -> Result<Output> {
        let rendered = command.display();
        log::debug!("Running `{}` in {}", rendered, self.working_dir.display());

        let spinner = Spinner::start(self.runtime.output());
        let result = tokio::process::Command::new(command.program())
            .args(command.args())
            .current_dir(self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;
        spinner.stop().await;

        let output = match result {
            Ok(output) => output,
            Err(error) => {
                let _ = self
                    .runtime
                    .output()
                    .error(&format!("{label}: could not start `{rendered}`: {error}"));
                return Err(Error::CommandLaunch {
                    command: rendered,
                    error,
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
            let error = Error::CommandFailed {
                label: label.to_string(),
                command: rendered,
                code: output.status.code(),
                stderr,
            };

            let _ = self.runtime.output().error(&error.to_string());
            if let Error::CommandFailed { stderr, .. } = &error {
                let _ = self
                    .runtime
                    .output()
                    .error_detail(&format!("Error output:\n{stderr}"));
            }
            return Err(error);
        }

        self.runtime
            .success(&format!("[SUCCESS] Command executed: {rendered}"))?;
        log::trace!("stdout: {}", String::from_utf8_lossy(&output.stdout));

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputManager;

    #[test]
    fn display_masks_inline_passwords() {
        let command = ToolCommand::new("/opt/sdk/build-tools/34.0.0/apksigner")
            .arg("sign")
            .arg("--ks-pass")
            .arg("pass:hunter2")
            .arg("--key-pass")
            .arg("pass:hunter2")
            .arg("aligned.apk");

        assert_eq!(
            command.display(),
            "apksigner sign --ks-pass pass:******** --key-pass pass:******** aligned.apk"
        );
    }

    #[tokio::test]
    async fn launch_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = RuntimeConfig::quiet();
        let runner = ProcessRunner::new(dir.path(), &runtime);

        let err = runner
            .run(&ToolCommand::new("gae-definitely-not-a-real-tool"), "Decompilation failed")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CommandLaunch { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_captures_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = RuntimeConfig::quiet();
        let runner = ProcessRunner::new(dir.path(), &runtime);

        let command = ToolCommand::new("sh")
            .arg("-c")
            .arg("echo 'bad keystore' >&2; exit 3");
        let err = runner.run(&command, "Signing failed").await.unwrap_err();

        match err {
            Error::CommandFailed {
                label,
                code,
                stderr,
                ..
            } => {
                assert_eq!(label, "Signing failed");
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "bad keystore");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn spinner_is_stopped_on_success_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = RuntimeConfig::with_output(OutputManager::forced_interactive());
        let runner = ProcessRunner::new(dir.path(), &runtime);

        let slow_ok = ToolCommand::new("sh").arg("-c").arg("sleep 0.3");
        runner.run(&slow_ok, "Build failed").await.unwrap();

        let slow_fail = ToolCommand::new("sh").arg("-c").arg("sleep 0.3; exit 2");
        let err = runner.run(&slow_fail, "Build failed").await.unwrap_err();
        assert!(matches!(err, Error::CommandFailed { code: Some(2), .. }));

        let missing = ToolCommand::new("gae-definitely-not-a-real-tool");
        let err = runner.run(&missing, "Build failed").await.unwrap_err();
        assert!(matches!(err, Error::CommandLaunch { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = RuntimeConfig::quiet();
        let runner = ProcessRunner::new(dir.path(), &runtime);

        runner
            .run(&ToolCommand::new("touch").arg("created.txt"), "touch failed")
            .await
            .unwrap();
        assert!(dir.path().join("created.txt").exists());
    }
}

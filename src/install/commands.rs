//! External command execution
//!
//! Package managers, tar, chown, nginx and systemctl all go through the
//! [`CommandRunner`] seam. Supports dry-run mode for safe testing.

use crate::error::InstallError;
use std::fmt;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// A command the installer intends to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCommand {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
    pub description: String,
}

impl PlannedCommand {
    pub fn new(program: &str, args: &[&str], description: impl Into<String>) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            envs: Vec::new(),
            description: description.into(),
        }
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for PlannedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.envs {
            write!(f, "{}={} ", key, value)?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs planned commands, failing on the first unsuccessful one
pub trait CommandRunner {
    fn run(&mut self, command: &PlannedCommand) -> Result<(), InstallError>;
}

/// Runs commands on the host with the terminal attached
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
    dry_run: bool,
}

impl SystemRunner {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, command: &PlannedCommand) -> Result<(), InstallError> {
        if self.dry_run {
            info!("Dry run: would {}: {}", command.description, command);
            return Ok(());
        }

        info!("Running: {}", command);
        let status = Command::new(&command.program)
            .args(&command.args)
            .envs(command.envs.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| InstallError::ToolSpawn {
                command: command.to_string(),
                source,
            })?;

        if status.success() {
            debug!("Finished: {}", command.description);
            Ok(())
        } else {
            Err(InstallError::ExternalToolFailure {
                command: command.to_string(),
                code: status.code(),
            })
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Records commands and fails the one at `fail_at`, if set
    #[derive(Debug, Default)]
    pub struct RecordingRunner {
        pub commands: Vec<PlannedCommand>,
        pub fail_at: Option<(usize, i32)>,
    }

    impl RecordingRunner {
        pub fn failing_at(index: usize, code: i32) -> Self {
            Self {
                commands: Vec::new(),
                fail_at: Some((index, code)),
            }
        }

        pub fn lines(&self) -> Vec<String> {
            self.commands.iter().map(ToString::to_string).collect()
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&mut self, command: &PlannedCommand) -> Result<(), InstallError> {
            let index = self.commands.len();
            self.commands.push(command.clone());
            match self.fail_at {
                Some((at, code)) if at == index => Err(InstallError::ExternalToolFailure {
                    command: command.to_string(),
                    code: Some(code),
                }),
                _ => Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_env_and_args() {
        let cmd = PlannedCommand::new("apt-get", &["-y", "install", "unzip"], "install unzip")
            .env("DEBIAN_FRONTEND", "noninteractive");
        assert_eq!(cmd.to_string(), "DEBIAN_FRONTEND=noninteractive apt-get -y install unzip");
    }

    #[test]
    fn test_dry_run_does_not_execute() {
        let mut runner = SystemRunner::new(true);
        let cmd = PlannedCommand::new("/nonexistent/binary", &[], "do nothing");
        assert!(runner.run(&cmd).is_ok());
    }

    #[test]
    fn test_successful_command() {
        let mut runner = SystemRunner::new(false);
        let cmd = PlannedCommand::new("true", &[], "succeed");
        assert!(runner.run(&cmd).is_ok());
    }

    #[test]
    fn test_failure_propagates_exit_code() {
        let mut runner = SystemRunner::new(false);
        let cmd = PlannedCommand::new("sh", &["-c", "exit 3"], "fail");
        let err = runner.run(&cmd).unwrap_err();
        assert!(matches!(err, InstallError::ExternalToolFailure { code: Some(3), .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let mut runner = SystemRunner::new(false);
        let cmd = PlannedCommand::new("/nonexistent/pmasetup-tool", &[], "fail to start");
        let err = runner.run(&cmd).unwrap_err();
        assert!(matches!(err, InstallError::ToolSpawn { .. }));
        assert_eq!(err.exit_code(), 1);
    }
}

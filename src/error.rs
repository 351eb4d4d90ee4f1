//! Fatal conditions of an installer run
//!
//! Every variant terminates the process. There is no partial success and no
//! rollback: the first error wins and its exit code becomes the process's.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop the installer
#[derive(Debug, Error)]
pub enum InstallError {
    /// Not running as root.
    #[error("This installer must be run with root privileges (try: sudo pmasetup)")]
    PrivilegeError,

    /// The base panel installation could not be found.
    #[error("The panel is not installed: {} does not exist", .path.display())]
    PreconditionError { path: PathBuf },

    /// The operator refused to continue on a non-reference architecture.
    #[error("Installation aborted: unsupported CPU architecture {arch}")]
    UnsupportedArchitectureDeclined { arch: String },

    /// The distro/version pair is not in the support table.
    #[error("Unsupported OS: {distro} {version} is not supported by this installer")]
    UnsupportedEnvironment { distro: String, version: String },

    /// Supported pair without an installer routine.
    #[error("No installer routine is defined for {distro} {version}")]
    MissingDispatchEntry { distro: String, version: String },

    /// The operator declined the final confirmation.
    #[error("Installation aborted by user")]
    UserDeclined,

    /// An external tool exited unsuccessfully.
    #[error("Command failed ({}): {command}", describe_code(.code))]
    ExternalToolFailure { command: String, code: Option<i32> },

    /// An external tool could not be started.
    #[error("Failed to execute {command}")]
    ToolSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// phpMyAdmin files are missing and no archive is configured.
    #[error(
        "phpMyAdmin is not installed in {}: place its files there or set phpmyadmin.archive",
        .path.display()
    )]
    MissingPhpMyAdmin { path: PathBuf },

    /// A file operation of the configuration stage failed.
    #[error("Failed to {action} {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    /// Process exit code for this error
    ///
    /// External tool failures propagate the tool's own code. Everything else,
    /// including tools killed by a signal, exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            InstallError::ExternalToolFailure { code: Some(code), .. } if *code != 0 => *code,
            _ => 1,
        }
    }

    /// `action` is the verb shown to the operator, e.g. "create" or "back up"
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InstallError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Exit code for an arbitrary error chain
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<InstallError>())
        .map(InstallError::exit_code)
        .unwrap_or(1)
}

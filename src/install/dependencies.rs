//! Dependency routines
//!
//! Turns an [`InstallPlan`] into package-manager invocations. The package
//! manager itself is external; this only decides what to ask it for.

use crate::error::InstallError;
use crate::host::{InstallPlan, PreStep, Routine};
use crate::install::commands::{CommandRunner, PlannedCommand};
use tracing::info;

const DEBIAN_PACKAGES: &[&str] = &[
    "php8.0-mysql",
    "php8.0-mbstring",
    "php8.0-zip",
    "php8.0-gd",
    "php8.0-curl",
    "php8.0-xml",
    "php8.0-bcmath",
    "unzip",
    "tar",
];

const REDHAT_PACKAGES: &[&str] = &[
    "php-mysqlnd",
    "php-mbstring",
    "php-zip",
    "php-gd",
    "php-json",
    "php-xml",
    "php-bcmath",
    "unzip",
    "tar",
];

fn apt(args: &[&str], description: &str) -> PlannedCommand {
    PlannedCommand::new("apt-get", args, description).env("DEBIAN_FRONTEND", "noninteractive")
}

fn install_with(manager: &str, packages: &[&str], description: &str) -> PlannedCommand {
    let mut args = vec!["-y", "install"];
    args.extend_from_slice(packages);
    match manager {
        "apt-get" => apt(&args, description),
        _ => PlannedCommand::new(manager, &args, description),
    }
}

/// Commands for the package-index refresh
pub fn pre_step_commands(pre_step: PreStep) -> Vec<PlannedCommand> {
    let command = match pre_step {
        PreStep::Apt => apt(&["update", "-q"], "refresh the apt package index"),
        PreStep::Yum => PlannedCommand::new("yum", &["-y", "makecache"], "refresh the yum package index"),
        PreStep::Dnf => PlannedCommand::new("dnf", &["-y", "makecache"], "refresh the dnf package index"),
    };
    vec![command]
}

/// Commands for a dependency routine
pub fn routine_commands(routine: Routine) -> Vec<PlannedCommand> {
    let description = format!("install dependencies ({})", routine.name());
    match routine {
        Routine::Ubuntu20 | Routine::Ubuntu18 | Routine::Debian => {
            vec![install_with("apt-get", DEBIAN_PACKAGES, &description)]
        }
        Routine::DebianStretch => vec![
            // stretch ships without a key-fetching agent for third-party repos
            install_with("apt-get", &["dirmngr"], "install dirmngr"),
            install_with("apt-get", DEBIAN_PACKAGES, &description),
        ],
        Routine::Centos7 => vec![install_with("yum", REDHAT_PACKAGES, &description)],
        Routine::Centos8 => vec![install_with("dnf", REDHAT_PACKAGES, &description)],
    }
}

/// Run the pre-step, then the routine
///
/// Stops at the first failing command; its error is returned unchanged.
pub fn install_dependencies(
    plan: &InstallPlan,
    runner: &mut dyn CommandRunner,
) -> Result<(), InstallError> {
    info!("Running {}", plan.pre_step.as_str());
    for command in pre_step_commands(plan.pre_step) {
        runner.run(&command)?;
    }

    info!("Running routine {}", plan.routine.name());
    for command in routine_commands(plan.routine) {
        runner.run(&command)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::commands::testing::RecordingRunner;

    fn plan(pre_step: PreStep, routine: Routine) -> InstallPlan {
        InstallPlan { pre_step, routine }
    }

    #[test]
    fn test_ubuntu20_refreshes_then_installs() {
        let mut runner = RecordingRunner::default();
        install_dependencies(&plan(PreStep::Apt, Routine::Ubuntu20), &mut runner).unwrap();

        let lines = runner.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "DEBIAN_FRONTEND=noninteractive apt-get update -q");
        assert!(lines[1].starts_with("DEBIAN_FRONTEND=noninteractive apt-get -y install php8.0-mysql"));
        assert!(lines[1].ends_with("unzip tar"));
    }

    #[test]
    fn test_centos_package_managers() {
        let mut runner = RecordingRunner::default();
        install_dependencies(&plan(PreStep::Yum, Routine::Centos7), &mut runner).unwrap();
        assert_eq!(runner.commands[0].program, "yum");
        assert_eq!(runner.commands[1].program, "yum");
        assert!(runner.commands[1].args.contains(&"php-mysqlnd".to_string()));

        let mut runner = RecordingRunner::default();
        install_dependencies(&plan(PreStep::Dnf, Routine::Centos8), &mut runner).unwrap();
        assert_eq!(runner.lines()[0], "dnf -y makecache");
        assert_eq!(runner.commands[1].program, "dnf");
        assert!(runner.commands[1].envs.is_empty());
    }

    #[test]
    fn test_stretch_installs_dirmngr_first() {
        let commands = routine_commands(Routine::DebianStretch);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].args, vec!["-y", "install", "dirmngr"]);
    }

    #[test]
    fn test_failed_pre_step_stops_routine() {
        let mut runner = RecordingRunner::failing_at(0, 100);
        let err = install_dependencies(&plan(PreStep::Apt, Routine::Debian), &mut runner).unwrap_err();
        assert_eq!(err.exit_code(), 100);
        assert_eq!(runner.commands.len(), 1);
    }
}

//! Installer run
//!
//! This is the core of pmasetup, sequencing one single-shot installation:
//! - Base panel precondition
//! - Host detection and support checks
//! - Routine selection and operator confirmation
//! - Dependency installation and configuration

use crate::config::Config;
use crate::error::InstallError;
use crate::host::{self, HostSource, InstallPlan};
use crate::install::{self, CommandRunner, WebLayout};
use crate::types::HostEnvironment;
use crate::ui::{Confirm, Printer};
use std::path::Path;
use tracing::info;

/// One installer invocation
pub struct Installer<'a> {
    config: &'a Config,
    printer: &'a Printer,
    dry_run: bool,
}

impl<'a> Installer<'a> {
    pub fn new(config: &'a Config, printer: &'a Printer, dry_run: bool) -> Self {
        Self {
            config,
            printer,
            dry_run,
        }
    }

    /// Run every stage, stopping at the first fatal condition
    pub fn run(
        &self,
        host: &dyn HostSource,
        confirm: &mut dyn Confirm,
        runner: &mut dyn CommandRunner,
    ) -> Result<(), InstallError> {
        ensure_panel_installed(&self.config.panel.path)?;

        let env = host::detect(host);
        self.printer.info(&format!(
            "Detected {} on {} (via {})",
            env.label(),
            env.cpu_architecture(),
            env.source().as_str()
        ));

        if !host::check_supported(&env, &self.config.reference_arch, confirm)? {
            return Err(InstallError::UnsupportedEnvironment {
                distro: env.distro_id().to_string(),
                version: env.version_string().to_string(),
            });
        }

        let plan = host::dispatch(&env)?;
        let layout = WebLayout::resolve(self.config, plan.family());
        install::ensure_sources(&layout, self.dry_run)?;

        self.printer.stage("Installation summary");
        self.printer.summary(&summary_rows(&env, &plan, &layout, self.dry_run));
        println!();
        if !confirm.confirm("Proceed with the installation?") {
            return Err(InstallError::UserDeclined);
        }

        self.printer.stage("Installing dependencies");
        install::install_dependencies(&plan, runner)?;

        self.printer.stage("Configuring phpMyAdmin and nginx");
        install::configure(&layout, runner, self.dry_run)?;

        info!(routine = plan.routine.name(), "Installation finished");
        if self.dry_run {
            self.printer.success("Dry run complete, no changes were made");
        } else {
            self.printer.success(&format!(
                "phpMyAdmin is available on port {}",
                layout.port
            ));
        }
        Ok(())
    }
}

/// The panel directory must exist before anything else happens
pub fn ensure_panel_installed(path: &Path) -> Result<(), InstallError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(InstallError::PreconditionError {
            path: path.to_path_buf(),
        })
    }
}

fn summary_rows(
    env: &HostEnvironment,
    plan: &InstallPlan,
    layout: &WebLayout,
    dry_run: bool,
) -> Vec<(String, String)> {
    let mut rows = vec![
        ("Operating system".to_string(), env.label()),
        ("Architecture".to_string(), env.cpu_architecture().to_string()),
        ("Pre-step".to_string(), plan.pre_step.as_str().to_string()),
        ("Routine".to_string(), plan.routine.name().to_string()),
        ("Install directory".to_string(), layout.install_dir.display().to_string()),
        ("nginx site".to_string(), layout.site_config.display().to_string()),
        ("PHP-FPM socket".to_string(), layout.php_socket.clone()),
        ("Listen port".to_string(), layout.port.to_string()),
    ];
    if dry_run {
        rows.push(("Mode".to_string(), "dry run".to_string()));
    }
    rows
}
